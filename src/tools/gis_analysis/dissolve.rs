/*
This tool is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use crate::error::{Error, Result};
use crate::layer::{polygons_of, polygons_to_geometry, Layer};
use crate::tools::GeoprocessingTool;
use crate::vector::{FieldData, ShapeType};
use crate::workspace::Workspace;
use geo::{unary_union, Geometry, Polygon};
use std::collections::HashMap;
use tracing::debug;

/// This tool can be used to remove the interior, or shared, boundaries within a vector
/// polygon coverage. Polygons sharing the same values of the dissolve fields are merged
/// (with no dissolve fields, everything is merged into one). Groups appear in the output
/// in the order their first member appears in the input, and a null value forms a group
/// of its own. The output carries only the dissolve fields.
///
/// With `multi_part` unset, every group is exploded into its single-part polygons.
///
/// # See Also
/// `BufferVector`, `FeatureToPoint`
pub struct Dissolve {
    name: String,
    description: String,
    toolbox: String,
    pub input: String,
    pub output: String,
    pub dissolve_fields: Vec<String>,
    pub multi_part: bool,
}

impl Dissolve {
    pub fn new(input: &str, output: &str, dissolve_fields: &[&str]) -> Dissolve {
        Dissolve {
            name: "Dissolve".to_string(),
            description: "Removes the interior, or shared, boundaries within a vector polygon coverage."
                .to_string(),
            toolbox: "GIS Analysis/Overlay Tools".to_string(),
            input: input.to_string(),
            output: output.to_string(),
            dissolve_fields: dissolve_fields.iter().map(|s| s.to_string()).collect(),
            multi_part: false,
        }
    }
}

impl GeoprocessingTool for Dissolve {
    fn get_tool_name(&self) -> String {
        self.name.clone()
    }

    fn get_tool_description(&self) -> String {
        self.description.clone()
    }

    fn get_toolbox(&self) -> String {
        self.toolbox.clone()
    }

    fn run(&self, workspace: &mut Workspace) -> Result<()> {
        let fields: Vec<&str> = self.dissolve_fields.iter().map(|s| s.as_str()).collect();
        let output = dissolve(
            workspace.get(&self.input)?,
            &self.output,
            &fields,
            self.multi_part,
        )?;
        workspace.insert(output)
    }
}

pub fn dissolve(
    input: &Layer,
    output_name: &str,
    dissolve_fields: &[&str],
    multi_part: bool,
) -> Result<Layer> {
    if input.shape_type != ShapeType::Polygon {
        return Err(Error::InvalidGeometryType {
            expected: "Polygon",
            found: input.shape_type.to_string(),
        });
    }
    let field_nums = dissolve_fields
        .iter()
        .map(|f| input.require_field(f))
        .collect::<Result<Vec<usize>>>()?;

    let mut output = input.empty_like(output_name, ShapeType::Polygon, false);
    for j in &field_nums {
        output.add_field(input.fields[*j].clone());
    }

    // group members, in first-seen order
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(Vec<FieldData>, Vec<Polygon<f64>>)> = vec![];
    for feature in &input.features {
        let values: Vec<FieldData> = field_nums
            .iter()
            .map(|j| feature.attributes.get(*j).cloned().unwrap_or(FieldData::Null))
            .collect();
        let key = values
            .iter()
            .map(|v| v.group_key())
            .collect::<Vec<String>>()
            .join("\u{1f}");
        let idx = *group_index.entry(key).or_insert_with(|| {
            groups.push((values, vec![]));
            groups.len() - 1
        });
        groups[idx].1.extend(polygons_of(&feature.geometry));
    }
    debug!("{} dissolve groups", groups.len());

    for (values, polygons) in groups {
        if polygons.is_empty() {
            continue;
        }
        let merged = unary_union(&polygons);
        if multi_part {
            output.add_feature(polygons_to_geometry(merged.0), values);
        } else {
            for p in merged.0 {
                output.add_feature(Geometry::Polygon(p), values.clone());
            }
        }
    }

    Ok(output)
}
