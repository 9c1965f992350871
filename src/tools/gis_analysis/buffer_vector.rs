/*
This tool is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use crate::error::Result;
use crate::layer::{is_empty_geometry, polygons_to_geometry, Layer};
use crate::tools::GeoprocessingTool;
use crate::units::LinearDistance;
use crate::vector::{AttributeField, FieldData, FieldDataType, ShapeType};
use crate::workspace::Workspace;
use geo::{unary_union, Buffer, MultiPolygon, Polygon};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DissolveOption {
    /// One output polygon per input feature.
    #[default]
    None,
    /// All buffers merged into a single feature.
    All,
}

/// Creates buffer polygons of a fixed distance around every input feature,
/// using round joins and end caps. Negative distances shrink polygons;
/// features that buffer to nothing are dropped.
///
/// Without dissolving, output features carry the input attributes plus
/// `BUFF_DIST` (the distance in layer units) and `ORIG_FID`.
pub struct BufferVector {
    name: String,
    description: String,
    toolbox: String,
    pub input: String,
    pub output: String,
    pub distance: LinearDistance,
    pub dissolve: DissolveOption,
}

impl BufferVector {
    pub fn new(input: &str, output: &str, distance: LinearDistance) -> BufferVector {
        BufferVector {
            name: "BufferVector".to_string(),
            description: "Creates buffer polygons around input features.".to_string(),
            toolbox: "GIS Analysis/Distance Tools".to_string(),
            input: input.to_string(),
            output: output.to_string(),
            distance,
            dissolve: DissolveOption::None,
        }
    }
}

impl GeoprocessingTool for BufferVector {
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
        let output = buffer_vector(
            workspace.get(&self.input)?,
            &self.output,
            self.distance.meters(),
            self.dissolve,
        )?;
        workspace.insert(output)
    }
}

pub fn buffer_vector(
    input: &Layer,
    output_name: &str,
    distance: f64,
    dissolve: DissolveOption,
) -> Result<Layer> {
    let mut output = input.empty_like(
        output_name,
        ShapeType::Polygon,
        dissolve == DissolveOption::None,
    );
    let dist_field = output.unique_field_name("BUFF_DIST");
    output.add_field(AttributeField::new(&dist_field, FieldDataType::Real, 19u8, 6u8));

    match dissolve {
        DissolveOption::None => {
            let fid_field = output.unique_field_name("ORIG_FID");
            output.add_field(AttributeField::new(&fid_field, FieldDataType::Int, 9u8, 0u8));
            for (fid, feature) in input.features.iter().enumerate() {
                if feature.is_empty() {
                    continue;
                }
                let buffered: MultiPolygon<f64> = feature.geometry.buffer(distance);
                let geometry = polygons_to_geometry(buffered.0);
                if is_empty_geometry(&geometry) {
                    continue;
                }
                let mut atts = feature.attributes.clone();
                atts.push(FieldData::Real(distance));
                atts.push(FieldData::Int(fid as i64));
                output.add_feature(geometry, atts);
            }
        }
        DissolveOption::All => {
            let mut parts: Vec<Polygon<f64>> = vec![];
            for feature in input.features.iter().filter(|f| !f.is_empty()) {
                parts.extend(feature.geometry.buffer(distance).0);
            }
            let merged = unary_union(&parts);
            if !merged.0.is_empty() {
                output.add_feature(polygons_to_geometry(merged.0), vec![FieldData::Real(distance)]);
            }
        }
    }

    Ok(output)
}
