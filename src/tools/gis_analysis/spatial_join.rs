/*
This tool is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use crate::error::Result;
use crate::layer::{unique_name, Layer};
use crate::structures::{build_envelope_index, candidates, geometry_envelope};
use crate::tools::GeoprocessingTool;
use crate::vector::{AttributeField, FieldData, FieldDataType};
use crate::workspace::Workspace;
use geo::Intersects;
use tracing::debug;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum JoinOperation {
    /// One output row per target feature; attributes of the first match.
    OneToOne,
    /// One output row per intersecting (target, join) pair.
    #[default]
    OneToMany,
}

/// Transfers the attributes of join features onto the target features they
/// intersect.
///
/// Output fields are `Join_Count`, `TARGET_FID`, `JOIN_FID` (one-to-many
/// only), the target fields and then the join fields, with clashing names
/// given a numeric suffix. With `keep_all` set, targets without a match are
/// written once with a zero count, a `JOIN_FID` of -1 and null join values.
pub struct SpatialJoin {
    name: String,
    description: String,
    toolbox: String,
    pub target: String,
    pub join: String,
    pub output: String,
    pub operation: JoinOperation,
    pub keep_all: bool,
}

impl SpatialJoin {
    pub fn new(target: &str, join: &str, output: &str) -> SpatialJoin {
        SpatialJoin {
            name: "SpatialJoin".to_string(),
            description:
                "Joins attributes from one layer to another based on their spatial relationship."
                    .to_string(),
            toolbox: "GIS Analysis/Overlay Tools".to_string(),
            target: target.to_string(),
            join: join.to_string(),
            output: output.to_string(),
            operation: JoinOperation::OneToMany,
            keep_all: true,
        }
    }
}

impl GeoprocessingTool for SpatialJoin {
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
        let output = spatial_join(
            workspace.get(&self.target)?,
            workspace.get(&self.join)?,
            &self.output,
            self.operation,
            self.keep_all,
        )?;
        workspace.insert(output)
    }
}

pub fn spatial_join(
    target: &Layer,
    join: &Layer,
    output_name: &str,
    operation: JoinOperation,
    keep_all: bool,
) -> Result<Layer> {
    let one_to_many = operation == JoinOperation::OneToMany;

    let mut fields = vec![
        AttributeField::new("Join_Count", FieldDataType::Int, 9u8, 0u8),
        AttributeField::new("TARGET_FID", FieldDataType::Int, 9u8, 0u8),
    ];
    if one_to_many {
        fields.push(AttributeField::new("JOIN_FID", FieldDataType::Int, 9u8, 0u8));
    }
    for f in target.fields.iter().chain(join.fields.iter()) {
        let mut f = f.clone();
        f.name = unique_name(&fields, &f.name);
        fields.push(f);
    }

    let mut output = target.empty_like(output_name, target.shape_type, false);
    output.fields = fields;

    let tree = build_envelope_index(join.features.iter().map(|f| &f.geometry));
    let null_join = vec![FieldData::Null; join.fields.len()];
    let mut num_matched = 0usize;

    for (fid, feature) in target.features.iter().enumerate() {
        let matches: Vec<usize> = match geometry_envelope(&feature.geometry) {
            Some(env) => candidates(&tree, &env)
                .into_iter()
                .filter(|j| feature.geometry.intersects(&join.features[*j].geometry))
                .collect(),
            None => vec![],
        };
        if !matches.is_empty() {
            num_matched += 1;
        }

        let row = |count: i64, join_fid: Option<i64>, join_atts: &[FieldData]| {
            let mut atts = vec![FieldData::Int(count), FieldData::Int(fid as i64)];
            if let Some(j) = join_fid {
                atts.push(FieldData::Int(j));
            }
            atts.extend(feature.attributes.iter().cloned());
            atts.extend(join_atts.iter().cloned());
            atts
        };

        if one_to_many {
            if matches.is_empty() {
                if keep_all {
                    let atts = row(0, Some(-1), null_join.as_slice());
                    output.add_feature(feature.geometry.clone(), atts);
                }
                continue;
            }
            for j in matches {
                output.add_feature(
                    feature.geometry.clone(),
                    row(1, Some(j as i64), join.features[j].attributes.as_slice()),
                );
            }
        } else {
            match matches.first() {
                Some(j) => output.add_feature(
                    feature.geometry.clone(),
                    row(matches.len() as i64, None, join.features[*j].attributes.as_slice()),
                ),
                None if keep_all => {
                    let atts = row(0, None, null_join.as_slice());
                    output.add_feature(feature.geometry.clone(), atts)
                }
                None => {}
            }
        }
    }

    debug!(
        "{} of {} target features matched",
        num_matched,
        target.num_features()
    );
    Ok(output)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tools::test_data::{point_layer, polygon_layer, square};

    fn layers() -> (Layer, Layer) {
        let target = polygon_layer(
            "polys",
            &[
                (square(0.0, 0.0, 10.0), "two"),
                (square(100.0, 100.0, 10.0), "none"),
                (square(50.0, 0.0, 10.0), "edge"),
            ],
        );
        let join = point_layer("pts", &[(2.0, 2.0), (8.0, 8.0), (60.0, 5.0), (500.0, 500.0)]);
        (target, join)
    }

    #[test]
    fn one_to_many_keep_all() {
        let (target, join) = layers();
        let out = spatial_join(&target, &join, "j", JoinOperation::OneToMany, true).unwrap();
        let names: Vec<&str> = out.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Join_Count", "TARGET_FID", "JOIN_FID", "SENSFEAT", "ID"]);
        assert_eq!(out.num_features(), 4);
        assert_eq!(out.get_value(0, "JOIN_FID"), FieldData::Int(0));
        assert_eq!(out.get_value(1, "JOIN_FID"), FieldData::Int(1));
        assert_eq!(out.get_value(1, "TARGET_FID"), FieldData::Int(0));
        // unmatched target kept with nulls
        assert_eq!(out.get_value(2, "Join_Count"), FieldData::Int(0));
        assert_eq!(out.get_value(2, "JOIN_FID"), FieldData::Int(-1));
        assert_eq!(out.get_value(2, "ID"), FieldData::Null);
        // a point on the boundary intersects
        assert_eq!(out.get_value(3, "TARGET_FID"), FieldData::Int(2));
        assert_eq!(out.get_value(3, "ID"), FieldData::Int(2));
    }

    #[test]
    fn keep_common_drops_unmatched() {
        let (target, join) = layers();
        let out = spatial_join(&target, &join, "j", JoinOperation::OneToMany, false).unwrap();
        assert_eq!(out.num_features(), 3);
    }

    #[test]
    fn one_to_one_counts_matches() {
        let (target, join) = layers();
        let out = spatial_join(&target, &join, "j", JoinOperation::OneToOne, true).unwrap();
        assert_eq!(out.num_features(), 3);
        assert!(out.get_field_num("JOIN_FID").is_none());
        assert_eq!(out.get_value(0, "Join_Count"), FieldData::Int(2));
        assert_eq!(out.get_value(0, "ID"), FieldData::Int(0));
        assert_eq!(out.get_value(1, "Join_Count"), FieldData::Int(0));
    }

    #[test]
    fn clashing_names_are_suffixed() {
        let a = polygon_layer("a", &[(square(0.0, 0.0, 10.0), "x")]);
        let b = polygon_layer("b", &[(square(5.0, 5.0, 10.0), "y")]);
        let out = spatial_join(&a, &b, "j", JoinOperation::OneToMany, true).unwrap();
        assert_eq!(out.get_value(0, "SENSFEAT"), FieldData::Text("x".to_string()));
        assert_eq!(out.get_value(0, "SENSFEAT_1"), FieldData::Text("y".to_string()));
    }
}
