/*
This tool is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use crate::error::{Error, Result};
use crate::layer::{polygons_of, polygons_to_geometry, unique_name, Layer};
use crate::structures::{build_envelope_index, candidates, geometry_envelope, RectangleWithData};
use crate::tools::GeoprocessingTool;
use crate::vector::{AttributeField, FieldData, FieldDataType, ShapeType};
use crate::workspace::Workspace;
use geo::{unary_union, Area, BooleanOps, Euclidean, Length, MultiPolygon, Polygon};
use rstar::RTree;

/// Default XY tolerance, in layer units.
pub const DEFAULT_XY_TOLERANCE: f64 = 0.001;

/// Computes the geometric symmetric difference of two polygon layers: the
/// parts of the input features not overlapped by any update feature, plus
/// the parts of the update features not overlapped by any input feature.
///
/// All attributes of both layers are joined. Output fields are
/// `FID_<input>`, the input fields, `FID_<update>` and the update fields;
/// values belonging to the layer a feature did not come from are `-1` and
/// null. Parts thinner than the XY tolerance are discarded.
pub struct SymmetricalDifference {
    name: String,
    description: String,
    toolbox: String,
    pub input: String,
    pub update: String,
    pub output: String,
    pub xy_tolerance: f64,
}

impl SymmetricalDifference {
    pub fn new(input: &str, update: &str, output: &str) -> SymmetricalDifference {
        SymmetricalDifference {
            name: "SymmetricalDifference".to_string(),
            description: "Outputs the features of two layers that do not overlap.".to_string(),
            toolbox: "GIS Analysis/Overlay Tools".to_string(),
            input: input.to_string(),
            update: update.to_string(),
            output: output.to_string(),
            xy_tolerance: DEFAULT_XY_TOLERANCE,
        }
    }
}

impl GeoprocessingTool for SymmetricalDifference {
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
        let output = symmetrical_difference(
            workspace.get(&self.input)?,
            workspace.get(&self.update)?,
            &self.output,
            self.xy_tolerance,
        )?;
        workspace.insert(output)
    }
}

pub fn symmetrical_difference(
    input: &Layer,
    update: &Layer,
    output_name: &str,
    xy_tolerance: f64,
) -> Result<Layer> {
    for layer in [input, update] {
        if layer.shape_type != ShapeType::Polygon {
            return Err(Error::InvalidGeometryType {
                expected: "Polygon",
                found: layer.shape_type.to_string(),
            });
        }
    }

    // FID_<input>, input fields, FID_<update>, update fields
    let mut fields: Vec<AttributeField> = vec![];
    let input_fid = unique_name(&fields, &format!("FID_{}", input.name));
    fields.push(AttributeField::new(&input_fid, FieldDataType::Int, 9u8, 0u8));
    for f in &input.fields {
        let mut f = f.clone();
        f.name = unique_name(&fields, &f.name);
        fields.push(f);
    }
    let update_fid = unique_name(&fields, &format!("FID_{}", update.name));
    fields.push(AttributeField::new(&update_fid, FieldDataType::Int, 9u8, 0u8));
    for f in &update.fields {
        let mut f = f.clone();
        f.name = unique_name(&fields, &f.name);
        fields.push(f);
    }

    let mut output = input.empty_like(output_name, ShapeType::Polygon, false);
    output.fields = fields;

    let input_polys: Vec<Vec<Polygon<f64>>> =
        input.features.iter().map(|f| polygons_of(&f.geometry)).collect();
    let update_polys: Vec<Vec<Polygon<f64>>> =
        update.features.iter().map(|f| polygons_of(&f.geometry)).collect();
    let input_tree = build_envelope_index(input.features.iter().map(|f| &f.geometry));
    let update_tree = build_envelope_index(update.features.iter().map(|f| &f.geometry));

    let null_update = vec![FieldData::Null; update.fields.len()];
    for (fid, feature) in input.features.iter().enumerate() {
        let parts = erase(&input_polys[fid], &feature.geometry, &update_tree, &update_polys);
        let parts = remove_slivers(parts, xy_tolerance);
        if parts.is_empty() {
            continue;
        }
        let mut atts = vec![FieldData::Int(fid as i64)];
        atts.extend(feature.attributes.iter().cloned());
        atts.push(FieldData::Int(-1));
        atts.extend(null_update.iter().cloned());
        output.add_feature(polygons_to_geometry(parts), atts);
    }

    let null_input = vec![FieldData::Null; input.fields.len()];
    for (fid, feature) in update.features.iter().enumerate() {
        let parts = erase(&update_polys[fid], &feature.geometry, &input_tree, &input_polys);
        let parts = remove_slivers(parts, xy_tolerance);
        if parts.is_empty() {
            continue;
        }
        let mut atts = vec![FieldData::Int(-1)];
        atts.extend(null_input.iter().cloned());
        atts.push(FieldData::Int(fid as i64));
        atts.extend(feature.attributes.iter().cloned());
        output.add_feature(polygons_to_geometry(parts), atts);
    }

    Ok(output)
}

/// Subtracts every indexed polygon overlapping `subject` from it.
fn erase(
    subject: &[Polygon<f64>],
    geometry: &geo::Geometry<f64>,
    tree: &RTree<RectangleWithData<usize>>,
    others: &[Vec<Polygon<f64>>],
) -> Vec<Polygon<f64>> {
    if subject.is_empty() {
        return vec![];
    }
    let subject = MultiPolygon::new(subject.to_vec());
    let hits = match geometry_envelope(geometry) {
        Some(env) => candidates(tree, &env),
        None => vec![],
    };
    if hits.is_empty() {
        return subject.0;
    }
    let eraser_parts: Vec<Polygon<f64>> = hits
        .iter()
        .flat_map(|i| others[*i].iter().cloned())
        .collect();
    let eraser = unary_union(&eraser_parts);
    subject.difference(&eraser).0
}

/// Drops parts whose area is no more than `xy_tolerance` times their
/// perimeter, i.e. parts narrower than about the tolerance.
pub(crate) fn remove_slivers(parts: Vec<Polygon<f64>>, xy_tolerance: f64) -> Vec<Polygon<f64>> {
    parts
        .into_iter()
        .filter(|p| {
            let area = p.unsigned_area();
            area > 0f64 && area > xy_tolerance * Euclidean.length(p.exterior())
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tools::gis_analysis::clip;
    use crate::tools::test_data::{polygon_layer, square};
    use geo::{Area, Rect};

    #[test]
    fn difference_against_own_clip_keeps_outside_parts() {
        let nogo = polygon_layer(
            "nogo",
            &[
                (square(0.0, 0.0, 10.0), "inside"),
                (square(95.0, 0.0, 10.0), "straddles"),
                (square(500.0, 0.0, 10.0), "outside"),
            ],
        );
        let pa = polygon_layer("pa", &[(square(-50.0, -50.0, 150.0), "pa")]);
        let clipped = clip(&nogo, &pa, "nogo_clip").unwrap();
        let out = symmetrical_difference(&nogo, &clipped, "nogo_outside", DEFAULT_XY_TOLERANCE)
            .unwrap();

        assert_eq!(out.num_features(), 2);
        let names: Vec<&str> = out.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["FID_nogo", "SENSFEAT", "FID_nogo_c", "SENSFEAT_1"]);

        assert_eq!(out.get_value(0, "FID_nogo"), FieldData::Int(1));
        assert_eq!(out.get_value(0, "SENSFEAT"), FieldData::Text("straddles".to_string()));
        assert_eq!(out.get_value(0, "FID_nogo_c"), FieldData::Int(-1));
        assert_eq!(out.get_value(0, "SENSFEAT_1"), FieldData::Null);
        assert!((out.features[0].geometry.unsigned_area() - 50.0).abs() < 1e-6);
        assert_eq!(out.get_value(1, "SENSFEAT"), FieldData::Text("outside".to_string()));
    }

    #[test]
    fn update_only_parts_carry_update_attributes() {
        let a = polygon_layer("a", &[(square(0.0, 0.0, 10.0), "a")]);
        let b = polygon_layer("b", &[(square(5.0, 0.0, 10.0), "b")]);
        let out = symmetrical_difference(&a, &b, "x", DEFAULT_XY_TOLERANCE).unwrap();
        assert_eq!(out.num_features(), 2);
        assert_eq!(out.get_value(1, "FID_a"), FieldData::Int(-1));
        assert_eq!(out.get_value(1, "SENSFEAT"), FieldData::Null);
        assert_eq!(out.get_value(1, "FID_b"), FieldData::Int(0));
        assert_eq!(out.get_value(1, "SENSFEAT_1"), FieldData::Text("b".to_string()));
        assert!((out.features[1].geometry.unsigned_area() - 50.0).abs() < 1e-6);
    }

    #[test]
    fn slivers_are_removed() {
        let thin = Rect::new((0.0, 0.0), (100.0, 0.0001)).to_polygon();
        let fat = square(0.0, 0.0, 1.0);
        let kept = remove_slivers(vec![thin, fat], DEFAULT_XY_TOLERANCE);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].unsigned_area(), 1.0);
    }
}
