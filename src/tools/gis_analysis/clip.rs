/*
This tool is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use crate::error::{Error, Result};
use crate::layer::{lines_of, points_of, polygons_of, polygons_to_geometry, Layer};
use crate::structures::{build_envelope_index, candidates, geometry_envelope};
use crate::tools::GeoprocessingTool;
use crate::vector::ShapeType;
use crate::workspace::Workspace;
use geo::{
    unary_union, Area, BooleanOps, Geometry, Intersects, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Polygon,
};
use tracing::debug;

/// This tool will extract all the features, or parts of features, that overlap with the features
/// of the clip layer. The input layer can be of any feature type (i.e. points, lines, polygons),
/// however, the clip layer must consist of polygons. Input attributes are retained unchanged.
pub struct Clip {
    name: String,
    description: String,
    toolbox: String,
    pub input: String,
    pub clip: String,
    pub output: String,
}

impl Clip {
    pub fn new(input: &str, clip: &str, output: &str) -> Clip {
        Clip {
            name: "Clip".to_string(),
            description:
                "Extract all the features, or parts of features, that overlap with the features of the clip layer."
                    .to_string(),
            toolbox: "GIS Analysis/Overlay Tools".to_string(),
            input: input.to_string(),
            clip: clip.to_string(),
            output: output.to_string(),
        }
    }
}

impl GeoprocessingTool for Clip {
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
        let output = clip(
            workspace.get(&self.input)?,
            workspace.get(&self.clip)?,
            &self.output,
        )?;
        workspace.insert(output)
    }
}

pub fn clip(input: &Layer, clip_layer: &Layer, output_name: &str) -> Result<Layer> {
    if clip_layer.shape_type != ShapeType::Polygon {
        return Err(Error::InvalidGeometryType {
            expected: "Polygon",
            found: clip_layer.shape_type.to_string(),
        });
    }
    let mut output = input.empty_like(output_name, input.shape_type, true);

    let clip_polys: Vec<Vec<Polygon<f64>>> = clip_layer
        .features
        .iter()
        .map(|f| polygons_of(&f.geometry))
        .collect();
    let tree = build_envelope_index(clip_layer.features.iter().map(|f| &f.geometry));

    for feature in &input.features {
        let env = match geometry_envelope(&feature.geometry) {
            Some(env) => env,
            None => continue,
        };
        let hits = candidates(&tree, &env);
        if hits.is_empty() {
            continue;
        }
        let mask_parts: Vec<Polygon<f64>> = hits
            .iter()
            .flat_map(|i| clip_polys[*i].iter().cloned())
            .collect();
        let mask = unary_union(&mask_parts);

        if let Some(geometry) = clip_geometry(&feature.geometry, input.shape_type, &mask) {
            output.add_feature(geometry, feature.attributes.clone());
        }
    }

    debug!(
        "clipped {} of {} features",
        output.num_features(),
        input.num_features()
    );
    Ok(output)
}

/// The part of `geometry` inside `mask`, or `None` if nothing remains.
fn clip_geometry(
    geometry: &Geometry<f64>,
    shape_type: ShapeType,
    mask: &MultiPolygon<f64>,
) -> Option<Geometry<f64>> {
    match shape_type {
        ShapeType::Polygon => {
            let subject = MultiPolygon::new(polygons_of(geometry));
            let clipped = subject.intersection(mask);
            let parts: Vec<Polygon<f64>> = clipped
                .0
                .into_iter()
                .filter(|p| p.unsigned_area() > 0f64)
                .collect();
            if parts.is_empty() {
                return None;
            }
            Some(polygons_to_geometry(parts))
        }
        ShapeType::PolyLine => {
            let subject = MultiLineString::new(lines_of(geometry));
            let mut parts: Vec<LineString<f64>> = mask
                .clip(&subject, false)
                .0
                .into_iter()
                .filter(|ls| ls.0.len() > 1)
                .collect();
            match parts.len() {
                0 => None,
                1 => Some(Geometry::LineString(parts.remove(0))),
                _ => Some(Geometry::MultiLineString(MultiLineString::new(parts))),
            }
        }
        ShapeType::Point | ShapeType::MultiPoint => {
            let mut inside: Vec<_> = points_of(geometry)
                .into_iter()
                .filter(|p| mask.intersects(p))
                .collect();
            match (shape_type, inside.len()) {
                (_, 0) => None,
                (ShapeType::Point, _) => Some(Geometry::Point(inside.remove(0))),
                _ => Some(Geometry::MultiPoint(MultiPoint::new(inside))),
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tools::test_data::{point_layer, polygon_layer, square};
    use crate::vector::FieldData;
    use geo::{Area, LineString};

    #[test]
    fn clips_polygons_to_union_of_clip_features() {
        let input = polygon_layer(
            "nogo",
            &[
                (square(50.0, 50.0, 100.0), "straddles"),
                (square(10.0, 10.0, 10.0), "inside"),
                (square(1000.0, 1000.0, 10.0), "outside"),
            ],
        );
        // two adjacent clip squares covering (0,0)-(200,100)
        let clip_layer = polygon_layer(
            "pa",
            &[(square(0.0, 0.0, 100.0), "a"), (square(100.0, 0.0, 100.0), "b")],
        );
        let out = clip(&input, &clip_layer, "clipped").unwrap();
        assert_eq!(out.num_features(), 2);
        assert_eq!(out.get_value(0, "SENSFEAT"), FieldData::Text("straddles".to_string()));
        assert!((out.features[0].geometry.unsigned_area() - 5000.0).abs() < 1e-6);
        assert!((out.features[1].geometry.unsigned_area() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn clips_points_and_lines() {
        let clip_layer = polygon_layer("pa", &[(square(0.0, 0.0, 10.0), "a")]);
        let pts = point_layer("pts", &[(5.0, 5.0), (50.0, 5.0)]);
        let out = clip(&pts, &clip_layer, "pts_clip").unwrap();
        assert_eq!(out.num_features(), 1);
        assert_eq!(out.get_value(0, "ID"), FieldData::Int(0));

        let mut lines = Layer::new("lines", ShapeType::PolyLine);
        lines.add_feature(
            Geometry::LineString(LineString::from(vec![(-5.0, 5.0), (15.0, 5.0)])),
            vec![],
        );
        let out = clip(&lines, &clip_layer, "lines_clip").unwrap();
        assert_eq!(out.num_features(), 1);
        let l = lines_of(&out.features[0].geometry);
        assert_eq!(l.len(), 1);
        assert!(l[0].0.iter().all(|c| c.x >= -1e-9 && c.x <= 10.0 + 1e-9));
    }

    #[test]
    fn clip_layer_must_be_polygons() {
        let pts = point_layer("pts", &[(5.0, 5.0)]);
        assert!(matches!(
            clip(&pts, &pts, "x"),
            Err(Error::InvalidGeometryType { .. })
        ));
    }
}
