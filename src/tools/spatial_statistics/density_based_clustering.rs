/*
This tool is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use crate::error::{Error, Result};
use crate::layer::{points_of, Layer};
use crate::tools::GeoprocessingTool;
use crate::units::LinearDistance;
use crate::vector::{AttributeField, FieldData, FieldDataType, ShapeType};
use crate::workspace::Workspace;
use geo::{Dbscan, Point};
use std::collections::BTreeSet;
use tracing::debug;

/// The cluster id given to points that belong to no cluster.
pub const NOISE_CLUSTER_ID: i64 = -1;

/// This tool finds clusters of point features using the DBSCAN algorithm. A point is a core
/// point when at least `min_features` points, itself included, lie within `search_distance`
/// of it. Clusters are grown from core points; points reachable from no core point are noise.
///
/// The output holds every input point with the fields `SOURCE_ID` (the input FID), the input
/// attributes, and `CLUSTER_ID`. Cluster ids start at 1 and are numbered in order of
/// discovery; noise points receive -1.
pub struct DensityBasedClustering {
    name: String,
    description: String,
    toolbox: String,
    pub input: String,
    pub output: String,
    pub search_distance: LinearDistance,
    pub min_features: usize,
}

impl DensityBasedClustering {
    pub fn new(
        input: &str,
        output: &str,
        search_distance: LinearDistance,
        min_features: usize,
    ) -> DensityBasedClustering {
        DensityBasedClustering {
            name: "DensityBasedClustering".to_string(),
            description: "Finds clusters of point features amid surrounding noise (DBSCAN)."
                .to_string(),
            toolbox: "Spatial Statistics/Mapping Clusters".to_string(),
            input: input.to_string(),
            output: output.to_string(),
            search_distance,
            min_features,
        }
    }
}

impl GeoprocessingTool for DensityBasedClustering {
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
        let output = density_based_clustering(
            workspace.get(&self.input)?,
            &self.output,
            self.search_distance.meters(),
            self.min_features,
        )?;
        workspace.insert(output)
    }
}

pub fn density_based_clustering(
    input: &Layer,
    output_name: &str,
    search_distance: f64,
    min_features: usize,
) -> Result<Layer> {
    if input.shape_type != ShapeType::Point {
        return Err(Error::InvalidGeometryType {
            expected: "Point",
            found: input.shape_type.to_string(),
        });
    }
    if !search_distance.is_finite() || search_distance <= 0f64 {
        return Err(Error::InvalidDistance(search_distance.to_string()));
    }

    let mut output = Layer::new(output_name, ShapeType::Point);
    output.projection = input.projection.clone();
    output.date = input.date;
    output.add_field(AttributeField::new("SOURCE_ID", FieldDataType::Int, 9u8, 0u8));
    for field in &input.fields {
        let name = output.unique_field_name(&field.name);
        output.add_field(AttributeField { name, ..field.clone() });
    }
    let cluster_field = output.unique_field_name("CLUSTER_ID");
    output.add_field(AttributeField::new(&cluster_field, FieldDataType::Int, 6u8, 0u8));

    // features without a location take no part in the clustering
    let located: Vec<(usize, Point<f64>)> = input
        .features
        .iter()
        .enumerate()
        .filter_map(|(fid, f)| points_of(&f.geometry).first().map(|p| (fid, *p)))
        .collect();
    let points: Vec<Point<f64>> = located.iter().map(|(_, p)| *p).collect();
    let labels = points.as_slice().dbscan(search_distance, min_features.max(1));

    let mut clusters = BTreeSet::new();
    for ((fid, point), label) in located.iter().zip(labels) {
        let cluster_id = match label {
            Some(l) => {
                clusters.insert(l);
                l as i64 + 1
            }
            None => NOISE_CLUSTER_ID,
        };
        let mut atts = Vec::with_capacity(output.fields.len());
        atts.push(FieldData::Int(*fid as i64));
        atts.extend(input.features[*fid].attributes.iter().cloned());
        atts.push(FieldData::Int(cluster_id));
        output.add_feature(geo::Geometry::Point(*point), atts);
    }

    debug!(
        "{} clusters among {} points (search distance {} m, minimum {} features)",
        clusters.len(),
        points.len(),
        search_distance,
        min_features
    );
    Ok(output)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tools::test_data::{point_layer, polygon_layer, square};

    fn cluster_ids(layer: &Layer) -> Vec<i64> {
        (0..layer.num_features())
            .map(|i| layer.get_value(i, "CLUSTER_ID").as_i64().unwrap())
            .collect()
    }

    #[test]
    fn finds_two_clusters_and_noise() {
        let input = point_layer(
            "pts",
            &[
                (0.0, 0.0),
                (1.0, 0.0),
                (2.0, 0.0),
                (100.0, 100.0),
                (50.0, 50.0),
                (101.0, 100.0),
                (102.0, 100.0),
            ],
        );
        let out = density_based_clustering(&input, "clusters", 1.5, 3).unwrap();
        assert_eq!(out.num_features(), 7);
        assert_eq!(cluster_ids(&out), vec![1, 1, 1, 2, -1, 2, 2]);
        assert_eq!(out.fields[0].name, "SOURCE_ID");
        assert_eq!(out.get_value(4, "SOURCE_ID"), FieldData::Int(4));
        assert_eq!(out.get_value(4, "ID"), FieldData::Int(4));
    }

    #[test]
    fn min_features_counts_the_point_itself() {
        let input = point_layer("pts", &[(0.0, 0.0), (10.0, 0.0)]);
        let out = density_based_clustering(&input, "c", 10.5, 2).unwrap();
        assert_eq!(cluster_ids(&out), vec![1, 1]);
        let out = density_based_clustering(&input, "c", 10.5, 3).unwrap();
        assert_eq!(cluster_ids(&out), vec![-1, -1]);
    }

    #[test]
    fn cluster_id_zero_never_occurs() {
        let coords: Vec<(f64, f64)> = (0..20).map(|i| ((i % 5) as f64 * 3.0, (i / 5) as f64 * 40.0)).collect();
        let input = point_layer("pts", &coords);
        let out = density_based_clustering(&input, "c", 3.5, 2).unwrap();
        assert!(cluster_ids(&out).iter().all(|id| *id != 0));
        assert_eq!(cluster_ids(&out).iter().max(), Some(&4));
    }

    #[test]
    fn rejects_bad_input() {
        let polys = polygon_layer("p", &[(square(0.0, 0.0, 1.0), "a")]);
        assert!(matches!(
            density_based_clustering(&polys, "c", 1.0, 2),
            Err(Error::InvalidGeometryType { .. })
        ));
        let pts = point_layer("pts", &[(0.0, 0.0)]);
        assert!(matches!(
            density_based_clustering(&pts, "c", 0.0, 2),
            Err(Error::InvalidDistance(_))
        ));
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let pts = point_layer("pts", &[]);
        let out = density_based_clustering(&pts, "c", 10.0, 2).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.fields.len(), 3);
    }
}
