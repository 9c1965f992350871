/*
This file is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT

Notes: The no-go hotspot workflow. No-go polygons lying outside the
(buffered) protected areas are reduced to one point per dissolved polygon,
clustered with DBSCAN, and the polygons belonging to clusters are exported
together with their attribute table.
*/

use crate::configs::Configs;
use crate::error::{Error, Result};
use crate::layer::Layer;
use crate::tools::data_tools::{
    where_clause_to_expression, CopyFeatures, FeatureToPoint, MakeFeatureLayer,
    SelectLayerByAttribute, TableToCsv,
};
use crate::tools::gis_analysis::{BufferVector, Clip, Dissolve, SpatialJoin, SymmetricalDifference};
use crate::tools::spatial_statistics::DensityBasedClustering;
use crate::tools::{run_tool, GeoprocessingTool};
use crate::units::{LinearDistance, LinearUnit};
use crate::utils::get_formatted_elapsed_time;
use crate::workspace::Workspace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

pub const PROTECTED_AREAS: &str = "protected_areas";
pub const PROTECTED_AREAS_BUFFERED: &str = "protected_areas_buffered";
pub const NOGO_POLYGONS: &str = "nogo_polygons";
pub const NOGO_POLYGONS_CLIP: &str = "nogo_polygons_clip";
pub const NOGO_OUTSIDE_PA: &str = "nogo_outside_pa";
pub const NOGO_POLYGONS_DISSOLVE: &str = "nogo_polygons_dissolve";
pub const NOGO_POINTS: &str = "nogo_points";
pub const NOGO_DENSITY_CLUSTERS: &str = "nogo_density_clusters";
pub const NOGO_CLUSTERED_POINTS: &str = "nogo_clustered_points";
pub const NOGO_JOIN: &str = "nogo_join";
pub const NOGO_CLUSTERED_POLYGONS: &str = "nogo_clustered_polygons";

/// Selects points that belong to a cluster.
pub const CLUSTERED_POINTS_CLAUSE: &str = "\"CLUSTER_ID\" > 0";
/// Selects joined polygons that received a cluster id.
pub const CLUSTERED_POLYGONS_CLAUSE: &str = "\"CLUSTER_ID\" IS NOT NULL And \"CLUSTER_ID\" > 0";

/// The three parameters that vary between runs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ParameterSet {
    /// Distance by which the protected areas are grown.
    pub buffer_distance: LinearDistance,
    /// DBSCAN neighbourhood radius.
    pub search_distance: LinearDistance,
    /// DBSCAN minimum cluster size, counting the point itself.
    pub min_features: usize,
}

impl Default for ParameterSet {
    fn default() -> ParameterSet {
        ParameterSet {
            buffer_distance: LinearDistance::new(250f64, LinearUnit::Meters),
            search_distance: LinearDistance::new(10f64, LinearUnit::Kilometers),
            min_features: 30,
        }
    }
}

/// Output file names. Each embeds the parameters of the run verbatim, e.g.
/// `nogo_dens_clust_250 Meters_10 Kilometers_30feats.shp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    pub clustered_points: String,
    pub clustered_polygons: String,
    pub table: String,
}

impl OutputNames {
    pub fn new(params: &ParameterSet) -> OutputNames {
        let suffix = format!(
            "{}_{}_{}feats",
            params.buffer_distance, params.search_distance, params.min_features
        );
        OutputNames {
            clustered_points: format!("nogo_dens_clust_{}.shp", suffix),
            clustered_polygons: format!("nogo_clust_polygons_{}.shp", suffix),
            table: format!("Table_{}.csv", suffix),
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub clustered_points_file: PathBuf,
    pub clustered_polygons_file: PathBuf,
    pub table_file: PathBuf,
    pub num_clusters: usize,
    pub num_clustered_points: usize,
    pub num_clustered_polygons: usize,
}

pub struct NoGoHotspots {
    configs: Configs,
}

impl NoGoHotspots {
    pub fn new(configs: Configs) -> NoGoHotspots {
        NoGoHotspots { configs }
    }

    pub fn configs(&self) -> &Configs {
        &self.configs
    }

    /// The tools of one run, in execution order.
    pub fn steps(&self, params: &ParameterSet) -> Vec<Box<dyn GeoprocessingTool>> {
        let names = OutputNames::new(params);
        let out_dir = &self.configs.output_directory;

        let mut symdiff =
            SymmetricalDifference::new(NOGO_POLYGONS, NOGO_POLYGONS_CLIP, NOGO_OUTSIDE_PA);
        symdiff.xy_tolerance = self.configs.xy_tolerance;

        let mut steps: Vec<Box<dyn GeoprocessingTool>> = Vec::with_capacity(14);
        steps.push(Box::new(MakeFeatureLayer::new(
            self.configs.protected_areas_path(),
            PROTECTED_AREAS,
        )));
        steps.push(Box::new(MakeFeatureLayer::new(
            self.configs.nogo_path(),
            NOGO_POLYGONS,
        )));
        steps.push(Box::new(BufferVector::new(
            PROTECTED_AREAS,
            PROTECTED_AREAS_BUFFERED,
            params.buffer_distance.clone(),
        )));
        steps.push(Box::new(Clip::new(
            NOGO_POLYGONS,
            PROTECTED_AREAS_BUFFERED,
            NOGO_POLYGONS_CLIP,
        )));
        steps.push(Box::new(symdiff));
        steps.push(Box::new(Dissolve::new(
            NOGO_OUTSIDE_PA,
            NOGO_POLYGONS_DISSOLVE,
            &[self.configs.dissolve_field.as_str()],
        )));
        steps.push(Box::new(FeatureToPoint::new(NOGO_POLYGONS_DISSOLVE, NOGO_POINTS)));
        steps.push(Box::new(DensityBasedClustering::new(
            NOGO_POINTS,
            NOGO_DENSITY_CLUSTERS,
            params.search_distance.clone(),
            params.min_features,
        )));
        steps.push(Box::new(SelectLayerByAttribute::new(
            NOGO_DENSITY_CLUSTERS,
            NOGO_CLUSTERED_POINTS,
            &where_clause_to_expression(CLUSTERED_POINTS_CLAUSE),
        )));
        steps.push(Box::new(SpatialJoin::new(
            NOGO_POLYGONS,
            NOGO_CLUSTERED_POINTS,
            NOGO_JOIN,
        )));
        steps.push(Box::new(SelectLayerByAttribute::new(
            NOGO_JOIN,
            NOGO_CLUSTERED_POLYGONS,
            &where_clause_to_expression(CLUSTERED_POLYGONS_CLAUSE),
        )));
        steps.push(Box::new(CopyFeatures::new(
            NOGO_CLUSTERED_POINTS,
            out_dir.join(&names.clustered_points),
        )));
        steps.push(Box::new(CopyFeatures::new(
            NOGO_CLUSTERED_POLYGONS,
            out_dir.join(&names.clustered_polygons),
        )));
        steps.push(Box::new(TableToCsv::new(
            NOGO_CLUSTERED_POLYGONS,
            out_dir.join(&names.table),
        )));
        steps
    }

    /// Runs the whole workflow for one parameter set.
    pub fn run(&self, params: &ParameterSet) -> Result<RunSummary> {
        let start = Instant::now();
        info!(
            "buffer {}, search distance {}, minimum {} features",
            params.buffer_distance, params.search_distance, params.min_features
        );

        for input in [self.configs.protected_areas_path(), self.configs.nogo_path()] {
            if !input.exists() {
                return Err(Error::MissingInput(input));
            }
        }
        fs::create_dir_all(&self.configs.output_directory)?;

        let mut workspace = if self.configs.keep_intermediate {
            Workspace::with_scratch_directory(&self.configs.workspace_directory)?
        } else {
            Workspace::new()
        };

        let steps = self.steps(params);
        let num_steps = steps.len();
        for (i, tool) in steps.iter().enumerate() {
            info!("step {} of {}", i + 1, num_steps);
            run_tool(tool.as_ref(), &mut workspace)?;
        }

        let points = workspace.get(NOGO_CLUSTERED_POINTS)?;
        let polygons = workspace.get(NOGO_CLUSTERED_POLYGONS)?;
        let names = OutputNames::new(params);
        let out_dir = &self.configs.output_directory;
        let summary = RunSummary {
            clustered_points_file: out_dir.join(&names.clustered_points),
            clustered_polygons_file: out_dir.join(&names.clustered_polygons),
            table_file: out_dir.join(&names.table),
            num_clusters: count_clusters(points),
            num_clustered_points: points.num_features(),
            num_clustered_polygons: polygons.num_features(),
        };

        if summary.num_clusters == 0 {
            warn!("no clusters of at least {} features were found", params.min_features);
        }
        info!(
            "{} clusters, {} clustered points, {} clustered polygons",
            summary.num_clusters, summary.num_clustered_points, summary.num_clustered_polygons
        );
        info!("Elapsed Time: {}", get_formatted_elapsed_time(start));
        Ok(summary)
    }
}

fn count_clusters(points: &Layer) -> usize {
    (0..points.num_features())
        .filter_map(|i| points.get_value(i, "CLUSTER_ID").as_i64())
        .collect::<BTreeSet<i64>>()
        .len()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_embed_parameters_verbatim() {
        let names = OutputNames::new(&ParameterSet::default());
        assert_eq!(
            names.clustered_points,
            "nogo_dens_clust_250 Meters_10 Kilometers_30feats.shp"
        );
        assert_eq!(
            names.clustered_polygons,
            "nogo_clust_polygons_250 Meters_10 Kilometers_30feats.shp"
        );
        assert_eq!(names.table, "Table_250 Meters_10 Kilometers_30feats.csv");

        let params = ParameterSet {
            buffer_distance: "0.5 Kilometers".parse().unwrap(),
            search_distance: "2500".parse().unwrap(),
            min_features: 5,
        };
        assert_eq!(OutputNames::new(&params).table, "Table_0.5 Kilometers_2500_5feats.csv");
    }

    #[test]
    fn selection_clauses_translate() {
        assert_eq!(where_clause_to_expression(CLUSTERED_POINTS_CLAUSE), "CLUSTER_ID > 0");
        assert_eq!(
            where_clause_to_expression(CLUSTERED_POLYGONS_CLAUSE),
            "CLUSTER_ID != null && CLUSTER_ID > 0"
        );
    }

    #[test]
    fn eleven_steps_in_order() {
        let runner = NoGoHotspots::new(Configs::new());
        let names: Vec<String> = runner
            .steps(&ParameterSet::default())
            .iter()
            .map(|t| t.get_tool_name())
            .collect();
        assert_eq!(
            names,
            vec![
                "MakeFeatureLayer",
                "MakeFeatureLayer",
                "BufferVector",
                "Clip",
                "SymmetricalDifference",
                "Dissolve",
                "FeatureToPoint",
                "DensityBasedClustering",
                "SelectLayerByAttribute",
                "SpatialJoin",
                "SelectLayerByAttribute",
                "CopyFeatures",
                "CopyFeatures",
                "TableToCsv",
            ]
        );
    }

    #[test]
    fn missing_input_stops_before_any_step() {
        let dir = tempfile::tempdir().unwrap();
        let mut configs = Configs::new();
        configs.input_directory = dir.path().join("Input");
        configs.output_directory = dir.path().join("Output");
        let err = NoGoHotspots::new(configs).run(&ParameterSet::default()).unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
        assert!(!dir.path().join("Output").exists());
    }
}
