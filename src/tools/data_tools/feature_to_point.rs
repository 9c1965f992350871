/*
This tool is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use crate::error::Result;
use crate::layer::Layer;
use crate::tools::GeoprocessingTool;
use crate::vector::{AttributeField, FieldData, FieldDataType, ShapeType};
use crate::workspace::Workspace;
use geo::{Centroid, Geometry, InteriorPoint};
use tracing::{debug, warn};

/// Where the output point of a feature is placed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PointLocation {
    /// A point guaranteed to lie within the feature.
    #[default]
    Inside,
    /// The centre of mass, which may fall outside concave polygons.
    Centroid,
}

/// Creates a point layer with one point for each input feature. Output attributes are the
/// input attributes followed by `ORIG_FID`, the index of the source feature. Features with
/// no geometry produce no point.
pub struct FeatureToPoint {
    name: String,
    description: String,
    toolbox: String,
    pub input: String,
    pub output: String,
    pub location: PointLocation,
}

impl FeatureToPoint {
    pub fn new(input: &str, output: &str) -> FeatureToPoint {
        FeatureToPoint {
            name: "FeatureToPoint".to_string(),
            description: "Creates a point layer from the interior points or centroids of features."
                .to_string(),
            toolbox: "Data Tools".to_string(),
            input: input.to_string(),
            output: output.to_string(),
            location: PointLocation::default(),
        }
    }
}

impl GeoprocessingTool for FeatureToPoint {
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
        let output = feature_to_point(workspace.get(&self.input)?, &self.output, self.location)?;
        workspace.insert(output)
    }
}

pub fn feature_to_point(input: &Layer, output_name: &str, location: PointLocation) -> Result<Layer> {
    let mut output = input.empty_like(output_name, ShapeType::Point, true);
    let fid_field = output.unique_field_name("ORIG_FID");
    output.add_field(AttributeField::new(&fid_field, FieldDataType::Int, 9u8, 0u8));

    let mut skipped = 0usize;
    for (fid, feature) in input.features.iter().enumerate() {
        let point = if feature.is_empty() {
            None
        } else {
            match location {
                PointLocation::Inside => feature.geometry.interior_point(),
                PointLocation::Centroid => feature.geometry.centroid(),
            }
        };
        match point {
            Some(p) => {
                let mut atts = feature.attributes.clone();
                atts.push(FieldData::Int(fid as i64));
                output.add_feature(Geometry::Point(p), atts);
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("{}: {} features without a point location were skipped", input.name, skipped);
    }
    debug!("{} points created", output.num_features());
    Ok(output)
}
