/*
This file is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
pub mod data_tools;
pub mod gis_analysis;
pub mod spatial_statistics;

use crate::error::Result;
use crate::utils::get_formatted_elapsed_time;
use crate::workspace::Workspace;
use std::time::Instant;
use tracing::{debug, info};

/// A geoprocessing tool. Tools read their input layers from a `Workspace`
/// by name and store their output layer back into it.
pub trait GeoprocessingTool {
    fn get_tool_name(&self) -> String;
    fn get_tool_description(&self) -> String;
    fn get_toolbox(&self) -> String;
    fn run(&self, workspace: &mut Workspace) -> Result<()>;
}

/// Runs a tool, tagging any failure with the tool's name.
pub fn run_tool(tool: &dyn GeoprocessingTool, workspace: &mut Workspace) -> Result<()> {
    let name = tool.get_tool_name();
    info!("{} ({})", name, tool.get_toolbox());
    debug!("{}", tool.get_tool_description());
    let start = Instant::now();
    tool.run(workspace).map_err(|e| e.in_step(&name))?;
    debug!("{} elapsed time: {}", name, get_formatted_elapsed_time(start));
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_data {
    use crate::layer::Layer;
    use crate::vector::{AttributeField, FieldData, FieldDataType, ShapeType};
    use geo::{Geometry, Point, Polygon, Rect};

    pub fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        Rect::new((x, y), (x + size, y + size)).to_polygon()
    }

    /// A polygon layer with a SENSFEAT text field.
    pub fn polygon_layer(name: &str, items: &[(Polygon<f64>, &str)]) -> Layer {
        let mut layer = Layer::new(name, ShapeType::Polygon);
        layer.add_field(AttributeField::new("SENSFEAT", FieldDataType::Text, 20u8, 0u8));
        for (p, s) in items {
            layer.add_feature(
                Geometry::Polygon(p.clone()),
                vec![FieldData::Text(s.to_string())],
            );
        }
        layer
    }

    /// A point layer with an integer ID field.
    pub fn point_layer(name: &str, coords: &[(f64, f64)]) -> Layer {
        let mut layer = Layer::new(name, ShapeType::Point);
        layer.add_field(AttributeField::new("ID", FieldDataType::Int, 6u8, 0u8));
        for (i, (x, y)) in coords.iter().enumerate() {
            layer.add_feature(
                Geometry::Point(Point::new(*x, *y)),
                vec![FieldData::Int(i as i64)],
            );
        }
        layer
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;

    struct Failing;

    impl GeoprocessingTool for Failing {
        fn get_tool_name(&self) -> String {
            "Failing".to_string()
        }
        fn get_tool_description(&self) -> String {
            String::new()
        }
        fn get_toolbox(&self) -> String {
            "Test".to_string()
        }
        fn run(&self, workspace: &mut Workspace) -> Result<()> {
            workspace.get("absent").map(|_| ())
        }
    }

    #[test]
    fn failures_name_the_tool() {
        let mut ws = Workspace::new();
        match run_tool(&Failing, &mut ws) {
            Err(Error::Step { step, source }) => {
                assert_eq!(step, "Failing");
                assert!(matches!(*source, Error::LayerNotFound(_)));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
