/*
This tool is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use crate::error::Result;
use crate::layer::Layer;
use crate::tools::GeoprocessingTool;
use crate::workspace::Workspace;
use std::path::PathBuf;

/// Loads a shapefile into the workspace so that later tools can refer to it by name.
/// The tool fails if the file does not exist.
pub struct MakeFeatureLayer {
    name: String,
    description: String,
    toolbox: String,
    pub input_file: PathBuf,
    pub output: String,
}

impl MakeFeatureLayer {
    pub fn new<P: Into<PathBuf>>(input_file: P, output: &str) -> MakeFeatureLayer {
        MakeFeatureLayer {
            name: "MakeFeatureLayer".to_string(),
            description: "Creates a named feature layer from a shapefile.".to_string(),
            toolbox: "Data Tools".to_string(),
            input_file: input_file.into(),
            output: output.to_string(),
        }
    }
}

impl GeoprocessingTool for MakeFeatureLayer {
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
        let layer = Layer::read(&self.output, &self.input_file)?;
        workspace.insert(layer)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;
    use crate::tools::test_data::{polygon_layer, square};

    #[test]
    fn loads_layer_under_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nogo_PA.shp");
        polygon_layer("src", &[(square(0.0, 0.0, 10.0), "Aloe")])
            .write(&path)
            .unwrap();

        let mut ws = Workspace::new();
        MakeFeatureLayer::new(&path, "nogo_polygons")
            .run(&mut ws)
            .unwrap();
        let layer = ws.get("nogo_polygons").unwrap();
        assert_eq!(layer.num_features(), 1);
        assert_eq!(layer.name, "nogo_polygons");
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::new();
        let result = MakeFeatureLayer::new(dir.path().join("absent.shp"), "x").run(&mut ws);
        assert!(matches!(result, Err(Error::MissingInput(_))));
        assert!(ws.is_empty());
    }
}
