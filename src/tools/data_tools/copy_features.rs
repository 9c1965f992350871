/*
This tool is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use crate::error::Result;
use crate::tools::GeoprocessingTool;
use crate::workspace::Workspace;
use std::path::PathBuf;

/// Writes the features of a layer to a shapefile, overwriting any existing file. A layer with
/// no features produces a valid zero-record shapefile.
pub struct CopyFeatures {
    name: String,
    description: String,
    toolbox: String,
    pub input: String,
    pub output_file: PathBuf,
}

impl CopyFeatures {
    pub fn new<P: Into<PathBuf>>(input: &str, output_file: P) -> CopyFeatures {
        CopyFeatures {
            name: "CopyFeatures".to_string(),
            description: "Copies the features of a layer to a new shapefile.".to_string(),
            toolbox: "Data Tools".to_string(),
            input: input.to_string(),
            output_file: output_file.into(),
        }
    }
}

impl GeoprocessingTool for CopyFeatures {
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
        workspace.get(&self.input)?.write(&self.output_file)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layer::Layer;
    use crate::tools::test_data::point_layer;
    use crate::vector::FieldData;

    #[test]
    fn copies_layer_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nogo_dens_clust_250 Meters_10 Kilometers_30feats.shp");
        let mut ws = Workspace::new();
        ws.insert(point_layer("pts", &[(1.0, 2.0), (3.0, 4.0)])).unwrap();

        CopyFeatures::new("pts", &path).run(&mut ws).unwrap();

        let back = Layer::read("back", &path).unwrap();
        assert_eq!(back.num_features(), 2);
        assert_eq!(back.get_value(1, "ID"), FieldData::Int(1));
    }

    #[test]
    fn unknown_layer_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::new();
        assert!(CopyFeatures::new("nope", dir.path().join("x.shp"))
            .run(&mut ws)
            .is_err());
    }
}
