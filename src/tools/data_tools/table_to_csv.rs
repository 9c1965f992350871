/*
This tool is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use crate::error::Result;
use crate::layer::Layer;
use crate::tools::GeoprocessingTool;
use crate::vector::FieldData;
use crate::workspace::Workspace;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Exports the attribute table of a layer to a comma-separated values file. The first
/// column holds each feature's FID, followed by one column per attribute field. Real
/// values are rounded to the field's decimal count and null values are left empty.
pub struct TableToCsv {
    name: String,
    description: String,
    toolbox: String,
    pub input: String,
    pub output_file: PathBuf,
}

impl TableToCsv {
    pub fn new<P: Into<PathBuf>>(input: &str, output_file: P) -> TableToCsv {
        TableToCsv {
            name: "TableToCsv".to_string(),
            description: "Exports the attribute table of a layer to a CSV file.".to_string(),
            toolbox: "Data Tools".to_string(),
            input: input.to_string(),
            output_file: output_file.into(),
        }
    }
}

impl GeoprocessingTool for TableToCsv {
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
        table_to_csv(workspace.get(&self.input)?, &self.output_file)
    }
}

pub fn table_to_csv<P: AsRef<Path>>(layer: &Layer, output_file: P) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_file.as_ref())?;

    let write_fid = layer.get_field_num("FID").is_none();
    let mut header: Vec<&str> = vec![];
    if write_fid {
        header.push("FID");
    }
    header.extend(layer.fields.iter().map(|f| f.name.as_str()));
    writer.write_record(&header)?;

    for (fid, feature) in layer.features.iter().enumerate() {
        let mut row: Vec<String> = Vec::with_capacity(header.len());
        if write_fid {
            row.push(fid.to_string());
        }
        for (field, value) in layer.fields.iter().zip(&feature.attributes) {
            let s = match value {
                FieldData::Real(v) => {
                    let multiplier = 10f64.powi(field.decimal_count as i32);
                    format!("{}", (v * multiplier).round() / multiplier)
                }
                other => other.to_string(),
            };
            row.push(s);
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;

    debug!(
        "wrote {} rows of '{}' to {}",
        layer.num_features(),
        layer.name,
        output_file.as_ref().display()
    );
    Ok(())
}
