/*
This file is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use crate::error::{Error, Result};
use crate::pipeline::ParameterSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the settings file looked for in the working directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// A structure to hold run settings. Backed by a settings.json file; any
/// key missing from the file takes its default value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Configs {
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
    pub workspace_directory: PathBuf,
    pub protected_areas_file: String,
    pub nogo_file: String,
    pub dissolve_field: String,
    pub xy_tolerance: f64,
    pub keep_intermediate: bool,
    pub verbose_mode: bool,
    pub parameter_sets: Vec<ParameterSet>,
}

impl Configs {
    pub fn new() -> Configs {
        Configs {
            input_directory: PathBuf::from("Input"),
            output_directory: PathBuf::from("Output"),
            workspace_directory: PathBuf::from("No_Go_Clusters.gdb"),
            protected_areas_file: "SAPAD_OR_2020_Q3_Ownership selection 1.shp".to_string(),
            nogo_file: "nogo_PA.shp".to_string(),
            dissolve_field: "SENSFEAT".to_string(),
            xy_tolerance: 0.001,
            keep_intermediate: false,
            verbose_mode: false,
            parameter_sets: vec![ParameterSet::default()],
        }
    }

    pub fn protected_areas_path(&self) -> PathBuf {
        self.input_directory.join(&self.protected_areas_file)
    }

    pub fn nogo_path(&self) -> PathBuf {
        self.input_directory.join(&self.nogo_file)
    }
}

impl Default for Configs {
    fn default() -> Configs {
        Configs::new()
    }
}

/// Loads settings from `config_file`, which must exist, or, when no file is
/// named, from settings.json in the working directory if there is one.
pub fn get_configs(config_file: Option<&Path>) -> Result<Configs> {
    let path = match config_file {
        Some(p) => {
            if !p.exists() {
                return Err(Error::MissingInput(p.to_path_buf()));
            }
            p.to_path_buf()
        }
        None => {
            let p = std::env::current_dir()?.join(SETTINGS_FILE);
            if !p.exists() {
                return Ok(Configs::new());
            }
            p
        }
    };
    let contents = fs::read_to_string(path)?;
    let configs: Configs = serde_json::from_str(&contents)?;
    Ok(configs)
}

pub fn save_configs(configs: &Configs, config_file: &Path) -> Result<()> {
    let configs_json = serde_json::to_string_pretty(configs)?;
    fs::write(config_file, configs_json)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("settings.json");
        fs::write(
            &file,
            r#"{ "nogo_file": "other.shp",
                 "parameter_sets": [ { "buffer_distance": "500 Meters",
                                       "search_distance": "5 Kilometers",
                                       "min_features": 10 } ] }"#,
        )
        .unwrap();
        let configs = get_configs(Some(&file)).unwrap();
        assert_eq!(configs.nogo_file, "other.shp");
        assert_eq!(configs.dissolve_field, "SENSFEAT");
        assert_eq!(configs.nogo_path(), PathBuf::from("Input").join("other.shp"));
        assert_eq!(configs.parameter_sets.len(), 1);
        assert_eq!(configs.parameter_sets[0].min_features, 10);
        assert_eq!(configs.parameter_sets[0].search_distance.meters(), 5000.0);
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("settings.json");
        let mut configs = Configs::new();
        configs.keep_intermediate = true;
        save_configs(&configs, &file).unwrap();
        assert_eq!(get_configs(Some(&file)).unwrap(), configs);
        let text = fs::read_to_string(&file).unwrap();
        assert!(text.contains("\"250 Meters\""));
    }

    #[test]
    fn missing_named_file_is_an_error() {
        let err = get_configs(Some(Path::new("/no/such/settings.json"))).unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
    }

    #[test]
    fn bad_distance_is_a_config_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("settings.json");
        fs::write(
            &file,
            r#"{ "parameter_sets": [ { "buffer_distance": "wide",
                 "search_distance": "5 Kilometers", "min_features": 10 } ] }"#,
        )
        .unwrap();
        assert!(matches!(get_configs(Some(&file)), Err(Error::Config(_))));
    }
}
