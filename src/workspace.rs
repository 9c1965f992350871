/*
This file is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

//! The registry of named layers that geoprocessing tools read from and
//! write to.

use crate::error::{Error, Result};
use crate::layer::Layer;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct Workspace {
    layers: BTreeMap<String, Layer>,
    scratch_directory: Option<PathBuf>,
    persist_intermediate: bool,
}

impl Workspace {
    /// A purely in-memory workspace.
    pub fn new() -> Workspace {
        Workspace::default()
    }

    /// A workspace that also writes every inserted layer as a shapefile
    /// under `directory`, which is created if necessary.
    pub fn with_scratch_directory<P: AsRef<Path>>(directory: P) -> Result<Workspace> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;
        Ok(Workspace {
            layers: BTreeMap::new(),
            scratch_directory: Some(directory),
            persist_intermediate: true,
        })
    }

    pub fn scratch_directory(&self) -> Option<&Path> {
        self.scratch_directory.as_deref()
    }

    /// Stores a layer under its name, replacing any layer already there.
    pub fn insert(&mut self, layer: Layer) -> Result<()> {
        info!("{}: {} features", layer.name, layer.num_features());
        if layer.is_empty() {
            warn!("layer '{}' is empty", layer.name);
        }
        if self.persist_intermediate {
            if let Some(dir) = &self.scratch_directory {
                if layer.is_empty() {
                    warn!("not persisting empty layer '{}'", layer.name);
                } else {
                    let path = dir.join(format!("{}.shp", layer.name));
                    layer.write(&path)?;
                    debug!("persisted '{}' to {}", layer.name, path.display());
                }
            }
        }
        if self.layers.contains_key(&layer.name) {
            debug!("overwriting layer '{}'", layer.name);
        }
        self.layers.insert(layer.name.clone(), layer);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Layer> {
        self.layers
            .get(name)
            .ok_or_else(|| Error::LayerNotFound(name.to_string()))
    }

    pub fn remove(&mut self, name: &str) -> Result<Layer> {
        self.layers
            .remove(name)
            .ok_or_else(|| Error::LayerNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    pub fn layer_names(&self) -> Vec<String> {
        self.layers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
