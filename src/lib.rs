/*
This file is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

//! Finds spatial clusters of no-go exclusion polygons that lie outside
//! protected areas.
//!
//! Each geoprocessing step is a tool (see [`tools`]) that reads named layers
//! from a [`workspace::Workspace`] and writes its result back under a new
//! name. [`pipeline::NoGoHotspots`] chains the tools into the full workflow.

pub mod configs;
pub mod error;
pub mod layer;
pub mod pipeline;
pub mod structures;
pub mod tools;
pub mod units;
pub mod utils;
pub mod vector;
pub mod workspace;

pub use crate::error::{Error, Result};
