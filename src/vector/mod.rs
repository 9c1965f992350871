/*
This file is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

// Only the ESRI Shapefile format is supported.
pub mod shapefile;

// exports identifiers from private sub-modules in the current module namespace
pub use crate::structures::Point2D;
pub use crate::vector::shapefile::attributes::{
    AttributeField, AttributeHeader, DateData, FieldData, FieldDataType, ShapefileAttributes,
};
pub use crate::vector::shapefile::geometry::{ShapeType, ShapefileGeometry};
pub use crate::vector::shapefile::Shapefile;
