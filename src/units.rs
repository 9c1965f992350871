/*
This file is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

//! Linear distances written the way geoprocessing parameters usually are,
//! e.g. `250 Meters` or `10 Kilometers`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LinearUnit {
    Meters,
    Kilometers,
    Centimeters,
    Millimeters,
    Decimeters,
    Feet,
    Inches,
    Yards,
    Miles,
    NauticalMiles,
}

impl LinearUnit {
    /// Number of metres in one unit.
    pub fn to_meters(&self) -> f64 {
        match self {
            LinearUnit::Meters => 1.0,
            LinearUnit::Kilometers => 1000.0,
            LinearUnit::Centimeters => 0.01,
            LinearUnit::Millimeters => 0.001,
            LinearUnit::Decimeters => 0.1,
            LinearUnit::Feet => 0.3048,
            LinearUnit::Inches => 0.0254,
            LinearUnit::Yards => 0.9144,
            LinearUnit::Miles => 1609.344,
            LinearUnit::NauticalMiles => 1852.0,
        }
    }

    fn parse(s: &str) -> Option<LinearUnit> {
        let unit = match s.to_lowercase().replace(['_', ' '], "").as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => LinearUnit::Meters,
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => {
                LinearUnit::Kilometers
            }
            "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => {
                LinearUnit::Centimeters
            }
            "mm" | "millimeter" | "millimeters" | "millimetre" | "millimetres" => {
                LinearUnit::Millimeters
            }
            "dm" | "decimeter" | "decimeters" | "decimetre" | "decimetres" => {
                LinearUnit::Decimeters
            }
            "ft" | "foot" | "feet" => LinearUnit::Feet,
            "in" | "inch" | "inches" => LinearUnit::Inches,
            "yd" | "yard" | "yards" => LinearUnit::Yards,
            "mi" | "mile" | "miles" => LinearUnit::Miles,
            "nm" | "nauticalmile" | "nauticalmiles" => LinearUnit::NauticalMiles,
            _ => return None,
        };
        Some(unit)
    }
}

/// A distance parameter. The text it was parsed from is kept verbatim
/// because output file names embed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LinearDistance {
    text: String,
    value: f64,
    unit: LinearUnit,
}

impl LinearDistance {
    pub fn new(value: f64, unit: LinearUnit) -> LinearDistance {
        let name = format!("{:?}", unit);
        LinearDistance {
            text: format!("{} {}", value, name),
            value,
            unit,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> LinearUnit {
        self.unit
    }

    /// The distance converted to metres.
    pub fn meters(&self) -> f64 {
        self.value * self.unit.to_meters()
    }
}

impl FromStr for LinearDistance {
    type Err = Error;

    fn from_str(s: &str) -> Result<LinearDistance> {
        let trimmed = s.trim();
        let invalid = || Error::InvalidDistance(s.to_string());
        let split = trimmed
            .find(|c: char| c.is_alphabetic())
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(split);
        let value = number.trim().parse::<f64>().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        // a bare number is taken to be in the layer's (metre) units
        let unit = if unit.trim().is_empty() {
            LinearUnit::Meters
        } else {
            LinearUnit::parse(unit.trim()).ok_or_else(invalid)?
        };
        Ok(LinearDistance {
            text: s.to_string(),
            value,
            unit,
        })
    }
}

impl TryFrom<String> for LinearDistance {
    type Error = Error;

    fn try_from(s: String) -> Result<LinearDistance> {
        s.parse()
    }
}

impl From<LinearDistance> for String {
    fn from(d: LinearDistance) -> String {
        d.text
    }
}

impl fmt::Display for LinearDistance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
