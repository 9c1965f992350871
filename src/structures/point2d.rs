/*
This file is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use geo::Coord;
use std::fmt;

/// A 2-D point, with x and y fields.
#[derive(Default, Copy, Clone, Debug)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(x: {}, y: {})", self.x, self.y)
    }
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Point2D {
        Point2D { x, y }
    }
}

impl Eq for Point2D {}

impl PartialEq for Point2D {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl From<Coord<f64>> for Point2D {
    fn from(c: Coord<f64>) -> Point2D {
        Point2D::new(c.x, c.y)
    }
}

impl From<Point2D> for Coord<f64> {
    fn from(p: Point2D) -> Coord<f64> {
        Coord { x: p.x, y: p.y }
    }
}
