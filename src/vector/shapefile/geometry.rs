/*
This file is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use crate::structures::Point2D;
use std::f64;
use std::fmt;
use std::io::{Error, ErrorKind};

/// A single shape record. Only the planar (x, y) part of a record is
/// retained; z and measure ordinates are skipped when reading.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapefileGeometry {
    pub shape_type: ShapeType,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub num_parts: i32,
    pub num_points: i32,
    pub parts: Vec<i32>,
    pub points: Vec<Point2D>,
}

impl ShapefileGeometry {
    pub fn new(shape_type: ShapeType) -> ShapefileGeometry {
        ShapefileGeometry {
            shape_type,
            ..Default::default()
        }
    }

    fn update_extent(&mut self, p: &Point2D) {
        self.x_min = self.x_min.min(p.x);
        self.x_max = self.x_max.max(p.x);
        self.y_min = self.y_min.min(p.y);
        self.y_max = self.y_max.max(p.y);
    }

    /// Adds a single Point2D to the ShapefileGeometry's points array.
    pub fn add_point(&mut self, p: Point2D) {
        self.update_extent(&p);
        self.points.push(p);
        self.num_points += 1;
    }

    /// Adds a part of Point2Ds to the ShapefileGeometry.
    pub fn add_part(&mut self, points: &[Point2D]) {
        self.parts.push(self.points.len() as i32);
        self.num_parts += 1i32;
        for p in points {
            self.update_extent(p);
            self.points.push(*p);
        }
        self.num_points += points.len() as i32;
    }

    /// Returns the points of part `part_num`.
    pub fn get_part(&self, part_num: usize) -> &[Point2D] {
        if part_num >= self.parts.len() {
            return &[];
        }
        let st = (self.parts[part_num].max(0) as usize).min(self.points.len());
        let end = if part_num + 1 < self.parts.len() {
            (self.parts[part_num + 1].max(0) as usize).min(self.points.len())
        } else {
            self.points.len()
        };
        if st > end {
            return &[];
        }
        &self.points[st..end]
    }

    /// Returns the length of the record content (shape type onward) in bytes.
    /// Only planar shape types can be written.
    pub fn get_length(&self) -> i32 {
        4i32 + match self.shape_type.base_shape_type() {
            ShapeType::Point => 16i32,
            ShapeType::MultiPoint => 36i32 + self.num_points * 16i32,
            ShapeType::PolyLine | ShapeType::Polygon => {
                40i32 + self.num_parts * 4i32 + self.num_points * 16i32
            }
            _ => 0i32,
        }
    }

    /// Checks whether or not a part in a polygon is a hole. Outer rings are
    /// stored clockwise and holes counter-clockwise.
    pub fn is_hole(&self, part_num: usize) -> bool {
        if self.shape_type.base_shape_type() != ShapeType::Polygon {
            return false;
        }
        let ring = self.get_part(part_num);
        if ring.len() < 4 {
            return false;
        }
        signed_area(ring) > 0f64
    }
}

/// Shoelace signed area; positive for counter-clockwise rings.
pub(crate) fn signed_area(ring: &[Point2D]) -> f64 {
    let mut area = 0f64;
    for w in ring.windows(2) {
        area += w[0].x * w[1].y - w[1].x * w[0].y;
    }
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            area += last.x * first.y - first.x * last.y;
        }
    }
    area / 2f64
}

impl Default for ShapefileGeometry {
    fn default() -> ShapefileGeometry {
        ShapefileGeometry {
            shape_type: ShapeType::Null,
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
            num_parts: 0i32,
            num_points: 0i32,
            parts: vec![],
            points: vec![],
        }
    }
}

impl fmt::Display for ShapefileGeometry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "shape_type: {}\nextent: ({}, {}) - ({}, {})\nnum_parts: {}\nnum_points: {}",
            self.shape_type,
            self.x_min,
            self.y_min,
            self.x_max,
            self.y_max,
            self.num_parts,
            self.num_points
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ShapeType {
    #[default]
    Null,
    Point,
    PolyLine,
    Polygon,
    MultiPoint,
    PointZ,
    PolyLineZ,
    PolygonZ,
    MultiPointZ,
    PointM,
    PolyLineM,
    PolygonM,
    MultiPointM,
}

impl ShapeType {
    pub fn from_int(value: i32) -> Result<ShapeType, Error> {
        Ok(match value {
            0 => ShapeType::Null,
            1 => ShapeType::Point,
            3 => ShapeType::PolyLine,
            5 => ShapeType::Polygon,
            8 => ShapeType::MultiPoint,
            11 => ShapeType::PointZ,
            13 => ShapeType::PolyLineZ,
            15 => ShapeType::PolygonZ,
            18 => ShapeType::MultiPointZ,
            21 => ShapeType::PointM,
            23 => ShapeType::PolyLineM,
            25 => ShapeType::PolygonM,
            28 => ShapeType::MultiPointM,
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    format!("Unrecognized ShapeType {}", value),
                ))
            }
        })
    }

    pub fn to_int(&self) -> i32 {
        match self {
            ShapeType::Null => 0,
            ShapeType::Point => 1,
            ShapeType::PolyLine => 3,
            ShapeType::Polygon => 5,
            ShapeType::MultiPoint => 8,
            ShapeType::PointZ => 11,
            ShapeType::PolyLineZ => 13,
            ShapeType::PolygonZ => 15,
            ShapeType::MultiPointZ => 18,
            ShapeType::PointM => 21,
            ShapeType::PolyLineM => 23,
            ShapeType::PolygonM => 25,
            ShapeType::MultiPointM => 28,
        }
    }

    pub fn base_shape_type(&self) -> ShapeType {
        match self {
            ShapeType::Null => ShapeType::Null,
            ShapeType::Point | ShapeType::PointZ | ShapeType::PointM => ShapeType::Point,
            ShapeType::PolyLine | ShapeType::PolyLineZ | ShapeType::PolyLineM => {
                ShapeType::PolyLine
            }
            ShapeType::Polygon | ShapeType::PolygonZ | ShapeType::PolygonM => ShapeType::Polygon,
            ShapeType::MultiPoint | ShapeType::MultiPointZ | ShapeType::MultiPointM => {
                ShapeType::MultiPoint
            }
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            ShapeType::Null => "Null",
            ShapeType::Point => "Point",
            ShapeType::PolyLine => "PolyLine",
            ShapeType::Polygon => "Polygon",
            ShapeType::MultiPoint => "MultiPoint",
            ShapeType::PointZ => "PointZ",
            ShapeType::PolyLineZ => "PolyLineZ",
            ShapeType::PolygonZ => "PolygonZ",
            ShapeType::MultiPointZ => "MultiPointZ",
            ShapeType::PointM => "PointM",
            ShapeType::PolyLineM => "PolyLineM",
            ShapeType::PolygonM => "PolygonM",
            ShapeType::MultiPointM => "MultiPointM",
        };
        write!(f, "{}", printable)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn square(cw: bool) -> Vec<Point2D> {
        let mut pts = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 1.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(0.0, 0.0),
        ];
        if !cw {
            pts.reverse();
        }
        pts
    }

    #[test]
    fn parts_and_holes() {
        let mut sfg = ShapefileGeometry::new(ShapeType::Polygon);
        sfg.add_part(&square(true));
        sfg.add_part(&square(false));
        assert_eq!(sfg.num_parts, 2);
        assert_eq!(sfg.num_points, 10);
        assert_eq!(sfg.get_part(1).len(), 5);
        assert!(!sfg.is_hole(0));
        assert!(sfg.is_hole(1));
        assert_eq!(sfg.get_length(), 4 + 40 + 2 * 4 + 10 * 16);
        assert_eq!((sfg.x_min, sfg.x_max), (0.0, 1.0));
    }

    #[test]
    fn shape_type_codes() {
        assert_eq!(ShapeType::from_int(15).unwrap(), ShapeType::PolygonZ);
        assert_eq!(ShapeType::PolygonZ.base_shape_type(), ShapeType::Polygon);
        assert_eq!(ShapeType::MultiPointM.to_int(), 28);
        assert!(ShapeType::from_int(7).is_err());
    }
}
