/*
This file is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT

Notes: An in-memory feature class. Geometry is held as geo-types so that
the geometry engine in `geo` can work on it directly; attributes are held
as dBASE-style fields so that a layer round-trips through a Shapefile.
*/

use crate::error::{Error, Result};
use crate::structures::Point2D;
use crate::vector::shapefile::truncate_str;
use crate::vector::{
    AttributeField, DateData, FieldData, ShapeType, Shapefile, ShapefileGeometry,
};
use geo::orient::Direction;
use geo::{
    Area, Contains, Coord, Geometry, GeometryCollection, LineString, MultiLineString,
    MultiPoint, MultiPolygon, Orient, Point, Polygon, Winding,
};
use std::path::Path;
use tracing::{debug, warn};

/// Maximum length of a dBASE field name.
pub const MAX_FIELD_NAME_LENGTH: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry<f64>,
    pub attributes: Vec<FieldData>,
}

impl Feature {
    pub fn new(geometry: Geometry<f64>, attributes: Vec<FieldData>) -> Feature {
        Feature {
            geometry,
            attributes,
        }
    }

    /// True for features with no shape (null shapefile records).
    pub fn is_empty(&self) -> bool {
        is_empty_geometry(&self.geometry)
    }
}

/// A named feature class. A feature's FID is its index in `features`.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub shape_type: ShapeType,
    pub fields: Vec<AttributeField>,
    pub features: Vec<Feature>,
    pub projection: String,
    pub date: Option<DateData>,
}

impl Layer {
    pub fn new(name: &str, shape_type: ShapeType) -> Layer {
        Layer {
            name: name.to_string(),
            shape_type: shape_type.base_shape_type(),
            fields: vec![],
            features: vec![],
            projection: String::new(),
            date: None,
        }
    }

    /// A new, featureless layer carrying this layer's projection and date
    /// stamp and, optionally, its fields.
    pub fn empty_like(&self, name: &str, shape_type: ShapeType, copy_fields: bool) -> Layer {
        let mut layer = Layer::new(name, shape_type);
        layer.projection = self.projection.clone();
        layer.date = self.date;
        if copy_fields {
            layer.fields = self.fields.clone();
        }
        layer
    }

    /// Reads a shapefile into a layer called `name`.
    pub fn read<P: AsRef<Path>>(name: &str, path: P) -> Result<Layer> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        let sf = Shapefile::read(&path.to_string_lossy())?;
        if sf.projection.is_empty() {
            warn!("{}: projection file not located", path.display());
        }
        Layer::from_shapefile(name, &sf)
    }

    /// Writes the layer as a shapefile. `path` may omit the `.shp` extension.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut sf = self.to_shapefile(&path.as_ref().to_string_lossy())?;
        sf.write()?;
        debug!(
            "wrote {} features of '{}' to {}",
            self.num_features(),
            self.name,
            sf.file_name
        );
        Ok(())
    }

    pub fn from_shapefile(name: &str, sf: &Shapefile) -> Result<Layer> {
        let mut layer = Layer::new(name, sf.header.shape_type);
        layer.projection = sf.projection.clone();
        layer.date = sf.attributes.header.date();
        layer.fields = sf.attributes.fields.clone();
        for (i, record) in sf.records.iter().enumerate() {
            if sf.attributes.is_deleted.get(i).copied().unwrap_or(false) {
                continue;
            }
            let attributes = sf
                .attributes
                .get_record(i)
                .map(|r| r.to_vec())
                .unwrap_or_else(|| vec![FieldData::Null; layer.fields.len()]);
            layer
                .features
                .push(Feature::new(record_to_geometry(record), attributes));
        }
        Ok(layer)
    }

    pub fn to_shapefile(&self, file_name: &str) -> Result<Shapefile> {
        let mut sf = Shapefile::new(file_name, self.shape_type)?;
        sf.projection = self.projection.clone();
        for field in &self.fields {
            sf.attributes.add_field(field);
        }
        sf.attributes.header.set_date(self.date);
        for feature in &self.features {
            sf.add_record(geometry_to_record(&feature.geometry, self.shape_type))?;
            sf.attributes.add_record(feature.attributes.clone(), false);
        }
        Ok(sf)
    }

    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get_field_num(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Like `get_field_num` but a missing field is an error.
    pub fn require_field(&self, name: &str) -> Result<usize> {
        self.get_field_num(name).ok_or_else(|| Error::FieldNotFound {
            layer: self.name.clone(),
            field: name.to_string(),
        })
    }

    pub fn get_value(&self, fid: usize, field_name: &str) -> FieldData {
        match (self.features.get(fid), self.get_field_num(field_name)) {
            (Some(f), Some(j)) => f.attributes.get(j).cloned().unwrap_or(FieldData::Null),
            _ => FieldData::Null,
        }
    }

    /// Appends a field; existing features receive `Null` for it.
    pub fn add_field(&mut self, field: AttributeField) {
        self.fields.push(field);
        for f in self.features.iter_mut() {
            f.attributes.push(FieldData::Null);
        }
    }

    /// Adds a feature. Short attribute rows are padded with `Null`.
    pub fn add_feature(&mut self, geometry: Geometry<f64>, mut attributes: Vec<FieldData>) {
        attributes.resize(self.fields.len(), FieldData::Null);
        self.features.push(Feature::new(geometry, attributes));
    }

    /// Returns `base` (truncated to the dBASE limit) or, if a field of that
    /// name exists, the first free `base_1`, `base_2`, ... variant.
    pub fn unique_field_name(&self, base: &str) -> String {
        unique_name(&self.fields, base)
    }
}

pub(crate) fn unique_name(fields: &[AttributeField], base: &str) -> String {
    let taken = |n: &str| fields.iter().any(|f| f.name.eq_ignore_ascii_case(n));
    let name = truncate_str(base, MAX_FIELD_NAME_LENGTH).to_string();
    if !taken(&name) {
        return name;
    }
    let mut i = 1;
    loop {
        let suffix = format!("_{}", i);
        let stem = truncate_str(base, MAX_FIELD_NAME_LENGTH - suffix.len());
        let candidate = format!("{}{}", stem, suffix);
        if !taken(&candidate) {
            return candidate;
        }
        i += 1;
    }
}

pub fn empty_geometry() -> Geometry<f64> {
    Geometry::GeometryCollection(GeometryCollection::empty())
}

pub fn is_empty_geometry(geometry: &Geometry<f64>) -> bool {
    match geometry {
        Geometry::GeometryCollection(gc) => gc.0.iter().all(is_empty_geometry),
        Geometry::MultiPoint(mp) => mp.0.is_empty(),
        Geometry::LineString(ls) => ls.0.is_empty(),
        Geometry::MultiLineString(mls) => mls.0.iter().all(|ls| ls.0.is_empty()),
        Geometry::Polygon(p) => p.exterior().0.is_empty(),
        Geometry::MultiPolygon(mp) => mp.0.iter().all(|p| p.exterior().0.is_empty()),
        _ => false,
    }
}

/// All polygonal parts of a geometry.
pub fn polygons_of(geometry: &Geometry<f64>) -> Vec<Polygon<f64>> {
    match geometry {
        Geometry::Polygon(p) => vec![p.clone()],
        Geometry::MultiPolygon(mp) => mp.0.clone(),
        Geometry::Rect(r) => vec![r.to_polygon()],
        Geometry::Triangle(t) => vec![t.to_polygon()],
        Geometry::GeometryCollection(gc) => gc.0.iter().flat_map(polygons_of).collect(),
        _ => vec![],
    }
}

/// All points of a geometry.
pub fn points_of(geometry: &Geometry<f64>) -> Vec<Point<f64>> {
    match geometry {
        Geometry::Point(p) => vec![*p],
        Geometry::MultiPoint(mp) => mp.0.clone(),
        Geometry::GeometryCollection(gc) => gc.0.iter().flat_map(points_of).collect(),
        _ => vec![],
    }
}

/// All linear parts of a geometry.
pub fn lines_of(geometry: &Geometry<f64>) -> Vec<LineString<f64>> {
    match geometry {
        Geometry::Line(l) => vec![LineString::from(vec![l.start, l.end])],
        Geometry::LineString(ls) => vec![ls.clone()],
        Geometry::MultiLineString(mls) => mls.0.clone(),
        Geometry::GeometryCollection(gc) => gc.0.iter().flat_map(lines_of).collect(),
        _ => vec![],
    }
}

/// Packs polygons back into a single geometry, or an empty one.
pub fn polygons_to_geometry(mut polygons: Vec<Polygon<f64>>) -> Geometry<f64> {
    match polygons.len() {
        0 => empty_geometry(),
        1 => Geometry::Polygon(polygons.remove(0)),
        _ => Geometry::MultiPolygon(MultiPolygon::new(polygons)),
    }
}

fn ring(points: &[Point2D]) -> LineString<f64> {
    LineString::from(
        points
            .iter()
            .map(|p| Coord::from(*p))
            .collect::<Vec<Coord<f64>>>(),
    )
}

/// Converts a shapefile record to a geo geometry. Polygon rings are sorted
/// into outer rings (clockwise) and holes (counter-clockwise); each hole is
/// given to the smallest outer ring that contains it.
pub fn record_to_geometry(record: &ShapefileGeometry) -> Geometry<f64> {
    match record.shape_type.base_shape_type() {
        ShapeType::Null => empty_geometry(),
        ShapeType::Point => match record.points.first() {
            Some(p) => Geometry::Point(Point::new(p.x, p.y)),
            None => empty_geometry(),
        },
        ShapeType::MultiPoint => Geometry::MultiPoint(MultiPoint::new(
            record.points.iter().map(|p| Point::new(p.x, p.y)).collect(),
        )),
        ShapeType::PolyLine => {
            let mut lines: Vec<LineString<f64>> = (0..record.parts.len())
                .map(|i| ring(record.get_part(i)))
                .filter(|ls| ls.0.len() > 1)
                .collect();
            match lines.len() {
                0 => empty_geometry(),
                1 => Geometry::LineString(lines.remove(0)),
                _ => Geometry::MultiLineString(MultiLineString::new(lines)),
            }
        }
        _ => {
            let rings: Vec<LineString<f64>> = (0..record.parts.len())
                .map(|i| ring(record.get_part(i)))
                .filter(|ls| ls.0.len() > 3)
                .collect();
            let (mut outers, holes): (Vec<LineString<f64>>, Vec<LineString<f64>>) =
                rings.into_iter().partition(|r| r.is_cw());
            let mut holes = holes;
            if outers.is_empty() {
                // wrongly wound file; treat every ring as an outer ring
                outers = std::mem::take(&mut holes);
            }
            let mut polygons: Vec<Polygon<f64>> = outers
                .into_iter()
                .map(|r| Polygon::new(r, vec![]))
                .collect();
            for hole in holes {
                let first = match hole.0.first() {
                    Some(c) => *c,
                    None => continue,
                };
                let host = polygons
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.contains(&first) || p.exterior().contains(&first))
                    .min_by(|(_, a), (_, b)| {
                        a.unsigned_area().total_cmp(&b.unsigned_area())
                    })
                    .map(|(i, _)| i);
                match host {
                    Some(i) => polygons[i].interiors_push(hole),
                    None => polygons.push(Polygon::new(hole, vec![])),
                }
            }
            polygons_to_geometry(polygons)
        }
    }
}

/// Converts a geometry to a record of the given (base) shape type. Parts of
/// the geometry that the shape type cannot hold are dropped; if nothing is
/// left a null record is produced.
pub fn geometry_to_record(geometry: &Geometry<f64>, shape_type: ShapeType) -> ShapefileGeometry {
    let null = ShapefileGeometry::new(ShapeType::Null);
    match shape_type.base_shape_type() {
        ShapeType::Point => match points_of(geometry).first() {
            Some(p) => {
                let mut sfg = ShapefileGeometry::new(ShapeType::Point);
                sfg.add_point(Point2D::new(p.x(), p.y()));
                sfg
            }
            None => null,
        },
        ShapeType::MultiPoint => {
            let points = points_of(geometry);
            if points.is_empty() {
                return null;
            }
            let mut sfg = ShapefileGeometry::new(ShapeType::MultiPoint);
            for p in points {
                sfg.add_point(Point2D::new(p.x(), p.y()));
            }
            sfg
        }
        ShapeType::PolyLine => {
            let mut sfg = ShapefileGeometry::new(ShapeType::PolyLine);
            for ls in lines_of(geometry).iter().filter(|ls| ls.0.len() > 1) {
                let pts: Vec<Point2D> = ls.0.iter().map(|c| Point2D::from(*c)).collect();
                sfg.add_part(&pts);
            }
            if sfg.num_parts == 0 {
                return null;
            }
            sfg
        }
        ShapeType::Polygon => {
            let mut sfg = ShapefileGeometry::new(ShapeType::Polygon);
            for polygon in polygons_of(geometry) {
                if polygon.exterior().0.len() < 4 {
                    continue;
                }
                // shapefile convention: clockwise shells, counter-clockwise holes
                let polygon = polygon.orient(Direction::Reversed);
                for r in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                    let pts: Vec<Point2D> = r.0.iter().map(|c| Point2D::from(*c)).collect();
                    sfg.add_part(&pts);
                }
            }
            if sfg.num_parts == 0 {
                return null;
            }
            sfg
        }
        _ => null,
    }
}

/// The base shape type that naturally holds a geometry.
pub fn shape_type_of(geometry: &Geometry<f64>) -> ShapeType {
    match geometry {
        Geometry::Point(_) => ShapeType::Point,
        Geometry::MultiPoint(_) => ShapeType::MultiPoint,
        Geometry::Line(_) | Geometry::LineString(_) | Geometry::MultiLineString(_) => {
            ShapeType::PolyLine
        }
        Geometry::Polygon(_)
        | Geometry::MultiPolygon(_)
        | Geometry::Rect(_)
        | Geometry::Triangle(_) => ShapeType::Polygon,
        Geometry::GeometryCollection(_) => ShapeType::Null,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::vector::FieldDataType;
    use geo::{polygon, Area};
    use tempfile::tempdir;

    fn donut() -> Polygon<f64> {
        polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)],
            interiors: [[(x: 4.0, y: 4.0), (x: 6.0, y: 4.0), (x: 6.0, y: 6.0), (x: 4.0, y: 6.0)]],
        )
    }

    #[test]
    fn polygon_record_round_trip() {
        let g = Geometry::Polygon(donut());
        let sfg = geometry_to_record(&g, ShapeType::Polygon);
        assert_eq!(sfg.num_parts, 2);
        assert!(!sfg.is_hole(0));
        assert!(sfg.is_hole(1));
        let back = record_to_geometry(&sfg);
        match back {
            Geometry::Polygon(p) => {
                assert_eq!(p.interiors().len(), 1);
                assert_eq!(p.unsigned_area(), 96.0);
            }
            other => panic!("expected a polygon, got {:?}", other),
        }
    }

    #[test]
    fn multipolygon_and_null_records() {
        let a = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
        let b = polygon![(x: 5.0, y: 5.0), (x: 6.0, y: 5.0), (x: 6.0, y: 6.0), (x: 5.0, y: 6.0)];
        let g = polygons_to_geometry(vec![a, b]);
        let sfg = geometry_to_record(&g, ShapeType::Polygon);
        assert_eq!(sfg.num_parts, 2);
        assert!(matches!(record_to_geometry(&sfg), Geometry::MultiPolygon(_)));

        let null = geometry_to_record(&empty_geometry(), ShapeType::Polygon);
        assert_eq!(null.shape_type, ShapeType::Null);
        assert!(is_empty_geometry(&record_to_geometry(&null)));
    }

    #[test]
    fn unique_field_names() {
        let mut layer = Layer::new("t", ShapeType::Point);
        layer.add_field(AttributeField::new("CLUSTER_ID", FieldDataType::Int, 9u8, 0u8));
        assert_eq!(layer.unique_field_name("SENSFEAT"), "SENSFEAT");
        assert_eq!(layer.unique_field_name("CLUSTER_ID"), "CLUSTER__1");
        assert_eq!(layer.unique_field_name("CLUSTER_IDENTITY"), "CLUSTER__1");
        layer.add_field(AttributeField::new("CLUSTER__1", FieldDataType::Int, 9u8, 0u8));
        assert_eq!(layer.unique_field_name("CLUSTER_ID"), "CLUSTER__2");
    }

    #[test]
    fn layer_write_and_read() {
        let dir = tempdir().unwrap();
        let mut layer = Layer::new("nogo", ShapeType::Polygon);
        layer.add_field(AttributeField::new("SENSFEAT", FieldDataType::Text, 30u8, 0u8));
        layer.add_feature(
            Geometry::Polygon(donut()),
            vec![FieldData::Text("Aloe".to_string())],
        );
        layer.add_feature(empty_geometry(), vec![]);
        layer.write(dir.path().join("nogo")).unwrap();

        let back = Layer::read("nogo", dir.path().join("nogo.shp")).unwrap();
        assert_eq!(back.shape_type, ShapeType::Polygon);
        assert_eq!(back.num_features(), 2);
        assert_eq!(back.get_value(0, "SENSFEAT"), FieldData::Text("Aloe".to_string()));
        assert_eq!(back.get_value(1, "SENSFEAT"), FieldData::Null);
        assert!(back.features[1].is_empty());
        assert!(back.require_field("MISSING").is_err());
    }

    #[test]
    fn missing_input() {
        let err = Layer::read("x", "/no/such/file.shp").unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
    }
}
