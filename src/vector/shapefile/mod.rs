/*
This file is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT

Notes: The logic behind working with the ESRI Shapefile format. Sibling
files (.shx, .dbf, .prj) are located by appending their extension to the
.shp stem, since layer names may legitimately contain dots.
*/

pub mod attributes;
pub mod geometry;

use self::attributes::*;
use self::geometry::*;
use crate::structures::Point2D;
use crate::utils::{ByteOrderReader, Endianness};
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use chrono::prelude::*;
use std::f64;
use std::fmt;
use std::fs;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufWriter, Cursor, Error, ErrorKind};

#[derive(Debug, Default, Clone)]
pub struct ShapefileHeader {
    file_code: i32,            // BigEndian; value is 9994
    pub file_length: i32,      // BigEndian
    pub version: i32,          // LittleEndian
    pub shape_type: ShapeType, // LittleEndian
    pub x_min: f64,            // LittleEndian
    pub y_min: f64,            // LittleEndian
    pub x_max: f64,            // LittleEndian
    pub y_max: f64,            // LittleEndian
    pub z_min: f64,            // LittleEndian; 0f64 for planar files
    pub z_max: f64,            // LittleEndian; 0f64 for planar files
    pub m_min: f64,            // LittleEndian; 0f64 for planar files
    pub m_max: f64,            // LittleEndian; 0f64 for planar files
}

impl fmt::Display for ShapefileHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "file_code: {}\nfile_length: {}\nversion: {}\nshape_type: {}\nx_min: {}\nx_max: {}\ny_min: {}\ny_max: {}",
            self.file_code,
            self.file_length,
            self.version,
            self.shape_type,
            self.x_min,
            self.x_max,
            self.y_min,
            self.y_max,
        )
    }
}

/// `Shapefile` is an in-memory ESRI Shapefile.
///
/// Examples:
///
/// ```ignore
/// // Read a Shapefile from a file.
/// let input = Shapefile::read("nogo_PA.shp")?;
///
/// // Create a new output Shapefile
/// let mut output = Shapefile::new("out.shp", ShapeType::Point)?;
/// output.projection = input.projection.clone();
///
/// // add attributes
/// let fid = AttributeField::new("ORIG_FID", FieldDataType::Int, 9u8, 0u8);
/// output.attributes.add_field(&fid);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Shapefile {
    pub file_name: String,
    pub file_mode: String,
    pub header: ShapefileHeader,
    pub num_records: usize,
    pub records: Vec<ShapefileGeometry>,
    pub attributes: ShapefileAttributes,
    pub projection: String,
}

/// Appends `.shp` unless the name already ends with it.
fn shp_file_name(file_name: &str) -> String {
    if file_name.to_lowercase().ends_with(".shp") {
        file_name.to_string()
    } else {
        format!("{}.shp", file_name)
    }
}

fn invalid_data(msg: &str) -> Error {
    Error::new(ErrorKind::InvalidData, msg.to_string())
}

impl Shapefile {
    pub fn read(file_name: &str) -> Result<Shapefile, Error> {
        let mut sf = Shapefile {
            file_name: file_name.to_string(),
            file_mode: "r".to_string(),
            ..Default::default()
        };
        sf.read_file()?;
        Ok(sf)
    }

    pub fn new(file_name: &str, file_type: ShapeType) -> Result<Shapefile, Error> {
        let mut sf = Shapefile {
            file_name: shp_file_name(file_name),
            file_mode: "w".to_string(),
            ..Default::default()
        };
        sf.header.shape_type = file_type;
        Ok(sf)
    }

    /// Path of a sibling file sharing this shapefile's stem, e.g. `dbf`.
    pub fn sibling_file(&self, extension: &str) -> String {
        let stem = if self.file_name.to_lowercase().ends_with(".shp") {
            &self.file_name[..self.file_name.len() - 4]
        } else {
            &self.file_name[..]
        };
        format!("{}.{}", stem, extension)
    }

    pub fn get_record(&self, index: usize) -> Option<&ShapefileGeometry> {
        self.records.get(index)
    }

    /// Adds a new ShapefileGeometry. Null records are accepted in any file.
    pub fn add_record(&mut self, geometry: ShapefileGeometry) -> Result<(), Error> {
        if self.file_mode == "r" {
            return Err(Error::new(
                ErrorKind::Other,
                "The file was opened in read-only mode.",
            ));
        }
        if geometry.shape_type != ShapeType::Null
            && geometry.shape_type != self.header.shape_type
        {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Attempt to add a ShapefileGeometry record of the wrong ShapeType.",
            ));
        }
        self.records.push(geometry);
        self.num_records += 1;
        Ok(())
    }

    fn read_file(&mut self) -> Result<(), Error> {
        ///////////////////////////////
        // First read the geometries //
        ///////////////////////////////
        let buffer = fs::read(&self.file_name)?;
        let file_size = buffer.len();
        if file_size < 100 {
            return Err(invalid_data("The .shp file is too short to contain a header."));
        }

        // The shapefile header mixes big- and little-endian words.
        let mut bor = ByteOrderReader::new(Cursor::new(buffer), Endianness::BigEndian)?;
        self.header.file_code = bor.read_i32()?;
        if self.header.file_code != 9994 {
            return Err(invalid_data("The file is not an ESRI Shapefile (bad file code)."));
        }
        bor.seek(24)?;
        self.header.file_length = bor.read_i32()?;

        bor.set_byte_order(Endianness::LittleEndian);
        self.header.version = bor.read_i32()?;
        self.header.shape_type = ShapeType::from_int(bor.read_i32()?)?;
        self.header.x_min = bor.read_f64()?;
        self.header.y_min = bor.read_f64()?;
        self.header.x_max = bor.read_f64()?;
        self.header.y_max = bor.read_f64()?;
        self.header.z_min = bor.read_f64()?;
        self.header.z_max = bor.read_f64()?;
        self.header.m_min = bor.read_f64()?;
        self.header.m_max = bor.read_f64()?;

        while bor.pos() + 8 <= file_size {
            bor.set_byte_order(Endianness::BigEndian);
            bor.inc_pos(4)?; // record number
            let content_length = bor.read_i32()?;
            if content_length < 0 {
                return Err(invalid_data("Negative content length in .shp record."));
            }
            let record_end = bor.pos() + content_length as usize * 2; // in bytes
            if record_end > file_size {
                return Err(invalid_data("A .shp record extends past the end of file."));
            }
            bor.set_byte_order(Endianness::LittleEndian);
            let shape_type = ShapeType::from_int(bor.read_i32()?)?;
            let mut sfg = ShapefileGeometry::new(shape_type);

            match shape_type.base_shape_type() {
                ShapeType::Null => {}
                ShapeType::Point => {
                    let p = Point2D::new(bor.read_f64()?, bor.read_f64()?);
                    sfg.add_point(p);
                }
                ShapeType::MultiPoint => {
                    bor.inc_pos(32)?; // the record's box is recomputed
                    let num_points = bor.read_i32()?;
                    for _ in 0..num_points {
                        let p = Point2D::new(bor.read_f64()?, bor.read_f64()?);
                        sfg.add_point(p);
                    }
                }
                _ => {
                    bor.inc_pos(32)?;
                    let num_parts = bor.read_i32()?;
                    let num_points = bor.read_i32()?;
                    if num_parts < 0 || num_points < 0 {
                        return Err(invalid_data("Negative part or point count in .shp record."));
                    }
                    let mut parts = Vec::with_capacity(num_parts as usize);
                    for _ in 0..num_parts {
                        parts.push(bor.read_i32()?);
                    }
                    let mut points = Vec::with_capacity(num_points as usize);
                    for _ in 0..num_points {
                        points.push(Point2D::new(bor.read_f64()?, bor.read_f64()?));
                    }
                    for (i, st) in parts.iter().enumerate() {
                        let st = (*st).max(0) as usize;
                        let end = match parts.get(i + 1) {
                            Some(e) => (*e).max(0) as usize,
                            None => points.len(),
                        };
                        if st > end || end > points.len() {
                            return Err(invalid_data("Part index out of range in .shp record."));
                        }
                        sfg.add_part(&points[st..end]);
                    }
                }
            }

            // any z and measure data is skipped
            bor.seek(record_end)?;
            self.records.push(sfg);
        }

        self.num_records = self.records.len();

        //////////////////////////////
        // Read the projection file //
        //////////////////////////////
        if let Ok(prj) = fs::read_to_string(self.sibling_file("prj")) {
            self.projection = prj;
        }

        ///////////////////////////////
        // Read the attributes table //
        ///////////////////////////////
        let buffer = fs::read(self.sibling_file("dbf"))?;
        let mut bor = ByteOrderReader::new(Cursor::new(buffer), Endianness::LittleEndian)?;

        self.attributes.header.version = bor.read_u8()?;
        self.attributes.header.year = 1900u32 + bor.read_u8()? as u32;
        self.attributes.header.month = bor.read_u8()?;
        self.attributes.header.day = bor.read_u8()?;
        let num_records = bor.read_u32()?;
        self.attributes.header.bytes_in_header = bor.read_u16()?;
        self.attributes.header.bytes_in_record = bor.read_u16()?;
        bor.inc_pos(2)?; // reserved
        self.attributes.header.incomplete_transaction = bor.read_u8()?;
        self.attributes.header.encryption_flag = bor.read_u8()?;
        bor.inc_pos(12)?; // multi-user dBASE reserved bytes
        self.attributes.header.mdx_flag = bor.read_u8()?;
        self.attributes.header.language_driver_id = bor.read_u8()?;
        bor.inc_pos(2)?;

        // field descriptor array, terminated by 0x0d
        self.attributes.fields = vec![];
        while bor.pos() < bor.len() && bor.peek_u8()? != 0x0d {
            let name = bor.read_utf8(11)?.replace(char::from(0), "");
            let field_type = char::from(bor.read_u8()?);
            bor.inc_pos(4)?;
            let field_length = bor.read_u8()?;
            let decimal_count = bor.read_u8()?;
            bor.inc_pos(14)?;
            self.attributes.add_field(&AttributeField {
                name: name.trim().to_string(),
                field_type,
                field_length,
                decimal_count,
            });
        }

        // records start immediately after the header
        bor.seek(self.attributes.header.bytes_in_header as usize)?;

        for _ in 0..num_records {
            let deleted = bor.read_u8()? == 0x2A;
            let mut r: Vec<FieldData> = Vec::with_capacity(self.attributes.fields.len());
            for field in &self.attributes.fields {
                let str_rep = bor
                    .read_utf8(field.field_length as usize)?
                    .replace(char::from(0), "")
                    .trim()
                    .to_string();
                r.push(parse_field_value(field, &str_rep));
            }
            self.attributes.add_record(r, deleted);
        }

        if self.attributes.get_num_records() != self.num_records {
            return Err(invalid_data(
                "The .dbf record count does not match the number of shapes.",
            ));
        }

        Ok(())
    }

    pub fn write(&mut self) -> Result<(), Error> {
        if self.file_mode == "r" {
            return Err(Error::new(
                ErrorKind::Other,
                "The file was opened in read-only mode.",
            ));
        }
        if self.header.shape_type.base_shape_type() != self.header.shape_type {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("Writing {} shapefiles is not supported.", self.header.shape_type),
            ));
        }

        self.num_records = self.records.len(); // make sure they are the same.
        if self.attributes.get_num_records() != self.num_records {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "The attribute table and geometry record counts differ.",
            ));
        }

        /////////////////////////////////////////
        // Write the geometry data (.shp file) //
        /////////////////////////////////////////
        self.calculate_extent();
        let mut size = 100i32;
        for rec in &self.records {
            size += 8 + rec.get_length();
        }
        self.header.file_length = size / 2i32; // in 16-bit words
        self.header.version = 1000i32;

        let mut writer = BufWriter::new(File::create(&self.file_name)?);
        self.write_main_header(&mut writer, self.header.file_length)?;

        for (i, rec) in self.records.iter().enumerate() {
            writer.write_i32::<BigEndian>(i as i32 + 1i32)?; // record number
            writer.write_i32::<BigEndian>(rec.get_length() / 2)?; // content length in 16-bit words
            writer.write_i32::<LittleEndian>(rec.shape_type.to_int())?;
            match rec.shape_type {
                ShapeType::Point => {
                    let p = rec.points.first().copied().unwrap_or_default();
                    writer.write_f64::<LittleEndian>(p.x)?;
                    writer.write_f64::<LittleEndian>(p.y)?;
                }
                ShapeType::MultiPoint | ShapeType::PolyLine | ShapeType::Polygon => {
                    writer.write_f64::<LittleEndian>(rec.x_min)?;
                    writer.write_f64::<LittleEndian>(rec.y_min)?;
                    writer.write_f64::<LittleEndian>(rec.x_max)?;
                    writer.write_f64::<LittleEndian>(rec.y_max)?;
                    if rec.shape_type != ShapeType::MultiPoint {
                        writer.write_i32::<LittleEndian>(rec.num_parts)?;
                    }
                    writer.write_i32::<LittleEndian>(rec.num_points)?;
                    if rec.shape_type != ShapeType::MultiPoint {
                        for part in &rec.parts {
                            writer.write_i32::<LittleEndian>(*part)?;
                        }
                    }
                    for pt in &rec.points {
                        writer.write_f64::<LittleEndian>(pt.x)?;
                        writer.write_f64::<LittleEndian>(pt.y)?;
                    }
                }
                _ => {}
            }
        }
        writer.flush()?;

        /////////////////////////////////
        // Write the index file (.shx) //
        /////////////////////////////////
        let mut writer = BufWriter::new(File::create(self.sibling_file("shx"))?);
        let file_length = (100 + 8 * self.num_records) as i32 / 2i32;
        self.write_main_header(&mut writer, file_length)?;
        let mut pos = 100i32;
        for rec in &self.records {
            writer.write_i32::<BigEndian>(pos / 2)?; // offset in 16-bit words
            writer.write_i32::<BigEndian>(rec.get_length() / 2)?;
            pos += 8 + rec.get_length();
        }
        writer.flush()?;

        ///////////////////////////////
        // Write the projection file //
        ///////////////////////////////
        if !self.projection.is_empty() {
            fs::write(self.sibling_file("prj"), self.projection.as_bytes())?;
        }

        ///////////////////////////////
        // Write the attributes file //
        ///////////////////////////////
        let mut writer = BufWriter::new(File::create(self.sibling_file("dbf"))?);
        self.write_dbf(&mut writer)?;
        writer.flush()?;

        Ok(())
    }

    fn write_main_header<W: Write>(&self, writer: &mut W, file_length: i32) -> Result<(), Error> {
        writer.write_i32::<BigEndian>(9994i32)?; // magic number
        for _ in 0..5 {
            writer.write_i32::<BigEndian>(0i32)?;
        }
        writer.write_i32::<BigEndian>(file_length)?;
        writer.write_i32::<LittleEndian>(1000i32)?;
        writer.write_i32::<LittleEndian>(self.header.shape_type.to_int())?;
        writer.write_f64::<LittleEndian>(self.header.x_min)?;
        writer.write_f64::<LittleEndian>(self.header.y_min)?;
        writer.write_f64::<LittleEndian>(self.header.x_max)?;
        writer.write_f64::<LittleEndian>(self.header.y_max)?;
        writer.write_f64::<LittleEndian>(self.header.z_min)?;
        writer.write_f64::<LittleEndian>(self.header.z_max)?;
        writer.write_f64::<LittleEndian>(self.header.m_min)?;
        writer.write_f64::<LittleEndian>(self.header.m_max)?;
        Ok(())
    }

    fn write_dbf<W: Write>(&mut self, writer: &mut W) -> Result<(), Error> {
        self.attributes.header.version = 3;
        writer.write_u8(3u8)?;

        // "last update" stamp; keep the stored one so reruns are reproducible
        let (year, month, day) = match self.attributes.header.date() {
            Some(d) => (d.year as i32, d.month, d.day),
            None => {
                let now = Local::now();
                (now.year(), now.month() as u8, now.day() as u8)
            }
        };
        writer.write_u8((year - 1900).clamp(0, 255) as u8)?;
        writer.write_u8(month)?;
        writer.write_u8(day)?;

        let num_fields = self.attributes.fields.len();
        self.attributes.header.num_fields = num_fields as u32;
        self.attributes.header.num_records = self.attributes.get_num_records() as u32;
        writer.write_u32::<LittleEndian>(self.attributes.header.num_records)?;
        let header_size = 32u16 + num_fields as u16 * 32u16 + 1u16;
        self.attributes.header.bytes_in_header = header_size;
        writer.write_u16::<LittleEndian>(header_size)?;

        let bytes_in_record = 1u16
            + self
                .attributes
                .fields
                .iter()
                .map(|f| f.field_length as u16)
                .sum::<u16>();
        self.attributes.header.bytes_in_record = bytes_in_record;
        writer.write_u16::<LittleEndian>(bytes_in_record)?;

        // reserved or unused bytes
        writer.write_all(&[0u8; 20])?;

        // Field descriptor array
        for field in &self.attributes.fields {
            let mut name = [0u8; 11];
            let bytes = truncate_str(&field.name, 10).as_bytes();
            name[..bytes.len()].copy_from_slice(bytes);
            writer.write_all(&name)?;
            writer.write_u8(field.field_type as u8)?;
            writer.write_all(&[0u8; 4])?;
            writer.write_u8(field.field_length)?;
            writer.write_u8(field.decimal_count)?;
            writer.write_all(&[0u8; 14])?;
        }
        writer.write_u8(0x0D)?; // terminator byte

        for i in 0..self.attributes.get_num_records() {
            let deleted = self.attributes.is_deleted.get(i).copied().unwrap_or(false);
            writer.write_u8(if deleted { 0x2A } else { 0x20 })?;
            let rec = self.attributes.get_record(i).unwrap_or(&[]);
            for (j, field) in self.attributes.fields.iter().enumerate() {
                let value = rec.get(j).unwrap_or(&FieldData::Null);
                writer.write_all(format_field_value(field, value).as_bytes())?;
            }
        }

        writer.write_u8(0x1A)?; // file terminator byte
        Ok(())
    }

    fn calculate_extent(&mut self) {
        self.header.z_min = 0f64;
        self.header.z_max = 0f64;
        self.header.m_min = 0f64;
        self.header.m_max = 0f64;
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for sg in &self.records {
            if sg.shape_type == ShapeType::Null || sg.points.is_empty() {
                continue;
            }
            x_min = x_min.min(sg.x_min);
            x_max = x_max.max(sg.x_max);
            y_min = y_min.min(sg.y_min);
            y_max = y_max.max(sg.y_max);
        }
        if x_min > x_max {
            // no geometry
            x_min = 0f64;
            x_max = 0f64;
            y_min = 0f64;
            y_max = 0f64;
        }
        self.header.x_min = x_min;
        self.header.x_max = x_max;
        self.header.y_min = y_min;
        self.header.y_max = y_max;
    }
}

fn parse_field_value(field: &AttributeField, str_rep: &str) -> FieldData {
    if str_rep.replace('*', "").replace('?', "").is_empty() {
        return FieldData::Null;
    }
    match field.field_type {
        'N' | 'F' | 'I' | 'O' => {
            if field.decimal_count == 0 {
                match str_rep.parse::<i64>() {
                    Ok(v) => FieldData::Int(v),
                    Err(_) => str_rep
                        .parse::<f64>()
                        .map(FieldData::Real)
                        .unwrap_or(FieldData::Null),
                }
            } else {
                str_rep
                    .parse::<f64>()
                    .map(FieldData::Real)
                    .unwrap_or(FieldData::Null)
            }
        }
        'D' => {
            if str_rep.len() == 8 && str_rep.is_ascii() {
                FieldData::Date(DateData {
                    year: str_rep[0..4].parse::<u16>().unwrap_or(0),
                    month: str_rep[4..6].parse::<u8>().unwrap_or(0),
                    day: str_rep[6..8].parse::<u8>().unwrap_or(0),
                })
            } else {
                FieldData::Null
            }
        }
        'L' => match str_rep.to_lowercase().as_str() {
            "t" | "y" => FieldData::Bool(true),
            "f" | "n" => FieldData::Bool(false),
            _ => FieldData::Null,
        },
        _ => FieldData::Text(str_rep.to_string()),
    }
}

/// Truncates to at most `max_bytes` without splitting a character.
pub(crate) fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Renders a value as exactly `field_length` bytes.
fn format_field_value(field: &AttributeField, value: &FieldData) -> String {
    let fl = field.field_length as usize;
    let s = match value {
        FieldData::Null => String::new(),
        FieldData::Int(v) => format!("{:>width$}", v, width = fl),
        FieldData::Real(v) => format!(
            "{:>width$.prec$}",
            v,
            width = fl,
            prec = field.decimal_count as usize
        ),
        FieldData::Bool(v) => if *v { "T" } else { "F" }.to_string(),
        FieldData::Date(v) => v.to_string(),
        FieldData::Text(v) => v.clone(),
    };
    let s = if s.len() > fl && matches!(value, FieldData::Int(_) | FieldData::Real(_)) {
        // numbers too wide for the field are written as overflow markers
        "*".repeat(fl)
    } else {
        truncate_str(&s, fl).to_string()
    };
    format!("{:<width$}", s, width = fl - (s.len() - s.chars().count()))
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::tempdir;

    fn sample(file_name: &str) -> Shapefile {
        let mut sf = Shapefile::new(file_name, ShapeType::Polygon).unwrap();
        sf.projection = "PROJCS[\"Test\"]".to_string();
        sf.attributes
            .add_field(&AttributeField::new("SENSFEAT", FieldDataType::Text, 20u8, 0u8));
        sf.attributes
            .add_field(&AttributeField::new("AREA", FieldDataType::Real, 12u8, 3u8));
        sf.attributes
            .add_field(&AttributeField::new("COUNT", FieldDataType::Int, 6u8, 0u8));
        let mut sfg = ShapefileGeometry::new(ShapeType::Polygon);
        sfg.add_part(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 10.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(0.0, 0.0),
        ]);
        sf.add_record(sfg).unwrap();
        sf.attributes.add_record(
            vec![
                FieldData::Text("Species A".to_string()),
                FieldData::Real(100.25),
                FieldData::Null,
            ],
            false,
        );
        sf.attributes.header.set_date(Some(DateData {
            year: 2020,
            month: 11,
            day: 2,
        }));
        sf
    }

    #[test]
    fn write_then_read_polygon() {
        let dir = tempdir().unwrap();
        let file_name = dir.path().join("buffer_2.5 Kilometers.shp");
        let mut sf = sample(file_name.to_str().unwrap());
        sf.write().unwrap();

        // sibling files keep the full stem, dots included
        assert!(dir.path().join("buffer_2.5 Kilometers.dbf").exists());
        assert!(dir.path().join("buffer_2.5 Kilometers.shx").exists());
        assert!(dir.path().join("buffer_2.5 Kilometers.prj").exists());

        let input = Shapefile::read(file_name.to_str().unwrap()).unwrap();
        assert_eq!(input.header.shape_type, ShapeType::Polygon);
        assert_eq!(input.num_records, 1);
        assert_eq!(input.records[0].points.len(), 5);
        assert_eq!(input.header.x_max, 10.0);
        assert_eq!(input.projection, "PROJCS[\"Test\"]");
        assert_eq!(
            input.attributes.get_value(0, "SENSFEAT"),
            FieldData::Text("Species A".to_string())
        );
        assert_eq!(input.attributes.get_value(0, "AREA"), FieldData::Real(100.25));
        assert_eq!(input.attributes.get_value(0, "COUNT"), FieldData::Null);
        assert_eq!(input.attributes.header.year, 2020);
        assert_eq!(input.attributes.header.month, 11);
    }

    #[test]
    fn write_empty_file() {
        let dir = tempdir().unwrap();
        let file_name = dir.path().join("empty");
        let mut sf = Shapefile::new(file_name.to_str().unwrap(), ShapeType::Point).unwrap();
        sf.attributes
            .add_field(&AttributeField::new("CLUSTER_ID", FieldDataType::Int, 9u8, 0u8));
        sf.write().unwrap();
        assert_eq!(fs::metadata(dir.path().join("empty.shp")).unwrap().len(), 100);
        let input = Shapefile::read(dir.path().join("empty.shp").to_str().unwrap()).unwrap();
        assert_eq!(input.num_records, 0);
        assert_eq!(input.attributes.fields.len(), 1);
    }

    #[test]
    fn repeated_writes_are_identical() {
        let dir = tempdir().unwrap();
        let file_name = dir.path().join("same.shp");
        sample(file_name.to_str().unwrap()).write().unwrap();
        let first = fs::read(dir.path().join("same.dbf")).unwrap();
        sample(file_name.to_str().unwrap()).write().unwrap();
        assert_eq!(first, fs::read(dir.path().join("same.dbf")).unwrap());
    }

    #[test]
    fn negative_content_length_is_invalid_data() {
        let dir = tempdir().unwrap();
        let file_name = dir.path().join("corrupt.shp");
        sample(file_name.to_str().unwrap()).write().unwrap();
        let mut bytes = fs::read(&file_name).unwrap();
        // content length of the first record, big-endian
        bytes[104..108].copy_from_slice(&(-1i32).to_be_bytes());
        fs::write(&file_name, bytes).unwrap();

        let err = Shapefile::read(file_name.to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = Shapefile::read("/definitely/not/here.shp").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn field_formatting() {
        let f = AttributeField::new("X", FieldDataType::Real, 8u8, 2u8);
        assert_eq!(format_field_value(&f, &FieldData::Real(3.14159)), "    3.14");
        let f = AttributeField::new("N", FieldDataType::Int, 3u8, 0u8);
        assert_eq!(format_field_value(&f, &FieldData::Int(12345)), "***");
        assert_eq!(format_field_value(&f, &FieldData::Null), "   ");
        let f = AttributeField::new("T", FieldDataType::Text, 4u8, 0u8);
        assert_eq!(format_field_value(&f, &FieldData::Text("abcdef".into())), "abcd");
        assert_eq!(truncate_str("héllo", 2), "h");
    }
}
