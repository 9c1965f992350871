/*
This file is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT

NOTE: Structures and functions for handling the Shapefile attribute table info
contained with the associated .dbf file.
*/
use std::fmt;

#[derive(Debug, Default, Clone)]
pub struct AttributeHeader {
    pub version: u8,
    pub year: u32,
    pub month: u8,
    pub day: u8,
    pub num_records: u32,
    pub num_fields: u32, // not actually stored in file but derived
    pub bytes_in_header: u16,
    pub bytes_in_record: u16,
    pub incomplete_transaction: u8,
    pub encryption_flag: u8,
    pub mdx_flag: u8,
    pub language_driver_id: u8,
}

impl AttributeHeader {
    /// Returns the "last update" stamp if one has been read or assigned.
    pub fn date(&self) -> Option<DateData> {
        if self.year == 0 || self.month == 0 || self.day == 0 {
            return None;
        }
        Some(DateData {
            year: self.year as u16,
            month: self.month,
            day: self.day,
        })
    }

    pub fn set_date(&mut self, date: Option<DateData>) {
        match date {
            Some(d) => {
                self.year = d.year as u32;
                self.month = d.month;
                self.day = d.day;
            }
            None => {
                self.year = 0;
                self.month = 0;
                self.day = 0;
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DateData {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl fmt::Display for DateData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldData {
    Int(i64),
    Real(f64),
    Text(String),
    Date(DateData),
    Bool(bool),
    Null,
}

impl FieldData {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldData::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldData::Int(v) => Some(*v),
            FieldData::Real(v) if v.fract() == 0f64 => Some(*v as i64),
            _ => None,
        }
    }

    /// A key usable for grouping and equality tests. Reals are keyed by
    /// their bit pattern so that equal values always land in one group.
    pub fn group_key(&self) -> String {
        match self {
            FieldData::Int(v) => format!("i{}", v),
            FieldData::Real(v) => format!("r{:x}", v.to_bits()),
            FieldData::Text(v) => format!("t{}", v),
            FieldData::Date(v) => format!("d{}", v),
            FieldData::Bool(v) => format!("b{}", v),
            FieldData::Null => "n".to_string(),
        }
    }
}

impl fmt::Display for FieldData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldData::Int(v) => write!(f, "{}", v),
            FieldData::Real(v) => write!(f, "{}", v),
            FieldData::Text(v) => write!(f, "{}", v),
            FieldData::Date(v) => write!(f, "{}", v),
            FieldData::Bool(v) => write!(f, "{}", if *v { "T" } else { "F" }),
            FieldData::Null => Ok(()),
        }
    }
}

/// dBASE field types supported by the attribute table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldDataType {
    Int,
    Real,
    Text,
    Date,
    Bool,
}

impl FieldDataType {
    pub fn to_char(&self) -> char {
        match self {
            FieldDataType::Int | FieldDataType::Real => 'N',
            FieldDataType::Text => 'C',
            FieldDataType::Date => 'D',
            FieldDataType::Bool => 'L',
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AttributeField {
    pub name: String,
    pub field_type: char,
    pub field_length: u8,
    pub decimal_count: u8,
}

impl AttributeField {
    pub fn new(
        name: &str,
        field_type: FieldDataType,
        field_length: u8,
        decimal_count: u8,
    ) -> AttributeField {
        let (field_length, decimal_count) = match field_type {
            FieldDataType::Date => (8u8, 0u8),
            FieldDataType::Bool => (1u8, 0u8),
            FieldDataType::Int | FieldDataType::Text => (field_length, 0u8),
            FieldDataType::Real => (field_length, decimal_count),
        };
        AttributeField {
            name: name.to_string(),
            field_type: field_type.to_char(),
            field_length,
            decimal_count,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ShapefileAttributes {
    pub header: AttributeHeader,
    pub fields: Vec<AttributeField>,
    data: Vec<Vec<FieldData>>,
    pub is_deleted: Vec<bool>,
}

impl ShapefileAttributes {
    /// Appends a field. Existing records receive a `Null` value for it.
    pub fn add_field(&mut self, field: &AttributeField) {
        self.fields.push(field.clone());
        self.header.num_fields = self.fields.len() as u32;
        for rec in self.data.iter_mut() {
            rec.push(FieldData::Null);
        }
    }

    pub fn add_record(&mut self, rec: Vec<FieldData>, deleted: bool) {
        self.data.push(rec);
        self.is_deleted.push(deleted);
        self.header.num_records = self.data.len() as u32;
    }

    pub fn get_record(&self, index: usize) -> Option<&[FieldData]> {
        self.data.get(index).map(|r| r.as_slice())
    }

    pub fn get_value(&self, record_index: usize, field_name: &str) -> FieldData {
        match self.get_field_num(field_name) {
            Some(j) => self
                .data
                .get(record_index)
                .and_then(|r| r.get(j))
                .cloned()
                .unwrap_or(FieldData::Null),
            None => FieldData::Null,
        }
    }

    pub fn get_field_num(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn get_num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn get_num_records(&self) -> usize {
        self.data.len()
    }
}
