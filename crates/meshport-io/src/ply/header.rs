//! PLY header model and codec.
//!
//! [`decode_header`] consumes the header from a buffered input and leaves the
//! input positioned at the first byte of record data, so the element codecs
//! can continue on the same handle. [`encode_header`] renders the
//! deterministic header written on export.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{MeshIoError, Result};
use crate::ply::keywords;
use crate::ply::types::{PropertyValue, ScalarType};
use crate::ply::PlyFormat;

/// One `property` line of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub name: String,
    /// Declaration order within the element, starting at 0.
    pub index: usize,
    /// Scalar type, or the element type of a list.
    pub value_type: ScalarType,
    /// Type of the length prefix; `Some` marks a list property.
    pub list_length_type: Option<ScalarType>,
}

impl PropertyDecl {
    pub fn scalar(name: impl Into<String>, index: usize, value_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            index,
            value_type,
            list_length_type: None,
        }
    }

    pub fn list(
        name: impl Into<String>,
        index: usize,
        length_type: ScalarType,
        value_type: ScalarType,
    ) -> Self {
        Self {
            name: name.into(),
            index,
            value_type,
            list_length_type: Some(length_type),
        }
    }

    pub fn is_list(&self) -> bool {
        self.list_length_type.is_some()
    }
}

impl fmt::Display for PropertyDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.list_length_type {
            Some(length_type) => write!(
                f,
                "{} {} {} {} {}",
                keywords::PROPERTY,
                keywords::LIST,
                length_type,
                self.value_type,
                self.name
            ),
            None => write!(f, "{} {} {}", keywords::PROPERTY, self.value_type, self.name),
        }
    }
}

/// Decoded values of one record, flattened in declaration order.
///
/// A list property contributes its length value followed by its elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub values: Vec<PropertyValue>,
}

impl Record {
    pub fn new(values: Vec<PropertyValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values belonging to the property at `index`: one value for a scalar,
    /// the elements (without the length) for a list.
    pub fn field<'a>(&'a self, element: &ElementDecl, index: usize) -> Option<&'a [PropertyValue]> {
        if !element.has_lists() {
            return self.values.get(index..index + 1);
        }

        let mut offset = 0;
        for property in element.properties() {
            let (start, len) = if property.is_list() {
                let count = self.values.get(offset)?.to_usize().ok()?;
                (offset + 1, count)
            } else {
                (offset, 1)
            };
            if property.index == index {
                return self.values.get(start..start + len);
            }
            offset = start + len;
        }
        None
    }

    /// Single scalar value of the property at `index`.
    pub fn scalar(&self, element: &ElementDecl, index: usize) -> Option<PropertyValue> {
        match self.field(element, index)? {
            [value] => Some(*value),
            _ => None,
        }
    }
}

/// One `element` block: name, declared count, ordered properties and, after
/// decoding, the records.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDecl {
    pub name: String,
    pub count: usize,
    properties: IndexMap<String, PropertyDecl>,
    pub records: Vec<Record>,
}

impl ElementDecl {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
            properties: IndexMap::new(),
            records: Vec::new(),
        }
    }

    /// Appends a scalar property with the next positional index.
    pub fn add_scalar(&mut self, name: &str, value_type: ScalarType) -> bool {
        let index = self.properties.len();
        self.insert(PropertyDecl::scalar(name, index, value_type))
    }

    /// Appends a list property with the next positional index.
    pub fn add_list(&mut self, name: &str, length_type: ScalarType, value_type: ScalarType) -> bool {
        let index = self.properties.len();
        self.insert(PropertyDecl::list(name, index, length_type, value_type))
    }

    fn insert(&mut self, property: PropertyDecl) -> bool {
        if self.properties.contains_key(&property.name) {
            return false;
        }
        self.properties.insert(property.name.clone(), property);
        true
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDecl> {
        self.properties.get(name)
    }

    /// Properties in on-disk column order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDecl> + '_ {
        self.properties.values()
    }

    pub fn num_properties(&self) -> usize {
        self.properties.len()
    }

    pub fn has_lists(&self) -> bool {
        self.properties.values().any(PropertyDecl::is_list)
    }

    /// First list property, the conventional home of face indices.
    pub fn first_list(&self) -> Option<&PropertyDecl> {
        self.properties.values().find(|p| p.is_list())
    }
}

impl fmt::Display for ElementDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", keywords::ELEMENT, self.name, self.count)
    }
}

/// Everything known about one PLY file.
#[derive(Debug, Clone, PartialEq)]
pub struct PlyFile {
    pub path: PathBuf,
    pub format: PlyFormat,
    pub version: f32,
    /// Header lines as read or last written, terminator included.
    pub header_lines: Vec<String>,
    pub elements: Vec<ElementDecl>,
    pub comments: Vec<String>,
    pub obj_info: Vec<String>,
}

impl PlyFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format: PlyFormat::Ascii,
            version: 1.0,
            header_lines: Vec::new(),
            elements: Vec::new(),
            comments: Vec::new(),
            obj_info: Vec::new(),
        }
    }

    pub fn element(&self, name: &str) -> Option<&ElementDecl> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// The header as it appears on disk.
    pub fn raw_header(&self) -> String {
        let mut out = self.header_lines.join("\n");
        out.push('\n');
        out
    }
}

/// Reads header lines up to and including `end_header`.
pub fn decode_header<R: BufRead>(reader: &mut R, path: impl AsRef<Path>) -> Result<PlyFile> {
    let mut ply = PlyFile::new(path);
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    let mut saw_format = false;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Err(MeshIoError::header(
                line_no,
                format!("missing '{}' terminator", keywords::END_HEADER),
            ));
        }
        line_no += 1;

        let line = std::str::from_utf8(&buf)
            .map_err(|_| MeshIoError::header(line_no, "header is not valid text"))?
            .trim_end_matches(['\n', '\r']);
        ply.header_lines.push(line.to_string());

        if line_no == 1 {
            if line.trim() != keywords::PLY {
                return Err(MeshIoError::header(line_no, "file does not start with 'ply'"));
            }
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&keyword) = tokens.first() else {
            continue;
        };

        match keyword {
            keywords::FORMAT => {
                parse_format(&mut ply, &tokens, line_no)?;
                saw_format = true;
            }
            keywords::ELEMENT => parse_element(&mut ply, &tokens, line_no)?,
            keywords::PROPERTY => parse_property(&mut ply, &tokens, line_no)?,
            keywords::COMMENT => ply.comments.push(text_after(line, keywords::COMMENT)),
            keywords::OBJ_INFO => ply.obj_info.push(text_after(line, keywords::OBJ_INFO)),
            keywords::END_HEADER => break,
            other => debug!(line = line_no, keyword = other, "ignoring unknown header keyword"),
        }
    }

    if !saw_format {
        return Err(MeshIoError::header(line_no, "missing 'format' line"));
    }

    debug!(
        format = %ply.format,
        version = ply.version,
        elements = ply.elements.len(),
        "decoded PLY header"
    );
    Ok(ply)
}

fn parse_format(ply: &mut PlyFile, tokens: &[&str], line: usize) -> Result<()> {
    if tokens.len() != 3 {
        return Err(MeshIoError::header(line, "format is invalid"));
    }
    ply.format = PlyFormat::from_keyword(tokens[1])
        .ok_or_else(|| MeshIoError::header(line, format!("format '{}' is invalid", tokens[1])))?;
    ply.version = tokens[2]
        .parse()
        .map_err(|_| MeshIoError::header(line, format!("version '{}' is invalid", tokens[2])))?;
    Ok(())
}

fn parse_element(ply: &mut PlyFile, tokens: &[&str], line: usize) -> Result<()> {
    if tokens.len() != 3 {
        return Err(MeshIoError::header(line, "element needs a name and a count"));
    }
    let count = tokens[2].parse::<usize>().map_err(|_| {
        MeshIoError::header(line, format!("element count '{}' is not a non-negative integer", tokens[2]))
    })?;
    ply.elements.push(ElementDecl::new(tokens[1], count));
    Ok(())
}

fn parse_property(ply: &mut PlyFile, tokens: &[&str], line: usize) -> Result<()> {
    let element = ply
        .elements
        .last_mut()
        .ok_or_else(|| MeshIoError::header(line, "property declared before any element"))?;

    let (name, added) = if tokens.get(1) == Some(&keywords::LIST) {
        if tokens.len() != 5 {
            return Err(MeshIoError::header(line, "list property needs two types and a name"));
        }
        let length_type = ScalarType::from_name(tokens[2])?;
        let value_type = ScalarType::from_name(tokens[3])?;
        (tokens[4], element.add_list(tokens[4], length_type, value_type))
    } else {
        if tokens.len() != 3 {
            return Err(MeshIoError::header(line, "property needs a type and a name"));
        }
        let value_type = ScalarType::from_name(tokens[1])?;
        (tokens[2], element.add_scalar(tokens[2], value_type))
    };

    if !added {
        return Err(MeshIoError::header(
            line,
            format!("duplicate property '{name}' in element '{}'", element.name),
        ));
    }
    Ok(())
}

/// Text following `keyword`, leading spaces and tabs stripped.
fn text_after(line: &str, keyword: &str) -> String {
    let rest = line.trim_start();
    rest[keyword.len()..].trim_start_matches([' ', '\t']).to_string()
}

/// Builds the header lines for `ply`.
///
/// Comments and obj_info lines are not emitted.
pub fn encode_header(ply: &PlyFile) -> Vec<String> {
    let mut lines = vec![
        keywords::PLY.to_string(),
        format!("{} {} {:.1}", keywords::FORMAT, ply.format, ply.version),
    ];
    for element in &ply.elements {
        lines.push(element.to_string());
        lines.extend(element.properties().map(PropertyDecl::to_string));
    }
    lines.push(keywords::END_HEADER.to_string());
    lines
}

/// Encodes the header, records it in `ply.header_lines`, and writes it.
pub fn write_header<W: Write>(ply: &mut PlyFile, writer: &mut W) -> Result<()> {
    ply.header_lines = encode_header(ply);
    writer.write_all(ply.raw_header().as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn decode(text: &str) -> Result<PlyFile> {
        decode_header(&mut Cursor::new(text.as_bytes()), "test.ply")
    }

    #[test]
    fn test_decode_full_header() {
        let ply = decode(
            "ply\n\
             format binary_little_endian 1.0\n\
             comment   made by hand\n\
             obj_info\tscanner 7\n\
             element vertex 8\n\
             property float x\n\
             property float y\n\
             property float z\n\
             property uchar red\n\
             element face 6\n\
             property list uchar int vertex_indices\n\
             end_header\n",
        )
        .unwrap();

        assert_eq!(ply.format, PlyFormat::BinaryLittleEndian);
        assert_eq!(ply.version, 1.0);
        assert_eq!(ply.comments, vec!["made by hand"]);
        assert_eq!(ply.obj_info, vec!["scanner 7"]);
        assert_eq!(ply.header_lines.len(), 12);
        assert_eq!(ply.header_lines[2], "comment   made by hand");

        let vertex = ply.element("vertex").unwrap();
        assert_eq!(vertex.count, 8);
        let names: Vec<&str> = vertex.properties().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y", "z", "red"]);
        assert_eq!(vertex.property("red").unwrap().index, 3);
        assert_eq!(vertex.property("red").unwrap().value_type, ScalarType::UInt8);

        let face = ply.element("face").unwrap();
        let list = face.property("vertex_indices").unwrap();
        assert_eq!(list.list_length_type, Some(ScalarType::UInt8));
        assert_eq!(list.value_type, ScalarType::Int32);
        assert_eq!(list.index, 0);
    }

    #[test]
    fn test_decode_stops_at_terminator() {
        let mut cursor = Cursor::new(b"ply\nformat ascii 1.0\nelement vertex 0\nend_header\nDATA".to_vec());
        decode_header(&mut cursor, "t.ply").unwrap();
        let mut rest = String::new();
        cursor.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "DATA");
    }

    #[test]
    fn test_crlf_header() {
        let ply = decode("ply\r\nformat ascii 1.0\r\nelement vertex 1\r\nproperty double x\r\nend_header\r\n").unwrap();
        assert_eq!(ply.elements[0].property("x").unwrap().value_type, ScalarType::Float64);
    }

    #[test]
    fn test_property_before_element_names_line() {
        let err = decode("ply\nformat ascii 1.0\nproperty float x\nend_header\n").unwrap_err();
        match err {
            MeshIoError::InvalidHeader { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_format_literal() {
        let err = decode("ply\nformat binary 1.0\nend_header\n").unwrap_err();
        assert!(matches!(err, MeshIoError::InvalidHeader { line: 2, .. }));
        let err = decode("ply\nformat ascii\nend_header\n").unwrap_err();
        assert!(matches!(err, MeshIoError::InvalidHeader { line: 2, .. }));
    }

    #[test]
    fn test_missing_magic_and_terminator() {
        assert!(matches!(
            decode("format ascii 1.0\nend_header\n"),
            Err(MeshIoError::InvalidHeader { line: 1, .. })
        ));
        assert!(matches!(
            decode("ply\nformat ascii 1.0\nelement vertex 1\n"),
            Err(MeshIoError::InvalidHeader { .. })
        ));
        assert!(matches!(
            decode("ply\nelement vertex 1\nend_header\n"),
            Err(MeshIoError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_negative_count_rejected() {
        let err = decode("ply\nformat ascii 1.0\nelement vertex -1\nend_header\n").unwrap_err();
        assert!(matches!(err, MeshIoError::InvalidHeader { line: 3, .. }));
    }

    #[test]
    fn test_unknown_property_type() {
        let err = decode("ply\nformat ascii 1.0\nelement vertex 1\nproperty half x\nend_header\n").unwrap_err();
        assert!(matches!(err, MeshIoError::UnknownType(ref t) if t == "half"));
    }

    #[test]
    fn test_duplicate_property_rejected() {
        let err = decode(
            "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty int x\nend_header\n",
        )
        .unwrap_err();
        assert!(matches!(err, MeshIoError::InvalidHeader { line: 5, .. }));
    }

    #[test]
    fn test_encode_is_deterministic_and_drops_comments() {
        let mut ply = PlyFile::new("out.ply");
        ply.format = PlyFormat::BinaryLittleEndian;
        ply.comments.push("not written".into());
        let mut vertex = ElementDecl::new("vertex", 2);
        vertex.add_scalar("x", ScalarType::Float32);
        vertex.add_scalar("red", ScalarType::UInt8);
        let mut face = ElementDecl::new("face", 1);
        face.add_list("vertex_indices", ScalarType::UInt8, ScalarType::Int32);
        ply.elements = vec![vertex, face];

        let mut out = Vec::new();
        write_header(&mut ply, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ply\n\
             format binary_little_endian 1.0\n\
             element vertex 2\n\
             property float x\n\
             property uchar red\n\
             element face 1\n\
             property list uchar int vertex_indices\n\
             end_header\n"
        );
        assert_eq!(ply.header_lines.last().unwrap(), "end_header");
    }

    #[test]
    fn test_record_field_with_lists() {
        let mut element = ElementDecl::new("face", 1);
        element.add_scalar("flags", ScalarType::UInt8);
        element.add_list("vertex_indices", ScalarType::UInt8, ScalarType::Int32);
        element.add_scalar("material", ScalarType::Int16);

        let record = Record::new(vec![
            PropertyValue::UInt8(9),
            PropertyValue::UInt8(3),
            PropertyValue::Int32(4),
            PropertyValue::Int32(5),
            PropertyValue::Int32(6),
            PropertyValue::Int16(2),
        ]);

        assert_eq!(record.scalar(&element, 0), Some(PropertyValue::UInt8(9)));
        assert_eq!(
            record.field(&element, 1).unwrap(),
            &[PropertyValue::Int32(4), PropertyValue::Int32(5), PropertyValue::Int32(6)]
        );
        assert_eq!(record.scalar(&element, 2), Some(PropertyValue::Int16(2)));
        assert_eq!(record.field(&element, 3), None);
    }
}
