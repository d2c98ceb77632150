//! PLY primitive types.
//!
//! [`ScalarType`] is the registry the header codec consults for every
//! `property` line: it resolves a type name to a tag, knows the tag's byte
//! width, and decodes/encodes values of that tag. Both record
//! representations go through it, so the ASCII and binary paths agree on
//! value semantics.

use std::fmt;
use std::io::{self, Write};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use num_traits::{cast, NumCast};

use crate::error::{MeshIoError, Result};

/// PLY scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// 8-bit signed integer (`char`, `int8`)
    Int8,
    /// 8-bit unsigned integer (`uchar`, `uint8`)
    UInt8,
    /// 16-bit signed integer (`short`, `int16`)
    Int16,
    /// 16-bit unsigned integer (`ushort`, `uint16`)
    UInt16,
    /// 32-bit signed integer (`int`, `int32`)
    Int32,
    /// 32-bit unsigned integer (`uint`, `uint32`)
    UInt32,
    /// 32-bit float (`float`, `float32`)
    Float32,
    /// 64-bit float (`double`, `float64`)
    Float64,
}

impl ScalarType {
    pub const ALL: [ScalarType; 8] = [
        ScalarType::Int8,
        ScalarType::UInt8,
        ScalarType::Int16,
        ScalarType::UInt16,
        ScalarType::Int32,
        ScalarType::UInt32,
        ScalarType::Float32,
        ScalarType::Float64,
    ];

    /// Resolves a header type name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "char" | "int8" => Ok(ScalarType::Int8),
            "uchar" | "uint8" => Ok(ScalarType::UInt8),
            "short" | "int16" => Ok(ScalarType::Int16),
            "ushort" | "uint16" => Ok(ScalarType::UInt16),
            "int" | "int32" => Ok(ScalarType::Int32),
            "uint" | "uint32" => Ok(ScalarType::UInt32),
            "float" | "float32" => Ok(ScalarType::Float32),
            "double" | "float64" => Ok(ScalarType::Float64),
            _ => Err(MeshIoError::UnknownType(name.to_string())),
        }
    }

    /// Size of one encoded value in bytes.
    pub const fn byte_width(self) -> usize {
        match self {
            ScalarType::Int8 | ScalarType::UInt8 => 1,
            ScalarType::Int16 | ScalarType::UInt16 => 2,
            ScalarType::Int32 | ScalarType::UInt32 | ScalarType::Float32 => 4,
            ScalarType::Float64 => 8,
        }
    }

    /// Spelling used when writing a header.
    pub const fn ply_name(self) -> &'static str {
        match self {
            ScalarType::Int8 => "char",
            ScalarType::UInt8 => "uchar",
            ScalarType::Int16 => "short",
            ScalarType::UInt16 => "ushort",
            ScalarType::Int32 => "int",
            ScalarType::UInt32 => "uint",
            ScalarType::Float32 => "float",
            ScalarType::Float64 => "double",
        }
    }

    /// Sized spelling (`int8` .. `float64`).
    pub const fn name(self) -> &'static str {
        match self {
            ScalarType::Int8 => "int8",
            ScalarType::UInt8 => "uint8",
            ScalarType::Int16 => "int16",
            ScalarType::UInt16 => "uint16",
            ScalarType::Int32 => "int32",
            ScalarType::UInt32 => "uint32",
            ScalarType::Float32 => "float32",
            ScalarType::Float64 => "float64",
        }
    }

    pub const fn is_floating_point(self) -> bool {
        matches!(self, ScalarType::Float32 | ScalarType::Float64)
    }

    /// Decodes one little-endian value starting at `offset`.
    ///
    /// Returns `None` when fewer than [`byte_width`](Self::byte_width) bytes
    /// remain after `offset`.
    pub fn decode(self, bytes: &[u8], offset: usize) -> Option<PropertyValue> {
        let end = offset.checked_add(self.byte_width())?;
        let span = bytes.get(offset..end)?;
        let value = match self {
            ScalarType::Int8 => PropertyValue::Int8(span[0] as i8),
            ScalarType::UInt8 => PropertyValue::UInt8(span[0]),
            ScalarType::Int16 => PropertyValue::Int16(LittleEndian::read_i16(span)),
            ScalarType::UInt16 => PropertyValue::UInt16(LittleEndian::read_u16(span)),
            ScalarType::Int32 => PropertyValue::Int32(LittleEndian::read_i32(span)),
            ScalarType::UInt32 => PropertyValue::UInt32(LittleEndian::read_u32(span)),
            ScalarType::Float32 => PropertyValue::Float32(LittleEndian::read_f32(span)),
            ScalarType::Float64 => PropertyValue::Float64(LittleEndian::read_f64(span)),
        };
        Some(value)
    }

    /// Converts a textual token into a value of this type.
    ///
    /// Integer tokens must fit the type's range.
    pub fn parse_token(self, token: &str) -> Result<PropertyValue> {
        fn parse<T: std::str::FromStr>(token: &str, ty: ScalarType) -> Result<T> {
            token
                .parse::<T>()
                .map_err(|_| MeshIoError::token(token, format!("not a valid {} value", ty.name())))
        }

        Ok(match self {
            ScalarType::Int8 => PropertyValue::Int8(parse(token, self)?),
            ScalarType::UInt8 => PropertyValue::UInt8(parse(token, self)?),
            ScalarType::Int16 => PropertyValue::Int16(parse(token, self)?),
            ScalarType::UInt16 => PropertyValue::UInt16(parse(token, self)?),
            ScalarType::Int32 => PropertyValue::Int32(parse(token, self)?),
            ScalarType::UInt32 => PropertyValue::UInt32(parse(token, self)?),
            ScalarType::Float32 => PropertyValue::Float32(parse(token, self)?),
            ScalarType::Float64 => PropertyValue::Float64(parse(token, self)?),
        })
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ply_name())
    }
}

/// A decoded scalar, tagged with its declared type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Float32(f32),
    Float64(f64),
}

impl PropertyValue {
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            PropertyValue::Int8(_) => ScalarType::Int8,
            PropertyValue::UInt8(_) => ScalarType::UInt8,
            PropertyValue::Int16(_) => ScalarType::Int16,
            PropertyValue::UInt16(_) => ScalarType::UInt16,
            PropertyValue::Int32(_) => ScalarType::Int32,
            PropertyValue::UInt32(_) => ScalarType::UInt32,
            PropertyValue::Float32(_) => ScalarType::Float32,
            PropertyValue::Float64(_) => ScalarType::Float64,
        }
    }

    /// Range-checked conversion; floats truncate toward zero.
    pub fn cast<T: NumCast>(&self) -> Option<T> {
        match *self {
            PropertyValue::Int8(v) => cast(v),
            PropertyValue::UInt8(v) => cast(v),
            PropertyValue::Int16(v) => cast(v),
            PropertyValue::UInt16(v) => cast(v),
            PropertyValue::Int32(v) => cast(v),
            PropertyValue::UInt32(v) => cast(v),
            PropertyValue::Float32(v) => cast(v),
            PropertyValue::Float64(v) => cast(v),
        }
    }

    pub fn to_f32(&self) -> f32 {
        match *self {
            PropertyValue::Float32(v) => v,
            PropertyValue::Float64(v) => v as f32,
            other => other.to_f64() as f32,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match *self {
            PropertyValue::Int8(v) => v.into(),
            PropertyValue::UInt8(v) => v.into(),
            PropertyValue::Int16(v) => v.into(),
            PropertyValue::UInt16(v) => v.into(),
            PropertyValue::Int32(v) => v.into(),
            PropertyValue::UInt32(v) => v.into(),
            PropertyValue::Float32(v) => v.into(),
            PropertyValue::Float64(v) => v,
        }
    }

    pub fn to_u8(&self) -> Result<u8> {
        self.checked("uint8")
    }

    pub fn to_i32(&self) -> Result<i32> {
        self.checked("int32")
    }

    pub fn to_u32(&self) -> Result<u32> {
        self.checked("uint32")
    }

    /// List length or index value.
    pub fn to_usize(&self) -> Result<usize> {
        self.checked("an index")
    }

    fn checked<T: NumCast>(&self, target: &str) -> Result<T> {
        self.cast::<T>().ok_or_else(|| {
            MeshIoError::token(&self.to_string(), format!("out of range for {target}"))
        })
    }

    /// Writes the value at its natural little-endian width.
    pub fn write_le<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match *self {
            PropertyValue::Int8(v) => writer.write_i8(v),
            PropertyValue::UInt8(v) => writer.write_u8(v),
            PropertyValue::Int16(v) => writer.write_i16::<LittleEndian>(v),
            PropertyValue::UInt16(v) => writer.write_u16::<LittleEndian>(v),
            PropertyValue::Int32(v) => writer.write_i32::<LittleEndian>(v),
            PropertyValue::UInt32(v) => writer.write_u32::<LittleEndian>(v),
            PropertyValue::Float32(v) => writer.write_f32::<LittleEndian>(v),
            PropertyValue::Float64(v) => writer.write_f64::<LittleEndian>(v),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Int8(v) => write!(f, "{v}"),
            PropertyValue::UInt8(v) => write!(f, "{v}"),
            PropertyValue::Int16(v) => write!(f, "{v}"),
            PropertyValue::UInt16(v) => write!(f, "{v}"),
            PropertyValue::Int32(v) => write!(f, "{v}"),
            PropertyValue::UInt32(v) => write!(f, "{v}"),
            PropertyValue::Float32(v) => write!(f, "{v}"),
            PropertyValue::Float64(v) => write!(f, "{v}"),
        }
    }
}
