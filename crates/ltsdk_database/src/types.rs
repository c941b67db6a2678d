//! # Attribute Types and Values
//!
//! Every attribute holds a fixed array of values of exactly one
//! [`AttributeType`]. The values live in an [`AttributeValues`] variant that
//! matches the type, so a type mismatch is detected by the variant alone.

use std::fmt;

use ltsdk_math::{Vector2, Vector3, Vector4};
use serde::{Deserialize, Serialize};

use crate::error::{DatabaseError, DatabaseResult};

/// Storage type of an attribute. Discriminants are the on-disk tags.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// `bool`
    Bool = 0,
    /// `f32`
    Float = 1,
    /// `i32`
    Int32 = 2,
    /// Narrow string.
    String = 3,
    /// Wide string, UTF-16 on disk.
    WString = 4,
    /// [`Vector2`]
    Vector2 = 5,
    /// [`Vector3`]
    Vector3 = 6,
    /// [`Vector4`]
    Vector4 = 7,
    /// Link to another record, see [`RecordLink`].
    RecordLink = 8,
    /// Group of member attributes, repeated per instance.
    Struct = 9,
}

impl AttributeType {
    /// All types in tag order.
    pub const ALL: [Self; 10] = [
        Self::Bool,
        Self::Float,
        Self::Int32,
        Self::String,
        Self::WString,
        Self::Vector2,
        Self::Vector3,
        Self::Vector4,
        Self::RecordLink,
        Self::Struct,
    ];

    /// Decodes an on-disk tag.
    #[must_use]
    pub fn from_u8(tag: u8) -> Option<Self> {
        Self::ALL.get(usize::from(tag)).copied()
    }

    /// Lowercase name, as used in constraints documents.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Float => "float",
            Self::Int32 => "int32",
            Self::String => "string",
            Self::WString => "wstring",
            Self::Vector2 => "vector2",
            Self::Vector3 => "vector3",
            Self::Vector4 => "vector4",
            Self::RecordLink => "recordlink",
            Self::Struct => "struct",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hint for tools about what an attribute's value means. No runtime effect.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeUsage {
    /// Plain value.
    #[default]
    Default = 0,
    /// Path to a resource file.
    Filename = 1,
    /// Animation name.
    Animation = 2,
    /// Client effect name.
    ClientFx = 3,
}

impl AttributeUsage {
    /// Decodes an on-disk tag.
    #[must_use]
    pub const fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Default),
            1 => Some(Self::Filename),
            2 => Some(Self::Animation),
            3 => Some(Self::ClientFx),
            _ => None,
        }
    }
}

/// A stored reference to a record, resolved by name when queried.
///
/// `database` is `None` for links into the database holding the attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordLink {
    /// Target database name for cross-database links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Target category name.
    pub category: String,
    /// Target record name.
    pub record: String,
}

impl RecordLink {
    /// Link to `category`/`record` in the same database.
    #[must_use]
    pub fn local(category: impl Into<String>, record: impl Into<String>) -> Self {
        Self {
            database: None,
            category: category.into(),
            record: record.into(),
        }
    }

    /// Link to `category`/`record` in the database registered as `database`.
    #[must_use]
    pub fn external(database: impl Into<String>, category: impl Into<String>, record: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
            ..Self::local(category, record)
        }
    }

    /// True if the link names no record.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.record.is_empty()
    }
}

/// Typed value array of one attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValues {
    /// Bool values.
    Bool(Vec<bool>),
    /// Float values.
    Float(Vec<f32>),
    /// Int32 values.
    Int32(Vec<i32>),
    /// String values.
    String(Vec<String>),
    /// Wide string values, held as UTF-8 in memory.
    WString(Vec<String>),
    /// Vector2 values.
    Vector2(Vec<Vector2>),
    /// Vector3 values.
    Vector3(Vec<Vector3>),
    /// Vector4 values.
    Vector4(Vec<Vector4>),
    /// Record links.
    RecordLink(Vec<RecordLink>),
    /// Struct instance count; members are separate attributes.
    Struct(u32),
}

macro_rules! typed_access {
    ($get:ident, $set:ident, $variant:ident, $ty:ty) => {
        #[doc = concat!("Reads value `index` as `", stringify!($variant), "`.")]
        pub fn $get(&self, index: usize) -> DatabaseResult<$ty> {
            match self {
                Self::$variant(values) => values.get(index).cloned().ok_or(DatabaseError::IndexOutOfRange {
                    index,
                    count: values.len(),
                }),
                other => Err(DatabaseError::TypeMismatch {
                    requested: AttributeType::$variant,
                    stored: other.attribute_type(),
                }),
            }
        }

        #[doc = concat!("Overwrites value `index` (or appends at `len`) as `", stringify!($variant), "`.")]
        pub fn $set(&mut self, index: usize, value: $ty) -> DatabaseResult<()> {
            let stored = self.attribute_type();
            match self {
                Self::$variant(values) => store(values, index, value),
                _ => Err(DatabaseError::TypeMismatch {
                    requested: AttributeType::$variant,
                    stored,
                }),
            }
        }
    };
}

fn store<T>(values: &mut Vec<T>, index: usize, value: T) -> DatabaseResult<()> {
    let count = values.len();
    match index.cmp(&count) {
        std::cmp::Ordering::Less => values[index] = value,
        std::cmp::Ordering::Equal => values.push(value),
        std::cmp::Ordering::Greater => return Err(DatabaseError::IndexOutOfRange { index, count }),
    }
    Ok(())
}

impl AttributeValues {
    /// `count` zeroed values of type `ty`.
    #[must_use]
    pub fn with_defaults(ty: AttributeType, count: usize) -> Self {
        match ty {
            AttributeType::Bool => Self::Bool(vec![false; count]),
            AttributeType::Float => Self::Float(vec![0.0; count]),
            AttributeType::Int32 => Self::Int32(vec![0; count]),
            AttributeType::String => Self::String(vec![String::new(); count]),
            AttributeType::WString => Self::WString(vec![String::new(); count]),
            AttributeType::Vector2 => Self::Vector2(vec![Vector2::ZERO; count]),
            AttributeType::Vector3 => Self::Vector3(vec![Vector3::ZERO; count]),
            AttributeType::Vector4 => Self::Vector4(vec![Vector4::default(); count]),
            AttributeType::RecordLink => Self::RecordLink(vec![RecordLink::default(); count]),
            AttributeType::Struct => Self::Struct(u32::try_from(count).unwrap_or(u32::MAX)),
        }
    }

    /// Type of the stored values.
    #[must_use]
    pub const fn attribute_type(&self) -> AttributeType {
        match self {
            Self::Bool(_) => AttributeType::Bool,
            Self::Float(_) => AttributeType::Float,
            Self::Int32(_) => AttributeType::Int32,
            Self::String(_) => AttributeType::String,
            Self::WString(_) => AttributeType::WString,
            Self::Vector2(_) => AttributeType::Vector2,
            Self::Vector3(_) => AttributeType::Vector3,
            Self::Vector4(_) => AttributeType::Vector4,
            Self::RecordLink(_) => AttributeType::RecordLink,
            Self::Struct(_) => AttributeType::Struct,
        }
    }

    /// Number of values, or struct instances.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::String(v) | Self::WString(v) => v.len(),
            Self::Vector2(v) => v.len(),
            Self::Vector3(v) => v.len(),
            Self::Vector4(v) => v.len(),
            Self::RecordLink(v) => v.len(),
            Self::Struct(n) => *n as usize,
        }
    }

    /// True if no values are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    typed_access!(bool_at, set_bool, Bool, bool);
    typed_access!(float_at, set_float, Float, f32);
    typed_access!(int32_at, set_int32, Int32, i32);
    typed_access!(vector2_at, set_vector2, Vector2, Vector2);
    typed_access!(vector3_at, set_vector3, Vector3, Vector3);
    typed_access!(vector4_at, set_vector4, Vector4, Vector4);
    typed_access!(record_link_at, set_record_link, RecordLink, RecordLink);
    typed_access!(wstring_at, set_wstring, WString, String);
    typed_access!(string_at, set_string, String, String);

    /// Borrows string value `index` without cloning.
    pub fn str_at(&self, index: usize, requested: AttributeType) -> DatabaseResult<&str> {
        let values = match (self, requested) {
            (Self::String(values), AttributeType::String) | (Self::WString(values), AttributeType::WString) => values,
            _ => {
                return Err(DatabaseError::TypeMismatch {
                    requested,
                    stored: self.attribute_type(),
                })
            }
        };
        values.get(index).map(String::as_str).ok_or(DatabaseError::IndexOutOfRange {
            index,
            count: values.len(),
        })
    }
}

/// Name of member `member` of struct instance `index` of attribute `name`.
#[must_use]
pub fn struct_member_name(name: &str, index: usize, member: &str) -> String {
    format!("{name}.{index}.{member}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags_roundtrip() {
        for ty in AttributeType::ALL {
            assert_eq!(AttributeType::from_u8(ty as u8), Some(ty));
        }
        assert_eq!(AttributeType::from_u8(10), None);
        assert_eq!(AttributeUsage::from_u8(3), Some(AttributeUsage::ClientFx));
        assert_eq!(AttributeUsage::from_u8(4), None);
    }

    #[test]
    fn test_typed_access_reports_mismatch() {
        let values = AttributeValues::Float(vec![2.5]);
        assert_eq!(values.float_at(0).unwrap(), 2.5);
        assert!(matches!(
            values.int32_at(0),
            Err(DatabaseError::TypeMismatch {
                requested: AttributeType::Int32,
                stored: AttributeType::Float
            })
        ));
        assert!(matches!(values.float_at(1), Err(DatabaseError::IndexOutOfRange { index: 1, count: 1 })));
    }

    #[test]
    fn test_set_overwrites_or_appends() {
        let mut values = AttributeValues::with_defaults(AttributeType::Int32, 2);
        values.set_int32(1, 7).unwrap();
        values.set_int32(2, 9).unwrap();
        assert_eq!(values, AttributeValues::Int32(vec![0, 7, 9]));
        assert!(values.set_int32(5, 1).is_err());
        assert!(values.set_float(0, 1.0).is_err());
    }

    #[test]
    fn test_str_at_distinguishes_wide() {
        let values = AttributeValues::WString(vec!["héllo".to_string()]);
        assert_eq!(values.str_at(0, AttributeType::WString).unwrap(), "héllo");
        assert!(values.str_at(0, AttributeType::String).is_err());
    }

    #[test]
    fn test_struct_member_name() {
        assert_eq!(struct_member_name("Gear", 2, "Slot"), "Gear.2.Slot");
        assert_eq!(AttributeValues::with_defaults(AttributeType::Struct, 3).len(), 3);
    }
}
