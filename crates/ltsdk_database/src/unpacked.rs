//! # Unpacked (TOML) Format
//!
//! The hand-editable form of a database is two TOML documents. The data
//! document holds values per category and record:
//!
//! ```toml
//! name = "Game"
//!
//! [Weapons.Pistol]
//! Damage = 2.5
//! Muzzle = [0.0, 0.1, 0.4]
//! Ammo = { category = "Ammo", record = "9mm" }
//! ```
//!
//! The constraints document declares every attribute a category's records
//! may carry:
//!
//! ```toml
//! [Weapons.Damage]
//! type = "float"
//! default = 1.0
//!
//! [Weapons.Muzzle]
//! type = "vector3"
//! usage = "default"
//! count = 1
//! ```
//!
//! Attributes a record leaves out take the declared default. Values the
//! constraints do not declare are rejected. Tables are read in key order.

use std::collections::BTreeMap;

use ltsdk_math::{Vector2, Vector3, Vector4};
use ltsdk_platform::InStream;
use serde::Deserialize;
use toml::{Table, Value};

use crate::database::{Attribute, Category, Database, Record};
use crate::error::{DatabaseError, DatabaseResult};
use crate::types::{AttributeType, AttributeUsage, AttributeValues, RecordLink};

/// Name used when the data document has no `name` key.
pub const DEFAULT_UNPACKED_NAME: &str = "unpacked";

const fn one() -> usize {
    1
}

/// Declaration of one attribute in a constraints document.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeSchema {
    /// Storage type.
    #[serde(rename = "type")]
    pub ty: AttributeType,
    /// Tool hint.
    #[serde(default)]
    pub usage: AttributeUsage,
    /// Values per record, or struct instances.
    #[serde(default = "one")]
    pub count: usize,
    /// Value used when a record omits the attribute.
    #[serde(default)]
    pub default: Option<Value>,
}

/// Attribute declarations per category name, then attribute name.
pub type Constraints = BTreeMap<String, BTreeMap<String, AttributeSchema>>;

fn read_text(stream: &mut dyn InStream) -> DatabaseResult<String> {
    let len = usize::try_from(stream.len().saturating_sub(stream.pos()))
        .map_err(|_| DatabaseError::Corrupt("document too large".to_string()))?;
    let mut bytes = vec![0u8; len];
    stream.read(&mut bytes)?;
    String::from_utf8(bytes).map_err(|_| DatabaseError::Corrupt("document is not UTF-8".to_string()))
}

/// Parses a constraints document.
pub fn parse_constraints(text: &str) -> DatabaseResult<Constraints> {
    let constraints: Constraints = toml::from_str(text)?;
    for (category, attributes) in &constraints {
        for (name, schema) in attributes {
            if schema.count == 0 {
                return Err(DatabaseError::Schema(format!("{category}.{name} declares zero values")));
            }
        }
    }
    Ok(constraints)
}

/// Loads an unpacked database from its data and constraints streams.
pub fn load_unpacked(data: &mut dyn InStream, constraints: &mut dyn InStream) -> DatabaseResult<Database> {
    let constraints = parse_constraints(&read_text(constraints)?)?;
    let data: Table = toml::from_str(&read_text(data)?)?;
    build_database(&data, &constraints)
}

/// Builds a database from parsed documents.
pub fn build_database(data: &Table, constraints: &Constraints) -> DatabaseResult<Database> {
    let name = match data.get("name") {
        Some(Value::String(name)) => name.as_str(),
        Some(_) => return Err(DatabaseError::Schema("`name` must be a string".to_string())),
        None => DEFAULT_UNPACKED_NAME,
    };
    let mut db = Database::new(name);

    for (category_name, records) in data.iter().filter(|(key, _)| key.as_str() != "name") {
        let schema = constraints
            .get(category_name)
            .ok_or_else(|| DatabaseError::Schema(format!("category {category_name} is not declared")))?;
        let records = records
            .as_table()
            .ok_or_else(|| DatabaseError::Schema(format!("category {category_name} must be a table")))?;

        let mut category = Category::new(category_name.as_str());
        for (record_name, values) in records {
            let values = values
                .as_table()
                .ok_or_else(|| DatabaseError::Schema(format!("record {category_name}.{record_name} must be a table")))?;
            category.push_record(build_record(category_name, record_name, values, schema)?)?;
        }
        db.push_category(category)?;
    }
    Ok(db)
}

fn build_record(
    category: &str,
    name: &str,
    values: &Table,
    schema: &BTreeMap<String, AttributeSchema>,
) -> DatabaseResult<Record> {
    if let Some(unknown) = values.keys().find(|key| !schema.contains_key(key.as_str())) {
        return Err(DatabaseError::Schema(format!(
            "{category}.{name}.{unknown} is not declared"
        )));
    }

    let mut record = Record::new(name);
    for (attribute, decl) in schema {
        let path = format!("{category}.{name}.{attribute}");
        let parsed = match values.get(attribute).or(decl.default.as_ref()) {
            Some(value) => parse_values(decl.ty, decl.count, value, &path)?,
            None => AttributeValues::with_defaults(decl.ty, decl.count),
        };
        record.push_attribute(Attribute::new(attribute.as_str(), decl.usage, parsed))?;
    }
    Ok(record)
}

fn is_vector(ty: AttributeType) -> bool {
    matches!(ty, AttributeType::Vector2 | AttributeType::Vector3 | AttributeType::Vector4)
}

/// Splits a value into per-index items and checks the count.
fn items<'a>(ty: AttributeType, count: usize, value: &'a Value, path: &str) -> DatabaseResult<Vec<&'a Value>> {
    let list: Vec<&Value> = match value {
        Value::Array(array) if !is_vector(ty) || array.first().is_some_and(Value::is_array) => array.iter().collect(),
        single => vec![single],
    };
    match list.len() {
        n if n == count => Ok(list),
        1 => Ok(vec![list[0]; count]),
        n => Err(DatabaseError::Schema(format!("{path} has {n} values, expected {count}"))),
    }
}

fn float(value: &Value, path: &str) -> DatabaseResult<f32> {
    match value {
        Value::Float(f) => Ok(*f as f32),
        Value::Integer(i) => Ok(*i as f32),
        _ => Err(DatabaseError::Schema(format!("{path} expects a number"))),
    }
}

fn floats<const N: usize>(value: &Value, path: &str) -> DatabaseResult<[f32; N]> {
    let array = value
        .as_array()
        .filter(|a| a.len() == N)
        .ok_or_else(|| DatabaseError::Schema(format!("{path} expects {N} numbers")))?;
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(array) {
        *slot = float(item, path)?;
    }
    Ok(out)
}

fn string(value: &Value, path: &str) -> DatabaseResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DatabaseError::Schema(format!("{path} expects a string")))
}

/// Converts a TOML value to `count` values of `ty`.
pub fn parse_values(ty: AttributeType, count: usize, value: &Value, path: &str) -> DatabaseResult<AttributeValues> {
    if ty == AttributeType::Struct {
        return Ok(AttributeValues::with_defaults(ty, count));
    }

    let items = items(ty, count, value, path)?;

    Ok(match ty {
        AttributeType::Bool => AttributeValues::Bool(
            items
                .iter()
                .map(|v| v.as_bool().ok_or_else(|| DatabaseError::Schema(format!("{path} expects a bool"))))
                .collect::<DatabaseResult<_>>()?,
        ),
        AttributeType::Float => AttributeValues::Float(items.iter().map(|v| float(v, path)).collect::<DatabaseResult<_>>()?),
        AttributeType::Int32 => AttributeValues::Int32(
            items
                .iter()
                .map(|v| {
                    v.as_integer()
                        .and_then(|i| i32::try_from(i).ok())
                        .ok_or_else(|| DatabaseError::Schema(format!("{path} expects a 32-bit integer")))
                })
                .collect::<DatabaseResult<_>>()?,
        ),
        AttributeType::String => AttributeValues::String(items.iter().map(|v| string(v, path)).collect::<DatabaseResult<_>>()?),
        AttributeType::WString => AttributeValues::WString(items.iter().map(|v| string(v, path)).collect::<DatabaseResult<_>>()?),
        AttributeType::Vector2 => AttributeValues::Vector2(
            items
                .iter()
                .map(|v| floats::<2>(v, path).map(Vector2::from_array))
                .collect::<DatabaseResult<_>>()?,
        ),
        AttributeType::Vector3 => AttributeValues::Vector3(
            items
                .iter()
                .map(|v| floats::<3>(v, path).map(Vector3::from_array))
                .collect::<DatabaseResult<_>>()?,
        ),
        AttributeType::Vector4 => AttributeValues::Vector4(
            items
                .iter()
                .map(|v| floats::<4>(v, path).map(Vector4::from_array))
                .collect::<DatabaseResult<_>>()?,
        ),
        AttributeType::RecordLink => AttributeValues::RecordLink(
            items
                .iter()
                .map(|v| {
                    RecordLink::deserialize((*v).clone())
                        .map_err(|e| DatabaseError::Schema(format!("{path} expects a record link: {e}")))
                })
                .collect::<DatabaseResult<_>>()?,
        ),
        AttributeType::Struct => AttributeValues::with_defaults(ty, count),
    })
}
