//! # Packed Binary Format
//!
//! Layout, every number written through the converter:
//!
//! ```text
//! "LTDB"                      4 raw bytes
//! version: u32                also identifies the file's byte order
//! category count: u32
//!   name: string
//!   record count: u32
//!     name: string
//!     attribute count: u32
//!       name: string
//!       type: u8, usage: u8
//!       value count: u32
//!       values...
//! ```
//!
//! Strings are a `u16` byte count and raw bytes without a terminator. Wide
//! strings are a `u16` unit count and UTF-16 units. Record links are a
//! `bool` cross-database flag, the optional database name, then category and
//! record names. Struct attributes carry only their instance count.

use ltsdk_math::{Vector2, Vector3, Vector4};
use ltsdk_platform::InStream;

use crate::converter::{ByteOrder, InConverter, NullConverter, OutConverter, PrimitiveSink, PrimitiveSource, SwapConverter};
use crate::database::{Attribute, Category, Database, Record};
use crate::error::{DatabaseError, DatabaseResult};
use crate::types::{AttributeType, AttributeUsage, AttributeValues, RecordLink};

/// File magic.
pub const PACKED_MAGIC: [u8; 4] = *b"LTDB";

/// Current format version.
pub const PACKED_VERSION: u32 = 1;

/// Upper bound on speculative preallocation from untrusted counts.
const MAX_PREALLOC: usize = 1024;

fn count_u32(len: usize) -> DatabaseResult<u32> {
    u32::try_from(len).map_err(|_| DatabaseError::Corrupt(format!("count {len} does not fit in u32")))
}

/// Writes `db` in packed form.
pub fn save_packed<C: ByteOrder>(db: &Database, out: &mut OutConverter<'_, C>) -> DatabaseResult<()> {
    out.write_raw(&PACKED_MAGIC)?;
    out.put(PACKED_VERSION)?;

    out.put(count_u32(db.num_categories())?)?;
    for category in db.categories() {
        out.write_string(category.name())?;
        out.put(count_u32(category.num_records())?)?;
        for record in category.records() {
            out.write_string(record.name())?;
            out.put(count_u32(record.num_attributes())?)?;
            for attribute in record.attributes() {
                write_attribute(attribute, out)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn write_attribute<C: ByteOrder>(attribute: &Attribute, out: &mut OutConverter<'_, C>) -> DatabaseResult<()> {
    out.write_string(attribute.name())?;
    out.put(attribute.attribute_type() as u8)?;
    out.put(attribute.usage() as u8)?;
    out.put(count_u32(attribute.values().len())?)?;

    match attribute.values() {
        AttributeValues::Bool(values) => values.iter().try_for_each(|v| out.write(v))?,
        AttributeValues::Float(values) => values.iter().try_for_each(|v| out.write(v))?,
        AttributeValues::Int32(values) => values.iter().try_for_each(|v| out.write(v))?,
        AttributeValues::String(values) => values.iter().try_for_each(|v| out.write_string(v))?,
        AttributeValues::WString(values) => values.iter().try_for_each(|v| out.write_wstring(v))?,
        AttributeValues::Vector2(values) => values.iter().try_for_each(|v| out.write(v))?,
        AttributeValues::Vector3(values) => values.iter().try_for_each(|v| out.write(v))?,
        AttributeValues::Vector4(values) => values.iter().try_for_each(|v| out.write(v))?,
        AttributeValues::RecordLink(values) => {
            for link in values {
                out.put(link.database.is_some())?;
                if let Some(database) = &link.database {
                    out.write_string(database)?;
                }
                out.write_string(&link.category)?;
                out.write_string(&link.record)?;
            }
        }
        AttributeValues::Struct(_) => {}
    }
    Ok(())
}

/// Reads a packed database from `stream` and names it `name`.
///
/// The byte order is taken from the version field, so files written by
/// either converter load on any host.
pub fn load_packed(name: &str, stream: &mut dyn InStream) -> DatabaseResult<Database> {
    let mut magic = [0u8; 4];
    stream.read(&mut magic)?;
    if magic != PACKED_MAGIC {
        return Err(DatabaseError::InvalidMagic(magic));
    }

    let mut version = [0u8; 4];
    stream.read(&mut version)?;
    let version = u32::from_ne_bytes(version);

    let mut db = if version == PACKED_VERSION {
        read_body(&mut InConverter::<NullConverter>::new(stream))?
    } else if version.swap_bytes() == PACKED_VERSION {
        tracing::debug!("database {} is byte-swapped", name);
        read_body(&mut InConverter::<SwapConverter>::new(stream))?
    } else {
        return Err(DatabaseError::UnsupportedVersion(version));
    };
    db.set_name(name);
    Ok(db)
}

fn read_count<C: ByteOrder>(input: &mut InConverter<'_, C>, what: &str) -> DatabaseResult<usize> {
    let count = input.take::<u32>()? as usize;
    // Every element takes at least one byte
    if count as u64 > input.remaining() {
        return Err(DatabaseError::Corrupt(format!(
            "{what} count {count} exceeds the {} bytes left",
            input.remaining()
        )));
    }
    Ok(count)
}

fn read_body<C: ByteOrder>(input: &mut InConverter<'_, C>) -> DatabaseResult<Database> {
    let mut db = Database::default();
    for _ in 0..read_count(input, "category")? {
        let mut category = Category::new(input.read_string()?);
        for _ in 0..read_count(input, "record")? {
            let mut record = Record::new(input.read_string()?);
            for _ in 0..read_count(input, "attribute")? {
                record.push_attribute(read_attribute(input)?)?;
            }
            category.push_record(record)?;
        }
        db.push_category(category)?;
    }
    Ok(db)
}

fn read_values<T, C: ByteOrder>(
    input: &mut InConverter<'_, C>,
    count: usize,
    mut read_one: impl FnMut(&mut InConverter<'_, C>) -> DatabaseResult<T>,
) -> DatabaseResult<Vec<T>> {
    let mut values = Vec::with_capacity(count.min(MAX_PREALLOC));
    for _ in 0..count {
        values.push(read_one(input)?);
    }
    Ok(values)
}

fn read_attribute<C: ByteOrder>(input: &mut InConverter<'_, C>) -> DatabaseResult<Attribute> {
    let name = input.read_string()?;
    let type_tag: u8 = input.take()?;
    let usage_tag: u8 = input.take()?;
    let ty = AttributeType::from_u8(type_tag)
        .ok_or_else(|| DatabaseError::Corrupt(format!("attribute {name} has unknown type {type_tag}")))?;
    let usage = AttributeUsage::from_u8(usage_tag)
        .ok_or_else(|| DatabaseError::Corrupt(format!("attribute {name} has unknown usage {usage_tag}")))?;

    let count = input.take::<u32>()? as usize;
    if count == 0 {
        return Err(DatabaseError::Corrupt(format!("attribute {name} has no values")));
    }
    if ty != AttributeType::Struct && count as u64 > input.remaining() {
        return Err(DatabaseError::Corrupt(format!("attribute {name} claims {count} values")));
    }

    let values = match ty {
        AttributeType::Bool => AttributeValues::Bool(read_values(input, count, |i| Ok(i.read::<bool>()?))?),
        AttributeType::Float => AttributeValues::Float(read_values(input, count, |i| Ok(i.read::<f32>()?))?),
        AttributeType::Int32 => AttributeValues::Int32(read_values(input, count, |i| Ok(i.read::<i32>()?))?),
        AttributeType::String => AttributeValues::String(read_values(input, count, |i| Ok(i.read_string()?))?),
        AttributeType::WString => AttributeValues::WString(read_values(input, count, |i| Ok(i.read_wstring()?))?),
        AttributeType::Vector2 => AttributeValues::Vector2(read_values(input, count, |i| Ok(i.read::<Vector2>()?))?),
        AttributeType::Vector3 => AttributeValues::Vector3(read_values(input, count, |i| Ok(i.read::<Vector3>()?))?),
        AttributeType::Vector4 => AttributeValues::Vector4(read_values(input, count, |i| Ok(i.read::<Vector4>()?))?),
        AttributeType::RecordLink => AttributeValues::RecordLink(read_values(input, count, |i| {
            let database = if i.read::<bool>()? { Some(i.read_string()?) } else { None };
            Ok(RecordLink {
                database,
                category: i.read_string()?,
                record: i.read_string()?,
            })
        })?),
        AttributeType::Struct => AttributeValues::Struct(count_u32(count)?),
    };
    Ok(Attribute::new(name, usage, values))
}
