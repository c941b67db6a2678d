//! Typed value getters.
//!
//! `get_*` never fails: a bad handle, an index past the end or a type
//! mismatch returns the caller's default. `try_get_*` reports which of those
//! happened. With strict mode on, `get_*` panics instead of defaulting.

use ltsdk_math::{Vector2, Vector3, Vector4};

use super::{AttributeHandle, DatabaseMgr, RecordHandle};
use crate::error::{DatabaseError, DatabaseResult};
use crate::types::{AttributeType, RecordLink};

macro_rules! typed_getters {
    ($($(#[$doc:meta])* $get:ident, $try_get:ident => $at:ident -> $ty:ty;)*) => {
        impl DatabaseMgr {
            $(
                $(#[$doc])*
                #[must_use]
                pub fn $get(&self, attribute: impl Into<Option<AttributeHandle>>, index: usize, default: $ty) -> $ty {
                    let result = self.$try_get(attribute, index);
                    self.or_default(result, default, stringify!($get))
                }

                #[doc = concat!("Like [`DatabaseMgr::", stringify!($get), "`], reporting why a read failed.")]
                pub fn $try_get(&self, attribute: impl Into<Option<AttributeHandle>>, index: usize) -> DatabaseResult<$ty> {
                    self.resolve_attribute(attribute.into())?.values().$at(index)
                }
            )*
        }
    };
}

typed_getters! {
    /// Value `index` of a bool attribute.
    get_bool, try_get_bool => bool_at -> bool;
    /// Value `index` of a float attribute.
    get_float, try_get_float => float_at -> f32;
    /// Value `index` of an int32 attribute.
    get_int32, try_get_int32 => int32_at -> i32;
    /// Value `index` of a Vector2 attribute.
    get_vector2, try_get_vector2 => vector2_at -> Vector2;
    /// Value `index` of a Vector3 attribute.
    get_vector3, try_get_vector3 => vector3_at -> Vector3;
    /// Value `index` of a Vector4 attribute.
    get_vector4, try_get_vector4 => vector4_at -> Vector4;
}

impl DatabaseMgr {
    /// Applies the miss policy: default in lenient mode, panic in strict.
    fn or_default<T>(&self, result: DatabaseResult<T>, default: T, getter: &str) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                assert!(!self.config.is_strict(), "{getter} failed in strict mode: {err}");
                tracing::trace!("{} fell back to default: {}", getter, err);
                default
            }
        }
    }

    /// Value `index` of a string attribute.
    #[must_use]
    pub fn get_string<'a>(&'a self, attribute: impl Into<Option<AttributeHandle>>, index: usize, default: &'a str) -> &'a str {
        let result = self.try_get_string(attribute, index);
        self.or_default(result, default, "get_string")
    }

    /// Like [`DatabaseMgr::get_string`], reporting why a read failed.
    pub fn try_get_string(&self, attribute: impl Into<Option<AttributeHandle>>, index: usize) -> DatabaseResult<&str> {
        self.resolve_attribute(attribute.into())?
            .values()
            .str_at(index, AttributeType::String)
    }

    /// Value `index` of a wide string attribute.
    #[must_use]
    pub fn get_wstring<'a>(&'a self, attribute: impl Into<Option<AttributeHandle>>, index: usize, default: &'a str) -> &'a str {
        let result = self.try_get_wstring(attribute, index);
        self.or_default(result, default, "get_wstring")
    }

    /// Like [`DatabaseMgr::get_wstring`], reporting why a read failed.
    pub fn try_get_wstring(&self, attribute: impl Into<Option<AttributeHandle>>, index: usize) -> DatabaseResult<&str> {
        self.resolve_attribute(attribute.into())?
            .values()
            .str_at(index, AttributeType::WString)
    }

    /// Stored link `index`, unresolved.
    pub fn try_get_record_link_value(
        &self,
        attribute: impl Into<Option<AttributeHandle>>,
        index: usize,
    ) -> DatabaseResult<RecordLink> {
        self.resolve_attribute(attribute.into())?.values().record_link_at(index)
    }

    /// Record named by link `index`, or `default` if it cannot be resolved.
    #[must_use]
    pub fn get_record_link(
        &self,
        attribute: impl Into<Option<AttributeHandle>>,
        index: usize,
        default: Option<RecordHandle>,
    ) -> Option<RecordHandle> {
        let result = self.try_get_record_link(attribute, index).map(Some);
        self.or_default(result, default, "get_record_link")
    }

    /// Resolves link `index` to a record handle.
    ///
    /// Links without a database name point into the attribute's own
    /// database. Named databases must be open and shared by name.
    pub fn try_get_record_link(
        &self,
        attribute: impl Into<Option<AttributeHandle>>,
        index: usize,
    ) -> DatabaseResult<RecordHandle> {
        let attribute = attribute.into();
        let link = self.try_get_record_link_value(attribute, index)?;
        if link.is_null() {
            return Err(DatabaseError::NotFound("null record link".to_string()));
        }

        let db = match &link.database {
            Some(name) => self
                .shared_handle(name)
                .filter(|h| self.is_valid(*h))
                .ok_or_else(|| DatabaseError::NotFound(format!("database {name}")))?,
            None => attribute.ok_or(DatabaseError::InvalidHandle)?.db,
        };
        self.get_record_in_database(db, &link.category, &link.record)
            .ok_or_else(|| DatabaseError::NotFound(format!("record {}/{}", link.category, link.record)))
    }
}
