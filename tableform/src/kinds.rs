//! Field type implementations.
//!
//! A [`FieldKind`] is what a type name in the registry points to. Most types
//! are plain value holders ([`PlainKind`]); a few add behaviour through the
//! trait's hooks.

use std::fmt::Debug;

use crate::options::FieldOptions;
use crate::schema::{ColumnMeta, ForeignKey, SchemaLookup};

/// Behaviour shared by every field of one type.
pub trait FieldKind: Debug + Send + Sync {
    /// Adjust the resolved options right before a field is built.
    fn prepare(&self, _options: &mut FieldOptions) {}

    /// Whether reads must never expose the stored value.
    fn conceals_value(&self) -> bool {
        false
    }

    /// Link-field capability, for types that represent a foreign key.
    fn as_link_field(&self) -> Option<&dyn LinkField> {
        None
    }
}

/// A field type able to represent a reference to another table.
///
/// Link fields compete for numeric foreign-key columns: the first registered
/// link field whose [`match_column`](LinkField::match_column) accepts the
/// column gets it.
pub trait LinkField {
    fn match_column(
        &self,
        schema: &dyn SchemaLookup,
        column: &ColumnMeta,
        foreign_key: &ForeignKey,
        options: &FieldOptions,
    ) -> bool;
}

/// A field with no behaviour beyond holding a value.
#[derive(Debug, Default)]
pub struct PlainKind;

impl FieldKind for PlainKind {}

/// A field choosing among enumerated values.
#[derive(Debug, Default)]
pub struct SelectKind;

impl FieldKind for SelectKind {
    fn prepare(&self, options: &mut FieldOptions) {
        options.choices.get_or_insert_with(Vec::new);
    }
}

/// A credential field; its value is held but never read back.
#[derive(Debug, Default)]
pub struct PasswordKind;

impl FieldKind for PasswordKind {
    fn conceals_value(&self) -> bool {
        true
    }
}
