//! Table schema as seen by the form layer.
//!
//! The database layer itself lives outside this crate; it is reached through
//! the [`SchemaLookup`] trait, which describes one table at a time as a map
//! from column name to [`ColumnMeta`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Columns of one table, in declaration order.
pub type TableSchema = IndexMap<String, ColumnMeta>;

/// Source of table descriptions.
pub trait SchemaLookup {
    /// Describe `table`, or `None` when the table does not exist.
    fn columns(&self, table: &str) -> Result<Option<TableSchema>>;

    /// Describe a single column of `table`.
    fn column(&self, table: &str, column: &str) -> Result<Option<ColumnMeta>> {
        Ok(self
            .columns(table)?
            .and_then(|mut columns| columns.shift_remove(column)))
    }
}

/// A foreign-key constraint declared on a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub ref_table: String,
    pub ref_column: String,
}

impl ForeignKey {
    pub fn new(ref_table: impl Into<String>, ref_column: impl Into<String>) -> Self {
        Self {
            name: None,
            ref_table: ref_table.into(),
            ref_column: ref_column.into(),
        }
    }
}

/// The length part of a column declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ColumnLength {
    /// No length declared
    #[default]
    None,
    /// `varchar(255)`, `int(11)`
    Size { size: u32 },
    /// `decimal(10,2)`
    Decimal { precision: u32, scale: u32 },
    /// `enum('a','b')`
    Values { values: Vec<String> },
}

/// Metadata for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Declared SQL type, e.g. `varchar`, `int unsigned`, `decimal(10,2)`
    pub sql_type: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default)]
    pub length: ColumnLength,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_keys: Vec<ForeignKey>,
}

impl ColumnMeta {
    pub fn new(sql_type: impl Into<String>) -> Self {
        Self {
            sql_type: sql_type.into(),
            nullable: false,
            default: None,
            length: ColumnLength::None,
            foreign_keys: Vec::new(),
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.length = ColumnLength::Size { size };
        self
    }

    pub fn decimal(mut self, precision: u32, scale: u32) -> Self {
        self.length = ColumnLength::Decimal { precision, scale };
        self
    }

    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.length = ColumnLength::Values {
            values: values.into_iter().map(Into::into).collect(),
        };
        self
    }

    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// The column's type family, derived from `sql_type`.
    pub fn family(&self) -> ColumnFamily {
        ColumnFamily::from_sql_type(&self.sql_type)
    }
}

/// Groups of SQL types that map to the same field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFamily {
    Integer,
    Float,
    Decimal,
    Enum,
    Date,
    Time,
    DateTime,
    LongText,
    String,
    Spatial,
    Other,
}

impl ColumnFamily {
    /// Classify a declared SQL type.
    ///
    /// Case-insensitive; a parenthesised length and trailing modifiers such as
    /// `unsigned` are ignored.
    pub fn from_sql_type(sql_type: &str) -> Self {
        let lowered = sql_type.trim().to_ascii_lowercase();
        let base = lowered
            .split(|c: char| c == '(' || c.is_whitespace())
            .next()
            .unwrap_or_default();

        match base {
            "tinyint" | "smallint" | "int" | "integer" | "mediumint" | "bigint" => Self::Integer,
            "float" | "double" | "real" => Self::Float,
            "decimal" | "numeric" => Self::Decimal,
            "enum" => Self::Enum,
            "date" => Self::Date,
            "time" => Self::Time,
            "datetime" => Self::DateTime,
            "tinytext" | "smalltext" | "text" | "mediumtext" | "longtext" => Self::LongText,
            "varchar" | "char" => Self::String,
            "point" | "geometry" => Self::Spatial,
            _ => Self::Other,
        }
    }
}
