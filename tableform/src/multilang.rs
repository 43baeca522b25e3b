//! Multilingual support seen from the form layer.
//!
//! Translation support is optional. When an application has it, it provides a
//! [`MultilangCatalog`] naming the translated tables and the active language.
//! Without one, every field is monolingual.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Supplies the language that unqualified value reads and writes target.
pub trait LanguageSource {
    /// The active language code, or `None` without multilang support.
    fn active_language(&self) -> Option<String>;
}

/// Catalog of tables whose columns are stored per language.
pub trait MultilangCatalog: LanguageSource {
    /// Translated tables keyed by base table name.
    fn translated_tables(&self) -> Result<IndexMap<String, TranslatedTable>>;
}

/// Translation metadata for one base table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TranslatedTable {
    /// Columns stored in the translation table
    pub fields: IndexSet<String>,
    /// Appended to the base table name to get the translation table
    pub table_suffix: String,
}

impl TranslatedTable {
    pub fn new<I, S>(fields: I, table_suffix: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            table_suffix: table_suffix.into(),
        }
    }

    pub fn is_translated(&self, field: &str) -> bool {
        self.fields.contains(field)
    }
}

/// Language source for applications without multilang support.
#[derive(Debug, Clone, Copy, Default)]
pub struct Monolingual;

impl LanguageSource for Monolingual {
    fn active_language(&self) -> Option<String> {
        None
    }
}

/// Language selector for value accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang<'a> {
    /// The active language of the [`LanguageSource`]
    #[default]
    Active,
    /// Every language at once (reads return the whole map)
    All,
    /// One specific language code
    Code(&'a str),
}

impl<'a> From<&'a str> for Lang<'a> {
    fn from(code: &'a str) -> Self {
        Lang::Code(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translated_table_membership() {
        let table = TranslatedTable::new(["title", "body"], "_texts");
        assert!(table.is_translated("title"));
        assert!(!table.is_translated("price"));
        assert_eq!(table.table_suffix, "_texts");
    }

    #[test]
    fn monolingual_has_no_language() {
        assert_eq!(Monolingual.active_language(), None);
    }

    #[test]
    fn lang_from_code() {
        assert_eq!(Lang::from("it"), Lang::Code("it"));
        assert_eq!(Lang::default(), Lang::Active);
    }
}
