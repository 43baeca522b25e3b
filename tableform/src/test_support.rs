//! In-memory collaborators for tests.
//!
//! Compiled for this crate's tests and, behind the `test-support` feature,
//! for downstream crates that want to exercise forms without a database.

use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{FormError, Result};
use crate::kinds::{FieldKind, LinkField};
use crate::multilang::{LanguageSource, MultilangCatalog, TranslatedTable};
use crate::options::FieldOptions;
use crate::provider::{FieldKindMap, FormProvider, ProviderDiscovery};
use crate::schema::{ColumnMeta, ForeignKey, SchemaLookup, TableSchema};

/// Schema held in memory, table by table.
#[derive(Debug, Clone, Default)]
pub struct InMemorySchema {
    tables: IndexMap<String, TableSchema>,
    failing: HashSet<String>,
}

impl InMemorySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table<'s>(
        mut self,
        name: &str,
        columns: impl IntoIterator<Item = (&'s str, ColumnMeta)>,
    ) -> Self {
        let columns = columns
            .into_iter()
            .map(|(column, meta)| (column.to_string(), meta))
            .collect();
        self.tables.insert(name.to_string(), columns);
        self
    }

    /// Make lookups of `name` fail.
    pub fn failing_table(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }
}

impl SchemaLookup for InMemorySchema {
    fn columns(&self, table: &str) -> Result<Option<TableSchema>> {
        if self.failing.contains(table) {
            return Err(FormError::SchemaLookup {
                table: table.to_string(),
                message: "simulated failure".to_string(),
            });
        }
        Ok(self.tables.get(table).cloned())
    }
}

/// Multilang catalog held in memory, with a switchable active language.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    tables: IndexMap<String, TranslatedTable>,
    language: RefCell<String>,
}

impl InMemoryCatalog {
    pub fn new(language: &str) -> Self {
        Self {
            tables: IndexMap::new(),
            language: RefCell::new(language.to_string()),
        }
    }

    pub fn table(mut self, name: &str, table: TranslatedTable) -> Self {
        self.tables.insert(name.to_string(), table);
        self
    }

    pub fn set_language(&self, language: &str) {
        *self.language.borrow_mut() = language.to_string();
    }
}

impl LanguageSource for InMemoryCatalog {
    fn active_language(&self) -> Option<String> {
        Some(self.language.borrow().clone())
    }
}

impl MultilangCatalog for InMemoryCatalog {
    fn translated_tables(&self) -> Result<IndexMap<String, TranslatedTable>> {
        Ok(self.tables.clone())
    }
}

/// Discovery returning fixed providers per category.
#[derive(Default)]
pub struct StaticDiscovery {
    providers: Vec<(String, Arc<dyn FormProvider>)>,
}

impl StaticDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, category: &str, provider: Arc<dyn FormProvider>) -> Self {
        self.providers.push((category.to_string(), provider));
        self
    }
}

impl ProviderDiscovery for StaticDiscovery {
    fn find_providers(&self, category: &str) -> Vec<Arc<dyn FormProvider>> {
        self.providers
            .iter()
            .filter(|(c, _)| c == category)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

/// Provider serving a fixed set of kinds.
#[derive(Debug, Default)]
pub struct KindsProvider {
    kinds: FieldKindMap,
}

impl KindsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, name: &str, kind: Arc<dyn FieldKind>) -> Self {
        self.kinds.insert(name.to_string(), kind);
        self
    }
}

impl FormProvider for KindsProvider {
    fn fields(&self) -> FieldKindMap {
        self.kinds.clone()
    }
}

/// Link field claiming foreign keys that point at one table.
#[derive(Debug)]
pub struct RefTableLink {
    ref_table: String,
}

impl RefTableLink {
    pub fn new(ref_table: &str) -> Self {
        Self {
            ref_table: ref_table.to_string(),
        }
    }
}

impl FieldKind for RefTableLink {
    fn as_link_field(&self) -> Option<&dyn LinkField> {
        Some(self)
    }
}

impl LinkField for RefTableLink {
    fn match_column(
        &self,
        _schema: &dyn SchemaLookup,
        _column: &ColumnMeta,
        foreign_key: &ForeignKey,
        _options: &FieldOptions,
    ) -> bool {
        foreign_key.ref_table == self.ref_table
    }
}
