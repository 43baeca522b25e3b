//! Registry of field types available to a form.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{FormError, Result};
use crate::kinds::{FieldKind, LinkField};
use crate::provider::{FieldKindMap, FormProvider};

/// Field types keyed by type name.
///
/// Providers are merged in order; a later provider replaces an earlier one's
/// type of the same name, and the replaced entry keeps its original position.
/// Position matters because link fields are tried in registry order.
#[derive(Debug, Clone, Default)]
pub struct FieldTypeRegistry {
    kinds: FieldKindMap,
}

impl FieldTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from an ordered list of providers.
    pub fn from_providers<'a, I>(providers: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn FormProvider>,
    {
        let mut registry = Self::new();
        registry.register(providers);
        registry
    }

    /// Merge the types of each provider, in order.
    pub fn register<'a, I>(&mut self, providers: I)
    where
        I: IntoIterator<Item = &'a dyn FormProvider>,
    {
        for provider in providers {
            for (name, kind) in provider.fields() {
                self.register_kind(name, kind);
            }
        }
        debug!(types = self.kinds.len(), "field type registry built");
    }

    /// Add or replace a single type.
    pub fn register_kind(&mut self, name: impl Into<String>, kind: Arc<dyn FieldKind>) {
        let name = name.into();
        if self.kinds.insert(name.clone(), kind).is_some() {
            trace!(%name, "field type overridden");
        }
    }

    /// Look up a type, failing if it was never registered.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn FieldKind>> {
        self.kinds
            .get(name)
            .cloned()
            .ok_or_else(|| FormError::unknown_type(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Type names in registry order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    /// Types with link-field capability, in registry order.
    pub fn link_fields(&self) -> impl Iterator<Item = (&str, &dyn LinkField)> {
        self.kinds
            .iter()
            .filter_map(|(name, kind)| kind.as_link_field().map(|link| (name.as_str(), link)))
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
