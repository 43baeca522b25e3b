//! Field type providers.
//!
//! Providers contribute named [`FieldKind`]s to a form's registry. The
//! built-in provider is always consulted first; applications add their own
//! through a [`ProviderDiscovery`].

use std::sync::Arc;

use indexmap::IndexMap;

use crate::kinds::{FieldKind, PasswordKind, PlainKind, SelectKind};

/// Field kinds keyed by type name, in provider order.
pub type FieldKindMap = IndexMap<String, Arc<dyn FieldKind>>;

/// Type names supplied by [`BuiltinProvider`].
pub mod type_names {
    pub const TEXT: &str = "text";
    pub const NUMBER: &str = "number";
    pub const SELECT: &str = "select";
    pub const PASSWORD: &str = "password";
    pub const DATE: &str = "date";
    pub const TIME: &str = "time";
    pub const DATETIME: &str = "datetime";
    pub const TEXTAREA: &str = "textarea";
    pub const POINT: &str = "point";
}

/// A unit contributing field types.
pub trait FormProvider {
    fn fields(&self) -> FieldKindMap;
}

/// Finds the providers registered for a category.
pub trait ProviderDiscovery {
    /// Providers for `category`, in the order their types should be merged.
    fn find_providers(&self, category: &str) -> Vec<Arc<dyn FormProvider>>;
}

/// The field types every form knows about.
#[derive(Debug, Default)]
pub struct BuiltinProvider;

impl FormProvider for BuiltinProvider {
    fn fields(&self) -> FieldKindMap {
        use type_names::*;

        let plain: Arc<dyn FieldKind> = Arc::new(PlainKind);
        let mut fields = FieldKindMap::new();
        fields.insert(TEXT.to_string(), plain.clone());
        fields.insert(NUMBER.to_string(), plain.clone());
        fields.insert(SELECT.to_string(), Arc::new(SelectKind));
        fields.insert(PASSWORD.to_string(), Arc::new(PasswordKind));
        fields.insert(DATE.to_string(), plain.clone());
        fields.insert(TIME.to_string(), plain.clone());
        fields.insert(DATETIME.to_string(), plain.clone());
        fields.insert(TEXTAREA.to_string(), plain.clone());
        fields.insert(POINT.to_string(), plain);
        fields
    }
}
