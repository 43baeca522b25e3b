//! The form aggregate.
//!
//! A [`Form`] owns its fields in insertion order. Adding a field runs it
//! through the [`ColumnTypeResolver`] against the form's collaborators and
//! builds the [`Field`] from whatever kind the type resolves to. Adding a
//! name that already exists redefines the field in place: options are merged
//! and the stored value is kept.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::unsync::OnceCell;
use serde_json::Value;
use tableform_config::FormConfig;
use tracing::debug;

use crate::error::{FormError, Result};
use crate::field::Field;
use crate::kinds::FieldKind;
use crate::multilang::{Lang, LanguageSource, MultilangCatalog};
use crate::options::FieldOptions;
use crate::provider::{BuiltinProvider, FormProvider, ProviderDiscovery};
use crate::registry::FieldTypeRegistry;
use crate::resolver::ColumnTypeResolver;
use crate::schema::SchemaLookup;

/// Options of a form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormOptions {
    /// Backing table; columns of this table drive type inference.
    pub table: Option<String>,
}

/// An ordered collection of fields, optionally bound to a table.
pub struct Form {
    options: FormOptions,
    dataset: IndexMap<String, Field>,
    schema: Option<Arc<dyn SchemaLookup>>,
    multilang: Option<Arc<dyn MultilangCatalog>>,
    discovery: Option<Arc<dyn ProviderDiscovery>>,
    config: FormConfig,
    types: OnceCell<FieldTypeRegistry>,
}

impl Form {
    /// A form with no collaborators and default configuration.
    pub fn new(options: FormOptions) -> Self {
        FormBuilder::new().options(options).build()
    }

    pub fn builder() -> FormBuilder {
        FormBuilder::new()
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn table(&self) -> Option<&str> {
        self.options.table.as_deref()
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Add a field, or redefine the field of the same name.
    ///
    /// A redefinition merges `options` over the existing field's options and
    /// keeps its value unless `options` carries a `value` of its own. The
    /// field keeps its position.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        options: impl Into<FieldOptions>,
    ) -> Result<&mut Field> {
        let name = name.into();
        let options = options.into();
        match self.dataset.get(&name).cloned() {
            Some(existing) => {
                let merged = carried_options(&existing).merged_with(options);
                self.insert_resolved(name, merged, Some(&existing))
            }
            None => self.insert_resolved(name, options, None),
        }
    }

    /// Add a field built elsewhere under its own name.
    ///
    /// The field's options are merged with `overrides` and re-resolved
    /// against this form; its value is carried over.
    pub fn add_field(&mut self, field: &Field, overrides: FieldOptions) -> Result<&mut Field> {
        let merged = carried_options(field).merged_with(overrides);
        self.insert_resolved(field.name().to_string(), merged, Some(field))
    }

    fn insert_resolved(
        &mut self,
        name: String,
        options: FieldOptions,
        carried: Option<&Field>,
    ) -> Result<&mut Field> {
        let explicit_value = options.value.is_some();
        let resolved = ColumnTypeResolver::new(self.registry(), &self.config)
            .with_schema(self.schema.as_deref())
            .with_multilang(self.multilang.as_deref())
            .resolve(self.options.table.as_deref(), &name, options)?;

        let languages = FormLanguages(self.multilang.as_deref());
        let mut field = Field::new(name.clone(), resolved.options, resolved.kind, &languages);
        if let Some(previous) = carried.filter(|_| !explicit_value) {
            field.adopt_value(previous, &languages);
        }

        let (index, replaced) = self.dataset.insert_full(name, field);
        if replaced.is_some() {
            debug!(field = %self.dataset[index].name(), "field redefined");
        }
        Ok(&mut self.dataset[index])
    }

    /// The form's field types, built on first use.
    ///
    /// The built-in types come first; providers found for the configured
    /// category are merged over them in discovery order.
    pub fn registry(&self) -> &FieldTypeRegistry {
        self.types.get_or_init(|| {
            let discovered = self
                .discovery
                .as_ref()
                .map(|discovery| discovery.find_providers(&self.config.provider_category))
                .unwrap_or_default();
            debug!(
                category = %self.config.provider_category,
                providers = discovered.len(),
                "collecting field types"
            );

            let mut providers: Vec<&dyn FormProvider> = Vec::with_capacity(discovered.len() + 1);
            providers.push(&BuiltinProvider);
            for provider in &discovered {
                providers.push(provider.as_ref());
            }
            FieldTypeRegistry::from_providers(providers)
        })
    }

    /// Register a field type on this form only.
    ///
    /// Replaces a type of the same name. Fields already added keep the kind
    /// they were built with.
    pub fn register_field_type(&mut self, name: impl Into<String>, kind: Arc<dyn FieldKind>) {
        self.registry();
        if let Some(registry) = self.types.get_mut() {
            registry.register_kind(name, kind);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.dataset.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.dataset.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dataset.contains_key(name)
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.dataset.values()
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// The form's source of the active language.
    pub fn languages(&self) -> impl LanguageSource + '_ {
        FormLanguages(self.multilang.as_deref())
    }

    /// Read a field's value in the form's active language context.
    pub fn value(&self, name: &str, lang: Lang<'_>) -> Result<Option<Value>> {
        let field = self.dataset.get(name).ok_or_else(|| field_not_found(name))?;
        Ok(field.get_value(lang, &self.languages()))
    }

    /// Set a field's value in the form's active language context.
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>, lang: Lang<'_>) -> Result<()> {
        let languages = FormLanguages(self.multilang.as_deref());
        let field = self
            .dataset
            .get_mut(name)
            .ok_or_else(|| field_not_found(name))?;
        field.set_value(value, lang, &languages);
        Ok(())
    }

    /// An independent copy of this form.
    ///
    /// Fields are deep-copied; collaborators are shared.
    pub fn duplicate(&self) -> Form {
        Form {
            options: self.options.clone(),
            dataset: self.dataset.clone(),
            schema: self.schema.clone(),
            multilang: self.multilang.clone(),
            discovery: self.discovery.clone(),
            config: self.config.clone(),
            types: self.types.clone(),
        }
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("options", &self.options)
            .field("fields", &self.dataset.keys().collect::<Vec<_>>())
            .field("schema", &self.schema.is_some())
            .field("multilang", &self.multilang.is_some())
            .field("discovery", &self.discovery.is_some())
            .field("types", &self.types.get().map(FieldTypeRegistry::len))
            .finish()
    }
}

/// Options a redefinition starts from: the field's own, minus its seed `value`.
fn carried_options(field: &Field) -> FieldOptions {
    let mut options = field.options().clone();
    options.value = None;
    options
}

fn field_not_found(name: &str) -> FormError {
    FormError::FieldNotFound {
        name: name.to_string(),
    }
}

/// Active language as seen by a form: the catalog's, if there is one.
struct FormLanguages<'a>(Option<&'a dyn MultilangCatalog>);

impl LanguageSource for FormLanguages<'_> {
    fn active_language(&self) -> Option<String> {
        self.0.and_then(|catalog| catalog.active_language())
    }
}

/// Builder for [`Form`].
#[derive(Default)]
pub struct FormBuilder {
    options: FormOptions,
    schema: Option<Arc<dyn SchemaLookup>>,
    multilang: Option<Arc<dyn MultilangCatalog>>,
    discovery: Option<Arc<dyn ProviderDiscovery>>,
    config: Option<FormConfig>,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.options.table = Some(table.into());
        self
    }

    pub fn schema(mut self, schema: Arc<dyn SchemaLookup>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn multilang(mut self, catalog: Arc<dyn MultilangCatalog>) -> Self {
        self.multilang = Some(catalog);
        self
    }

    pub fn discovery(mut self, discovery: Arc<dyn ProviderDiscovery>) -> Self {
        self.discovery = Some(discovery);
        self
    }

    pub fn config(mut self, config: FormConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use the configuration found in the standard locations.
    pub fn load_config(self) -> Result<Self> {
        let config = tableform_config::load_configuration()?;
        Ok(self.config(config))
    }

    pub fn build(self) -> Form {
        Form {
            options: self.options,
            dataset: IndexMap::new(),
            schema: self.schema,
            multilang: self.multilang,
            discovery: self.discovery,
            config: self.config.unwrap_or_default(),
            types: OnceCell::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::PlainKind;
    use crate::schema::ColumnMeta;
    use crate::test_support::{InMemorySchema, KindsProvider, StaticDiscovery};
    use serde_json::json;

    fn users_form() -> Form {
        let schema = InMemorySchema::new().table(
            "users",
            [
                ("id", ColumnMeta::new("int")),
                ("email", ColumnMeta::new("varchar").size(190)),
                ("password", ColumnMeta::new("char").size(60)),
                ("bio", ColumnMeta::new("text").nullable(true)),
            ],
        );
        Form::builder().table("users").schema(Arc::new(schema)).build()
    }

    #[test_log::test]
    fn add_resolves_from_table() {
        let mut form = users_form();
        form.add("email", FieldOptions::new()).unwrap();
        form.add("bio", FieldOptions::new()).unwrap();

        let email = form.get("email").unwrap();
        assert_eq!(email.field_type(), "text");
        assert_eq!(email.maxlength(), Some(190));

        let bio = form.get("bio").unwrap();
        assert_eq!(bio.field_type(), "textarea");
        assert!(bio.is_nullable());
    }

    #[test_log::test]
    fn insertion_order_kept_on_redefinition() {
        let mut form = users_form();
        form.add("id", FieldOptions::new()).unwrap();
        form.add("email", FieldOptions::new()).unwrap();
        form.add("bio", FieldOptions::new()).unwrap();
        form.add("email", FieldOptions::new().label("E-mail")).unwrap();

        let names: Vec<&str> = form.fields().map(Field::name).collect();
        assert_eq!(names, ["id", "email", "bio"]);
        assert_eq!(form.len(), 3);
        assert_eq!(form.get("email").unwrap().label(), Some("E-mail"));
    }

    #[test_log::test]
    fn redefinition_keeps_value_and_merges_options() {
        let mut form = users_form();
        form.add("email", FieldOptions::new().required(true)).unwrap();
        form.set_value("email", "ada@example.com", Lang::Active).unwrap();

        let email = form.add("email", FieldOptions::new().label("E-mail")).unwrap();
        assert!(email.is_required());
        assert_eq!(email.label(), Some("E-mail"));
        assert_eq!(email.maxlength(), Some(190));
        assert_eq!(
            form.value("email", Lang::Active).unwrap(),
            Some(json!("ada@example.com"))
        );
    }

    #[test_log::test]
    fn redefinition_with_explicit_value_replaces_it() {
        let mut form = users_form();
        form.add("email", FieldOptions::new()).unwrap();
        form.set_value("email", "old@example.com", Lang::Active).unwrap();
        form.add("email", FieldOptions::new().value("new@example.com")).unwrap();
        assert_eq!(
            form.value("email", Lang::Active).unwrap(),
            Some(json!("new@example.com"))
        );
    }

    #[test_log::test]
    fn redefinition_keeps_value_set_after_seed() {
        let mut form = users_form();
        form.add("email", FieldOptions::new().value("seed@example.com"))
            .unwrap();
        form.set_value("email", "typed@example.com", Lang::Active).unwrap();

        form.add("email", FieldOptions::new().label("E-mail")).unwrap();
        assert_eq!(
            form.value("email", Lang::Active).unwrap(),
            Some(json!("typed@example.com"))
        );

        let copy = form.get("email").unwrap().clone();
        let mut other = Form::new(FormOptions::default());
        other.add_field(&copy, FieldOptions::new()).unwrap();
        assert_eq!(
            other.value("email", Lang::Active).unwrap(),
            Some(json!("typed@example.com"))
        );
    }

    #[test_log::test]
    fn type_shorthand() {
        let mut form = users_form();
        let bio = form.add("bio", "text").unwrap();
        assert_eq!(bio.field_type(), "text");
        assert!(bio.is_nullable());
    }

    #[test_log::test]
    fn unknown_type_is_an_error() {
        let mut form = Form::new(FormOptions::default());
        let err = form.add("x", "hologram").unwrap_err();
        assert!(matches!(err, FormError::UnknownFieldType { .. }));
        assert!(form.is_empty());
    }

    #[test_log::test]
    fn password_value_hidden() {
        let mut form = users_form();
        form.add("password", FieldOptions::new()).unwrap();
        form.set_value("password", "hunter2", Lang::Active).unwrap();
        assert_eq!(form.get("password").unwrap().field_type(), "password");
        assert_eq!(form.value("password", Lang::Active).unwrap(), None);
    }

    #[test_log::test]
    fn missing_field_accessors_fail() {
        let mut form = users_form();
        assert!(matches!(
            form.value("nope", Lang::Active),
            Err(FormError::FieldNotFound { .. })
        ));
        assert!(form.set_value("nope", 1, Lang::Active).is_err());
        assert!(!form.contains("nope"));
        assert!(form.get_mut("nope").is_none());
    }

    #[test_log::test]
    fn duplicate_is_independent() {
        let mut form = users_form();
        form.add("email", FieldOptions::new()).unwrap();
        form.set_value("email", "a@example.com", Lang::Active).unwrap();

        let mut copy = form.duplicate();
        copy.set_value("email", "b@example.com", Lang::Active).unwrap();
        copy.add("bio", FieldOptions::new()).unwrap();

        assert_eq!(form.value("email", Lang::Active).unwrap(), Some(json!("a@example.com")));
        assert_eq!(copy.value("email", Lang::Active).unwrap(), Some(json!("b@example.com")));
        assert!(!form.contains("bio"));
        assert_eq!(copy.table(), Some("users"));
    }

    #[test_log::test]
    fn discovered_providers_extend_builtin_types() {
        let provider = KindsProvider::new().kind("color", Arc::new(PlainKind));
        let discovery = StaticDiscovery::new()
            .provider("FormProvider", Arc::new(provider))
            .provider("Other", Arc::new(KindsProvider::new().kind("hidden", Arc::new(PlainKind))));
        let mut form = Form::builder().discovery(Arc::new(discovery)).build();

        assert!(form.registry().contains("text"));
        assert!(form.registry().contains("color"));
        assert!(!form.registry().contains("hidden"));
        assert_eq!(form.add("tint", "color").unwrap().field_type(), "color");
    }

    #[test_log::test]
    fn configured_provider_category_is_used() {
        let discovery = StaticDiscovery::new()
            .provider("Widgets", Arc::new(KindsProvider::new().kind("slider", Arc::new(PlainKind))));
        let config = FormConfig {
            provider_category: "Widgets".to_string(),
            ..FormConfig::default()
        };
        let form = Form::builder().discovery(Arc::new(discovery)).config(config).build();
        assert!(form.registry().contains("slider"));
    }

    #[test_log::test]
    fn register_field_type_per_form() {
        let mut form = Form::new(FormOptions::default());
        form.register_field_type("slug", Arc::new(PlainKind));
        assert_eq!(form.add("path", "slug").unwrap().field_type(), "slug");

        let other = Form::new(FormOptions::default());
        assert!(!other.registry().contains("slug"));
    }

    #[test_log::test]
    fn add_field_carries_value_under_own_name() {
        let mut source = users_form();
        source.add("email", FieldOptions::new()).unwrap();
        source.set_value("email", "ada@example.com", Lang::Active).unwrap();
        let field = source.get("email").unwrap().clone();

        let mut target = Form::new(FormOptions::default());
        let added = target
            .add_field(&field, FieldOptions::new().label("Contact"))
            .unwrap();
        assert_eq!(added.name(), "email");
        assert_eq!(added.label(), Some("Contact"));
        assert_eq!(added.maxlength(), Some(190));
        assert_eq!(
            target.value("email", Lang::Active).unwrap(),
            Some(json!("ada@example.com"))
        );
    }

    #[test_log::test]
    fn debug_lists_field_names() {
        let mut form = users_form();
        form.add("email", FieldOptions::new()).unwrap();
        let rendered = format!("{form:?}");
        assert!(rendered.contains("email"));
        assert!(rendered.contains("users"));
    }
}
