//! Schema-driven form fields
//!
//! `tableform` builds form fields for database tables. Given a field name, it
//! looks the column up in the backing table, infers a field type and the
//! options that go with it, and builds a [`Field`] holding the value.
//!
//! # Architecture
//!
//! - **Collaborators, not drivers**: the schema, the multilang catalog and
//!   provider discovery are traits; a form works with any or none of them
//! - **Open type registry**: field types are [`FieldKind`] objects keyed by
//!   name; providers add or replace them, per form
//! - **Multilang overlay**: translated columns hold one value per language,
//!   read and written relative to an explicit [`LanguageSource`]
//!
//! ```
//! use std::sync::Arc;
//! use tableform::{ColumnMeta, FieldOptions, Form, Lang};
//! use tableform::test_support::InMemorySchema;
//!
//! let schema = InMemorySchema::new().table(
//!     "users",
//!     [("email", ColumnMeta::new("varchar").size(190))],
//! );
//! let mut form = Form::builder().table("users").schema(Arc::new(schema)).build();
//!
//! let email = form.add("email", FieldOptions::new().required(true))?;
//! assert_eq!(email.field_type(), "text");
//! assert_eq!(email.maxlength(), Some(190));
//!
//! form.set_value("email", "ada@example.com", Lang::Active)?;
//! # Ok::<(), tableform::FormError>(())
//! ```

pub mod error;
pub mod field;
pub mod form;
pub mod kinds;
pub mod logging;
pub mod multilang;
pub mod options;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod schema;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{FormError, Result};
pub use field::{Field, StoredValue};
pub use form::{Form, FormBuilder, FormOptions};
pub use kinds::{FieldKind, LinkField, PasswordKind, PlainKind, SelectKind};
pub use multilang::{Lang, LanguageSource, Monolingual, MultilangCatalog, TranslatedTable};
pub use options::{FieldOptions, SelectOption};
pub use provider::{type_names, BuiltinProvider, FieldKindMap, FormProvider, ProviderDiscovery};
pub use registry::FieldTypeRegistry;
pub use resolver::{decimal_step, title_case, ColumnTypeResolver, ResolvedField};
pub use schema::{ColumnFamily, ColumnLength, ColumnMeta, ForeignKey, SchemaLookup, TableSchema};
pub use tableform_config::FormConfig;
