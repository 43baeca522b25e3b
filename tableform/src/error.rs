//! Error types for form construction

use tableform_config::ConfigError;
use thiserror::Error;

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormError>;

/// Errors raised while building forms and fields
#[derive(Debug, Error)]
pub enum FormError {
    /// Resolved type name has no registered implementation
    #[error("field type \"{type_name}\" does not exist")]
    UnknownFieldType { type_name: String },

    /// Field not present in the form
    #[error("field not found: {name}")]
    FieldNotFound { name: String },

    /// Schema collaborator failed to describe a table
    #[error("schema lookup failed for table '{table}': {message}")]
    SchemaLookup { table: String, message: String },

    /// Multilang catalog failed to list translated tables
    #[error("multilang catalog error: {message}")]
    Multilang { message: String },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl FormError {
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        FormError::UnknownFieldType {
            type_name: type_name.into(),
        }
    }
}
