//! Typed configuration for the form layer.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ConfigResult;

/// Category name passed to provider discovery when collecting field types.
pub const DEFAULT_PROVIDER_CATEGORY: &str = "FormProvider";

/// Settings that tune how forms resolve field types.
///
/// Every key has a default, so an empty configuration source yields a usable
/// value. See [`crate::ConfigProvider`] for the precedence of sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Category requested from provider discovery.
    pub provider_category: String,
    /// Label of the blank choice prepended to enum selects.
    pub empty_option_label: String,
    /// Column name that turns a varchar/char column into a password field.
    pub password_field: String,
    /// Type used when no column matches or the column family is unknown.
    pub fallback_type: String,
    /// Type used for foreign keys when no link field claims the column.
    pub link_fallback_type: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            provider_category: DEFAULT_PROVIDER_CATEGORY.to_string(),
            empty_option_label: String::new(),
            password_field: "password".to_string(),
            fallback_type: "text".to_string(),
            link_fallback_type: "select".to_string(),
        }
    }
}

impl FormConfig {
    /// Reject settings that would make type resolution meaningless.
    ///
    /// `empty_option_label` may be empty; every other key must not be.
    pub fn validate(&self) -> ConfigResult<()> {
        let required = [
            ("provider_category", &self.provider_category),
            ("password_field", &self.password_field),
            ("fallback_type", &self.fallback_type),
            ("link_fallback_type", &self.link_fallback_type),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::empty_value(key));
            }
        }
        Ok(())
    }
}
