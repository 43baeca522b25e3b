//! Configuration management for tableform using Figment
//!
//! Loads a [`FormConfig`] from layered sources with clear precedence:
//! defaults → global file → project file → environment.
//!
//! # Configuration Files
//!
//! - Global: `~/.tableform/tableform.{toml,yaml,yml,json}`
//! - Project: `./.tableform/tableform.{toml,yaml,yml,json}`
//!
//! ```toml
//! provider_category = "FormProvider"
//! empty_option_label = "-- choose --"
//! link_fallback_type = "select"
//! ```
//!
//! # Environment Variables
//!
//! ```bash
//! export TABLEFORM_EMPTY_OPTION_LABEL="-- choose --"   # → empty_option_label
//! export TABLEFORM_FALLBACK_TYPE="text"                # → fallback_type
//! ```
//!
//! ```no_run
//! use tableform_config::load_configuration;
//!
//! let config = load_configuration()?;
//! println!("providers from category {}", config.provider_category);
//! # Ok::<(), tableform_config::ConfigError>(())
//! ```

pub mod discovery;
pub mod error;
pub mod provider;
pub mod types;

pub use discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery};
pub use error::ConfigError;
pub use provider::{ConfigProvider, ENV_PREFIX};
pub use types::{FormConfig, DEFAULT_PROVIDER_CATEGORY};

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load the form configuration from the standard locations.
pub fn load_configuration() -> ConfigResult<FormConfig> {
    ConfigProvider::new().load()
}
