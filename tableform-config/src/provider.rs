//! Configuration provider using Figment

use crate::{
    discovery::{ConfigFile, ConfigFormat, FileDiscovery},
    types::FormConfig,
    ConfigResult,
};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use tracing::{debug, trace};

/// Environment variable prefix recognised by the provider.
pub const ENV_PREFIX: &str = "TABLEFORM_";

/// Loads [`FormConfig`] from all sources.
///
/// Sources are merged in precedence order, later sources overriding earlier:
/// 1. Built-in defaults
/// 2. Discovered files (global, then project)
/// 3. `TABLEFORM_*` environment variables
///
/// Nothing is cached; each call reads the sources afresh.
#[derive(Debug, Default)]
pub struct ConfigProvider {
    discovery: FileDiscovery,
}

impl ConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider reading files through a caller-supplied discovery.
    pub fn with_discovery(discovery: FileDiscovery) -> Self {
        Self { discovery }
    }

    /// Load and validate the form configuration.
    pub fn load(&self) -> ConfigResult<FormConfig> {
        let config: FormConfig = self.build_figment().extract()?;
        config.validate()?;
        debug!(
            provider_category = %config.provider_category,
            fallback_type = %config.fallback_type,
            "loaded form configuration"
        );
        Ok(config)
    }

    fn build_figment(&self) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(FormConfig::default()));
        for file in self.discovery.discover_all() {
            trace!(
                "Loading config file: {} ({:?})",
                file.path.display(),
                file.format
            );
            figment = figment.merge(file_provider(&file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).map(|key| key.as_str().to_lowercase().into()))
    }
}

fn file_provider(file: &ConfigFile) -> Figment {
    match file.format {
        ConfigFormat::Toml => Figment::from(Toml::file(&file.path)),
        ConfigFormat::Yaml => Figment::from(Yaml::file(&file.path)),
        ConfigFormat::Json => Figment::from(Json::file(&file.path)),
    }
}
