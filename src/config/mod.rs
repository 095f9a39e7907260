//! Configuration system (layered: code > env > config file).
//!
//! The config file is TOML:
//!
//! ```toml
//! [pricing."openai:gpt-4o"]
//! input_text_per_m = 2.5
//! input_cached_text_per_m = 1.25
//! output_text_per_m = 10.0
//!
//! [index_policy]
//! openai-chat = "guess"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::accumulator::IndexPolicy;
use crate::error::{Result, UnillmError};
use crate::models::{LanguageModelId, ProviderKind};
use crate::types::ModelPricing;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "UNILLM_CONFIG";

/// Prefix of per-provider index policy overrides, e.g.
/// `UNILLM_INDEX_POLICY_OPENAI_CHAT=guess`.
pub const INDEX_POLICY_ENV_PREFIX: &str = "UNILLM_INDEX_POLICY_";

static DEFAULT_CONFIG: OnceLock<UnillmConfig> = OnceLock::new();

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    pricing: HashMap<String, ModelPricing>,
    #[serde(default)]
    index_policy: HashMap<String, IndexPolicy>,
}

/// Pricing tables and per-provider streaming overrides.
#[derive(Clone, Debug, Default)]
pub struct UnillmConfig {
    pricing: Arc<RwLock<HashMap<LanguageModelId, ModelPricing>>>,
    index_policies: Arc<RwLock<HashMap<ProviderKind, IndexPolicy>>>,
}

impl UnillmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML config document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(raw)?;
        let config = Self::new();
        for (key, pricing) in file.pricing {
            let model: LanguageModelId = key.parse().map_err(|_| {
                UnillmError::Configuration(format!(
                    "invalid pricing key '{key}', expected 'provider:model'"
                ))
            })?;
            config.set_pricing(model, pricing);
        }
        for (key, policy) in file.index_policy {
            let provider = ProviderKind::parse(&key).ok_or_else(|| {
                UnillmError::Configuration(format!("unknown provider '{key}' in [index_policy]"))
            })?;
            config.set_index_policy(provider, policy);
        }
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config file");
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Load from `.env`, the config file, and environment overrides.
    ///
    /// The file is `$UNILLM_CONFIG` if set (and must then exist), otherwise
    /// the platform config directory's `unillm/config.toml` if present.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(path)?,
                _ => Self::new(),
            },
        };
        config.apply_env_overrides(std::env::vars())?;
        Ok(config)
    }

    /// Get (or load) the global default config.
    ///
    /// Falls back to an empty config if loading fails.
    pub fn global() -> &'static UnillmConfig {
        DEFAULT_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                warn!(error = %e, "failed to load unillm config, using defaults");
                Self::new()
            })
        })
    }

    /// Apply `UNILLM_INDEX_POLICY_<PROVIDER>` overrides from `vars`.
    pub fn apply_env_overrides(
        &self,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<()> {
        for (name, value) in vars {
            let Some(suffix) = name.strip_prefix(INDEX_POLICY_ENV_PREFIX) else {
                continue;
            };
            let provider_key = suffix.to_ascii_lowercase().replace('_', "-");
            let provider = ProviderKind::parse(&provider_key).ok_or_else(|| {
                UnillmError::Configuration(format!("unknown provider in {name}"))
            })?;
            let policy: IndexPolicy = value.trim().to_ascii_lowercase().parse().map_err(|_| {
                UnillmError::Configuration(format!(
                    "invalid index policy '{value}' in {name} (expected 'explicit' or 'guess')"
                ))
            })?;
            self.set_index_policy(provider, policy);
        }
        Ok(())
    }

    pub fn set_pricing(&self, model: LanguageModelId, pricing: ModelPricing) {
        self.pricing
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(model, pricing);
    }

    pub fn pricing_for(&self, model: &LanguageModelId) -> Option<ModelPricing> {
        self.pricing
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(model)
            .cloned()
    }

    pub fn set_index_policy(&self, provider: ProviderKind, policy: IndexPolicy) {
        self.index_policies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(provider, policy);
    }

    /// Configured override, else the provider's native policy.
    pub fn index_policy_for(&self, provider: ProviderKind) -> IndexPolicy {
        self.index_policies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&provider)
            .copied()
            .unwrap_or_else(|| provider.index_policy())
    }
}

/// `<platform config dir>/unillm/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "unillm")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_keys_are_normalized() {
        let config = UnillmConfig::from_toml_str(
            r#"
            [pricing."claude:claude-haiku"]
            input_text_per_m = 0.8
            output_text_per_m = 4.0
            "#,
        )
        .unwrap();
        let pricing = config
            .pricing_for(&LanguageModelId::new(ProviderKind::Anthropic, "claude-haiku"))
            .unwrap();
        assert_eq!(pricing.input_text_per_m, 0.8);
        assert_eq!(pricing.input_cached_text_per_m, None);
    }

    #[test]
    fn index_policy_defaults_to_provider_convention() {
        let config = UnillmConfig::new();
        assert_eq!(config.index_policy_for(ProviderKind::Google), IndexPolicy::Guess);
        assert_eq!(
            config.index_policy_for(ProviderKind::OpenAiChat),
            IndexPolicy::Explicit
        );
    }

    #[test]
    fn env_override_beats_file() {
        let config =
            UnillmConfig::from_toml_str("[index_policy]\nopenai-chat = \"guess\"\n").unwrap();
        assert_eq!(config.index_policy_for(ProviderKind::OpenAiChat), IndexPolicy::Guess);

        config
            .apply_env_overrides([
                ("UNILLM_INDEX_POLICY_OPENAI_CHAT".to_string(), "Explicit".to_string()),
                ("UNRELATED".to_string(), "x".to_string()),
            ])
            .unwrap();
        assert_eq!(
            config.index_policy_for(ProviderKind::OpenAiChat),
            IndexPolicy::Explicit
        );
    }

    #[test]
    fn bad_env_override_is_a_configuration_error() {
        let config = UnillmConfig::new();
        let err = config
            .apply_env_overrides([(
                "UNILLM_INDEX_POLICY_GOOGLE".to_string(),
                "sometimes".to_string(),
            )])
            .unwrap_err();
        assert!(matches!(err, UnillmError::Configuration(_)));
    }
}
