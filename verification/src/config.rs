//! Gate configuration with TOML file support.

use crate::VerificationError;
use agegate_agent::{DetectionMode, DEFAULT_MEMO_WINDOW_SECS};
use agegate_protocol::version::ensure_compatible;
use agegate_protocol::{normalize_origin, AUTO_LOCALE, PROTOCOL_VERSION};
use agegate_store::DEFAULT_COOKIE_NAME;
use agegate_surface::{DEFAULT_MAX_HEIGHT, DEFAULT_MIN_HEIGHT};
use agegate_token::{ValidatorConfig, DEFAULT_ISSUER};
use agegate_types::{PublicKey, Theme};
use agegate_utils::LogFormat;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use url::Url;

/// Deployment configuration for the gate.
///
/// The trusted origins and the signing public key are deployment secrets and
/// are never compiled in. Load with [`GateConfig::from_toml_file`] or build
/// programmatically for tests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Verification service URL. `{asset_id}` is substituted when present.
    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// Expected token issuer.
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Ed25519 token signing key, hex encoded.
    #[serde(default)]
    pub public_key: String,

    /// Origins allowed to message the gate.
    #[serde(default = "default_trusted_origins")]
    pub trusted_origins: Vec<String>,

    /// Also trust localhost and loopback origins (development).
    #[serde(default)]
    pub allow_local_origins: bool,

    #[serde(default = "default_protocol_version")]
    pub protocol_version: u16,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default)]
    pub default_theme: Theme,

    /// `"auto"` negotiates from the browser languages.
    #[serde(default = "default_locale")]
    pub default_locale: String,

    #[serde(default = "default_supported_locales")]
    pub supported_locales: Vec<String>,

    /// Let recognised automated agents skip verification under this mode.
    /// Unknown mode names fall back to `signature`.
    #[serde(default, deserialize_with = "deserialize_mode")]
    pub bypass_agents: Option<DetectionMode>,

    #[serde(default = "default_agent_memo_secs")]
    pub agent_memo_secs: u64,

    #[serde(default = "default_min_frame_height")]
    pub min_frame_height: u32,

    #[serde(default = "default_max_frame_height")]
    pub max_frame_height: u32,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_service_url() -> String {
    "https://verify.agegate.example/v/{asset_id}".to_string()
}

fn default_issuer() -> String {
    DEFAULT_ISSUER.to_string()
}

fn default_trusted_origins() -> Vec<String> {
    vec!["https://verify.agegate.example".to_string()]
}

fn default_protocol_version() -> u16 {
    PROTOCOL_VERSION
}

fn default_cookie_name() -> String {
    DEFAULT_COOKIE_NAME.to_string()
}

fn default_locale() -> String {
    AUTO_LOCALE.to_string()
}

fn default_supported_locales() -> Vec<String> {
    ["en", "de", "fr", "es", "it", "nl", "pt", "ja"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_agent_memo_secs() -> u64 {
    DEFAULT_MEMO_WINDOW_SECS
}

fn default_min_frame_height() -> u32 {
    DEFAULT_MIN_HEIGHT
}

fn default_max_frame_height() -> u32 {
    DEFAULT_MAX_HEIGHT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn deserialize_mode<'de, D>(deserializer: D) -> Result<Option<DetectionMode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(|name| DetectionMode::parse(&name)))
}

// ── Impl ───────────────────────────────────────────────────────────────

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            issuer: default_issuer(),
            public_key: String::new(),
            trusted_origins: default_trusted_origins(),
            allow_local_origins: false,
            protocol_version: default_protocol_version(),
            cookie_name: default_cookie_name(),
            default_theme: Theme::default(),
            default_locale: default_locale(),
            supported_locales: default_supported_locales(),
            bypass_agents: None,
            agent_memo_secs: default_agent_memo_secs(),
            min_frame_height: default_min_frame_height(),
            max_frame_height: default_max_frame_height(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl GateConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, VerificationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            VerificationError::Configuration(format!("{}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, VerificationError> {
        toml::from_str(s).map_err(|e| VerificationError::Configuration(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, VerificationError> {
        toml::to_string_pretty(self).map_err(|e| VerificationError::Configuration(e.to_string()))
    }

    /// Check everything that would otherwise fail later at launch or
    /// validation time.
    pub fn validate(&self) -> Result<(), VerificationError> {
        self.signing_key()?;
        self.service_origin()?;

        if self.issuer.trim().is_empty() {
            return Err(VerificationError::Configuration("issuer is empty".into()));
        }
        if self.trusted_origins.is_empty() && !self.allow_local_origins {
            return Err(VerificationError::Configuration(
                "no trusted origins configured".into(),
            ));
        }
        if let Some(bad) = self
            .trusted_origins
            .iter()
            .find(|o| normalize_origin(o).is_none())
        {
            return Err(VerificationError::Configuration(format!(
                "invalid trusted origin: {bad}"
            )));
        }
        ensure_compatible(self.protocol_version).map_err(|e| {
            VerificationError::Configuration(format!("{e} (this build speaks {PROTOCOL_VERSION})"))
        })?;
        if self.cookie_name.trim().is_empty() {
            return Err(VerificationError::Configuration("cookie_name is empty".into()));
        }
        if self.min_frame_height > self.max_frame_height {
            return Err(VerificationError::Configuration(format!(
                "min_frame_height {} exceeds max_frame_height {}",
                self.min_frame_height, self.max_frame_height
            )));
        }
        Ok(())
    }

    /// The decoded token signing key.
    pub fn signing_key(&self) -> Result<PublicKey, VerificationError> {
        if self.public_key.trim().is_empty() {
            return Err(VerificationError::Configuration("public_key is not set".into()));
        }
        agegate_crypto::public_key_from_hex(self.public_key.trim())
            .map_err(|e| VerificationError::Configuration(format!("public_key: {e}")))
    }

    pub fn validator_config(&self) -> Result<ValidatorConfig, VerificationError> {
        Ok(ValidatorConfig {
            public_key: self.signing_key()?,
            issuer: self.issuer.clone(),
        })
    }

    /// Origin outbound messages are addressed to.
    pub fn service_origin(&self) -> Result<String, VerificationError> {
        let probe = self.service_url.replace(agegate_protocol::ASSET_ID_PLACEHOLDER, "asset");
        let url = Url::parse(&probe)
            .map_err(|e| VerificationError::Configuration(format!("service_url: {e}")))?;
        normalize_origin(url.as_str()).ok_or_else(|| {
            VerificationError::Configuration(format!(
                "service_url must be http(s): {}",
                self.service_url
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

    #[test]
    fn empty_toml_gives_defaults() {
        let config = GateConfig::from_toml_str("").unwrap();
        assert_eq!(config, GateConfig::default());
        assert_eq!(config.cookie_name, DEFAULT_COOKIE_NAME);
        assert_eq!(config.default_locale, "auto");
        assert_eq!(config.bypass_agents, None);
    }

    #[test]
    fn parses_overrides() {
        let config = GateConfig::from_toml_str(&format!(
            r#"
            public_key = "{KEY}"
            trusted_origins = ["https://verify.example.com"]
            allow_local_origins = true
            default_theme = "dark"
            bypass_agents = "strict"
            min_frame_height = 300
            log_format = "json"
            "#
        ))
        .unwrap();
        assert_eq!(config.default_theme, Theme::Dark);
        assert_eq!(config.bypass_agents, Some(DetectionMode::Strict));
        assert_eq!(config.min_frame_height, 300);
        assert_eq!(config.log_format, LogFormat::Json);
        config.validate().unwrap();
    }

    #[test]
    fn unknown_bypass_mode_falls_back_to_signature() {
        let config = GateConfig::from_toml_str(r#"bypass_agents = "psychic""#).unwrap();
        assert_eq!(config.bypass_agents, Some(DetectionMode::Signature));
    }

    #[test]
    fn validate_requires_key() {
        let err = GateConfig::default().validate().unwrap_err();
        assert!(err.is_fatal());

        let config = GateConfig {
            public_key: "abcd".into(),
            ..GateConfig::default()
        };
        assert!(matches!(config.validate(), Err(VerificationError::Configuration(_))));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let good = GateConfig {
            public_key: KEY.into(),
            ..GateConfig::default()
        };
        good.validate().unwrap();

        let cases = [
            GateConfig {
                service_url: "ftp://verify.example".into(),
                ..good.clone()
            },
            GateConfig {
                trusted_origins: vec!["not a url".into()],
                ..good.clone()
            },
            GateConfig {
                protocol_version: 99,
                ..good.clone()
            },
            GateConfig {
                min_frame_height: 901,
                ..good.clone()
            },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn service_origin_ignores_template() {
        let config = GateConfig::default();
        assert_eq!(config.service_origin().unwrap(), "https://verify.agegate.example");
    }

    #[test]
    fn toml_roundtrip() {
        let config = GateConfig {
            public_key: KEY.into(),
            bypass_agents: Some(DetectionMode::Combined),
            ..GateConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(GateConfig::from_toml_str(&text).unwrap(), config);
    }
}
