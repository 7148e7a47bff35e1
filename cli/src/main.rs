//! AgeGate CLI: inspect tokens, classify user agents and build launch URLs
//! against a gate configuration.

use agegate_agent::{AgentClassifier, ClientProfile, DetectionMode, GraphicsInfo};
use agegate_protocol::{build_launch_url, negotiate_locale, LaunchParams, RedirectUrls};
use agegate_token::{decode, TokenValidator};
use agegate_types::{SystemClock, Theme, Timestamp, VerificationIdentity};
use agegate_utils::{format_relative, init_logging, LogFormat};
use agegate_verification::{GateConfig, LaunchMode};
use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "agegate", about = "AgeGate verification tooling")]
struct Cli {
    /// Path to a TOML gate configuration. CLI flags and env vars override it.
    #[arg(long, env = "AGEGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Hex-encoded Ed25519 token signing key.
    #[arg(long, env = "AGEGATE_PUBLIC_KEY")]
    public_key: Option<String>,

    /// Expected token issuer.
    #[arg(long, env = "AGEGATE_ISSUER")]
    issuer: Option<String>,

    /// Verification service URL; `{asset_id}` is substituted.
    #[arg(long, env = "AGEGATE_SERVICE_URL")]
    service_url: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "AGEGATE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "AGEGATE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print a token's claims without checking the signature.
    Decode { token: String },

    /// Fully validate a token for a host.
    Validate {
        token: String,

        /// Page host the token is presented on.
        #[arg(long)]
        host: String,

        /// Evaluate at this Unix time instead of now.
        #[arg(long)]
        now: Option<u64>,
    },

    /// Classify a client as an automated agent.
    Classify {
        #[arg(long)]
        user_agent: String,

        /// signature, environment, no-storage, combined or strict.
        #[arg(long, default_value = "signature")]
        mode: String,

        /// Installed plugin count.
        #[arg(long)]
        plugins: Option<usize>,

        /// Preferred languages (comma-separated).
        #[arg(long, value_delimiter = ',', default_value = "en-US,en")]
        languages: Vec<String>,

        /// Unmasked WebGL renderer string.
        #[arg(long)]
        renderer: Option<String>,

        /// The client cannot persist cookies.
        #[arg(long)]
        no_storage: bool,
    },

    /// Build the URL the verification surface is opened at.
    LaunchUrl {
        #[arg(long)]
        asset: String,

        #[arg(long)]
        reference: String,

        #[arg(long)]
        theme: Option<Theme>,

        /// Locale tag or "auto".
        #[arg(long)]
        locale: Option<String>,

        /// JSON metadata, at most 256 bytes serialized.
        #[arg(long)]
        metadata: Option<String>,

        /// Full-page redirect instead of the embedded frame.
        #[arg(long)]
        redirect: bool,

        #[arg(long)]
        success_url: Option<String>,

        #[arg(long)]
        error_url: Option<String>,

        #[arg(long)]
        cancel_url: Option<String>,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<GateConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let config = GateConfig::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded gate configuration");
            config
        }
        None => GateConfig::default(),
    };
    if let Some(key) = &cli.public_key {
        config.public_key = key.clone();
    }
    if let Some(issuer) = &cli.issuer {
        config.issuer = issuer.clone();
    }
    if let Some(url) = &cli.service_url {
        config.service_url = url.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn decode_token(token: &str) -> anyhow::Result<()> {
    let Some(claims) = decode(token) else {
        bail!("token is not a well-formed verification token");
    };
    let expires_in = claims.expires_at().secs_from(Timestamp::now());
    print_json(&serde_json::json!({
        "claims": claims,
        "expires": format_relative(expires_in),
    }))
}

fn validate_token(
    config: &GateConfig,
    token: &str,
    host: &str,
    now: Option<u64>,
) -> anyhow::Result<()> {
    let validator = TokenValidator::new(config.validator_config()?);
    let now = now.map(Timestamp::new).unwrap_or_else(Timestamp::now);
    let result = validator.validate(token, host, now);

    print_json(&serde_json::json!({
        "valid": result.valid,
        "is_of_age": result.is_of_age,
        "error": result.error.as_ref().map(|e| e.kind()),
        "detail": result.error.as_ref().map(|e| e.to_string()),
        "expires": result
            .claims
            .as_ref()
            .map(|c| format_relative(c.expires_at().secs_from(now))),
    }))?;
    if !result.valid {
        bail!("token rejected");
    }
    Ok(())
}

fn classify(
    user_agent: String,
    mode: &str,
    plugins: Option<usize>,
    languages: Vec<String>,
    renderer: Option<String>,
    no_storage: bool,
) -> anyhow::Result<()> {
    let mode = DetectionMode::parse(mode);
    let mut profile = ClientProfile::browser(user_agent);
    profile.plugin_count = plugins.or(profile.plugin_count);
    profile.languages = languages;
    if let Some(renderer) = renderer {
        profile.graphics = Some(GraphicsInfo {
            vendor: String::new(),
            renderer,
        });
    }
    profile.can_persist = !no_storage;

    let classifier = AgentClassifier::new(Arc::new(SystemClock));
    let automated = classifier.is_automated_agent(mode, &profile);
    print_json(&serde_json::json!({
        "mode": mode,
        "automated": automated,
    }))
}

#[allow(clippy::too_many_arguments)]
fn launch_url(
    config: &GateConfig,
    asset: String,
    reference: String,
    theme: Option<Theme>,
    locale: Option<String>,
    metadata: Option<String>,
    redirect: bool,
    redirects: RedirectUrls,
) -> anyhow::Result<()> {
    let metadata = metadata
        .map(|raw| serde_json::from_str(&raw).context("metadata is not JSON"))
        .transpose()?;
    let identity = VerificationIdentity::new(asset, reference, metadata)?;
    let mode = if redirect {
        if redirects.success_url.is_none() {
            bail!("--redirect requires --success-url");
        }
        LaunchMode::Redirect
    } else {
        LaunchMode::Modal
    };
    let fallback = config
        .supported_locales
        .first()
        .map(String::as_str)
        .unwrap_or("en");
    let requested = locale.unwrap_or_else(|| config.default_locale.clone());

    let params = LaunchParams {
        asset_id: identity.asset_id,
        reference_id: identity.reference_id,
        theme: theme.unwrap_or(config.default_theme),
        locale: negotiate_locale(&requested, &[], &config.supported_locales, fallback),
        protocol_version: config.protocol_version,
        metadata: identity.metadata,
        redirects,
        mode: mode.as_param(),
    };
    println!("{}", build_launch_url(&config.service_url, &params)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format, &config.log_level);

    match cli.command {
        Command::Decode { token } => decode_token(&token),
        Command::Validate { token, host, now } => validate_token(&config, &token, &host, now),
        Command::Classify {
            user_agent,
            mode,
            plugins,
            languages,
            renderer,
            no_storage,
        } => classify(user_agent, &mode, plugins, languages, renderer, no_storage),
        Command::LaunchUrl {
            asset,
            reference,
            theme,
            locale,
            metadata,
            redirect,
            success_url,
            error_url,
            cancel_url,
        } => launch_url(
            &config,
            asset,
            reference,
            theme,
            locale,
            metadata,
            redirect,
            RedirectUrls {
                success_url,
                error_url,
                cancel_url,
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from([
            "agegate",
            "--log-format",
            "json",
            "classify",
            "--user-agent",
            "Googlebot/2.1",
            "--mode",
            "strict",
            "--languages",
            "de,en",
        ])
        .unwrap();
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        match cli.command {
            Command::Classify { mode, languages, .. } => {
                assert_eq!(mode, "strict");
                assert_eq!(languages, vec!["de", "en"]);
            }
            _ => panic!("expected classify"),
        }
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "agegate",
            "--issuer",
            "https://issuer.example",
            "decode",
            "a.b.c",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.issuer, "https://issuer.example");
        assert_eq!(config.cookie_name, "agegate_session");
    }
}
