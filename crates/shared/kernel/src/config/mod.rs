use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// Prefix of environment overrides, e.g. `OGS__DATABASE__URL`.
pub const ENV_PREFIX: &str = "OGS";
/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_VAR: &str = "OGS_CONFIG";
/// Config file looked up in the working directory when no path is given (any supported extension).
pub const DEFAULT_CONFIG: &str = "server";

/// Custom error type for config loading.
#[ogs_derive::ogs_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// 1. **Base File**: an explicit `path` must exist. Without one, `server.{toml,json,yaml}` in the
///    working directory is used when present.
/// 2. **Environment Overrides**: values from variables prefixed with `OGS__`, nested with
///    double underscores (`OGS__SCHULHOF__ROOM_NAME` maps to `schulhof.room_name`).
///
/// Fields missing from both layers fall back to the target type's serde defaults.
///
/// # Errors
/// * The explicitly given file does not exist or cannot be parsed.
/// * The merged values do not match the structure of `T`.
///
/// # Example
/// ```rust
/// use ogs_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local.toml")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let file = match &path {
        Some(path) => {
            info!("Loading config from {}", path.as_ref().display());
            File::from(path.as_ref()).required(true)
        },
        None => {
            info!("Loading optional config '{DEFAULT_CONFIG}' from the working directory");
            File::with_name(DEFAULT_CONFIG).required(false)
        },
    };

    let config = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
