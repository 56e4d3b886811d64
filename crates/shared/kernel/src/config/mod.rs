use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides, e.g. `VREG__REGISTRATION__ENDPOINT`.
pub const ENV_PREFIX: &str = "VREG";
const DEFAULT_CONFIG_FILE: &str = "server";

/// Custom error type for config loading.
#[vreg_derive::vreg_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads settings from a file overlaid with environment variables.
///
/// 1. **Base File**: `path`, or `server.*` in the working directory when `None`. An explicit
///    path must exist; the implicit default may be absent, in which case every section falls
///    back to its defaults.
/// 2. **Environment Overrides**: variables prefixed with `VREG__`, nested with double
///    underscores (`VREG__POLICY__FREE_HOURS` maps to `policy.free_hours`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing or unreadable, or the merged
/// values do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use vreg_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let vars = std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
    load_config_with_env(path, vars)
}

/// [`load_config`] with an explicit set of environment variables instead of the process
/// environment. Variables without the `VREG__` prefix are ignored.
///
/// # Errors
/// Same as [`load_config`].
pub fn load_config_with_env<T, I>(path: Option<impl AsRef<Path>>, vars: I) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = (String, String)>,
{
    let required = path.is_some();
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake)
                .source(Some(vars.into_iter().collect::<Map<String, String>>())),
        );

    info!(path = %effective_path.display(), required, "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
