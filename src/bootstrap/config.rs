//! Config resolution for the binary.
//!
//! The loader in `rw-infra` only maps the file. This module decides which
//! file to read, applies command line overrides and fills in defaults.

use std::path::{Path, PathBuf};

use rw_core::config::WizardConfig;
use rw_infra::load_config;
use tracing::{debug, info};

/// `<config dir>/regwizard/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("regwizard").join("config.toml"))
}

/// Resolve the effective configuration.
///
/// An explicit path must exist. Without one the default location is used
/// when present, otherwise the built-in defaults apply.
pub fn resolve_config(
    explicit: Option<PathBuf>,
    base_url: Option<String>,
) -> anyhow::Result<WizardConfig> {
    resolve_config_from(explicit, default_config_path().as_deref(), base_url)
}

pub(crate) fn resolve_config_from(
    explicit: Option<PathBuf>,
    fallback: Option<&Path>,
    base_url: Option<String>,
) -> anyhow::Result<WizardConfig> {
    let mut config = match explicit {
        Some(path) => load_config(&path)?,
        None => match fallback.filter(|path| path.exists()) {
            Some(path) => load_config(path)?,
            None => {
                info!("no config file found, using built-in defaults");
                WizardConfig::empty()
            }
        },
    };

    if let Some(base_url) = base_url {
        config.api_base_url = base_url;
    }

    let config = config.with_defaults();
    debug!(
        base_url = %config.api_base_url,
        prefix = %config.api_prefix,
        timeout_secs = config.timeout_secs,
        "registration config resolved"
    );
    Ok(config)
}
