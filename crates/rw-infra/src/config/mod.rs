//! Configuration loader.
//!
//! Reads the TOML file and maps it into the `WizardConfig` DTO. Whatever
//! the file holds is accepted as-is: no validation, no defaults.

use std::path::Path;

use anyhow::Context;
use rw_core::config::WizardConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<WizardConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    WizardConfig::from_toml(&toml_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_load_config_reads_valid_toml() {
        let temp_file = write_config(
            r#"
            [api]
            base_url = "https://register.example.org"
            timeout_secs = 30

            [rules]
            password_pattern = "^.{10,}$"
            "#,
        );

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.api_base_url, "https://register.example.org");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.password_pattern, "^.{10,}$");
        assert_eq!(config.api_prefix, "");
        assert_eq!(config.username_pattern, "");
    }

    #[test]
    fn test_load_config_accepts_empty_file() {
        let temp_file = write_config("");
        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config, WizardConfig::empty());
    }

    #[test]
    fn test_load_config_rejects_invalid_toml() {
        let temp_file = write_config("[api\nbase_url = ");
        let err = load_config(temp_file.path()).unwrap_err();
        assert!(
            err.to_string().contains("Failed to parse config as TOML"),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn test_load_config_returns_io_error_on_file_not_found() {
        let err = load_config(Path::new("/this/path/does/not/exist/regwizard.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
