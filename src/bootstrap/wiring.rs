//! Dependency injection.
//!
//! The only place that depends on `rw-app` and `rw-infra` at the same
//! time. Assembles adapters behind their ports; makes no decisions.

use std::sync::Arc;

use anyhow::Context;
use rw_app::RegistrationWizard;
use rw_core::config::WizardConfig;
use rw_core::ports::{DialogHostPort, WizardViewPort};
use rw_core::registration::RegexRules;
use rw_infra::HttpRegistrationApi;

/// Compile the configured username and password rules.
pub fn build_rules(config: &WizardConfig) -> anyhow::Result<RegexRules> {
    RegexRules::new(&config.username_pattern, &config.password_pattern)
        .context("Invalid validation rule in config")
}

/// Build a wizard backed by the HTTP registration API.
pub fn wire_wizard(
    config: &WizardConfig,
    view: Arc<dyn WizardViewPort>,
    dialog_host: Arc<dyn DialogHostPort>,
) -> anyhow::Result<RegistrationWizard> {
    let api = HttpRegistrationApi::new(config)?;
    let rules = build_rules(config)?;
    Ok(RegistrationWizard::new(
        Arc::new(api),
        view,
        dialog_host,
        Arc::new(rules),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rw_core::registration::ValidationRules;

    #[test]
    fn test_build_rules_uses_configured_patterns() {
        let config = WizardConfig {
            username_pattern: "^[a-z]{2,4}$".to_string(),
            ..WizardConfig::default()
        };
        let rules = build_rules(&config).unwrap();
        assert!(rules.is_valid_username("ab"));
        assert!(!rules.is_valid_username("Alice"));
        assert!(rules.is_valid_password("Secret123"));
    }

    #[test]
    fn test_build_rules_rejects_broken_pattern() {
        let config = WizardConfig {
            password_pattern: "^(unclosed".to_string(),
            ..WizardConfig::default()
        };
        let err = build_rules(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid validation rule"));
    }
}
