//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("server.network is required")]
    MissingNetworkName,
    #[error("server.host_prefix must be non-empty and contain no spaces, '!' or '@', got {0:?}")]
    InvalidHostPrefix(String),
    #[error("oper block #{0} has an empty name")]
    EmptyOperName(usize),
    #[error("oper {0:?} has an empty password")]
    EmptyOperPassword(String),
    #[error("services block #{0} has an empty password")]
    EmptyServicesPassword(usize),
    #[error("captcha.url is required when [captcha] is present")]
    MissingCaptchaUrl,
    #[error("captcha.hmac_secret is required when [captcha] is present")]
    MissingCaptchaSecret,
    #[error("output.retained_batches must be at least 1")]
    ZeroRetainedBatches,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Required fields
    if config.server.name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    }
    if config.server.network.is_empty() {
        errors.push(ValidationError::MissingNetworkName);
    }
    let prefix = &config.server.host_prefix;
    if prefix.is_empty() || prefix.contains([' ', '!', '@']) {
        errors.push(ValidationError::InvalidHostPrefix(prefix.clone()));
    }

    for (i, oper) in config.oper.iter().enumerate() {
        if oper.name.is_empty() {
            errors.push(ValidationError::EmptyOperName(i));
        } else if oper.password.is_empty() {
            errors.push(ValidationError::EmptyOperPassword(oper.name.clone()));
        }
    }
    for (i, services) in config.services.iter().enumerate() {
        if services.password.is_empty() {
            errors.push(ValidationError::EmptyServicesPassword(i));
        }
    }

    if let Some(ref captcha) = config.captcha {
        if captcha.url.is_empty() {
            errors.push(ValidationError::MissingCaptchaUrl);
        }
        if captcha.hmac_secret.is_empty() {
            errors.push(ValidationError::MissingCaptchaSecret);
        }
    }

    if config.output.retained_batches == 0 {
        errors.push(ValidationError::ZeroRetainedBatches);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CaptchaConfig, OperBlock};

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate(&Config::default()), Ok(()));
    }

    #[test]
    fn collects_every_error() {
        let mut config = Config::default();
        config.server.name.clear();
        config.server.host_prefix = "bad host".into();
        config.oper.push(OperBlock {
            name: "root".into(),
            password: String::new(),
        });
        config.captcha = Some(CaptchaConfig {
            url: String::new(),
            hmac_secret: "k".into(),
            required_for_login: false,
            validity_secs: 60,
        });
        config.output.retained_batches = 0;

        let errors = validate(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingServerName,
                ValidationError::InvalidHostPrefix("bad host".into()),
                ValidationError::EmptyOperPassword("root".into()),
                ValidationError::MissingCaptchaUrl,
                ValidationError::ZeroRetainedBatches,
            ]
        );
    }
}
