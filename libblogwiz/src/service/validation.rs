//! Platform credential validation
//!
//! Answers one question: can this credential bundle address its target?
//! Validation is a plain predicate. It never errors and never touches
//! anything outside its arguments; turning a `false` into a user-facing
//! message is the caller's job.

use crate::platforms::{Platform, PlatformConfig, PlatformSettings};

/// Validator for [`PlatformConfig`] bundles
///
/// # Example
///
/// ```
/// use libblogwiz::platforms::{NaverConfig, PlatformConfig};
/// use libblogwiz::service::validation::ConfigValidator;
///
/// let config = PlatformConfig::Naver(NaverConfig {
///     client_id: String::new(),
///     client_secret: "s".to_string(),
///     blog_id: "b".to_string(),
/// });
/// assert!(!ConfigValidator::is_valid(&config));
/// assert_eq!(ConfigValidator::missing_fields(&config), vec!["clientId"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigValidator;

/// Validation result for a single platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformValidation {
    pub platform: Platform,
    pub valid: bool,
    /// Credential fields that are empty
    pub missing: Vec<&'static str>,
}

impl ConfigValidator {
    /// True when every credential the target needs is non-blank
    pub fn is_valid(config: &PlatformConfig) -> bool {
        Self::missing_fields(config).is_empty()
    }

    /// Like [`ConfigValidator::is_valid`], addressed by tag
    ///
    /// Unknown tags, and tags naming a different target than `config`, are
    /// invalid.
    pub fn is_valid_for(tag: &str, config: &PlatformConfig) -> bool {
        match tag.parse::<Platform>() {
            Ok(platform) => platform == config.platform() && Self::is_valid(config),
            Err(_) => false,
        }
    }

    /// Names of the blank credential fields, in declaration order
    pub fn missing_fields(config: &PlatformConfig) -> Vec<&'static str> {
        let fields: Vec<(&'static str, &str)> = match config {
            PlatformConfig::Tistory(cfg) => vec![
                ("accessToken", cfg.access_token.as_str()),
                ("blogName", cfg.blog_name.as_str()),
            ],
            PlatformConfig::Naver(cfg) => vec![
                ("clientId", cfg.client_id.as_str()),
                ("clientSecret", cfg.client_secret.as_str()),
                ("blogId", cfg.blog_id.as_str()),
            ],
            PlatformConfig::Custom => Vec::new(),
        };
        fields
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    /// Check every target's stored credentials
    pub fn validate_all(settings: &PlatformSettings) -> Vec<PlatformValidation> {
        Platform::ALL
            .iter()
            .map(|&platform| {
                let missing = Self::missing_fields(&settings.config_for(platform));
                PlatformValidation {
                    platform,
                    valid: missing.is_empty(),
                    missing,
                }
            })
            .collect()
    }
}
