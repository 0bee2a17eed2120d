//! Configuration for the event tweaker
//!
//! [`TweakerConfig`] describes the rules of one tweaker instance. Hosts pass
//! it in as a flat string map (see the `*_KEY` constants). The command-line
//! host reads the same settings from `TWEAKER_*` environment variables
//! through [`HostConfig`].

use crate::error::{Result, TweakerError};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;

pub const MATCH_HEADER_KEY: &str = "match.header";
pub const SET_HEADER_KEY: &str = "set.header";
pub const SET_VALUE_KEY: &str = "set.value";
pub const MATCH_BODY_CONTAINS_KEY: &str = "match.body.contains";
pub const REPLACE_BODY_WITH_KEY: &str = "replace.body.with";
pub const BODY_CHARSET_KEY: &str = "body.charset";

pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Rule configuration for one tweaker
///
/// The header rule is enabled when `match_header`, `set_header` and
/// `set_value` are all set; the body rule when `match_body_contains` and
/// `replace_body_with` are both set. An empty config yields a pass-through
/// tweaker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TweakerConfig {
    pub match_header: Option<String>,
    pub set_header: Option<String>,
    pub set_value: Option<String>,
    pub match_body_contains: Option<String>,
    pub replace_body_with: Option<String>,
    /// Charset label, resolved when a body is rewritten
    pub body_charset: String,
}

impl Default for TweakerConfig {
    fn default() -> Self {
        Self {
            match_header: None,
            set_header: None,
            set_value: None,
            match_body_contains: None,
            replace_body_with: None,
            body_charset: DEFAULT_CHARSET.to_string(),
        }
    }
}

impl TweakerConfig {
    /// Build a config from host-supplied properties
    ///
    /// Unknown keys are ignored so hosts can pass their whole context.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use event_tweaker::config::TweakerConfig;
    ///
    /// let props = HashMap::from([
    ///     ("match.body.contains".to_string(), "injuries".to_string()),
    ///     ("replace.body.with".to_string(), "cyborg".to_string()),
    /// ]);
    /// let config = TweakerConfig::from_properties(&props).unwrap();
    /// assert!(config.body_rule().is_some());
    /// assert!(config.header_rule().is_none());
    /// ```
    pub fn from_properties(props: &HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| props.get(key).cloned();

        let config = Self {
            match_header: get(MATCH_HEADER_KEY),
            set_header: get(SET_HEADER_KEY),
            set_value: get(SET_VALUE_KEY),
            match_body_contains: get(MATCH_BODY_CONTAINS_KEY),
            replace_body_with: get(REPLACE_BODY_WITH_KEY),
            body_charset: get(BODY_CHARSET_KEY).unwrap_or_else(|| DEFAULT_CHARSET.to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that each rule is either fully configured or absent
    pub fn validate(&self) -> Result<()> {
        let header = [
            (MATCH_HEADER_KEY, &self.match_header),
            (SET_HEADER_KEY, &self.set_header),
            (SET_VALUE_KEY, &self.set_value),
        ];
        check_all_or_none(&header)?;

        let body = [
            (MATCH_BODY_CONTAINS_KEY, &self.match_body_contains),
            (REPLACE_BODY_WITH_KEY, &self.replace_body_with),
        ];
        check_all_or_none(&body)?;

        for (key, value) in [
            (MATCH_HEADER_KEY, &self.match_header),
            (SET_HEADER_KEY, &self.set_header),
            (MATCH_BODY_CONTAINS_KEY, &self.match_body_contains),
        ] {
            if value.as_deref() == Some("") {
                return Err(TweakerError::Config(format!("{key} must not be empty")));
            }
        }

        if self.body_charset.trim().is_empty() {
            return Err(TweakerError::Config(format!(
                "{BODY_CHARSET_KEY} must not be empty"
            )));
        }

        Ok(())
    }

    /// Header rule parameters as `(match_header, set_header, set_value)`
    pub fn header_rule(&self) -> Option<(&str, &str, &str)> {
        Some((
            self.match_header.as_deref()?,
            self.set_header.as_deref()?,
            self.set_value.as_deref()?,
        ))
    }

    /// Body rule parameters as `(contains, replacement)`
    pub fn body_rule(&self) -> Option<(&str, &str)> {
        Some((
            self.match_body_contains.as_deref()?,
            self.replace_body_with.as_deref()?,
        ))
    }
}

fn check_all_or_none(fields: &[(&str, &Option<String>)]) -> Result<()> {
    let set = fields.iter().filter(|(_, value)| value.is_some()).count();
    if set == 0 || set == fields.len() {
        return Ok(());
    }

    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(key, _)| *key)
        .collect();
    Err(TweakerError::Config(format!(
        "incomplete rule, missing {}",
        missing.join(", ")
    )))
}

/// Configuration for the command-line host
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Rules applied to every event
    pub tweaker: TweakerConfig,

    /// Events per batch handed to the tweaker
    pub batch_size: usize,

    /// Log level
    pub log_level: String,

    /// Log format (json or pretty)
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tweaker: TweakerConfig::default(),
            batch_size: 1000,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Environment variables carrying the rule properties
const RULE_VARS: [(&str, &str); 6] = [
    ("TWEAKER_MATCH_HEADER", MATCH_HEADER_KEY),
    ("TWEAKER_SET_HEADER", SET_HEADER_KEY),
    ("TWEAKER_SET_VALUE", SET_VALUE_KEY),
    ("TWEAKER_MATCH_BODY_CONTAINS", MATCH_BODY_CONTAINS_KEY),
    ("TWEAKER_REPLACE_BODY_WITH", REPLACE_BODY_WITH_KEY),
    ("TWEAKER_BODY_CHARSET", BODY_CHARSET_KEY),
];

impl HostConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Load configuration from any variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = HostConfig::default();

        let props: HashMap<String, String> = RULE_VARS
            .iter()
            .filter_map(|(var, key)| lookup(var).map(|value| (key.to_string(), value)))
            .collect();
        config.tweaker = TweakerConfig::from_properties(&props)?;

        if let Some(size) = lookup("TWEAKER_BATCH_SIZE") {
            config.batch_size = size
                .parse()
                .map_err(|e| TweakerError::Config(format!("invalid TWEAKER_BATCH_SIZE: {e}")))?;
            if config.batch_size == 0 {
                return Err(TweakerError::Config(
                    "invalid TWEAKER_BATCH_SIZE: must be greater than 0".to_string(),
                ));
            }
        }

        if let Some(level) = lookup("TWEAKER_LOG_LEVEL") {
            config.log_level = level;
        }

        if let Some(format) = lookup("TWEAKER_LOG_FORMAT") {
            config.log_format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                other => {
                    return Err(TweakerError::Config(format!(
                        "invalid TWEAKER_LOG_FORMAT: {other} (expected 'json' or 'pretty')"
                    )));
                }
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn vars(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_default_config() {
        let config = TweakerConfig::default();
        assert!(config.header_rule().is_none());
        assert!(config.body_rule().is_none());
        assert_eq!(config.body_charset, "UTF-8");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_properties() {
        let config = TweakerConfig::from_properties(&props(&[
            ("match.header", "lice"),
            ("set.header", "shampoo"),
            ("set.value", "antilice"),
            ("match.body.contains", "injuries"),
            ("replace.body.with", "cyborg"),
            ("body.charset", "ISO-8859-1"),
            ("type", "com.example.EventTweaker$Builder"),
        ]))
        .unwrap();

        assert_eq!(config.header_rule(), Some(("lice", "shampoo", "antilice")));
        assert_eq!(config.body_rule(), Some(("injuries", "cyborg")));
        assert_eq!(config.body_charset, "ISO-8859-1");
    }

    #[test]
    fn test_partial_header_rule_rejected() {
        let err = TweakerConfig::from_properties(&props(&[("match.header", "lice")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: incomplete rule, missing set.header, set.value"
        );
    }

    #[test]
    fn test_partial_body_rule_rejected() {
        let result = TweakerConfig::from_properties(&props(&[("replace.body.with", "cyborg")]));
        assert!(matches!(result, Err(TweakerError::Config(_))));
    }

    #[test]
    fn test_empty_needle_rejected() {
        let result = TweakerConfig::from_properties(&props(&[
            ("match.body.contains", ""),
            ("replace.body.with", "cyborg"),
        ]));
        assert!(matches!(result, Err(TweakerError::Config(_))));
    }

    #[test]
    fn test_empty_replacement_allowed() {
        let config = TweakerConfig::from_properties(&props(&[
            ("match.body.contains", "secret"),
            ("replace.body.with", ""),
        ]))
        .unwrap();
        assert_eq!(config.body_rule(), Some(("secret", "")));
    }

    #[test]
    fn test_deserialize_config() {
        let config: TweakerConfig =
            serde_json::from_str(r#"{"match_body_contains": "injuries", "replace_body_with": "cyborg"}"#)
                .unwrap();
        assert_eq!(config.body_rule(), Some(("injuries", "cyborg")));
        assert_eq!(config.body_charset, "UTF-8");
    }

    #[test]
    fn test_host_config_defaults() {
        let config = HostConfig::from_vars(|_| None).unwrap();
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.tweaker, TweakerConfig::default());
    }

    #[test]
    fn test_host_config_from_vars() {
        let config = HostConfig::from_vars(vars(&[
            ("TWEAKER_MATCH_HEADER", "lice"),
            ("TWEAKER_SET_HEADER", "shampoo"),
            ("TWEAKER_SET_VALUE", "antilice"),
            ("TWEAKER_BATCH_SIZE", "10"),
            ("TWEAKER_LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.batch_size, 10);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.tweaker.header_rule(),
            Some(("lice", "shampoo", "antilice"))
        );
    }

    #[test]
    fn test_host_config_rejects_bad_values() {
        assert!(HostConfig::from_vars(vars(&[("TWEAKER_BATCH_SIZE", "0")])).is_err());
        assert!(HostConfig::from_vars(vars(&[("TWEAKER_BATCH_SIZE", "many")])).is_err());
        assert!(HostConfig::from_vars(vars(&[("TWEAKER_LOG_FORMAT", "xml")])).is_err());
        assert!(HostConfig::from_vars(vars(&[("TWEAKER_SET_VALUE", "x")])).is_err());
    }
}
