use crate::Error;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Router settings that can live outside the code, usually in a TOML file.
///
/// ```toml
/// script_name = "/index.php"
/// global_middleware = ["app::middleware::Cors"]
/// max_body_size = "8M"
///
/// [aliases]
/// web = "app::middleware::Web"
/// ```
///
/// Apply it with [`RouterBuilder::with_config`](./struct.RouterBuilder.html#method.with_config).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub script_name: Option<String>,
    pub global_middleware: Vec<String>,
    pub max_body_size: Option<BodySize>,
    pub aliases: HashMap<String, String>,
}

/// A size limit written either as a plain byte count or with a `K`, `M` or `G` suffix.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BodySize {
    Bytes(u64),
    Text(String),
}

impl RouterConfig {
    pub fn from_toml_str(content: &str) -> crate::Result<RouterConfig> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Couldn't parse router configuration: {}", e)))
    }

    /// Reads and parses a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<RouterConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Couldn't read {}: {}", path.display(), e)))?;
        RouterConfig::from_toml_str(&content)
    }

    /// The configured body size limit in bytes, if any.
    pub fn max_body_bytes(&self) -> crate::Result<Option<u64>> {
        match self.max_body_size {
            None => Ok(None),
            Some(BodySize::Bytes(n)) => Ok(Some(n)),
            Some(BodySize::Text(ref s)) => parse_size(s).map(Some),
        }
    }
}

/// Parses sizes like `512`, `64K`, `8M` or `1G`. Suffixes are case insensitive and binary.
pub fn parse_size(value: &str) -> crate::Result<u64> {
    let value = value.trim();
    let invalid = || Error::Config(format!("Invalid size: {:?}", value));

    let (digits, multiplier) = match value.chars().last().map(|c| c.to_ascii_uppercase()) {
        Some('K') => (&value[..value.len() - 1], 1u64 << 10),
        Some('M') => (&value[..value.len() - 1], 1u64 << 20),
        Some('G') => (&value[..value.len() - 1], 1u64 << 30),
        Some(_) => (value, 1),
        None => return Err(invalid()),
    };

    let n: u64 = digits.trim().parse().map_err(|_| invalid())?;
    n.checked_mul(multiplier).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_sizes() {
        assert_eq!(parse_size("512").unwrap(), 512);
        assert_eq!(parse_size("64K").unwrap(), 65_536);
        assert_eq!(parse_size("8M").unwrap(), 8_388_608);
        assert_eq!(parse_size("1g").unwrap(), 1_073_741_824);
        assert_eq!(parse_size(" 2 M ").unwrap(), 2_097_152);
        assert!(parse_size("").is_err());
        assert!(parse_size("M").is_err());
        assert!(parse_size("ten").is_err());
    }

    #[test]
    fn should_parse_full_config() {
        let config = RouterConfig::from_toml_str(
            r#"
            script_name = "/blog/index.php"
            global_middleware = ["app::Cors"]
            max_body_size = "8M"

            [aliases]
            web = "app::middleware::Web"
            "#,
        )
        .unwrap();

        assert_eq!(config.script_name.as_deref(), Some("/blog/index.php"));
        assert_eq!(config.global_middleware, vec!["app::Cors"]);
        assert_eq!(config.max_body_bytes().unwrap(), Some(8 * 1024 * 1024));
        assert_eq!(config.aliases["web"], "app::middleware::Web");
    }

    #[test]
    fn should_default_missing_fields() {
        let config = RouterConfig::from_toml_str("max_body_size = 1024").unwrap();
        assert!(config.script_name.is_none());
        assert!(config.global_middleware.is_empty());
        assert_eq!(config.max_body_bytes().unwrap(), Some(1024));

        assert!(matches!(RouterConfig::from_toml_str("aliases = 3"), Err(Error::Config(_))));
    }
}
