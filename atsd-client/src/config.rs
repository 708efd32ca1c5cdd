//! Connection settings for an ATSD server.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Where and how to connect.
///
/// Read from YAML:
///
/// ```yaml
/// base_url: https://atsd.example.com:8443
/// username: axibase
/// password: secret
/// verify_tls: false
/// timeout_secs: 10
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientConfig {
    /// Server root, without the `/api/v1` suffix.
    pub base_url: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_verify_tls", alias = "ssl_verify")]
    pub verify_tls: bool,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_verify_tls() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

impl ClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            verify_tls: default_verify_tls(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parses `key=value` lines of a `connection.properties` file. Lines
    /// starting with `#` or `!` are comments.
    pub fn from_properties(contents: &str) -> Result<Self> {
        let mut entries = HashMap::new();
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| Error::Config(format!("malformed line '{}'", line)))?;
            entries.insert(key.trim().to_string(), value.trim().to_string());
        }

        let mut take = |key: &str| {
            entries
                .remove(key)
                .ok_or_else(|| Error::Config(format!("missing property '{}'", key)))
        };
        let mut config = Self::new(take("base_url")?, take("username")?, take("password")?);

        if let Some(verify) = entries.get("ssl_verify").or_else(|| entries.get("verify_tls")) {
            config.verify_tls = parse_bool(verify)?;
        }
        if let Some(timeout) = entries.get("timeout_secs") {
            config.timeout_secs = timeout
                .parse()
                .map_err(|_| Error::Config(format!("invalid timeout_secs '{}'", timeout)))?;
        }
        Ok(config)
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(Error::Config(format!("invalid boolean '{}'", value))),
    }
}

/// Load connection settings from a `.properties` file or, for any other
/// extension, a YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ClientConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("failed to read {}: {}", path.display(), e))
    })?;

    if path.extension().is_some_and(|ext| ext == "properties") {
        return ClientConfig::from_properties(&contents);
    }

    serde_yaml::from_str(&contents)
        .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn should_load_yaml_with_defaults() {
        // given
        let file = write_temp(
            ".yaml",
            "base_url: https://atsd:8443\nusername: axibase\npassword: secret\n",
        );

        // when
        let config = load_config(file.path()).unwrap();

        // then
        assert_eq!(config, ClientConfig::new("https://atsd:8443", "axibase", "secret"));
        assert!(config.verify_tls);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn should_accept_ssl_verify_alias_in_yaml() {
        // given
        let file = write_temp(
            ".yml",
            "base_url: http://atsd:8088\nusername: u\npassword: p\nssl_verify: false\ntimeout_secs: 5\n",
        );

        // when
        let config = load_config(file.path()).unwrap();

        // then
        assert!(!config.verify_tls);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn should_load_properties_file() {
        // given
        let file = write_temp(
            ".properties",
            "# ATSD connection\nbase_url = https://atsd:8443\nusername=axibase\n\npassword=p=w\nssl_verify=False\n",
        );

        // when
        let config = load_config(file.path()).unwrap();

        // then
        assert_eq!(config.base_url, "https://atsd:8443");
        assert_eq!(config.password, "p=w");
        assert!(!config.verify_tls);
    }

    #[rstest]
    #[case::missing_password("base_url=http://a\nusername=u\n")]
    #[case::bad_boolean("base_url=http://a\nusername=u\npassword=p\nssl_verify=maybe\n")]
    #[case::malformed_line("base_url http://a\n")]
    fn should_reject_invalid_properties(#[case] contents: &str) {
        // when
        let result = ClientConfig::from_properties(contents);

        // then
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn should_fail_on_missing_file() {
        // when
        let result = load_config("/nonexistent/connection.properties");

        // then
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
