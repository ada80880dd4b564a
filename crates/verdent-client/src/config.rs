//! Client configuration with YAML/JSON support

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Verdent client configuration
///
/// Can be loaded from YAML or JSON, or constructed programmatically.
/// Every field has a default, so an empty document is a valid config
/// pointing at the production service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Agent API host
    #[serde(default = "default_host")]
    pub host: String,

    /// Agent API port. 443 selects https/wss, anything else http/ws.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Login (passport) host, always reached over https
    #[serde(default = "default_login_host", alias = "loginHost")]
    pub login_host: String,

    /// Log host, always reached over https
    #[serde(default = "default_log_host", alias = "logHost")]
    pub log_host: String,

    /// Initial session token (optional)
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in milliseconds (default: 10s)
    #[serde(default = "default_timeout", alias = "timeout")]
    pub timeout_ms: u64,

    /// Explicit login base URL, overrides `login_host`
    #[serde(default, alias = "loginUrl")]
    pub login_url: Option<String>,
}

fn default_host() -> String {
    "agent.verdent.ai".to_string()
}

fn default_port() -> u16 {
    443
}

fn default_login_host() -> String {
    "login.verdent.ai".to_string()
}

fn default_log_host() -> String {
    "log.verdent.ai".to_string()
}

fn default_timeout() -> u64 {
    10_000 // 10 seconds
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            login_host: default_login_host(),
            log_host: default_log_host(),
            token: None,
            timeout_ms: default_timeout(),
            login_url: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Create a builder starting from the production defaults
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Derive the endpoint set for this configuration
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::derive(self)
    }

    /// Port in effect; 0 selects the default
    pub fn effective_port(&self) -> u16 {
        match self.port {
            0 => default_port(),
            port => port,
        }
    }

    /// Request timeout in effect; 0 selects the default
    pub fn timeout(&self) -> Duration {
        match self.timeout_ms {
            0 => Duration::from_millis(default_timeout()),
            ms => Duration::from_millis(ms),
        }
    }
}

/// Blank values fall back to the default, like an unset field
fn or_default(value: &str, default: fn() -> String) -> String {
    let value = value.trim();
    if value.is_empty() {
        default()
    } else {
        value.to_string()
    }
}

/// Base URLs derived from a [`ClientConfig`]
///
/// Computed once when the client is built. Host and port are not
/// validated here; a malformed host yields a malformed URL string that
/// only fails once a request tries to parse it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoints {
    /// Agent API, e.g. `https://agent.verdent.ai`
    pub base: String,
    /// Passport API, e.g. `https://login.verdent.ai`
    pub login: String,
    /// Log API, e.g. `https://log.verdent.ai`
    pub log: String,
    /// Chat WebSocket, e.g. `wss://agent.verdent.ai/chat`
    pub ws: String,
}

impl Endpoints {
    /// Blank hosts and port 0 are replaced by their defaults first.
    pub fn derive(config: &ClientConfig) -> Self {
        let host = or_default(&config.host, default_host);
        let port = config.effective_port();

        let (scheme, ws_scheme) = if port == 443 { ("https", "wss") } else { ("http", "ws") };
        let port_suffix = match port {
            80 | 443 => String::new(),
            port => format!(":{}", port),
        };

        let login = config
            .login_url
            .as_deref()
            .map(|u| u.trim().trim_end_matches('/'))
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!("https://{}", or_default(&config.login_host, default_login_host))
            });

        Self {
            base: format!("{}://{}{}", scheme, host, port_suffix),
            login,
            log: format!("https://{}", or_default(&config.log_host, default_log_host)),
            ws: format!("{}://{}{}/chat", ws_scheme, host, port_suffix),
        }
    }
}

/// Builder for ClientConfig
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Set the agent API host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the agent API port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the login host
    pub fn login_host(mut self, host: impl Into<String>) -> Self {
        self.config.login_host = host.into();
        self
    }

    /// Set the log host
    pub fn log_host(mut self, host: impl Into<String>) -> Self {
        self.config.log_host = host.into();
        self
    }

    /// Set the initial session token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    /// Set request timeout in milliseconds
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = ms;
        self
    }

    /// Set request timeout, saturating at `u64::MAX` milliseconds
    pub fn timeout(self, timeout: Duration) -> Self {
        self.timeout_ms(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
    }

    /// Override the login base URL (scheme included)
    pub fn login_url(mut self, url: impl Into<String>) -> Self {
        self.config.login_url = Some(url.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints(host: &str, port: u16) -> Endpoints {
        ClientConfig::builder().host(host).port(port).build().endpoints()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.host, "agent.verdent.ai");
        assert_eq!(config.port, 443);
        assert_eq!(config.login_host, "login.verdent.ai");
        assert_eq!(config.log_host, "log.verdent.ai");
        assert_eq!(config.token, None);
        assert_eq!(config.timeout_ms, 10_000);

        let ep = config.endpoints();
        assert_eq!(ep.base, "https://agent.verdent.ai");
        assert_eq!(ep.login, "https://login.verdent.ai");
        assert_eq!(ep.log, "https://log.verdent.ai");
        assert_eq!(ep.ws, "wss://agent.verdent.ai/chat");
    }

    #[test]
    fn test_custom_port() {
        let ep = endpoints("x.test", 8080);
        assert_eq!(ep.base, "http://x.test:8080");
        assert_eq!(ep.ws, "ws://x.test:8080/chat");
    }

    #[test]
    fn test_port_80_has_no_suffix() {
        let ep = endpoints("x.test", 80);
        assert_eq!(ep.base, "http://x.test");
        assert_eq!(ep.ws, "ws://x.test/chat");
    }

    #[test]
    fn test_scheme_and_suffix_rules() {
        for port in [1u16, 79, 81, 442, 444, 3000, 8443, 65535] {
            let ep = endpoints("h", port);
            assert_eq!(ep.base, format!("http://h:{}", port));
            assert_eq!(ep.ws, format!("ws://h:{}/chat", port));
        }
        let ep = endpoints("h", 443);
        assert_eq!(ep.base, "https://h");
        assert_eq!(ep.ws, "wss://h/chat");
    }

    #[test]
    fn test_aux_hosts_stay_https() {
        let config = ClientConfig::builder()
            .port(8080)
            .login_host("login.x.test")
            .log_host("log.x.test")
            .build();
        let ep = config.endpoints();
        assert_eq!(ep.login, "https://login.x.test");
        assert_eq!(ep.log, "https://log.x.test");
    }

    #[test]
    fn test_login_url_override() {
        let config = ClientConfig::builder()
            .login_url("http://127.0.0.1:9000/")
            .build();
        assert_eq!(config.endpoints().login, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_zero_and_blank_values_use_defaults() {
        let config = ClientConfig::builder()
            .host("")
            .port(0)
            .login_host("  ")
            .log_host("")
            .login_url("")
            .timeout_ms(0)
            .build();

        assert_eq!(config.effective_port(), 443);
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
        assert_eq!(config.endpoints(), ClientConfig::default().endpoints());
    }

    #[test]
    fn test_port_zero_with_custom_host() {
        let ep = endpoints("x.test", 0);
        assert_eq!(ep.base, "https://x.test");
        assert_eq!(ep.ws, "wss://x.test/chat");
    }

    #[test]
    fn test_nonzero_timeout_is_kept() {
        let config = ClientConfig::builder().timeout_ms(250).build();
        assert_eq!(config.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_builder_timeout_from_duration() {
        let config = ClientConfig::builder().timeout(Duration::from_secs(3)).build();
        assert_eq!(config.timeout_ms, 3_000);

        let config = ClientConfig::builder().timeout(Duration::MAX).build();
        assert_eq!(config.timeout_ms, u64::MAX);
    }

    #[test]
    fn test_malformed_host_is_not_validated() {
        let ep = endpoints("not a host", 443);
        assert_eq!(ep.base, "https://not a host");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
host: "staging.verdent.ai"
port: 8443
loginHost: "login.staging.verdent.ai"
token: "abc"
timeout: 2500
"#;

        let config = ClientConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.host, "staging.verdent.ai");
        assert_eq!(config.port, 8443);
        assert_eq!(config.login_host, "login.staging.verdent.ai");
        assert_eq!(config.log_host, "log.verdent.ai");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.timeout_ms, 2500);
    }

    #[test]
    fn test_json_parsing_empty_uses_defaults() {
        let config = ClientConfig::from_json("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = ClientConfig::from_yaml("port: not-a-number").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_to_yaml() {
        let config = ClientConfig::builder().host("x.test").build();
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("host: x.test"));
        assert!(yaml.contains("timeout_ms: 10000"));
    }
}
