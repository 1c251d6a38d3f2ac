use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Entry store configuration
    pub state: StateConfig,

    /// Listing/statistics cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Directory authentication configuration
    pub auth: AuthConfig,

    /// Chat webhook relay configuration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Knowledge base behaviour
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/licita-kb.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: LICITA_KB_)
            .add_source(
                config::Environment::with_prefix("LICITA_KB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StateConfig {
    /// Store backend type
    #[serde(default)]
    pub backend: StateBackend,

    /// Path for the embedded database (sled)
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StateBackend {
    #[default]
    Memory,
    Sled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached listing pages
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,

    /// Time to live of cached listings and statistics (seconds)
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Which authenticator guards the write endpoints
    #[serde(default)]
    pub backend: AuthBackend,

    /// Directory server URL (ldap:// or ldaps://)
    #[serde(default = "default_ldap_url")]
    pub ldap_url: String,

    /// Search base for user lookups
    #[serde(default = "default_base_dn")]
    pub base_dn: String,

    /// Domain appended to the username for the bind (user@domain)
    #[serde(default = "default_user_domain")]
    pub user_domain: String,

    /// Verify the directory server certificate
    #[serde(default)]
    pub verify_tls: bool,

    /// Connection timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Department reported when the directory has none
    #[serde(default = "default_department")]
    pub default_department: String,

    /// Fixed users for the `static` backend
    #[serde(default)]
    pub users: Vec<StaticUser>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            backend: AuthBackend::default(),
            ldap_url: default_ldap_url(),
            base_dn: default_base_dn(),
            user_domain: default_user_domain(),
            verify_tls: false,
            timeout_secs: default_timeout(),
            default_department: default_department(),
            users: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AuthBackend {
    /// Accept any username, no password check (development only)
    #[default]
    Disabled,
    /// Users listed in the configuration file
    Static,
    /// Bind against the institutional directory
    Ldap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticUser {
    pub username: String,
    pub password: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Enable the chat webhook relay
    #[serde(default)]
    pub enabled: bool,

    /// Messaging API endpoint replies are posted to
    #[serde(default = "default_chat_api_url")]
    pub api_url: String,

    /// Bearer token for the messaging API (from env var)
    pub token_env: Option<String>,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Message prefix that triggers a search
    #[serde(default = "default_chat_command")]
    pub command: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: default_chat_api_url(),
            token_env: Some("LICITA_KB_CHAT_TOKEN".to_string()),
            timeout_secs: default_timeout(),
            command: default_chat_command(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Campus recorded on entries that do not name one
    #[serde(default = "default_campus")]
    pub campus: String,

    /// Insert the demonstration entries at startup
    #[serde(default = "default_true")]
    pub seed_examples: bool,

    /// Maximum number of ranked search results
    #[serde(default = "default_search_result_cap")]
    pub search_result_cap: usize,

    /// Upper bound for the `limite` listing parameter
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            campus: default_campus(),
            seed_examples: true,
            search_result_cap: default_search_result_cap(),
            max_page_size: default_max_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub prometheus_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            prometheus_enabled: true,
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8000
}

fn default_cache_capacity() -> u64 {
    1000
}

fn default_cache_ttl() -> u64 {
    60
}

fn default_ldap_url() -> String {
    "ldaps://ad.ifsp.edu.br".to_string()
}

fn default_base_dn() -> String {
    "DC=ifsp,DC=edu,DC=br".to_string()
}

fn default_user_domain() -> String {
    "ifsp.edu.br".to_string()
}

fn default_department() -> String {
    "IFSP".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_chat_api_url() -> String {
    "https://api.whatsapp.com/v1/messages".to_string()
}

fn default_chat_command() -> String {
    "/buscar".to_string()
}

fn default_campus() -> String {
    "Capivari".to_string()
}

fn default_search_result_cap() -> usize {
    crate::search::DEFAULT_RESULT_CAP
}

fn default_max_page_size() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}
