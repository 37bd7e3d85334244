use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// `SerpAPI` key. Absence is reported per query, not at startup.
    pub serpapi_key: Option<String>,
    pub serpapi_base_url: String,
    pub search_timeout_secs: u64,
    pub reverse_timeout_secs: u64,
    pub image_proxy_base_url: String,
    pub gazetteer_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "serpapi_key",
                &self.serpapi_key.as_ref().map(|_| "[redacted]"),
            )
            .field("serpapi_base_url", &self.serpapi_base_url)
            .field("search_timeout_secs", &self.search_timeout_secs)
            .field("reverse_timeout_secs", &self.reverse_timeout_secs)
            .field("image_proxy_base_url", &self.image_proxy_base_url)
            .field("gazetteer_path", &self.gazetteer_path)
            .finish()
    }
}
