use std::env;
use std::path::PathBuf;

use crate::error::AppError;

/// Backing file used when `PATHWAY_DB_PATH` is not set.
pub const DEFAULT_STORE_PATH: &str = "data/metabolic_pathways.json";

/// Directory for discovery transcripts when `LLM_RESPONSES_DIR` is not set.
pub const DEFAULT_RESPONSES_DIR: &str = "llm_responses";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub llm: LlmConfig,
    pub sources: SourceConfig,
    pub discovery: DiscoveryConfig,
    pub logging: LoggingConfig,
    pub request: RequestConfig,
}

/// Pathway store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
}

/// Chat-completions API configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Empty when no key is configured; only discovery needs one.
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Base URLs of the scraped pathway databases
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub kegg_base_url: String,
    pub wikipathways_base_url: String,
}

/// LLM discovery configuration
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub responses_dir: PathBuf,
    /// Confidence stamped on LLM-suggested pathways.
    pub confidence: f64,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let store = StoreConfig {
            path: PathBuf::from(
                env::var("PATHWAY_DB_PATH").unwrap_or_else(|_| DEFAULT_STORE_PATH.to_string()),
            ),
        };

        let llm = LlmConfig {
            api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            temperature: parse_var("LLM_TEMPERATURE")?.unwrap_or(0.7),
            max_tokens: parse_var("LLM_MAX_TOKENS")?.unwrap_or(2000),
        };

        let sources = SourceConfig {
            kegg_base_url: env::var("KEGG_BASE_URL")
                .unwrap_or_else(|_| "https://www.kegg.jp".to_string()),
            wikipathways_base_url: env::var("WIKIPATHWAYS_BASE_URL")
                .unwrap_or_else(|_| "https://www.wikipathways.org".to_string()),
        };

        let discovery = DiscoveryConfig {
            responses_dir: PathBuf::from(
                env::var("LLM_RESPONSES_DIR").unwrap_or_else(|_| DEFAULT_RESPONSES_DIR.to_string()),
            ),
            confidence: parse_var("DISCOVERY_CONFIDENCE")?.unwrap_or(0.7),
        };
        if !(0.0..=1.0).contains(&discovery.confidence) {
            return Err(AppError::Config {
                message: format!(
                    "DISCOVERY_CONFIDENCE must be within [0.0, 1.0], got {}",
                    discovery.confidence
                ),
            });
        }

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let request = RequestConfig {
            timeout_ms: parse_var("REQUEST_TIMEOUT_MS")?.unwrap_or(30000),
            max_retries: parse_var("MAX_RETRIES")?.unwrap_or(3),
            retry_delay_ms: parse_var("RETRY_DELAY_MS")?.unwrap_or(1000),
        };

        Ok(Config {
            store,
            llm,
            sources,
            discovery,
            logging,
            request,
        })
    }

    /// Fail unless an API key is configured; discovery calls this up front.
    pub fn require_api_key(&self) -> Result<&str, AppError> {
        if self.llm.api_key.trim().is_empty() {
            return Err(AppError::Config {
                message: "OPENAI_API_KEY is required for LLM discovery".to_string(),
            });
        }
        Ok(&self.llm.api_key)
    }
}

/// Parse an optional numeric variable, rejecting values that are set but malformed.
fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, AppError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| AppError::Config {
            message: format!("{} has an invalid value: {}", name, raw),
        }),
        Err(_) => Ok(None),
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kegg_base_url: "https://www.kegg.jp".to_string(),
            wikipathways_base_url: "https://www.wikipathways.org".to_string(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            responses_dir: PathBuf::from(DEFAULT_RESPONSES_DIR),
            confidence: 0.7,
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}
