use std::env;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8080/gym";

#[derive(Debug, Clone)]
pub struct Config {
    pub gym_api_url: String,
    pub gym_api_token: Option<String>,
    pub user_id: u64,
    pub accept_language: String,
    pub http_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let gym_api_url = env::var("GYM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let gym_api_token = env::var("GYM_API_TOKEN").ok().filter(|t| !t.is_empty());
        let user_id = match env::var("GYM_USER_ID") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("GYM_USER_ID must be a number: {}", e))?,
            Err(_) => 1,
        };
        let accept_language =
            env::var("GYM_ACCEPT_LANGUAGE").unwrap_or_else(|_| "vi".to_string());
        let http_timeout = match env::var("GYM_HTTP_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(raw.parse().map_err(|e| {
                anyhow::anyhow!("GYM_HTTP_TIMEOUT_SECS must be a number: {}", e)
            })?)),
            Err(_) => None,
        };

        Ok(Self {
            gym_api_url,
            gym_api_token,
            user_id,
            accept_language,
            http_timeout,
        })
    }

    /// Config pointing at `base_url` with a fixed token, used by tests and tools.
    pub fn for_base_url(base_url: impl Into<String>, token: Option<&str>) -> Self {
        Self {
            gym_api_url: base_url.into(),
            gym_api_token: token.map(str::to_string),
            user_id: 1,
            accept_language: "vi".to_string(),
            http_timeout: None,
        }
    }
}
