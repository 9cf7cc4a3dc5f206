use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub llm_base_url: String,
    pub llm_api_key: Option<String>,
    pub keyword_model: String,
    pub itinerary_model: String,
    pub llm_timeout_secs: u64,
    pub nominatim_url: String,
    pub nominatim_user_agent: String,
    pub geocoder_timeout_secs: u64,
    pub geocoder_pacing_ms: u64,
    pub ors_api_key: Option<String>,
    pub ors_base_url: String,
    pub routing_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()?,
            log_level: std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string()),
            llm_base_url: std::env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string()),
            llm_api_key: non_empty_var("LLM_API_KEY").or_else(|| non_empty_var("GROQ_API_KEY")),
            keyword_model: std::env::var("KEYWORD_MODEL")
                .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string()),
            itinerary_model: std::env::var("ITINERARY_MODEL")
                .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string()),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse()?,
            nominatim_url: std::env::var("NOMINATIM_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            nominatim_user_agent: std::env::var("NOMINATIM_USER_AGENT")
                .unwrap_or_else(|_| "travel-orchestrator/0.1".to_string()),
            geocoder_timeout_secs: std::env::var("GEOCODER_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            geocoder_pacing_ms: std::env::var("GEOCODER_PACING_MS")
                .unwrap_or_else(|_| "1100".to_string())
                .parse()?,
            ors_api_key: non_empty_var("ORS_API_KEY"),
            ors_base_url: std::env::var("ORS_BASE_URL")
                .unwrap_or_else(|_| "https://api.openrouteservice.org".to_string()),
            routing_timeout_secs: std::env::var("ROUTING_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
        })
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    pub fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoder_timeout_secs)
    }

    pub fn geocoder_pacing(&self) -> Duration {
        Duration::from_millis(self.geocoder_pacing_ms)
    }

    pub fn routing_timeout(&self) -> Duration {
        Duration::from_secs(self.routing_timeout_secs)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
