//! HTTP client for the narrative-generation service.
//!
//! The service receives the computed analytics report and returns prose
//! insights. Calls go over an authenticated channel with a request timeout;
//! the synthesizer adds its own outer timeout and fallback handling, so this
//! client only has to report failures accurately.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::analytics::report::{AnalyticsReport, Insight};
use crate::error::{Error, Result};
use crate::types::TimeRange;

use super::NarrativeGenerator;

/// Narrative-generator service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Service URL (e.g. `https://insights.example.com`)
    pub server_url: Option<String>,

    /// API key for the Authorization header
    pub api_key: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connectivity-probe timeout in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

impl GeneratorConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.server_url.is_none() {
            return Err(Error::Config(
                "generator.server_url is required".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "generator.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_probe_timeout_secs() -> u64 {
    3
}

/// HTTP client for the narrative-generator API.
pub struct GeneratorClient {
    config: GeneratorConfig,
    http_client: reqwest::Client,
    base_url: String,
}

impl GeneratorClient {
    /// Create a client from configuration.
    ///
    /// Returns an error if the configuration is invalid or missing required fields.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;

        let base_url = config
            .server_url
            .clone()
            .ok_or_else(|| Error::Config("generator.server_url is required".to_string()))?
            .trim_end_matches('/')
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(api_key) = &config.api_key {
            let auth_value = format!("Bearer {}", api_key);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value)
                    .map_err(|e| Error::Config(format!("invalid api_key: {}", e)))?,
            );
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            base_url,
        })
    }

    /// The configured probe timeout.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.config.probe_timeout_secs)
    }

    /// The configured request timeout.
    pub fn generate_timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }
}

impl NarrativeGenerator for GeneratorClient {
    async fn generate(
        &self,
        user_id: &str,
        range: TimeRange,
        report: &AnalyticsReport,
    ) -> Result<Vec<Insight>> {
        let url = format!(
            "{}/users/{}/insights",
            self.base_url,
            urlencoding::encode(user_id)
        );

        let request_body = GenerateRequest {
            time_range: range.as_str(),
            analytics: report,
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Generator(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status.is_success() {
            let result: GenerateResponse = response
                .json()
                .await
                .map_err(|e| Error::Generator(format!("failed to parse response: {}", e)))?;
            Ok(result.insights)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            Err(Error::Generator(format!(
                "API error ({}): {}",
                status, error_text
            )))
        }
    }

    async fn probe(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        let probe = self
            .http_client
            .get(&url)
            .timeout(self.probe_timeout())
            .send();

        match probe.await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Request body for POST /users/{user_id}/insights
#[derive(Serialize)]
struct GenerateRequest<'a> {
    time_range: &'a str,
    analytics: &'a AnalyticsReport,
}

/// Response body from POST /users/{user_id}/insights
#[derive(Deserialize)]
struct GenerateResponse {
    insights: Vec<Insight>,
}
