use serde::{Deserialize, Serialize};

use super::types::{AnalysisCapability, CapabilityResponse, RoleConfig};
use super::CapabilityError;
use crate::config::AnalysisSettings;

/// Ollama HTTP client serving as the analysis capability.
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Result<Self, CapabilityError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CapabilityError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn from_settings(settings: &AnalysisSettings) -> Result<Self, CapabilityError> {
        Self::new(&settings.base_url, &settings.model, settings.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn list_models(&self) -> Result<Vec<String>, CapabilityError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CapabilityError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaTagsResponse = response
            .json()
            .map_err(|e| CapabilityError::ResponseParsing(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }

    /// Fails with `ModelUnavailable` unless the configured model is pulled.
    pub fn ensure_model(&self) -> Result<(), CapabilityError> {
        let models = self.list_models()?;
        require_model(&models, &self.model)
    }

    fn transport_error(&self, e: reqwest::Error) -> CapabilityError {
        if e.is_connect() {
            CapabilityError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            CapabilityError::HttpClient(format!("Request timed out after {}s", self.timeout_secs))
        } else {
            CapabilityError::HttpClient(e.to_string())
        }
    }
}

/// Tag suffixes match by prefix, so `llama3.1` accepts `llama3.1:latest`.
fn require_model(available: &[String], model: &str) -> Result<(), CapabilityError> {
    if available.iter().any(|m| m.starts_with(model)) {
        Ok(())
    } else {
        Err(CapabilityError::ModelUnavailable(model.to_string()))
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl AnalysisCapability for OllamaClient {
    fn invoke(
        &self,
        prompt: &str,
        role: &RoleConfig,
    ) -> Result<CapabilityResponse, CapabilityError> {
        let url = format!("{}/api/generate", self.base_url);
        let system = role.system_prompt();
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            system: &system,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CapabilityError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| CapabilityError::ResponseParsing(e.to_string()))?;

        Ok(CapabilityResponse::new(parsed.response))
    }
}
