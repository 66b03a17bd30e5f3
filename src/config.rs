// src/config.rs
use std::{env, net::SocketAddr, time::Duration};

use axum::http::HeaderValue;

use crate::error::ConfigError;
use crate::services::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL, GeminiConfig};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:3000,https://chatbot-ai-next-haripriya.vercel.app/";

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub request_timeout: Duration,
    pub bind_addr: SocketAddr,
    pub allowed_origins: Vec<HeaderValue>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset and empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;
        // Sent as a header on every request; the value itself stays out of the error.
        if let Err(e) = HeaderValue::from_str(&api_key) {
            return Err(ConfigError::Invalid {
                key: "GEMINI_API_KEY",
                value: "<redacted>".to_string(),
                reason: e.to_string(),
            });
        }
        let model = get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_base = get("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let request_timeout = match get("GEMINI_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "GEMINI_TIMEOUT_SECS",
                        value: raw,
                        reason: "expected a positive number of seconds".to_string(),
                    });
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: "BIND_ADDR",
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let origins_raw =
            get("ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string());
        let allowed_origins = parse_origins(&origins_raw)?;

        Ok(Self {
            api_key,
            model,
            api_base,
            request_timeout,
            bind_addr,
            allowed_origins,
        })
    }

    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            api_base: self.api_base.clone(),
            timeout: self.request_timeout,
        }
    }
}

// Browsers send `Origin` without a trailing slash, so one is stripped here.
fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|origin| {
            let origin = origin.strip_suffix('/').unwrap_or(origin);
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                key: "ALLOWED_ORIGINS",
                value: origin.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}
