use std::env;

use log::info;
use thiserror::Error;

use crate::pipeline::classifier::Language;

/// Value shipped in the sample `.env`; treated the same as a missing key.
const PLACEHOLDER_API_KEY: &str = "your_openai_key_here";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please set a valid OPENAI_API_KEY in the .env file")]
    MissingApiKey,

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub host: String,
    pub port: u16,
    pub share_base_url: String,
    pub default_language: Language,
    pub share_id_length: usize,
    pub cors_allowed_origins: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && key != PLACEHOLDER_API_KEY)
            .ok_or(ConfigError::MissingApiKey)?;

        let port = parse_or(&lookup, "PORT", 8000u16)?;
        let share_id_length = parse_or(&lookup, "SHARE_ID_LENGTH", 8usize)?;
        if share_id_length == 0 {
            return Err(ConfigError::InvalidValue {
                name: "SHARE_ID_LENGTH",
                value: "0".to_string(),
            });
        }

        let config = Self {
            api_key,
            base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com".to_string())
                .trim_end_matches('/')
                .to_string(),
            model: lookup("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            share_base_url: lookup("SHARE_BASE_URL")
                .unwrap_or_else(|| "http://localhost:8501".to_string()),
            // case-insensitive, unlike languages sent by callers
            default_language: lookup("DEFAULT_LANGUAGE")
                .map(|name| Language::from(name.trim().to_lowercase()))
                .unwrap_or(Language::Python),
            share_id_length,
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS"),
        };

        info!("Using API key: {}", config.masked_api_key());
        Ok(config)
    }

    /// First and last few characters of the key, enough to tell keys apart in logs.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 14 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..10].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
        None => Ok(default),
    }
}
