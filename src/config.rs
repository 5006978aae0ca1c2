use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// =========================================================
// 运行时配置 (Runtime Configuration)
// =========================================================

/// 这些是默认值，构建或运行环境没有提供对应变量时使用
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

pub const ENV_API_URL: &str = "SUKARI_API_URL";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "SUKARI_REQUEST_TIMEOUT_MS";
pub const ENV_DEFAULT_LANGUAGE: &str = "SUKARI_DEFAULT_LANGUAGE";

/// 界面语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Sw,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Sw => "sw",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "sw" => Some(Language::Sw),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Language::En => Language::Sw,
            Language::Sw => Language::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 客户端配置
///
/// 通过注入的查找函数读取变量，读不到或无法解析时使用默认值。
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub default_language: Language,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            default_language: Language::En,
        }
    }
}

impl ClientConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = lookup(ENV_API_URL)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_base_url);

        let request_timeout = match lookup(ENV_REQUEST_TIMEOUT_MS) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    log::warn!(
                        "Ignoring invalid {}={:?}, using {}ms",
                        ENV_REQUEST_TIMEOUT_MS,
                        raw,
                        DEFAULT_REQUEST_TIMEOUT_MS
                    );
                    defaults.request_timeout
                }
            },
            None => defaults.request_timeout,
        };

        let default_language = lookup(ENV_DEFAULT_LANGUAGE)
            .and_then(|v| Language::parse(&v))
            .unwrap_or(defaults.default_language);

        Self {
            api_base_url,
            request_timeout,
            default_language,
        }
    }
}
