//! The closed set of language-model providers offered on the upload form.
//!
//! Each entry carries its wire identifier (the `model` multipart field the
//! portfolio service expects), a display label and whether the user must
//! supply an API key for it. Code asks `requires_credential()` instead of
//! comparing against the offline identifier.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Provider {
    /// Template-based generation on the service; no external LLM.
    #[default]
    Offline,
    EuronGpt41Nano,
    EuronGpt41Mini,
    Gemini25Flash,
    Gemini25Pro,
    OpenAiGpt41Mini,
    OpenAiGpt5Mini,
    Llama70b,
    GroqCompound,
    Qwen32b,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown model '{0}'")]
pub struct UnknownProvider(pub String);

impl Provider {
    /// Every provider, in the order the form lists them.
    pub const ALL: [Provider; 10] = [
        Provider::Offline,
        Provider::EuronGpt41Nano,
        Provider::EuronGpt41Mini,
        Provider::Gemini25Flash,
        Provider::Gemini25Pro,
        Provider::OpenAiGpt41Mini,
        Provider::OpenAiGpt5Mini,
        Provider::Llama70b,
        Provider::GroqCompound,
        Provider::Qwen32b,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Provider::Offline => "offline",
            Provider::EuronGpt41Nano => "euron:gpt-4.1-nano",
            Provider::EuronGpt41Mini => "euron:gpt-4.1-mini",
            Provider::Gemini25Flash => "gemini-2.5-flash",
            Provider::Gemini25Pro => "gemini-2.5-pro",
            Provider::OpenAiGpt41Mini => "gpt-4.1-mini",
            Provider::OpenAiGpt5Mini => "gpt-5-mini",
            Provider::Llama70b => "llama-3.3-70b",
            Provider::GroqCompound => "groq/compound",
            Provider::Qwen32b => "qwen/qwen3-32b",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Provider::Offline => "Offline Mode (No API needed)",
            Provider::EuronGpt41Nano => "Euron.ai GPT-4.1 Nano (Free!)",
            Provider::EuronGpt41Mini => "Euron.ai GPT-4.1 Mini (Free!)",
            Provider::Gemini25Flash => "Google Gemini 2.5 Flash",
            Provider::Gemini25Pro => "Google Gemini 2.5 Pro",
            Provider::OpenAiGpt41Mini => "OpenAI GPT-4.1 Mini",
            Provider::OpenAiGpt5Mini => "OpenAI GPT-5 Mini",
            Provider::Llama70b => "Meta Llama 3.3 70B",
            Provider::GroqCompound => "Groq Compound",
            Provider::Qwen32b => "Alibaba Qwen 3 32B",
        }
    }

    pub fn requires_credential(self) -> bool {
        !matches!(self, Provider::Offline)
    }

    /// Hint shown under the provider select.
    pub fn hint(self) -> &'static str {
        if self.requires_credential() {
            "You must provide your API key for this provider"
        } else {
            "No API key needed - uses template-based generation"
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Provider::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}
