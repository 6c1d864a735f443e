use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    Gemini,
    Claude,
}

impl AiProvider {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::Claude => "claude",
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            "claude" | "anthropic" => Ok(Self::Claude),
            other => Err(format!(
                "unknown AI provider '{}', expected openai, gemini or claude",
                other
            )),
        }
    }
}

/// AI-assisted endpoints exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiTool {
    EstimateChance,
    TuneCv,
    CoverLetter,
    InterviewQa,
    SkillExtractor,
    CraftInterviewQuestions,
    CompanyResearch,
    AboutMeAnswer,
    FillProfileFromResume,
}

impl AiTool {
    pub const fn path(self) -> &'static str {
        match self {
            Self::EstimateChance => "/api/ai/estimate-chance",
            Self::TuneCv => "/api/ai/tune-cv",
            Self::CoverLetter => "/api/ai/cover-letter",
            Self::InterviewQa => "/api/ai/interview-qa",
            Self::SkillExtractor => "/api/ai/skill-extractor",
            Self::CraftInterviewQuestions => "/api/ai/craft-interview-questions",
            Self::CompanyResearch => "/api/ai/company-research",
            Self::AboutMeAnswer => "/api/ai/about-me-answer",
            Self::FillProfileFromResume => "/api/ai/profile/fill-from-resume-ai",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// `{"result": ...}` envelope returned by the text-generation endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiResult {
    pub result: JsonValue,
}

impl AiResult {
    /// The result as display text. Structured results are pretty-printed.
    pub fn text(&self) -> String {
        match &self.result {
            JsonValue::String(s) => s.clone(),
            JsonValue::Null => String::new(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        }
    }
}
