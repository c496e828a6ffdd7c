use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use super::string_field;

/// Body of `POST /rewrite_reply`.
///
/// `style` is kept as the raw string so unrecognised values reach the model
/// untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteRequest {
    pub original_message: String,
    pub base_reply: String,
    pub style: String,
}

impl RewriteRequest {
    pub fn known_style(&self) -> Option<ReplyStyle> {
        self.style.parse().ok()
    }
}

/// Tone presets described in the rewrite prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStyle {
    Polished,
    Short,
    Friendly,
}

impl ReplyStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyStyle::Polished => "polished",
            ReplyStyle::Short => "short",
            ReplyStyle::Friendly => "friendly",
        }
    }
}

impl FromStr for ReplyStyle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "polished" => Ok(ReplyStyle::Polished),
            "short" => Ok(ReplyStyle::Short),
            "friendly" => Ok(ReplyStyle::Friendly),
            _ => Err(()),
        }
    }
}

/// Body returned by `POST /rewrite_reply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteResult {
    pub rewritten_reply: String,
}

impl RewriteResult {
    /// Take `rewritten_reply` from the model's object, echoing `base_reply`
    /// when it is missing or not a string.
    pub fn from_completion(object: &Map<String, Value>, base_reply: &str) -> Self {
        Self {
            rewritten_reply: string_field(object, "rewritten_reply", base_reply),
        }
    }
}
