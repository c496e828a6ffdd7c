use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::string_field;

/// Body of `POST /analyze_message`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub message: String,
}

/// The five labels the analysis prompt allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Classification {
    Urgent,
    Request,
    FollowUp,
    Reminder,
    #[default]
    Informational,
}

impl Classification {
    pub const ALL: [Classification; 5] = [
        Classification::Urgent,
        Classification::Request,
        Classification::FollowUp,
        Classification::Reminder,
        Classification::Informational,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Urgent => "Urgent",
            Classification::Request => "Request",
            Classification::FollowUp => "Follow-Up",
            Classification::Reminder => "Reminder",
            Classification::Informational => "Informational",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = ();

    /// Exact match on the label text; the model is told to use these verbatim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Classification::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

/// Body returned by `POST /analyze_message`.
///
/// `classification` stays a plain string: labels outside [`Classification`]
/// are passed through to the caller rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub classification: String,
    pub summary: String,
    pub tasks: Vec<String>,
    pub suggested_reply: String,
}

impl AnalysisResult {
    /// Build a result from the model's JSON object, defaulting every field
    /// that is missing or has the wrong type.
    pub fn from_completion(object: &Map<String, Value>) -> Self {
        let tasks = match object.get("tasks") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect(),
            _ => Vec::new(),
        };

        Self {
            classification: string_field(
                object,
                "classification",
                Classification::default().as_str(),
            ),
            summary: string_field(object, "summary", ""),
            tasks,
            suggested_reply: string_field(object, "suggested_reply", ""),
        }
    }

    /// The classification as a known label, if it is one.
    pub fn known_classification(&self) -> Option<Classification> {
        self.classification.parse().ok()
    }
}
