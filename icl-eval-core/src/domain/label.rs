use serde::{Deserialize, Serialize};
use std::fmt;

/// News category used by the classification task, plus a catch-all for
/// anything outside the fixed vocabulary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    #[serde(rename = "world")]
    World,
    #[serde(rename = "sports")]
    Sports,
    #[serde(rename = "business")]
    Business,
    #[serde(rename = "sci/tech")]
    SciTech,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Label {
    /// Canonical labels in tie-break order.
    pub const CANONICAL: [Label; 4] = [Label::World, Label::Sports, Label::Business, Label::SciTech];

    /// Every label that participates in macro averaging.
    pub const ALL: [Label; 5] = [
        Label::World,
        Label::Sports,
        Label::Business,
        Label::SciTech,
        Label::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::World => "world",
            Label::Sports => "sports",
            Label::Business => "business",
            Label::SciTech => "sci/tech",
            Label::Unknown => "unknown",
        }
    }

    /// Normalizes a reference label: after lowercasing and trimming it must
    /// equal a canonical label exactly, otherwise it becomes `Unknown`.
    pub fn from_reference(reference: &str) -> Self {
        let normalized = reference.trim().to_lowercase();
        Self::CANONICAL
            .into_iter()
            .find(|label| label.as_str() == normalized)
            .unwrap_or(Label::Unknown)
    }

    /// Normalizes a free-text model answer: the first canonical label that
    /// occurs anywhere in the text as a substring wins.
    pub fn from_prediction(prediction: &str) -> Self {
        let normalized = prediction.trim().to_lowercase();
        Self::CANONICAL
            .into_iter()
            .find(|label| normalized.contains(label.as_str()))
            .unwrap_or(Label::Unknown)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
