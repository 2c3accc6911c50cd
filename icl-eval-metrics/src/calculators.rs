pub mod squad;
pub mod rouge;
pub mod bleu;
pub mod chrf;
pub mod classification;
pub mod semantic;

pub use squad::*;
pub use rouge::*;
pub use bleu::*;
pub use chrf::*;
pub use classification::*;
pub use semantic::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricInput {
    pub predicted: String,
    pub reference: Option<String>,
}

impl MetricInput {
    pub fn new(predicted: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            predicted: predicted.into(),
            reference: Some(reference.into()),
        }
    }
}

/// Score on the calculator's native scale, plus calculator-specific details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricOutput {
    pub score: f64,
    pub metadata: serde_json::Value,
}
