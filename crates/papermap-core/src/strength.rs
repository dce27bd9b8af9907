use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStrength {
    Strong,
    Medium,
    Weak,
}

/// Paper-count thresholds used to classify an edge's strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthThresholds {
    pub strong: usize,
    pub medium: usize,
}

impl Default for StrengthThresholds {
    fn default() -> Self {
        Self {
            strong: 20,
            medium: 10,
        }
    }
}

impl StrengthThresholds {
    pub fn classify(&self, paper_count: usize) -> ConnectionStrength {
        if paper_count >= self.strong {
            ConnectionStrength::Strong
        } else if paper_count >= self.medium {
            ConnectionStrength::Medium
        } else {
            ConnectionStrength::Weak
        }
    }
}
