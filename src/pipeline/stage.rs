//! Pipeline stages and their outcomes.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// One step of the start-up chain. Declared in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Bootstrap,
    ArtifactGate,
    PortGuard,
    Launch,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Bootstrap,
        Stage::ArtifactGate,
        Stage::PortGuard,
        Stage::Launch,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Bootstrap => "Bootstrap",
            Stage::ArtifactGate => "Artifact gate",
            Stage::PortGuard => "Port guard",
            Stage::Launch => "Launch",
        }
    }

    /// 1-based position in the chain.
    pub fn position(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0) + 1
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a stage that did not abort the run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StageStatus {
    Passed,
    /// Passed with a problem that only matters in production.
    Warned(String),
    /// Intentionally not executed (for example a dry run).
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageOutcome {
    pub stage: Stage,
    #[serde(flatten)]
    pub status: StageStatus,
    #[serde(skip)]
    pub duration: Duration,
}
