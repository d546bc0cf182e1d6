//! Deterministic risk scoring over parsed scan results.
//!
//! The model is intentionally small: a linear term on the number of open
//! ports plus a fixed set of feature bumps, clamped to 1.0. Everything here
//! is a pure function of the port report so a scan always scores the same
//! way, and the contribution list doubles as the alert's explanation
//! payload.

use vigil_model::{Explanation, FeatureContribution, PortReport, Severity};

/// Ports whose exposure alone raises the risk floor.
pub const HIGH_RISK_PORTS: [u16; 6] = [22, 3389, 445, 5900, 21, 23];

const HIGH_THRESHOLD: f64 = 0.7;
const MEDIUM_THRESHOLD: f64 = 0.4;

/// Outcome of scoring one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    /// Clamped but unrounded score; the audit trail keeps full precision.
    pub score: f64,
    pub severity: Severity,
    /// Ordered list of features that fired.
    pub contributions: Vec<FeatureContribution>,
}

impl RiskAssessment {
    /// The score as persisted with the alert, rounded to 2 decimals.
    pub fn stored_score(&self) -> f64 {
        (self.score * 100.0).round() / 100.0
    }

    pub fn explanation(&self) -> Explanation {
        Explanation::new(self.contributions.clone())
    }
}

/// Score a port report.
pub fn score_ports(report: &PortReport) -> RiskAssessment {
    let open_ports: Vec<_> = report.ports.iter().filter(|p| p.is_open()).collect();

    let mut contributions = Vec::new();
    let mut score = 0.1 * open_ports.len() as f64;

    if open_ports.iter().any(|p| HIGH_RISK_PORTS.contains(&p.port)) {
        score += 0.4;
        contributions.push(FeatureContribution::new("high_risk_port", 1, 0.4));
    }
    if open_ports.len() > 5 {
        score += 0.2;
        contributions.push(FeatureContribution::new(
            "too_many_open_ports",
            open_ports.len() as i64,
            0.2,
        ));
    }
    if open_ports.is_empty() {
        // Overrides the additive terms rather than stacking on them.
        score = 0.05;
        contributions.push(FeatureContribution::new("no_open_ports", 0, -0.1));
    }

    let score = score.min(1.0);

    let severity = if score >= HIGH_THRESHOLD {
        Severity::High
    } else if score >= MEDIUM_THRESHOLD {
        Severity::Medium
    } else {
        Severity::Low
    };

    if contributions.is_empty() {
        contributions.push(FeatureContribution::new("baseline", 1, score));
    }

    RiskAssessment {
        score,
        severity,
        contributions,
    }
}
