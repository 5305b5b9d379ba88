//! Risk Rules & Constants
//!
//! Escalation policy and synthetic distributions for the rule-based path.
//! KHÔNG chứa logic classify - chỉ constants và config.

use serde::{Deserialize, Serialize};

use super::types::{RiskDistribution, RiskLabel};
use crate::logic::error::ConfigurationError;

// ============================================================================
// ESCALATION
// ============================================================================

/// Warning-level findings needed to escalate one tier
pub const DEFAULT_WARNING_ESCALATION_COUNT: usize = 2;

/// Count-based escalation: several independent warnings outweigh one outlier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationPolicy {
    /// Escalate when at least this many warnings and no critical finding.
    /// 0 disables escalation.
    pub warning_count: usize,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            warning_count: DEFAULT_WARNING_ESCALATION_COUNT,
        }
    }
}

impl EscalationPolicy {
    pub fn new(warning_count: usize) -> Result<Self, ConfigurationError> {
        if warning_count == 1 {
            return Err(ConfigurationError::InvalidSetting {
                name: "warning_count".to_string(),
                reason: "a single warning cannot escalate itself; use 0 to disable or >= 2".to_string(),
            });
        }
        Ok(Self { warning_count })
    }

    pub fn disabled() -> Self {
        Self { warning_count: 0 }
    }

    pub fn is_enabled(&self) -> bool {
        self.warning_count > 0
    }

    /// Whether these counts trigger escalation
    pub fn should_escalate(&self, warnings: usize, criticals: usize) -> bool {
        self.is_enabled() && criticals == 0 && warnings >= self.warning_count
    }
}

// ============================================================================
// SYNTHETIC DISTRIBUTIONS
// ============================================================================
//
// Presentation only, NOT calibrated probabilities. The chosen label carries
// the plurality weight; adjacent tiers share the remainder.

pub const LOW_DISTRIBUTION: RiskDistribution = RiskDistribution::new(0.80, 0.15, 0.05);
pub const MEDIUM_DISTRIBUTION: RiskDistribution = RiskDistribution::new(0.20, 0.65, 0.15);
pub const HIGH_DISTRIBUTION: RiskDistribution = RiskDistribution::new(0.05, 0.15, 0.80);

/// Synthetic distribution for a rule-based label
pub fn synthetic_distribution(label: RiskLabel) -> RiskDistribution {
    match label {
        RiskLabel::Low => LOW_DISTRIBUTION,
        RiskLabel::Medium => MEDIUM_DISTRIBUTION,
        RiskLabel::High => HIGH_DISTRIBUTION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = EscalationPolicy::default();
        assert_eq!(policy.warning_count, 2);
        assert!(policy.should_escalate(2, 0));
        assert!(!policy.should_escalate(1, 0));
        assert!(!policy.should_escalate(3, 1));
    }

    #[test]
    fn test_disabled_policy() {
        let policy = EscalationPolicy::disabled();
        assert!(!policy.should_escalate(5, 0));
        assert_eq!(EscalationPolicy::new(0).unwrap(), policy);
    }

    #[test]
    fn test_single_warning_threshold_rejected() {
        assert!(EscalationPolicy::new(1).is_err());
        assert_eq!(EscalationPolicy::new(3).unwrap().warning_count, 3);
    }

    #[test]
    fn test_synthetic_distributions() {
        for label in RiskLabel::ALL {
            let dist = synthetic_distribution(label);
            assert!(dist.is_normalized(), "{} distribution not normalized", label);
            assert_eq!(dist.argmax(), label);
        }
    }
}
