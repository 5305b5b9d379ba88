//! Risk Module
//!
//! Phân loại risk từ vitals: Low / Medium / High.
//!
//! ## Structure
//! - `types`: RiskLabel, RiskDistribution, ClassificationPath, Classification
//! - `rules`: Escalation policy and synthetic distributions
//! - `classifier`: RiskClassifier trait + rule-based / model-backed strategies
//!
//! ## Usage
//! ```ignore
//! use vital_risk::logic::risk::{RiskClassifier, RuleBasedClassifier};
//!
//! let classifier = RuleBasedClassifier::new(ranges, EscalationPolicy::default());
//! let result = classifier.evaluate(&record);
//! match result.label {
//!     RiskLabel::Low => println!("Routine"),
//!     RiskLabel::Medium => println!("Follow up"),
//!     RiskLabel::High => println!("Urgent"),
//! }
//! ```

pub mod types;
pub mod rules;
pub mod classifier;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use types::{
    Classification,
    ClassificationPath,
    RiskDistribution,
    RiskLabel,
    DISTRIBUTION_TOLERANCE,
    RISK_LABEL_COUNT,
};

pub use rules::{synthetic_distribution, EscalationPolicy, DEFAULT_WARNING_ESCALATION_COUNT};

pub use classifier::{ModelBackedClassifier, RiskClassifier, RuleBasedClassifier};
