//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change default artifact locations, only edit this file.

/// Default trained-model artifact (relative to the working directory)
pub const DEFAULT_MODEL_PATH: &str = "risk_model.onnx";

/// Default fitted-scaler artifact
pub const DEFAULT_SCALER_PATH: &str = "scaler.json";

/// Default warning count that escalates the rule-based label one tier
pub const DEFAULT_ESCALATION_COUNT: usize = crate::logic::risk::DEFAULT_WARNING_ESCALATION_COUNT;

/// Default log filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "vital-risk";

// Environment variable names
pub const ENV_MODEL_PATH: &str = "VITAL_RISK_MODEL_PATH";
pub const ENV_SCALER_PATH: &str = "VITAL_RISK_SCALER_PATH";
pub const ENV_RANGES_PATH: &str = "VITAL_RISK_RANGES_PATH";
pub const ENV_ESCALATION_COUNT: &str = "VITAL_RISK_ESCALATION_COUNT";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model path from environment or use default
pub fn get_model_path() -> String {
    std::env::var(ENV_MODEL_PATH)
        .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Get scaler path from environment or use default
pub fn get_scaler_path() -> String {
    std::env::var(ENV_SCALER_PATH)
        .unwrap_or_else(|_| DEFAULT_SCALER_PATH.to_string())
}

/// Get reference range override file, if configured
pub fn get_ranges_path() -> Option<String> {
    std::env::var(ENV_RANGES_PATH)
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Raw escalation count setting, if configured
pub fn get_escalation_count() -> Option<String> {
    std::env::var(ENV_ESCALATION_COUNT)
        .ok()
        .filter(|s| !s.trim().is_empty())
}
