//! Engine Module - Risk Inference Orchestration
//!
//! ## Structure
//! - `types`: EngineMode, EngineStatus, RiskAssessmentResult
//! - `orchestrator`: RiskEngine (mode latching + per-request pipeline)
//! - `shared`: SharedEngine (explicit reload trigger)
//!
//! ## Usage
//! ```ignore
//! let engine = RiskEngine::from_config(&EngineConfig::from_env()?)?;
//! let result = engine.assess(&RawVitals::from_json_str(body)?)?;
//! ```

pub mod types;
pub mod orchestrator;
pub mod shared;


pub use types::{EngineMode, EngineStatus, RiskAssessmentResult};
pub use orchestrator::RiskEngine;
pub use shared::SharedEngine;
