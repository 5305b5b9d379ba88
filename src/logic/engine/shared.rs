//! Shared Engine - Reload slot
//!
//! Engine hiện tại nằm sau `Arc`, swap dưới `RwLock` khi reload.
//! Request đang chạy giữ engine mà nó bắt đầu cùng.
//!
//! Lock order: `config` then `current`. `config` is held for the whole
//! rebuild, so the stored config always matches the live engine.

use std::sync::Arc;

use parking_lot::RwLock;

use super::orchestrator::RiskEngine;
use super::types::{EngineMode, RiskAssessmentResult};
use crate::logic::config::EngineConfig;
use crate::logic::error::{AssessmentError, ConfigurationError};
use crate::logic::vitals::RawVitals;

#[derive(Debug)]
pub struct SharedEngine {
    config: RwLock<EngineConfig>,
    current: RwLock<Arc<RiskEngine>>,
}

impl SharedEngine {
    /// Build the first engine from `config`
    pub fn new(config: EngineConfig) -> Result<Self, ConfigurationError> {
        let engine = RiskEngine::from_config(&config)?;
        Ok(Self::from_engine(config, engine))
    }

    /// Wrap an existing engine; `reload` rebuilds from `config`
    pub fn from_engine(config: EngineConfig, engine: RiskEngine) -> Self {
        Self {
            config: RwLock::new(config),
            current: RwLock::new(Arc::new(engine)),
        }
    }

    /// The engine new requests should use
    pub fn engine(&self) -> Arc<RiskEngine> {
        self.current.read().clone()
    }

    pub fn config(&self) -> EngineConfig {
        self.config.read().clone()
    }

    pub fn assess(&self, raw: &RawVitals) -> Result<RiskAssessmentResult, AssessmentError> {
        self.engine().assess(raw)
    }

    /// Re-read ranges and artifacts and re-latch the mode.
    /// On a configuration error the current engine stays in place.
    pub fn reload(&self) -> Result<EngineMode, ConfigurationError> {
        let config = self.config.write();
        self.swap(&config)
    }

    /// Replace the configuration, then reload
    pub fn reconfigure(&self, config: EngineConfig) -> Result<EngineMode, ConfigurationError> {
        let mut current = self.config.write();
        let mode = self.swap(&config)?;
        *current = config;
        Ok(mode)
    }

    fn swap(&self, config: &EngineConfig) -> Result<EngineMode, ConfigurationError> {
        let engine = RiskEngine::from_config(config)?;
        let mode = engine.mode();

        let previous = std::mem::replace(&mut *self.current.write(), Arc::new(engine));
        if previous.mode() != mode {
            log::info!("Engine mode changed: {} -> {}", previous.mode(), mode);
        } else {
            log::info!("Engine reloaded ({})", mode);
        }

        Ok(mode)
    }
}
