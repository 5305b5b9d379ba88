//! Risk Engine - Orchestrator
//!
//! validate -> classify (active path) -> detect abnormal vitals
//! -> recommendations -> RiskAssessmentResult.
//!
//! Mode được chọn MỘT lần khi khởi tạo; không fallback giữa chừng trong request.

use std::path::PathBuf;
use std::sync::Arc;

use super::types::{EngineMode, EngineStatus, RiskAssessmentResult};
use crate::constants;
use crate::logic::abnormal::AbnormalVitalDetector;
use crate::logic::config::{ArtifactPaths, EngineConfig};
use crate::logic::error::{AssessmentError, ConfigurationError, ScalerUnavailableError};
use crate::logic::features::{FeatureNormalizer, LayoutInfo};
use crate::logic::model::{ArtifactInfo, ModelPredictor};
use crate::logic::recommend::RecommendationGenerator;
use crate::logic::risk::{EscalationPolicy, ModelBackedClassifier, RiskClassifier, RuleBasedClassifier};
use crate::logic::vitals::{RawVitals, ReferenceRangeTable, VitalsRecord};

pub struct RiskEngine {
    mode: EngineMode,
    classifier: Box<dyn RiskClassifier>,
    detector: AbnormalVitalDetector,
    recommender: RecommendationGenerator,
    ranges: Arc<ReferenceRangeTable>,
    escalation: EscalationPolicy,
    model_info: Option<ArtifactInfo>,
    scaler_source: Option<PathBuf>,
}

impl std::fmt::Debug for RiskEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskEngine")
            .field("mode", &self.mode)
            .field("escalation", &self.escalation)
            .field("graded_vitals", &self.ranges.len())
            .field("model_info", &self.model_info)
            .finish()
    }
}

impl RiskEngine {
    // ========================================================================
    // CONSTRUCTION
    // ========================================================================

    /// Rule-backed engine; needs no artifacts
    pub fn rule_backed(ranges: impl Into<Arc<ReferenceRangeTable>>, escalation: EscalationPolicy) -> Self {
        let ranges = ranges.into();
        let classifier = RuleBasedClassifier::new(ranges.clone(), escalation);
        Self::assemble(EngineMode::RuleBacked, Box::new(classifier), ranges, escalation, None, None)
    }

    /// Model-backed engine; the normalizer must hold a fitted scaler
    pub fn model_backed(
        ranges: impl Into<Arc<ReferenceRangeTable>>,
        escalation: EscalationPolicy,
        normalizer: FeatureNormalizer,
        predictor: ModelPredictor,
    ) -> Result<Self, ScalerUnavailableError> {
        if !normalizer.is_fitted() {
            return Err(ScalerUnavailableError::new(
                normalizer.source().map(|p| p.to_path_buf()),
                "model-backed mode requires a fitted scaler",
            ));
        }

        let model_info = predictor.info().cloned();
        let scaler_source = normalizer.source().map(|p| p.to_path_buf());
        let classifier = ModelBackedClassifier::new(normalizer, predictor);

        Ok(Self::assemble(
            EngineMode::ModelBacked,
            Box::new(classifier),
            ranges.into(),
            escalation,
            model_info,
            scaler_source,
        ))
    }

    /// Try both artifacts; any problem latches rule-backed mode.
    /// Never fails.
    pub fn from_artifacts(
        ranges: impl Into<Arc<ReferenceRangeTable>>,
        escalation: EscalationPolicy,
        paths: &ArtifactPaths,
    ) -> Self {
        let ranges = ranges.into();

        let normalizer = FeatureNormalizer::from_file(&paths.scaler);
        if !normalizer.is_fitted() {
            log::info!("Engine mode: rule_backed (no fitted scaler at {})", paths.scaler.display());
            return Self::rule_backed(ranges, escalation);
        }

        let predictor = match ModelPredictor::load(&paths.model) {
            Ok(predictor) => predictor,
            Err(e) => {
                log::warn!("{}", e);
                log::info!("Engine mode: rule_backed (model unavailable)");
                return Self::rule_backed(ranges, escalation);
            }
        };

        match Self::model_backed(ranges.clone(), escalation, normalizer, predictor) {
            Ok(engine) => {
                log::info!("Engine mode: model_backed ({})", paths.model.display());
                engine
            }
            Err(e) => {
                log::warn!("{}", e);
                Self::rule_backed(ranges, escalation)
            }
        }
    }

    /// Build from configuration. Only a malformed configuration fails.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigurationError> {
        let ranges = config.load_ranges()?;
        let escalation = config.escalation_policy()?;
        Ok(Self::from_artifacts(ranges, escalation, &config.artifacts))
    }

    /// Replace the recommendation table
    pub fn with_recommendations(mut self, recommender: RecommendationGenerator) -> Self {
        self.recommender = recommender;
        self
    }

    fn assemble(
        mode: EngineMode,
        classifier: Box<dyn RiskClassifier>,
        ranges: Arc<ReferenceRangeTable>,
        escalation: EscalationPolicy,
        model_info: Option<ArtifactInfo>,
        scaler_source: Option<PathBuf>,
    ) -> Self {
        Self {
            mode,
            classifier,
            detector: AbnormalVitalDetector::new(ranges.clone()),
            recommender: RecommendationGenerator::default(),
            ranges,
            escalation,
            model_info,
            scaler_source,
        }
    }

    // ========================================================================
    // ASSESSMENT
    // ========================================================================

    /// Validate raw input, then assess
    pub fn assess(&self, raw: &RawVitals) -> Result<RiskAssessmentResult, AssessmentError> {
        let record = VitalsRecord::validate(raw)?;
        self.assess_record(&record)
    }

    /// Assess an already validated record
    pub fn assess_record(&self, record: &VitalsRecord) -> Result<RiskAssessmentResult, AssessmentError> {
        let classification = self.classifier.classify(record)?;
        let abnormal_vitals = self.detector.detect(record);
        let recommendations = self.recommender.generate(classification.label, &abnormal_vitals);

        log::debug!(
            "Assessment: {} via {} ({} abnormal)",
            classification.label,
            classification.path,
            abnormal_vitals.len()
        );

        Ok(RiskAssessmentResult {
            label: classification.label,
            risk_score: classification.distribution.get(classification.label) * 100.0,
            probabilities: classification.distribution,
            abnormal_vitals,
            recommendations,
            path: classification.path,
            reasons: classification.reasons,
        })
    }

    // ========================================================================
    // INTROSPECTION
    // ========================================================================

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    pub fn ranges(&self) -> &ReferenceRangeTable {
        &self.ranges
    }

    pub fn escalation(&self) -> EscalationPolicy {
        self.escalation
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            version: constants::APP_VERSION.to_string(),
            mode: self.mode,
            model: self.model_info.clone(),
            scaler: self.scaler_source.clone(),
            layout: LayoutInfo::current(),
            graded_vitals: self.ranges.iter().map(|(kind, _)| kind).collect(),
            escalation: self.escalation,
        }
    }
}
