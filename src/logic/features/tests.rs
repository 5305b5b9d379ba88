//! Integration Tests for Feature Normalization
//!
//! Scaler artifact -> normalizer -> vector, end to end.

#[cfg(test)]
mod integration_tests {
    use std::io::Write;

    use crate::logic::error::ScalerUnavailableError;
    use crate::logic::features::{
        layout::{layout_hash, FEATURE_COUNT, FEATURE_VERSION},
        normalizer::{FeatureNormalizer, MinMaxScaler},
    };
    use crate::logic::vitals::{RawVitals, VitalKind, VitalsRecord};

    const MINS: [f32; 6] = [0.0, 50.0, 0.0, 50.0, 20.0, 30.0];
    const MAXS: [f32; 6] = [60.0, 100.0, 5.0, 300.0, 250.0, 45.0];

    fn record(heart_rate: f32, consciousness: &str, on_oxygen: u8) -> VitalsRecord {
        let raw = RawVitals::new()
            .with("respiratory_rate", 30)
            .with("oxygen_saturation", 100)
            .with("o2_scale", 0)
            .with("systolic_bp", 120)
            .with("diastolic_bp", 80)
            .with("heart_rate", heart_rate)
            .with("temperature", 37.5)
            .with("consciousness", consciousness)
            .with("on_oxygen", on_oxygen);
        VitalsRecord::validate(&raw).unwrap()
    }

    fn write_scaler(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", json).unwrap();
        file
    }

    /// Min/max formula on each scaled feature
    #[test]
    fn test_normalize_formula() {
        let normalizer = FeatureNormalizer::new(MinMaxScaler::new(&MINS, &MAXS).unwrap());
        let vector = normalizer.normalize(&record(135.0, "A", 0)).unwrap();

        assert!((vector.get_by_name("respiratory_rate").unwrap() - 0.5).abs() < 1e-6);
        assert!((vector.get_by_name("oxygen_saturation").unwrap() - 1.0).abs() < 1e-6);
        assert!((vector.get_by_name("heart_rate").unwrap() - 0.5).abs() < 1e-6);
        assert!((vector.get_by_name("temperature").unwrap() - 0.5).abs() < 1e-6);
        assert_eq!(vector.get_by_name("consciousness_impaired"), Some(0.0));
        assert_eq!(vector.get_by_name("on_oxygen"), Some(0.0));
    }

    /// Inputs outside the training range are clamped
    #[test]
    fn test_normalize_clamps() {
        let narrow_max = [20.0, 99.0, 2.0, 140.0, 100.0, 37.0];
        let normalizer = FeatureNormalizer::new(MinMaxScaler::new(&MINS, &narrow_max).unwrap());
        let vector = normalizer.normalize(&record(180.0, "U", 1)).unwrap();

        for &v in vector.as_slice() {
            assert!((0.0..=1.0).contains(&v), "value {} outside [0, 1]", v);
        }
        assert_eq!(vector.get_by_name("heart_rate"), Some(1.0));
        assert_eq!(vector.get_by_name("consciousness_impaired"), Some(1.0));
        assert_eq!(vector.get_by_name("on_oxygen"), Some(1.0));
    }

    #[test]
    fn test_unfitted_normalizer_fails() {
        let normalizer = FeatureNormalizer::unfitted();
        assert!(!normalizer.is_fitted());
        let result = normalizer.normalize(&record(80.0, "A", 0));
        assert!(matches!(result, Err(ScalerUnavailableError { .. })));
    }

    #[test]
    fn test_scaler_shape_mismatch() {
        assert!(MinMaxScaler::new(&[0.0; 5], &[1.0; 5]).is_err());
        assert!(MinMaxScaler::new(&MINS, &[1.0; 7]).is_err());
    }

    #[test]
    fn test_scaler_inverted_bounds() {
        let mut maxs = MAXS;
        maxs[4] = 10.0;
        let err = MinMaxScaler::new(&MINS, &maxs).unwrap_err();
        assert!(err.reason.contains("heart_rate"));
    }

    #[test]
    fn test_degenerate_range_does_not_divide_by_zero() {
        let mut maxs = MAXS;
        maxs[0] = MINS[0];
        let scaler = MinMaxScaler::new(&MINS, &maxs).unwrap();
        let v = scaler.scale(VitalKind::RespiratoryRate, 10.0).unwrap();
        assert!(v.is_finite());
        assert_eq!(v, 1.0);
    }

    #[test]
    fn test_scale_unscaled_vital_is_none() {
        let scaler = MinMaxScaler::new(&MINS, &MAXS).unwrap();
        assert_eq!(scaler.scale(VitalKind::DiastolicBp, 80.0), None);
        assert_eq!(scaler.scale(VitalKind::HeartRate, 1_000.0), Some(1.0));
    }

    #[test]
    fn test_load_scaler_file() {
        let file = write_scaler(&format!(
            r#"{{"feature_names": ["respiratory_rate", "oxygen_saturation", "o2_scale",
                                  "systolic_bp", "heart_rate", "temperature"],
                "min_vals": {:?}, "max_vals": {:?},
                "feature_version": {}, "layout_hash": {}}}"#,
            MINS, MAXS, FEATURE_VERSION, layout_hash()
        ));

        let normalizer = FeatureNormalizer::from_file(file.path());
        assert!(normalizer.is_fitted());
        assert_eq!(normalizer.source(), Some(file.path()));

        let vector = normalizer.normalize(&record(80.0, "A", 0)).unwrap();
        assert_eq!(vector.as_array().len(), FEATURE_COUNT);
        assert!(vector.validate().is_ok());
    }

    #[test]
    fn test_load_scaler_wrong_names() {
        let file = write_scaler(&format!(
            r#"{{"feature_names": ["a", "b", "c", "d", "e", "f"],
                "min_vals": {:?}, "max_vals": {:?}}}"#,
            MINS, MAXS
        ));
        assert!(MinMaxScaler::load(file.path()).is_err());
        assert!(!FeatureNormalizer::from_file(file.path()).is_fitted());
    }

    #[test]
    fn test_load_scaler_layout_mismatch() {
        let file = write_scaler(&format!(
            r#"{{"min_vals": {:?}, "max_vals": {:?}, "feature_version": {}, "layout_hash": {}}}"#,
            MINS, MAXS, FEATURE_VERSION + 1, layout_hash()
        ));
        let err = MinMaxScaler::load(file.path()).unwrap_err();
        assert!(err.reason.contains("layout mismatch"));
        assert_eq!(err.path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_load_scaler_missing_or_corrupt() {
        let missing = std::path::Path::new("/nonexistent/scaler.json");
        assert!(!FeatureNormalizer::from_file(missing).is_fitted());

        let corrupt = write_scaler("not json");
        assert!(!FeatureNormalizer::from_file(corrupt.path()).is_fitted());
    }
}
