//! Shared test fixtures

use rand::rngs::StdRng;
use rand::Rng;

use crate::logic::vitals::{RawVitals, VitalsRecord};

/// All vitals within the default normal bands, alert, no oxygen
pub fn normal_raw() -> RawVitals {
    RawVitals::new()
        .with("respiratory_rate", 16)
        .with("oxygen_saturation", 98)
        .with("o2_scale", 1)
        .with("systolic_bp", 120)
        .with("diastolic_bp", 80)
        .with("heart_rate", 80)
        .with("temperature", 37.0)
        .with("consciousness", "A")
        .with("on_oxygen", 0)
}

/// Normal vitals with some fields replaced
pub fn record_with(changes: &[(&str, serde_json::Value)]) -> VitalsRecord {
    let mut raw = normal_raw();
    for (name, value) in changes {
        raw.insert(name, value.clone());
    }
    VitalsRecord::validate(&raw).expect("fixture must validate")
}

pub fn normal_record() -> VitalsRecord {
    record_with(&[])
}

/// Random valid record (diastolic kept below systolic)
pub fn random_record(rng: &mut StdRng) -> VitalsRecord {
    let systolic: f32 = rng.gen_range(60.0..300.0);
    let diastolic: f32 = rng.gen_range(20.0..(systolic - 5.0).min(200.0));
    let levels = ["A", "V", "P", "U"];

    let raw = RawVitals::new()
        .with("respiratory_rate", rng.gen_range(0.0..60.0f32))
        .with("oxygen_saturation", rng.gen_range(50.0..100.0f32))
        .with("o2_scale", rng.gen_range(0..=5))
        .with("systolic_bp", systolic)
        .with("diastolic_bp", diastolic)
        .with("heart_rate", rng.gen_range(20.0..250.0f32))
        .with("temperature", rng.gen_range(30.0..45.0f32))
        .with("consciousness", levels[rng.gen_range(0..levels.len())])
        .with("on_oxygen", rng.gen_bool(0.3));

    VitalsRecord::validate(&raw).expect("generated record must validate")
}
