//! End-to-end tests for the prediction path
//!
//! These tests verify:
//! - Record construction against declared feature names and order
//! - Formatting and affordability messages
//! - Error propagation and session state

use super::*;
use crate::error::PredictorError;
use crate::models::{Insight, RawAnswers};
use std::sync::{Arc, Mutex};

/// Regressor returning a fixed output and remembering the rows it saw
struct RecordingRegressor {
    output: Vec<f64>,
    seen: Mutex<Vec<FeatureRow>>,
}

impl RecordingRegressor {
    fn returning(value: f64) -> Arc<Self> {
        Arc::new(Self {
            output: vec![value],
            seen: Mutex::new(Vec::new()),
        })
    }
}

impl Regressor for Arc<RecordingRegressor> {
    fn predict(&self, row: &FeatureRow) -> anyhow::Result<Vec<f64>> {
        self.seen.lock().unwrap().push(row.clone());
        Ok(self.output.clone())
    }

    fn kind(&self) -> &'static str {
        "recording"
    }
}

struct FailingRegressor;

impl Regressor for FailingRegressor {
    fn predict(&self, _row: &FeatureRow) -> anyhow::Result<Vec<f64>> {
        anyhow::bail!("graph execution failed")
    }

    fn kind(&self) -> &'static str {
        "failing"
    }
}

fn names(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

fn adapter_with(declared: Vec<String>, regressor: Box<dyn Regressor>) -> PredictorAdapter {
    let model = LoadedModel::new(declared, regressor, "test").unwrap();
    PredictorAdapter::new(Arc::new(model))
}

fn hostel_student() -> RawAnswers {
    RawAnswers {
        allowance: 300,
        part_time_income: 0,
        living: "On-Campus Hostel".to_string(),
        shop_frequency: "Occasionally".to_string(),
        eat_out: "Sometimes".to_string(),
        laptop: "Yes".to_string(),
        track_expenses: "No".to_string(),
        discipline: 3,
    }
}

mod income_schema_tests {
    use super::*;

    #[test]
    fn test_hostel_student_scenario() {
        let regressor = RecordingRegressor::returning(450.0);
        let adapter = adapter_with(names(INCOME_SCHEMA.fields()), Box::new(regressor.clone()));

        let outcome = adapter.predict(&hostel_student()).unwrap();

        let expected = [
            ("ShopNonEssential", 1.0),
            ("Allowance", 300.0),
            ("Hostel", 1.0),
            ("EatOut", 1.0),
            ("Laptop", 1.0),
            ("PartTimeIncome", 0.0),
            ("TrackExpenses", 0.0),
            ("Conscious", 3.0),
        ];
        let encoded: Vec<(&str, f64)> = outcome.encoded.iter().collect();
        assert_eq!(encoded, expected.to_vec());

        assert_eq!(outcome.prediction_display, "RM 450.00");
        let insight = outcome.insight.expect("income schema produces an insight");
        assert!(insight.is_deficit());
        assert!(
            insight.message().contains("RM 150 more than your total income"),
            "message was {:?}",
            insight.message()
        );
        assert_eq!(outcome.schema, "income");
        assert_eq!(outcome.model_version, "test");
    }

    #[test]
    fn test_zero_income_deficit_equals_rounded_prediction() {
        let regressor = RecordingRegressor::returning(212.49);
        let adapter = adapter_with(names(INCOME_SCHEMA.fields()), Box::new(regressor));
        let mut raw = hostel_student();
        raw.allowance = 0;
        raw.part_time_income = 0;

        let outcome = adapter.predict(&raw).unwrap();
        match outcome.insight {
            Some(Insight::Deficit { shortfall, total_income, .. }) => {
                assert_eq!(shortfall, 212);
                assert_eq!(total_income, 0);
            }
            other => panic!("expected deficit, got {other:?}"),
        }
    }

    #[test]
    fn test_part_time_income_counts_towards_total() {
        let regressor = RecordingRegressor::returning(450.0);
        let adapter = adapter_with(names(INCOME_SCHEMA.fields()), Box::new(regressor));
        let mut raw = hostel_student();
        raw.part_time_income = 250;

        let outcome = adapter.predict(&raw).unwrap();
        match outcome.insight {
            Some(Insight::Surplus { surplus, total_income, .. }) => {
                assert_eq!(surplus, 100);
                assert_eq!(total_income, 550);
            }
            other => panic!("expected surplus, got {other:?}"),
        }
    }

    #[test]
    fn test_rental_has_no_indicator() {
        let regressor = RecordingRegressor::returning(100.0);
        let adapter = adapter_with(names(INCOME_SCHEMA.fields()), Box::new(regressor));
        let mut raw = hostel_student();
        raw.living = "Off-Campus Rental".to_string();

        let outcome = adapter.predict(&raw).unwrap();
        assert_eq!(outcome.encoded.get("Hostel"), Some(0.0));
        assert_eq!(outcome.encoded.get("Rental"), None);
    }
}

mod housing_schema_tests {
    use super::*;

    #[test]
    fn test_living_indicators_and_no_insight() {
        let cases = [
            ("With Family", 0.0, 0.0),
            ("On-Campus Hostel", 1.0, 0.0),
            ("Off-Campus Rental", 0.0, 1.0),
        ];
        for (living, hostel, rental) in cases {
            let regressor = RecordingRegressor::returning(321.0);
            let adapter = adapter_with(names(HOUSING_SCHEMA.fields()), Box::new(regressor));
            let mut raw = hostel_student();
            raw.living = living.to_string();

            let outcome = adapter.predict(&raw).unwrap();
            assert_eq!(outcome.encoded.get("Hostel"), Some(hostel), "{living}");
            assert_eq!(outcome.encoded.get("Rental"), Some(rental), "{living}");
            assert!(outcome.insight.is_none());
            assert_eq!(outcome.prediction_display, "RM 321.00");
        }
    }
}

mod ordering_tests {
    use super::*;

    #[test]
    fn test_model_receives_declared_order() {
        let mut declared = names(HOUSING_SCHEMA.fields());
        declared.rotate_left(3);
        let regressor = RecordingRegressor::returning(1.0);
        let adapter = adapter_with(declared.clone(), Box::new(regressor.clone()));

        let outcome = adapter.predict(&hostel_student()).unwrap();

        let seen = regressor.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].names, declared);
        assert_eq!(outcome.encoded.names, declared);
        for (name, value) in seen[0].iter() {
            let expected = HOUSING_SCHEMA
                .build_record(&crate::collector::InputCollector::new().encode(&hostel_student()).unwrap())
                .get(name);
            assert_eq!(Some(value), expected, "{name}");
        }
    }

    #[test]
    fn test_record_field_set_equals_declared_set() {
        for schema in KNOWN_SCHEMAS {
            let regressor = RecordingRegressor::returning(1.0);
            let adapter = adapter_with(names(schema.fields()), Box::new(regressor));
            let outcome = adapter.predict(&hostel_student()).unwrap();

            let mut got = outcome.encoded.names.clone();
            let mut want = names(schema.fields());
            got.sort();
            want.sort();
            assert_eq!(got, want, "{}", schema.name());
        }
    }

    #[test]
    fn test_identical_input_gives_identical_display() {
        let regressor = RecordingRegressor::returning(1234.567);
        let adapter = adapter_with(names(INCOME_SCHEMA.fields()), Box::new(regressor));

        let first = adapter.predict(&hostel_student()).unwrap();
        let second = adapter.predict(&hostel_student()).unwrap();
        assert_eq!(first.prediction_display, "RM 1,234.57");
        assert_eq!(first.prediction_display, second.prediction_display);
        assert_eq!(first.insight, second.insight);
    }
}

mod failure_tests {
    use super::*;

    #[test]
    fn test_inference_failure_propagates() {
        let adapter = adapter_with(names(INCOME_SCHEMA.fields()), Box::new(FailingRegressor));
        let err = adapter.predict(&hostel_student()).unwrap_err();
        assert!(matches!(err, PredictorError::Inference(_)));
        assert!(err.to_string().contains("graph execution failed"));
    }

    #[test]
    fn test_empty_output_is_inference_error() {
        let regressor = Arc::new(RecordingRegressor {
            output: Vec::new(),
            seen: Mutex::new(Vec::new()),
        });
        let adapter = adapter_with(names(INCOME_SCHEMA.fields()), Box::new(regressor));
        assert!(matches!(
            adapter.predict(&hostel_student()),
            Err(PredictorError::Inference(_))
        ));
    }

    #[test]
    fn test_non_finite_output_is_inference_error() {
        let regressor = RecordingRegressor::returning(f64::NAN);
        let adapter = adapter_with(names(INCOME_SCHEMA.fields()), Box::new(regressor));
        assert!(matches!(
            adapter.predict(&hostel_student()),
            Err(PredictorError::Inference(_))
        ));
    }

    #[test]
    fn test_unknown_option_never_reaches_model() {
        let regressor = RecordingRegressor::returning(1.0);
        let adapter = adapter_with(names(INCOME_SCHEMA.fields()), Box::new(regressor.clone()));
        let mut raw = hostel_student();
        raw.eat_out = "Never".to_string();

        let err = adapter.predict(&raw).unwrap_err();
        assert!(matches!(err, PredictorError::InvalidInput { field: "eat_out", .. }));
        assert!(regressor.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_undeclared_feature_set_rejected_at_construction() {
        let mut declared = names(INCOME_SCHEMA.fields());
        declared.push("Rental".to_string());
        let err = LoadedModel::new(declared, Box::new(FailingRegressor), "test").unwrap_err();
        assert!(matches!(err, PredictorError::FeatureSchema(_)));
    }
}

mod session_tests {
    use super::*;

    #[test]
    fn test_submit_moves_to_predicted() {
        let regressor = RecordingRegressor::returning(450.0);
        let adapter = adapter_with(names(INCOME_SCHEMA.fields()), Box::new(regressor));
        let mut session = PredictionSession::new(&adapter);
        assert!(matches!(session.state(), SessionState::AwaitingSubmission));

        let outcome = session.submit(&hostel_student()).unwrap();
        assert_eq!(outcome.prediction_display, "RM 450.00");
        assert!(matches!(session.state(), SessionState::Predicted(_)));
        assert_eq!(
            session.outcome().map(|o| o.prediction_display.as_str()),
            Some("RM 450.00")
        );
    }

    #[test]
    fn test_failed_submission_clears_previous_result() {
        let regressor = RecordingRegressor::returning(450.0);
        let adapter = adapter_with(names(INCOME_SCHEMA.fields()), Box::new(regressor));
        let mut session = PredictionSession::new(&adapter);
        session.submit(&hostel_student()).unwrap();

        let mut bad = hostel_student();
        bad.discipline = 9;
        assert!(session.submit(&bad).is_err());
        assert!(matches!(session.state(), SessionState::AwaitingSubmission));
        assert!(session.outcome().is_none());
    }

    #[test]
    fn test_reset() {
        let regressor = RecordingRegressor::returning(450.0);
        let adapter = adapter_with(names(INCOME_SCHEMA.fields()), Box::new(regressor));
        let mut session = PredictionSession::new(&adapter);
        session.submit(&hostel_student()).unwrap();
        session.reset();
        assert!(session.outcome().is_none());
    }
}

mod onnx_tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    /// `features @ [10, 1, 50, 20, 0, 0, 0, 0] + 100` over the income layout,
    /// as a MatMul followed by an Add
    const INCOME_GRAPH: &[u8] = include_bytes!("../../testdata/income_linear.onnx");

    fn write_artifact(dir: &TempDir, sha256: &str) -> std::path::PathBuf {
        std::fs::write(dir.path().join("income_linear.onnx"), INCOME_GRAPH).unwrap();
        let manifest = json!({
            "version": "onnx-fixture",
            "features": INCOME_SCHEMA.fields(),
            "model": { "kind": "onnx", "path": "income_linear.onnx", "sha256": sha256 }
        });
        let path = dir.path().join(DEFAULT_MODEL_PATH);
        std::fs::write(&path, manifest.to_string()).unwrap();
        path
    }

    #[test]
    fn test_onnx_artifact_predicts_through_adapter() {
        let dir = TempDir::new().unwrap();
        let path = write_artifact(&dir, &compute_checksum(INCOME_GRAPH));

        let model = LoadedModel::load(&path).unwrap();
        assert_eq!(model.kind(), "onnx");
        assert_eq!(model.schema().name(), "income");
        assert_eq!(model.version(), "onnx-fixture");

        let adapter = PredictorAdapter::new(Arc::new(model));
        let outcome = adapter.predict(&hostel_student()).unwrap();

        // 10 * 1 + 300 + 50 * 1 + 20 * 1 + 100
        assert_eq!(outcome.prediction, 480.0);
        assert_eq!(outcome.prediction_display, "RM 480.00");
        match outcome.insight {
            Some(Insight::Deficit { shortfall, .. }) => assert_eq!(shortfall, 180),
            other => panic!("unexpected insight: {other:?}"),
        }
    }
}
