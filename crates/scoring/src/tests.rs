use std::time::{SystemTime, UNIX_EPOCH};

use proptest::prelude::*;

use super::*;
use crate::math::round2;

/// Model stub with a fixed decision value, for pipeline tests.
struct ConstantModel {
    decision: f64,
}

impl AnomalyModel for ConstantModel {
    fn decision_value(&self, _features: &[f64; FEATURE_COUNT]) -> f64 {
        self.decision
    }
}

/// Scaler stub that violates the finite-output contract.
struct BrokenScaler;

impl FeatureScaler for BrokenScaler {
    fn normalize(&self, _features: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0f64; FEATURE_COUNT];
        out[3] = f64::NAN;
        out
    }
}

fn store_with_decision(decision: f64) -> ArtifactStore {
    ArtifactStore::with_parts(
        Some(Box::new(ConstantModel { decision })),
        Some(Box::new(StandardScaler::identity())),
    )
}

fn any_vector() -> FeatureVector {
    FeatureVector::new(&[1.0; FEATURE_COUNT]).expect("valid vector")
}

fn small_forest() -> IsolationForest {
    IsolationForest {
        model_id: "fatigue-forest-test".to_string(),
        model_version: "1.0.0".to_string(),
        n_features: FEATURE_COUNT,
        max_samples: 256,
        offset: -0.5,
        trees: vec![IsolationTree {
            nodes: vec![
                TreeNode {
                    left: 1,
                    right: 2,
                    feature: 0,
                    threshold: 0.0,
                    n_samples: 256,
                },
                TreeNode {
                    left: -1,
                    right: -1,
                    feature: 0,
                    threshold: 0.0,
                    n_samples: 120,
                },
                TreeNode {
                    left: -1,
                    right: -1,
                    feature: 0,
                    threshold: 0.0,
                    n_samples: 136,
                },
            ],
        }],
    }
}

fn temp_path(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "fatigue-{tag}-{}.json",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default()
    ))
}

// ─── sigmoid & fatigue mapping ──────────────────────────────────

#[test]
fn sigmoid_symmetry_at_zero() {
    assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
}

#[test]
fn sigmoid_branches_agree_near_zero() {
    // Both formulas are exact here; the branch split must not introduce a
    // discontinuity.
    let eps = 1e-9;
    assert!((sigmoid(eps) - sigmoid(-eps)).abs() < 1e-8);
}

#[test]
fn sigmoid_stable_at_extreme_magnitudes() {
    for x in [1e6, -1e6, 1000.0, -1000.0, f64::MAX, f64::MIN] {
        let s = sigmoid(x);
        assert!(s.is_finite(), "sigmoid({x}) = {s}");
        assert!((0.0..=1.0).contains(&s));
    }
    assert!(sigmoid(1e6) > 1.0 - 1e-12);
    assert!(sigmoid(-1e6) < 1e-12);
}

#[test]
fn fatigue_at_zero_decision_is_half_scale() {
    for alpha in [0.5, 1.0, 5.0, 50.0] {
        assert!((decision_to_fatigue(0.0, alpha) - 50.0).abs() < 1e-12);
    }
}

#[test]
fn fatigue_saturates_without_overflow() {
    let low = decision_to_fatigue(1e6, 5.0);
    let high = decision_to_fatigue(-1e6, 5.0);
    assert!(low.is_finite() && high.is_finite());
    assert!(low.abs() < 1e-9, "d=1e6 should give ~0, got {low}");
    assert!((high - 100.0).abs() < 1e-9, "d=-1e6 should give ~100, got {high}");
}

proptest! {
    #[test]
    fn fatigue_is_bounded(d in -1e6f64..1e6, alpha in 0.01f64..100.0) {
        let fatigue = decision_to_fatigue(d, alpha);
        prop_assert!(fatigue.is_finite());
        prop_assert!((0.0..=100.0).contains(&fatigue), "fatigue({d}, {alpha}) = {fatigue}");
    }

    #[test]
    fn fatigue_decreases_in_decision_value(
        d1 in -1e3f64..1e3,
        gap in 1e-6f64..1e3,
        alpha in 0.01f64..100.0,
    ) {
        let d2 = d1 + gap;
        prop_assert!(decision_to_fatigue(d1, alpha) >= decision_to_fatigue(d2, alpha));
    }
}

// ─── severity bucketing ─────────────────────────────────────────

#[test]
fn severity_boundaries_are_lower_inclusive() {
    assert_eq!(Severity::from_score(0.0), Severity::Healthy);
    assert_eq!(Severity::from_score(24.999), Severity::Healthy);
    assert_eq!(Severity::from_score(25.0), Severity::Mild);
    assert_eq!(Severity::from_score(49.999), Severity::Mild);
    assert_eq!(Severity::from_score(50.0), Severity::High);
    assert_eq!(Severity::from_score(74.99), Severity::High);
    assert_eq!(Severity::from_score(75.0), Severity::Severe);
    assert_eq!(Severity::from_score(100.0), Severity::Severe);
}

#[test]
fn severity_orders_by_level() {
    assert!(Severity::Healthy < Severity::Mild);
    assert!(Severity::Mild < Severity::High);
    assert!(Severity::High < Severity::Severe);
}

#[test]
fn severity_serializes_as_label() {
    let json = serde_json::to_string(&Severity::High).expect("serialize");
    assert_eq!(json, "\"High\"");
}

// ─── feature vector validation ──────────────────────────────────

#[test]
fn feature_vector_rejects_wrong_length() {
    for len in [0, 13, 15] {
        let values = vec![1.0; len];
        match FeatureVector::new(&values) {
            Err(InvalidInput::WrongLength { expected, got }) => {
                assert_eq!(expected, FEATURE_COUNT);
                assert_eq!(got, len);
            }
            other => panic!("expected WrongLength for len {len}, got {other:?}"),
        }
    }
}

#[test]
fn feature_vector_rejects_non_finite_values() {
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let mut values = vec![1.0; FEATURE_COUNT];
        values[5] = bad;
        match FeatureVector::new(&values) {
            Err(InvalidInput::NonFinite { index, name }) => {
                assert_eq!(index, 5);
                assert_eq!(name, FEATURE_NAMES[5]);
            }
            other => panic!("expected NonFinite, got {other:?}"),
        }
    }
}

#[test]
fn feature_vector_accepts_valid_input() {
    let values: Vec<f64> = (0..FEATURE_COUNT).map(|i| i as f64).collect();
    let vector = FeatureVector::new(&values).expect("valid vector");
    assert_eq!(vector.values()[13], 13.0);
}

// ─── scaler artifact ────────────────────────────────────────────

#[test]
fn scaler_normalizes_against_mean_and_scale() {
    let scaler = StandardScaler {
        mean: vec![10.0; FEATURE_COUNT],
        scale: vec![2.0; FEATURE_COUNT],
    };
    scaler.validate().expect("valid scaler");
    let out = scaler.normalize(&[14.0; FEATURE_COUNT]);
    assert!(out.iter().all(|&v| (v - 2.0).abs() < 1e-12));
}

#[test]
fn identity_scaler_is_a_no_op() {
    let input = [3.25; FEATURE_COUNT];
    assert_eq!(StandardScaler::identity().normalize(&input), input);
}

#[test]
fn scaler_validation_rejects_bad_parameters() {
    let short = StandardScaler {
        mean: vec![0.0; FEATURE_COUNT - 1],
        scale: vec![1.0; FEATURE_COUNT],
    };
    assert!(matches!(
        short.validate(),
        Err(ArtifactError::DimensionMismatch { .. })
    ));

    let mut nan_mean = StandardScaler::identity();
    nan_mean.mean[2] = f64::NAN;
    assert!(matches!(
        nan_mean.validate(),
        Err(ArtifactError::NonFiniteParameter { index: 2, .. })
    ));

    let mut zero_scale = StandardScaler::identity();
    zero_scale.scale[7] = 0.0;
    assert!(matches!(
        zero_scale.validate(),
        Err(ArtifactError::NonPositiveScale { index: 7, .. })
    ));
}

#[test]
fn scaler_json_round_trip() {
    let scaler = StandardScaler::identity();
    let json = serde_json::to_string(&scaler).expect("serialize");
    let loaded = StandardScaler::from_json(&json).expect("parse");
    assert_eq!(loaded.mean, scaler.mean);
    assert_eq!(loaded.scale, scaler.scale);
}

#[test]
fn scaler_rejects_malformed_json() {
    assert!(matches!(
        StandardScaler::from_json("{\"mean\": 3}"),
        Err(ArtifactError::ParseJson(_))
    ));
}

// ─── isolation forest artifact ──────────────────────────────────

#[test]
fn forest_validates_and_round_trips() {
    let forest = small_forest();
    forest.validate().expect("valid forest");
    let json = serde_json::to_string(&forest).expect("serialize");
    let loaded = IsolationForest::from_json(&json).expect("parse");
    assert_eq!(loaded.model_id, forest.model_id);
    assert_eq!(loaded.trees.len(), 1);
}

#[test]
fn forest_validation_rejects_structural_defects() {
    let mut wrong_dims = small_forest();
    wrong_dims.n_features = FEATURE_COUNT + 1;
    assert!(matches!(
        wrong_dims.validate(),
        Err(ArtifactError::DimensionMismatch { .. })
    ));

    let mut tiny_sample = small_forest();
    tiny_sample.max_samples = 1;
    assert!(matches!(
        tiny_sample.validate(),
        Err(ArtifactError::InvalidSampleCount(1))
    ));

    let mut no_trees = small_forest();
    no_trees.trees.clear();
    assert!(matches!(no_trees.validate(), Err(ArtifactError::EmptyForest)));

    let mut bad_feature = small_forest();
    bad_feature.trees[0].nodes[0].feature = FEATURE_COUNT;
    assert!(matches!(
        bad_feature.validate(),
        Err(ArtifactError::MalformedTree { tree: 0, node: 0, .. })
    ));

    let mut backward_child = small_forest();
    backward_child.trees[0].nodes[0].left = 0;
    assert!(matches!(
        backward_child.validate(),
        Err(ArtifactError::MalformedTree { .. })
    ));

    let mut half_leaf = small_forest();
    half_leaf.trees[0].nodes[1].right = 2;
    assert!(matches!(
        half_leaf.validate(),
        Err(ArtifactError::MalformedTree { node: 1, .. })
    ));

    let mut nan_threshold = small_forest();
    nan_threshold.trees[0].nodes[0].threshold = f64::NAN;
    assert!(matches!(
        nan_threshold.validate(),
        Err(ArtifactError::MalformedTree { .. })
    ));
}

#[test]
fn single_leaf_forest_sits_on_the_decision_boundary() {
    // A tree that isolates nothing: E[h] = c(max_samples), so the anomaly
    // score is exactly 0.5 and the default offset puts d at 0.
    let forest = IsolationForest {
        model_id: "leaf-only".to_string(),
        model_version: "1.0.0".to_string(),
        n_features: FEATURE_COUNT,
        max_samples: 256,
        offset: -0.5,
        trees: vec![IsolationTree {
            nodes: vec![TreeNode {
                left: -1,
                right: -1,
                feature: 0,
                threshold: 0.0,
                n_samples: 256,
            }],
        }],
    };
    forest.validate().expect("valid forest");
    let d = forest.decision_value(&[0.0; FEATURE_COUNT]);
    assert!(d.abs() < 1e-12, "expected d ~ 0, got {d}");
}

#[test]
fn forest_decision_value_is_deterministic() {
    let forest = small_forest();
    let x = [0.5; FEATURE_COUNT];
    assert_eq!(forest.decision_value(&x), forest.decision_value(&x));
}

// ─── readiness gating ───────────────────────────────────────────

#[test]
fn empty_store_reports_nothing_loaded() {
    let readiness = ArtifactStore::empty().readiness();
    assert!(!readiness.model_loaded);
    assert!(!readiness.scaler_loaded);
    assert!(!readiness.is_ready());
}

#[test]
fn scoring_before_load_returns_not_ready() {
    let engine = ScoringEngine::default();
    match engine.score(&ArtifactStore::empty(), &any_vector()) {
        Err(ScoreError::NotReady {
            model_loaded: false,
            scaler_loaded: false,
        }) => {}
        other => panic!("expected NotReady, got {other:?}"),
    }
}

#[test]
fn partial_store_is_still_not_ready() {
    let store = ArtifactStore::with_parts(Some(Box::new(ConstantModel { decision: 0.0 })), None);
    assert!(store.readiness().model_loaded);
    assert!(!store.readiness().scaler_loaded);
    match ScoringEngine::default().score(&store, &any_vector()) {
        Err(ScoreError::NotReady {
            model_loaded: true,
            scaler_loaded: false,
        }) => {}
        other => panic!("expected NotReady, got {other:?}"),
    }
}

// ─── pipeline end to end ────────────────────────────────────────

#[test]
fn zero_decision_scores_fifty_high() {
    let assessment = ScoringEngine::new(5.0)
        .score(&store_with_decision(0.0), &any_vector())
        .expect("score");
    assert_eq!(assessment.fatigue_score, 50.0);
    assert_eq!(assessment.severity, Severity::High);
}

#[test]
fn strong_inlier_scores_zero_healthy() {
    let assessment = ScoringEngine::new(5.0)
        .score(&store_with_decision(10.0), &any_vector())
        .expect("score");
    assert_eq!(assessment.fatigue_score, 0.0);
    assert_eq!(assessment.severity, Severity::Healthy);
}

#[test]
fn strong_outlier_scores_hundred_severe() {
    let assessment = ScoringEngine::new(5.0)
        .score(&store_with_decision(-10.0), &any_vector())
        .expect("score");
    assert_eq!(assessment.fatigue_score, 100.0);
    assert_eq!(assessment.severity, Severity::Severe);
}

#[test]
fn score_is_rounded_to_two_decimals() {
    let assessment = ScoringEngine::new(1.0)
        .score(&store_with_decision(0.1), &any_vector())
        .expect("score");
    assert_eq!(assessment.fatigue_score, round2(assessment.fatigue_score));
}

#[test]
fn broken_model_surfaces_internal_fault() {
    let store = ArtifactStore::with_parts(
        Some(Box::new(ConstantModel { decision: f64::NAN })),
        Some(Box::new(StandardScaler::identity())),
    );
    match ScoringEngine::default().score(&store, &any_vector()) {
        Err(ScoreError::Internal(InternalFault::NonFiniteDecision { .. })) => {}
        other => panic!("expected internal fault, got {other:?}"),
    }
}

#[test]
fn broken_scaler_surfaces_internal_fault() {
    let store = ArtifactStore::with_parts(
        Some(Box::new(ConstantModel { decision: 0.0 })),
        Some(Box::new(BrokenScaler)),
    );
    match ScoringEngine::default().score(&store, &any_vector()) {
        Err(ScoreError::Internal(InternalFault::NonFiniteNormalized { index: 3, .. })) => {}
        other => panic!("expected internal fault, got {other:?}"),
    }
}

#[test]
fn assessment_serializes_wire_shape() {
    let assessment = ScoringEngine::new(5.0)
        .score(&store_with_decision(0.0), &any_vector())
        .expect("score");
    let json = serde_json::to_string(&assessment).expect("serialize");
    assert_eq!(json, "{\"fatigue_score\":50.0,\"severity\":\"High\"}");
}

// ─── artifact store load ────────────────────────────────────────

#[test]
fn store_loads_both_artifacts_from_files() {
    let model_path = temp_path("model");
    let scaler_path = temp_path("scaler");
    std::fs::write(
        &model_path,
        serde_json::to_string(&small_forest()).expect("serialize forest"),
    )
    .expect("write model");
    std::fs::write(
        &scaler_path,
        serde_json::to_string(&StandardScaler::identity()).expect("serialize scaler"),
    )
    .expect("write scaler");

    let store = ArtifactStore::load(&model_path, &scaler_path).expect("load store");
    assert!(store.readiness().is_ready());

    let assessment = ScoringEngine::default()
        .score(&store, &any_vector())
        .expect("score");
    assert!((0.0..=100.0).contains(&assessment.fatigue_score));

    let _ = std::fs::remove_file(model_path);
    let _ = std::fs::remove_file(scaler_path);
}

#[test]
fn missing_model_file_fails_load_as_model_artifact() {
    let model_path = temp_path("missing-model");
    let scaler_path = temp_path("scaler-ok");
    std::fs::write(
        &scaler_path,
        serde_json::to_string(&StandardScaler::identity()).expect("serialize scaler"),
    )
    .expect("write scaler");

    let Err(err) = ArtifactStore::load(&model_path, &scaler_path) else {
        panic!("load must fail");
    };
    assert_eq!(err.artifact, ArtifactKind::Model);
    assert!(matches!(err.source, ArtifactError::Io(_)));

    let _ = std::fs::remove_file(scaler_path);
}

#[test]
fn corrupt_scaler_file_fails_load_as_scaler_artifact() {
    let model_path = temp_path("model-ok");
    let scaler_path = temp_path("corrupt-scaler");
    std::fs::write(
        &model_path,
        serde_json::to_string(&small_forest()).expect("serialize forest"),
    )
    .expect("write model");
    std::fs::write(&scaler_path, "not json").expect("write scaler");

    let Err(err) = ArtifactStore::load(&model_path, &scaler_path) else {
        panic!("load must fail");
    };
    assert_eq!(err.artifact, ArtifactKind::Scaler);
    assert!(matches!(err.source, ArtifactError::ParseJson(_)));

    let _ = std::fs::remove_file(model_path);
    let _ = std::fs::remove_file(scaler_path);
}
