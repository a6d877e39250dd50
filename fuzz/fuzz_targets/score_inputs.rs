#![no_main]

use fatigue_scoring::{
    ArtifactStore, FeatureVector, IsolationForest, IsolationTree, ScoringEngine, StandardScaler,
    TreeNode, FEATURE_COUNT,
};
use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;

static STORE: Lazy<ArtifactStore> = Lazy::new(|| {
    let forest = IsolationForest {
        model_id: "fuzz-forest".to_string(),
        model_version: "0.0.0".to_string(),
        n_features: FEATURE_COUNT,
        max_samples: 64,
        offset: -0.5,
        trees: vec![IsolationTree {
            nodes: vec![
                TreeNode {
                    left: 1,
                    right: 2,
                    feature: 0,
                    threshold: 0.5,
                    n_samples: 64,
                },
                TreeNode {
                    left: -1,
                    right: -1,
                    feature: 0,
                    threshold: 0.0,
                    n_samples: 20,
                },
                TreeNode {
                    left: -1,
                    right: -1,
                    feature: 0,
                    threshold: 0.0,
                    n_samples: 44,
                },
            ],
        }],
    };
    forest.validate().expect("fuzz forest is structurally valid");
    ArtifactStore::with_parts(
        Some(Box::new(forest)),
        Some(Box::new(StandardScaler::identity())),
    )
});

fn feature(data: &[u8], index: usize) -> f64 {
    let start = index * 8;
    let mut bytes = [0u8; 8];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = data.get(start + i).copied().unwrap_or_default();
    }
    f64::from_le_bytes(bytes)
}

fuzz_target!(|data: &[u8]| {
    let values: Vec<f64> = (0..FEATURE_COUNT).map(|i| feature(data, i)).collect();

    // Non-finite values must be rejected as invalid input; everything else
    // must score inside [0, 100] without panicking.
    let Ok(vector) = FeatureVector::new(&values) else {
        return;
    };
    let assessment = ScoringEngine::default()
        .score(&STORE, &vector)
        .expect("valid input against loaded store must score");
    assert!((0.0..=100.0).contains(&assessment.fatigue_score));
});
