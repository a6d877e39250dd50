use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::FEATURE_COUNT;
use crate::error::ArtifactError;

const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

/// Capability contract for the anomaly-model artifact.
///
/// Convention (load-bearing for the fatigue mapping): higher decision value
/// means a more normal window — `d > 0` inlier, `d < 0` outlier, magnitude
/// roughly proportional to confidence.
pub trait AnomalyModel: Send + Sync {
    fn decision_value(&self, features: &[f64; FEATURE_COUNT]) -> f64;
}

/// One node of an isolation tree. `left`/`right` index into the tree's node
/// array; `-1` on both marks a leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    pub left: i64,
    pub right: i64,
    /// Split feature index (ignored at leaves).
    pub feature: usize,
    /// Split threshold: `x[feature] <= threshold` descends left.
    pub threshold: f64,
    /// Training samples that reached this node.
    pub n_samples: u64,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.left < 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationTree {
    pub nodes: Vec<TreeNode>,
}

/// Inference-only isolation forest, exported by the offline training
/// pipeline as JSON node arrays. The runtime performs only traversal — no
/// training, no sampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    /// Human-readable model identifier.
    pub model_id: String,
    /// Semantic version of the trained model.
    pub model_version: String,
    /// Input dimensionality the forest was fit on.
    pub n_features: usize,
    /// Sub-sample size each tree was grown on; normalizes path lengths.
    pub max_samples: usize,
    /// Decision offset: -0.5 unless the contamination rate was tuned.
    #[serde(default = "default_offset")]
    pub offset: f64,
    pub trees: Vec<IsolationTree>,
}

fn default_offset() -> f64 {
    -0.5
}

/// Average path length of an unsuccessful BST search over `n` samples,
/// the standard isolation-forest normalizer c(n).
fn average_path_length(n: f64) -> f64 {
    if n <= 1.0 {
        0.0
    } else if n == 2.0 {
        1.0
    } else {
        2.0 * ((n - 1.0).ln() + EULER_MASCHERONI) - 2.0 * (n - 1.0) / n
    }
}

impl IsolationForest {
    /// Validate that the forest is structurally sound. Child indices must
    /// point strictly forward in the node array, which rules out cycles and
    /// makes traversal guaranteed to terminate.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.n_features != FEATURE_COUNT {
            return Err(ArtifactError::DimensionMismatch {
                what: "model n_features",
                expected: FEATURE_COUNT,
                got: self.n_features,
            });
        }
        if self.max_samples < 2 {
            return Err(ArtifactError::InvalidSampleCount(self.max_samples));
        }
        if !self.offset.is_finite() {
            return Err(ArtifactError::InvalidOffset(self.offset));
        }
        if self.trees.is_empty() {
            return Err(ArtifactError::EmptyForest);
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ArtifactError::MalformedTree {
                    tree: t,
                    node: 0,
                    detail: "tree has no nodes",
                });
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                if (node.left < 0) != (node.right < 0) {
                    return Err(ArtifactError::MalformedTree {
                        tree: t,
                        node: i,
                        detail: "one child is a leaf marker but not the other",
                    });
                }
                if node.is_leaf() {
                    continue;
                }
                if node.feature >= FEATURE_COUNT {
                    return Err(ArtifactError::MalformedTree {
                        tree: t,
                        node: i,
                        detail: "split feature out of range",
                    });
                }
                if !node.threshold.is_finite() {
                    return Err(ArtifactError::MalformedTree {
                        tree: t,
                        node: i,
                        detail: "non-finite split threshold",
                    });
                }
                let in_range = |child: i64| child > i as i64 && (child as usize) < tree.nodes.len();
                if !in_range(node.left) || !in_range(node.right) {
                    return Err(ArtifactError::MalformedTree {
                        tree: t,
                        node: i,
                        detail: "child index out of range or not strictly forward",
                    });
                }
            }
        }
        Ok(())
    }

    /// Load and validate from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let forest: Self = serde_json::from_str(json).map_err(ArtifactError::ParseJson)?;
        forest.validate()?;
        Ok(forest)
    }

    /// Load and validate from a JSON file path.
    pub fn from_file(path: &Path) -> Result<Self, ArtifactError> {
        let content = std::fs::read_to_string(path).map_err(ArtifactError::Io)?;
        Self::from_json(&content)
    }

    /// Isolation depth of `x` in one tree: leaf depth plus the c(n)
    /// correction for the samples that shared the leaf.
    fn path_length(tree: &IsolationTree, x: &[f64; FEATURE_COUNT]) -> f64 {
        let mut idx = 0usize;
        let mut depth = 0.0f64;
        loop {
            let node = &tree.nodes[idx];
            if node.is_leaf() {
                return depth + average_path_length(node.n_samples as f64);
            }
            idx = if x[node.feature] <= node.threshold {
                node.left as usize
            } else {
                node.right as usize
            };
            depth += 1.0;
        }
    }
}

impl AnomalyModel for IsolationForest {
    /// sklearn-convention decision function: anomaly score
    /// `s = 2^(-E[h(x)] / c(max_samples))` in (0, 1], then
    /// `d = -s - offset`. With the default offset of -0.5 this is positive
    /// for inliers and negative for outliers.
    fn decision_value(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let total: f64 = self
            .trees
            .iter()
            .map(|tree| Self::path_length(tree, features))
            .sum();
        let mean_path = total / self.trees.len() as f64;
        let anomaly_score = 2.0f64.powf(-mean_path / average_path_length(self.max_samples as f64));
        -anomaly_score - self.offset
    }
}
