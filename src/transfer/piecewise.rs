// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f, Vector4f};
use crate::math::spectrum::{lerp3, rgba, transparent};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransferNode {
    /// Position in the normalized `[0, 1]` scalar range.
    pub value: Float,
    pub color: Vector3f,
    pub alpha: Float,
}

impl TransferNode {
    pub fn new(value: Float, color: Vector3f, alpha: Float) -> Self {
        Self { value, color, alpha }
    }
}

/// Piecewise-linear classification of scalar samples. Values are first
/// normalized by `domain`; anything below `threshold` is fully transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferFunction {
    nodes: Vec<TransferNode>,
    threshold: Float,
    domain: (Float, Float),
}

impl TransferFunction {
    pub fn new(mut nodes: Vec<TransferNode>, threshold: Float, domain: (Float, Float)) -> Result<Self, String> {
        if nodes.is_empty() {
            return Err("transfer function needs at least one node".to_string());
        }
        if !(domain.1 > domain.0) {
            return Err(format!("invalid transfer domain [{}, {}]", domain.0, domain.1));
        }
        if nodes.iter().any(|n| !n.value.is_finite()) {
            return Err("transfer node values must be finite".to_string());
        }

        nodes.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(std::cmp::Ordering::Equal));
        for node in nodes.iter_mut() {
            node.alpha = node.alpha.max(0.0).min(1.0);
        }

        Ok(Self { nodes, threshold, domain })
    }

    /// Blue, green, red at full opacity.
    pub fn rainbow() -> Self {
        Self {
            nodes: vec![
                TransferNode::new(0.0, Vector3f::new(0.0, 0.0, 1.0), 1.0),
                TransferNode::new(0.5, Vector3f::new(0.0, 1.0, 0.0), 1.0),
                TransferNode::new(1.0, Vector3f::new(1.0, 0.0, 0.0), 1.0),
            ],
            threshold: 0.2,
            domain: (0.0, 1.0),
        }
    }

    /// Same colours as `rainbow`, opacity growing to one half with the value.
    pub fn ramp() -> Self {
        Self {
            nodes: vec![
                TransferNode::new(0.0, Vector3f::new(0.0, 0.0, 1.0), 0.0),
                TransferNode::new(0.5, Vector3f::new(0.0, 1.0, 0.0), 0.25),
                TransferNode::new(1.0, Vector3f::new(1.0, 0.0, 0.0), 0.5),
            ],
            threshold: 0.05,
            domain: (0.0, 1.0),
        }
    }

    pub fn nodes(&self) -> &[TransferNode] {
        &self.nodes
    }

    pub fn threshold(&self) -> Float {
        self.threshold
    }

    pub fn domain(&self) -> (Float, Float) {
        self.domain
    }

    pub fn normalize(&self, s: Float) -> Float {
        let t = (s - self.domain.0) / (self.domain.1 - self.domain.0);
        if t.is_nan() {
            0.0
        } else {
            t.max(0.0).min(1.0)
        }
    }

    /// Straight-alpha colour of a raw scalar sample.
    pub fn classify(&self, s: Float) -> Vector4f {
        self.classify_normalized(self.normalize(s))
    }

    pub fn classify_normalized(&self, t: Float) -> Vector4f {
        if t < self.threshold {
            return transparent();
        }

        let first = &self.nodes[0];
        let last = &self.nodes[self.nodes.len() - 1];
        if t <= first.value {
            return rgba(first.color, first.alpha);
        }
        if t >= last.value {
            return rgba(last.color, last.alpha);
        }

        for pair in self.nodes.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t <= b.value {
                let span = b.value - a.value;
                let w = if span > 0.0 { (t - a.value) / span } else { 1.0 };
                let alpha = a.alpha * (1.0 - w) + b.alpha * w;
                return rgba(lerp3(&a.color, &b.color, w), alpha);
            }
        }

        rgba(last.color, last.alpha)
    }
}

impl Default for TransferFunction {
    fn default() -> Self {
        Self::ramp()
    }
}
