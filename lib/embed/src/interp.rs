use crate::{EmbedError, Embedding, EmbeddingIndex, Result, Vector};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Below this |sin| the interpolation angle is treated as degenerate and
/// slerp falls back to lerp.
const SLERP_SIN_THRESHOLD: f32 = 1e-6;

/// Per-dimension linear interpolation `a*(1-t) + b*t`.
pub fn lerp(a: &Vector, b: &Vector, t: f32) -> Result<Vector> {
    if a.dim() != b.dim() {
        return Err(EmbedError::DimensionMismatch {
            expected: a.dim(),
            actual: b.dim(),
        });
    }
    Ok(&(a * (1.0 - t)) + &(b * t))
}

/// Spherical linear interpolation on 3-vectors.
///
/// Falls back to [`lerp`] when the vectors are near-parallel (or either is
/// zero) so the sine division stays stable.
pub fn slerp(a: &Vector, b: &Vector, t: f32) -> Result<Vector> {
    for v in [a, b] {
        if v.dim() != 3 {
            return Err(EmbedError::DimensionMismatch {
                expected: 3,
                actual: v.dim(),
            });
        }
    }

    let denom = a.magnitude() * b.magnitude();
    if denom == 0.0 {
        return lerp(a, b, t);
    }
    let dot: f32 = a
        .as_slice()
        .iter()
        .zip(b.as_slice().iter())
        .map(|(x, y)| x * y)
        .sum();
    let angle = (dot / denom).clamp(-1.0, 1.0).acos();
    let sin_angle = angle.sin();
    if sin_angle.abs() < SLERP_SIN_THRESHOLD {
        return lerp(a, b, t);
    }

    let wa = ((1.0 - t) * angle).sin() / sin_angle;
    let wb = (t * angle).sin() / sin_angle;
    Ok(&(a * wa) + &(b * wb))
}

/// The two labeled embeddings bounding one interpolation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptPair {
    pub left: Embedding,
    pub right: Embedding,
}

impl ConceptPair {
    #[must_use]
    pub fn new(left: Embedding, right: Embedding) -> Self {
        Self { left, right }
    }

    /// Linear-interpolated query vector at slider position `t`.
    pub fn query_at(&self, t: f32) -> Result<Vector> {
        lerp(&self.left.vector, &self.right.vector, t)
    }
}

/// Discretized slider parameter range, min to max inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for SliderRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            step: 0.1,
        }
    }
}

impl SliderRange {
    /// Sample values from min to max inclusive, spaced by step, each rounded
    /// to the nearest step multiple. Ascending order; an invalid range yields
    /// no samples.
    #[must_use]
    pub fn samples(&self) -> Vec<f64> {
        if !(self.step > 0.0) || self.max < self.min {
            return Vec::new();
        }
        let first = (self.min / self.step).round() as i64;
        let count = ((self.max - self.min) / self.step).round() as i64;
        (first..=first + count)
            .map(|k| k as f64 * self.step)
            .collect()
    }
}

/// Mapping from quantized slider values to chosen source identifiers.
///
/// Slots may be missing when the candidate pool was exhausted; callers must
/// treat absent positions as "no replacement available".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliderAssignment {
    step: f64,
    slots: BTreeMap<i64, String>,
}

impl SliderAssignment {
    #[must_use]
    fn new(step: f64) -> Self {
        Self {
            step,
            slots: BTreeMap::new(),
        }
    }

    #[inline]
    fn key(&self, value: f64) -> i64 {
        (value / self.step).round() as i64
    }

    /// Identifier assigned at the slider position nearest `value`, if any.
    #[must_use]
    pub fn get(&self, value: f64) -> Option<&str> {
        self.slots.get(&self.key(value)).map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// (slider value, identifier) pairs in ascending slider order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &str)> {
        self.slots
            .iter()
            .map(|(k, id)| (*k as f64 * self.step, id.as_str()))
    }
}

/// Assign a nearest-neighbor image to each slider sample between the two
/// concepts, each identifier used at most once per build.
///
/// Samples are visited in ascending order and the pass is greedy, so the
/// result is order-dependent by design: an earlier sample can claim the
/// candidate a later sample would have ranked first. A sample whose entire
/// top-N is already claimed is left unassigned.
pub fn plan_assignment(
    pair: &ConceptPair,
    index: &EmbeddingIndex,
    range: SliderRange,
) -> Result<SliderAssignment> {
    let samples = range.samples();
    let n = samples.len();
    let mut assignment = SliderAssignment::new(range.step);
    let mut used: HashSet<&str> = HashSet::with_capacity(n);

    for &t in &samples {
        let query = pair.query_at(t as f32)?;
        let ranked = index.top_n(&query, n)?;
        match ranked
            .iter()
            .find(|(candidate, _)| !used.contains(candidate.id.as_str()))
        {
            Some((candidate, _)) => {
                used.insert(candidate.id.as_str());
                let key = assignment.key(t);
                assignment.slots.insert(key, candidate.id.clone());
            }
            None => {
                debug!(t, "candidate pool exhausted, leaving slider gap");
            }
        }
    }

    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec3(x: f32, y: f32, z: f32) -> Vector {
        Vector::new(vec![x, y, z])
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = Vector::new(vec![0.0, 2.0]);
        let b = Vector::new(vec![4.0, 0.0]);
        let mid = lerp(&a, &b, 0.5).unwrap();
        assert_eq!(mid.as_slice(), &[2.0, 1.0]);

        assert_eq!(lerp(&a, &b, 0.0).unwrap(), a);
        assert_eq!(lerp(&a, &b, 1.0).unwrap(), b);
    }

    #[test]
    fn test_lerp_dimension_mismatch() {
        let a = Vector::new(vec![1.0]);
        let b = Vector::new(vec![1.0, 2.0]);
        assert!(matches!(
            lerp(&a, &b, 0.5),
            Err(EmbedError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_slerp_quarter_circle() {
        let a = vec3(1.0, 0.0, 0.0);
        let b = vec3(0.0, 1.0, 0.0);
        let mid = slerp(&a, &b, 0.5).unwrap();
        let expected = (std::f32::consts::FRAC_PI_4).sin();
        assert!((mid.as_slice()[0] - expected).abs() < 1e-5);
        assert!((mid.as_slice()[1] - expected).abs() < 1e-5);
        assert!(mid.as_slice()[2].abs() < 1e-6);
    }

    #[test]
    fn test_slerp_parallel_falls_back_to_lerp() {
        let a = vec3(1.0, 0.0, 0.0);
        let b = vec3(2.0, 0.0, 0.0);
        let out = slerp(&a, &b, 0.25).unwrap();
        assert_eq!(out.as_slice(), &[1.25, 0.0, 0.0]);
    }

    #[test]
    fn test_slerp_requires_three_dimensions() {
        let a = Vector::new(vec![1.0, 0.0]);
        let b = Vector::new(vec![0.0, 1.0]);
        assert!(matches!(
            slerp(&a, &b, 0.5),
            Err(EmbedError::DimensionMismatch { expected: 3, .. })
        ));
    }

    #[test]
    fn test_slider_range_samples() {
        let range = SliderRange {
            min: 0.0,
            max: 1.0,
            step: 0.25,
        };
        let samples = range.samples();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0], 0.0);
        assert_eq!(*samples.last().unwrap(), 1.0);

        // Off-grid bounds snap to the nearest step multiple.
        let snapped = SliderRange {
            min: 0.24,
            max: 0.76,
            step: 0.25,
        };
        let samples = snapped.samples();
        assert_eq!(samples.len(), 3);
        assert!((samples[0] - 0.25).abs() < 1e-9);

        let empty = SliderRange {
            min: 0.0,
            max: 1.0,
            step: 0.0,
        };
        assert!(empty.samples().is_empty());
    }

    #[test]
    fn test_plan_assignment_picks_nearest_unused() {
        let index = EmbeddingIndex::load(vec![
            Embedding::new("a", Vector::new(vec![1.0, 0.0])),
            Embedding::new("b", Vector::new(vec![0.0, 1.0])),
            Embedding::new("c", Vector::new(vec![0.9, 0.1])),
        ])
        .unwrap();
        let pair = ConceptPair::new(
            Embedding::new("left", Vector::new(vec![1.0, 0.0])),
            Embedding::new("right", Vector::new(vec![0.0, 1.0])),
        );
        let range = SliderRange {
            min: 0.0,
            max: 1.0,
            step: 0.5,
        };

        let assignment = plan_assignment(&pair, &index, range).unwrap();
        assert_eq!(assignment.get(0.0), Some("a"));
        assert_eq!(assignment.get(0.5), Some("c"));
        assert_eq!(assignment.get(1.0), Some("b"));
        // Quantization: near-grid lookups hit the same slot.
        assert_eq!(assignment.get(0.49), Some("c"));
    }

    #[test]
    fn test_plan_assignment_unique_ids_and_gaps() {
        // 11 samples but only 3 candidates: at most 3 slots fill, never with
        // a repeated identifier.
        let index = EmbeddingIndex::load(vec![
            Embedding::new("a", Vector::new(vec![1.0, 0.0])),
            Embedding::new("b", Vector::new(vec![0.0, 1.0])),
            Embedding::new("c", Vector::new(vec![0.9, 0.1])),
        ])
        .unwrap();
        let pair = ConceptPair::new(
            Embedding::new("left", Vector::new(vec![1.0, 0.0])),
            Embedding::new("right", Vector::new(vec![0.0, 1.0])),
        );

        let assignment = plan_assignment(&pair, &index, SliderRange::default()).unwrap();
        assert_eq!(assignment.len(), 3);
        let ids: Vec<&str> = assignment.iter().map(|(_, id)| id).collect();
        let mut unique = ids.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_plan_assignment_empty_collection_errors() {
        let index = EmbeddingIndex::load(Vec::new()).unwrap();
        let pair = ConceptPair::new(
            Embedding::new("left", Vector::new(vec![1.0, 0.0])),
            Embedding::new("right", Vector::new(vec![0.0, 1.0])),
        );
        assert!(matches!(
            plan_assignment(&pair, &index, SliderRange::default()),
            Err(EmbedError::EmptyCollection)
        ));
    }
}
