use crate::{EmbedError, Result, Vector};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One precomputed embedding: an opaque source identifier (content hash,
/// path) plus its vector. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Embedding {
    pub id: String,
    pub vector: Vector,
}

impl Embedding {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, vector: Vector) -> Self {
        Self {
            id: id.into(),
            vector,
        }
    }
}

/// Read-only collection of embeddings with ranked retrieval.
///
/// Loaded once from an external store; iteration order is the load order and
/// doubles as the tie-break order for equal similarities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddingIndex {
    entries: Vec<Embedding>,
}

impl EmbeddingIndex {
    /// Load a collection. All entries must share one dimension.
    pub fn load(entries: Vec<Embedding>) -> Result<Self> {
        if let Some(first) = entries.first() {
            let dim = first.vector.dim();
            for entry in &entries {
                if entry.vector.dim() != dim {
                    return Err(EmbedError::DimensionMismatch {
                        expected: dim,
                        actual: entry.vector.dim(),
                    });
                }
            }
        }
        debug!(entries = entries.len(), "embedding index loaded");
        Ok(Self { entries })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[Embedding] {
        &self.entries
    }

    /// Dimension shared by the loaded embeddings, if any are loaded.
    #[inline]
    #[must_use]
    pub fn dim(&self) -> Option<usize> {
        self.entries.first().map(|e| e.vector.dim())
    }

    /// Top `n` entries by descending cosine similarity to `query`.
    ///
    /// Strictly higher similarity ranks first; ties keep load order. The
    /// result length is min(n, collection size). Maintains a bounded best-N
    /// buffer, O(m·n) over a collection of size m.
    pub fn top_n<'a>(&'a self, query: &Vector, n: usize) -> Result<Vec<(&'a Embedding, f32)>> {
        if self.entries.is_empty() {
            return Err(EmbedError::EmptyCollection);
        }
        let dim = self.dim().unwrap_or(0);
        if query.dim() != dim {
            return Err(EmbedError::DimensionMismatch {
                expected: dim,
                actual: query.dim(),
            });
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut best: Vec<(&Embedding, f32)> = Vec::with_capacity(n + 1);
        for entry in &self.entries {
            let score = entry.vector.cosine_similarity(query);
            if best.len() == n {
                // Buffer full and not strictly better than the current tail.
                if OrderedFloat(score) <= OrderedFloat(best[n - 1].1) {
                    continue;
                }
            }
            // Insert after every entry scoring >= score: stable for ties.
            let pos = best.partition_point(|&(_, s)| OrderedFloat(s) >= OrderedFloat(score));
            best.insert(pos, (entry, score));
            best.truncate(n);
        }
        Ok(best)
    }
}
