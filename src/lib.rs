//! # collage
//!
//! Arrange irregularly-shaped (alpha-masked) images on a bounded canvas so
//! their opaque silhouettes do not overlap, and explore a learned embedding
//! space to swap an image for visually similar ones by interpolating between
//! two labeled concept vectors.
//!
//! Two engines, usable independently:
//!
//! - **Packing**: per-image convex hulls ([`Hull`]) plus a simulated-annealing
//!   optimizer ([`Annealer`]) that perturbs placements to minimize the count
//!   of overlapping silhouette pairs.
//! - **Exploration**: cosine-similarity retrieval ([`EmbeddingIndex`]) and
//!   concept interpolation ([`plan_assignment`]) over precomputed embeddings.
//!
//! Rendering, input handling, image decoding, and embedding computation all
//! live outside this workspace; the core only consumes alpha masks and
//! precomputed vectors and hands back layouts and slider assignments.
//!
//! ## Quick Start
//!
//! ```rust
//! use collage::prelude::*;
//!
//! // Pack two opaque squares onto a canvas, one annealing step at a time.
//! let images = vec![
//!     (ImageRef::new("a"), AlphaMask::opaque(20, 20)),
//!     (ImageRef::new("b"), AlphaMask::opaque(20, 20)),
//! ];
//! let mut annealer = Annealer::new(AnnealerConfig::default(), 100.0, 100.0, images);
//! while !annealer.is_converged() {
//!     annealer.step();
//! }
//! let layout = annealer.into_layout();
//! assert_eq!(layout.len(), 2);
//!
//! // Rank stored embeddings against a query vector.
//! let index = EmbeddingIndex::load(vec![
//!     Embedding::new("a", Vector::new(vec![1.0, 0.0])),
//!     Embedding::new("b", Vector::new(vec![0.0, 1.0])),
//! ]).unwrap();
//! let top = index.top_n(&Vector::new(vec![1.0, 0.0]), 1).unwrap();
//! assert_eq!(top[0].0.id, "a");
//! ```
//!
//! ## Crate Structure
//!
//! - [`collage-geom`](https://docs.rs/collage-geom) - convex hulls, containment, intersection
//! - [`collage-pack`](https://docs.rs/collage-pack) - layout state and the annealing loop
//! - [`collage-embed`](https://docs.rs/collage-embed) - embedding index and interpolation planner

// Re-export geometry kernel
pub use collage_geom::{GeomError, Hull, Point};

// Re-export packing optimizer
pub use collage_pack::{
    acceptance_probability, choose_random_subset, energy, AlphaMask, Annealer, AnnealerConfig,
    ImageRef, Layout, Phase, PlacedItem,
};

// Re-export embedding engine
pub use collage_embed::{
    lerp, plan_assignment, slerp, ConceptPair, EmbedError, Embedding, EmbeddingIndex,
    SliderAssignment, SliderRange, Vector,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        acceptance_probability, choose_random_subset, energy, lerp, plan_assignment, slerp,
        AlphaMask, Annealer, AnnealerConfig, ConceptPair, EmbedError, Embedding, EmbeddingIndex,
        GeomError, Hull, ImageRef, Layout, Phase, PlacedItem, Point, SliderAssignment,
        SliderRange, Vector,
    };
}
