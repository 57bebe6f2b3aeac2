//! # collage-embed
//!
//! Embedding-space exploration: cosine-similarity retrieval over a
//! precomputed embedding collection, and interpolation between two labeled
//! concept vectors with a uniqueness-constrained image assignment per slider
//! position.
//!
//! Embeddings are opaque to this crate: an external model computes them, and
//! the collection is loaded once and read-only afterwards.
//!
//! ## Example
//!
//! ```rust
//! use collage_embed::{
//!     plan_assignment, ConceptPair, Embedding, EmbeddingIndex, SliderRange, Vector,
//! };
//!
//! let index = EmbeddingIndex::load(vec![
//!     Embedding::new("a", Vector::new(vec![1.0, 0.0])),
//!     Embedding::new("b", Vector::new(vec![0.0, 1.0])),
//!     Embedding::new("c", Vector::new(vec![0.9, 0.1])),
//! ])?;
//!
//! let pair = ConceptPair::new(
//!     Embedding::new("day", Vector::new(vec![1.0, 0.0])),
//!     Embedding::new("night", Vector::new(vec![0.0, 1.0])),
//! );
//!
//! let assignment = plan_assignment(&pair, &index, SliderRange::default())?;
//! assert_eq!(assignment.get(0.0), Some("a"));
//! # Ok::<(), collage_embed::EmbedError>(())
//! ```

pub mod error;
pub mod index;
pub mod interp;
pub mod vector;

pub use error::{EmbedError, Result};
pub use index::{Embedding, EmbeddingIndex};
pub use interp::{lerp, plan_assignment, slerp, ConceptPair, SliderAssignment, SliderRange};
pub use vector::Vector;
