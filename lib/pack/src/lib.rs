//! # collage-pack
//!
//! Silhouette-aware packing optimizer.
//!
//! Images arrive as alpha masks, get reduced to convex hulls once, and a
//! simulated-annealing loop then perturbs their placements to minimize the
//! number of overlapping silhouette pairs. The annealer exposes one
//! transition per [`Annealer::step`] call so an interactive caller can
//! interleave rendering and input handling between steps.
//!
//! ## Example
//!
//! ```rust
//! use collage_pack::{AlphaMask, Annealer, AnnealerConfig, ImageRef};
//!
//! let images = vec![
//!     (ImageRef::new("a"), AlphaMask::opaque(20, 20)),
//!     (ImageRef::new("b"), AlphaMask::opaque(20, 20)),
//! ];
//! let mut annealer = Annealer::new(AnnealerConfig::default(), 100.0, 100.0, images);
//!
//! while !annealer.is_converged() {
//!     annealer.step();
//!     // render annealer.layout() here
//! }
//! ```

pub mod annealer;
pub mod layout;

pub use annealer::{acceptance_probability, energy, Annealer, AnnealerConfig, Phase};
pub use layout::{choose_random_subset, AlphaMask, ImageRef, Layout, PlacedItem};
