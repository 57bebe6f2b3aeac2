//! # collage-geom
//!
//! Geometry kernel for the collage packer.
//!
//! This crate turns per-pixel alpha silhouettes into convex hulls and answers
//! the two questions the packing optimizer asks about them:
//!
//! - [`Hull::contains`] - even-odd ray-cast point containment
//! - [`Hull::intersects`] - bidirectional vertex-containment overlap test
//!
//! ## Example
//!
//! ```rust
//! use collage_geom::{Hull, Point};
//!
//! let hull = Hull::from_points(vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(8.0, 0.0),
//!     Point::new(8.0, 8.0),
//!     Point::new(0.0, 8.0),
//!     Point::new(4.0, 4.0), // interior, dropped by the hull walk
//! ]);
//!
//! assert_eq!(hull.vertices().len(), 4);
//! assert!(hull.contains(Point::new(4.0, 4.0)));
//! assert_eq!(hull.area(), 64.0);
//! ```

pub mod error;
pub mod hull;
pub mod point;

pub use error::{GeomError, Result};
pub use hull::Hull;
pub use point::Point;
