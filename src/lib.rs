//! Extract chains of connected line segments from a sketch and decimate them into reduced
//! polylines for preview.
//!
//! A typical recompute is [`extract`] from a selected seed segment, then [`decimate`] with a
//! set of [`Tolerances`]. [`Session`] wraps both for hosts that drive the work from UI events
//! and want a single preview [`Overlay`] kept up to date.
//!
//! # Example
//! ```rust
//! use decimate::*;
//!
//! let sketch = Sketch::from_lines(
//!     [
//!         ([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
//!         ([1.0, 0.0, 0.0], [2.0, 0.0, 0.0]),
//!         ([2.0, 0.0, 0.0], [2.0, 1.0, 0.0]),
//!     ],
//!     Weld::Exact,
//! )
//! .unwrap();
//!
//! let chain = extract(&sketch, 1);
//! assert_eq!(chain.segments(), &[0, 1, 2]);
//!
//! let points = decimate(&sketch, &chain, &Tolerances::new(1.5, 0.3).unwrap());
//! assert_eq!(points, vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 1.0, 0.0]]);
//! ```
use rustc_hash::FxHashMap as HashMap;
use rustc_hash::FxHashSet as HashSet;

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

mod chain;
mod decimate;
pub mod overlay;
mod point;
mod polyline;
mod session;
mod sketch;

pub use chain::*;
pub use decimate::*;
pub use overlay::{Overlay, OverlaySink, Style};
pub use point::*;
pub use polyline::*;
pub use session::*;
pub use sketch::*;
