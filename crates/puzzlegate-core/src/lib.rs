//! Core data structures shared by the puzzlegate generators and games.
//!
//! This crate provides the small, dependency-light building blocks that every
//! puzzle type relies on. Generators and verifiers in the other crates are
//! written in terms of these types.
//!
//! # Overview
//!
//! 1. **Grid types** - Integer grid coordinates
//!    - [`position`]: [`Position`], [`Direction`] and [`GridSize`]
//!    - [`value_set`]: [`ValueSet`], a bitset of small cell values used for pencil marks
//!
//! 2. **Geometry** - Floating point plane geometry
//!    - [`geometry`]: [`Point`], [`Segment`] and the orientation-based intersection test
//!
//! 3. **Graphs** - Undirected graphs over dense ids
//!    - [`graph`]: [`Adjacency`] with breadth-first connectivity checks
//!    - [`relabel`]: [`Relabel`], a compact-and-relabel map for id-indexed collections
//!
//! # Examples
//!
//! ```
//! use puzzlegate_core::{Adjacency, Point, Segment};
//!
//! let graph = Adjacency::from_edges(3, [(0, 1), (1, 2)]);
//! assert!(graph.is_connected());
//!
//! let a = Segment::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
//! let b = Segment::new(Point::new(0.0, 1.0), Point::new(1.0, 0.0));
//! assert!(a.intersects(&b));
//! ```

pub mod geometry;
pub mod graph;
pub mod position;
pub mod relabel;
pub mod value_set;

pub use self::{
    geometry::{Orientation, Point, Segment},
    graph::Adjacency,
    position::{Direction, GridSize, Position},
    relabel::Relabel,
    value_set::ValueSet,
};
