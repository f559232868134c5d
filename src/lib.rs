#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Parametric pipe-fitting meshes for fabricated spools.
//!
//! `geom` holds the math and mesh primitives (vectors, frames, curves, planar
//! profiles, ring shells). `fitting` builds the physical components on top of
//! it: straight runs, bends, weld beads, flanges and saddle-cut branch stubs.
//!
//! Every builder is a pure function of its parameters and a
//! [`fitting::GeometryConfig`]; identical inputs produce bit-identical meshes.

pub mod fitting;
pub mod geom;

pub use fitting::{FittingError, GeometryConfig};
pub use geom::{GeomMesh, GeomMeshDiagnostics};
