//! Gridnest is a minimal block-structured mesh refinement driver for time
//! dependent systems of 1D partial differential equations. A static hierarchy
//! of nested grid patches, refined by a factor of 2 from one level to the
//! next, is advanced with explicit Euler steps of a user-supplied right-hand
//! side. Fine patches draw their guard zones from their parents by linear
//! interpolation (prolongation), and hand their more accurate interior data
//! back to their parents by averaging (restriction).
//!
//! All levels share one global time step; there is no subcycling, no
//! refluxing at refinement boundaries, and no regridding. The patches are
//! placed once, when the hierarchy is built.

pub mod error;
pub mod fields;
pub mod hierarchy;
pub mod mesh;
pub mod models;
pub mod output;
pub mod patch;
pub mod problem;

pub use error::{Error, ErrorKind};
pub use fields::Fields;
pub use hierarchy::{Hierarchy, HierarchyConfig, Level, RunState};
pub use mesh::Mesh;
pub use patch::{Boundary, Patch, PatchId, PhysicalBoundary};
pub use problem::FieldProblem;
