//! Curve group definitions.
//!
//! A [`CurveGroupDefinition`] describes one calibration step: the roles each
//! curve of the group plays and, for curves to calibrate, their nodes. It is
//! assembled with [`CurveGroupDefinitionBuilder`] and reused across runs.

mod builder;
mod entry;
mod group;
mod nodal;
mod node;

pub use builder::CurveGroupDefinitionBuilder;
pub use entry::CurveGroupEntry;
pub use group::CurveGroupDefinition;
pub use nodal::NodalCurveDefinition;
pub use node::CurveNode;
