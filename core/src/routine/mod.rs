// desi_store/src/routine/mod.rs

//! Ordered, named steps run against a mutable context.
//!
//! Maintenance operations are expressed as routines so that each phase
//! (snapshot, classify, remove, count) gets its own tracing span and the
//! phases can be shared between operations.

pub mod control;
pub mod definition;
pub mod execution;
pub mod step;

pub use control::{RoutineOutcome, StepControl};
pub use definition::Routine;
pub use step::{SkipCondition, StepDef, StepHandler};
