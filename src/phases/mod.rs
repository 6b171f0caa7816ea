//! The phases of a consolidation run.
//!
//! ## Overview
//!
//! A run goes through three phases, strictly in sequence:
//! 1. Collect - walk the project tree and find every archive
//! 2. Materialize - recreate the consolidation directory and copy the
//!    archives into it under collision-free names
//! 3. Register - rebuild the project library from the directory and attach
//!    it to every module
//!
//! The [`orchestrator`] drives them, handles confirmation and cancellation,
//! and turns the result into a single [`orchestrator::Outcome`].

pub mod collect;
pub mod materialize;
pub mod orchestrator;
pub mod register;

pub use collect::{discover, Collector, Discovery};
pub use materialize::{materialize, plan_copies, prepare_destination, CopyPlanEntry};
pub use orchestrator::{Consolidator, Notifier, Outcome, RunState};
pub use register::{register, Registration};
