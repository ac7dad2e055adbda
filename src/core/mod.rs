//! # sqlgate Core Module
//!
//! The Engine Adapter: the one place engine calls are made, timed, counted
//! and logged. Exactly one adapter (cloned cheaply) backs the process.

pub mod adapter;
pub mod procedure;

pub use adapter::EngineAdapter;
pub use procedure::Procedure;
