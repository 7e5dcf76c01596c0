//! Domain entities for Net Studio.
//!
//! Pure data and rules with no infrastructure dependencies.  Everything here
//! can be compiled and tested without a file system, a runtime, or a UI.
//!
//! Code in outer layers (the store, the command bridge, the CLI) depends on
//! these types, but the domain never depends on them.

/// Dataset purposes, formats and their file names.
pub mod dataset;

/// The ordered index of saved networks.
pub mod index;

/// Model-type tags, hyperparameters, default templates and validation.
pub mod model;

/// Persisted network records.
pub mod net;
