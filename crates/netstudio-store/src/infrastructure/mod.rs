//! Infrastructure layer.
//!
//! Contains the OS-facing adapters: the file-system implementation of the
//! store port, the TOML settings file, and the UI command bridge.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `netstudio_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod storage;
pub mod ui_bridge;
