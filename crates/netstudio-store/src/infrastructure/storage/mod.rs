//! Storage infrastructure: network data files and application settings.
//!
//! - `layout`   – Where each file lives under the data root.
//! - `atomic`   – Write-to-temp-then-rename helper used for every write.
//! - `fs_store` – `FsNetStore`, the file-system implementation of
//!   `application::store::NetStore`.
//! - `settings` – The TOML settings file and data-root resolution.

pub mod atomic;
pub mod fs_store;
pub mod layout;
pub mod settings;
