//! Application layer use cases.
//!
//! This layer sits between the domain (`netstudio_core`) and the
//! infrastructure (file system, UI bridge).  It:
//!
//! - **Orchestrates** domain records to fulfil a user goal (e.g. "rename this
//!   network everywhere it is stored").
//! - **Depends on abstractions**: storage is reached only through the
//!   [`store::NetStore`] trait, so the file-system adapter can be swapped for
//!   a mock in tests.
//! - **Contains no direct file-system access.**
//!
//! # Sub-modules
//!
//! - **`store`**       – The `NetStore` port and the `StoreError` taxonomy.
//! - **`manage_nets`** – `NetService`: list, create, rename, save, delete.
//! - **`cache`**       – Memoised `netList` / `net` queries and their
//!   invalidation broadcast.
//! - **`selection`**   – The currently selected network as a reactive cell.

pub mod cache;
pub mod manage_nets;
pub mod selection;
pub mod store;
