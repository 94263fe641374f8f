//! Core trait definitions

mod store;

pub use store::ClientStore;
