//! Admin command implementations

mod filter;
mod mutate;
mod query;

pub use filter::{RecordFilter, SECS_PER_DAY};

use netskel_core::ClientStore;

/// Queries and mutations over a client store
pub struct RegistryAdmin<'a> {
    store: &'a mut dyn ClientStore,
    include_disabled: bool,
}

impl<'a> RegistryAdmin<'a> {
    /// `include_disabled` controls whether queries return disabled clients
    pub fn new(store: &'a mut dyn ClientStore, include_disabled: bool) -> Self {
        Self {
            store,
            include_disabled,
        }
    }
}
