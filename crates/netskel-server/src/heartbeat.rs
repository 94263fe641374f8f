//! Heartbeat recording

use netskel_core::types::fields;
use netskel_core::{ClientId, ClientStore, StoreError};

use crate::session::Session;

/// Record that `client` was just seen
///
/// Writes `lastSeen`, `inet`, `hostname` and `username` plus any `extra`
/// fields in one transaction. Creates a bare record for a UUID the registry
/// has never seen. `originalHostname` is never touched.
pub fn record_heartbeat(
    store: &mut dyn ClientStore,
    client: &ClientId,
    session: &Session,
    now: i64,
    extra: &[(&str, &str)],
) -> Result<(), StoreError> {
    let now = now.to_string();
    let mut updates: Vec<(&str, &str)> = vec![
        (fields::LAST_SEEN, now.as_str()),
        (fields::INET, session.remote_addr.as_str()),
        (fields::HOSTNAME, session.hostname()),
        (fields::USERNAME, session.username()),
    ];
    updates.extend_from_slice(extra);

    store.put_fields(&client.to_string(), &updates)?;

    tracing::debug!("Stored heartbeat for {}", client);
    Ok(())
}
