//! Registry mutations
//!
//! Every mutation names an existing client; none of them creates one.

use netskel_core::time::current_time_secs;
use netskel_core::types::fields;
use netskel_core::ClientId;

use super::RegistryAdmin;
use crate::error::AdminError;

impl RegistryAdmin<'_> {
    /// Clear the `disabled` mark
    pub fn enable(&mut self, uuid: &str) -> Result<ClientId, AdminError> {
        self.put(uuid, fields::DISABLED, "")
    }

    /// Mark a client disabled as of now
    pub fn disable(&mut self, uuid: &str) -> Result<ClientId, AdminError> {
        self.disable_at(uuid, current_time_secs())
    }

    pub fn disable_at(&mut self, uuid: &str, now: i64) -> Result<ClientId, AdminError> {
        self.put(uuid, fields::DISABLED, &now.to_string())
    }

    /// Remove a client and everything recorded about it
    pub fn delete(&mut self, uuid: &str) -> Result<ClientId, AdminError> {
        let client = parse_client(uuid)?;
        if !self.store.delete(&client.to_string())? {
            return Err(AdminError::UnknownClient(client.to_string()));
        }

        tracing::info!("Deleted client {}", client);
        Ok(client)
    }

    /// Write one field directly; an empty value removes it
    pub fn put(&mut self, uuid: &str, field: &str, value: &str) -> Result<ClientId, AdminError> {
        let client = parse_client(uuid)?;
        if field.trim().is_empty() {
            return Err(AdminError::InvalidArgument("field name is empty".to_string()));
        }

        let key = client.to_string();
        let old = self.store.get(&key, field)?;
        if !self.store.update(&key, field, value)? {
            return Err(AdminError::UnknownClient(key));
        }

        tracing::debug!(
            "{} {}: {} -> {}",
            client,
            field,
            old.as_deref().unwrap_or_default(),
            value
        );
        Ok(client)
    }
}

fn parse_client(uuid: &str) -> Result<ClientId, AdminError> {
    ClientId::parse(uuid).map_err(|e| AdminError::InvalidArgument(e.to_string()))
}
