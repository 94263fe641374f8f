//! Client store trait

use crate::error::StoreError;
use crate::types::ClientRecord;

/// Transactional key-value store with one namespace per client
///
/// Every mutating call is a single transaction: it either lands completely
/// or not at all. Implementations bound how long they wait for a lock held
/// by another process and fail with [`StoreError::Locked`] past that bound.
pub trait ClientStore {
    /// Upsert one field, creating the namespace if needed
    ///
    /// An empty value deletes the field.
    fn put(&mut self, client: &str, field: &str, value: &str) -> Result<(), StoreError> {
        self.put_fields(client, &[(field, value)])
    }

    /// Upsert several fields in one transaction, creating the namespace if needed
    fn put_fields(&mut self, client: &str, fields: &[(&str, &str)]) -> Result<(), StoreError>;

    /// Upsert one field of an existing namespace
    ///
    /// Returns `false` and changes nothing when the namespace does not exist.
    fn update(&mut self, client: &str, field: &str, value: &str) -> Result<bool, StoreError>;

    /// Read one field
    fn get(&self, client: &str, field: &str) -> Result<Option<String>, StoreError>;

    /// Whether a namespace exists
    fn contains(&self, client: &str) -> Result<bool, StoreError>;

    /// Remove a namespace and all its fields
    ///
    /// Returns whether the namespace existed.
    fn delete(&mut self, client: &str) -> Result<bool, StoreError>;

    /// Visit every namespace in key order with its full field set
    ///
    /// An error returned by the visitor stops the walk and is passed through.
    fn for_each(
        &self,
        visitor: &mut dyn FnMut(&ClientRecord) -> Result<(), StoreError>,
    ) -> Result<(), StoreError>;

    /// Collect every namespace
    fn records(&self) -> Result<Vec<ClientRecord>, StoreError> {
        let mut records = Vec::new();
        self.for_each(&mut |record| {
            records.push(record.clone());
            Ok(())
        })?;
        Ok(records)
    }
}
