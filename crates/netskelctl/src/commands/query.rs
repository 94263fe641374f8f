//! Read-only admin queries

use netskel_core::time::current_time_secs;
use netskel_core::ClientRecord;

use super::{RecordFilter, RegistryAdmin};
use crate::error::AdminError;

impl RegistryAdmin<'_> {
    /// Every client, in UUID order
    pub fn list(&self) -> Result<Vec<ClientRecord>, AdminError> {
        self.select(&RecordFilter::new(self.include_disabled))
    }

    /// Clients whose UUID or any field value contains `search`
    pub fn info(&self, search: &str) -> Result<Vec<ClientRecord>, AdminError> {
        self.select(&RecordFilter::new(self.include_disabled).search(search))
    }

    /// Clients not seen for at least `days` days
    pub fn audit(&self, days: u64) -> Result<Vec<ClientRecord>, AdminError> {
        self.audit_at(days, current_time_secs())
    }

    pub fn audit_at(&self, days: u64, now: i64) -> Result<Vec<ClientRecord>, AdminError> {
        self.select(&RecordFilter::new(self.include_disabled).stale_for(days, now))
    }

    /// Records matching `filter`, in UUID order
    pub fn select(&self, filter: &RecordFilter) -> Result<Vec<ClientRecord>, AdminError> {
        let mut selected = Vec::new();
        self.store.for_each(&mut |record| {
            if filter.matches(record) {
                selected.push(record.clone());
            }
            Ok(())
        })?;

        tracing::debug!("Selected {} clients", selected.len());
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::{RegistryAdmin, SECS_PER_DAY};
    use netskel_core::types::fields;
    use netskel_core::{ClientRegistry, ClientStore};

    const A: &str = "0b5e4c1d-9a9e-4f43-8d52-7d1b2a3c4e5f";
    const B: &str = "6ec558e1-5f06-4083-9070-206819b53916";
    const C: &str = "f47ac10b-58cc-4372-a567-0e02b2c3d479";
    const NOW: i64 = 1_700_000_000;

    fn registry() -> ClientRegistry {
        let mut reg = ClientRegistry::in_memory().unwrap();
        let ten_days_ago = (NOW - 10 * SECS_PER_DAY).to_string();
        reg.put_fields(
            A,
            &[(fields::HOSTNAME, "web01.example.com"), (fields::LAST_SEEN, ten_days_ago.as_str())],
        )
        .unwrap();
        reg.put_fields(
            B,
            &[(fields::HOSTNAME, "db01.example.com"), (fields::LAST_SEEN, "1699999000")],
        )
        .unwrap();
        reg.put_fields(C, &[(fields::HOSTNAME, "old.example.com"), (fields::DISABLED, "1")])
            .unwrap();
        reg
    }

    fn uuids(records: &[netskel_core::ClientRecord]) -> Vec<&str> {
        records.iter().map(|r| r.uuid.as_str()).collect()
    }

    #[test]
    fn test_list_hides_disabled() {
        let mut reg = registry();
        assert_eq!(uuids(&RegistryAdmin::new(&mut reg, false).list().unwrap()), vec![A, B]);
        assert_eq!(uuids(&RegistryAdmin::new(&mut reg, true).list().unwrap()), vec![A, B, C]);
    }

    #[test]
    fn test_info_matches_fields_and_uuid() {
        let mut reg = registry();
        let admin = RegistryAdmin::new(&mut reg, false);
        assert_eq!(uuids(&admin.info("WEB01").unwrap()), vec![A]);
        assert_eq!(uuids(&admin.info("6EC558").unwrap()), vec![B]);
        assert!(admin.info("old.example").unwrap().is_empty());
    }

    #[test]
    fn test_audit_windows() {
        let mut reg = registry();
        let admin = RegistryAdmin::new(&mut reg, false);
        assert_eq!(uuids(&admin.audit_at(7, NOW).unwrap()), vec![A]);
        assert!(admin.audit_at(14, NOW).unwrap().is_empty());
    }

    #[test]
    fn test_audit_includes_never_seen() {
        let mut reg = registry();
        reg.put(C, fields::DISABLED, "").unwrap();
        let admin = RegistryAdmin::new(&mut reg, false);
        assert_eq!(uuids(&admin.audit_at(14, NOW).unwrap()), vec![C]);
    }
}
