//! In-process session records with expired-record eviction.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, ExpiredDeletion, SessionStore};

/// Session records kept in memory.
///
/// Records past their expiry read as missing and are dropped by
/// [`ExpiredDeletion::delete_expired`].
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore(Arc<Mutex<HashMap<Id, Record>>>);

impl MemorySessionStore {
    fn records(
        &self,
    ) -> session_store::Result<MutexGuard<'_, HashMap<Id, Record>>> {
        self.0
            .lock()
            .map_err(|err| session_store::Error::Backend(err.to_string()))
    }

    /// Number of records held, expired ones included.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    /// Every record held, expired ones included.
    #[cfg(test)]
    pub fn snapshot(&self) -> Vec<Record> {
        self.0.lock().unwrap().values().cloned().collect()
    }
}

fn is_active(record: &Record) -> bool {
    record.expiry_date > OffsetDateTime::now_utc()
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let mut records = self.records()?;
        while records.contains_key(&record.id) {
            record.id = Id::default();
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records()?.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self.records()?.get(id).filter(|r| is_active(r)).cloned())
    }

    async fn delete(&self, id: &Id) -> session_store::Result<()> {
        self.records()?.remove(id);
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for MemorySessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        self.records()?.retain(|_, record| is_active(record));
        Ok(())
    }
}

/// Evict expired records every `period`, forever.
pub async fn delete_expired_every<S>(store: S, period: Duration)
where
    S: ExpiredDeletion,
{
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        if let Err(err) = store.delete_expired().await {
            tracing::error!(%err, "failed to delete expired sessions");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(expires_in: time::Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::default(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_expired_record_reads_as_missing() {
        let store = MemorySessionStore::default();
        let active = record(time::Duration::minutes(30));
        let expired = record(time::Duration::seconds(-1));

        store.save(&active).await.unwrap();
        store.save(&expired).await.unwrap();

        let loaded = store.load(&active.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, active.id);
        assert!(store.load(&expired.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_expired() {
        let store = MemorySessionStore::default();
        let active = record(time::Duration::minutes(30));
        store.save(&active).await.unwrap();
        for _ in 0..3 {
            store.save(&record(time::Duration::seconds(-1))).await.unwrap();
        }
        assert_eq!(store.len(), 4);

        store.delete_expired().await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot()[0].id, active.id);
    }

    #[tokio::test]
    async fn test_background_eviction() {
        let store = MemorySessionStore::default();
        store.save(&record(time::Duration::seconds(-1))).await.unwrap();

        let task = tokio::spawn(delete_expired_every(
            store.clone(),
            Duration::from_millis(10),
        ));
        tokio::time::sleep(Duration::from_millis(50)).await;
        task.abort();

        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_create_keeps_existing_ids() {
        let store = MemorySessionStore::default();
        let first = record(time::Duration::minutes(30));
        store.save(&first).await.unwrap();

        let mut second = record(time::Duration::minutes(30));
        second.id = first.id;
        store.create(&mut second).await.unwrap();

        assert_ne!(second.id, first.id);
        assert_eq!(store.len(), 2);
    }
}
