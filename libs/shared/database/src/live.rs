use std::sync::Arc;

use anyhow::Result;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::debug;

use crate::store::StoreClient;

/// A channel-fed mirror of one field-equality query against the store.
///
/// The store has no push channel on this surface, so "live" means: the
/// current matching set is re-fetched on `refresh()` and published to every
/// subscriber through a watch channel. Mutating code paths call `refresh()`
/// after a successful write; readers hold a `watch::Receiver` and see the
/// latest set without touching the store themselves.
pub struct LiveQuery<T> {
    store: Arc<StoreClient>,
    collection: String,
    field: String,
    value: String,
    tx: watch::Sender<Vec<T>>,
}

impl<T> LiveQuery<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Run the initial fetch and seed the channel with the current set.
    pub async fn open(
        store: Arc<StoreClient>,
        collection: &str,
        field: &str,
        value: &str,
        auth_token: Option<&str>,
    ) -> Result<Self> {
        let initial = Self::fetch(&store, collection, field, value, auth_token).await?;
        let (tx, _rx) = watch::channel(initial);

        Ok(Self {
            store,
            collection: collection.to_string(),
            field: field.to_string(),
            value: value.to_string(),
            tx,
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<T>> {
        self.tx.subscribe()
    }

    /// Snapshot of the set as of the last fetch.
    pub fn current(&self) -> Vec<T> {
        self.tx.borrow().clone()
    }

    /// Re-query the store and publish the result to all subscribers.
    pub async fn refresh(&self, auth_token: Option<&str>) -> Result<()> {
        let records = Self::fetch(
            &self.store,
            &self.collection,
            &self.field,
            &self.value,
            auth_token,
        ).await?;

        debug!(
            "LiveQuery {}.{}={} refreshed with {} records",
            self.collection, self.field, self.value, records.len()
        );

        // send_replace never fails; a channel with no receivers still
        // keeps the latest value for current().
        self.tx.send_replace(records);
        Ok(())
    }

    async fn fetch(
        store: &StoreClient,
        collection: &str,
        field: &str,
        value: &str,
        auth_token: Option<&str>,
    ) -> Result<Vec<T>> {
        let raw = store.select_by_field(collection, field, value, auth_token).await?;

        let records = raw.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<T>, _>>()?;

        Ok(records)
    }
}
