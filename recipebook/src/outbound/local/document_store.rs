//! In-process document store emulating the managed backend.
//!
//! Each collection lives in a `watch` channel holding the current id → JSON
//! map. A write builds the next map, rewrites `<collection>.json` when a
//! [`LocalDataDir`] is attached, and only then publishes with `send_replace`.
//! Subscribers therefore see only committed states, and a late subscriber
//! immediately receives the current one.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;
use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use crate::domain::ports::{Collection, DocumentSnapshots, DocumentStore, DocumentStoreError};

use super::LocalDataDir;

type Documents = Arc<BTreeMap<String, Value>>;

/// Document store backed by memory and, optionally, JSON files.
#[derive(Debug)]
pub struct LocalDocumentStore {
    recipes: watch::Sender<Documents>,
    users: watch::Sender<Documents>,
    data_dir: Option<LocalDataDir>,
    // Serialises mutation and the file write that follows it.
    write_lock: Mutex<()>,
}

impl LocalDocumentStore {
    /// Empty store with no persistence.
    pub fn in_memory() -> Self {
        Self {
            recipes: watch::Sender::new(Documents::default()),
            users: watch::Sender::new(Documents::default()),
            data_dir: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Store persisted under `data_dir`, seeded from any existing files.
    pub fn open(data_dir: LocalDataDir) -> Result<Self, DocumentStoreError> {
        let mut store = Self::in_memory();
        for collection in Collection::ALL {
            let seeded: Option<BTreeMap<String, Value>> = data_dir
                .read_json(&file_name(collection))
                .map_err(|err| DocumentStoreError::connection(err.to_string()))?;
            if let Some(documents) = seeded {
                debug!(%collection, count = documents.len(), "loaded documents");
                store.channel(collection).send_replace(Arc::new(documents));
            }
        }
        store.data_dir = Some(data_dir);
        Ok(store)
    }

    fn channel(&self, collection: Collection) -> &watch::Sender<Documents> {
        match collection {
            Collection::Recipes => &self.recipes,
            Collection::Users => &self.users,
        }
    }

    fn snapshot(&self, collection: Collection) -> Documents {
        Arc::clone(&self.channel(collection).borrow())
    }

    fn mutate(
        &self,
        collection: Collection,
        apply: impl FnOnce(&mut BTreeMap<String, Value>),
    ) -> Result<(), DocumentStoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = BTreeMap::clone(&self.snapshot(collection));
        apply(&mut next);
        if let Some(data_dir) = &self.data_dir {
            data_dir
                .write_json(&file_name(collection), &next)
                .map_err(|err| DocumentStoreError::connection(err.to_string()))?;
        }
        self.channel(collection).send_replace(Arc::new(next));
        Ok(())
    }
}

fn file_name(collection: Collection) -> String {
    format!("{}.json", collection.name())
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Value>, DocumentStoreError> {
        Ok(self.snapshot(collection).get(id).cloned())
    }

    async fn set(
        &self,
        collection: Collection,
        id: &str,
        document: Value,
    ) -> Result<(), DocumentStoreError> {
        if id.trim().is_empty() {
            return Err(DocumentStoreError::query("document id must not be blank"));
        }
        if !document.is_object() {
            return Err(DocumentStoreError::serialization(format!(
                "{collection}/{id} must be a JSON object"
            )));
        }
        self.mutate(collection, |documents| {
            documents.insert(id.to_owned(), document);
        })?;
        debug!(%collection, document_id = %id, "document written");
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), DocumentStoreError> {
        self.mutate(collection, |documents| {
            documents.remove(id);
        })?;
        debug!(%collection, document_id = %id, "document deleted");
        Ok(())
    }

    async fn query_equal(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Value>, DocumentStoreError> {
        Ok(self
            .snapshot(collection)
            .values()
            .filter(|document| document.get(field) == Some(value))
            .cloned()
            .collect())
    }

    fn subscribe(&self, collection: Collection) -> DocumentSnapshots {
        let receiver = self.channel(collection).subscribe();
        stream::unfold((receiver, true), |(mut receiver, first)| async move {
            if !first && receiver.changed().await.is_err() {
                return None;
            }
            let documents: Vec<Value> = receiver.borrow_and_update().values().cloned().collect();
            Some((Ok(documents), (receiver, false)))
        })
        .boxed()
    }
}
