//! Database client abstraction
//!
//! The dispatcher only talks to the database through [`DatabaseClient`].
//! [`MongoClient`] implements it over the official driver; tests use an
//! in-memory implementation.

mod mongo;

#[cfg(test)]
pub(crate) mod memory;

pub use mongo::MongoClient;

use async_trait::async_trait;
use mongodb::bson::Document;
use serde::Serialize;

use crate::error::Result;

/// Collection descriptor returned by [`DatabaseClient::list_collections`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionInfo {
    pub name: String,
    /// Collection type reported by the server (`collection`, `view`, ...)
    #[serde(rename = "type")]
    pub kind: String,
}

impl CollectionInfo {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// Find options understood by [`DatabaseClient::find`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindSpec {
    pub projection: Option<Document>,
    pub sort: Option<Document>,
    pub skip: u64,
    pub limit: Option<i64>,
}

/// Outcome of an update-many call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Every database capability the console needs
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Collections of a database, ordered by name
    async fn list_collections(&self, db: &str) -> Result<Vec<CollectionInfo>>;

    async fn find_one(&self, db: &str, coll: &str, filter: Document) -> Result<Option<Document>>;

    async fn count(&self, db: &str, coll: &str, filter: Document) -> Result<u64>;

    async fn find(
        &self,
        db: &str,
        coll: &str,
        filter: Document,
        spec: FindSpec,
    ) -> Result<Vec<Document>>;

    async fn aggregate(&self, db: &str, coll: &str, pipeline: Vec<Document>)
    -> Result<Vec<Document>>;

    /// Delete every matching document, returning the deleted count
    async fn delete_many(&self, db: &str, coll: &str, filter: Document) -> Result<u64>;

    async fn update_many(
        &self,
        db: &str,
        coll: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateOutcome>;

    /// Raw `queryPlanner` explain output of a find
    async fn explain_find(&self, db: &str, coll: &str, filter: Document) -> Result<Document>;

    async fn db_stats(&self, db: &str) -> Result<Document>;

    async fn collection_stats(&self, db: &str, coll: &str) -> Result<Document>;

    /// `top` totals for the `<db>.<coll>` namespace, if the server reports any
    async fn top(&self, db: &str, coll: &str) -> Result<Option<Document>>;

    async fn validate(&self, db: &str, coll: &str) -> Result<Document>;

    /// In-progress operations whose namespace matches `ns_pattern`
    async fn current_op(&self, ns_pattern: &str) -> Result<Vec<Document>>;

    async fn list_indexes(&self, db: &str, coll: &str) -> Result<Vec<Document>>;

    /// Users defined on `db`, read from `admin.system.users`
    async fn list_users(&self, db: &str) -> Result<Vec<Document>>;
}
