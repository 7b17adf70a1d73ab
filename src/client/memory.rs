//! In-memory [`DatabaseClient`] for dispatcher tests
//!
//! Supports top-level equality filters (plus `$in`), `$set` updates, and the
//! `$match` + `$group` count pipeline the summarizer issues. Calls are
//! recorded so tests can assert what was (not) sent to the database.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document, doc};

use super::{CollectionInfo, DatabaseClient, FindSpec, UpdateOutcome};
use crate::error::{ClientError, Result};

#[derive(Default)]
pub struct MemoryClient {
    collections: Mutex<BTreeMap<(String, String), Vec<Document>>>,
    users: Mutex<Vec<Document>>,
    operations: Mutex<Vec<Document>>,
    calls: Mutex<Vec<String>>,
    fail_on: Mutex<Option<String>>,
    last_filter: Mutex<Option<Document>>,
    last_find: Mutex<Option<FindSpec>>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection with documents
    pub fn with_collection(self, db: &str, coll: &str, docs: Vec<Document>) -> Self {
        self.collections
            .lock()
            .unwrap()
            .insert((db.to_string(), coll.to_string()), docs);
        self
    }

    pub fn with_users(self, users: Vec<Document>) -> Self {
        *self.users.lock().unwrap() = users;
        self
    }

    pub fn with_operations(self, ops: Vec<Document>) -> Self {
        *self.operations.lock().unwrap() = ops;
        self
    }

    /// Make the named operation fail with a client error
    pub fn failing_on(self, operation: &str) -> Self {
        *self.fail_on.lock().unwrap() = Some(operation.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_called(&self, operation: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| c == operation)
    }

    /// Filter passed to the most recent filtered write
    pub fn last_filter(&self) -> Option<Document> {
        self.last_filter.lock().unwrap().clone()
    }

    pub fn last_find(&self) -> Option<FindSpec> {
        self.last_find.lock().unwrap().clone()
    }

    pub fn documents(&self, db: &str, coll: &str) -> Vec<Document> {
        self.collections
            .lock()
            .unwrap()
            .get(&(db.to_string(), coll.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, operation: &str) -> Result<()> {
        self.calls.lock().unwrap().push(operation.to_string());
        if self.fail_on.lock().unwrap().as_deref() == Some(operation) {
            return Err(ClientError::ConnectionFailed(format!("{operation} failed")).into());
        }
        Ok(())
    }

    fn matching(&self, db: &str, coll: &str, filter: &Document) -> Vec<Document> {
        self.documents(db, coll)
            .into_iter()
            .filter(|d| matches_filter(d, filter))
            .collect()
    }
}

fn matches_filter(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, expected)| {
        let actual = doc.get(key).unwrap_or(&Bson::Null);
        match expected {
            Bson::Document(ops) if ops.keys().any(|k| k.starts_with('$')) => {
                ops.iter().all(|(op, arg)| match (op.as_str(), arg) {
                    ("$in", Bson::Array(values)) => values.iter().any(|v| bson_eq(v, actual)),
                    ("$ne", v) => !bson_eq(v, actual),
                    _ => false,
                })
            }
            _ => bson_eq(expected, actual),
        }
    })
}

fn bson_eq(a: &Bson, b: &Bson) -> bool {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(*n as f64),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

fn compare_bson(a: &Bson, b: &Bson) -> Ordering {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => x.cmp(y),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => x.bytes().cmp(&y.bytes()),
        (Bson::DateTime(x), Bson::DateTime(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn sort_documents(docs: &mut [Document], sort: &Document) {
    docs.sort_by(|a, b| {
        for (field, direction) in sort {
            let ord = compare_bson(
                a.get(field).unwrap_or(&Bson::Null),
                b.get(field).unwrap_or(&Bson::Null),
            );
            let ord = if as_number(direction).unwrap_or(1.0) < 0.0 {
                ord.reverse()
            } else {
                ord
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

fn project(doc: Document, projection: &Document) -> Document {
    let mut out = Document::new();
    if let Some(id) = doc.get("_id") {
        out.insert("_id", id.clone());
    }
    for field in projection.keys() {
        if let Some(value) = doc.get(field) {
            out.insert(field.clone(), value.clone());
        }
    }
    out
}

#[async_trait]
impl DatabaseClient for MemoryClient {
    async fn list_collections(&self, db: &str) -> Result<Vec<CollectionInfo>> {
        self.record("listCollections")?;
        Ok(self
            .collections
            .lock()
            .unwrap()
            .keys()
            .filter(|(d, _)| d == db)
            .map(|(_, c)| CollectionInfo::new(c.clone(), "collection"))
            .collect())
    }

    async fn find_one(&self, db: &str, coll: &str, filter: Document) -> Result<Option<Document>> {
        self.record("findOne")?;
        Ok(self.matching(db, coll, &filter).into_iter().next())
    }

    async fn count(&self, db: &str, coll: &str, filter: Document) -> Result<u64> {
        self.record("count")?;
        Ok(self.matching(db, coll, &filter).len() as u64)
    }

    async fn find(
        &self,
        db: &str,
        coll: &str,
        filter: Document,
        spec: FindSpec,
    ) -> Result<Vec<Document>> {
        self.record("find")?;
        *self.last_find.lock().unwrap() = Some(spec.clone());

        let mut docs = self.matching(db, coll, &filter);
        if let Some(sort) = &spec.sort {
            sort_documents(&mut docs, sort);
        }

        let limit = spec.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(docs
            .into_iter()
            .skip(spec.skip as usize)
            .take(limit)
            .map(|d| match &spec.projection {
                Some(p) => project(d, p),
                None => d,
            })
            .collect())
    }

    async fn aggregate(
        &self,
        db: &str,
        coll: &str,
        pipeline: Vec<Document>,
    ) -> Result<Vec<Document>> {
        self.record("aggregate")?;

        let mut docs = self.documents(db, coll);
        let mut groups: Vec<(Bson, i32)> = Vec::new();
        let mut grouped = false;

        for stage in &pipeline {
            if let Ok(filter) = stage.get_document("$match") {
                *self.last_filter.lock().unwrap() = Some(filter.clone());
                docs.retain(|d| matches_filter(d, filter));
            }
            if let Ok(group) = stage.get_document("$group") {
                grouped = true;
                let field = group
                    .get_str("_id")
                    .unwrap_or_default()
                    .trim_start_matches('$');
                for d in &docs {
                    let key = d.get(field).cloned().unwrap_or(Bson::Null);
                    match groups.iter_mut().find(|(k, _)| bson_eq(k, &key)) {
                        Some(entry) => entry.1 += 1,
                        None => groups.push((key, 1)),
                    }
                }
            }
        }

        if !grouped {
            return Ok(docs);
        }

        Ok(groups
            .into_iter()
            .map(|(id, count)| doc! { "_id": id, "count": count })
            .collect())
    }

    async fn delete_many(&self, db: &str, coll: &str, filter: Document) -> Result<u64> {
        self.record("deleteMany")?;
        *self.last_filter.lock().unwrap() = Some(filter.clone());

        let mut collections = self.collections.lock().unwrap();
        let docs = collections
            .entry((db.to_string(), coll.to_string()))
            .or_default();
        let before = docs.len();
        docs.retain(|d| !matches_filter(d, &filter));
        Ok((before - docs.len()) as u64)
    }

    async fn update_many(
        &self,
        db: &str,
        coll: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateOutcome> {
        self.record("updateMany")?;
        *self.last_filter.lock().unwrap() = Some(filter.clone());

        let set = update.get_document("$set").cloned().unwrap_or_default();
        let mut outcome = UpdateOutcome::default();

        let mut collections = self.collections.lock().unwrap();
        let docs = collections
            .entry((db.to_string(), coll.to_string()))
            .or_default();

        for d in docs.iter_mut().filter(|d| matches_filter(d, &filter)) {
            outcome.matched += 1;
            let mut changed = false;
            for (key, value) in &set {
                if d.get(key) != Some(value) {
                    d.insert(key.clone(), value.clone());
                    changed = true;
                }
            }
            if changed {
                outcome.modified += 1;
            }
        }

        Ok(outcome)
    }

    async fn explain_find(&self, db: &str, coll: &str, filter: Document) -> Result<Document> {
        self.record("explain")?;
        Ok(doc! {
            "queryPlanner": {
                "namespace": format!("{db}.{coll}"),
                "parsedQuery": filter,
            },
            "ok": 1.0,
        })
    }

    async fn db_stats(&self, db: &str) -> Result<Document> {
        self.record("dbStats")?;
        let collections = self
            .collections
            .lock()
            .unwrap()
            .keys()
            .filter(|(d, _)| d == db)
            .count() as i32;
        Ok(doc! { "db": db, "collections": collections, "ok": 1.0 })
    }

    async fn collection_stats(&self, db: &str, coll: &str) -> Result<Document> {
        self.record("collStats")?;
        let count = self.documents(db, coll).len() as i32;
        Ok(doc! { "ns": format!("{db}.{coll}"), "count": count, "ok": 1.0 })
    }

    async fn top(&self, _db: &str, _coll: &str) -> Result<Option<Document>> {
        self.record("top")?;
        Ok(Some(doc! { "total": { "time": 0, "count": 0 } }))
    }

    async fn validate(&self, db: &str, coll: &str) -> Result<Document> {
        self.record("validate")?;
        Ok(doc! { "ns": format!("{db}.{coll}"), "valid": true, "ok": 1.0 })
    }

    async fn current_op(&self, ns_pattern: &str) -> Result<Vec<Document>> {
        self.record("currentOp")?;
        let prefix = ns_pattern.trim_start_matches('^').replace("\\.", ".");
        Ok(self
            .operations
            .lock()
            .unwrap()
            .iter()
            .filter(|op| op.get_str("ns").is_ok_and(|ns| ns.starts_with(&prefix)))
            .cloned()
            .collect())
    }

    async fn list_indexes(&self, _db: &str, _coll: &str) -> Result<Vec<Document>> {
        self.record("listIndexes")?;
        Ok(vec![doc! { "v": 2, "key": { "_id": 1 }, "name": "_id_" }])
    }

    async fn list_users(&self, db: &str) -> Result<Vec<Document>> {
        self.record("listUsers")?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.get_str("db").is_ok_and(|d| d == db))
            .cloned()
            .collect())
    }
}
