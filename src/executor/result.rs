//! Dispatch result types
//!
//! This module defines what a dispatch hands to the rendering layer:
//! - View: which template to render
//! - Locals: the presentation state passed to the template
//! - ResultBuilder: the only way to assemble Locals during dispatch
//! - Response: a rendered view or a raw JSON document

use mongodb::bson::Document;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use tracing::warn;

use crate::client::CollectionInfo;
use crate::config::Config;
use crate::request::RequestContext;

/// Template rendered for a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Results,
    Collections,
    DbStats,
    ProcessListDb,
    NewCollection,
    DbCommand,
    Export,
    Import,
    Repair,
    DbAuth,
    AddUser,
    DupDb,
    ColStats,
    Validate,
    Indexes,
    CreateIndex,
    Rename,
    DupCollection,
    Insert,
    CollError,
}

impl View {
    /// Template id of the desktop view
    pub fn template_id(&self) -> &'static str {
        match self {
            View::Results => "results",
            View::Collections => "collections",
            View::DbStats => "dbstats",
            View::ProcessListDb => "processlistdb",
            View::NewCollection => "newcollection",
            View::DbCommand => "dbcommand",
            View::Export => "export",
            View::Import => "import",
            View::Repair => "repair",
            View::DbAuth => "dbauth",
            View::AddUser => "adduser",
            View::DupDb => "dupdb",
            View::ColStats => "colstats",
            View::Validate => "validate",
            View::Indexes => "indexes",
            View::CreateIndex => "create-index",
            View::Rename => "rename",
            View::DupCollection => "dupcollection",
            View::Insert => "insert",
            View::CollError => "collerror",
        }
    }

    /// Template id for the given UI mode
    pub fn template(&self, mobile: bool) -> String {
        if mobile {
            format!("mobile/{}", self.template_id())
        } else {
            self.template_id().to_string()
        }
    }
}

/// One sort hint shown in the sort form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortField {
    pub name: String,
    pub order: i32,
}

/// Page links of a result listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginator {
    pub page: u64,
    pub first: u64,
    pub last: u64,
    pub total: u64,
    /// Request url with the page parameter removed, ending in `page=`
    pub url: String,
}

/// Documents of one page, keyed by document id, with their cursor order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub order: Vec<String>,
    pub by_id: Map<String, JsonValue>,
}

impl ResultSet {
    /// Add a document; a later document with the same key replaces the earlier one
    pub fn push(&mut self, id: String, doc: JsonValue) {
        if self.by_id.insert(id.clone(), doc).is_none() {
            self.order.push(id);
        } else {
            warn!("Documents share the key '{}', only the last one is shown", id);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Documents in cursor order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id).map(|doc| (id.as_str(), doc)))
    }
}

/// One row of a distinct-value summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistinctEntry {
    /// Display-safe distinct value
    #[serde(rename = "_id")]
    pub id: JsonValue,
    pub count: i64,
    /// Literal text of the value
    pub val: String,
    /// Criteria text selecting exactly this value
    pub criteria: String,
}

/// Presentation state handed to a template
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Locals {
    pub title: String,
    pub action: String,
    pub op: Option<String>,
    pub byid: Option<String>,
    pub distinct: Option<String>,
    pub err: Option<String>,
    pub scripts: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<CollectionInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_fields: Option<Vec<SortField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paginator: Option<Paginator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distinct_result: Option<Vec<DistinctEntry>>,

    // Database-scope ops
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_stats: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processlist: Option<Vec<JsonValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<JsonValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    // Collection-scope ops
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indexes: Option<Vec<JsonValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<String>,
}

/// Outcome of a dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Render `template` with `locals`
    Render {
        view: View,
        template: String,
        locals: Locals,
    },
    /// Raw document returned as JSON
    Json(Document),
}

impl Response {
    pub fn locals(&self) -> Option<&Locals> {
        match self {
            Response::Render { locals, .. } => Some(locals),
            Response::Json(_) => None,
        }
    }

    pub fn view(&self) -> Option<View> {
        match self {
            Response::Render { view, .. } => Some(*view),
            Response::Json(_) => None,
        }
    }

    /// Serializable form for the command-line harness
    pub fn to_json(&self) -> JsonValue {
        match self {
            Response::Render {
                template, locals, ..
            } => serde_json::json!({
                "view": template,
                "locals": serde_json::to_value(locals).unwrap_or(JsonValue::Null),
            }),
            Response::Json(doc) => crate::formatter::sanitize_document(doc),
        }
    }
}

/// Assembles the locals of one dispatch branch
#[derive(Debug)]
pub struct ResultBuilder {
    view: View,
    mobile: bool,
    locals: Locals,
}

impl ResultBuilder {
    /// Start from the locals every response carries
    pub fn new(ctx: &RequestContext, config: &Config) -> Self {
        let mut scripts = Vec::new();
        if ctx.collection.is_some() {
            scripts.push("/js/search-string.js".to_string());
        }

        Self {
            view: View::Results,
            mobile: ctx.is_mobile(),
            locals: Locals {
                title: config.console.title.clone(),
                action: ctx.action.as_str().to_string(),
                op: ctx.op.clone(),
                byid: ctx.params.byid.clone(),
                distinct: ctx.params.distinct.clone(),
                err: ctx.params.err.clone(),
                scripts,
                ..Default::default()
            },
        }
    }

    pub fn view(&mut self, view: View) -> &mut Self {
        self.view = view;
        self
    }

    pub fn script(&mut self, path: &str) -> &mut Self {
        self.locals.scripts.push(path.to_string());
        self
    }

    pub fn message(&mut self, message: impl Into<String>) -> &mut Self {
        self.locals.message = Some(message.into());
        self
    }

    /// Mutable access to the locals while the branch is running
    pub fn locals_mut(&mut self) -> &mut Locals {
        &mut self.locals
    }

    pub fn build(self) -> Response {
        Response::Render {
            view: self.view,
            template: self.view.template(self.mobile),
            locals: self.locals,
        }
    }
}
