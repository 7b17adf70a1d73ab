//! Per-request input for the dispatcher
//!
//! A [`RequestContext`] is built once by the routing layer and never mutated
//! during dispatch.

mod ops;
mod params;

pub use ops::{Action, CollectionOp, DatabaseOp};
pub use params::RequestParams;

use uuid::Uuid;

/// Presentation flavour requested by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    #[default]
    Desktop,
    Mobile,
}

/// Immutable bundle describing one console request
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation id used in tracing spans
    pub request_id: Uuid,
    pub database: String,
    pub collection: Option<String>,
    pub action: Action,
    pub op: Option<String>,
    pub ui_mode: UiMode,
    /// Request url, used to build pagination links
    pub url: String,
    pub params: RequestParams,
}

impl RequestContext {
    /// Build a context from routing data and query parameters.
    ///
    /// A database-scope desktop request without an op is a `stats` request.
    pub fn new(
        database: impl Into<String>,
        collection: Option<String>,
        ui_mode: UiMode,
        params: RequestParams,
    ) -> Self {
        let collection = collection.filter(|c| !c.is_empty());
        let action = Action::parse(params.action.as_deref());

        let mut op = params.op.clone().filter(|o| !o.is_empty());
        if collection.is_none() && op.is_none() && ui_mode != UiMode::Mobile {
            op = Some("stats".to_string());
        }

        Self {
            request_id: Uuid::new_v4(),
            database: database.into(),
            collection,
            action,
            op,
            ui_mode,
            url: String::new(),
            params,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn is_mobile(&self) -> bool {
        self.ui_mode == UiMode::Mobile
    }
}
