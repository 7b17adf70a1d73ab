//! Request dispatch for the console
//!
//! This module turns one [`RequestContext`] into a [`Response`]:
//! - Action routing (find, findById, update, remove, distinct, explain)
//! - Database-scope and collection-scope op handlers
//! - Find path with projection, sort and pagination
//! - Distinct-value summaries
//!
//! The dispatcher never renders anything; it only assembles locals.

mod collection;
mod database;
mod distinct;
mod explain;
mod fields;
mod find;
mod pagination;
mod result;
mod update;


pub use fields::{SortSpec, parse_direction, projection};
pub use pagination::{page_link_prefix, parse_page};
pub use result::{
    DistinctEntry, Locals, Paginator, ResultBuilder, ResultSet, Response, SortField, View,
};

use std::sync::Arc;

use mongodb::bson::Document;
use tracing::{Instrument, debug, info_span};

use crate::client::DatabaseClient;
use crate::config::Config;
use crate::error::{ConsoleError, Result};
use crate::formatter::{BsonJsonConverter, DisplayConverter};
use crate::parser::{DEFAULT_CRITERIA, LiteralEvaluator};
use crate::request::{Action, RequestContext};

/// Dispatches console requests against a database client
#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn DatabaseClient>,
    config: Arc<Config>,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn DatabaseClient>, config: Config) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process one request
    pub async fn process(&self, ctx: &RequestContext) -> Result<Response> {
        let span = info_span!(
            "dispatch",
            request_id = %ctx.request_id,
            db = %ctx.database,
            collection = ctx.collection.as_deref().unwrap_or(""),
            action = %ctx.action,
        );

        async {
            debug!("Processing request with op {:?}", ctx.op);
            let builder = ResultBuilder::new(ctx, &self.config);

            match ctx.action {
                Action::Explain => self.explain(ctx).await,
                Action::Remove => self.remove(ctx, builder).await,
                Action::Update => {
                    let builder = self.with_collections(ctx, builder).await?;
                    self.update(ctx, builder).await
                }
                Action::Distinct => {
                    let builder = self.with_collections(ctx, builder).await?;
                    self.distinct(ctx, builder).await
                }
                Action::Find | Action::FindById => {
                    let mut builder = self.with_collections(ctx, builder).await?;

                    match (&ctx.collection, &ctx.op) {
                        (None, _) if ctx.is_mobile() => {
                            builder.view(View::Collections);
                            Ok(builder.build())
                        }
                        (None, op) => {
                            self.database_op(ctx, op.as_deref().unwrap_or("stats"), builder)
                                .await
                        }
                        (Some(coll), Some(op)) => {
                            self.collection_op(ctx, coll, op, builder).await
                        }
                        (Some(coll), None) => self.find(ctx, coll, builder).await,
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Attach the collection list of the selected database
    async fn with_collections(
        &self,
        ctx: &RequestContext,
        mut builder: ResultBuilder,
    ) -> Result<ResultBuilder> {
        let collections = self.client.list_collections(&ctx.database).await?;
        debug!("Database '{}' has {} collections", ctx.database, collections.len());
        builder.locals_mut().collections = Some(collections);
        Ok(builder)
    }

    /// Evaluate the request's query and record the criteria shown to the user
    fn resolve_query(&self, ctx: &RequestContext, builder: &mut ResultBuilder) -> Result<Document> {
        builder.locals_mut().criteria = Some(
            ctx.params
                .criteria_text()
                .unwrap_or(DEFAULT_CRITERIA)
                .to_string(),
        );

        if ctx.action == Action::FindById {
            let id = ctx.params.byid.as_deref().unwrap_or_default();
            return Ok(LiteralEvaluator::query_by_id(id)?);
        }

        Ok(LiteralEvaluator::evaluate_query(ctx.params.criteria_text())?)
    }

    /// Field names of the first document, shown as projection hints.
    /// An empty collection leaves the hints unset.
    async fn probe_native_fields(
        &self,
        ctx: &RequestContext,
        coll: &str,
        builder: &mut ResultBuilder,
    ) -> Result<()> {
        let first = self
            .client
            .find_one(&ctx.database, coll, Document::new())
            .await?;

        if let Some(doc) = first {
            builder.locals_mut().native_fields =
                Some(doc.keys().map(|k| DisplayConverter.convert_key(k)).collect());
        }
        Ok(())
    }
}

fn require_collection(ctx: &RequestContext) -> Result<&str> {
    ctx.collection.as_deref().ok_or_else(|| {
        ConsoleError::Precondition(format!(
            "Action '{}' requires a collection",
            ctx.action
        ))
    })
}
