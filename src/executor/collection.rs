//! Collection-scope ops

use tracing::debug;

use super::result::{ResultBuilder, Response, View};
use crate::error::Result;
use crate::formatter::{BsonJsonConverter, DisplayConverter, sanitize_document};
use crate::request::{CollectionOp, RequestContext};

/// Body shown in an empty insert form
const DEFAULT_INSERT_JSON: &str = "{\n\n\n\n\n\n\n\n\n\n\n}";

impl super::Dispatcher {
    /// Run a collection-scope op. Unknown ops fall through to the plain
    /// results view.
    pub(super) async fn collection_op(
        &self,
        ctx: &RequestContext,
        coll: &str,
        op: &str,
        mut builder: ResultBuilder,
    ) -> Result<Response> {
        let db = ctx.database.as_str();
        let params = &ctx.params;
        debug!("Executing collection op '{}' on '{}.{}'", op, db, coll);

        match CollectionOp::parse(op) {
            CollectionOp::Stats => {
                builder.view(View::ColStats);
                let stats = self.client.collection_stats(db, coll).await?;
                let top = self.client.top(db, coll).await?;
                let locals = builder.locals_mut();
                locals.stats = Some(sanitize_document(&stats));
                locals.top = top.as_ref().map(sanitize_document);
            }
            CollectionOp::Validate => {
                builder.view(View::Validate);
                let report = self.client.validate(db, coll).await?;
                builder.locals_mut().validate = Some(sanitize_document(&report));
            }
            CollectionOp::Indexes => {
                builder.view(View::Indexes);
                let indexes = self.client.list_indexes(db, coll).await?;
                builder.locals_mut().indexes = Some(
                    indexes
                        .iter()
                        .map(|i| DisplayConverter.convert_document(i))
                        .collect(),
                );
                builder.script("/js/indexes.js");
            }
            CollectionOp::CreateIndex => {
                builder.view(View::CreateIndex).script("/js/create-index.js");
            }
            CollectionOp::Rename => {
                builder.view(View::Rename);
            }
            CollectionOp::Dup => {
                builder.view(View::DupCollection);
                builder.locals_mut().err = params.err.clone();
            }
            CollectionOp::Insert => {
                builder.view(View::Insert);
                let locals = builder.locals_mut();
                locals.json = Some(
                    params
                        .json
                        .clone()
                        .filter(|j| !j.is_empty())
                        .unwrap_or_else(|| DEFAULT_INSERT_JSON.to_string()),
                );
                locals.msg = match params.msg.as_deref() {
                    Some("parseError") => Some("Invalid json".to_string()),
                    Some("ok") => Some("Object successfully inserted".to_string()),
                    other => other.map(str::to_string),
                };
            }
            CollectionOp::Import => {
                builder.view(View::Import);
            }
            CollectionOp::Error => {
                builder.view(View::CollError);
                builder.locals_mut().message = params.msg.clone();
            }
            CollectionOp::Unrecognized(op) => {
                debug!("Unrecognized collection op '{}', showing results view", op);
            }
        }

        Ok(builder.build())
    }
}
