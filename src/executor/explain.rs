//! Explain action

use mongodb::bson::doc;
use tracing::debug;

use super::require_collection;
use super::result::Response;
use crate::error::Result;
use crate::parser::LiteralEvaluator;
use crate::request::RequestContext;

impl super::Dispatcher {
    /// Query plan of a find with the request's criteria, returned as raw JSON.
    /// Invalid criteria yields `{error: "Invalid query"}` rather than an error.
    pub(super) async fn explain(&self, ctx: &RequestContext) -> Result<Response> {
        let coll = require_collection(ctx)?;

        let filter = match LiteralEvaluator::evaluate_query(ctx.params.criteria_text()) {
            Ok(filter) => filter,
            Err(e) => {
                debug!("Explain rejected criteria: {}", e);
                return Ok(Response::Json(doc! { "error": "Invalid query" }));
            }
        };

        let plan = self.client.explain_find(&ctx.database, coll, filter).await?;
        Ok(Response::Json(plan))
    }
}
