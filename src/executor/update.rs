//! Write actions: update-many and remove-many

use mongodb::bson::Document;
use tracing::{info, warn};

use super::fields::SortSpec;
use super::require_collection;
use super::result::{ResultBuilder, Response};
use crate::error::{ConsoleError, Result};
use crate::parser::{DEFAULT_CRITERIA, DEFAULT_UPDATE, LiteralEvaluator};
use crate::request::RequestContext;

impl super::Dispatcher {
    /// Apply the update operators to every matching document.
    ///
    /// Without criteria the filter is empty and every document in the
    /// collection is updated.
    pub(super) async fn update(
        &self,
        ctx: &RequestContext,
        mut builder: ResultBuilder,
    ) -> Result<Response> {
        let coll = require_collection(ctx)?;
        let update_text = ctx.params.update.as_deref().filter(|u| !u.trim().is_empty());

        builder.locals_mut().update = Some(update_text.unwrap_or(DEFAULT_UPDATE).to_string());

        let Some(update_text) = update_text else {
            return Err(ConsoleError::Precondition(
                "Invalid update operators".to_string(),
            ));
        };
        let update = LiteralEvaluator::evaluate_update(update_text)?;

        let filter = match ctx.params.criteria_text() {
            Some(_) => self.resolve_query(ctx, &mut builder)?,
            None => {
                warn!("Update on '{}' without criteria targets every document", coll);
                builder.locals_mut().criteria = Some(DEFAULT_CRITERIA.to_string());
                Document::new()
            }
        };

        let outcome = self
            .client
            .update_many(&ctx.database, coll, filter, update)
            .await?;
        info!(
            "Updated '{}': matched {}, modified {}",
            coll, outcome.matched, outcome.modified
        );

        builder.message(self.config.messages.rows_affected(outcome.modified));

        let sort = SortSpec::resolve(&ctx.params.sort, self.config.console.sort_slots)?;
        {
            let locals = builder.locals_mut();
            locals.fields = Some(ctx.params.fields.clone());
            locals.sort_fields = Some(sort.display);
        }
        self.probe_native_fields(ctx, coll, &mut builder).await?;

        Ok(builder.build())
    }

    /// Delete every document matching the criteria.
    ///
    /// Without criteria nothing is deleted and nothing is queried.
    pub(super) async fn remove(
        &self,
        ctx: &RequestContext,
        builder: ResultBuilder,
    ) -> Result<Response> {
        if ctx.params.criteria_text().is_none() {
            return Ok(builder.build());
        }

        let coll = require_collection(ctx)?;
        let mut builder = builder;
        let filter = self.resolve_query(ctx, &mut builder)?;
        let mut builder = self.with_collections(ctx, builder).await?;

        let deleted = self.client.delete_many(&ctx.database, coll, filter).await?;
        info!("Removed {} documents from '{}'", deleted, coll);

        builder.message(format!("{deleted} records affected"));
        Ok(builder.build())
    }
}
