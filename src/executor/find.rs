//! Find path: one page of a collection listing

use tracing::{debug, info};

use super::fields::{SortSpec, projection};
use super::pagination::{parse_page, skip_for};
use super::result::{Paginator, ResultBuilder, ResultSet, Response};
use crate::client::FindSpec;
use crate::error::Result;
use crate::formatter::{document_key, sanitize_document};
use crate::parser::DEFAULT_UPDATE;
use crate::request::{Action, RequestContext};

impl super::Dispatcher {
    /// List one page of `coll` matching the request's criteria
    pub(super) async fn find(
        &self,
        ctx: &RequestContext,
        coll: &str,
        mut builder: ResultBuilder,
    ) -> Result<Response> {
        let console = &self.config.console;
        let messages = &self.config.messages;

        let fields = ctx.params.fields.clone();
        let sort = SortSpec::resolve(&ctx.params.sort, console.sort_slots)?;
        let page = parse_page(ctx.params.page.as_deref());

        {
            let locals = builder.locals_mut();
            locals.fields = Some(fields.clone());
            locals.sort_fields = Some(sort.display.clone());
            locals.update = Some(
                ctx.params
                    .update
                    .clone()
                    .unwrap_or_else(|| DEFAULT_UPDATE.to_string()),
            );
            locals.page = Some(page);
        }

        let filter = self.resolve_query(ctx, &mut builder)?;
        self.probe_native_fields(ctx, coll, &mut builder).await?;

        let count = self.client.count(&ctx.database, coll, filter.clone()).await?;
        if count == 0 {
            debug!("No documents in '{}' match {:?}", coll, filter);
            builder.message(messages.no_records_found.clone());
            return Ok(builder.build());
        }

        let paginator = Paginator::new(
            page,
            count,
            console.page_size,
            console.page_window,
            &ctx.url,
        );

        if ctx.action != Action::FindById {
            builder.message(messages.results(count));
        }

        let spec = FindSpec {
            projection: projection(&fields),
            sort: Some(sort.sort),
            skip: skip_for(page, console.page_size),
            limit: Some(console.page_size as i64),
        };
        let docs = self.client.find(&ctx.database, coll, filter, spec).await?;

        let mut result = ResultSet::default();
        for doc in &docs {
            result.push(document_key(doc), sanitize_document(doc));
        }
        if result.is_empty() {
            debug!("Page {} of '{}' is past the last document", page, coll);
        }
        info!(
            "Listed {} of {} documents from '{}' (page {})",
            result.len(),
            count,
            coll,
            page
        );

        let locals = builder.locals_mut();
        locals.paginator = Some(paginator);
        locals.count = Some(count);
        locals.result = Some(result);

        Ok(builder.build())
    }
}
