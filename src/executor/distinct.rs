//! Distinct-value summary of one field

use mongodb::bson::{Bson, doc};
use tracing::debug;

use super::require_collection;
use super::result::{DistinctEntry, ResultBuilder, Response};
use crate::error::Result;
use crate::formatter::{BsonJsonConverter, DisplayConverter, to_literal};
use crate::request::RequestContext;

impl super::Dispatcher {
    /// Count documents per distinct value of the `distinct` field.
    /// A blank field name is a no-op.
    pub(super) async fn distinct(
        &self,
        ctx: &RequestContext,
        mut builder: ResultBuilder,
    ) -> Result<Response> {
        let field = ctx.params.distinct.as_deref().unwrap_or_default().trim();
        if field.is_empty() {
            return Ok(builder.build());
        }

        let coll = require_collection(ctx)?;
        let filter = self.resolve_query(ctx, &mut builder)?;

        let pipeline = vec![
            doc! { "$match": filter },
            doc! { "$group": { "_id": format!("${field}"), "count": { "$sum": 1 } } },
        ];
        let groups = self.client.aggregate(&ctx.database, coll, pipeline).await?;
        debug!("Distinct '{}' on '{}' produced {} groups", field, coll, groups.len());

        if groups.is_empty() {
            builder.message(self.config.messages.no_records_found.clone());
            return Ok(builder.build());
        }

        let quoted_field = serde_json::Value::String(field.to_string()).to_string();
        let mut entries: Vec<DistinctEntry> = groups
            .iter()
            .map(|group| {
                let id = group.get("_id").cloned().unwrap_or(Bson::Null);
                let val = to_literal(&id);
                DistinctEntry {
                    id: DisplayConverter.convert_to_json(&id),
                    count: group_count(group.get("count")),
                    criteria: format!("{{{quoted_field}:{val}}}"),
                    val,
                }
            })
            .collect();

        // stable: ties keep aggregation order
        entries.sort_by(|a, b| b.count.cmp(&a.count));

        let n = entries.len() as u64;
        let locals = builder.locals_mut();
        locals.distinct_result = Some(entries);
        locals.count = Some(n);
        builder.message(self.config.messages.results(n));

        Ok(builder.build())
    }
}

fn group_count(value: Option<&Bson>) -> i64 {
    match value {
        Some(Bson::Int32(n)) => *n as i64,
        Some(Bson::Int64(n)) => *n,
        Some(Bson::Double(n)) => *n as i64,
        _ => 0,
    }
}
