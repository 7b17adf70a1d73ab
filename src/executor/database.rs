//! Database-scope ops (no collection selected)

use mongodb::bson::Bson;
use tracing::debug;

use super::result::{ResultBuilder, Response, View};
use crate::error::{ConsoleError, Result};
use crate::formatter::{BsonJsonConverter, DisplayConverter, sanitize_document};
use crate::request::{DatabaseOp, RequestContext};

impl super::Dispatcher {
    /// Run a database-scope op. Unknown ops are an error at this scope.
    pub(super) async fn database_op(
        &self,
        ctx: &RequestContext,
        op: &str,
        mut builder: ResultBuilder,
    ) -> Result<Response> {
        let db = ctx.database.as_str();
        let params = &ctx.params;
        debug!("Executing database op '{}' on '{}'", op, db);

        match DatabaseOp::parse(op) {
            DatabaseOp::Stats => {
                builder.view(View::DbStats);
                let mut stats = self.client.db_stats(db).await?;
                if stats.get("ok").is_some_and(is_one) {
                    stats.insert("ok", "✓");
                }
                builder.locals_mut().db_stats = Some(sanitize_document(&stats));
            }
            DatabaseOp::ProcessList => {
                builder.view(View::ProcessListDb);
                let ops = self.client.current_op(&format!("^{db}\\.")).await?;
                builder.locals_mut().processlist =
                    Some(ops.iter().map(sanitize_document).collect());
            }
            DatabaseOp::NewCollection => {
                builder.view(View::NewCollection);
            }
            DatabaseOp::Command => {
                builder.view(View::DbCommand);
            }
            DatabaseOp::Export => {
                builder.view(View::Export).script("/js/export.js");
                builder.locals_mut().selected = Some(params.collections.clone());
            }
            DatabaseOp::Import => {
                builder.view(View::Import);
                builder.locals_mut().msg = params.msg.clone();
            }
            DatabaseOp::Repair => {
                builder.view(View::Repair);
            }
            DatabaseOp::Auth => {
                builder.view(View::DbAuth).script("/js/auth.js");
                let users = self.client.list_users(db).await?;
                builder.locals_mut().users = Some(
                    users
                        .iter()
                        .map(|u| DisplayConverter.convert_document(u))
                        .collect(),
                );
            }
            DatabaseOp::AddUser => {
                builder.view(View::AddUser);
                let locals = builder.locals_mut();
                locals.err = params.err.clone();
                locals.username = params.username.clone();
            }
            DatabaseOp::Dup => {
                builder.view(View::DupDb);
                let locals = builder.locals_mut();
                locals.err = params.err.clone();
                locals.name = params.name.clone();
            }
            DatabaseOp::Unrecognized(op) => return Err(ConsoleError::OpNotDefined(op)),
        }

        Ok(builder.build())
    }
}

fn is_one(value: &Bson) -> bool {
    match value {
        Bson::Int32(n) => *n == 1,
        Bson::Int64(n) => *n == 1,
        Bson::Double(n) => *n == 1.0,
        _ => false,
    }
}
