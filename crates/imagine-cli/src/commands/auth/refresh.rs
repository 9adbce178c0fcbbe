use anyhow::Context;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct RefreshResponse {
    refreshed: bool,
    expires_at: Option<String>,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require_session("auth refresh")?;
    ctx.client
        .refresh_session()
        .await
        .context("token refresh failed")?;

    output(
        &RefreshResponse {
            refreshed: true,
            expires_at: ctx.client.session().token_expiry().map(|at| at.to_rfc3339()),
        },
        flags.format,
    )
}
