use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct LogoutResponse {
    logged_out: bool,
    backend: &'static str,
}

pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let had_session = ctx.client.session().is_authenticated();
    ctx.client.logout();
    tracing::info!(had_session, "credentials cleared");

    output(
        &LogoutResponse {
            logged_out: true,
            backend: ctx.client.session().backend_name(),
        },
        flags.format,
    )
}
