use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    api: String,
    credential_backend: &'static str,
    organization_id: Option<String>,
    expires_at: Option<String>,
    expired: Option<bool>,
    has_refresh_token: bool,
    note: Option<String>,
}

/// Local view of the stored session; no request is made.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let session = ctx.client.session();
    let expires_at = session.token_expiry();
    let authenticated = session.is_authenticated();

    let note = if !authenticated {
        Some("no stored token — run `imagine auth login`".to_string())
    } else if session.access_token().is_some() && expires_at.is_none() {
        Some("access token expiry could not be read".to_string())
    } else {
        None
    };

    output(
        &AuthStatusResponse {
            authenticated,
            api: ctx.client.base_url().to_string(),
            credential_backend: session.backend_name(),
            organization_id: ctx.client.organizations().active_id(),
            expires_at: expires_at.map(|at| at.to_rfc3339()),
            expired: expires_at.map(|at| at <= chrono::Utc::now()),
            has_refresh_token: session.refresh_token().is_some(),
            note,
        },
        flags.format,
    )
}
