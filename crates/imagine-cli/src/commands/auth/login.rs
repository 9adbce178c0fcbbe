use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::commands::shared::feedback::notify_failure;
use crate::commands::shared::prompt::resolve_password;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    user_id: String,
    email: String,
    full_name: Option<String>,
    organization: Option<String>,
    expires_at: Option<String>,
}

pub async fn handle(args: &AuthLoginArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let password = resolve_password(args.password.as_deref())?;
    let client = &ctx.client;

    let user = match client.login(&args.email, &password).await {
        Ok(user) => user,
        Err(error) => {
            notify_failure(client.notifier(), &error, "Login failed");
            return Err(anyhow::Error::new(error).context("auth login"));
        }
    };
    client.notifier().success("Welcome back!");

    output(
        &AuthLoginResponse {
            authenticated: true,
            user_id: user.id,
            email: user.email,
            full_name: user.full_name,
            organization: client.organizations().active().map(|org| org.slug),
            expires_at: client.session().token_expiry().map(|at| at.to_rfc3339()),
        },
        flags.format,
    )
}
