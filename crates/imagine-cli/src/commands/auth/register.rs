use imagine_core::entities::UserCreate;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthRegisterArgs;
use crate::commands::shared::feedback::notify_failure;
use crate::commands::shared::prompt::resolve_password;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    args: &AuthRegisterArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let password = resolve_password(args.password.as_deref())?;
    let payload = UserCreate {
        email: args.email.clone(),
        password,
        full_name: args.full_name.clone(),
    };

    match ctx.client.register(&payload).await {
        Ok(user) => {
            ctx.client
                .notifier()
                .success("Account created! Please sign in with `imagine auth login`.");
            output(&user, flags.format)
        }
        Err(error) => {
            notify_failure(ctx.client.notifier(), &error, "Registration failed");
            Err(anyhow::Error::new(error).context("auth register"))
        }
    }
}
