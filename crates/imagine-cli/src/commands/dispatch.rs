use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => commands::auth::handle(&action, ctx, flags).await,
        Commands::Dashboard => commands::dashboard::handle(ctx, flags).await,
        Commands::Products { action } => commands::products::handle(&action, ctx, flags).await,
        Commands::Upload(args) => commands::upload::handle(&args, ctx, flags).await,
        Commands::Analysis(args) => commands::analysis::handle(&args.image_id, ctx, flags).await,
        Commands::Jobs { action } => commands::jobs::handle(&action, ctx, flags).await,
        Commands::Batch { action } => commands::batch::handle(&action, ctx, flags).await,
        Commands::Exports { action } => commands::exports::handle(&action, ctx, flags).await,
        Commands::Webhooks { action } => commands::webhooks::handle(&action, ctx, flags).await,
        Commands::Org { action } => commands::org::handle(&action, ctx, flags).await,
        Commands::AbTesting { action } => commands::experiments::handle(&action, ctx, flags).await,
        Commands::RateLimits { action } => commands::rate_limits::handle(&action, ctx, flags).await,
        Commands::Open(args) => commands::open::handle(&args.path, ctx, flags).await,
    }
}
