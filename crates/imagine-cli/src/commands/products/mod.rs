mod detail;
mod list;
mod write;

pub use detail::show as show_product;
pub use list::show as show_products;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProductCommands;
use crate::context::AppContext;

/// Handle `imagine products <subcommand>`.
pub async fn handle(
    action: &ProductCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    ctx.require_session("products")?;
    match action {
        ProductCommands::List(args) => list::handle(args, ctx, flags).await,
        ProductCommands::Get(args) => detail::show(&args.id, ctx, flags).await,
        ProductCommands::Create(args) => write::create(args, ctx, flags).await,
        ProductCommands::Update(args) => write::update(args, ctx, flags).await,
        ProductCommands::Delete(args) => write::delete(&args.id, ctx, flags).await,
        ProductCommands::RetryAnalysis(args) => write::retry_analysis(&args.image_id, ctx, flags).await,
    }
}
