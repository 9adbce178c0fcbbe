//! `imagine open <path>`: render the screen a dashboard path points at.

use crate::cli::GlobalFlags;
use crate::commands::{analysis, dashboard, experiments, exports, org, products, webhooks};
use crate::context::AppContext;
use crate::routes::Route;

pub async fn handle(path: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let route = Route::guard(path, ctx.client.session().is_authenticated());
    if Route::resolve(path).as_ref() != Some(&route) {
        ctx.client.notifier().info(&format!("→ {route}"));
    }
    tracing::debug!(path, %route, "opening screen");

    match route {
        Route::Dashboard => dashboard::handle(ctx, flags).await,
        Route::Products => products::show_products(ctx, flags).await,
        Route::Product(id) => products::show_product(&id, ctx, flags).await,
        Route::Analysis(image_id) => analysis::handle(&image_id, ctx, flags).await,
        Route::Exports => exports::show(ctx, flags).await,
        Route::Webhooks => webhooks::show(ctx, flags).await,
        Route::Organization => org::show(ctx, flags).await,
        Route::AbTesting => experiments::show(ctx, flags).await,
        Route::Upload => {
            println!("Upload images with: imagine upload --title <title> <files>...");
            Ok(())
        }
        Route::Login => {
            println!("Sign in with: imagine auth login <email>");
            Ok(())
        }
        Route::Register => {
            println!("Create an account with: imagine auth register <email>");
            Ok(())
        }
    }
}
