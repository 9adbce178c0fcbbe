use anyhow::Context;
use imagine_core::entities::{ProductCreate, ProductQuery, ProductUpdate};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::products::{ProductCreateArgs, ProductUpdateArgs};
use crate::commands::shared::feedback::notify_failure;
use crate::commands::shared::parse::parse_optional_enum;
use crate::context::AppContext;
use crate::output::output;
use crate::views::refresh_after;

use super::list::render_page;

pub async fn create(args: &ProductCreateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let payload = ProductCreate {
        title: args.title.clone(),
        description: args.description.clone(),
        category: parse_optional_enum(args.category.as_deref(), "category")?,
    };
    match ctx.client.create_product(&payload).await {
        Ok(product) => {
            ctx.client.notifier().success("Product created");
            output(&product, flags.format)
        }
        Err(error) => {
            notify_failure(ctx.client.notifier(), &error, "Failed to create product");
            Err(error).context("products create")
        }
    }
}

pub async fn update(args: &ProductUpdateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let payload = ProductUpdate {
        title: args.title.clone(),
        description: args.description.clone(),
        category: parse_optional_enum(args.category.as_deref(), "category")?,
    };
    let product = ctx
        .client
        .update_product(&args.id, &payload)
        .await
        .with_context(|| format!("products update {}", args.id))?;
    ctx.client.notifier().success("Product updated");
    output(&product, flags.format)
}

/// Delete, then show the refreshed first page.
pub async fn delete(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    let query = ProductQuery {
        page_size: Some(ctx.page_size(None, flags)),
        ..ProductQuery::default()
    };
    let ((), page) = refresh_after(
        client.notifier(),
        "Product deleted",
        client.delete_product(id),
        || client.list_products(&query),
    )
    .await
    .with_context(|| format!("products delete {id}"))?;
    render_page(page, flags.format)
}

pub async fn retry_analysis(image_id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match ctx.client.retry_analysis(image_id).await {
        Ok(response) => {
            ctx.client.notifier().success("Analysis retry started");
            output(&response, flags.format)
        }
        Err(error) => {
            notify_failure(ctx.client.notifier(), &error, "Failed to retry analysis");
            Err(error).with_context(|| format!("retry analysis for image {image_id}"))
        }
    }
}
