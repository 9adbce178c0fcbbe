use imagine_core::Page;
use imagine_core::entities::{Product, ProductQuery};
use serde::Serialize;

use crate::cli::subcommands::products::ProductListArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::parse::parse_optional_enum;
use crate::context::AppContext;
use crate::output;
use crate::views::{self, ViewState};

pub const COLUMNS: &[&str] = &["id", "title", "category", "status", "images", "created_at"];

#[derive(Serialize)]
struct ProductRow {
    id: String,
    title: String,
    category: String,
    status: String,
    images: usize,
    created_at: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone().unwrap_or_else(|| "Untitled".into()),
            category: product.category.clone().unwrap_or_else(|| "-".into()),
            status: product.status.to_string(),
            images: product.images.len(),
            created_at: product.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub async fn handle(args: &ProductListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let query = ProductQuery {
        page: args.page,
        page_size: Some(ctx.page_size(args.page_size, flags)),
        search: args.search.clone(),
        category: parse_optional_enum(args.category.as_deref(), "category")?,
        status: parse_optional_enum(args.status.as_deref(), "status")?,
    };
    render(ctx, &query, flags).await
}

/// The products screen with default filters.
pub async fn show(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let query = ProductQuery {
        page_size: Some(ctx.page_size(None, flags)),
        ..ProductQuery::default()
    };
    render(ctx, &query, flags).await
}

async fn render(ctx: &AppContext, query: &ProductQuery, flags: &GlobalFlags) -> anyhow::Result<()> {
    let state = views::load("Loading products", ctx.client.list_products(query)).await;
    render_page(state, flags.format)
}

pub fn render_page(state: ViewState<Page<Product>>, format: OutputFormat) -> anyhow::Result<()> {
    let Some(page) = state.into_result()? else {
        output::output_empty("No products found.", format);
        return Ok(());
    };
    if format != OutputFormat::Table {
        return output::output(&page, format);
    }

    let rows = page.items.iter().map(ProductRow::from).collect::<Vec<_>>();
    output::output_rows(&rows, COLUMNS, format)?;
    println!("{}", page_footer(&page));
    Ok(())
}

fn page_footer<T>(page: &Page<T>) -> String {
    let mut footer = format!("page {}/{} · {} total", page.page, page.pages.max(1), page.total);
    if page.has_next() {
        footer.push_str(&format!(" · next: --page {}", page.page + 1));
    }
    footer
}
