use imagine_core::entities::{AnalysisResult, Product};
use serde::Serialize;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::analysis::AnalysisRow;
use crate::context::AppContext;
use crate::output::{self, heading};
use crate::views::{self, ViewState, format_file_size};

#[derive(Serialize)]
struct ProductDetail {
    product: Product,
    analyses: Vec<AnalysisResult>,
}

#[derive(Serialize)]
struct ProductSummary {
    id: String,
    title: String,
    status: String,
    category: String,
    description: String,
    ai_description: String,
    updated_at: String,
}

#[derive(Serialize)]
struct ImageRow {
    id: String,
    file: String,
    size: String,
    dimensions: String,
    primary: bool,
    upload_status: String,
}

/// Product, then its analyses. A failed analysis load leaves the product
/// view in place.
pub async fn show(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    let Some(product) = views::load_record("Loading product", client.get_product(id))
        .await
        .into_result()?
    else {
        return Ok(());
    };

    let analyses = match ViewState::from_result(client.product_analysis(id).await) {
        ViewState::Loaded(analyses) => analyses,
        ViewState::Error(error) => {
            tracing::warn!(%error, product_id = id, "product analyses unavailable");
            Vec::new()
        }
        ViewState::Empty | ViewState::Loading => Vec::new(),
    };

    if flags.format != OutputFormat::Table {
        return output::output(&ProductDetail { product, analyses }, flags.format);
    }

    output::output(&summary(&product), flags.format)?;
    if !product.images.is_empty() {
        heading("Images", flags.format);
        let rows = product.images.iter().map(image_row).collect::<Vec<_>>();
        output::output_rows(
            &rows,
            &["id", "file", "size", "dimensions", "primary", "upload_status"],
            flags.format,
        )?;
    }
    heading("Analyses", flags.format);
    if analyses.is_empty() {
        output::output_empty("No analyses yet.", flags.format);
    } else {
        let rows = analyses.iter().map(AnalysisRow::from).collect::<Vec<_>>();
        output::output_rows(&rows, AnalysisRow::COLUMNS, flags.format)?;
    }
    Ok(())
}

fn summary(product: &Product) -> ProductSummary {
    let text = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".into());
    ProductSummary {
        id: product.id.clone(),
        title: product.title.clone().unwrap_or_else(|| "Untitled".into()),
        status: product.status.to_string(),
        category: text(&product.category),
        description: text(&product.description),
        ai_description: text(&product.ai_description),
        updated_at: product.updated_at.to_rfc3339(),
    }
}

fn image_row(image: &imagine_core::entities::ProductImage) -> ImageRow {
    ImageRow {
        id: image.id.clone(),
        file: image.original_filename.clone().unwrap_or_else(|| "-".into()),
        size: image.file_size_bytes.map_or_else(|| "-".into(), format_file_size),
        dimensions: match (image.width, image.height) {
            (Some(w), Some(h)) => format!("{w}x{h}"),
            _ => "-".into(),
        },
        primary: image.is_primary,
        upload_status: image.upload_status.to_string(),
    }
}
