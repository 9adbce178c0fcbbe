use clap::{Args, Subcommand};

/// Product catalog commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProductCommands {
    /// List products with optional filters.
    List(ProductListArgs),
    /// Show a product with its image analyses.
    Get(ProductGetArgs),
    /// Create a product without images.
    Create(ProductCreateArgs),
    /// Update title, description or category.
    Update(ProductUpdateArgs),
    /// Delete a product.
    Delete(ProductGetArgs),
    /// Re-run analysis for one image.
    #[command(name = "retry-analysis")]
    RetryAnalysis(RetryAnalysisArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ProductListArgs {
    /// Full-text search over title and description.
    #[arg(long)]
    pub search: Option<String>,
    /// Category filter.
    #[arg(long)]
    pub category: Option<String>,
    /// Status filter (draft, processing, active, archived).
    #[arg(long)]
    pub status: Option<String>,
    /// 1-based page number.
    #[arg(long)]
    pub page: Option<u32>,
    /// Page size (defaults to --limit, then `general.page_size`).
    #[arg(long)]
    pub page_size: Option<u32>,
}

#[derive(Clone, Debug, Args)]
pub struct ProductGetArgs {
    /// Product id.
    pub id: String,
}

#[derive(Clone, Debug, Args)]
pub struct ProductCreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ProductUpdateArgs {
    /// Product id.
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct RetryAnalysisArgs {
    /// Product image id.
    pub image_id: String,
}
