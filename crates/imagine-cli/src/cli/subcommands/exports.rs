use clap::{Args, Subcommand};

/// Data export commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ExportCommands {
    /// List exports.
    List,
    /// Request a new export.
    Create(ExportCreateArgs),
    /// Show one export and its download link when ready.
    Get(ExportIdArgs),
    /// Delete an export.
    Delete(ExportIdArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ExportCreateArgs {
    /// analysis_csv, analysis_pdf or products_csv.
    pub export_type: String,
    /// RFC 3339 lower bound on creation time.
    #[arg(long)]
    pub date_from: Option<String>,
    /// RFC 3339 upper bound on creation time.
    #[arg(long)]
    pub date_to: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    /// Restrict to these products (repeatable).
    #[arg(long = "product")]
    pub product_ids: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ExportIdArgs {
    /// Export id.
    pub id: String,
}
