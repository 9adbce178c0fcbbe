use clap::{Args, Subcommand};

/// Rate-limit configuration commands.
#[derive(Clone, Debug, Subcommand)]
pub enum RateLimitCommands {
    /// List rate-limit rules.
    List,
    /// Add a rule.
    Create(RateLimitCreateArgs),
    /// Change limits or activation.
    Update(RateLimitUpdateArgs),
    /// Delete a rule.
    Delete(RateLimitIdArgs),
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitCreateArgs {
    /// Endpoint glob, `*` for all.
    #[arg(long, default_value = "*")]
    pub endpoint: String,
    #[arg(long, default_value_t = 60)]
    pub per_minute: u32,
    #[arg(long, default_value_t = 1000)]
    pub per_hour: u32,
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitUpdateArgs {
    /// Rule id.
    pub id: String,
    #[arg(long)]
    pub per_minute: Option<u32>,
    #[arg(long)]
    pub per_hour: Option<u32>,
    /// true or false.
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitIdArgs {
    /// Rule id.
    pub id: String,
}
