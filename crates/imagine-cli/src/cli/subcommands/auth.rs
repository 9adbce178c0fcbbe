use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Log in with email and password.
    Login(AuthLoginArgs),
    /// Create an account.
    Register(AuthRegisterArgs),
    /// Clear stored credentials and the organization selection.
    Logout,
    /// Show current auth status.
    Status,
    /// Exchange the refresh token for a new token pair.
    Refresh,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// Account email.
    pub email: String,
    /// Password. Read from `IMAGINE_PASSWORD` or stdin when omitted.
    #[arg(long, env = "IMAGINE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AuthRegisterArgs {
    /// Account email.
    pub email: String,
    /// Password. Read from `IMAGINE_PASSWORD` or stdin when omitted.
    #[arg(long, env = "IMAGINE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// Display name.
    #[arg(long)]
    pub full_name: Option<String>,
}
