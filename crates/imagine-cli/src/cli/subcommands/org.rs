use clap::{Args, Subcommand};

/// Organization commands.
#[derive(Clone, Debug, Subcommand)]
pub enum OrgCommands {
    /// List organizations you belong to; the active one is marked.
    List,
    /// Make an organization active for subsequent commands.
    Select(OrgSelectArgs),
    /// Create an organization.
    Create(OrgCreateArgs),
    /// List members of the active organization.
    Members,
    /// Invite a user to the active organization.
    Invite(OrgInviteArgs),
    /// Remove a member from the active organization.
    Remove(OrgMemberArgs),
    /// Change a member's role.
    Role(OrgRoleArgs),
}

#[derive(Clone, Debug, Args)]
pub struct OrgSelectArgs {
    /// Organization id or slug.
    pub org: String,
}

#[derive(Clone, Debug, Args)]
pub struct OrgCreateArgs {
    pub name: String,
    /// URL slug. Derived from the name when omitted.
    #[arg(long)]
    pub slug: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct OrgInviteArgs {
    /// Email address to invite.
    pub email: String,
    /// Role to assign (owner, admin, member, viewer).
    #[arg(long)]
    pub role: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct OrgMemberArgs {
    /// Membership id.
    pub member_id: String,
}

#[derive(Clone, Debug, Args)]
pub struct OrgRoleArgs {
    /// Membership id.
    pub member_id: String,
    /// New role.
    pub role: String,
}
