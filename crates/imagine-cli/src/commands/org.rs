use anyhow::Context;
use imagine_core::entities::{InviteMemberRequest, Organization, OrganizationCreate, OrganizationMember};
use imagine_core::enums::OrgRole;
use serde::Serialize;

use crate::cli::subcommands::OrgCommands;
use crate::cli::subcommands::org::{OrgCreateArgs, OrgInviteArgs, OrgRoleArgs};
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::feedback::notify_failure;
use crate::commands::shared::parse::{parse_enum, parse_optional_enum, slugify};
use crate::context::AppContext;
use crate::output;
use crate::views::{self, ViewState, refresh_after};

pub const COLUMNS: &[&str] = &["active", "id", "name", "slug", "plan"];
pub const MEMBER_COLUMNS: &[&str] = &["id", "email", "name", "role", "joined"];

#[derive(Serialize)]
struct OrgRow {
    active: &'static str,
    id: String,
    name: String,
    slug: String,
    plan: String,
}

impl OrgRow {
    fn new(org: &Organization, active_id: Option<&str>) -> Self {
        Self {
            active: if active_id == Some(org.id.as_str()) { "*" } else { "" },
            id: org.id.clone(),
            name: org.name.clone(),
            slug: org.slug.clone(),
            plan: org.plan.to_string(),
        }
    }
}

#[derive(Serialize)]
struct MemberRow {
    id: String,
    email: String,
    name: String,
    role: String,
    joined: String,
}

impl From<&OrganizationMember> for MemberRow {
    fn from(member: &OrganizationMember) -> Self {
        Self {
            id: member.id.clone(),
            email: member
                .user_email
                .clone()
                .unwrap_or_else(|| member.user_id.clone()),
            name: member.user_name.clone().unwrap_or_else(|| "-".into()),
            role: member.role.to_string(),
            joined: member.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Handle `imagine org <subcommand>`.
pub async fn handle(action: &OrgCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require_session("org")?;
    match action {
        OrgCommands::List => list(ctx, flags).await,
        OrgCommands::Select(args) => select(&args.org, ctx, flags).await,
        OrgCommands::Create(args) => create(args, ctx, flags).await,
        OrgCommands::Members => members(ctx, flags).await,
        OrgCommands::Invite(args) => invite(args, ctx, flags).await,
        OrgCommands::Remove(args) => remove(&args.member_id, ctx, flags).await,
        OrgCommands::Role(args) => role(args, ctx, flags).await,
    }
}

/// The organization screen: organizations, then members of the active one.
pub async fn show(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    list(ctx, flags).await?;
    if ctx.client.organizations().active_id().is_none() {
        return Ok(());
    }
    output::heading("Members", flags.format);
    members(ctx, flags).await
}

async fn list(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let state = views::load("Loading organizations", ctx.client.load_organizations()).await;
    render_orgs(ctx, state, flags.format)
}

fn render_orgs(
    ctx: &AppContext,
    state: ViewState<Vec<Organization>>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let Some(orgs) = state.into_result()? else {
        output::output_empty(
            "You are not a member of any organization. Create one with `imagine org create <name>`.",
            format,
        );
        return Ok(());
    };
    if format != OutputFormat::Table {
        return output::output(&orgs, format);
    }
    let active = ctx.client.organizations().active_id();
    let rows = orgs
        .iter()
        .map(|org| OrgRow::new(org, active.as_deref()))
        .collect::<Vec<_>>();
    output::output_rows(&rows, COLUMNS, format)
}

async fn select(key: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let org = ctx
        .client
        .select_organization(key)
        .await
        .with_context(|| format!("org select {key}"))?;
    ctx.client
        .notifier()
        .success(&format!("Switched to {}", org.name));
    output::output(&org, flags.format)
}

async fn create(args: &OrgCreateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    let payload = OrganizationCreate {
        name: args.name.trim().to_string(),
        slug: args.slug.clone().unwrap_or_else(|| slugify(&args.name)),
    };
    match client.create_organization(&payload).await {
        Ok(org) => {
            client.notifier().success("Organization created");
            tracing::debug!(org_id = %org.id, slug = %org.slug, "organization created");
            render_orgs(
                ctx,
                ViewState::from_result(Ok::<_, String>(client.organizations().organizations())),
                flags.format,
            )
        }
        Err(error) => {
            notify_failure(client.notifier(), &error, "Failed to create organization");
            Err(error).context("org create")
        }
    }
}

async fn members(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let org_id = ctx.require_organization("org members").await?;
    let state = views::load("Loading members", ctx.client.list_members(&org_id)).await;
    render_members(state, flags.format)
}

fn render_members(state: ViewState<Vec<OrganizationMember>>, format: OutputFormat) -> anyhow::Result<()> {
    let Some(members) = state.into_result()? else {
        output::output_empty("No members yet.", format);
        return Ok(());
    };
    if format != OutputFormat::Table {
        return output::output(&members, format);
    }
    let rows = members.iter().map(MemberRow::from).collect::<Vec<_>>();
    output::output_rows(&rows, MEMBER_COLUMNS, format)
}

async fn invite(args: &OrgInviteArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let org_id = ctx.require_organization("org invite").await?;
    let client = &ctx.client;
    let payload = InviteMemberRequest {
        email: args.email.trim().to_string(),
        role: parse_optional_enum::<OrgRole>(args.role.as_deref(), "role")?,
    };
    match refresh_after(
        client.notifier(),
        "Member invited",
        client.invite_member(&org_id, &payload),
        || client.list_members(&org_id),
    )
    .await
    {
        Ok((_, list)) => render_members(list, flags.format),
        Err(error) => {
            notify_failure(client.notifier(), &error, "Failed to invite member");
            Err(error).with_context(|| format!("org invite {}", payload.email))
        }
    }
}

async fn remove(member_id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let org_id = ctx.require_organization("org remove").await?;
    let client = &ctx.client;
    let ((), list) = refresh_after(
        client.notifier(),
        "Member removed",
        client.remove_member(&org_id, member_id),
        || client.list_members(&org_id),
    )
    .await
    .with_context(|| format!("org remove {member_id}"))?;
    render_members(list, flags.format)
}

async fn role(args: &OrgRoleArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let org_id = ctx.require_organization("org role").await?;
    let client = &ctx.client;
    let role: OrgRole = parse_enum(&args.role, "role")?;
    let (_, list) = refresh_after(
        client.notifier(),
        "Role updated",
        client.update_member_role(&org_id, &args.member_id, role),
        || client.list_members(&org_id),
    )
    .await
    .with_context(|| format!("org role {} {role}", args.member_id))?;
    render_members(list, flags.format)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn org(id: &str) -> Organization {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": "Acme",
            "slug": "acme",
            "is_active": true,
            "plan": "pro",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn active_organization_is_marked() {
        assert_eq!(OrgRow::new(&org("org-1"), Some("org-1")).active, "*");
        assert_eq!(OrgRow::new(&org("org-2"), Some("org-1")).active, "");
        assert_eq!(OrgRow::new(&org("org-2"), None).plan, "pro");
    }

    #[test]
    fn member_without_profile_falls_back_to_user_id() {
        let member: OrganizationMember = serde_json::from_value(serde_json::json!({
            "id": "m-1",
            "organization_id": "org-1",
            "user_id": "u-9",
            "role": "viewer",
            "created_at": "2025-01-05T08:00:00Z"
        }))
        .unwrap();

        let row = MemberRow::from(&member);
        assert_eq!(row.email, "u-9");
        assert_eq!(row.name, "-");
        assert_eq!(row.joined, "2025-01-05");
    }
}
