//! Organization and membership endpoints.

use imagine_core::entities::{
    InviteMemberRequest, Organization, OrganizationCreate, OrganizationMember,
    UpdateMemberRoleRequest,
};
use imagine_core::enums::OrgRole;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::request::{ApiRequest, segment};

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_organizations(&self) -> Result<Vec<Organization>, ClientError> {
        self.fetch(ApiRequest::get("/organizations/")).await
    }

    /// Fetch organizations into the context, auto-selecting one if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or the selection cannot
    /// be persisted.
    pub async fn load_organizations(&self) -> Result<Vec<Organization>, ClientError> {
        let orgs = self.list_organizations().await?;
        self.organizations().load(orgs.clone())?;
        Ok(orgs)
    }

    /// Select by id or slug, loading the list first if it is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Auth`] if nothing matches `key`.
    pub async fn select_organization(&self, key: &str) -> Result<Organization, ClientError> {
        if self.organizations().organizations().is_empty() {
            self.load_organizations().await?;
        }
        Ok(self.organizations().select_by_key(key)?)
    }

    /// Create an organization, then reload the list.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the create fails. A failed reload is only
    /// logged.
    pub async fn create_organization(
        &self,
        payload: &OrganizationCreate,
    ) -> Result<Organization, ClientError> {
        if payload.name.trim().is_empty() || payload.slug.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "organization name and slug are required".into(),
            ));
        }
        let org: Organization = self
            .fetch(ApiRequest::post("/organizations/").json(payload)?)
            .await?;
        if let Err(error) = self.load_organizations().await {
            tracing::warn!(%error, "organization reload after create failed");
        }
        Ok(org)
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn list_members(&self, org_id: &str) -> Result<Vec<OrganizationMember>, ClientError> {
        self.fetch(ApiRequest::get(format!(
            "/organizations/{}/members",
            segment(org_id)
        )))
        .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn invite_member(
        &self,
        org_id: &str,
        payload: &InviteMemberRequest,
    ) -> Result<OrganizationMember, ClientError> {
        if !payload.email.contains('@') {
            return Err(ClientError::InvalidRequest(format!(
                "'{}' is not an email address",
                payload.email
            )));
        }
        self.fetch(
            ApiRequest::post(format!("/organizations/{}/members", segment(org_id)))
                .json(payload)?,
        )
        .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn remove_member(&self, org_id: &str, member_id: &str) -> Result<(), ClientError> {
        self.send(ApiRequest::delete(format!(
            "/organizations/{}/members/{}",
            segment(org_id),
            segment(member_id)
        )))
        .await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn update_member_role(
        &self,
        org_id: &str,
        member_id: &str,
        role: OrgRole,
    ) -> Result<OrganizationMember, ClientError> {
        self.fetch(
            ApiRequest::patch(format!(
                "/organizations/{}/members/{}",
                segment(org_id),
                segment(member_id)
            ))
            .json(&UpdateMemberRoleRequest { role })?,
        )
        .await
    }
}
