//! The active-organization context.
//!
//! Exactly one organization is active once the list is loaded and non-empty.
//! The selection is persisted so it survives restarts.

use std::sync::{Arc, PoisonError, RwLock};

use imagine_core::entities::Organization;

use crate::credential_store::{CredentialStore, ORGANIZATION_KEY};
use crate::error::AuthError;

#[derive(Debug, Default)]
struct OrgState {
    organizations: Vec<Organization>,
    active: Option<Organization>,
    active_id: Option<String>,
}

pub struct OrganizationContext {
    store: Arc<dyn CredentialStore>,
    state: RwLock<OrgState>,
}

impl OrganizationContext {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            state: RwLock::new(OrgState::default()),
        }
    }

    /// Context seeded with the persisted organization id, if any.
    #[must_use]
    pub fn restore(store: Arc<dyn CredentialStore>) -> Self {
        let active_id = store.get(ORGANIZATION_KEY);
        Self {
            store,
            state: RwLock::new(OrgState {
                active_id,
                ..OrgState::default()
            }),
        }
    }

    /// Replace the known organizations.
    ///
    /// If nothing is active yet, the persisted selection is bound when it is
    /// in the list; otherwise the first organization is selected.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::CredentialStore` if an automatic selection cannot
    /// be persisted.
    pub fn load(&self, organizations: Vec<Organization>) -> Result<Option<Organization>, AuthError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        let keep = state
            .active
            .as_ref()
            .and_then(|active| organizations.iter().find(|o| o.id == active.id))
            .or_else(|| {
                state
                    .active_id
                    .as_deref()
                    .and_then(|id| organizations.iter().find(|o| o.id == id))
            })
            .cloned();

        let active = match keep {
            Some(org) => Some(org),
            None => match organizations.first() {
                Some(first) => {
                    self.store.set(ORGANIZATION_KEY, &first.id)?;
                    tracing::info!(org = %first.slug, "organization auto-selected");
                    Some(first.clone())
                }
                None => None,
            },
        };

        if let Some(org) = &active {
            state.active_id = Some(org.id.clone());
        }
        state.active.clone_from(&active);
        state.organizations = organizations;
        Ok(active)
    }

    /// Make `org` the active organization. The selection is persisted before
    /// returning so the next request carries the new id.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::CredentialStore` if the selection cannot be persisted.
    pub fn select(&self, org: Organization) -> Result<(), AuthError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.store.set(ORGANIZATION_KEY, &org.id)?;
        tracing::info!(org = %org.slug, "organization selected");
        state.active_id = Some(org.id.clone());
        state.active = Some(org);
        Ok(())
    }

    /// Select a loaded organization by id or slug.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnknownOrganization` if no loaded organization
    /// matches, or `AuthError::CredentialStore` if persisting fails.
    pub fn select_by_key(&self, key: &str) -> Result<Organization, AuthError> {
        let org = self
            .organizations()
            .into_iter()
            .find(|o| o.id == key || o.slug == key)
            .ok_or_else(|| AuthError::UnknownOrganization(key.to_string()))?;
        self.select(org.clone())?;
        Ok(org)
    }

    #[must_use]
    pub fn active(&self) -> Option<Organization> {
        self.read(|s| s.active.clone())
    }

    /// Id sent as `X-Organization-ID`. Available before the list is loaded
    /// when a selection was restored from storage.
    #[must_use]
    pub fn active_id(&self) -> Option<String> {
        self.read(|s| s.active_id.clone())
    }

    #[must_use]
    pub fn organizations(&self) -> Vec<Organization> {
        self.read(|s| s.organizations.clone())
    }

    /// Forget the selection and the loaded list.
    pub fn clear(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = self.store.remove(ORGANIZATION_KEY) {
            tracing::warn!(%error, "failed to clear stored organization");
        }
        *state = OrgState::default();
    }

    fn read<T>(&self, f: impl FnOnce(&OrgState) -> T) -> T {
        f(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl std::fmt::Debug for OrganizationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrganizationContext")
            .field("active_id", &self.active_id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use imagine_core::enums::OrgPlan;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::credential_store::MemoryStore;

    fn org(id: &str, slug: &str) -> Organization {
        Organization {
            id: id.into(),
            name: slug.to_uppercase(),
            slug: slug.into(),
            is_active: true,
            plan: OrgPlan::Free,
            settings: serde_json::Map::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn load_selects_first_when_nothing_active() {
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::default());
        let ctx = OrganizationContext::new(Arc::clone(&store));

        let active = ctx.load(vec![org("o-1", "acme"), org("o-2", "globex")]).unwrap();

        assert_eq!(active.map(|o| o.id), Some("o-1".to_string()));
        assert_eq!(store.get(ORGANIZATION_KEY).as_deref(), Some("o-1"));
    }

    #[test]
    fn load_binds_persisted_selection() {
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::default());
        store.set(ORGANIZATION_KEY, "o-2").unwrap();
        let ctx = OrganizationContext::restore(Arc::clone(&store));
        assert_eq!(ctx.active_id().as_deref(), Some("o-2"));

        let active = ctx.load(vec![org("o-1", "acme"), org("o-2", "globex")]).unwrap();
        assert_eq!(active.map(|o| o.slug), Some("globex".to_string()));
    }

    #[test]
    fn load_falls_back_when_persisted_id_is_gone() {
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::default());
        store.set(ORGANIZATION_KEY, "o-deleted").unwrap();
        let ctx = OrganizationContext::restore(Arc::clone(&store));

        ctx.load(vec![org("o-1", "acme")]).unwrap();
        assert_eq!(ctx.active_id().as_deref(), Some("o-1"));
        assert_eq!(store.get(ORGANIZATION_KEY).as_deref(), Some("o-1"));
    }

    #[test]
    fn load_empty_list_leaves_nothing_active() {
        let ctx = OrganizationContext::new(Arc::new(MemoryStore::default()));
        assert!(ctx.load(Vec::new()).unwrap().is_none());
        assert!(ctx.active().is_none());
    }

    #[test]
    fn select_by_slug_persists_immediately() {
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::default());
        let ctx = OrganizationContext::new(Arc::clone(&store));
        ctx.load(vec![org("o-1", "acme"), org("o-2", "globex")]).unwrap();

        let chosen = ctx.select_by_key("globex").unwrap();
        assert_eq!(chosen.id, "o-2");
        assert_eq!(ctx.active_id().as_deref(), Some("o-2"));
        assert_eq!(store.get(ORGANIZATION_KEY).as_deref(), Some("o-2"));

        let err = ctx.select_by_key("initech").unwrap_err();
        assert!(matches!(err, AuthError::UnknownOrganization(_)));
    }

    #[test]
    fn clear_forgets_selection() {
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::default());
        let ctx = OrganizationContext::new(Arc::clone(&store));
        ctx.load(vec![org("o-1", "acme")]).unwrap();
        ctx.clear();
        assert!(ctx.active_id().is_none());
        assert!(ctx.organizations().is_empty());
        assert!(store.get(ORGANIZATION_KEY).is_none());
    }
}
