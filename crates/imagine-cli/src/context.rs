use std::sync::Arc;

use anyhow::Context;
use imagine_auth::{OrganizationContext, SessionStore};
use imagine_client::{ApiClient, Notifier};
use imagine_config::ImagineConfig;

use crate::cli::GlobalFlags;
use crate::notifier::TerminalNotifier;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: ImagineConfig,
    pub client: ApiClient,
}

impl AppContext {
    /// Open the credential store, restore the persisted session and
    /// organization, and build the API client around them.
    pub fn init(config: ImagineConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let store = imagine_auth::open_store(&config.storage)
            .context("failed to open credential store")?;
        let session = Arc::new(SessionStore::restore(Arc::clone(&store)));
        let organizations = Arc::new(OrganizationContext::restore(store));
        let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);

        tracing::debug!(
            base_url = %config.api.base_url(),
            backend = session.backend_name(),
            authenticated = session.is_authenticated(),
            verbose = flags.verbose,
            "application context ready"
        );

        let client = ApiClient::new(config.api.clone(), session, organizations, notifier)
            .context("failed to build API client")?;
        Ok(Self { config, client })
    }

    /// Honour `--org` before the command runs.
    pub async fn apply_organization_override(&self, flags: &GlobalFlags) -> anyhow::Result<()> {
        let Some(key) = flags.org.as_deref() else {
            return Ok(());
        };
        if !self.client.session().is_authenticated() {
            return Ok(());
        }
        let org = self
            .client
            .select_organization(key)
            .await
            .with_context(|| format!("failed to select organization '{key}'"))?;
        tracing::debug!(org_id = %org.id, slug = %org.slug, "organization selected from --org");
        Ok(())
    }

    /// Fail early when a guarded command runs without a session.
    pub fn require_session(&self, command: &str) -> anyhow::Result<()> {
        if self.client.session().is_authenticated() {
            return Ok(());
        }
        anyhow::bail!("{command} requires authentication — run `imagine auth login`")
    }

    /// Active organization id, loading the organization list if none is
    /// selected yet.
    pub async fn require_organization(&self, command: &str) -> anyhow::Result<String> {
        self.require_session(command)?;
        if let Some(id) = self.client.organizations().active_id() {
            return Ok(id);
        }
        self.client
            .load_organizations()
            .await
            .context("failed to load organizations")?;
        self.client.organizations().active_id().ok_or_else(|| {
            anyhow::anyhow!(
                "{command} requires an active organization — run `imagine org create <name>`"
            )
        })
    }

    /// Page size with precedence: explicit arg, then `--limit`, then config.
    #[must_use]
    pub fn page_size(&self, explicit: Option<u32>, flags: &GlobalFlags) -> u32 {
        explicit
            .or(flags.limit)
            .unwrap_or(self.config.general.page_size)
    }
}
