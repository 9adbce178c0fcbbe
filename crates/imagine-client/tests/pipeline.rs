//! Request pipeline behaviour against the mock API.

mod support;

use std::sync::Arc;

use imagine_auth::{ACCESS_TOKEN_KEY, CredentialStore, MemoryStore, ORGANIZATION_KEY, OrganizationContext, REFRESH_TOKEN_KEY, SessionStore};
use imagine_client::{ApiClient, ClientError, MemoryNotifier, NETWORK_ERROR_MESSAGE, SERVER_ERROR_MESSAGE};
use imagine_config::ApiConfig;
use imagine_core::entities::{ExportFilter, ExportRequest, ProductQuery, UserCreate};
use imagine_core::enums::ExportType;
use pretty_assertions::assert_eq;
use support::Harness;

#[tokio::test]
async fn login_and_register_never_carry_a_token() {
    let h = Harness::with_token("stale-token").await;

    h.client
        .register(&UserCreate {
            email: "new@example.com".into(),
            password: "hunter22".into(),
            full_name: None,
        })
        .await
        .unwrap();
    h.client.login("owner@example.com", "pw").await.unwrap();

    for path in ["/api/v1/auth/login", "/api/v1/auth/register"] {
        let seen = h.state().requests_to(path);
        assert_eq!(seen.len(), 1, "{path}");
        assert_eq!(seen[0].authorization, None, "{path}");
        assert_eq!(seen[0].organization, None, "{path}");
    }
}

#[tokio::test]
async fn login_bootstraps_user_and_organization() {
    let h = Harness::with_token("stale-token").await;

    let user = h.client.login("owner@example.com", "pw").await.unwrap();

    assert_eq!(user.email, "owner@example.com");
    assert_eq!(h.client.session().user().map(|u| u.id), Some("u-1".into()));
    assert_eq!(h.client.organizations().active_id().as_deref(), Some("org-1"));
    assert_eq!(h.store.get(ACCESS_TOKEN_KEY).as_deref(), Some("access-1"));
    assert_eq!(h.store.get(ORGANIZATION_KEY).as_deref(), Some("org-1"));
}

#[tokio::test]
async fn scoped_requests_carry_bearer_and_organization() {
    let h = Harness::with_token("access-1").await;
    h.client.load_organizations().await.unwrap();
    h.client.select_organization("globex").await.unwrap();

    h.client.list_products(&ProductQuery::default()).await.unwrap();

    let seen = h.state().requests_to("/api/v1/products");
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer access-1"));
    assert_eq!(seen[0].organization.as_deref(), Some("org-2"));
}

#[tokio::test]
async fn organization_switch_applies_to_the_next_request_only() {
    let h = Harness::with_token("access-1").await;
    h.client.load_organizations().await.unwrap();

    h.client.select_organization("org-2").await.unwrap();
    h.client.list_products(&ProductQuery::default()).await.unwrap();
    h.client.select_organization("acme").await.unwrap();
    h.client.list_products(&ProductQuery::default()).await.unwrap();

    let orgs: Vec<_> = h
        .state()
        .requests_to("/api/v1/products")
        .into_iter()
        .map(|r| r.organization)
        .collect();
    assert_eq!(orgs, vec![Some("org-2".to_string()), Some("org-1".to_string())]);
    assert_eq!(h.store.get(ORGANIZATION_KEY).as_deref(), Some("org-1"));
}

#[tokio::test]
async fn expired_token_refreshes_once_and_retries_once() {
    let h = Harness::with_token("expired").await;

    h.client.list_products(&ProductQuery::default()).await.unwrap();

    assert_eq!(h.state().refresh_count(), 1);
    let auths: Vec<_> = h
        .state()
        .requests_to("/api/v1/products")
        .into_iter()
        .map(|r| r.authorization)
        .collect();
    assert_eq!(
        auths,
        vec![Some("Bearer expired".to_string()), Some("Bearer access-2".to_string())]
    );
    assert_eq!(h.store.get(ACCESS_TOKEN_KEY).as_deref(), Some("access-2"));
    assert_eq!(h.store.get(REFRESH_TOKEN_KEY).as_deref(), Some("refresh-2"));
}

#[tokio::test]
async fn second_unauthorized_is_propagated_without_another_refresh() {
    let h = Harness::with_token("access-1").await;

    let err = h.client.dashboard_stats().await.unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized), "{err:?}");
    assert_eq!(h.state().refresh_count(), 1);
    assert_eq!(h.state().requests_to("/api/v1/dashboard/stats").len(), 2);
    assert!(h.client.session().is_authenticated());
}

#[tokio::test]
async fn failed_refresh_invalidates_the_session() {
    let h = Harness::with_token("expired").await;
    h.store.set(ORGANIZATION_KEY, "org-1").unwrap();
    h.state()
        .refresh_succeeds
        .store(false, std::sync::atomic::Ordering::SeqCst);

    let err = h
        .client
        .list_products(&ProductQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::SessionExpired), "{err:?}");
    assert_eq!(err.status(), Some(401));
    assert_eq!(h.state().refresh_count(), 1);
    assert_eq!(h.state().requests_to("/api/v1/products").len(), 1);
    assert!(!h.client.session().is_authenticated());
    assert!(h.client.session().login_required());
    assert!(h.client.session().user().is_none());
    for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, ORGANIZATION_KEY] {
        assert!(h.store.get(key).is_none(), "{key} should be cleared");
    }
}

#[tokio::test]
async fn concurrent_unauthorized_requests_share_one_refresh() {
    let h = Harness::with_token("expired").await;
    let query = ProductQuery::default();

    let (a, b, c) = tokio::join!(
        h.client.list_products(&query),
        h.client.list_products(&query),
        h.client.list_products(&query),
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(h.state().refresh_count(), 1);
    let retried = h
        .state()
        .requests_to("/api/v1/products")
        .into_iter()
        .filter(|r| r.authorization.as_deref() == Some("Bearer access-2"))
        .count();
    assert_eq!(retried, 3);
}

#[tokio::test]
async fn rate_limit_notification_uses_retry_after() {
    let h = Harness::with_token("access-1").await;

    let err = h.client.recent_activity().await.unwrap_err();
    assert!(matches!(err, ClientError::RateLimited { retry_after_secs: 30 }));
    let err = h.client.category_distribution().await.unwrap_err();
    assert!(matches!(err, ClientError::RateLimited { retry_after_secs: 60 }));

    assert_eq!(
        h.notifier.messages(),
        vec![
            "Rate limit exceeded. Please try again in 30 seconds.".to_string(),
            "Rate limit exceeded. Please try again in 60 seconds.".to_string(),
        ]
    );
    assert_eq!(h.state().requests_to("/api/v1/dashboard/recent").len(), 1);
}

#[tokio::test]
async fn validation_detail_string_is_shown_verbatim() {
    let h = Harness::with_token("access-1").await;

    let err = h.client.login("bad@example.com", "pw").await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::Validation { detail: Some(ref d) } if d == "Invalid email"
    ));
    assert_eq!(h.notifier.messages(), vec!["Invalid email".to_string()]);
}

#[tokio::test]
async fn structured_validation_detail_is_not_shown() {
    let h = Harness::with_token("access-1").await;

    let err = h
        .client
        .create_export(&ExportRequest {
            export_type: ExportType::ProductsCsv,
            filters: ExportFilter::default(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation { detail: None }));
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test]
async fn server_error_notifies_generic_message() {
    let h = Harness::with_token("access-1").await;

    let err = h.client.list_webhooks().await.unwrap_err();

    assert!(matches!(err, ClientError::Server { status: 500 }));
    assert_eq!(h.notifier.messages(), vec![SERVER_ERROR_MESSAGE.to_string()]);
}

#[tokio::test]
async fn unreachable_server_notifies_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let client = ApiClient::new(
        ApiConfig {
            base_url: format!("http://{addr}/api/v1"),
            timeout_secs: 5,
            ..ApiConfig::default()
        },
        Arc::new(SessionStore::new(Arc::clone(&store))),
        Arc::new(OrganizationContext::new(store)),
        notifier.clone(),
    )
    .unwrap();

    let err = client.dashboard_stats().await.unwrap_err();

    assert!(matches!(err, ClientError::Network(_)), "{err:?}");
    assert_eq!(notifier.messages(), vec![NETWORK_ERROR_MESSAGE.to_string()]);
}

#[tokio::test]
async fn local_validation_happens_before_any_request() {
    let h = Harness::with_token("access-1").await;

    let err = h
        .client
        .create_product(&imagine_core::entities::ProductCreate {
            title: " ".into(),
            description: None,
            category: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidRequest(_)));
    assert!(h.state().requests.lock().unwrap().is_empty());
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test]
async fn invalid_user_agent_fails_client_construction() {
    let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::default());
    let result = ApiClient::new(
        ApiConfig {
            user_agent: "imagine\ncli".into(),
            ..ApiConfig::default()
        },
        Arc::new(SessionStore::new(Arc::clone(&store))),
        Arc::new(OrganizationContext::new(store)),
        Arc::new(MemoryNotifier::default()),
    );

    let err = result.err().expect("client built with a newline in its user agent");
    assert!(matches!(err, ClientError::Build(_)), "{err:?}");
}
