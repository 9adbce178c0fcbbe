//! Typed resource calls against the mock API.

mod support;

use imagine_client::ClientError;
use imagine_core::entities::{
    AbExperimentCreate, AbExperimentUpdate, AbVariantCreate, BatchCreateRequest,
    InviteMemberRequest, JobQuery, PresignedUrlRequest, ProductCreate, ProductQuery,
    RateLimitConfigCreate, RateLimitConfigUpdate, WebhookCreate, WebhookUpdate,
};
use imagine_core::enums::{
    AnalysisStatus, ExportStatus, JobStatus, JobType, OrgRole, ProductCategory, ProductStatus,
    WebhookEvent,
};
use pretty_assertions::assert_eq;
use support::Harness;

const BEARER: &str = "Bearer access-1";

fn methods(h: &Harness, path: &str) -> Vec<String> {
    h.state()
        .requests_to(path)
        .into_iter()
        .map(|r| r.method)
        .collect()
}

#[tokio::test]
async fn product_create_then_get_round_trips() {
    let h = Harness::with_token("access-1").await;
    h.client.load_organizations().await.unwrap();

    let created = h
        .client
        .create_product(&ProductCreate {
            title: "Leather boot".into(),
            description: Some("Brown, ankle height".into()),
            category: Some(ProductCategory::Footwear),
        })
        .await
        .unwrap();
    let fetched = h.client.get_product(&created.id).await.unwrap();

    assert_eq!(fetched.title.as_deref(), Some("Leather boot"));
    assert_eq!(fetched.description.as_deref(), Some("Brown, ankle height"));
    assert_eq!(fetched.category.as_deref(), Some("footwear"));
    assert_eq!(fetched.status, ProductStatus::Draft);
    assert_eq!(fetched.organization_id, "org-1");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn missing_product_is_not_found() {
    let h = Harness::with_token("access-1").await;

    let err = h.client.get_product("p-404").await.unwrap_err();

    assert!(err.is_not_found());
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test]
async fn product_list_decodes_page() {
    let h = Harness::with_token("access-1").await;
    h.client
        .create_product(&ProductCreate {
            title: "Desk lamp".into(),
            description: None,
            category: None,
        })
        .await
        .unwrap();

    let page = h
        .client
        .list_products(&ProductQuery::default())
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title.as_deref(), Some("Desk lamp"));
}

#[tokio::test]
async fn logout_clears_session_and_selection() {
    let h = Harness::with_token("access-1").await;
    h.client.load_organizations().await.unwrap();

    h.client.logout();

    assert!(!h.client.session().is_authenticated());
    assert!(h.client.organizations().active().is_none());
    assert!(h.client.organizations().active_id().is_none());
}

#[tokio::test]
async fn presigned_upload_flow() {
    let h = Harness::with_token("access-1").await;

    let presigned = h
        .client
        .presigned_url(&PresignedUrlRequest {
            product_id: "p-1".into(),
            filename: "boot.jpg".into(),
            content_type: "image/jpeg".into(),
            file_size_bytes: 4,
        })
        .await
        .unwrap();
    assert_eq!(presigned.image_id, "img-1");
    assert_eq!(presigned.s3_key, "uploads/p-1/boot.jpg");

    h.client
        .upload_to_presigned_url(&presigned.upload_url, "image/jpeg", vec![1, 2, 3, 4])
        .await
        .unwrap();
    let confirmed = h.client.confirm_upload(&presigned.image_id).await.unwrap();
    assert_eq!(confirmed.job_id, "job-confirm");
    assert_eq!(confirmed.image_id, "img-1");

    let requested = h.state().single_request_to("/api/v1/uploads/presigned-url");
    assert_eq!(requested.method, "POST");
    assert_eq!(requested.authorization.as_deref(), Some(BEARER));

    // Object storage gets the bytes without API credentials.
    let put = h.state().single_request_to("/storage/img-1");
    assert_eq!(put.method, "PUT");
    assert_eq!(put.content_type.as_deref(), Some("image/jpeg"));
    assert!(put.authorization.is_none());

    assert_eq!(methods(&h, "/api/v1/uploads/confirm"), vec!["POST"]);
}

#[tokio::test]
async fn direct_upload_is_multipart_with_product_query() {
    let h = Harness::with_token("access-1").await;

    let uploaded = h
        .client
        .direct_upload("p-1", "boot.png", "image/png", vec![0; 16])
        .await
        .unwrap();

    assert_eq!(uploaded.job_id, "job-direct");
    assert_eq!(uploaded.message.as_deref(), Some("file:boot.png:16"));
    let request = h.state().single_request_to("/api/v1/uploads/direct");
    assert_eq!(request.method, "POST");
    assert_eq!(request.query.as_deref(), Some("product_id=p-1"));
    assert!(
        request
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("multipart/form-data")),
        "{request:?}"
    );
}

#[tokio::test]
async fn non_image_upload_never_reaches_the_server() {
    let h = Harness::with_token("access-1").await;

    let err = h
        .client
        .direct_upload("p-1", "manual.pdf", "application/pdf", vec![1])
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidRequest(_)), "{err:?}");
    assert!(h.state().requests_to("/api/v1/uploads/direct").is_empty());
}

#[tokio::test]
async fn analysis_get_and_retry() {
    let h = Harness::with_token("access-1").await;

    let analysis = h.client.get_analysis("img-1").await.unwrap();
    assert_eq!(analysis.product_image_id, "img-1");
    assert_eq!(analysis.status, AnalysisStatus::Completed);
    assert_eq!(analysis.extracted_attributes[0].attribute_value, "brown");

    let retried = h.client.retry_analysis("img-1").await.unwrap();
    assert_eq!(retried.job_id, "job-retry-img-1");

    assert_eq!(methods(&h, "/api/v1/analysis/img-1"), vec!["GET"]);
    assert_eq!(methods(&h, "/api/v1/analysis/img-1/retry"), vec!["POST"]);
}

#[tokio::test]
async fn batch_create_and_status() {
    let h = Harness::with_token("access-1").await;

    let job = h
        .client
        .create_batch(&BatchCreateRequest {
            product_id: "p-1".into(),
            image_ids: vec!["img-1".into(), "img-2".into()],
        })
        .await
        .unwrap();
    assert_eq!(job.job_type, JobType::Batch);
    assert_eq!(job.total_images, 2);

    let status = h.client.batch_status(&job.id).await.unwrap();
    assert_eq!(status.id, "job-batch");

    assert_eq!(methods(&h, "/api/v1/batch"), vec!["POST"]);
    assert_eq!(methods(&h, "/api/v1/batch/job-batch"), vec!["GET"]);
}

#[tokio::test]
async fn empty_batch_is_rejected_locally() {
    let h = Harness::with_token("access-1").await;

    let err = h
        .client
        .create_batch(&BatchCreateRequest {
            product_id: "p-1".into(),
            image_ids: Vec::new(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidRequest(_)), "{err:?}");
    assert!(h.state().requests_to("/api/v1/batch").is_empty());
}

#[tokio::test]
async fn job_listing_sends_filters_as_query() {
    let h = Harness::with_token("access-1").await;

    let jobs = h
        .client
        .list_jobs(&JobQuery {
            page: Some(2),
            page_size: Some(5),
            status: Some(JobStatus::Failed),
            job_type: Some(JobType::Batch),
        })
        .await
        .unwrap();
    h.client.list_jobs(&JobQuery::default()).await.unwrap();
    let job = h.client.get_job("job-7").await.unwrap();

    assert_eq!(jobs.total, 2);
    assert_eq!(jobs.items[0].id, "job-1");
    assert_eq!(job.id, "job-7");

    let queries = h
        .state()
        .requests_to("/api/v1/jobs")
        .into_iter()
        .map(|r| r.query)
        .collect::<Vec<_>>();
    assert_eq!(
        queries,
        vec![Some("page=2&page_size=5&status=failed&job_type=batch".to_string()), None]
    );
    assert_eq!(methods(&h, "/api/v1/jobs/job-7"), vec!["GET"]);
}

#[tokio::test]
async fn webhook_lifecycle_paths() {
    let h = Harness::with_token("access-1").await;

    let hook = h
        .client
        .create_webhook(&WebhookCreate {
            url: "https://hooks.example.com/in".into(),
            events: vec![WebhookEvent::JobCompleted, WebhookEvent::BatchCompleted],
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(hook.events, vec!["job.completed", "batch.completed"]);
    assert_eq!(hook.secret.as_deref(), Some("whsec_test"));

    let paused = h
        .client
        .update_webhook(
            &hook.id,
            &WebhookUpdate {
                is_active: Some(false),
                ..WebhookUpdate::default()
            },
        )
        .await
        .unwrap();
    assert!(!paused.is_active);

    let ack = h.client.test_webhook(&hook.id).await.unwrap();
    assert_eq!(ack.get("webhook_id"), Some(&serde_json::json!("wh-1")));

    let deliveries = h.client.webhook_deliveries(&hook.id).await.unwrap();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].response_status, Some(200));
    assert!(deliveries[0].success);

    h.client.delete_webhook(&hook.id).await.unwrap();

    assert_eq!(methods(&h, "/api/v1/webhooks/"), vec!["POST"]);
    assert_eq!(methods(&h, "/api/v1/webhooks/wh-1"), vec!["PATCH", "DELETE"]);
    assert_eq!(methods(&h, "/api/v1/webhooks/wh-1/test"), vec!["POST"]);
    assert_eq!(methods(&h, "/api/v1/webhooks/wh-1/deliveries"), vec!["GET"]);
}

#[tokio::test]
async fn webhook_with_bad_url_is_rejected_locally() {
    let h = Harness::with_token("access-1").await;

    let err = h
        .client
        .create_webhook(&WebhookCreate {
            url: "ftp://hooks.example.com".into(),
            events: vec![WebhookEvent::JobFailed],
            description: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidRequest(_)), "{err:?}");
    assert!(h.state().requests_to("/api/v1/webhooks/").is_empty());
}

#[tokio::test]
async fn export_get_and_delete() {
    let h = Harness::with_token("access-1").await;

    let export = h.client.get_export("e-1").await.unwrap();
    assert_eq!(export.status, ExportStatus::Completed);
    assert_eq!(export.ready_download(), Some("https://files.example.com/e-1.csv"));
    assert_eq!(export.row_count, Some(12));

    h.client.delete_export("e-1").await.unwrap();

    assert_eq!(methods(&h, "/api/v1/exports/e-1"), vec!["GET", "DELETE"]);
}

#[tokio::test]
async fn experiment_crud_and_results() {
    let h = Harness::with_token("access-1").await;
    let base = "/api/v1/admin/ab-testing/experiments";

    let listed = h.client.list_experiments().await.unwrap();
    assert_eq!(listed.len(), 1);

    let variant = |version: &str, is_control: bool| AbVariantCreate {
        model_version: version.into(),
        weight: 50,
        is_control,
    };
    let created = h
        .client
        .create_experiment(&AbExperimentCreate {
            name: "captioner-v3".into(),
            model_type: "description".into(),
            variants: vec![variant("3.0", true), variant("3.1", false)],
        })
        .await
        .unwrap();
    assert_eq!(created.name, "captioner-v3");
    assert_eq!(created.variants.len(), 2);

    let stopped = h
        .client
        .update_experiment("exp-1", &AbExperimentUpdate { is_active: Some(false) })
        .await
        .unwrap();
    assert!(!stopped.is_active);

    let results = h.client.experiment_results("exp-1").await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].avg_processing_time_ms, None);

    h.client.delete_experiment("exp-1").await.unwrap();

    assert_eq!(methods(&h, base), vec!["GET", "POST"]);
    assert_eq!(methods(&h, &format!("{base}/exp-1")), vec!["PATCH", "DELETE"]);
    assert_eq!(methods(&h, &format!("{base}/exp-1/results")), vec!["GET"]);
}

#[tokio::test]
async fn rate_limit_crud() {
    let h = Harness::with_token("access-1").await;

    let listed = h.client.list_rate_limits().await.unwrap();
    assert_eq!(listed[0].endpoint_pattern, "*");

    let created = h
        .client
        .create_rate_limit(&RateLimitConfigCreate {
            endpoint_pattern: "/uploads/*".into(),
            requests_per_minute: 10,
            requests_per_hour: 100,
        })
        .await
        .unwrap();
    assert_eq!(created.endpoint_pattern, "/uploads/*");
    assert_eq!(created.requests_per_hour, 100);

    let updated = h
        .client
        .update_rate_limit(
            &created.id,
            &RateLimitConfigUpdate {
                requests_per_minute: Some(30),
                ..RateLimitConfigUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.requests_per_minute, 30);

    h.client.delete_rate_limit(&created.id).await.unwrap();

    assert_eq!(methods(&h, "/api/v1/admin/rate-limits/"), vec!["GET", "POST"]);
    assert_eq!(methods(&h, "/api/v1/admin/rate-limits/rl-2"), vec!["PATCH", "DELETE"]);
}

#[tokio::test]
async fn zero_rate_limit_is_rejected_locally() {
    let h = Harness::with_token("access-1").await;

    let err = h
        .client
        .create_rate_limit(&RateLimitConfigCreate {
            requests_per_minute: 0,
            ..RateLimitConfigCreate::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidRequest(_)), "{err:?}");
    assert!(h.state().requests_to("/api/v1/admin/rate-limits/").is_empty());
}

#[tokio::test]
async fn member_management_paths() {
    let h = Harness::with_token("access-1").await;
    let members_path = "/api/v1/organizations/org-1/members";

    let members = h.client.list_members("org-1").await.unwrap();
    assert_eq!(members[0].role, OrgRole::Owner);

    let invited = h
        .client
        .invite_member(
            "org-1",
            &InviteMemberRequest {
                email: "new@example.com".into(),
                role: Some(OrgRole::Admin),
            },
        )
        .await
        .unwrap();
    assert_eq!(invited.role, OrgRole::Admin);
    assert_eq!(invited.user_email.as_deref(), Some("new@example.com"));

    let demoted = h
        .client
        .update_member_role("org-1", &invited.id, OrgRole::Viewer)
        .await
        .unwrap();
    assert_eq!(demoted.role, OrgRole::Viewer);

    h.client.remove_member("org-1", &invited.id).await.unwrap();

    assert_eq!(methods(&h, members_path), vec!["GET", "POST"]);
    assert_eq!(methods(&h, &format!("{members_path}/m-2")), vec!["PATCH", "DELETE"]);
}

#[tokio::test]
async fn invite_without_email_address_is_rejected_locally() {
    let h = Harness::with_token("access-1").await;

    let err = h
        .client
        .invite_member(
            "org-1",
            &InviteMemberRequest {
                email: "not-an-address".into(),
                role: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidRequest(_)), "{err:?}");
    assert!(
        h.state()
            .requests_to("/api/v1/organizations/org-1/members")
            .is_empty()
    );
}
