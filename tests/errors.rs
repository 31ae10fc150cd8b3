//! Error classification, cancellation and deadlines.

mod common;

use common::{ctx, management, profile, transport};
use idm_management::transport::InMemoryTransport;
use idm_management::{ManagementError, RequestOptions, SerializationStage, TransportError};
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_transport_failure_is_not_an_api_error() {
    let transport = transport().await;
    transport.seed("prompts", json!({"identifier_first": true})).await;
    transport
        .fail_next(TransportError::connection("connection reset by peer"))
        .await;
    let management = management(&transport);
    let prompts = management.prompt();
    let options = RequestOptions::new();

    let error = prompts.read(&ctx("reset"), &options).await.unwrap_err();
    assert!(error.is_transport());
    assert!(!error.is_api());
    assert_eq!(error.status(), None);
    assert!(matches!(
        error,
        ManagementError::Transport(TransportError::Connection { .. })
    ));

    // Nothing is retried; the next call goes through.
    assert_eq!(transport.stats().await.request_count, 1);
    let prompt = prompts.read(&ctx("after-reset"), &options).await.unwrap();
    assert!(prompt.identifier_first());
}

#[tokio::test]
async fn test_api_error_carries_status_and_message() {
    let transport = transport().await;
    let management = management(&transport);

    let error = management
        .self_service_profile()
        .read(&ctx("missing"), "ssp_missing", &RequestOptions::new())
        .await
        .unwrap_err();

    let api = error.api_error().expect("API error");
    assert_eq!(api.status(), 404);
    assert_eq!(api.error, "Not Found");
    assert!(api.message.contains("ssp_missing"));
    assert!(error.to_string().starts_with("API error: 404 Not Found"));
}

#[tokio::test]
async fn test_undecodable_response_is_serialization_error() {
    let transport = transport().await;
    transport
        .seed("prompts", json!({"identifier_first": "yes"}))
        .await;
    let management = management(&transport);

    let error = management
        .prompt()
        .read(&ctx("bad-shape"), &RequestOptions::new())
        .await
        .unwrap_err();

    assert!(error.is_serialization());
    assert!(matches!(
        error,
        ManagementError::Serialization {
            stage: SerializationStage::DecodingResponse,
            ..
        }
    ));
}

#[tokio::test]
async fn test_failed_update_leaves_value_untouched() {
    let transport = transport().await;
    transport.seed("tenants/settings", json!({"friendly_name": "Acme"})).await;
    transport.fail_next(TransportError::other("broken pipe")).await;
    let management = management(&transport);

    let mut change = idm_management::managers::Tenant {
        support_url: Some("https://help.acme.test".to_string()),
        ..Default::default()
    };
    let error = management
        .tenant()
        .update(&ctx("broken"), &mut change, &RequestOptions::new())
        .await
        .unwrap_err();

    assert!(error.is_transport());
    assert_eq!(change.friendly_name, None);
    assert_eq!(change.support_url(), "https://help.acme.test");
}

#[tokio::test]
async fn test_empty_path_segment_is_rejected_before_sending() {
    let transport = transport().await;
    let management = management(&transport);

    let error = management
        .self_service_profile()
        .delete(&ctx("empty-id"), "", &RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(error, ManagementError::InvalidRequest { .. }));
    assert_eq!(transport.stats().await.request_count, 0);
}

#[tokio::test]
async fn test_dot_segment_ids_are_rejected_before_sending() {
    let transport = transport().await;
    let management = management(&transport);
    let profiles = management.self_service_profile();
    let options = RequestOptions::new();

    let error = profiles.delete(&ctx("dot"), ".", &options).await.unwrap_err();
    assert!(matches!(error, ManagementError::InvalidRequest { .. }));

    let error = profiles.read(&ctx("dot-dot"), "..", &options).await.unwrap_err();
    assert!(matches!(error, ManagementError::InvalidRequest { .. }));

    assert_eq!(transport.stats().await.request_count, 0);
}

#[tokio::test]
async fn test_cancel_mid_flight() {
    common::init_logging();
    let transport = InMemoryTransport::new().with_latency(Duration::from_secs(5));
    let management = management(&transport);
    let token = CancellationToken::new();
    let ctx = ctx("cancel").with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });

    let mut created = profile("Never", &["oidc"]);
    let error = management
        .self_service_profile()
        .create(&ctx, &mut created, &RequestOptions::new())
        .await
        .unwrap_err();
    canceller.await.unwrap();

    assert!(matches!(
        error,
        ManagementError::Transport(TransportError::Cancelled)
    ));
    assert_eq!(created.id, None);
    assert_eq!(transport.stats().await.document_count, 0);
}

#[tokio::test]
async fn test_deadline_aborts_slow_call() {
    common::init_logging();
    let transport = InMemoryTransport::new().with_latency(Duration::from_secs(5));
    let management = management(&transport);
    let ctx = ctx("deadline").with_timeout(Duration::from_millis(20));

    let error = management
        .prompt()
        .read(&ctx, &RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        ManagementError::Transport(TransportError::Timeout)
    ));
    assert!(ctx.is_expired());
}
