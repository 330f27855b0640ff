mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FakeListingService, Reply};
use nest_admin::encoder::{Target, WirePayload};
use nest_admin::service::{FailureKind, HttpListingService, ListingService};
use nest_admin::session::{MemorySessionStore, SessionStore};
use nest_admin::submission::{
    NoticeLevel, Redirect, SubmissionGuard, SubmissionState, SubmitOutcome,
};
use nest_admin::ClientConfig;
use tokio::net::TcpListener;
use tokio::sync::Notify;

fn guard(service: &Arc<FakeListingService>, session: &Arc<MemorySessionStore>) -> SubmissionGuard {
    SubmissionGuard::new(service.clone(), session.clone())
}

#[tokio::test]
async fn successful_create_redirects_to_new_property() {
    let service = Arc::new(FakeListingService::new().reply(Reply::Ok("p77".into())));
    let session = Arc::new(MemorySessionStore::with_token("tok-1"));
    let guard = guard(&service, &session);

    let outcome = guard.submit(&Target::Create, WirePayload::default()).await;

    match &outcome {
        SubmitOutcome::Succeeded { redirect, notice } => {
            assert_eq!(redirect, &Redirect::PropertyDetail("p77".into()));
            assert_eq!(notice.level, NoticeLevel::Success);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(
        guard.state(),
        SubmissionState::Succeeded {
            property_id: "p77".into()
        }
    );
    let sent = service.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, "POST");
    assert_eq!(sent[0].token, "tok-1");
}

#[tokio::test]
async fn expired_session_clears_credential_without_error_notice() {
    let service = Arc::new(FakeListingService::new().reply(Reply::Expired));
    let session = Arc::new(MemorySessionStore::with_token("stale"));
    let guard = guard(&service, &session);

    let outcome = guard
        .submit(&Target::Update("p1".into()), WirePayload::default())
        .await;

    assert_eq!(outcome, SubmitOutcome::SessionExpired);
    assert_eq!(outcome.redirect(), Some(&Redirect::Login));
    assert!(outcome.notice().is_none());
    assert_eq!(session.clear_count(), 1);
    assert!(!session.is_logged_in());
    assert_eq!(guard.state(), SubmissionState::Failed);
}

#[tokio::test]
async fn missing_credential_is_treated_as_expired_without_a_request() {
    let service = Arc::new(FakeListingService::new());
    let session = Arc::new(MemorySessionStore::new());
    let guard = guard(&service, &session);

    let outcome = guard.submit(&Target::Create, WirePayload::default()).await;

    assert_eq!(outcome, SubmitOutcome::SessionExpired);
    assert_eq!(service.mutating_calls(), 0);
    assert_eq!(session.clear_count(), 1);
}

#[tokio::test]
async fn ordinary_failure_surfaces_server_message_and_allows_retry() {
    let service = Arc::new(
        FakeListingService::new()
            .reply(Reply::Invalid(Some("capacity must be a number".into())))
            .reply(Reply::Ok("p5".into())),
    );
    let session = Arc::new(MemorySessionStore::with_token("tok"));
    let guard = guard(&service, &session);
    let target = Target::Update("p5".into());

    let outcome = guard.submit(&target, WirePayload::default()).await;
    let notice = outcome.notice().expect("failure notice");
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "capacity must be a number");
    assert_eq!(guard.state(), SubmissionState::Idle);
    assert_eq!(session.clear_count(), 0);

    let retry = guard.submit(&target, WirePayload::default()).await;
    assert_eq!(retry.redirect(), Some(&Redirect::PropertyDetail("p5".into())));
    assert_eq!(service.mutating_calls(), 2);
}

#[tokio::test]
async fn failure_without_message_uses_fallback_text() {
    let service = Arc::new(
        FakeListingService::new()
            .reply(Reply::Rejected(500, None))
            .reply(Reply::Rejected(502, None)),
    );
    let session = Arc::new(MemorySessionStore::with_token("tok"));
    let guard = guard(&service, &session);

    let create = guard.submit(&Target::Create, WirePayload::default()).await;
    assert_eq!(create.notice().unwrap().message, "Failed to create property");

    let update = guard
        .submit(&Target::Update("p1".into()), WirePayload::default())
        .await;
    assert_eq!(update.notice().unwrap().message, "Update failed");
}

#[tokio::test]
async fn second_trigger_while_submitting_is_ignored() {
    let gate = Arc::new(Notify::new());
    let service = Arc::new(
        FakeListingService::new()
            .gated(gate.clone())
            .reply(Reply::Ok("p1".into())),
    );
    let session = Arc::new(MemorySessionStore::with_token("tok"));
    let guard = guard(&service, &session);

    let (first, second, _) = tokio::join!(
        guard.submit(&Target::Create, WirePayload::default()),
        async {
            assert_eq!(guard.state(), SubmissionState::Submitting);
            guard.submit(&Target::Create, WirePayload::default()).await
        },
        async { gate.notify_one() },
    );

    assert!(matches!(first, SubmitOutcome::Succeeded { .. }));
    assert_eq!(second, SubmitOutcome::Ignored);
    assert_eq!(service.mutating_calls(), 1);
}

#[tokio::test]
async fn delete_redirects_to_dashboard() {
    let service = Arc::new(FakeListingService::new().reply(Reply::Ok(String::new())));
    let session = Arc::new(MemorySessionStore::with_token("tok"));
    let guard = guard(&service, &session);

    let outcome = guard.delete("p9").await;

    assert_eq!(outcome.redirect(), Some(&Redirect::Dashboard));
    let sent = service.sent();
    assert_eq!(sent[0].method, "DELETE");
    assert_eq!(sent[0].id.as_deref(), Some("p9"));
}

#[tokio::test]
async fn cancelled_submission_returns_guard_to_idle() {
    let gate = Arc::new(Notify::new());
    let service = Arc::new(
        FakeListingService::new()
            .gated(gate.clone())
            .reply(Reply::Ok("p4".into())),
    );
    let session = Arc::new(MemorySessionStore::with_token("tok"));
    let guard = guard(&service, &session);

    let timed_out = tokio::time::timeout(
        Duration::from_millis(50),
        guard.submit(&Target::Create, WirePayload::default()),
    )
    .await;
    assert!(timed_out.is_err());
    assert_eq!(guard.state(), SubmissionState::Idle);

    gate.notify_one();
    let retry = guard.submit(&Target::Create, WirePayload::default()).await;
    assert_eq!(retry.redirect(), Some(&Redirect::PropertyDetail("p4".into())));
    assert_eq!(service.mutating_calls(), 2);
}

#[tokio::test]
async fn failed_delete_uses_fallback_and_stays_retryable() {
    let service = Arc::new(FakeListingService::new().reply(Reply::Rejected(500, None)));
    let session = Arc::new(MemorySessionStore::with_token("tok"));
    let guard = guard(&service, &session);

    let outcome = guard.delete("p9").await;

    assert_eq!(outcome.notice().unwrap().message, "delete failed");
    assert_eq!(outcome.redirect(), None);
    assert_eq!(guard.state(), SubmissionState::Idle);
}

#[tokio::test]
async fn unreachable_service_is_a_network_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let service = Arc::new(
        HttpListingService::new(ClientConfig::new(&base_url).with_timeout(5)).unwrap(),
    );
    let err = service
        .delete_property("p1", "tok")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::NetworkFailure);

    let session = Arc::new(MemorySessionStore::with_token("tok"));
    let guard = SubmissionGuard::new(service, session.clone());
    let outcome = guard.submit(&Target::Create, WirePayload::default()).await;

    assert_eq!(outcome.notice().unwrap().message, "Failed to create property");
    assert_eq!(guard.state(), SubmissionState::Idle);
    assert!(session.is_logged_in());
}
