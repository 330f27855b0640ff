mod common;

use std::sync::Arc;

use common::{contact, FakeListingService, Reply};
use nest_admin::models::{LoginUser, ProfileUpdate};
use nest_admin::session::{MemorySessionStore, SessionStore};
use nest_admin::submission::NoticeLevel;
use nest_admin::{AccountDesk, AccountOutcome};

fn signed_in(token: &str) -> Arc<MemorySessionStore> {
    let session = Arc::new(MemorySessionStore::new());
    session.sign_in(LoginUser {
        id: "u1".into(),
        name: "Asha".into(),
        email: "asha@nest.test".into(),
        token: token.into(),
    });
    session
}

fn update(name: &str, email: &str) -> ProfileUpdate {
    ProfileUpdate {
        name: name.into(),
        email: email.into(),
        password: String::new(),
    }
}

#[tokio::test]
async fn profile_update_refreshes_session_user() {
    let service = Arc::new(FakeListingService::new());
    let session = signed_in("tok-1");
    let desk = AccountDesk::new(service.clone(), session.clone());

    let outcome = desk.update_profile(update("Asha K", "asha.k@nest.test")).await;

    assert_eq!(outcome.notice().unwrap().level, NoticeLevel::Success);
    let user = session.current_user().unwrap();
    assert_eq!(user.name, "Asha K");
    assert_eq!(user.email, "asha.k@nest.test");
    assert_eq!(session.credential().as_deref(), Some("tok-1"));
    assert_eq!(service.sent()[0].token, "tok-1");
}

#[tokio::test]
async fn profile_update_failure_prefers_server_message() {
    let service = Arc::new(
        FakeListingService::new()
            .reply(Reply::Invalid(Some("Email already in use".into())))
            .reply(Reply::Rejected(500, None)),
    );
    let session = signed_in("tok-1");
    let desk = AccountDesk::new(service, session.clone());

    let first = desk.update_profile(update("Asha", "taken@nest.test")).await;
    assert_eq!(first.notice().unwrap().message, "Email already in use");

    let second = desk.update_profile(update("Asha", "asha@nest.test")).await;
    assert_eq!(second.notice().unwrap().message, "Update Failed");
    assert_eq!(session.current_user().unwrap().email, "asha@nest.test");
}

#[tokio::test]
async fn expired_profile_update_clears_session() {
    let service = Arc::new(FakeListingService::new().reply(Reply::Expired));
    let session = signed_in("stale");
    let desk = AccountDesk::new(service, session.clone());

    let outcome = desk.update_profile(update("Asha", "asha@nest.test")).await;

    assert_eq!(outcome, AccountOutcome::SessionExpired);
    assert!(outcome.notice().is_none());
    assert_eq!(session.clear_count(), 1);
}

#[tokio::test]
async fn contacts_are_listed_with_credential() {
    let service = Arc::new(
        FakeListingService::new().with_contacts(vec![contact("c1", "Ravi"), contact("c2", "Meera")]),
    );
    let desk = AccountDesk::new(service, signed_in("tok-1"));

    let outcome = desk.contacts().await;

    let contacts = outcome.value().unwrap();
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[1].name, "Meera");
    assert!(outcome.notice().is_none());
}

#[tokio::test]
async fn contact_listing_with_dead_token_signs_out() {
    let service = Arc::new(FakeListingService::new());
    let session = signed_in("expired");
    let desk = AccountDesk::new(service, session.clone());

    assert_eq!(desk.contacts().await, AccountOutcome::SessionExpired);
    assert!(!session.is_logged_in());
}

#[tokio::test]
async fn contact_delete_uses_fixed_wording() {
    let service = Arc::new(
        FakeListingService::new()
            .reply(Reply::Ok(String::new()))
            .reply(Reply::Rejected(404, Some("Contact not found".into()))),
    );
    let desk = AccountDesk::new(service.clone(), signed_in("tok-1"));

    let done = desk.delete_contact("c1").await;
    assert_eq!(done.notice().unwrap().message, "Message deleted");

    let failed = desk.delete_contact("c1").await;
    assert_eq!(failed.notice().unwrap().message, "Failed to delete message");

    let sent = service.sent();
    assert_eq!(sent[0].method, "DELETE_CONTACT");
    assert_eq!(sent[0].id.as_deref(), Some("c1"));
}

#[tokio::test]
async fn signed_out_desk_makes_no_request() {
    let service = Arc::new(FakeListingService::new());
    let session = Arc::new(MemorySessionStore::new());
    let desk = AccountDesk::new(service.clone(), session);

    assert_eq!(desk.delete_contact("c1").await, AccountOutcome::SessionExpired);
    assert_eq!(service.mutating_calls(), 0);
}
