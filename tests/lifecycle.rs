mod common;

use std::time::Duration;

use charity_ledger::error::AppError;
use charity_ledger::lifecycle::LifecycleManager;
use charity_ledger::notify::{self, APPROVAL_SUBJECT, Notification};
use charity_ledger::schema::{CharityRequestUpdate, NewCharityRequest, RequestStatus};
use charity_ledger::storage::FileStore;
use tokio::sync::mpsc;

use common::test_db;

fn request(email: &str) -> NewCharityRequest {
    NewCharityRequest {
        wallet_address: "0xcharity".into(),
        charity_name: "Clean Water".into(),
        description: "Wells for everyone".into(),
        email: email.into(),
        verification_document_url: "doc-ref".into(),
        website_url: None,
        logo_url: None,
    }
}

async fn manager() -> (
    tempfile::TempDir,
    LifecycleManager,
    FileStore,
    mpsc::Receiver<Notification>,
) {
    let (dir, db) = test_db().await;
    let files = FileStore::new(dir.path().join("uploads"));
    let (mailer, mailbox) = notify::channel(8);
    let lifecycle =
        LifecycleManager::new(db, files.clone(), mailer, Duration::from_secs(1));
    (dir, lifecycle, files, mailbox)
}

#[tokio::test]
async fn submitted_requests_start_pending() {
    let (_dir, lifecycle, _files, _mailbox) = manager().await;
    let saved = lifecycle.submit(request("org@example.com")).await.unwrap();
    assert_eq!(saved.status, RequestStatus::Pending);
}

#[tokio::test]
async fn approval_notifies_and_is_terminal() {
    let (_dir, lifecycle, _files, mut mailbox) = manager().await;
    let saved = lifecycle.submit(request("org@example.com")).await.unwrap();

    let approved = lifecycle.approve(saved.id).await.unwrap();
    assert_eq!(approved.status, RequestStatus::Approved);

    let mail = mailbox.try_recv().unwrap();
    assert_eq!(mail.to, "org@example.com");
    assert_eq!(mail.subject, APPROVAL_SUBJECT);

    // Forward-only: an approved request cannot be rejected.
    let err = lifecycle.reject(saved.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn rejection_sends_no_notification() {
    let (_dir, lifecycle, _files, mut mailbox) = manager().await;
    let saved = lifecycle.submit(request("org@example.com")).await.unwrap();

    let rejected = lifecycle.reject(saved.id).await.unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);
    assert!(mailbox.try_recv().is_err());
}

#[tokio::test]
async fn approval_survives_a_dead_dispatcher() {
    let (_dir, lifecycle, _files, mailbox) = manager().await;
    let saved = lifecycle.submit(request("org@example.com")).await.unwrap();

    // Closed channel: dispatch fails, the state transition must not.
    drop(mailbox);
    let approved = lifecycle.approve(saved.id).await.unwrap();
    assert_eq!(approved.status, RequestStatus::Approved);
}

#[tokio::test]
async fn unknown_ids_yield_not_found() {
    let (_dir, lifecycle, _files, _mailbox) = manager().await;
    assert!(matches!(
        lifecycle.approve(9999).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        lifecycle.reject(9999).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        lifecycle.delete(9999).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn admin_override_bypasses_terminal_states() {
    let (_dir, lifecycle, _files, _mailbox) = manager().await;
    let saved = lifecycle.submit(request("org@example.com")).await.unwrap();
    lifecycle.approve(saved.id).await.unwrap();

    let overridden = lifecycle
        .update_by_admin(saved.id, RequestStatus::Rejected)
        .await
        .unwrap();
    assert_eq!(overridden.status, RequestStatus::Rejected);
}

#[tokio::test]
async fn detail_updates_apply_in_any_state() {
    let (_dir, lifecycle, _files, _mailbox) = manager().await;
    let saved = lifecycle.submit(request("org@example.com")).await.unwrap();
    lifecycle.approve(saved.id).await.unwrap();

    let updated = lifecycle
        .update_details(
            saved.id,
            CharityRequestUpdate {
                charity_name: Some("Cleaner Water".into()),
                email: Some("new@example.com".into()),
                ..Default::default()
            },
            false,
            None,
        )
        .await
        .unwrap();
    assert_eq!(updated.charity_name, "Cleaner Water");
    assert_eq!(updated.email, "new@example.com");
    // Untouched fields survive.
    assert_eq!(updated.description, "Wells for everyone");
    assert_eq!(updated.status, RequestStatus::Approved);
}

#[tokio::test]
async fn logo_change_requires_a_replacement() {
    let (_dir, lifecycle, _files, _mailbox) = manager().await;
    let saved = lifecycle.submit(request("org@example.com")).await.unwrap();

    let err = lifecycle
        .update_details(saved.id, CharityRequestUpdate::default(), true, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn logo_change_releases_the_old_reference() {
    let (_dir, lifecycle, files, _mailbox) = manager().await;

    let old_ref = files.store(b"old-logo", "logo.png").await.unwrap();
    let mut new_request = request("org@example.com");
    new_request.logo_url = Some(old_ref.clone());
    let saved = lifecycle.submit(new_request).await.unwrap();

    let new_ref = files.store(b"new-logo", "logo2.png").await.unwrap();
    let updated = lifecycle
        .update_details(
            saved.id,
            CharityRequestUpdate::default(),
            true,
            Some(new_ref.clone()),
        )
        .await
        .unwrap();

    assert_eq!(updated.logo_url.as_deref(), Some(new_ref.as_str()));
    assert!(!files.path_of(&old_ref).exists());
    assert!(files.path_of(&new_ref).exists());
}

#[tokio::test]
async fn delete_is_permanent() {
    let (_dir, lifecycle, _files, _mailbox) = manager().await;
    let saved = lifecycle.submit(request("org@example.com")).await.unwrap();

    lifecycle.delete(saved.id).await.unwrap();
    assert!(matches!(
        lifecycle.delete(saved.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}
