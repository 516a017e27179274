//! End-to-end submission scenarios against scripted collaborators.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use proof_of_audit::attestation::{
    AttestOutcome, AttestationError, AuditRecord, ConfirmedReceipt, NO_ATTESTATION_ID,
    NO_TRANSACTION_HASH,
};
use proof_of_audit::form::{Field, SubmissionStatus, SubmitBlocker, SubmitRejected};
use proof_of_audit::view::follow;

mod common;
use common::*;

fn sent(tx: alloy::primitives::TxHash) -> AttestOutcome {
    AttestOutcome {
        transaction: Some(tx),
    }
}

/// Wait until the watched status satisfies `pred`.
async fn wait_for_status(
    rx: &mut tokio::sync::watch::Receiver<SubmissionStatus>,
    pred: impl Fn(&SubmissionStatus) -> bool,
) -> SubmissionStatus {
    let status = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| pred(s)))
        .await
        .expect("status never reached")
        .expect("status channel closed");
    status.clone()
}

#[tokio::test]
async fn test_successful_attestation() {
    let client = Arc::new(ScriptedClient::new(vec![Ok(sent(tx_ref()))]));
    let receipts = Arc::new(ScriptedReceipts::new(vec![Ok(receipt_with_id(attestation_id()))]));
    let session = connected_session(client.clone(), receipts.clone());
    let mut store = filled_store();

    let status = store.begin_submit(&session).unwrap().run().await;

    assert_eq!(
        status,
        SubmissionStatus::Success {
            transaction: tx_ref(),
            attestation_id: attestation_id(),
        }
    );
    assert_eq!(store.status(), status);
    assert_eq!(receipts.waited(), vec![tx_ref()]);
}

#[tokio::test]
async fn test_request_built_from_form() {
    let client = Arc::new(ScriptedClient::new(vec![Ok(sent(tx_ref()))]));
    let receipts = Arc::new(ScriptedReceipts::new(vec![Ok(receipt_with_id(attestation_id()))]));
    let session = connected_session(client.clone(), receipts);
    let mut store = filled_store();

    let before = proof_of_audit::attestation::request::unix_now();
    store.begin_submit(&session).unwrap().run().await;
    let after = proof_of_audit::attestation::request::unix_now();

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    let (request, validation_payloads) = &requests[0];

    assert!(validation_payloads.is_empty());
    assert_eq!(request.portal_id, settings().portal_id);
    assert_eq!(request.schema_id, settings().schema_id);
    assert_eq!(request.subject, CONTRACT_ADDRESS.parse::<Address>().unwrap());
    assert!(request.expiration_date >= before + VALIDITY_SECS);
    assert!(request.expiration_date <= after + VALIDITY_SECS);
    assert_eq!(
        request.attestation_data,
        vec![AuditRecord {
            commit_hash: COMMIT_HASH.to_string(),
            repo_url: REPO_URL.to_string(),
        }]
    );
}

#[tokio::test]
async fn test_rejected_attestation_has_no_transaction() {
    let client = Arc::new(ScriptedClient::new(vec![Err(AttestationError::Rejected(
        "User rejected the request.".to_string(),
    ))]));
    let receipts = Arc::new(ScriptedReceipts::default());
    let session = connected_session(client, receipts.clone());
    let mut store = filled_store();

    let status = store.begin_submit(&session).unwrap().run().await;

    let message = status.error_message().expect("error status");
    assert!(!message.is_empty());
    assert!(message.contains("User rejected the request."));
    assert_eq!(status.transaction_reference(), None);
    assert_eq!(status.attestation_id(), None);
    assert!(receipts.waited().is_empty());
}

#[tokio::test]
async fn test_missing_transaction_hash() {
    let client = Arc::new(ScriptedClient::new(vec![Ok(AttestOutcome::default())]));
    let receipts = Arc::new(ScriptedReceipts::default());
    let session = connected_session(client, receipts.clone());
    let mut store = filled_store();

    let status = store.begin_submit(&session).unwrap().run().await;

    assert_eq!(status.error_message(), Some(NO_TRANSACTION_HASH));
    assert_eq!(status.transaction_reference(), None);
    assert!(receipts.waited().is_empty());
}

#[tokio::test]
async fn test_empty_logs_keep_transaction() {
    let client = Arc::new(ScriptedClient::new(vec![Ok(sent(tx_ref()))]));
    let receipts = Arc::new(ScriptedReceipts::new(vec![Ok(ConfirmedReceipt::default())]));
    let session = connected_session(client, receipts);
    let mut store = filled_store();

    let status = store.begin_submit(&session).unwrap().run().await;

    assert_eq!(
        status,
        SubmissionStatus::Error {
            message: NO_ATTESTATION_ID.to_string(),
            transaction: Some(tx_ref()),
        }
    );
    assert_eq!(status.attestation_id(), None);
}

#[tokio::test]
async fn test_dropped_transaction_keeps_reference() {
    let client = Arc::new(ScriptedClient::new(vec![Ok(sent(tx_ref()))]));
    let receipts = Arc::new(ScriptedReceipts::new(vec![Err(
        AttestationError::ConfirmationTimeout {
            tx_hash: tx_ref(),
            waited_secs: 300,
        },
    )]));
    let session = connected_session(client, receipts);
    let mut store = filled_store();

    let status = store.begin_submit(&session).unwrap().run().await;

    assert_eq!(status.transaction_reference(), Some(tx_ref()));
    assert!(status.error_message().is_some());
}

#[tokio::test]
async fn test_transitions_are_observable() {
    let client = Arc::new(ScriptedClient::gated(vec![Ok(sent(tx_ref()))]));
    let receipts = Arc::new(ScriptedReceipts::gated(vec![Ok(receipt_with_id(
        attestation_id(),
    ))]));
    let session = connected_session(client.clone(), receipts.clone());
    let mut store = filled_store();
    let mut rx = store.status_handle().subscribe();

    let submission = store.begin_submit(&session).unwrap();
    let task = tokio::spawn(submission.run());

    let status = wait_for_status(&mut rx, |s| s.is_pending()).await;
    assert_eq!(status, SubmissionStatus::Pending { transaction: None });

    client.release();
    let status = wait_for_status(&mut rx, |s| s.transaction_reference().is_some()).await;
    assert_eq!(
        status,
        SubmissionStatus::Pending {
            transaction: Some(tx_ref())
        }
    );

    receipts.release();
    let status = task.await.unwrap();
    assert_eq!(status.attestation_id(), Some(attestation_id()));
}

#[tokio::test]
async fn test_second_submit_while_pending_is_rejected() {
    let client = Arc::new(ScriptedClient::gated(vec![Ok(sent(tx_ref()))]));
    let receipts = Arc::new(ScriptedReceipts::new(vec![Ok(receipt_with_id(attestation_id()))]));
    let session = connected_session(client.clone(), receipts);
    let mut store = filled_store();
    let mut rx = store.status_handle().subscribe();

    let first = store.begin_submit(&session).unwrap();
    // Not yet running: the attempt slot is already taken.
    assert_eq!(
        store.begin_submit(&session).unwrap_err(),
        SubmitRejected::Blocked(SubmitBlocker::Pending)
    );

    let task = tokio::spawn(first.run());
    wait_for_status(&mut rx, |s| s.is_pending()).await;
    assert_eq!(store.submit_blocker(&session), Some(SubmitBlocker::Pending));
    assert!(store.is_submit_disabled(&session));

    client.release();
    task.await.unwrap();

    assert_eq!(client.requests().len(), 1);
    assert_eq!(store.submit_blocker(&session), None);
}

#[tokio::test]
async fn test_resubmission_clears_previous_outcome() {
    let client = Arc::new(ScriptedClient::new(vec![
        Ok(sent(tx_ref())),
        Ok(sent(tx_ref())),
    ]));
    let receipts = Arc::new(ScriptedReceipts::new(vec![
        Ok(ConfirmedReceipt::default()),
        Ok(receipt_with_id(attestation_id())),
    ]));
    let session = connected_session(client, receipts);
    let mut store = filled_store();

    let first = store.begin_submit(&session).unwrap().run().await;
    assert!(first.error_message().is_some());
    assert_eq!(first.transaction_reference(), Some(tx_ref()));

    store.field_changed(Field::RepoUrl, "https://github.com/foo/baz");
    let second = store.begin_submit(&session).unwrap();

    // Cleared before the new attempt publishes anything.
    let cleared = store.status();
    assert_eq!(cleared, SubmissionStatus::Idle);
    assert_eq!(cleared.transaction_reference(), None);
    assert_eq!(cleared.attestation_id(), None);
    assert_eq!(cleared.error_message(), None);
    assert_eq!(second.values().repo_url, "https://github.com/foo/baz");

    let status = second.run().await;
    assert_eq!(status.attestation_id(), Some(attestation_id()));
}

#[tokio::test]
async fn test_invalid_form_never_reaches_registry() {
    let client = Arc::new(ScriptedClient::new(vec![Ok(sent(tx_ref()))]));
    let receipts = Arc::new(ScriptedReceipts::default());
    let session = connected_session(client.clone(), receipts);
    let mut store = filled_store();
    store.field_changed(Field::CommitHash, COMMIT_HASH.to_uppercase());

    let err = store.begin_submit(&session).unwrap_err();
    match err {
        SubmitRejected::Invalid(errors) => {
            assert!(!errors.commit_hash.is_empty());
            assert_eq!(errors.repo_url, "");
        }
        other => panic!("unexpected rejection: {other:?}"),
    }
    assert!(client.requests().is_empty());
    assert_eq!(store.status(), SubmissionStatus::Idle);
}

#[tokio::test]
async fn test_follow_writes_each_status_once() {
    let client = Arc::new(ScriptedClient::gated(vec![Ok(sent(tx_ref()))]));
    let receipts = Arc::new(ScriptedReceipts::gated(vec![Ok(receipt_with_id(
        attestation_id(),
    ))]));
    let session = connected_session(client.clone(), receipts.clone());
    let mut store = filled_store();
    let mut rx = store.status_handle().subscribe();

    let submission = store.begin_submit(&session).unwrap();
    let mut out = Vec::new();
    let driver = async {
        wait_for_status(&mut rx, |s| s.is_pending()).await;
        client.release();
        wait_for_status(&mut rx, |s| s.transaction_reference().is_some()).await;
        receipts.release();
    };

    let (status, ()) = tokio::join!(follow(submission, &session, &mut out), driver);
    let status = status.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(status.attestation_id(), Some(attestation_id()));
    assert_eq!(text.matches("Submitting attestation...").count(), 1);
    assert_eq!(text.matches("Transaction pending...").count(), 1);
    assert_eq!(text.matches("Attestation ID: ").count(), 1);
    assert!(text.contains("https://explorer.ver.ax/linea-sepolia/attestations/"));
}

#[tokio::test]
async fn test_follow_writes_terminal_error() {
    let client = Arc::new(ScriptedClient::new(vec![Ok(AttestOutcome::default())]));
    let receipts = Arc::new(ScriptedReceipts::default());
    let session = connected_session(client, receipts);
    let mut store = filled_store();

    let submission = store.begin_submit(&session).unwrap();
    let mut out = Vec::new();
    let status = follow(submission, &session, &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(status.error_message(), Some(NO_TRANSACTION_HASH));
    assert_eq!(text.matches(NO_TRANSACTION_HASH).count(), 1);
    assert!(text.trim_end().ends_with(NO_TRANSACTION_HASH));
}
