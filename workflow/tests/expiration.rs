//! Expiration workflow against nullable collaborators: validation, the
//! idempotency guard, submission outcomes and per-ticket serialization.

use std::sync::Arc;
use std::time::Duration;

use tixgate_contract::ContractError;
use tixgate_notify::Persistence;
use tixgate_nullables::{ContractCall, NullContract, NullNotifier, SubmitBehavior};
use tixgate_types::{Account, Address, TokenId};
use tixgate_workflow::messages::{
    ALREADY_EXPIRED, ERROR_TITLE, EXPIRED_SUCCESSFULLY, FAILED_TITLE, INVALID_TOKEN_ID,
    IN_PROGRESS_TITLE, SOMETHING_WENT_WRONG, SUCCESS_TITLE,
};
use tixgate_workflow::{ExpirationOutcome, ExpirationWorkflow, Stage};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const OWNER: [u8; 20] = [0x0a; 20];

fn operator() -> Account {
    Account::new(Address::new(OWNER))
}

fn setup() -> (Arc<NullContract>, Arc<NullNotifier>, ExpirationWorkflow) {
    let contract = Arc::new(NullContract::new(Address::new(OWNER)));
    let notifier = Arc::new(NullNotifier::new());
    let workflow = ExpirationWorkflow::new(contract.clone(), notifier.clone());
    (contract, notifier, workflow)
}

// ---------------------------------------------------------------------------
// Identifier validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_numeric_text_is_rejected_before_any_remote_call() {
    let (contract, notifier, workflow) = setup();
    let account = operator();

    for text in ["abc", "", "   ", "-5", "4.2", "0x2a", "42abc", "١٢"] {
        let outcome = workflow.expire(Some(text), Some(&account)).await;
        assert_eq!(outcome, ExpirationOutcome::InvalidTokenId, "{text:?}");
    }

    assert!(contract.calls().is_empty());
    assert!(notifier
        .notifications()
        .iter()
        .all(|n| n.title == ERROR_TITLE && n.description == INVALID_TOKEN_ID && n.is_destructive()));
    assert_eq!(notifier.notifications().len(), 8);
}

#[tokio::test]
async fn missing_scan_is_an_invalid_token() {
    let (contract, notifier, workflow) = setup();
    let outcome = workflow.expire(None, Some(&operator())).await;
    assert_eq!(outcome, ExpirationOutcome::InvalidTokenId);
    assert!(contract.calls().is_empty());
    assert_eq!(notifier.descriptions(), vec![INVALID_TOKEN_ID]);
}

#[tokio::test]
async fn invalid_scan_wins_over_missing_account() {
    let (contract, notifier, workflow) = setup();
    let outcome = workflow.expire(Some("abc"), None).await;
    assert_eq!(outcome, ExpirationOutcome::InvalidTokenId);
    assert!(contract.calls().is_empty());
    assert_eq!(notifier.descriptions(), vec![INVALID_TOKEN_ID]);
}

// ---------------------------------------------------------------------------
// Authorization precondition
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_account_aborts_silently() {
    let (contract, notifier, workflow) = setup();
    let outcome = workflow.expire(Some("42"), None).await;
    assert_eq!(outcome, ExpirationOutcome::NotAuthorized);
    assert!(contract.calls().is_empty());
    assert!(notifier.notifications().is_empty());
}

// ---------------------------------------------------------------------------
// Remote state and submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scenario_confirmed_expiration() {
    let (contract, notifier, workflow) = setup();
    let id = TokenId::from(42u64);

    let outcome = workflow.expire(Some("42"), Some(&operator())).await;

    match &outcome {
        ExpirationOutcome::Confirmed { token_id, receipt } => {
            assert_eq!(*token_id, id);
            assert!(receipt.success);
        }
        other => panic!("expected confirmation, got {other:?}"),
    }
    assert_eq!(outcome.stage(), Stage::Confirmed);
    assert!(contract.is_expired(&id));
    assert_eq!(
        contract.calls(),
        vec![
            ContractCall::TicketExpired(id),
            ContractCall::SendAndConfirm {
                token_id: id,
                from: Address::new(OWNER)
            },
        ]
    );

    assert_eq!(notifier.count_titled(SUCCESS_TITLE), 1);
    assert_eq!(notifier.count_titled(FAILED_TITLE), 0);
    assert_eq!(notifier.count_titled(ERROR_TITLE), 0);
    assert!(notifier.descriptions().contains(&EXPIRED_SUCCESSFULLY.to_string()));
}

#[tokio::test]
async fn scenario_already_expired_never_submits() {
    let (contract, notifier, workflow) = setup();
    let id = TokenId::from(42u64);
    contract.expire(id);

    let outcome = workflow.expire(Some("42"), Some(&operator())).await;

    assert_eq!(outcome, ExpirationOutcome::AlreadyExpired(id));
    assert!(contract.submissions().is_empty());
    assert_eq!(notifier.descriptions(), vec![ALREADY_EXPIRED]);
    assert_eq!(notifier.count_titled(IN_PROGRESS_TITLE), 0);
}

#[tokio::test]
async fn missing_receipt_reports_failed_once() {
    let (contract, notifier, workflow) = setup();
    contract.set_submit(SubmitBehavior::NoReceipt);

    let outcome = workflow.expire(Some("7"), Some(&operator())).await;

    assert_eq!(outcome, ExpirationOutcome::NoReceipt(TokenId::from(7u64)));
    assert_eq!(notifier.count_titled(FAILED_TITLE), 1);
    assert_eq!(notifier.count_titled(SUCCESS_TITLE), 0);
}

#[tokio::test]
async fn scenario_signing_rejected_is_generic_failure() {
    let (contract, notifier, workflow) = setup();
    contract.set_submit(SubmitBehavior::Fail(ContractError::Rejected(
        "User rejected the request.".into(),
    )));

    let outcome = workflow.expire(Some("42"), Some(&operator())).await;

    let ExpirationOutcome::Failed(err) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(err.stage, Stage::Submitting);
    assert_eq!(err.source.kind(), "rejected");
    assert_eq!(notifier.titles(), vec![IN_PROGRESS_TITLE, ERROR_TITLE]);
    assert_eq!(
        notifier.descriptions().last().map(String::as_str),
        Some(SOMETHING_WENT_WRONG)
    );
}

#[tokio::test]
async fn state_query_failure_is_generic_failure_without_submission() {
    let (contract, notifier, workflow) = setup();
    contract.fail_queries(ContractError::Transport("connection refused".into()));

    let outcome = workflow.expire(Some("42"), Some(&operator())).await;

    let ExpirationOutcome::Failed(err) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(err.stage, Stage::CheckingState);
    assert_eq!(err.source.kind(), "transport");
    assert!(contract.submissions().is_empty());
    assert_eq!(notifier.descriptions(), vec![SOMETHING_WENT_WRONG]);
}

#[tokio::test]
async fn large_identifiers_reach_the_contract_intact() {
    let (contract, _notifier, workflow) = setup();
    let text = "115792089237316195423570985008687907853269984665640564039457584007913129639935";

    let outcome = workflow.expire(Some(text), Some(&operator())).await;

    assert!(outcome.is_confirmed());
    assert_eq!(contract.submissions(), vec![TokenId::from_dec_str(text).unwrap()]);
}

// ---------------------------------------------------------------------------
// Progress notification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn progress_is_indefinite_and_dismissed_on_success() {
    let (_contract, notifier, workflow) = setup();

    workflow.expire(Some("1"), Some(&operator())).await;

    let progress = &notifier.notifications()[0];
    assert_eq!(progress.title, IN_PROGRESS_TITLE);
    assert_eq!(progress.persistence, Persistence::Indefinite);
    assert_eq!(notifier.dismissed_count(), 1);
    let active: Vec<_> = notifier.active().into_iter().map(|n| n.title).collect();
    assert_eq!(active, vec![SUCCESS_TITLE]);
}

#[tokio::test]
async fn progress_is_dismissed_on_every_failure_path() {
    for behavior in [
        SubmitBehavior::NoReceipt,
        SubmitBehavior::Fail(ContractError::Reverted("boom".into())),
    ] {
        let (contract, notifier, workflow) = setup();
        contract.set_submit(behavior);

        workflow.expire(Some("1"), Some(&operator())).await;

        assert_eq!(notifier.dismissed_count(), 1);
        assert!(notifier
            .active()
            .iter()
            .all(|n| n.title != IN_PROGRESS_TITLE));
    }
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_attempts_on_one_ticket_submit_once() {
    let (contract, notifier, workflow) = setup();
    contract.set_submit_delay(Duration::from_millis(30));
    let account = operator();

    let (a, b) = tokio::join!(
        workflow.expire(Some("42"), Some(&account)),
        workflow.expire(Some("42"), Some(&account)),
    );

    let mut outcomes = [a.stage(), b.stage()];
    outcomes.sort_by_key(|s| *s == Stage::Rejected);
    assert_eq!(outcomes, [Stage::Confirmed, Stage::Rejected]);
    assert_eq!(contract.submissions(), vec![TokenId::from(42u64)]);
    assert_eq!(notifier.count_titled(SUCCESS_TITLE), 1);
    assert!(notifier.descriptions().contains(&ALREADY_EXPIRED.to_string()));
}

#[tokio::test]
async fn concurrent_attempts_on_different_tickets_both_submit() {
    let (contract, notifier, workflow) = setup();
    contract.set_submit_delay(Duration::from_millis(30));
    let account = operator();

    let (a, b) = tokio::join!(
        workflow.expire(Some("1"), Some(&account)),
        workflow.expire(Some("2"), Some(&account)),
    );

    assert!(a.is_confirmed());
    assert!(b.is_confirmed());
    assert_eq!(contract.submissions().len(), 2);
    assert_eq!(notifier.count_titled(SUCCESS_TITLE), 2);
}

#[tokio::test]
async fn contract_revert_is_the_backstop_for_duplicates() {
    // A submission that slips past the local check (e.g. from another
    // scanner) is rejected by the contract and reported as a failure.
    let (contract, notifier, workflow) = setup();
    contract.set_submit_delay(Duration::from_millis(20));
    let account = operator();

    let attempt = workflow.expire(Some("9"), Some(&account));
    let other_scanner = async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        contract.expire(TokenId::from(9u64));
    };
    let (outcome, ()) = tokio::join!(attempt, other_scanner);

    let ExpirationOutcome::Failed(err) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(err.source.kind(), "reverted");
    assert_eq!(notifier.count_titled(SUCCESS_TITLE), 0);
}
