//! Reward orchestration, registration and login through in-memory ports.

mod support;

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use stillmint_common::MockClock;
use stillmint_core::{MeditationService, RewardOutcome, UserService};
use stillmint_domain::{
    SessionPhase, SessionRecord, SessionVerdict, StillMintError, TokenAmount,
};
use support::repositories::{
    profile, MockRewardIssuer, MockSessionRepository, MockUserRepository, WALLET,
};

fn completed() -> SessionVerdict {
    SessionVerdict { phase: SessionPhase::Completed, violation_count: 1, elapsed_seconds: 300 }
}

fn clock() -> Arc<MockClock> {
    Arc::new(MockClock::at(Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()))
}

fn service(
    issuer: &MockRewardIssuer,
    sessions: &MockSessionRepository,
    users: &MockUserRepository,
    clock: Arc<MockClock>,
) -> MeditationService {
    MeditationService::new(
        Arc::new(issuer.clone()),
        Arc::new(sessions.clone()),
        Arc::new(users.clone()),
        clock,
        10,
    )
}

#[tokio::test]
async fn completed_session_mints_and_records() {
    let issuer = MockRewardIssuer::default();
    let sessions = MockSessionRepository::default();
    let users = MockUserRepository::default().with_profile(profile("alice"));
    let svc = service(&issuer, &sessions, &users, clock());

    let outcome = svc.complete_session("alice", completed()).await.unwrap();

    let RewardOutcome::Granted { receipt, record } = outcome else {
        panic!("expected a granted reward");
    };
    assert_eq!(receipt.amount, TokenAmount::from_whole_tokens(10));
    assert_eq!(receipt.wallet.as_str(), WALLET);
    assert_eq!(record.tx_id, receipt.tx_id);
    assert_eq!(record.duration_minutes, 5);
    assert_eq!(record.reward_tokens, 10);
    assert_eq!(sessions.saved(), vec![record]);
    assert_eq!(svc.balance("alice").await.unwrap().to_string(), "10.00");
}

#[tokio::test]
async fn disqualified_session_is_withheld() {
    let issuer = MockRewardIssuer::default();
    let sessions = MockSessionRepository::default();
    let users = MockUserRepository::default().with_profile(profile("alice"));
    let svc = service(&issuer, &sessions, &users, clock());
    let verdict =
        SessionVerdict { phase: SessionPhase::Disqualified, violation_count: 3, elapsed_seconds: 300 };

    let outcome = svc.complete_session("alice", verdict).await.unwrap();

    assert_eq!(outcome, RewardOutcome::Withheld { verdict });
    assert_eq!(issuer.mint_count(), 0);
    assert!(sessions.saved().is_empty());
}

#[tokio::test]
async fn failed_mint_persists_nothing() {
    let issuer = MockRewardIssuer::failing("rpc timeout");
    let sessions = MockSessionRepository::default();
    let users = MockUserRepository::default().with_profile(profile("alice"));
    let svc = service(&issuer, &sessions, &users, clock());

    let err = svc.complete_session("alice", completed()).await.unwrap_err();

    assert_eq!(err, StillMintError::Reward("rpc timeout".into()));
    assert!(sessions.saved().is_empty());
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let issuer = MockRewardIssuer::default();
    let sessions = MockSessionRepository::default();
    let svc = service(&issuer, &sessions, &MockUserRepository::default(), clock());

    let err = svc.complete_session("ghost", completed()).await.unwrap_err();

    assert!(matches!(err, StillMintError::NotFound(_)));
    assert_eq!(issuer.mint_count(), 0);
}

#[tokio::test]
async fn history_is_newest_first_and_per_user() {
    let at = |day| Utc.with_ymd_and_hms(2025, 5, day, 7, 0, 0).unwrap();
    let sessions = MockSessionRepository::default()
        .with_record(SessionRecord::from_verdict("alice", &completed(), 10, "tx-a", at(1)))
        .with_record(SessionRecord::from_verdict("bob", &completed(), 10, "tx-b", at(2)))
        .with_record(SessionRecord::from_verdict("alice", &completed(), 10, "tx-c", at(3)));
    let svc = service(
        &MockRewardIssuer::default(),
        &sessions,
        &MockUserRepository::default(),
        clock(),
    );

    let history = svc.history("alice").await.unwrap();

    let tx_ids: Vec<&str> = history.iter().map(|r| r.tx_id.as_str()).collect();
    assert_eq!(tx_ids, vec!["tx-c", "tx-a"]);
}

#[tokio::test]
async fn records_use_the_injected_clock() {
    let issuer = MockRewardIssuer::default();
    let sessions = MockSessionRepository::default();
    let users = MockUserRepository::default().with_profile(profile("alice"));
    let clock = clock();
    let svc = service(&issuer, &sessions, &users, clock.clone());

    svc.complete_session("alice", completed()).await.unwrap();
    clock.advance(Duration::days(1));
    svc.complete_session("alice", completed()).await.unwrap();

    let history = svc.history("alice").await.unwrap();
    assert_eq!(history[0].recorded_at, Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap());
    assert_eq!(svc.balance("alice").await.unwrap(), TokenAmount::from_whole_tokens(20));
}

const PASSWORD: &str = "sit-still-42";

#[tokio::test]
async fn register_validates_and_rejects_duplicates() {
    let users = MockUserRepository::default();
    let svc = UserService::new(Arc::new(users.clone()), clock());

    let created = svc.register("alice", "alice@example.com", WALLET, PASSWORD).await.unwrap();
    assert_eq!(created.wallet_address.as_str(), WALLET);
    assert_eq!(svc.profile("alice").await.unwrap(), created);

    let dup = svc.register("alice", "other@example.com", WALLET, PASSWORD).await.unwrap_err();
    assert!(matches!(dup, StillMintError::InvalidInput(_)));

    let dup_email = svc.register("alicia", "ALICE@example.com", WALLET, PASSWORD).await.unwrap_err();
    assert!(matches!(dup_email, StillMintError::InvalidInput(_)));

    let bad_wallet = svc.register("bob", "bob@example.com", "0x1234", PASSWORD).await.unwrap_err();
    assert!(matches!(bad_wallet, StillMintError::InvalidInput(_)));

    let bad_email = svc.register("carol", "   ", WALLET, PASSWORD).await.unwrap_err();
    assert!(matches!(bad_email, StillMintError::InvalidInput(_)));

    let short_password = svc.register("dave", "dave@example.com", WALLET, "12345").await.unwrap_err();
    assert!(matches!(short_password, StillMintError::InvalidInput(_)));

    assert_eq!(users.len(), 1);
    assert!(matches!(svc.profile("bob").await, Err(StillMintError::NotFound(_))));
}

#[tokio::test]
async fn password_is_stored_only_as_a_hash() {
    let users = MockUserRepository::default();
    let svc = UserService::new(Arc::new(users.clone()), clock());

    svc.register("alice", "alice@example.com", WALLET, PASSWORD).await.unwrap();

    let stored = users.password_hash("alice").unwrap();
    assert!(stored.starts_with("$argon2id$"), "{stored}");
    assert!(!stored.contains(PASSWORD));
}

#[tokio::test]
async fn login_returns_profile_for_matching_credentials() {
    let users = MockUserRepository::default();
    let svc = UserService::new(Arc::new(users), clock());
    let created = svc.register("alice", "alice@example.com", WALLET, PASSWORD).await.unwrap();

    let logged_in = svc.login(" Alice@Example.com ", PASSWORD).await.unwrap();
    assert_eq!(logged_in, created);
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_email_alike() {
    let users = MockUserRepository::default();
    let svc = UserService::new(Arc::new(users), clock());
    svc.register("alice", "alice@example.com", WALLET, PASSWORD).await.unwrap();

    let wrong = svc.login("alice@example.com", "sit-still-43").await.unwrap_err();
    let unknown = svc.login("nobody@example.com", PASSWORD).await.unwrap_err();

    assert!(matches!(wrong, StillMintError::InvalidInput(_)), "{wrong:?}");
    assert_eq!(wrong, unknown);
}

#[tokio::test]
async fn login_without_a_stored_password_is_rejected() {
    let users = MockUserRepository::default().with_profile(profile("alice"));
    let svc = UserService::new(Arc::new(users), clock());

    let err = svc.login("alice@example.com", "").await.unwrap_err();
    assert!(matches!(err, StillMintError::InvalidInput(_)), "{err:?}");
}

#[tokio::test]
async fn login_with_corrupted_stored_hash_is_internal() {
    let users = MockUserRepository::default().with_credentials(profile("alice"), "not-a-phc-string");
    let svc = UserService::new(Arc::new(users), clock());

    let err = svc.login("alice@example.com", PASSWORD).await.unwrap_err();
    assert!(matches!(err, StillMintError::Internal(_)), "{err:?}");
}
