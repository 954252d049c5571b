//! End-to-end tests for the contact unlock flow on an in-memory
//! database: credit consumption, exhaustion, the monthly rollover and
//! grant expiry windows.

use hub_server::db::DbService;
use hub_server::db::repository::{grant as grant_repo, member as member_repo};
use hub_server::services::{QuotaService, UnlockService};
use hub_server::utils::AppError;
use shared::models::MemberCreate;
use shared::util::{current_period, now_millis};

const MAX_CREDITS: i64 = 5;
const GRANT_MS: i64 = 24 * 3_600_000;

async fn setup() -> (DbService, UnlockService, QuotaService) {
    let db = DbService::new_in_memory()
        .await
        .expect("in-memory db should open");
    let unlock = UnlockService::new(db.pool.clone(), MAX_CREDITS, GRANT_MS);
    let quota = QuotaService::new(db.pool.clone(), MAX_CREDITS);
    (db, unlock, quota)
}

async fn add_member(db: &DbService, name: &str, role: &str) -> i64 {
    let member = member_repo::create(
        &db.pool,
        MemberCreate {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            company: None,
            position: None,
            phone: None,
        },
        role,
        None,
    )
    .await
    .expect("member creation should succeed");
    member.id
}

#[tokio::test]
async fn unlock_spends_credits_until_exhausted() {
    let (db, unlock, quota) = setup().await;
    let viewer = add_member(&db, "Pro Viewer", "pro").await;

    let mut targets = Vec::new();
    for i in 0..MAX_CREDITS {
        targets.push(add_member(&db, &format!("Target {i}"), "basic").await);
    }
    let one_more = add_member(&db, "Target Extra", "basic").await;

    for (i, target) in targets.iter().enumerate() {
        let outcome = unlock
            .unlock_contact(viewer, *target)
            .await
            .expect("unlock should succeed while credits remain");
        assert!(outcome.charged);
        assert_eq!(outcome.quota.used_count, i as i64 + 1);
    }

    let state = quota.state(viewer).await.expect("quota state");
    assert_eq!(state.used_count, MAX_CREDITS);
    assert!(state.is_exhausted());
    assert_eq!(state.credits_remaining(), 0);

    let err = unlock
        .unlock_contact(viewer, one_more)
        .await
        .expect_err("sixth unlock must fail");
    assert!(matches!(err, AppError::QuotaExhausted));

    // The failed unlock must not leave a grant behind.
    let grant = grant_repo::find(&db.pool, viewer, one_more)
        .await
        .expect("grant lookup");
    assert!(grant.is_none());
}

#[tokio::test]
async fn reunlock_of_active_grant_is_free_and_extends_expiry() {
    let (db, unlock, _) = setup().await;
    let viewer = add_member(&db, "Pro Viewer", "pro").await;
    let target = add_member(&db, "Target", "basic").await;

    let first = unlock
        .unlock_contact(viewer, target)
        .await
        .expect("first unlock");
    assert!(first.charged);
    assert_eq!(first.quota.used_count, 1);

    let second = unlock
        .unlock_contact(viewer, target)
        .await
        .expect("second unlock");
    assert!(!second.charged);
    assert_eq!(second.quota.used_count, 1);
    assert!(second.grant.expires_at >= first.grant.expires_at);
    // Original unlock time survives the refresh.
    assert_eq!(second.grant.unlocked_at, first.grant.unlocked_at);
}

#[tokio::test]
async fn expired_grant_is_invisible_and_reunlock_charges_again() {
    let (db, unlock, _) = setup().await;
    let viewer = add_member(&db, "Pro Viewer", "pro").await;
    let target = add_member(&db, "Target", "basic").await;

    unlock
        .unlock_contact(viewer, target)
        .await
        .expect("first unlock");

    // Age the grant past its window.
    sqlx::query("UPDATE unlock_grant SET expires_at = ? WHERE member_id = ? AND target_id = ?")
        .bind(now_millis() - 1)
        .bind(viewer)
        .bind(target)
        .execute(&db.pool)
        .await
        .expect("expiry rewrite");

    let active = grant_repo::list_active_targets(&db.pool, viewer, now_millis())
        .await
        .expect("active targets");
    assert!(active.is_empty());

    let again = unlock
        .unlock_contact(viewer, target)
        .await
        .expect("re-unlock after expiry");
    assert!(again.charged);
    assert_eq!(again.quota.used_count, 2);
    assert!(again.grant.is_active(now_millis()));
}

#[tokio::test]
async fn stale_period_reads_as_fresh_allowance_and_resets_on_consume() {
    let (db, unlock, quota) = setup().await;
    let viewer = add_member(&db, "Pro Viewer", "pro").await;
    let target = add_member(&db, "Target", "basic").await;

    // Exhausted ledger from a previous month.
    sqlx::query("UPDATE member SET quota_period = '2020-01', quota_used = ? WHERE id = ?")
        .bind(MAX_CREDITS)
        .bind(viewer)
        .execute(&db.pool)
        .await
        .expect("ledger rewrite");

    let state = quota.state(viewer).await.expect("quota state");
    assert_eq!(state.used_count, 0);
    assert_eq!(state.period, current_period());

    let outcome = unlock
        .unlock_contact(viewer, target)
        .await
        .expect("unlock should reset the stale window");
    assert!(outcome.charged);
    assert_eq!(outcome.quota.used_count, 1);
    assert_eq!(outcome.quota.period, current_period());
}

#[tokio::test]
async fn self_unlock_and_missing_target_are_rejected() {
    let (db, unlock, _) = setup().await;
    let viewer = add_member(&db, "Pro Viewer", "pro").await;

    let err = unlock
        .unlock_contact(viewer, viewer)
        .await
        .expect_err("self unlock must fail");
    assert!(matches!(err, AppError::Validation(_)));

    let err = unlock
        .unlock_contact(viewer, 999_999)
        .await
        .expect_err("unknown target must fail");
    assert!(matches!(err, AppError::MemberNotFound(_)));

    // Neither attempt may touch the ledger.
    let member = member_repo::find_by_id(&db.pool, viewer)
        .await
        .expect("member lookup")
        .expect("member exists");
    assert_eq!(member.quota_used, 0);
}

#[tokio::test]
async fn quota_state_without_any_unlock_is_untouched() {
    let (db, _, quota) = setup().await;
    let viewer = add_member(&db, "Fresh Member", "pro").await;

    let state = quota.state(viewer).await.expect("quota state");
    assert_eq!(state.used_count, 0);
    assert_eq!(state.max_credits, MAX_CREDITS);
    assert_eq!(state.credits_remaining(), MAX_CREDITS);

    // Reading must not persist a period.
    let member = member_repo::find_by_id(&db.pool, viewer)
        .await
        .expect("member lookup")
        .expect("member exists");
    assert!(member.quota_period.is_none());
}
