//! Directory projection tests: what each tier sees, the shared-meeting
//! override and the effect of unlock grants, on an in-memory database.

use hub_server::auth::CurrentUser;
use hub_server::db::DbService;
use hub_server::db::repository::{meeting as meeting_repo, member as member_repo};
use hub_server::directory::build_directory;
use hub_server::services::UnlockService;
use shared::models::{MeetingCreate, MemberCreate, Role, VisibilityLevel};

async fn setup() -> DbService {
    DbService::new_in_memory()
        .await
        .expect("in-memory db should open")
}

async fn add_member(db: &DbService, name: &str, role: &str) -> i64 {
    member_repo::create(
        &db.pool,
        MemberCreate {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            company: Some("Acme".to_string()),
            position: None,
            phone: Some("555-0100".to_string()),
        },
        role,
        None,
    )
    .await
    .expect("member creation should succeed")
    .id
}

fn viewer(id: i64, role: Role) -> CurrentUser {
    CurrentUser {
        id,
        email: format!("viewer{id}@example.com"),
        name: format!("Viewer {id}"),
        role,
    }
}

fn entry<'a>(
    entries: &'a [hub_server::directory::DirectoryEntry],
    id: i64,
) -> &'a hub_server::directory::DirectoryEntry {
    entries
        .iter()
        .find(|e| e.id == id)
        .expect("entry should be present")
}

#[tokio::test]
async fn basic_member_sees_locked_entries_with_upgrade_hint() {
    let db = setup().await;
    let me = add_member(&db, "Basic Me", "basic").await;
    let other = add_member(&db, "Other One", "pro").await;

    let entries = build_directory(&db.pool, &viewer(me, Role::Basic), None)
        .await
        .expect("directory");

    let mine = entry(&entries, me);
    assert_eq!(mine.visibility, VisibilityLevel::Full);
    assert!(mine.email.is_some());

    let theirs = entry(&entries, other);
    assert_eq!(theirs.visibility, VisibilityLevel::Locked);
    assert!(theirs.email.is_none());
    assert!(theirs.phone.is_none());
    assert!(theirs.upgrade_required);
    assert!(!theirs.unlockable);
}

#[tokio::test]
async fn admin_sees_everything() {
    let db = setup().await;
    let admin = add_member(&db, "Admin", "admin").await;
    let other = add_member(&db, "Other One", "basic").await;

    let entries = build_directory(&db.pool, &viewer(admin, Role::Admin), None)
        .await
        .expect("directory");
    let theirs = entry(&entries, other);
    assert_eq!(theirs.visibility, VisibilityLevel::Full);
    assert!(theirs.email.is_some());
}

#[tokio::test]
async fn unlock_grant_reveals_target_for_pro_viewer() {
    let db = setup().await;
    let me = add_member(&db, "Pro Me", "pro").await;
    let target = add_member(&db, "Target", "basic").await;
    let bystander = add_member(&db, "Bystander", "basic").await;

    let unlock = UnlockService::new(db.pool.clone(), 5, 24 * 3_600_000);
    unlock.unlock_contact(me, target).await.expect("unlock");

    let entries = build_directory(&db.pool, &viewer(me, Role::Pro), None)
        .await
        .expect("directory");

    assert_eq!(entry(&entries, target).visibility, VisibilityLevel::Full);
    assert!(entry(&entries, target).email.is_some());

    let locked = entry(&entries, bystander);
    assert_eq!(locked.visibility, VisibilityLevel::Locked);
    assert!(locked.unlockable);
    assert!(!locked.upgrade_required);
}

#[tokio::test]
async fn shared_meeting_reveals_participants_to_basic_viewer() {
    let db = setup().await;
    let me = add_member(&db, "Basic Me", "basic").await;
    let colleague = add_member(&db, "Colleague", "basic").await;
    let stranger = add_member(&db, "Stranger", "basic").await;

    meeting_repo::create(
        &db.pool,
        MeetingCreate {
            title: "Kickoff".to_string(),
            date: "2026-01-10".to_string(),
            time: None,
            location: None,
            summary: None,
            participants: vec![me, colleague],
        },
    )
    .await
    .expect("meeting creation");

    let entries = build_directory(&db.pool, &viewer(me, Role::Basic), None)
        .await
        .expect("directory");

    let met = entry(&entries, colleague);
    assert_eq!(met.visibility, VisibilityLevel::Full);
    assert!(met.met_in_meeting);

    let unmet = entry(&entries, stranger);
    assert_eq!(unmet.visibility, VisibilityLevel::Locked);
    assert!(!unmet.met_in_meeting);
}

#[tokio::test]
async fn search_filters_by_name_case_insensitively() {
    let db = setup().await;
    let me = add_member(&db, "Searcher", "basic").await;
    let hit = add_member(&db, "Ana Gomez", "basic").await;
    add_member(&db, "Benjamin Oduya", "basic").await;

    let entries = build_directory(&db.pool, &viewer(me, Role::Basic), Some("gomez"))
        .await
        .expect("directory");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, hit);
}
