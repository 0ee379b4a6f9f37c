use common::UserRole;
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};

use store::error::StoreError;
use store::models::session::NewSession;
use store::repository::sessions;

use crate::common::TestDb;

fn browser_session(user_id: Option<i32>) -> NewSession {
    NewSession {
        user_id,
        ip_address: Some("192.168.1.20".into()),
        user_agent: Some("Mozilla/5.0".into()),
        payload: "{}".into(),
    }
}

#[tokio::test]
async fn create_and_find_session() {
    let test = TestDb::spawn().await;
    let alice = test.create_user("alice", UserRole::Participant).await;

    let session = sessions::create_session(&test.db, browser_session(Some(alice.id)))
        .await
        .unwrap();
    assert_eq!(session.id.len(), 64);

    let found = sessions::find_session(&test.db, &session.id).await.unwrap();
    assert_eq!(found, Some(session));
}

#[tokio::test]
async fn guest_sessions_have_no_user() {
    let test = TestDb::spawn().await;
    let session = sessions::create_session(&test.db, browser_session(None))
        .await
        .unwrap();
    assert!(session.user_id.is_none());
}

#[tokio::test]
async fn touch_updates_payload_and_activity() {
    let test = TestDb::spawn().await;
    let session = sessions::create_session(&test.db, browser_session(None))
        .await
        .unwrap();

    let mut stale = session.clone().into_active_model();
    stale.last_activity = Set(0);
    stale.update(&test.db).await.unwrap();

    let touched = sessions::touch_session(&test.db, &session.id, Some("{\"cart\":1}".into()))
        .await
        .unwrap();
    assert!(touched.last_activity > 0);
    assert_eq!(touched.payload, "{\"cart\":1}");
}

#[tokio::test]
async fn delete_user_sessions_logs_out_everywhere() {
    let test = TestDb::spawn().await;
    let alice = test.create_user("alice", UserRole::Participant).await;
    let bob = test.create_user("bob", UserRole::Participant).await;
    for _ in 0..2 {
        sessions::create_session(&test.db, browser_session(Some(alice.id)))
            .await
            .unwrap();
    }
    sessions::create_session(&test.db, browser_session(Some(bob.id)))
        .await
        .unwrap();

    assert_eq!(sessions::user_sessions(&test.db, alice.id).await.unwrap().len(), 2);
    assert_eq!(sessions::delete_user_sessions(&test.db, alice.id).await.unwrap(), 2);
    assert!(sessions::user_sessions(&test.db, alice.id).await.unwrap().is_empty());
    assert_eq!(sessions::user_sessions(&test.db, bob.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_session_reports_whether_it_existed() {
    let test = TestDb::spawn().await;
    let session = sessions::create_session(&test.db, browser_session(None))
        .await
        .unwrap();

    assert!(sessions::delete_session(&test.db, &session.id).await.unwrap());
    assert!(!sessions::delete_session(&test.db, &session.id).await.unwrap());
}

#[tokio::test]
async fn prune_removes_only_idle_sessions() {
    let test = TestDb::spawn().await;
    let idle = sessions::create_session(&test.db, browser_session(None))
        .await
        .unwrap();
    let fresh = sessions::create_session(&test.db, browser_session(None))
        .await
        .unwrap();

    let mut old = idle.clone().into_active_model();
    old.last_activity = Set(chrono::Utc::now().timestamp() - 10_000);
    old.update(&test.db).await.unwrap();

    assert_eq!(sessions::prune_sessions(&test.db, 7_200).await.unwrap(), 1);
    assert!(sessions::find_session(&test.db, &idle.id).await.unwrap().is_none());
    assert!(sessions::find_session(&test.db, &fresh.id).await.unwrap().is_some());
}

#[tokio::test]
async fn deleting_a_user_detaches_their_sessions() {
    use sea_orm::EntityTrait;
    use store::entity::user;

    let test = TestDb::spawn().await;
    let alice = test.create_user("alice", UserRole::Participant).await;
    let session = sessions::create_session(&test.db, browser_session(Some(alice.id)))
        .await
        .unwrap();

    user::Entity::delete_by_id(alice.id).exec(&test.db).await.unwrap();

    let orphan = sessions::find_session(&test.db, &session.id)
        .await
        .unwrap()
        .unwrap();
    assert!(orphan.user_id.is_none());
}

#[tokio::test]
async fn session_for_missing_user_is_a_foreign_key_error() {
    let test = TestDb::spawn().await;

    let err = sessions::create_session(&test.db, browser_session(Some(4242)))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::ForeignKey(_)), "got {err:?}");
}
