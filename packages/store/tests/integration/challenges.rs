use common::{ChallengeStatus, UserRole};
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};

use store::entity::{challenge, question, user};
use store::error::StoreError;
use store::models::challenge::NewQuestion;
use store::repository::challenges;

use crate::common::{TestDb, new_challenge};

#[tokio::test]
async fn admin_can_create_a_draft_challenge() {
    let test = TestDb::spawn().await;
    let admin = test.create_admin("admin1").await;

    let challenge = test.create_challenge(admin.id, "Math Sprint").await;

    assert_eq!(challenge.title, "Math Sprint");
    assert_eq!(challenge.status, ChallengeStatus::Draft);
    assert_eq!(challenge.administrator_id, admin.id);
}

#[tokio::test]
async fn non_admin_cannot_own_a_challenge() {
    let test = TestDb::spawn().await;
    let rep = test.create_user("rep1", UserRole::Representative).await;

    let err = challenges::create_challenge(&test.db, new_challenge(rep.id, "Nope"))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::NotAdministrator(id) if id == rep.id));
    assert!(challenge::Entity::find().all(&test.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_administrator_is_not_found() {
    let test = TestDb::spawn().await;
    let err = challenges::create_challenge(&test.db, new_challenge(77, "Orphan"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn inverted_dates_are_rejected() {
    let test = TestDb::spawn().await;
    let admin = test.create_admin("admin1").await;

    let mut input = new_challenge(admin.id, "Backwards");
    std::mem::swap(&mut input.start_date, &mut input.end_date);
    let err = challenges::create_challenge(&test.db, input)
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Validation(_)));
}

#[tokio::test]
async fn administrator_resolves_only_admin_users() {
    let test = TestDb::spawn().await;
    let admin = test.create_admin("admin1").await;
    let challenge = test.create_challenge(admin.id, "Math Sprint").await;

    let resolved = challenges::administrator(&test.db, &challenge).await.unwrap();
    assert_eq!(resolved.map(|u| u.id), Some(admin.id));

    // Demote behind the store's back: the reference now dangles silently.
    let mut demoted: user::ActiveModel = admin.into_active_model();
    demoted.role = Set(UserRole::Participant);
    demoted.update(&test.db).await.unwrap();

    let resolved = challenges::administrator(&test.db, &challenge).await.unwrap();
    assert!(resolved.is_none());
}

#[tokio::test]
async fn questions_come_back_in_insertion_order() {
    let test = TestDb::spawn().await;
    let admin = test.create_admin("admin1").await;
    let (challenge, created) = test.create_active_challenge(admin.id, "Quiz").await;

    let listed = challenges::questions(&test.db, &challenge).await.unwrap();
    let ids: Vec<i32> = listed.iter().map(|q| q.id).collect();
    let expected: Vec<i32> = created.iter().map(|q| q.id).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn question_count_matches_tracks_declared_number() {
    let test = TestDb::spawn().await;
    let admin = test.create_admin("admin1").await;
    let challenge = test.create_challenge(admin.id, "Quiz").await;

    assert!(!challenges::question_count_matches(&test.db, challenge.id).await.unwrap());

    for n in 0..challenge.number_of_questions {
        challenges::add_question(
            &test.db,
            challenge.id,
            NewQuestion {
                question_text: format!("Question {n}"),
                answer: n.to_string(),
                marks: 1,
            },
        )
        .await
        .unwrap();
    }

    assert!(challenges::question_count_matches(&test.db, challenge.id).await.unwrap());
}

#[tokio::test]
async fn list_challenges_filters_by_status() {
    let test = TestDb::spawn().await;
    let admin = test.create_admin("admin1").await;
    test.create_challenge(admin.id, "Draft one").await;
    let (active, _) = test.create_active_challenge(admin.id, "Live one").await;

    let all = challenges::list_challenges(&test.db, None).await.unwrap();
    assert_eq!(all.len(), 2);

    let live = challenges::list_challenges(&test.db, Some(ChallengeStatus::Active))
        .await
        .unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].id, active.id);
}

#[tokio::test]
async fn deleting_a_challenge_removes_its_questions_and_participants() {
    let test = TestDb::spawn().await;
    let admin = test.create_admin("admin1").await;
    let alice = test.create_user("alice", UserRole::Participant).await;
    let school = test.create_school("REG-001").await;
    let (challenge, _) = test.create_active_challenge(admin.id, "Quiz").await;
    let participant = test.enroll(alice.id, school.id, challenge.id).await;

    challenges::delete_challenge(&test.db, challenge.id).await.unwrap();

    assert!(challenges::find_challenge(&test.db, challenge.id).await.unwrap().is_none());
    assert!(question::Entity::find().all(&test.db).await.unwrap().is_empty());
    assert!(
        store::repository::participants::find_participant(&test.db, participant.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn administrator_with_challenges_cannot_be_deleted() {
    let test = TestDb::spawn().await;
    let admin = test.create_admin("admin1").await;
    test.create_challenge(admin.id, "Quiz").await;

    let err = user::Entity::delete_by_id(admin.id)
        .exec(&test.db)
        .await
        .map_err(StoreError::from)
        .unwrap_err();

    assert!(matches!(err, StoreError::ForeignKey(_)), "got {err:?}");
}
