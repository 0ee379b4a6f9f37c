use chrono::NaiveDate;
use common::{ChallengeStatus, UserRole};
use sea_orm::DatabaseConnection;

use store::config::DatabaseConfig;
use store::entity::{challenge, participant, question, school, user};
use store::models::challenge::{NewChallenge, NewQuestion};
use store::models::participant::NewParticipant;
use store::models::school::NewSchool;
use store::models::user::NewUser;
use store::repository::{challenges, participants, schools, users};

pub const PASSWORD: &str = "password123";

/// A migrated in-memory SQLite database.
///
/// The pool is pinned to a single connection; every new SQLite in-memory
/// connection would otherwise open an empty database.
pub struct TestDb {
    pub db: DatabaseConnection,
}

pub fn memory_config() -> DatabaseConfig {
    DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        connect_timeout_secs: 8,
        sqlx_logging: false,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn new_user(username: &str, role: UserRole) -> NewUser {
    NewUser {
        username: username.to_string(),
        firstname: "Test".to_string(),
        lastname: "User".to_string(),
        email: format!("{username}@example.com"),
        password: PASSWORD.to_string(),
        role,
        date_of_birth: date(2008, 5, 17),
        school_reg_no: None,
    }
}

pub fn new_challenge(administrator_id: i32, title: &str) -> NewChallenge {
    NewChallenge {
        title: title.to_string(),
        description: "Answer every question before time runs out.".to_string(),
        start_date: date(2099, 1, 1),
        end_date: date(2099, 1, 31),
        duration: 30,
        number_of_questions: 2,
        administrator_id,
    }
}

impl TestDb {
    pub async fn spawn() -> Self {
        Self::spawn_with(&memory_config()).await
    }

    /// A migrated database on an arbitrary connection config.
    pub async fn spawn_with(config: &DatabaseConfig) -> Self {
        let db = store::database::init_db(config)
            .await
            .expect("Failed to initialize database");
        Self { db }
    }

    pub async fn create_user(&self, username: &str, role: UserRole) -> user::Model {
        users::create_user(&self.db, new_user(username, role))
            .await
            .expect("Failed to create user")
    }

    pub async fn create_admin(&self, username: &str) -> user::Model {
        self.create_user(username, UserRole::Admin).await
    }

    pub async fn create_school(&self, registration_number: &str) -> school::Model {
        schools::create_school(
            &self.db,
            NewSchool {
                name: format!("School {registration_number}"),
                registration_number: registration_number.to_string(),
                district: Some("Central".to_string()),
                representative_id: None,
            },
        )
        .await
        .expect("Failed to create school")
    }

    pub async fn create_challenge(&self, administrator_id: i32, title: &str) -> challenge::Model {
        challenges::create_challenge(&self.db, new_challenge(administrator_id, title))
            .await
            .expect("Failed to create challenge")
    }

    /// An active challenge with two questions worth 2 and 3 marks.
    pub async fn create_active_challenge(
        &self,
        administrator_id: i32,
        title: &str,
    ) -> (challenge::Model, Vec<question::Model>) {
        let challenge = self.create_challenge(administrator_id, title).await;
        let mut questions = Vec::new();
        for (text, answer, marks) in [("2 + 2", "4", 2), ("Capital of Uganda", "Kampala", 3)] {
            let q = challenges::add_question(
                &self.db,
                challenge.id,
                NewQuestion {
                    question_text: text.to_string(),
                    answer: answer.to_string(),
                    marks,
                },
            )
            .await
            .expect("Failed to add question");
            questions.push(q);
        }
        let challenge =
            challenges::set_challenge_status(&self.db, challenge.id, ChallengeStatus::Active)
                .await
                .expect("Failed to activate challenge");
        (challenge, questions)
    }

    pub async fn enroll(
        &self,
        user_id: i32,
        school_id: i32,
        challenge_id: i32,
    ) -> participant::Model {
        participants::enroll_participant(
            &self.db,
            NewParticipant::new(user_id, school_id, challenge_id),
        )
        .await
        .expect("Failed to enroll participant")
    }
}
