use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Schools::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schools::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schools::Name).string().not_null())
                    .col(
                        ColumnDef::new(Schools::RegistrationNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Schools::District).string().null())
                    .col(ColumnDef::new(Schools::RepresentativeId).integer().null())
                    .col(
                        ColumnDef::new(Schools::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Schools::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schools_representative_id")
                            .from(Schools::Table, Schools::RepresentativeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Challenges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Challenges::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Challenges::Title).string().not_null())
                    .col(ColumnDef::new(Challenges::Description).text().not_null())
                    .col(ColumnDef::new(Challenges::StartDate).date().not_null())
                    .col(ColumnDef::new(Challenges::EndDate).date().not_null())
                    .col(ColumnDef::new(Challenges::Duration).integer().not_null())
                    .col(
                        ColumnDef::new(Challenges::NumberOfQuestions)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Challenges::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Challenges::AdministratorId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Challenges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Challenges::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // An administrator cannot be deleted while owning challenges.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_challenges_administrator_id")
                            .from(Challenges::Table, Challenges::AdministratorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Questions::ChallengeId).integer().not_null())
                    .col(ColumnDef::new(Questions::QuestionText).text().not_null())
                    .col(ColumnDef::new(Questions::Answer).text().not_null())
                    .col(
                        ColumnDef::new(Questions::Marks)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Questions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Questions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_questions_challenge_id")
                            .from(Questions::Table, Questions::ChallengeId)
                            .to(Challenges::Table, Challenges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Participants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Participants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Participants::UserId).integer().not_null())
                    .col(ColumnDef::new(Participants::SchoolId).integer().not_null())
                    .col(
                        ColumnDef::new(Participants::ChallengeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Participants::AttemptsLeft)
                            .integer()
                            .not_null()
                            .default(3),
                    )
                    .col(
                        ColumnDef::new(Participants::TotalScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Participants::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Participants::TimeTaken)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Participants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Participants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participants_user_id")
                            .from(Participants::Table, Participants::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participants_school_id")
                            .from(Participants::Table, Participants::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participants_challenge_id")
                            .from(Participants::Table, Participants::ChallengeId)
                            .to(Challenges::Table, Challenges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One enrolment per user and challenge.
        manager
            .create_index(
                Index::create()
                    .name("idx_participants_user_challenge")
                    .table(Participants::Table)
                    .col(Participants::UserId)
                    .col(Participants::ChallengeId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_participants_challenge_id")
                    .table(Participants::Table)
                    .col(Participants::ChallengeId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChallengeParticipants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChallengeParticipants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ChallengeParticipants::ChallengeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChallengeParticipants::ParticipantId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChallengeParticipants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChallengeParticipants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_challenge_participants_challenge_id")
                            .from(
                                ChallengeParticipants::Table,
                                ChallengeParticipants::ChallengeId,
                            )
                            .to(Challenges::Table, Challenges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_challenge_participants_participant_id")
                            .from(
                                ChallengeParticipants::Table,
                                ChallengeParticipants::ParticipantId,
                            )
                            .to(Participants::Table, Participants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_challenge_participants_pair")
                    .table(ChallengeParticipants::Table)
                    .col(ChallengeParticipants::ChallengeId)
                    .col(ChallengeParticipants::ParticipantId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Attempts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attempts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attempts::ParticipantId).integer().not_null())
                    .col(ColumnDef::new(Attempts::ChallengeId).integer().not_null())
                    .col(ColumnDef::new(Attempts::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Attempts::AttemptsLeftAfter)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Attempts::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Attempts::SubmittedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attempts_participant_id")
                            .from(Attempts::Table, Attempts::ParticipantId)
                            .to(Participants::Table, Participants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attempts_challenge_id")
                            .from(Attempts::Table, Attempts::ChallengeId)
                            .to(Challenges::Table, Challenges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChallengeAttempts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChallengeAttempts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ChallengeAttempts::AttemptId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ChallengeAttempts::ChallengeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChallengeAttempts::ParticipantId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChallengeAttempts::Score)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ChallengeAttempts::TimeTaken)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ChallengeAttempts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_challenge_attempts_attempt_id")
                            .from(ChallengeAttempts::Table, ChallengeAttempts::AttemptId)
                            .to(Attempts::Table, Attempts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_challenge_attempts_challenge_id")
                            .from(ChallengeAttempts::Table, ChallengeAttempts::ChallengeId)
                            .to(Challenges::Table, Challenges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_challenge_attempts_participant_id")
                            .from(
                                ChallengeAttempts::Table,
                                ChallengeAttempts::ParticipantId,
                            )
                            .to(Participants::Table, Participants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AttemptedQuestions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttemptedQuestions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttemptedQuestions::ChallengeAttemptId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttemptedQuestions::ChallengeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttemptedQuestions::ParticipantId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttemptedQuestions::QuestionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttemptedQuestions::GivenAnswer)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttemptedQuestions::MarksAwarded)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AttemptedQuestions::TimeSpentMs)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AttemptedQuestions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attempted_questions_challenge_attempt_id")
                            .from(
                                AttemptedQuestions::Table,
                                AttemptedQuestions::ChallengeAttemptId,
                            )
                            .to(ChallengeAttempts::Table, ChallengeAttempts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attempted_questions_challenge_id")
                            .from(AttemptedQuestions::Table, AttemptedQuestions::ChallengeId)
                            .to(Challenges::Table, Challenges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attempted_questions_participant_id")
                            .from(
                                AttemptedQuestions::Table,
                                AttemptedQuestions::ParticipantId,
                            )
                            .to(Participants::Table, Participants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attempted_questions_question_id")
                            .from(AttemptedQuestions::Table, AttemptedQuestions::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children before parents.
        for table in [
            AttemptedQuestions::Table.into_iden(),
            ChallengeAttempts::Table.into_iden(),
            Attempts::Table.into_iden(),
            ChallengeParticipants::Table.into_iden(),
            Participants::Table.into_iden(),
            Questions::Table.into_iden(),
            Challenges::Table.into_iden(),
            Schools::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Schools {
    Table,
    Id,
    Name,
    RegistrationNumber,
    District,
    RepresentativeId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Challenges {
    Table,
    Id,
    Title,
    Description,
    StartDate,
    EndDate,
    Duration,
    NumberOfQuestions,
    Status,
    AdministratorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Questions {
    Table,
    Id,
    ChallengeId,
    QuestionText,
    Answer,
    Marks,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Participants {
    Table,
    Id,
    UserId,
    SchoolId,
    ChallengeId,
    AttemptsLeft,
    TotalScore,
    Completed,
    TimeTaken,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ChallengeParticipants {
    Table,
    Id,
    ChallengeId,
    ParticipantId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Attempts {
    Table,
    Id,
    ParticipantId,
    ChallengeId,
    Status,
    AttemptsLeftAfter,
    StartedAt,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum ChallengeAttempts {
    Table,
    Id,
    AttemptId,
    ChallengeId,
    ParticipantId,
    Score,
    TimeTaken,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AttemptedQuestions {
    Table,
    Id,
    ChallengeAttemptId,
    ChallengeId,
    ParticipantId,
    QuestionId,
    GivenAnswer,
    MarksAwarded,
    TimeSpentMs,
    CreatedAt,
}
