pub mod attempt;
pub mod attempted_question;
pub mod challenge;
pub mod challenge_attempt;
pub mod challenge_participant;
pub mod participant;
pub mod password_reset_token;
pub mod question;
pub mod school;
pub mod session;
pub mod user;
