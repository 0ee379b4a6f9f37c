//! Query and write functions over the entities.
//!
//! Every function is generic over the connection so it can run on the pool
//! or inside a caller's transaction. Relationships are plain queries that
//! read the current persisted state; nothing is cached on the models.

pub mod attempts;
pub mod challenges;
pub mod participants;
pub mod password_resets;
pub mod schools;
pub mod sessions;
pub mod users;
