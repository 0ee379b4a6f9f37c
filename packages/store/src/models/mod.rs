pub mod attempt;
pub mod challenge;
pub mod participant;
pub mod school;
pub mod session;
pub mod shared;
pub mod user;
