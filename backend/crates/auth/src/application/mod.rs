pub mod add_employee;
pub mod check_session;
pub mod config;
pub mod csrf;
pub mod hasher;
pub mod outbox;
pub mod recovery;
pub mod sign_in;
pub mod sign_out;
pub mod strategy;
pub mod token;
