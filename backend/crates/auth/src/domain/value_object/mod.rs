pub mod credential;
pub mod email;
pub mod role;
