//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, random tokens, Base64)
//! - Password hashing (Argon2id with per-call random salt)
//! - Cookie management
//! - SMTP mail delivery

pub mod cookie;
pub mod crypto;
pub mod mailer;
pub mod password;
