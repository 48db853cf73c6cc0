//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of vocabulary shared by every
//! domain crate:
//! - Unified error type and result aliases
//! - Typed ID primitives
//!
//! **Design Principle**: only things that are "hard to change" and mean the
//! same thing in every domain belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
