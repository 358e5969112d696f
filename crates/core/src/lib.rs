//! SavorAI domain logic.
//!
//! Pure functions and plain data types shared by the Supabase client, the
//! recipe generator, and the HTTP API. Nothing in this crate performs I/O.

pub mod auth;
pub mod cursor;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod profile;
pub mod recipe;
pub mod types;
pub mod validation;
