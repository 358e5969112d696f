//! Session middleware and the authentication extractor.
//!
//! - [`session::resolve_session`] -- Resolves the cookie session on every
//!   request and redirects anonymous page requests to `/login`.
//! - [`auth::AuthUser`] -- Requires a signed-in user in API handlers.

pub mod auth;
pub mod session;
