//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireManager`] -- Requires a category-managing role and yields
//!   the tenant-scoped access context.
//! - [`locale::ActiveLocale`] -- Locale negotiated from `Accept-Language`.

pub mod auth;
pub mod locale;
pub mod rbac;
