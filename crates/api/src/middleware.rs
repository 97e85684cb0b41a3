/// Session resolution and clinic scoping for protected routes
pub mod auth;
/// Mapping of domain errors to HTTP responses
pub mod error_handling;
