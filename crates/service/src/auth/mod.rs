//! Auth module: domain, repository, store, token issuer and service layers.
//!
//! `AuthService` orchestrates registration and login on top of `UserStore`
//! (hashing + persistence) and `TokenIssuer` (JWT minting).

pub mod domain;
pub mod errors;
pub mod repository;
pub mod repo;
pub mod store;
pub mod token;
pub mod service;

pub use errors::AuthError;
pub use service::AuthService;
