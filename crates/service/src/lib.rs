//! Service layer for the auth gateway.
//! - Keeps registration/login rules independent of the web framework.
//! - Persistence sits behind `auth::repository::UserRepository`.

pub mod auth;
#[cfg(test)]
pub mod test_support;
