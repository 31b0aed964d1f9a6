pub mod admin;
pub mod auth;
pub mod chirps;
pub mod error;
pub mod extract;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod router;
pub mod sessions;
pub mod state;
pub mod users;
pub mod webhooks;
