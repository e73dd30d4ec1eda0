pub mod auth;
pub mod db;
pub mod error;
pub mod geo;
pub mod handlers;
pub mod models;
pub mod notify;

pub use db::create_pool;
