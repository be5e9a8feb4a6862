pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handler;
pub mod model;
pub mod routes;
pub mod store;

pub use routes::app;
