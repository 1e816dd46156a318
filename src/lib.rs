pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod migrations;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod sink;
pub mod store;
pub mod version;
