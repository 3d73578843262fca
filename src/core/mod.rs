pub mod app;
pub mod backend;
pub mod cache_panel;
pub mod config;
pub mod connection;
pub mod constants;
pub mod guidance;
pub mod message;
pub mod query_service;
pub mod session;
pub mod typing;
