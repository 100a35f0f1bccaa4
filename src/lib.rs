pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod presentation;
pub mod services;
pub mod state;
pub mod ui;
