//! HRM leave lifecycle service: leave requests, their notifications, attendance
//! and payroll behind a JWT-protected actix-web API.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod model;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;
pub mod utils;
