// src/handlers.rs

pub mod auth;
pub mod documents;
pub mod leave_requests;
pub mod organization;
pub mod profile;
