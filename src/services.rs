// src/services.rs

pub mod approval;
pub mod auth;
pub mod document_service;
pub mod identity;
pub mod leave_request_service;
pub mod profile_service;
pub mod visibility;
