pub mod auth;
pub mod leave_request;
pub mod organization;
pub mod profile;
