pub mod user_repo;
pub use user_repo::UserRepository;
pub mod profile_repo;
pub use profile_repo::ProfileRepository;
pub mod organization_repo;
pub use organization_repo::OrganizationRepository;
pub mod leave_request_repo;
pub use leave_request_repo::LeaveRequestRepository;
