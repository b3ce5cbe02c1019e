//! Repositories over the in-memory [`Store`](crate::Store).

pub mod issue_repo;
pub mod media_repo;
pub mod user_repo;

pub use issue_repo::IssueRepo;
pub use media_repo::MediaRepo;
pub use user_repo::UserRepo;
