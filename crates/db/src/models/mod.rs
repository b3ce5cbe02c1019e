pub mod issue;
pub mod media;
pub mod user;
