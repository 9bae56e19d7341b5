pub mod account;
pub mod project;

pub use account::{Account, Role};
pub use project::{Project, ReviewStatus, MAX_REVIEW_ROUNDS};
