pub mod auth;
pub mod health;
pub mod projects;

pub use auth::{login, register};
pub use health::{health_check, index};
pub use projects::{
    get_project, list_pending_projects, list_projects, list_student_projects, review_project,
    submit_project,
};
