pub mod auth;
pub mod projects;

pub use auth::{AccountResponse, AuthResponse, LoginRequest, RegisterRequest};
pub use projects::{
    ProjectDetailResponse, ProjectListResponse, ProjectResponse, ReviewRequest, ReviewResponse,
    SubmitResponse,
};
