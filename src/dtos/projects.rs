use crate::models::{Project, ReviewStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub message: String,
    pub project_id: String,
    pub review_no: i32,
    pub student_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewRequest {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    pub reason: Option<String>,
    pub mark: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: String,
    pub student_id: String,
    pub title: String,
    pub description: String,
    pub review_no: i32,
    pub document_url: String,
    pub file_type: String,
    pub file_name: String,
    pub status: ReviewStatus,
    pub mark: Option<f64>,
    pub review_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        let student_id = project.owner_student_id().to_string();
        Self {
            id: project.id,
            student_id,
            title: project.title,
            description: project.description,
            review_no: project.review_no,
            document_url: project.document_url,
            file_type: project.file_type,
            file_name: project.file_name,
            status: project.status,
            mark: project.mark,
            review_reason: project.review_reason,
            created_at: project.created_at,
            reviewed_at: project.reviewed_at.map(|dt| dt.to_chrono()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectResponse>,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetailResponse {
    pub project: ProjectResponse,
}
