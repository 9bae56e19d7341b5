use crate::dtos::{
    ProjectDetailResponse, ProjectListResponse, ProjectResponse, ReviewRequest, ReviewResponse,
    SubmitResponse,
};
use crate::error::AppError;
use crate::models::{Project, ReviewStatus, Role, MAX_REVIEW_ROUNDS};
use crate::services::student_filter;
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::FindOptions;
use uuid::Uuid;

const MAX_DOCUMENT_BYTES: usize = 20 * 1024 * 1024;

struct UploadedDocument {
    file_name: String,
    mime_type: String,
    data: Vec<u8>,
}

pub async fn submit_project(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut document: Option<UploadedDocument> = None;
    let mut student_id: Option<String> = None;
    let mut title = String::new();
    let mut description = String::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
    })? {
        match field.name().unwrap_or("") {
            "document" => {
                let file_name = field.file_name().unwrap_or("unnamed").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e))
                    })?
                    .to_vec();
                document = Some(UploadedDocument {
                    file_name,
                    mime_type,
                    data,
                });
            }
            "studentId" => {
                student_id = Some(field.text().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read studentId field: {}", e))
                })?);
            }
            "title" => {
                title = field.text().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read title field: {}", e))
                })?;
            }
            "description" => {
                description = field.text().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read description field: {}", e))
                })?;
            }
            _ => {}
        }
    }

    let student_id = student_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("studentId is required")))?;
    let document = document
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("No document file attached")))?;

    if document.data.len() > MAX_DOCUMENT_BYTES {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "File too large (max 20MB)"
        )));
    }

    state
        .db
        .accounts(Role::Student)
        .find_one(doc! { "_id": &student_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Student not found")))?;

    // Review numbers are allocated by counting the student's existing
    // projects. The gate serializes count + insert so two concurrent
    // submissions cannot observe the same count.
    let _allocation = state.submission_gate.lock().await;

    let existing = state
        .db
        .projects()
        .count_documents(student_filter(&student_id), None)
        .await? as i64;

    if existing >= MAX_REVIEW_ROUNDS {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Review limit reached: at most {} submissions per student",
            MAX_REVIEW_ROUNDS
        )));
    }
    let review_no = existing as i32 + 1;

    let extension = std::path::Path::new(&document.file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("bin");
    let storage_key = format!("documents/{}.{}", Uuid::new_v4(), extension);
    let document_url = format!(
        "{}/{}",
        state.config.storage.public_path.trim_end_matches('/'),
        storage_key
    );

    state
        .storage
        .upload(&storage_key, document.data)
        .await
        .map_err(|e| {
            tracing::error!("Failed to write document {} to storage: {}", storage_key, e);
            e
        })?;

    let project = Project::new(
        student_id.clone(),
        title,
        description,
        review_no,
        document_url,
        document.mime_type,
        document.file_name,
    );

    state.db.projects().insert_one(&project, None).await?;

    tracing::info!(
        project_id = %project.id,
        student_id = %student_id,
        review_no = review_no,
        "Project submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: "Project submitted".to_string(),
            project_id: project.id,
            review_no,
            student_id,
        }),
    ))
}

pub async fn review_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    ValidatedJson(req): ValidatedJson<ReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let status = req
        .status
        .parse::<ReviewStatus>()
        .ok()
        .filter(ReviewStatus::is_decision)
        .ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!("Status must be approve or reject"))
        })?;

    let mark = req.mark.map(Bson::Double).unwrap_or(Bson::Null);
    let reason = req.reason.map(Bson::String).unwrap_or(Bson::Null);

    // Re-reviewing simply overwrites the previous decision.
    let result = state
        .db
        .projects()
        .update_one(
            doc! { "_id": &project_id },
            doc! { "$set": {
                "status": status.as_str(),
                "mark": mark,
                "review_reason": reason,
                "reviewed_at": Bson::DateTime(mongodb::bson::DateTime::now()),
            }},
            None,
        )
        .await?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Project not found")));
    }

    tracing::info!(
        project_id = %project_id,
        status = %status.as_str(),
        "Review decision recorded"
    );

    Ok(Json(ReviewResponse {
        message: "Review recorded".to_string(),
    }))
}

async fn find_projects(state: &AppState, filter: Document) -> Result<Vec<ProjectResponse>, AppError> {
    let find_options = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();

    let mut cursor = state.db.projects().find(filter, find_options).await?;

    let mut projects = Vec::new();
    while let Some(project) = cursor.try_next().await? {
        projects.push(ProjectResponse::from(project));
    }
    Ok(projects)
}

pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let projects = find_projects(&state, doc! {}).await?;
    Ok(Json(ProjectListResponse { projects }))
}

pub async fn list_pending_projects(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let projects =
        find_projects(&state, doc! { "status": ReviewStatus::Pending.as_str() }).await?;
    Ok(Json(ProjectListResponse { projects }))
}

pub async fn list_student_projects(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let projects = find_projects(&state, student_filter(&student_id)).await?;
    Ok(Json(ProjectListResponse { projects }))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let project = state
        .db
        .projects()
        .find_one(doc! { "_id": &project_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Project not found")))?;

    Ok(Json(ProjectDetailResponse {
        project: ProjectResponse::from(project),
    }))
}
