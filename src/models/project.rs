use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Each student gets at most this many review rounds.
pub const MAX_REVIEW_ROUNDS: i64 = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approve,
    Reject,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approve => "approve",
            ReviewStatus::Reject => "reject",
        }
    }

    /// Whether this status is a valid faculty decision.
    pub fn is_decision(&self) -> bool {
        matches!(self, ReviewStatus::Approve | ReviewStatus::Reject)
    }
}

impl std::str::FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ReviewStatus::Pending),
            "approve" => Ok(ReviewStatus::Approve),
            "reject" => Ok(ReviewStatus::Reject),
            _ => Err(format!("Invalid review status: {}", s)),
        }
    }
}

/// Student reference as written by pre-flattening revisions, which stored
/// projects under a nested sub-document instead of a top-level `student_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyStudentRef {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student: Option<LegacyStudentRef>,
    pub title: String,
    pub description: String,
    pub review_no: i32,
    pub document_url: String,
    pub file_type: String,
    pub file_name: String,
    pub status: ReviewStatus,
    pub mark: Option<f64>,
    pub review_reason: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<mongodb::bson::DateTime>,
}

impl Project {
    pub fn new(
        student_id: String,
        title: String,
        description: String,
        review_no: i32,
        document_url: String,
        file_type: String,
        file_name: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id,
            student: None,
            title,
            description,
            review_no,
            document_url,
            file_type,
            file_name,
            status: ReviewStatus::Pending,
            mark: None,
            review_reason: None,
            created_at: Utc::now(),
            reviewed_at: None,
        }
    }

    /// Owning student id, resolving the legacy nested shape when the
    /// top-level field is absent.
    pub fn owner_student_id(&self) -> &str {
        if !self.student_id.is_empty() {
            &self.student_id
        } else {
            self.student.as_ref().map(|s| s.id.as_str()).unwrap_or("")
        }
    }
}
