use crate::error::AppError;
use crate::models::{Account, Project, Role};
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Client as MongoClient, Collection, Database, IndexModel,
};

/// Filter matching a student's projects in both document shapes: the
/// flattened `student_id` field and the nested `student.id` reference kept
/// by records written before the flattening migration.
pub fn student_filter(student_id: &str) -> Document {
    doc! {
        "$or": [
            { "student_id": student_id },
            { "student.id": student_id },
        ]
    }
}

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for submission-service");

        // Emails are unique within each role partition, not across them.
        for role in [Role::Student, Role::Faculty] {
            let email_index = IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("email_unique".to_string())
                        .build(),
                )
                .build();

            self.accounts(role)
                .create_index(email_index, None)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to create email index on {} collection: {}",
                        role.collection_name(),
                        e
                    );
                    AppError::from(e)
                })?;
            tracing::info!("Created unique index on {}.email", role.collection_name());
        }

        let student_index = IndexModel::builder()
            .keys(doc! { "student_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("student_lookup".to_string())
                    .build(),
            )
            .build();

        self.projects()
            .create_index(student_index, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create student_id index on projects collection: {}",
                    e
                );
                AppError::from(e)
            })?;
        tracing::info!("Created index on projects.student_id");

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn accounts(&self, role: Role) -> Collection<Account> {
        self.db.collection(role.collection_name())
    }

    pub fn projects(&self) -> Collection<Project> {
        self.db.collection("projects")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
