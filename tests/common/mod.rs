use submission_service::config::SubmissionConfig;
use submission_service::services::MongoDb;
use submission_service::startup::Application;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: MongoDb,
    pub db_name: String,
    pub storage_path: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        if std::env::var("MONGODB_URI").is_err() {
            std::env::set_var("MONGODB_URI", "mongodb://localhost:27017");
        }

        let db_name = format!("submission_test_{}", Uuid::new_v4());
        let storage_path = format!("target/test-storage-{}", Uuid::new_v4());

        let mut config = SubmissionConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.mongodb.database = db_name.clone();
        config.storage.local_path = storage_path.clone();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept requests.
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name,
            storage_path,
            client,
        }
    }

    /// Register an account and return its id from the response body.
    pub async fn register(&self, email: &str, role: &str) -> String {
        let response = self
            .client
            .post(format!("{}/register", self.address))
            .json(&serde_json::json!({
                "name": "Test Account",
                "email": email,
                "password": "password123",
                "role": role,
            }))
            .send()
            .await
            .expect("Failed to execute register request");
        assert_eq!(201, response.status().as_u16());

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        body["user"]["id"]
            .as_str()
            .expect("register response missing user id")
            .to_string()
    }

    /// Submit a project document for a student via multipart upload.
    pub async fn submit_project(&self, student_id: &str, file_name: &str) -> reqwest::Response {
        let form = reqwest::multipart::Form::new()
            .text("studentId", student_id.to_string())
            .text("title", "Test Project")
            .text("description", "A test submission")
            .part(
                "document",
                reqwest::multipart::Part::bytes(vec![0u8; 128])
                    .file_name(file_name.to_string())
                    .mime_str("application/pdf")
                    .unwrap(),
            );

        self.client
            .post(format!("{}/project/submit", self.address))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute submit request")
    }

    /// Cleanup test resources (database and storage).
    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
        let _ = tokio::fs::remove_dir_all(&self.storage_path).await;
    }
}
