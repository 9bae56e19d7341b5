use crate::config::SubmissionConfig;
use crate::error::AppError;
use crate::handlers;
use crate::services::{LocalStorage, MongoDb, Storage};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: SubmissionConfig,
    pub db: MongoDb,
    pub storage: Arc<dyn Storage>,
    /// Serializes review-number allocation (count + insert) across
    /// concurrent submissions.
    pub submission_gate: Arc<Mutex<()>>,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: SubmissionConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let storage: Arc<dyn Storage> = Arc::new(
            LocalStorage::new(&config.storage.local_path)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to initialize local storage at {}: {}",
                        config.storage.local_path,
                        e
                    );
                    e
                })?,
        );

        let state = AppState {
            config: config.clone(),
            db: db.clone(),
            storage,
            submission_gate: Arc::new(Mutex::new(())),
        };

        let app = Router::new()
            .route("/", get(handlers::index))
            .route("/health", get(handlers::health_check))
            .route("/register", post(handlers::register))
            .route("/login", post(handlers::login))
            .route("/project/submit", post(handlers::submit_project))
            .route("/project/review/:project_id", put(handlers::review_project))
            .route("/project/:project_id", get(handlers::get_project))
            .route("/projects", get(handlers::list_projects))
            .route("/projects/pending", get(handlers::list_pending_projects))
            .route(
                "/projects/student/:student_id",
                get(handlers::list_student_projects),
            )
            .nest_service("/files", ServeDir::new(&config.storage.local_path))
            .layer(DefaultBodyLimit::max(20 * 1024 * 1024))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn db(&self) -> &MongoDb {
        &self.state.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
