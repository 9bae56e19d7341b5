pub mod database;
pub mod storage;

pub use database::{student_filter, MongoDb};
pub use storage::{LocalStorage, Storage};
