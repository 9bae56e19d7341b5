//! submission-service: backend API for the student/faculty project
//! submission workflow.
//!
//! Students register, upload project documents (up to three review rounds),
//! and faculty approve or reject each round. State lives in MongoDB;
//! uploaded files are written to local storage and served statically.
pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod services;
pub mod startup;
pub mod utils;
