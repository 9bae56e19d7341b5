mod common;

use common::TestApp;
use mongodb::bson::{doc, Bson};
use submission_service::models::ReviewStatus;

#[tokio::test]
async fn submit_project_works() {
    let app = TestApp::spawn().await;
    let student_id = app.register("student@example.com", "student").await;

    let response = app.submit_project(&student_id, "report.pdf").await;

    assert_eq!(201, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["reviewNo"], 1);
    assert_eq!(body["studentId"], student_id.as_str());
    let project_id = body["projectId"].as_str().expect("projectId missing");

    // Verify DB record.
    let stored = app
        .db
        .projects()
        .find_one(doc! { "_id": project_id }, None)
        .await
        .unwrap()
        .expect("Project not found in DB");
    assert_eq!(stored.student_id, student_id);
    assert_eq!(stored.status, ReviewStatus::Pending);
    assert_eq!(stored.review_no, 1);
    assert_eq!(stored.file_name, "report.pdf");
    assert!(stored.document_url.starts_with("/files/"));
    assert!(stored.reviewed_at.is_none());

    // Verify the file landed in storage under the served prefix.
    let storage_key = stored.document_url.trim_start_matches("/files/");
    let file_path = std::path::Path::new(&app.storage_path).join(storage_key);
    assert!(file_path.exists());

    // And that it is statically served.
    let served = app
        .client
        .get(format!("{}{}", app.address, stored.document_url))
        .send()
        .await
        .expect("Failed to fetch served file");
    assert_eq!(200, served.status().as_u16());
    assert_eq!(128, served.bytes().await.unwrap().len());

    app.cleanup().await;
}

#[tokio::test]
async fn review_numbers_increment_then_cap_at_three() {
    let app = TestApp::spawn().await;
    let student_id = app.register("serial@example.com", "student").await;

    for expected in 1..=3 {
        let response = app.submit_project(&student_id, "report.pdf").await;
        assert_eq!(201, response.status().as_u16());
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["reviewNo"], expected);
    }

    let fourth = app.submit_project(&student_id, "report.pdf").await;
    assert_eq!(400, fourth.status().as_u16());

    app.cleanup().await;
}

#[tokio::test]
async fn submit_requires_a_document_file() {
    let app = TestApp::spawn().await;
    let student_id = app.register("nofile@example.com", "student").await;

    let form = reqwest::multipart::Form::new()
        .text("studentId", student_id)
        .text("title", "No file here");

    let response = app
        .client
        .post(format!("{}/project/submit", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(400, response.status().as_u16());

    app.cleanup().await;
}

#[tokio::test]
async fn submit_requires_student_id() {
    let app = TestApp::spawn().await;

    let form = reqwest::multipart::Form::new().part(
        "document",
        reqwest::multipart::Part::bytes(vec![0u8; 16])
            .file_name("report.pdf")
            .mime_str("application/pdf")
            .unwrap(),
    );

    let response = app
        .client
        .post(format!("{}/project/submit", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(400, response.status().as_u16());

    app.cleanup().await;
}

#[tokio::test]
async fn submit_for_unknown_student_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app.submit_project("no-such-student", "report.pdf").await;
    assert_eq!(404, response.status().as_u16());

    app.cleanup().await;
}

#[tokio::test]
async fn legacy_nested_projects_count_toward_the_cap() {
    let app = TestApp::spawn().await;
    let student_id = app.register("legacy@example.com", "student").await;

    // Simulate a record written before the flattening migration: student
    // reference nested, no top-level student_id.
    app.db
        .database()
        .collection::<mongodb::bson::Document>("projects")
        .insert_one(
            doc! {
                "_id": "legacy-project-1",
                "student": { "id": &student_id },
                "title": "Legacy submission",
                "description": "Stored in the nested shape",
                "review_no": 1,
                "document_url": "/files/documents/legacy.pdf",
                "file_type": "application/pdf",
                "file_name": "legacy.pdf",
                "status": "pending",
                "created_at": Bson::DateTime(mongodb::bson::DateTime::now()),
            },
            None,
        )
        .await
        .expect("Failed to insert legacy project");

    // The legacy record occupies round 1, so a fresh submission gets 2.
    let response = app.submit_project(&student_id, "report.pdf").await;
    assert_eq!(201, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["reviewNo"], 2);

    // And the per-student listing sees both shapes.
    let listing: serde_json::Value = app
        .client
        .get(format!("{}/projects/student/{}", app.address, student_id))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();
    let projects = listing["projects"].as_array().unwrap();
    assert_eq!(2, projects.len());
    assert!(projects
        .iter()
        .all(|p| p["studentId"] == student_id.as_str()));

    app.cleanup().await;
}
