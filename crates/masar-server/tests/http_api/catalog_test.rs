//! Catalog and authoring API integration tests

use crate::common::{
    BASE_URL, TEST_ADMIN_PASSWORD, TEST_ADMIN_USERNAME, TestClient, unique_slug, unique_username,
};

const TEST_PASSWORD: &str = "integration-pass-1";

async fn register_instructor() -> TestClient {
    let username = unique_username("instructor");
    let client = TestClient::new(BASE_URL);

    let response: serde_json::Value = client
        .post_form(
            "/v3/auth/user",
            &[
                ("username", &username),
                ("password", TEST_PASSWORD),
                ("email", &format!("{}@example.com", username)),
                ("displayName", "Integration Instructor"),
                ("role", "ROLE_INSTRUCTOR"),
            ],
        )
        .await
        .expect("Failed to register instructor");
    assert_eq!(response["code"], 0);

    TestClient::new_with_login(BASE_URL, &username, TEST_PASSWORD)
        .await
        .expect("Failed to login as instructor")
}

/// Create a draft course with one module and one lesson; returns
/// (course_id, module_id, lesson_id).
async fn author_course(instructor: &TestClient, slug: &str) -> (i64, i64, i64) {
    let course: serde_json::Value = instructor
        .post_form(
            "/v3/instructor/course",
            &[
                ("title", "Integration Course"),
                ("slug", slug),
                ("description", "Course created by integration tests"),
                ("category", "testing"),
                ("level", "Beginner"),
            ],
        )
        .await
        .expect("Failed to create course");
    assert_eq!(course["code"], 0, "{course}");
    let course_id = course["data"]["id"].as_i64().expect("course id");

    let module: serde_json::Value = instructor
        .post_form(
            "/v3/instructor/module",
            &[
                ("courseId", &course_id.to_string()),
                ("title", "Module One"),
            ],
        )
        .await
        .expect("Failed to create module");
    assert_eq!(module["code"], 0, "{module}");
    let module_id = module["data"]["id"].as_i64().expect("module id");

    let lesson: serde_json::Value = instructor
        .post_form(
            "/v3/instructor/lesson",
            &[
                ("moduleId", &module_id.to_string()),
                ("title", "Lesson One"),
                ("kind", "VIDEO"),
                ("durationSeconds", "300"),
                ("contentType", "VIDEO"),
                ("videoUrl", "https://videos.example.com/lesson-one"),
            ],
        )
        .await
        .expect("Failed to create lesson");
    assert_eq!(lesson["code"], 0, "{lesson}");
    let lesson_id = lesson["data"]["id"].as_i64().expect("lesson id");

    (course_id, module_id, lesson_id)
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_authoring_flow_builds_outline() {
    let instructor = register_instructor().await;
    let slug = unique_slug("outline");
    let (course_id, _module_id, _lesson_id) = author_course(&instructor, &slug).await;

    let detail: serde_json::Value = instructor
        .get_with_query(
            "/v3/instructor/course",
            &[("courseId", &course_id.to_string())],
        )
        .await
        .expect("Failed to fetch authoring detail");

    assert_eq!(detail["code"], 0);
    assert_eq!(detail["data"]["status"], "DRAFT");
    assert_eq!(detail["data"]["modules"][0]["lessons"][0]["title"], "Lesson One");
    assert_eq!(detail["data"]["totalDurationSeconds"], 300);
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_draft_course_not_in_public_catalog() {
    let instructor = register_instructor().await;
    let slug = unique_slug("draft");
    author_course(&instructor, &slug).await;

    let public = TestClient::new(BASE_URL);
    let response = public
        .raw_get(&format!("/v3/catalog/course?slug={}", slug))
        .await
        .expect("Failed to browse catalog");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_approval_publishes_course() {
    let instructor = register_instructor().await;
    let slug = unique_slug("publish");
    let (course_id, _, _) = author_course(&instructor, &slug).await;

    let submit: serde_json::Value = instructor
        .post_form(
            "/v3/instructor/course/submit",
            &[("courseId", &course_id.to_string())],
        )
        .await
        .expect("Failed to submit course");
    assert_eq!(submit["code"], 0);

    let admin = TestClient::new_with_login(BASE_URL, TEST_ADMIN_USERNAME, TEST_ADMIN_PASSWORD)
        .await
        .expect("Failed to login as admin");

    let approve: serde_json::Value = admin
        .post_form(
            "/v3/admin/course/approve",
            &[("courseId", &course_id.to_string())],
        )
        .await
        .expect("Failed to approve course");
    assert_eq!(approve["code"], 0);

    // Now publicly visible
    let public = TestClient::new(BASE_URL);
    let detail: serde_json::Value = public
        .get_with_query("/v3/catalog/course", &[("slug", slug.as_str())])
        .await
        .expect("Failed to fetch published course");
    assert_eq!(detail["code"], 0);
    assert_eq!(detail["data"]["status"], "PUBLISHED");
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_foreign_course_edit_forbidden() {
    let owner = register_instructor().await;
    let slug = unique_slug("owned");
    let (course_id, _, _) = author_course(&owner, &slug).await;

    let intruder = register_instructor().await;
    let response: serde_json::Value = intruder
        .post_form(
            "/v3/instructor/module",
            &[("courseId", &course_id.to_string()), ("title", "Hijack")],
        )
        .await
        .expect("Failed to call module create");

    assert_eq!(response["code"], 403);
}
