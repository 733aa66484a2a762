//! Auth API integration tests
//!
//! Registration, login, password change, and admin user management.

use crate::common::{BASE_URL, TEST_ADMIN_PASSWORD, TEST_ADMIN_USERNAME, TestClient, unique_username};

const TEST_PASSWORD: &str = "integration-pass-1";

async fn register_student(username: &str) -> TestClient {
    let client = TestClient::new(BASE_URL);

    let response: serde_json::Value = client
        .post_form(
            "/v3/auth/user",
            &[
                ("username", username),
                ("password", TEST_PASSWORD),
                ("email", &format!("{}@example.com", username)),
                ("displayName", "Integration Student"),
            ],
        )
        .await
        .expect("Failed to register");

    assert_eq!(response["code"], 0, "register should succeed: {response}");

    TestClient::new_with_login(BASE_URL, username, TEST_PASSWORD)
        .await
        .expect("Failed to login as new student")
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_register_then_login() {
    let username = unique_username("student");
    let client = register_student(&username).await;
    assert!(client.token().is_some());
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_login_with_wrong_password_fails() {
    let username = unique_username("student");
    register_student(&username).await;

    let mut client = TestClient::new(BASE_URL);
    assert!(client.login(&username, "wrong-password").await.is_err());
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_register_admin_role_refused() {
    let client = TestClient::new(BASE_URL);
    let username = unique_username("rogue");

    let response: serde_json::Value = client
        .post_form(
            "/v3/auth/user",
            &[
                ("username", &username),
                ("password", TEST_PASSWORD),
                ("email", &format!("{}@example.com", username)),
                ("displayName", "Rogue"),
                ("role", "ROLE_ADMIN"),
            ],
        )
        .await
        .expect("Failed to call register");

    assert_eq!(response["code"], 400);
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_update_password() {
    let username = unique_username("student");
    let client = register_student(&username).await;

    let response: serde_json::Value = client
        .put_form(
            "/v3/auth/user/password",
            &[
                ("oldPassword", TEST_PASSWORD),
                ("newPassword", "integration-pass-2"),
            ],
        )
        .await
        .expect("Failed to update password");

    assert_eq!(response["code"], 0);

    // Old password no longer works
    let mut stale = TestClient::new(BASE_URL);
    assert!(stale.login(&username, TEST_PASSWORD).await.is_err());

    // New password does
    TestClient::new_with_login(BASE_URL, &username, "integration-pass-2")
        .await
        .expect("Failed to login with new password");
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_user_list_requires_admin() {
    let username = unique_username("student");
    let student = register_student(&username).await;

    let response = student
        .raw_get("/v3/auth/user/list?pageNo=1&pageSize=10")
        .await
        .expect("Failed to call user list");

    assert_eq!(response.status(), 403);

    let admin = TestClient::new_with_login(BASE_URL, TEST_ADMIN_USERNAME, TEST_ADMIN_PASSWORD)
        .await
        .expect("Failed to login as admin");

    let response: serde_json::Value = admin
        .get_with_query("/v3/auth/user/list", &[("pageNo", "1"), ("pageSize", "10")])
        .await
        .expect("Failed to list users");

    assert_eq!(response["code"], 0);
    assert!(response["data"]["totalCount"].as_u64().unwrap_or(0) >= 1);
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_unauthenticated_request_rejected() {
    let client = TestClient::new(BASE_URL);

    let response = client
        .raw_get("/v3/student/dashboard")
        .await
        .expect("Failed to call dashboard");

    assert_eq!(response.status(), 403);
}
