mod common;

use common::*;
use serde_json::json;

#[tokio::test]
async fn test_create_and_resolve_tenant_by_slug() {
    let app = TestApp::new().await;
    let tenant_id = create_tenant(&app, "willow-yoga", true).await;

    let res = get(&app.router, "/api/v1/tenants/by-slug/willow-yoga", None).await;
    assert_eq!(res.status(), 200);
    let body = parse_body(res).await;
    assert_eq!(body["id"], tenant_id.as_str());
    assert_eq!(body["timezone"], "UTC");
}

#[tokio::test]
async fn test_duplicate_slug_is_rejected() {
    let app = TestApp::new().await;
    create_tenant(&app, "taken", true).await;

    let res = post_json(
        &app.router,
        "/api/v1/tenants",
        None,
        json!({ "name": "Other", "slug": "taken" }),
    )
    .await;
    assert_eq!(res.status(), 409);
}

#[tokio::test]
async fn test_invalid_timezone_is_rejected() {
    let app = TestApp::new().await;
    let res = post_json(
        &app.router,
        "/api/v1/tenants",
        None,
        json!({ "name": "Nowhere", "slug": "nowhere", "timezone": "Mars/Olympus" }),
    )
    .await;
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn test_unknown_tenant_routes_return_404() {
    let app = TestApp::new().await;
    let res = get(
        &app.router,
        "/api/v1/no-such-tenant/availability?from=2027-01-01&to=2027-01-07",
        None,
    )
    .await;
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn test_students_are_scoped_to_their_tenant() {
    let app = TestApp::new().await;
    let tenant_a = create_tenant(&app, "scope-a", true).await;
    let tenant_b = create_tenant(&app, "scope-b", true).await;
    create_student(&app, &tenant_a, "ana").await;

    let token = teacher_token(&tenant_b);
    let res = get(
        &app.router,
        &format!("/api/v1/{}/students", tenant_b),
        Some(&token),
    )
    .await;
    assert_eq!(res.status(), 200);
    let body = parse_body(res).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = TestApp::new().await;
    let tenant_id = create_tenant(&app, "badtoken", true).await;

    let res = get(
        &app.router,
        &format!("/api/v1/{}/students", tenant_id),
        Some("not-a-jwt"),
    )
    .await;
    assert_eq!(res.status(), 401);
}
