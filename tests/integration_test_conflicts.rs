mod common;

use common::*;
use serde_json::json;

#[tokio::test]
async fn test_overlapping_classes_are_rejected_with_conflict_list() {
    let app = TestApp::new().await;
    let tenant_id = create_tenant(&app, "studio-ovl", true).await;
    let ct_id = create_class_type(&app, &tenant_id, "Yoga", 10).await;
    let first = create_class(
        &app,
        &tenant_id,
        &ct_id,
        "2027-06-07T09:00:00Z",
        "2027-06-07T10:00:00Z",
        10,
    )
    .await;

    let token = teacher_token(&tenant_id);
    let res = post_json(
        &app.router,
        &format!("/api/v1/{}/classes", tenant_id),
        Some(&token),
        json!({
            "class_type_id": ct_id,
            "starts_at": "2027-06-07T09:30:00Z",
            "ends_at": "2027-06-07T10:30:00Z",
        }),
    )
    .await;
    assert_eq!(res.status(), 409);
    let body = parse_body(res).await;
    let conflicts = body["conflicts"].as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["id"], first.as_str());
    assert_eq!(conflicts[0]["kind"], "class");
}

#[tokio::test]
async fn test_back_to_back_classes_are_allowed() {
    let app = TestApp::new().await;
    let tenant_id = create_tenant(&app, "studio-b2b", true).await;
    let ct_id = create_class_type(&app, &tenant_id, "Yoga", 10).await;
    create_class(
        &app,
        &tenant_id,
        &ct_id,
        "2027-06-07T09:00:00Z",
        "2027-06-07T10:00:00Z",
        10,
    )
    .await;

    let token = teacher_token(&tenant_id);
    let res = post_json(
        &app.router,
        &format!("/api/v1/{}/classes", tenant_id),
        Some(&token),
        json!({
            "class_type_id": ct_id,
            "starts_at": "2027-06-07T10:00:00Z",
            "ends_at": "2027-06-07T11:00:00Z",
        }),
    )
    .await;
    assert_eq!(res.status(), 201);
}

#[tokio::test]
async fn test_cancelled_class_does_not_conflict() {
    let app = TestApp::new().await;
    let tenant_id = create_tenant(&app, "studio-cxl-ovl", true).await;
    let ct_id = create_class_type(&app, &tenant_id, "Yoga", 10).await;
    let class_id = create_class(
        &app,
        &tenant_id,
        &ct_id,
        "2027-06-07T09:00:00Z",
        "2027-06-07T10:00:00Z",
        10,
    )
    .await;

    let token = teacher_token(&tenant_id);
    let cancel = post_json(
        &app.router,
        &format!("/api/v1/{}/classes/{}/cancel", tenant_id, class_id),
        Some(&token),
        json!({}),
    )
    .await;
    assert_eq!(cancel.status(), 200);

    let res = post_json(
        &app.router,
        &format!("/api/v1/{}/classes", tenant_id),
        Some(&token),
        json!({
            "class_type_id": ct_id,
            "starts_at": "2027-06-07T09:00:00Z",
            "ends_at": "2027-06-07T10:00:00Z",
        }),
    )
    .await;
    assert_eq!(res.status(), 201);
}

#[tokio::test]
async fn test_class_over_block_is_rejected_by_default() {
    let app = TestApp::new().await;
    let tenant_id = create_tenant(&app, "studio-pvt-off", true).await;
    let ct_id = create_class_type(&app, &tenant_id, "Private", 1).await;

    let token = teacher_token(&tenant_id);
    let res = post_json(
        &app.router,
        &format!("/api/v1/{}/blocks", tenant_id),
        Some(&token),
        json!({
            "starts_at": "2027-06-07T08:00:00Z",
            "ends_at": "2027-06-07T12:00:00Z",
        }),
    )
    .await;
    assert_eq!(res.status(), 201);

    let res = post_json(
        &app.router,
        &format!("/api/v1/{}/classes", tenant_id),
        Some(&token),
        json!({
            "class_type_id": ct_id,
            "starts_at": "2027-06-07T09:00:00Z",
            "ends_at": "2027-06-07T10:00:00Z",
            "event_type": "private",
        }),
    )
    .await;
    assert_eq!(res.status(), 409);
    let body = parse_body(res).await;
    assert_eq!(body["conflicts"][0]["kind"], "block");
}

#[tokio::test]
async fn test_private_class_over_block_is_tolerated_when_enabled() {
    let app = TestApp::with_policy(true).await;
    let tenant_id = create_tenant(&app, "studio-pvt-on", true).await;
    let ct_id = create_class_type(&app, &tenant_id, "Private", 1).await;

    let token = teacher_token(&tenant_id);
    let res = post_json(
        &app.router,
        &format!("/api/v1/{}/blocks", tenant_id),
        Some(&token),
        json!({
            "starts_at": "2027-06-07T08:00:00Z",
            "ends_at": "2027-06-07T12:00:00Z",
        }),
    )
    .await;
    assert_eq!(res.status(), 201);

    let res = post_json(
        &app.router,
        &format!("/api/v1/{}/classes", tenant_id),
        Some(&token),
        json!({
            "class_type_id": ct_id,
            "starts_at": "2027-06-07T09:00:00Z",
            "ends_at": "2027-06-07T10:00:00Z",
            "event_type": "private",
        }),
    )
    .await;
    assert_eq!(res.status(), 201);

    // Group classes are still rejected even with the policy enabled.
    let res = post_json(
        &app.router,
        &format!("/api/v1/{}/classes", tenant_id),
        Some(&token),
        json!({
            "class_type_id": ct_id,
            "starts_at": "2027-06-07T10:30:00Z",
            "ends_at": "2027-06-07T11:30:00Z",
        }),
    )
    .await;
    assert_eq!(res.status(), 409);
}

#[tokio::test]
async fn test_class_creation_validates_time_window() {
    let app = TestApp::new().await;
    let tenant_id = create_tenant(&app, "studio-badwin", true).await;
    let ct_id = create_class_type(&app, &tenant_id, "Yoga", 10).await;

    let token = teacher_token(&tenant_id);
    let res = post_json(
        &app.router,
        &format!("/api/v1/{}/classes", tenant_id),
        Some(&token),
        json!({
            "class_type_id": ct_id,
            "starts_at": "2027-06-07T10:00:00Z",
            "ends_at": "2027-06-07T09:00:00Z",
        }),
    )
    .await;
    assert_eq!(res.status(), 400);
}
