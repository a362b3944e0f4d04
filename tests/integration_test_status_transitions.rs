mod common;

use common::*;
use serde_json::json;

async fn make_pending_booking(app: &TestApp, slug: &str) -> (String, String, String) {
    let tenant_id = create_tenant(app, slug, false).await;
    let student_id = create_student(app, &tenant_id, "alice").await;
    let ct_id = create_class_type(app, &tenant_id, "Yoga", 10).await;
    let class_id = create_class(
        app,
        &tenant_id,
        &ct_id,
        "2027-06-07T09:00:00Z",
        "2027-06-07T10:00:00Z",
        10,
    )
    .await;
    let r = book(app, &tenant_id, &class_id, &student_id).await;
    assert_eq!(r.status(), 201);
    let body = parse_body(r).await;
    assert_eq!(body["status"], "pending");
    let booking_id = body["booking_id"].as_str().unwrap().to_string();
    (tenant_id, class_id, booking_id)
}

async fn set_status(
    app: &TestApp,
    tenant_id: &str,
    booking_id: &str,
    status: &str,
) -> axum::response::Response {
    let token = teacher_token(tenant_id);
    put_json(
        &app.router,
        &format!("/api/v1/{}/bookings/{}/status", tenant_id, booking_id),
        Some(&token),
        json!({ "status": status }),
    )
    .await
}

#[tokio::test]
async fn test_teacher_approves_pending_booking() {
    let app = TestApp::new().await;
    let (tenant_id, _, booking_id) = make_pending_booking(&app, "studio-approve").await;

    let res = set_status(&app, &tenant_id, &booking_id, "confirmed").await;
    assert_eq!(res.status(), 200);
    let body = parse_body(res).await;
    assert_eq!(body["old_status"], "pending");
    assert_eq!(body["new_status"], "confirmed");
}

#[tokio::test]
async fn test_confirmed_booking_can_complete_or_no_show() {
    let app = TestApp::new().await;
    let (tenant_id, _, booking_id) = make_pending_booking(&app, "studio-done").await;

    assert_eq!(set_status(&app, &tenant_id, &booking_id, "confirmed").await.status(), 200);
    assert_eq!(set_status(&app, &tenant_id, &booking_id, "completed").await.status(), 200);

    // Terminal: nothing moves out of completed.
    assert_eq!(set_status(&app, &tenant_id, &booking_id, "no_show").await.status(), 409);
}

#[tokio::test]
async fn test_cancelled_booking_cannot_be_confirmed() {
    let app = TestApp::new().await;
    let (tenant_id, _, booking_id) = make_pending_booking(&app, "studio-dead").await;

    assert_eq!(set_status(&app, &tenant_id, &booking_id, "cancelled").await.status(), 200);

    let res = set_status(&app, &tenant_id, &booking_id, "confirmed").await;
    assert_eq!(res.status(), 409);
    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("Illegal status transition"));
}

#[tokio::test]
async fn test_moving_a_booking_back_to_pending_is_rejected() {
    let app = TestApp::new().await;
    let (tenant_id, _, booking_id) = make_pending_booking(&app, "studio-back").await;

    let res = set_status(&app, &tenant_id, &booking_id, "pending").await;
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn test_approval_revalidates_capacity() {
    let app = TestApp::new().await;
    let (tenant_id, class_id, booking_id) = make_pending_booking(&app, "studio-squeeze").await;

    // Shrink the class and fill the remaining seat behind the pending
    // booking's back, simulating a lost race.
    let rival = create_student(&app, &tenant_id, "rival").await;
    sqlx::query("UPDATE classes SET max_students = 1 WHERE id = ?")
        .bind(&class_id)
        .execute(&app.pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO bookings (id, tenant_id, class_id, student_id, status, booked_at)
         VALUES ('b-rival', ?, ?, ?, 'confirmed', datetime('now'))",
    )
    .bind(&tenant_id)
    .bind(&class_id)
    .bind(&rival)
    .execute(&app.pool)
    .await
    .unwrap();

    let res = set_status(&app, &tenant_id, &booking_id, "confirmed").await;
    assert_eq!(res.status(), 409);
    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("capacity"));
}

#[tokio::test]
async fn test_student_cannot_change_booking_status() {
    let app = TestApp::new().await;
    let (tenant_id, _, booking_id) = make_pending_booking(&app, "studio-nostudent").await;

    // The student who owns the booking still cannot use the status endpoint.
    let student_id: String = sqlx::query_scalar("SELECT student_id FROM bookings WHERE id = ?")
        .bind(&booking_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    let token = student_token(&tenant_id, &student_id);
    let res = put_json(
        &app.router,
        &format!("/api/v1/{}/bookings/{}/status", tenant_id, booking_id),
        Some(&token),
        json!({ "status": "confirmed" }),
    )
    .await;
    assert_eq!(res.status(), 403);
}

#[tokio::test]
async fn test_student_cancel_of_someone_elses_booking_is_hidden() {
    let app = TestApp::new().await;
    let (tenant_id, _, booking_id) = make_pending_booking(&app, "studio-foreign").await;
    let other = create_student(&app, &tenant_id, "other").await;

    let token = student_token(&tenant_id, &other);
    let res = post_json(
        &app.router,
        &format!("/api/v1/{}/bookings/{}/cancel", tenant_id, booking_id),
        Some(&token),
        json!({}),
    )
    .await;
    // Not 403: foreign booking ids must not be probeable.
    assert_eq!(res.status(), 404);
}
