//! Ticket lifecycle over the HTTP API.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{
    As, TestConfig, TestFixture, ADMIN, ANALYST, OTHER_ANALYST, OTHER_REQUESTER, REQUESTER,
};

// =============================================================================
// Lifecycle
// =============================================================================

async fn full_lifecycle(fixture: &TestFixture) {
    let id = fixture.create_ticket(REQUESTER, 1, "VPN is down").await;

    let response = fixture.get_as(REQUESTER, &format!("/api/v1/tickets/{}", id)).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"]["id"], 1);
    assert_eq!(response.body["status"]["name"], "New");
    assert_eq!(response.body["category"]["name"], "Unavailability");
    assert!(response.body["assignee_id"].is_null());

    let response = fixture
        .post_as(ANALYST, &format!("/api/v1/tickets/{}/assign/me", id), json!({}))
        .await;
    assert_status!(response, StatusCode::NO_CONTENT);

    let response = fixture
        .post_as(
            ANALYST,
            &format!("/api/v1/tickets/{}/status", id),
            json!({ "status_id": 3 }),
        )
        .await;
    assert_status!(response, StatusCode::NO_CONTENT);

    let response = fixture
        .post_as(ANALYST, &format!("/api/v1/tickets/{}/complete", id), json!({}))
        .await;
    assert_status!(response, StatusCode::NO_CONTENT);

    let response = fixture.get_as(REQUESTER, &format!("/api/v1/tickets/{}", id)).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"]["name"], "Completed");
    assert_eq!(response.body["assignee_id"], ANALYST);
    assert_eq!(response.body["last_updated_by"], ANALYST);
    assert!(!response.body["completed_at"].is_null());

    let response = fixture
        .post_as(
            REQUESTER,
            &format!("/api/v1/tickets/{}/cancel", id),
            json!({ "reason": "too late" }),
        )
        .await;
    assert_error_code!(
        response,
        StatusCode::UNPROCESSABLE_ENTITY,
        "Ticket.HasAlreadyBeenCompletedOrCancelled"
    );
}

#[tokio::test]
async fn test_full_lifecycle_in_memory() {
    let fixture = TestFixture::new().await;
    full_lifecycle(&fixture).await;
}

#[tokio::test]
async fn test_full_lifecycle_sqlite() {
    let fixture = TestFixture::with_config(TestConfig::with_sqlite()).await;
    full_lifecycle(&fixture).await;
}

#[tokio::test]
async fn test_requester_updates_and_cancels_own_ticket() {
    let fixture = TestFixture::new().await;
    let id = fixture.create_ticket(REQUESTER, 4, "How do I reset MFA?").await;

    let response = fixture
        .put_as(
            REQUESTER,
            &format!("/api/v1/tickets/{}", id),
            json!({ "category_id": 3, "description": "Please reset my MFA device" }),
        )
        .await;
    assert_status!(response, StatusCode::NO_CONTENT);

    let response = fixture
        .post_as(
            REQUESTER,
            &format!("/api/v1/tickets/{}/cancel", id),
            json!({ "reason": "Solved it myself" }),
        )
        .await;
    assert_status!(response, StatusCode::NO_CONTENT);

    let response = fixture.get_as(REQUESTER, &format!("/api/v1/tickets/{}", id)).await;
    assert_eq!(response.body["status"]["name"], "Cancelled");
    assert_eq!(response.body["description"], "Please reset my MFA device");
    assert_eq!(response.body["category"]["id"], 3);
    assert_eq!(response.body["cancellation_reason"], "Solved it myself");
}

#[tokio::test]
async fn test_administrator_reassigns() {
    let fixture = TestFixture::new().await;
    let id = fixture.create_ticket(REQUESTER, 2, "ERP is slow").await;

    let response = fixture
        .post_as(
            ADMIN,
            &format!("/api/v1/tickets/{}/assign", id),
            json!({ "assignee_id": OTHER_ANALYST }),
        )
        .await;
    assert_status!(response, StatusCode::NO_CONTENT);

    // Only the current assignee or an administrator may re-assign
    let response = fixture
        .post_as(ANALYST, &format!("/api/v1/tickets/{}/assign/me", id), json!({}))
        .await;
    assert_error_code!(response, StatusCode::FORBIDDEN, "Ticket.CannotBeAssignedByThisUser");

    let response = fixture
        .post_as(
            ADMIN,
            &format!("/api/v1/tickets/{}/assign", id),
            json!({ "assignee_id": ANALYST }),
        )
        .await;
    assert_status!(response, StatusCode::NO_CONTENT);

    let response = fixture.get_as(ANALYST, &format!("/api/v1/tickets/{}", id)).await;
    assert_eq!(response.body["assignee_id"], ANALYST);
    assert_eq!(response.body["status"]["name"], "Assigned");
}

// =============================================================================
// Error mapping
// =============================================================================

#[tokio::test]
async fn test_create_rejections() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_as(
            REQUESTER,
            "/api/v1/tickets",
            json!({ "category_id": 1, "description": "   " }),
        )
        .await;
    assert_error_code!(
        response,
        StatusCode::UNPROCESSABLE_ENTITY,
        "Ticket.DescriptionIsRequired"
    );

    let response = fixture
        .post_as(
            REQUESTER,
            "/api/v1/tickets",
            json!({ "category_id": 99, "description": "Printer jam" }),
        )
        .await;
    assert_error_code!(response, StatusCode::NOT_FOUND, "Category.NotFound");

    let response = fixture
        .post_as(
            77,
            "/api/v1/tickets",
            json!({ "category_id": 1, "description": "Printer jam" }),
        )
        .await;
    assert_error_code!(response, StatusCode::NOT_FOUND, "User.NotFound");
}

#[tokio::test]
async fn test_unknown_ticket_is_not_found() {
    let fixture = TestFixture::new().await;

    let response = fixture.get_as(ADMIN, "/api/v1/tickets/404").await;
    assert_error_code!(response, StatusCode::NOT_FOUND, "Ticket.NotFound");

    let response = fixture
        .post_as(ANALYST, "/api/v1/tickets/404/complete", json!({}))
        .await;
    assert_error_code!(response, StatusCode::NOT_FOUND, "Ticket.NotFound");
}

#[tokio::test]
async fn test_assignment_permissions() {
    let fixture = TestFixture::new().await;
    let id = fixture.create_ticket(REQUESTER, 3, "New laptop").await;
    let path = format!("/api/v1/tickets/{}/assign", id);

    let response = fixture
        .post_as(REQUESTER, &path, json!({ "assignee_id": ANALYST }))
        .await;
    assert_error_code!(response, StatusCode::FORBIDDEN, "Ticket.CannotBeAssignedByThisUser");

    let response = fixture
        .post_as(ADMIN, &path, json!({ "assignee_id": OTHER_REQUESTER }))
        .await;
    assert_error_code!(response, StatusCode::FORBIDDEN, "Ticket.CannotBeAssignedToThisUser");

    // An analyst may only claim an unassigned ticket for themself
    let response = fixture
        .post_as(ANALYST, &path, json!({ "assignee_id": OTHER_ANALYST }))
        .await;
    assert_error_code!(response, StatusCode::FORBIDDEN, "Ticket.CannotBeAssignedByThisUser");
}

#[tokio::test]
async fn test_status_rejections() {
    let fixture = TestFixture::new().await;
    let id = fixture.create_ticket(REQUESTER, 1, "Mail server down").await;
    let path = format!("/api/v1/tickets/{}/status", id);

    let response = fixture.post_as(ANALYST, &path, json!({ "status_id": 3 })).await;
    assert_error_code!(
        response,
        StatusCode::FORBIDDEN,
        "Ticket.StatusCannotBeChangedByThisUser"
    );

    fixture
        .post_as(ANALYST, &format!("/api/v1/tickets/{}/assign/me", id), json!({}))
        .await;

    let response = fixture.post_as(ANALYST, &path, json!({ "status_id": 42 })).await;
    assert_error_code!(
        response,
        StatusCode::UNPROCESSABLE_ENTITY,
        "Ticket.StatusDoesNotExist"
    );

    let response = fixture.post_as(ANALYST, &path, json!({ "status_id": 1 })).await;
    assert_error_code!(
        response,
        StatusCode::UNPROCESSABLE_ENTITY,
        "Ticket.CannotChangeStatusToNew"
    );

    let response = fixture.post_as(ANALYST, &path, json!({ "status_id": 6 })).await;
    assert_error_code!(response, StatusCode::UNPROCESSABLE_ENTITY, "Ticket.StatusNotAllowed");

    let response = fixture.post_as(ANALYST, &path, json!({ "status_id": 4 })).await;
    assert_status!(response, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_cancel_requires_reason() {
    let fixture = TestFixture::new().await;
    let id = fixture.create_ticket(REQUESTER, 1, "Mail server down").await;

    let response = fixture
        .post_as(
            REQUESTER,
            &format!("/api/v1/tickets/{}/cancel", id),
            json!({ "reason": "" }),
        )
        .await;
    assert_error_code!(
        response,
        StatusCode::UNPROCESSABLE_ENTITY,
        "Ticket.CancellationReasonIsRequired"
    );

    let response = fixture
        .post_as(
            OTHER_REQUESTER,
            &format!("/api/v1/tickets/{}/cancel", id),
            json!({ "reason": "not mine" }),
        )
        .await;
    assert_error_code!(response, StatusCode::FORBIDDEN, "Ticket.CannotBeCancelledByThisUser");
}

#[tokio::test]
async fn test_malformed_bodies_are_bad_requests() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_raw_as(REQUESTER, "/api/v1/tickets", "{ not json")
        .await;
    assert_error_code!(response, StatusCode::BAD_REQUEST, "Request.Invalid");

    let response = fixture
        .post_as(REQUESTER, "/api/v1/tickets", json!({ "description": "no category" }))
        .await;
    assert_error_code!(response, StatusCode::BAD_REQUEST, "Request.Invalid");

    let response = fixture.get_as(REQUESTER, "/api/v1/tickets/abc").await;
    assert_error_code!(response, StatusCode::BAD_REQUEST, "Request.Invalid");
    assert!(response.body["error"].as_str().unwrap().contains("abc"));

    let response = fixture
        .post_as(REQUESTER, "/api/v1/tickets/abc/cancel", json!({ "reason": "typo" }))
        .await;
    assert_error_code!(response, StatusCode::BAD_REQUEST, "Request.Invalid");

    let response = fixture.get_as(REQUESTER, "/api/v1/tickets?page=x").await;
    assert_error_code!(response, StatusCode::BAD_REQUEST, "Request.Invalid");

    let response = fixture.get_as(ADMIN, "/api/v1/users?page_size=many").await;
    assert_error_code!(response, StatusCode::BAD_REQUEST, "Request.Invalid");

    let response = fixture.get_as(REQUESTER, "/api/v1/categories/first").await;
    assert_error_code!(response, StatusCode::BAD_REQUEST, "Request.Invalid");
}

#[tokio::test]
async fn test_commit_failure_is_internal_error() {
    let fixture = TestFixture::new().await;
    let store = fixture.memory.as_ref().unwrap();
    store.set_fail_commits(true).await;

    let response = fixture
        .post_as(
            REQUESTER,
            "/api/v1/tickets",
            json!({ "category_id": 1, "description": "Disk full" }),
        )
        .await;
    assert_error_code!(response, StatusCode::INTERNAL_SERVER_ERROR, "Store.Failure");
    assert_eq!(store.ticket_count().await, 0);
}

// =============================================================================
// Visibility and paging
// =============================================================================

#[tokio::test]
async fn test_listing_follows_visibility() {
    let fixture = TestFixture::new().await;
    let first = fixture.create_ticket(REQUESTER, 1, "first").await;
    fixture.create_ticket(REQUESTER, 2, "second").await;
    let third = fixture.create_ticket(OTHER_REQUESTER, 3, "third").await;

    fixture
        .post_as(
            ADMIN,
            &format!("/api/v1/tickets/{}/assign", third),
            json!({ "assignee_id": OTHER_ANALYST }),
        )
        .await;

    let total = |user: i64| {
        let fixture = &fixture;
        async move {
            let response = fixture.get_as(user, "/api/v1/tickets").await;
            assert_status!(response, StatusCode::OK);
            response.body["total_count"].as_u64().unwrap()
        }
    };

    assert_eq!(total(REQUESTER).await, 2);
    assert_eq!(total(OTHER_REQUESTER).await, 1);
    // Unassigned tickets plus their own assignments
    assert_eq!(total(ANALYST).await, 2);
    assert_eq!(total(OTHER_ANALYST).await, 3);
    assert_eq!(total(ADMIN).await, 3);

    let response = fixture
        .get_as(OTHER_REQUESTER, &format!("/api/v1/tickets/{}", first))
        .await;
    assert_error_code!(response, StatusCode::FORBIDDEN, "Ticket.CannotBeViewedByThisUser");
}

#[tokio::test]
async fn test_listing_pages() {
    let fixture = TestFixture::new().await;
    for n in 0..3 {
        fixture
            .create_ticket(REQUESTER, 1, &format!("ticket {}", n))
            .await;
    }

    let response = fixture
        .get_as(REQUESTER, "/api/v1/tickets?page=2&page_size=2")
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["page"], 2);
    assert_eq!(response.body["page_size"], 2);
    assert_eq!(response.body["total_count"], 3);
    assert_eq!(response.body["has_next_page"], false);
    assert_eq!(response.body["has_previous_page"], true);
    let items = response.body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["description"], "ticket 2");
    assert_eq!(items[0]["status"]["name"], "New");

    let response = fixture
        .get_as(REQUESTER, "/api/v1/tickets?page=0&page_size=1000")
        .await;
    assert_eq!(response.body["page"], 1);
    assert_eq!(response.body["page_size"], 100);
    assert_eq!(response.body["items"].as_array().unwrap().len(), 3);
    assert_eq!(response.body["has_previous_page"], false);
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_protected_routes_require_credentials() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/tickets").await;
    assert_status!(response, StatusCode::UNAUTHORIZED);

    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");

    let response = fixture.get("/api/v1/config").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["auth"]["method"], "header");
}

#[tokio::test]
async fn test_basic_auth_lifecycle() {
    let fixture = TestFixture::with_config(TestConfig::with_basic_auth()).await;
    let requester = As::Basic(
        "user1@helpdesk.example".to_string(),
        common::fixtures::DEFAULT_PASSWORD.to_string(),
    );

    let response = fixture
        .request(
            "POST",
            "/api/v1/tickets",
            requester.clone(),
            Some(json!({ "category_id": 2, "description": "Wiki is slow" })),
        )
        .await;
    assert_status!(response, StatusCode::CREATED);
    let id = response.body["id"].as_i64().unwrap();

    let response = fixture
        .request("GET", &format!("/api/v1/tickets/{}", id), requester, None)
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["requester_id"], REQUESTER);

    let response = fixture
        .request(
            "GET",
            "/api/v1/tickets",
            As::Basic("user1@helpdesk.example".to_string(), "Wr0ng-pass".to_string()),
            None,
        )
        .await;
    assert_status!(response, StatusCode::UNAUTHORIZED);

    // The gateway header is not trusted under basic auth
    let response = fixture.get_as(REQUESTER, "/api/v1/tickets").await;
    assert_status!(response, StatusCode::UNAUTHORIZED);
}
