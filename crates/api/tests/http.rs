//! End-to-end tests driving the router against an in-memory database.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use api::auth::{hash_password, issue_token};
use api::{ApiConfig, AppState};
use db::models::{HotelFields, NewSubscription, NewUser, PlanFields};
use db::repository::{hotels, plans, subscriptions, users};
use db::DbPool;
use domain::Role;

struct TestApp {
    app: Router,
    pool: DbPool,
    config: ApiConfig,
}

impl TestApp {
    async fn new() -> Self {
        let pool = db::pool::create_memory_pool().await.expect("memory pool");
        let config = ApiConfig::new("integration-test-secret", 1);
        let app = api::router(AppState::new(pool.clone(), config.clone()));
        Self { app, pool, config }
    }

    async fn call(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call("GET", uri, Some(token), None).await
    }

    async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call("POST", uri, Some(token), Some(body)).await
    }

    async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call("PATCH", uri, Some(token), Some(body)).await
    }

    /// Access token of an existing account.
    async fn token_for(&self, user_id: Uuid) -> String {
        let user = users::get_user(&self.pool, user_id).await.unwrap();
        let role: Role = user.role.parse().unwrap();
        issue_token(&self.config, &user, role).unwrap()
    }

    async fn user(&self, email: &str, role: Role, hotel_id: Option<Uuid>) -> (Uuid, String) {
        let user = users::create_user(
            &self.pool,
            &NewUser {
                hotel_id,
                first_name: "Test".into(),
                last_name: "User".into(),
                email: email.into(),
                phone: None,
                password_hash: hash_password("password123").unwrap(),
                role: role.to_string(),
                position: None,
            },
        )
        .await
        .unwrap();
        let token = self.token_for(user.id).await;
        (user.id, token)
    }

    /// A subscribed hotel with one admin; returns the hotel id and the admin token.
    async fn hotel(&self, name: &str, max_rooms: i64, max_employees: i64) -> (Uuid, String) {
        let hotel = hotels::create_hotel(
            &self.pool,
            &HotelFields {
                name: name.into(),
                address: "1 rue de la Paix".into(),
                city: "Lyon".into(),
                country: "France".into(),
                phone: None,
                email: None,
                stars: 3,
            },
        )
        .await
        .unwrap();
        let plan = plans::create_plan(
            &self.pool,
            &PlanFields {
                name: format!("plan-{name}"),
                monthly_price_cents: 4900,
                max_rooms,
                max_employees,
                description: None,
                is_active: true,
            },
        )
        .await
        .unwrap();
        subscriptions::create_subscription(
            &self.pool,
            &NewSubscription {
                hotel_id: hotel.id,
                plan_id: plan.id,
                start_date: today() - Duration::days(1),
                end_date: today() + Duration::days(30),
            },
        )
        .await
        .unwrap();

        let email = format!("admin@{}.example.com", name.to_lowercase().replace(' ', "-"));
        let (_, token) = self.user(&email, Role::Admin, Some(hotel.id)).await;
        (hotel.id, token)
    }

    /// Room type "Double" (2 guests, 120.00 a night) and one room in it.
    async fn room(&self, admin: &str, number: &str) -> Uuid {
        let (status, room_type) = self
            .post(
                "/api/admin/room-types",
                admin,
                json!({ "name": format!("Double {number}"), "capacity": 2, "base_price": "120.00" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{room_type}");
        let (status, room) = self
            .post(
                "/api/admin/rooms",
                admin,
                json!({ "room_type_id": room_type["id"], "number": number, "floor": 1 }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{room}");
        id(&room)
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn day(offset: i64) -> String {
    (today() + Duration::days(offset)).to_string()
}

fn id(value: &Value) -> Uuid {
    value["id"].as_str().unwrap().parse().unwrap()
}

// ---------------------------------------------------------------------------
// Authentication and roles
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_login_and_profile() {
    let t = TestApp::new().await;
    let body = json!({
        "first_name": "Jean",
        "last_name": "Valjean",
        "email": "Jean@Example.com",
        "password": "cosette1832"
    });

    let (status, registered) = t.call("POST", "/api/auth/register", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registered["user"]["email"], "jean@example.com");
    assert_eq!(registered["user"]["role"], "client");
    assert!(registered["user"].get("password_hash").is_none());

    let (status, _) = t.call("POST", "/api/auth/register", None, Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = t
        .call(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "jean@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, login) = t
        .call(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "jean@example.com", "password": "cosette1832" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = login["token"].as_str().unwrap();

    let (status, me) = t.get("/api/auth/me", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "jean@example.com");
}

#[tokio::test]
async fn register_rejects_invalid_payload() {
    let t = TestApp::new().await;
    let (status, body) = t
        .call(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "first_name": "A", "last_name": "B", "email": "not-an-email", "password": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("validation failed"));
}

#[tokio::test]
async fn guarded_routes_check_token_and_role() {
    let t = TestApp::new().await;
    let (_, client) = t.user("client@example.com", Role::Client, None).await;

    let (status, body) = t.call("GET", "/api/admin/rooms", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = t.call("GET", "/api/admin/rooms", Some("not.a.token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = t.get("/api/admin/rooms", &client).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t.get("/api/superadmin/hotels", &client).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn disabled_account_is_refused() {
    let t = TestApp::new().await;
    let (hotel_id, admin) = t.hotel("Disabled", 5, 5).await;
    let (employee_id, employee) = t.user("emp@example.com", Role::Employee, Some(hotel_id)).await;

    let (status, _) = t.get("/api/employee/rooms", &employee).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = t
        .call("DELETE", &format!("/api/admin/employees/{employee_id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = t.get("/api/employee/rooms", &employee).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Platform administration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn superadmin_sets_up_a_hotel() {
    let t = TestApp::new().await;
    let (_, root) = t.user("root@example.com", Role::SuperAdmin, None).await;

    let (status, hotel) = t
        .post(
            "/api/superadmin/hotels",
            &root,
            json!({
                "name": "Grand Hotel",
                "address": "2 avenue Foch",
                "city": "Paris",
                "country": "France",
                "stars": 5
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let hotel_id = id(&hotel);

    let (status, plan) = t
        .post(
            "/api/superadmin/plans",
            &root,
            json!({ "name": "Starter", "monthly_price": "29.90", "max_rooms": 10, "max_employees": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(plan["monthly_price"], "29.90");

    let (status, first) = t
        .post(
            "/api/superadmin/subscriptions",
            &root,
            json!({ "hotel_id": hotel_id, "plan_id": plan["id"], "months": 12 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["status"], "active");

    let (status, _) = t
        .post(
            "/api/superadmin/subscriptions",
            &root,
            json!({ "hotel_id": hotel_id, "plan_id": plan["id"], "months": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, all) = t
        .get(&format!("/api/superadmin/subscriptions?hotel_id={hotel_id}"), &root)
        .await;
    let statuses: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses.iter().filter(|s| **s == "active").count(), 1);
    assert!(statuses.contains(&"cancelled"));

    let (status, admin) = t
        .post(
            &format!("/api/superadmin/hotels/{hotel_id}/admins"),
            &root,
            json!({
                "first_name": "Marie",
                "last_name": "Curie",
                "email": "marie@grand.example.com",
                "password": "radium1898"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(admin["role"], "admin");
    assert_eq!(admin["hotel_id"], hotel_id.to_string());

    let (status, stats) = t.get("/api/superadmin/stats", &root).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["hotels"], 1);
    assert_eq!(stats["active_subscriptions"], 1);

    let (status, _) = t
        .call("DELETE", &format!("/api/superadmin/hotels/{hotel_id}"), Some(&root), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = t.get(&format!("/api/superadmin/hotels/{hotel_id}"), &root).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Rooms, tenants and plan limits
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admins_only_see_their_own_hotel() {
    let t = TestApp::new().await;
    let (_, admin_a) = t.hotel("Alpha", 5, 5).await;
    let (_, admin_b) = t.hotel("Beta", 5, 5).await;
    let room = t.room(&admin_a, "101").await;

    let (status, _) = t.get(&format!("/api/admin/rooms/{room}"), &admin_a).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = t.get(&format!("/api/admin/rooms/{room}"), &admin_b).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "room not found");

    let (_, rooms) = t.get("/api/admin/rooms", &admin_b).await;
    assert!(rooms.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn room_numbers_are_unique_and_limited_by_plan() {
    let t = TestApp::new().await;
    let (_, admin) = t.hotel("Limited", 2, 5).await;
    let (_, room_type) = t
        .post(
            "/api/admin/room-types",
            &admin,
            json!({ "name": "Single", "capacity": 1, "base_price": "80" }),
        )
        .await;
    let (status, _) = t
        .post(
            "/api/admin/room-types",
            &admin,
            json!({ "name": "Palace", "capacity": 2, "base_price": "79228162514264337593543950335" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let room = |number: &str| json!({ "room_type_id": room_type["id"], "number": number, "floor": 1 });

    let (status, _) = t.post("/api/admin/rooms", &admin, room("101")).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = t.post("/api/admin/rooms", &admin, room("101")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = t.post("/api/admin/rooms", &admin, room("102")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = t.post("/api/admin/rooms", &admin, room("103")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "plan limit reached: plan allows at most 2 rooms");

    let (_, usage) = t.get("/api/admin/subscription", &admin).await;
    assert_eq!(usage["rooms"], 2);
    assert_eq!(usage["subscription"]["max_rooms"], 2);
}

#[tokio::test]
async fn hotel_without_subscription_cannot_grow() {
    let t = TestApp::new().await;
    let hotel = hotels::create_hotel(
        &t.pool,
        &HotelFields {
            name: "Unpaid".into(),
            address: "3 rue".into(),
            city: "Nice".into(),
            country: "France".into(),
            phone: None,
            email: None,
            stars: 2,
        },
    )
    .await
    .unwrap();
    let (_, admin) = t.user("admin@unpaid.example.com", Role::Admin, Some(hotel.id)).await;

    let (_, room_type) = t
        .post(
            "/api/admin/room-types",
            &admin,
            json!({ "name": "Single", "capacity": 1, "base_price": "80" }),
        )
        .await;
    let (status, _) = t
        .post(
            "/api/admin/rooms",
            &admin,
            json!({ "room_type_id": room_type["id"], "number": "1" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn occupied_is_not_a_manual_room_status() {
    let t = TestApp::new().await;
    let (_, admin) = t.hotel("Manual", 5, 5).await;
    let room = t.room(&admin, "101").await;
    let uri = format!("/api/admin/rooms/{room}/status");

    let (status, _) = t.patch(&uri, &admin, json!({ "status": "occupied" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = t.patch(&uri, &admin, json!({ "status": "maintenance" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "maintenance");
}

// ---------------------------------------------------------------------------
// Reservations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn booking_lifecycle_keeps_room_in_step() {
    let t = TestApp::new().await;
    let (_, admin) = t.hotel("Lifecycle", 5, 5).await;
    let room = t.room(&admin, "101").await;
    let (_, client) = t.user("guest@example.com", Role::Client, None).await;

    let (status, booking) = t
        .post(
            "/api/client/reservations",
            &client,
            json!({ "room_id": room, "check_in": day(10), "check_out": day(12), "guests": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{booking}");
    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["nights"], 2);
    assert_eq!(booking["total_price"], "240.00");
    let reservation = id(&booking);

    let (_, admin_inbox) = t.get("/api/notifications?unread=true", &admin).await;
    assert_eq!(admin_inbox[0]["kind"], "new_reservation");

    let status_uri = format!("/api/admin/reservations/{reservation}/status");
    let (status, _) = t.patch(&status_uri, &admin, json!({ "status": "checked_out" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = t.patch(&status_uri, &admin, json!({ "status": "confirmed" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");

    let (status, _) = t.patch(&status_uri, &admin, json!({ "status": "checked_in" })).await;
    assert_eq!(status, StatusCode::OK);
    let (_, room_row) = t.get(&format!("/api/admin/rooms/{room}"), &admin).await;
    assert_eq!(room_row["status"], "occupied");

    let (status, _) = t.patch(&status_uri, &admin, json!({ "status": "checked_out" })).await;
    assert_eq!(status, StatusCode::OK);
    let (_, room_row) = t.get(&format!("/api/admin/rooms/{room}"), &admin).await;
    assert_eq!(room_row["status"], "cleaning");

    let (status, _) = t.patch(&status_uri, &admin, json!({ "status": "cancelled" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, client_inbox) = t.get("/api/notifications", &client).await;
    let kinds: Vec<&str> = client_inbox
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["reservation_status"; 3]);
}

#[tokio::test]
async fn overlapping_stays_conflict() {
    let t = TestApp::new().await;
    let (_, admin) = t.hotel("Overlap", 5, 5).await;
    let room = t.room(&admin, "101").await;
    let (_, client) = t.user("guest@example.com", Role::Client, None).await;
    let book = |check_in: i64, check_out: i64| {
        json!({ "room_id": room, "check_in": day(check_in), "check_out": day(check_out), "guests": 1 })
    };

    let (status, first) = t.post("/api/client/reservations", &client, book(10, 13)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = t.post("/api/client/reservations", &client, book(12, 15)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = t.post("/api/client/reservations", &client, book(13, 15)).await;
    assert_eq!(status, StatusCode::CREATED, "back-to-back stays share the turnover day");

    let (status, _) = t
        .post(&format!("/api/client/reservations/{}/cancel", id(&first)), &client, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = t.post("/api/client/reservations", &client, book(11, 13)).await;
    assert_eq!(status, StatusCode::CREATED, "cancelled stays free the room");
}

#[tokio::test]
async fn booking_rules_are_validated() {
    let t = TestApp::new().await;
    let (_, admin) = t.hotel("Rules", 5, 5).await;
    let room = t.room(&admin, "101").await;
    let (_, client) = t.user("guest@example.com", Role::Client, None).await;

    let (status, _) = t
        .post(
            "/api/client/reservations",
            &client,
            json!({ "room_id": room, "check_in": day(5), "check_out": day(5), "guests": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t
        .post(
            "/api/client/reservations",
            &client,
            json!({ "room_id": room, "check_in": day(-2), "check_out": day(1), "guests": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t
        .post(
            "/api/client/reservations",
            &client,
            json!({ "room_id": room, "check_in": day(5), "check_out": day(6), "guests": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t
        .post(
            "/api/client/reservations",
            &client,
            json!({ "room_id": Uuid::new_v4(), "check_in": day(5), "check_out": day(6), "guests": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn clients_only_reach_their_own_reservations() {
    let t = TestApp::new().await;
    let (_, admin) = t.hotel("Private", 5, 5).await;
    let room = t.room(&admin, "101").await;
    let (_, alice) = t.user("alice@example.com", Role::Client, None).await;
    let (_, bob) = t.user("bob@example.com", Role::Client, None).await;

    let (_, booking) = t
        .post(
            "/api/client/reservations",
            &alice,
            json!({ "room_id": room, "check_in": day(3), "check_out": day(4), "guests": 1 }),
        )
        .await;
    let uri = format!("/api/client/reservations/{}", id(&booking));

    let (status, _) = t.get(&uri, &alice).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = t.get(&uri, &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = t.post(&format!("{uri}/cancel"), &bob, json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, cancelled) = t.post(&format!("{uri}/cancel"), &alice, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");
    let (status, _) = t.post(&format!("{uri}/cancel"), &alice, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn employees_only_check_guests_in_and_out() {
    let t = TestApp::new().await;
    let (hotel_id, admin) = t.hotel("FrontDesk", 5, 5).await;
    let room = t.room(&admin, "101").await;
    let (client_id, _) = t.user("guest@example.com", Role::Client, None).await;
    let (_, employee) = t.user("desk@example.com", Role::Employee, Some(hotel_id)).await;

    let (status, booking) = t
        .post(
            "/api/admin/reservations",
            &admin,
            json!({
                "client_id": client_id,
                "room_id": room,
                "check_in": day(0),
                "check_out": day(2),
                "guests": 2
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{booking}");
    assert_eq!(booking["status"], "confirmed");
    let uri = format!("/api/employee/reservations/{}/status", id(&booking));

    let (status, _) = t.patch(&uri, &employee, json!({ "status": "cancelled" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = t.patch(&uri, &employee, json!({ "status": "checked_in" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "checked_in");

    let (_, list) = t.get("/api/employee/reservations?status=checked_in", &employee).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn availability_hides_booked_and_small_rooms() {
    let t = TestApp::new().await;
    let (hotel_id, admin) = t.hotel("Search", 5, 5).await;
    let booked = t.room(&admin, "101").await;
    let free = t.room(&admin, "102").await;
    let (_, client) = t.user("guest@example.com", Role::Client, None).await;

    t.post(
        "/api/client/reservations",
        &client,
        json!({ "room_id": booked, "check_in": day(20), "check_out": day(25), "guests": 1 }),
    )
    .await;

    let uri = format!(
        "/api/client/availability?hotel_id={hotel_id}&check_in={}&check_out={}&guests=2",
        day(22),
        day(24)
    );
    let (status, rooms) = t.get(&uri, &client).await;
    assert_eq!(status, StatusCode::OK);
    let rooms = rooms.as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["room_id"], free.to_string());
    assert_eq!(rooms[0]["total_price"], "240.00");

    let uri = format!(
        "/api/client/availability?hotel_id={hotel_id}&check_in={}&check_out={}&guests=3",
        day(22),
        day(24)
    );
    let (_, rooms) = t.get(&uri, &client).await;
    assert!(rooms.as_array().unwrap().is_empty());

    let (_, listed) = t.get("/api/client/hotels", &client).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Stocks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stock_ledger_guards_quantity_and_alerts_admins() {
    let t = TestApp::new().await;
    let (hotel_id, admin) = t.hotel("Store", 5, 5).await;
    let (_, employee) = t.user("store@example.com", Role::Employee, Some(hotel_id)).await;

    let (status, stock) = t
        .post(
            "/api/admin/stocks",
            &admin,
            json!({ "name": "Towels", "category": "linen", "unit": "pcs", "alert_threshold": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stock["quantity"], 0);
    let movements = format!("/api/employee/stocks/{}/movements", id(&stock));

    let (status, body) = t.post(&movements, &employee, json!({ "kind": "in", "quantity": 10 })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["stock"]["quantity"], 10);

    let (status, _) = t.post(&movements, &employee, json!({ "kind": "out", "quantity": 11 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t.post(&movements, &employee, json!({ "kind": "out", "quantity": 0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = t
        .post(&movements, &employee, json!({ "kind": "adjustment", "quantity": i64::MIN }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, inbox) = t.get("/api/notifications", &admin).await;
    assert!(inbox.as_array().unwrap().is_empty());

    let (status, body) = t
        .post(&movements, &employee, json!({ "kind": "out", "quantity": 6, "reason": "laundry" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["stock"]["quantity"], 4);
    assert_eq!(body["movement"]["quantity"], -6);

    let (_, ledger) = t
        .get(&format!("/api/admin/stocks/{}/movements", id(&stock)), &admin)
        .await;
    assert_eq!(ledger.as_array().unwrap().len(), 2);

    let (_, alerts) = t.get("/api/admin/stocks/alerts", &admin).await;
    assert_eq!(alerts[0]["name"], "Towels");

    let (_, inbox) = t.get("/api/notifications", &admin).await;
    assert_eq!(inbox[0]["kind"], "low_stock");

    let (_, dashboard) = t.get("/api/admin/dashboard", &admin).await;
    assert_eq!(dashboard["low_stock_items"], 1);
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

#[tokio::test]
async fn planning_refuses_overlapping_shifts_and_copies_weeks() {
    let t = TestApp::new().await;
    let (_, admin) = t.hotel("Planning", 5, 1).await;

    let staff = |email: &str| {
        json!({ "first_name": "Sam", "last_name": "Porter", "email": email, "password": "password123" })
    };
    let (status, employee) = t.post("/api/admin/employees", &admin, staff("sam@example.com")).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = t.post("/api/admin/employees", &admin, staff("max@example.com")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let employee_id = id(&employee);
    let work_date = day(7);
    let shift = |start: &str, end: &str| {
        json!({
            "employee_id": employee_id,
            "work_date": work_date,
            "start_time": start,
            "end_time": end,
            "task": "reception"
        })
    };

    let (status, _) = t.post("/api/admin/planning", &admin, shift("09:00:00", "17:00:00")).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = t.post("/api/admin/planning", &admin, shift("12:00:00", "14:00:00")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = t.post("/api/admin/planning", &admin, shift("17:00:00", "18:00:00")).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = t.post("/api/admin/planning", &admin, shift("20:00:00", "19:00:00")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, week) = t.get(&format!("/api/admin/planning?week={work_date}"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(week["entries"].as_array().unwrap().len(), 2);
    assert_eq!(week["total_hours"], 9.0);

    let employee_token = t.token_for(employee_id).await;
    let (_, own) = t
        .get(&format!("/api/employee/planning?week={work_date}"), &employee_token)
        .await;
    assert_eq!(own["entries"].as_array().unwrap().len(), 2);

    let next_week = day(14);
    let copy = json!({ "from_week": work_date, "to_week": next_week });
    let (status, copied) = t.post("/api/admin/planning/copy-week", &admin, copy.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(copied["created"].as_array().unwrap().len(), 2);
    assert_eq!(copied["skipped"], 0);

    let (_, again) = t.post("/api/admin/planning/copy-week", &admin, copy).await;
    assert_eq!(again["created"].as_array().unwrap().len(), 0);
    assert_eq!(again["skipped"], 2);

    let (status, _) = t
        .call("DELETE", &format!("/api/admin/employees/{employee_id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let copy = json!({ "from_week": work_date, "to_week": day(21) });
    let (status, copied) = t.post("/api/admin/planning/copy-week", &admin, copy).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(copied["created"].as_array().unwrap().len(), 0);
    assert_eq!(copied["skipped"], 2);
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[tokio::test]
async fn notifications_can_be_read_and_deleted() {
    let t = TestApp::new().await;
    let (hotel_id, admin) = t.hotel("Inbox", 5, 5).await;
    let admin_id = users::list_active_admin_ids(&t.pool, hotel_id).await.unwrap()[0];
    db::repository::notifications::notify_users(&t.pool, &[admin_id], "info", "One", "first")
        .await
        .unwrap();
    db::repository::notifications::notify_users(&t.pool, &[admin_id], "info", "Two", "second")
        .await
        .unwrap();

    let (_, all) = t.get("/api/notifications", &admin).await;
    let first = id(&all[0]);

    let (status, read) = t.patch(&format!("/api/notifications/{first}/read"), &admin, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["is_read"], true);

    let (_, unread) = t.get("/api/notifications?unread=true", &admin).await;
    assert_eq!(unread.as_array().unwrap().len(), 1);

    let (_, result) = t.post("/api/notifications/read-all", &admin, json!({})).await;
    assert_eq!(result["updated"], 1);

    let (status, _) = t
        .call("DELETE", &format!("/api/notifications/{first}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, client) = t.user("other@example.com", Role::Client, None).await;
    let second = id(&t.get("/api/notifications", &admin).await.1[0]);
    let (status, _) = t
        .call("DELETE", &format!("/api/notifications/{second}"), Some(&client), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
