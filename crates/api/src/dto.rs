//! Request bodies, query strings, and the responses that differ from the
//! stored rows (money as decimals, computed fields).
//!
//! Rows without money columns are returned as-is from `db::models`.

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use db::models::{
    AvailableRoomRow, HotelRow, PlanRow, ReservationRow, RoomTypeRow, SubscriptionWithPlanRow, UserRow,
};
use domain::{cents_to_decimal, MovementKind, ReservationStatus, RoomStatus, StayPeriod};

use crate::error::ApiError;

// ---------------------------------------------------------------------------
// Validated JSON extractor
// ---------------------------------------------------------------------------

/// `Json<T>` that also runs `T::validate()` and reports both malformed JSON
/// and rule violations as `ApiError::BadRequest`.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserRow,
}

// ---------------------------------------------------------------------------
// Hotels and staff
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct HotelRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 300))]
    pub address: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub stars: i64,
}

#[derive(Debug, Deserialize)]
pub struct HotelQuery {
    pub city: Option<String>,
}

/// Account creation for admins (by a superadmin) and employees (by an admin).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStaffRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub phone: Option<String>,
    #[validate(length(max = 100))]
    pub position: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEmployeeRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub phone: Option<String>,
    #[validate(length(max = 100))]
    pub position: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Plans and subscriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct PlanRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub monthly_price: Decimal,
    #[validate(range(min = 0))]
    pub max_rooms: i64,
    #[validate(range(min = 0))]
    pub max_employees: i64,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: Uuid,
    pub name: String,
    pub monthly_price: Decimal,
    pub max_rooms: i64,
    pub max_employees: i64,
    pub description: Option<String>,
    pub is_active: bool,
}

impl From<PlanRow> for PlanResponse {
    fn from(row: PlanRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            monthly_price: cents_to_decimal(row.monthly_price_cents),
            max_rooms: row.max_rooms,
            max_employees: row.max_employees,
            description: row.description,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubscriptionRequest {
    pub hotel_id: Uuid,
    pub plan_id: Uuid,
    #[validate(range(min = 1, max = 60))]
    pub months: u32,
    /// Defaults to today.
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionQuery {
    pub hotel_id: Option<Uuid>,
}

/// The caller's hotel subscription with current usage.
#[derive(Debug, Serialize)]
pub struct SubscriptionUsage {
    pub subscription: Option<SubscriptionWithPlanRow>,
    pub rooms: i64,
    pub employees: i64,
}

#[derive(Debug, Serialize)]
pub struct PlatformStats {
    pub hotels: i64,
    pub users_by_role: Vec<CountBy>,
    pub active_subscriptions: i64,
}

#[derive(Debug, Serialize)]
pub struct CountBy {
    pub key: String,
    pub count: i64,
}

impl From<(String, i64)> for CountBy {
    fn from((key, count): (String, i64)) -> Self {
        Self { key, count }
    }
}

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct RoomTypeRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 20))]
    pub capacity: i64,
    pub base_price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct RoomTypeResponse {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub capacity: i64,
    pub base_price: Decimal,
}

impl From<RoomTypeRow> for RoomTypeResponse {
    fn from(row: RoomTypeRow) -> Self {
        Self {
            id: row.id,
            hotel_id: row.hotel_id,
            name: row.name,
            description: row.description,
            capacity: row.capacity,
            base_price: cents_to_decimal(row.base_price_cents),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RoomRequest {
    pub room_type_id: Uuid,
    #[validate(length(min = 1, max = 20))]
    pub number: String,
    #[validate(range(min = -5, max = 200))]
    #[serde(default)]
    pub floor: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RoomStatusRequest {
    pub status: RoomStatus,
}

#[derive(Debug, Deserialize)]
pub struct RoomQuery {
    pub status: Option<RoomStatus>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub hotel_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "default_guests")]
    pub guests: i64,
}

fn default_guests() -> i64 {
    1
}

#[derive(Debug, Serialize)]
pub struct AvailableRoom {
    pub room_id: Uuid,
    pub number: String,
    pub floor: i64,
    pub room_type_id: Uuid,
    pub room_type: String,
    pub capacity: i64,
    pub nightly_price: Decimal,
    /// Price of the whole requested stay.
    pub total_price: Decimal,
}

impl AvailableRoom {
    pub fn new(row: AvailableRoomRow, period: &StayPeriod) -> Self {
        let nightly_price = cents_to_decimal(row.base_price_cents);
        Self {
            room_id: row.room_id,
            number: row.number,
            floor: row.floor,
            room_type_id: row.room_type_id,
            room_type: row.room_type_name,
            capacity: row.capacity,
            nightly_price,
            total_price: period.quote(nightly_price),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HotelWithRoomTypes {
    #[serde(flatten)]
    pub hotel: HotelRow,
    pub room_types: Vec<RoomTypeResponse>,
}

// ---------------------------------------------------------------------------
// Reservations
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct ReservationRequest {
    /// Required when staff book on behalf of a client; ignored for clients.
    pub client_id: Option<Uuid>,
    pub room_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1, max = 20))]
    pub guests: i64,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReservationStatusRequest {
    pub status: ReservationStatus,
}

#[derive(Debug, Deserialize)]
pub struct ReservationQuery {
    pub status: Option<ReservationStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub room_id: Uuid,
    pub client_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub guests: i64,
    pub status: String,
    pub total_price: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReservationRow> for ReservationResponse {
    fn from(row: ReservationRow) -> Self {
        Self {
            id: row.id,
            hotel_id: row.hotel_id,
            room_id: row.room_id,
            client_id: row.client_id,
            check_in: row.check_in,
            check_out: row.check_out,
            nights: (row.check_out - row.check_in).num_days(),
            guests: row.guests,
            status: row.status,
            total_price: cents_to_decimal(row.total_price_cents),
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Stocks
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct StockRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub alert_threshold: i64,
}

#[derive(Debug, Deserialize)]
pub struct StockQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MovementRequest {
    pub kind: MovementKind,
    pub quantity: i64,
    #[validate(length(max = 300))]
    pub reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct PlanningRequest {
    pub employee_id: Uuid,
    pub work_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[validate(length(min = 1, max = 200))]
    pub task: String,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    /// Any day of the wanted week; defaults to the current week.
    pub week: Option<NaiveDate>,
    pub employee_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CopyWeekRequest {
    /// Any day of the week to copy from.
    pub from_week: NaiveDate,
    /// Any day of the week to copy to.
    pub to_week: NaiveDate,
    pub employee_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct WeekPlanning<T: Serialize> {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_hours: f64,
    pub entries: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct CopyWeekResponse<T: Serialize> {
    pub created: Vec<T>,
    /// Source entries skipped because the employee already works then.
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Notifications and dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread: bool,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub rooms_by_status: Vec<CountBy>,
    pub reservations_by_status: Vec<CountBy>,
    pub arrivals_today: i64,
    pub departures_today: i64,
    pub revenue_this_month: Decimal,
    pub low_stock_items: i64,
}
