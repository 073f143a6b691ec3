//! Row structs that map 1-to-1 onto database tables, plus the insert
//! payloads the repositories accept.
//!
//! These are *persistence* models — they carry no domain behaviour.
//! Enum-like columns (`role`, `status`, `kind`) are plain strings here; the
//! typed versions live in the `domain` crate.  Money columns are cents.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    /// Set for admins and employees only.
    pub hotel_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    /// Always stored lowercased.
    pub email: String,
    pub phone: Option<String>,
    /// Argon2id PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    /// Job title, employees only.
    pub position: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub hotel_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub position: Option<String>,
}

/// Editable profile fields.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// hotels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HotelRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub stars: i64,
    pub created_at: DateTime<Utc>,
}

/// Insert and update payload for a hotel.
#[derive(Debug, Clone)]
pub struct HotelFields {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub stars: i64,
}

// ---------------------------------------------------------------------------
// room_types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoomTypeRow {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub capacity: i64,
    pub base_price_cents: i64,
}

#[derive(Debug, Clone)]
pub struct RoomTypeFields {
    pub name: String,
    pub description: Option<String>,
    pub capacity: i64,
    pub base_price_cents: i64,
}

// ---------------------------------------------------------------------------
// rooms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoomRow {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub room_type_id: Uuid,
    pub number: String,
    pub floor: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RoomFields {
    pub room_type_id: Uuid,
    pub number: String,
    pub floor: i64,
}

/// A bookable room joined with its type, as returned by availability search.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AvailableRoomRow {
    pub room_id: Uuid,
    pub number: String,
    pub floor: i64,
    pub room_type_id: Uuid,
    pub room_type_name: String,
    pub capacity: i64,
    pub base_price_cents: i64,
}

// ---------------------------------------------------------------------------
// reservations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReservationRow {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub room_id: Uuid,
    pub client_id: Uuid,
    pub check_in: NaiveDate,
    /// Exclusive: the guest leaves on this date.
    pub check_out: NaiveDate,
    pub guests: i64,
    pub status: String,
    pub total_price_cents: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReservation {
    pub hotel_id: Uuid,
    pub room_id: Uuid,
    pub client_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i64,
    pub status: String,
    pub total_price_cents: i64,
    pub notes: Option<String>,
}

/// Optional filters for reservation listings.
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub status: Option<String>,
    /// Keep stays that end after this date.
    pub from: Option<NaiveDate>,
    /// Keep stays that start before this date.
    pub to: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// stocks / stock_movements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StockRow {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub quantity: i64,
    pub alert_threshold: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct StockFields {
    pub name: String,
    pub category: String,
    pub unit: String,
    pub alert_threshold: i64,
}

/// One ledger line.  `quantity` is the signed delta that was applied.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StockMovementRow {
    pub id: Uuid,
    pub stock_id: Uuid,
    pub user_id: Option<Uuid>,
    pub kind: String,
    pub quantity: i64,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStockMovement {
    pub stock_id: Uuid,
    pub user_id: Option<Uuid>,
    pub kind: String,
    pub delta: i64,
    pub reason: Option<String>,
}

// ---------------------------------------------------------------------------
// planning_entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanningEntryRow {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub employee_id: Uuid,
    pub work_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub task: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PlanningFields {
    pub employee_id: Uuid,
    pub work_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub task: String,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// plans / subscriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanRow {
    pub id: Uuid,
    pub name: String,
    pub monthly_price_cents: i64,
    pub max_rooms: i64,
    pub max_employees: i64,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct PlanFields {
    pub name: String,
    pub monthly_price_cents: i64,
    pub max_rooms: i64,
    pub max_employees: i64,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubscriptionRow {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub plan_id: Uuid,
    pub status: String,
    pub start_date: NaiveDate,
    /// Inclusive last day of coverage.
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A subscription joined with the limits of its plan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubscriptionWithPlanRow {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub plan_id: Uuid,
    pub plan_name: String,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub max_rooms: i64,
    pub max_employees: i64,
}

#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub hotel_id: Uuid,
    pub plan_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
