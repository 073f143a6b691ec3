//! Repository functions — one function per database operation.
//!
//! Every function takes a `&DbPool` and returns a `Result<T, DbError>`.
//! Hotel-owned rows are always looked up together with their `hotel_id`, so
//! a row of another tenant reads as `DbError::NotFound`.

pub mod hotels;
pub mod notifications;
pub mod planning;
pub mod plans;
pub mod reservations;
pub mod room_types;
pub mod rooms;
pub mod stocks;
pub mod subscriptions;
pub mod users;
