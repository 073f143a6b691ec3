//! `domain` crate — business rules of the hotel manager.
//!
//! Everything here is pure: no database, no HTTP.  The `api` crate calls into
//! these types to validate a request before handing it to the `db` crate.

pub mod error;
pub mod money;
pub mod planning;
pub mod reservation;
pub mod role;
pub mod room;
pub mod stock;
pub mod subscription;

pub use error::DomainError;
pub use money::{cents_to_decimal, decimal_to_cents};
pub use planning::{week_bounds, Shift};
pub use reservation::{ReservationStatus, StayPeriod};
pub use role::Role;
pub use room::RoomStatus;
pub use stock::MovementKind;
pub use subscription::SubscriptionStatus;
