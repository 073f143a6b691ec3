//! Domain-level error types.

use thiserror::Error;

/// Errors produced when a request breaks a business rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // ------ Parsing ------

    /// A stored or submitted enum value is not recognised.
    #[error("unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    // ------ Reservations ------

    /// Check-out is not strictly after check-in, or the stay is too long.
    #[error("invalid stay period: {0}")]
    InvalidPeriod(String),

    /// The reservation status machine does not allow this move.
    #[error("cannot change reservation status from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    /// Room cannot take guests in its current state.
    #[error("room is not usable: {0}")]
    RoomUnavailable(String),

    // ------ Money ------

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    // ------ Stock ------

    #[error("invalid movement quantity: {0}")]
    InvalidQuantity(String),

    /// Applying the movement would drive the quantity below zero.
    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i64, requested: i64 },

    // ------ Planning ------

    #[error("invalid shift: {0}")]
    InvalidShift(String),

    /// The employee already works during part of this shift.
    #[error("shift overlaps an existing shift: {0}")]
    ShiftConflict(String),

    // ------ Subscriptions ------

    #[error("hotel has no active subscription")]
    SubscriptionInactive,

    #[error("plan limit reached: {0}")]
    PlanLimitReached(String),
}
