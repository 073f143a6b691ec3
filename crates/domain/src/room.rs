//! Room housekeeping status.

use serde::{Deserialize, Serialize};

use crate::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Occupied,
    Cleaning,
    Maintenance,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Cleaning => "cleaning",
            Self::Maintenance => "maintenance",
        }
    }

    /// Staff may move a room between `available`, `cleaning` and
    /// `maintenance`.  `occupied` is entered and left only through check-in
    /// and check-out.
    ///
    /// # Errors
    /// [`DomainError::InvalidTransition`] when either side is `occupied`.
    pub fn manual_change(&self, next: RoomStatus) -> Result<RoomStatus, DomainError> {
        if *self == RoomStatus::Occupied || next == RoomStatus::Occupied {
            return Err(DomainError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            });
        }
        Ok(next)
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoomStatus {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available"   => Ok(Self::Available),
            "occupied"    => Ok(Self::Occupied),
            "cleaning"    => Ok(Self::Cleaning),
            "maintenance" => Ok(Self::Maintenance),
            other         => Err(DomainError::UnknownVariant {
                kind: "room status",
                value: other.to_string(),
            }),
        }
    }
}
