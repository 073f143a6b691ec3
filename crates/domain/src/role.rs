//! User roles.

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Role carried by every user account and embedded in its access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform operator: manages hotels, plans and subscriptions.
    SuperAdmin,
    /// Manager of exactly one hotel.
    Admin,
    /// Staff member of exactly one hotel.
    Employee,
    /// Guest booking rooms across hotels.
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "superadmin",
            Self::Admin => "admin",
            Self::Employee => "employee",
            Self::Client => "client",
        }
    }

    /// Admins and employees are bound to a hotel; the others are not.
    pub fn is_hotel_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Employee)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(Self::SuperAdmin),
            "admin"      => Ok(Self::Admin),
            "employee"   => Ok(Self::Employee),
            "client"     => Ok(Self::Client),
            other        => Err(DomainError::UnknownVariant {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_lowercase() {
        for role in [Role::SuperAdmin, Role::Admin, Role::Employee, Role::Client] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn only_admin_and_employee_are_staff() {
        assert!(Role::Admin.is_hotel_staff());
        assert!(Role::Employee.is_hotel_staff());
        assert!(!Role::Client.is_hotel_staff());
        assert!(!Role::SuperAdmin.is_hotel_staff());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), "\"superadmin\"");
        let role: Role = serde_json::from_str("\"employee\"").unwrap();
        assert_eq!(role, Role::Employee);
    }
}
