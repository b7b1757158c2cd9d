//! Account roles

use serde::{Deserialize, Serialize};

/// Account role
///
/// `Admin` accounts operate the approval workflow and never carry a
/// partner profile. `Reseller` and `Distributor` are the two partner
/// roles; both go through registration and approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Reseller,
    Distributor,
}

impl Role {
    /// Parse from database string value (lowercase)
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "reseller" => Some(Self::Reseller),
            "distributor" => Some(Self::Distributor),
            _ => None,
        }
    }

    /// Database string representation (lowercase)
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Reseller => "reseller",
            Self::Distributor => "distributor",
        }
    }

    /// Is this one of the partner roles?
    pub fn is_partner(&self) -> bool {
        matches!(self, Self::Reseller | Self::Distributor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_roundtrip() {
        for role in [Role::Admin, Role::Reseller, Role::Distributor] {
            assert_eq!(Role::from_db(role.as_db()), Some(role));
        }
        assert_eq!(Role::from_db("manager"), None);
        assert_eq!(Role::from_db(""), None);
    }

    #[test]
    fn test_is_partner() {
        assert!(!Role::Admin.is_partner());
        assert!(Role::Reseller.is_partner());
        assert!(Role::Distributor.is_partner());
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Reseller).unwrap(), "\"reseller\"");
        let role: Role = serde_json::from_str("\"distributor\"").unwrap();
        assert_eq!(role, Role::Distributor);
    }
}
