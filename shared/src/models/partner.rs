//! Partner wire DTOs

use serde::{Deserialize, Serialize};

use super::{PartnerStatus, Role};

/// Business model of a partner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessModel {
    B2b,
    B2c,
}

impl BusinessModel {
    /// Parse from database string value (lowercase)
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "b2b" => Some(Self::B2b),
            "b2c" => Some(Self::B2c),
            _ => None,
        }
    }

    /// Database string representation (lowercase)
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::B2b => "b2b",
            Self::B2c => "b2c",
        }
    }
}

/// User summary returned by registration and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: PartnerStatus,
}

/// Partner profile as exposed to the admin API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub company_name: String,
    pub phone_number: String,
    pub business_model: Option<BusinessModel>,
    pub discount_percent: Option<f64>,
}

/// One partner row in the admin listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerListItem {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: PartnerStatus,
    pub company_name: String,
    pub phone_number: String,
    pub business_model: Option<BusinessModel>,
    pub discount_percent: Option<f64>,
    pub created_at: i64,
}

/// Page envelope for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_model_roundtrip() {
        assert_eq!(BusinessModel::from_db("b2b"), Some(BusinessModel::B2b));
        assert_eq!(BusinessModel::from_db("b2c"), Some(BusinessModel::B2c));
        assert_eq!(BusinessModel::from_db("c2c"), None);
        assert_eq!(BusinessModel::B2b.as_db(), "b2b");
    }

    #[test]
    fn test_user_summary_serialize() {
        let summary = UserSummary {
            id: "u1".into(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            role: Role::Reseller,
            status: PartnerStatus::PendingEmailValidation,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"role\":\"reseller\""));
        assert!(json.contains("\"status\":\"pending_email_validation\""));
    }

    #[test]
    fn test_paginated_serialize() {
        let page = Paginated {
            items: vec![1, 2, 3],
            page: 1,
            per_page: 20,
            total: 3,
        };
        let json = serde_json::to_string(&page).unwrap();
        assert!(json.contains("\"total\":3"));
    }
}
