//! Partner account status state machine

use serde::{Deserialize, Serialize};

/// Account status
///
/// Lifecycle: accounts are created as `PendingEmailValidation`, move to
/// `PendingApproval` once the email is verified, and from there an admin
/// assigns `Active` or `Rejected`. `Suspended` and `Inactive` are
/// admin-reachable from `Active` at any later point. Only `Active`
/// grants access to protected partner resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerStatus {
    /// Registered, awaiting email verification
    PendingEmailValidation,
    /// Email verified, awaiting admin approval
    PendingApproval,
    /// Approved, fully active
    Active,
    /// Rejected by an admin (terminal for the automated flow)
    Rejected,
    /// Temporarily suspended by an admin
    Suspended,
    /// Deactivated by an admin
    Inactive,
}

impl PartnerStatus {
    /// Parse from database string value (lowercase)
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending_email_validation" => Some(Self::PendingEmailValidation),
            "pending_approval" => Some(Self::PendingApproval),
            "active" => Some(Self::Active),
            "rejected" => Some(Self::Rejected),
            "suspended" => Some(Self::Suspended),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }

    /// Database string representation (lowercase)
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::PendingEmailValidation => "pending_email_validation",
            Self::PendingApproval => "pending_approval",
            Self::Active => "active",
            Self::Rejected => "rejected",
            Self::Suspended => "suspended",
            Self::Inactive => "inactive",
        }
    }

    /// Does this status grant access to protected partner resources?
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// May an admin assign this status through the approval workflow?
    ///
    /// `PendingEmailValidation` is excluded: that state is only ever set
    /// by registration itself, and re-entering it would orphan the
    /// verification flow.
    pub fn admin_assignable(&self) -> bool {
        matches!(
            self,
            Self::PendingApproval | Self::Active | Self::Rejected | Self::Suspended | Self::Inactive
        )
    }

    /// Human-readable reason used when the access gate denies a partner
    /// whose status is not `Active`.
    pub fn denial_reason(&self) -> &'static str {
        match self {
            Self::PendingEmailValidation => {
                "Your email address has not been verified yet. Check your inbox."
            }
            Self::PendingApproval => {
                "Your registration is awaiting approval. You will be notified by email."
            }
            Self::Active => "Account is active",
            Self::Rejected => "Your registration was not approved.",
            Self::Suspended => "Your account has been suspended. Contact support.",
            Self::Inactive => "Your account is inactive. Contact support.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PartnerStatus; 6] = [
        PartnerStatus::PendingEmailValidation,
        PartnerStatus::PendingApproval,
        PartnerStatus::Active,
        PartnerStatus::Rejected,
        PartnerStatus::Suspended,
        PartnerStatus::Inactive,
    ];

    #[test]
    fn test_db_roundtrip() {
        for status in ALL {
            assert_eq!(PartnerStatus::from_db(status.as_db()), Some(status));
        }
        assert_eq!(PartnerStatus::from_db("pending"), None);
        assert_eq!(PartnerStatus::from_db("ACTIVE"), None);
    }

    #[test]
    fn test_only_active_grants_access() {
        for status in ALL {
            assert_eq!(status.is_active(), status == PartnerStatus::Active);
        }
    }

    #[test]
    fn test_admin_assignable_set() {
        assert!(!PartnerStatus::PendingEmailValidation.admin_assignable());
        assert!(PartnerStatus::PendingApproval.admin_assignable());
        assert!(PartnerStatus::Active.admin_assignable());
        assert!(PartnerStatus::Rejected.admin_assignable());
        assert!(PartnerStatus::Suspended.admin_assignable());
        assert!(PartnerStatus::Inactive.admin_assignable());
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&PartnerStatus::PendingApproval).unwrap(),
            "\"pending_approval\""
        );
        let status: PartnerStatus = serde_json::from_str("\"suspended\"").unwrap();
        assert_eq!(status, PartnerStatus::Suspended);
    }
}
