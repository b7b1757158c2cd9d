//! Unified error codes for the partner portal
//!
//! Error codes are shared between the server and frontend so that clients
//! can branch on stable numeric codes instead of parsing messages.
//! Codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Partner errors
//! - 4xxx: Document errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Partner account is not active (pending, rejected, suspended, ...)
    PartnerNotActive = 2004,

    // ==================== 3xxx: Partner ====================
    /// Partner not found
    PartnerNotFound = 3001,
    /// Email is already registered
    EmailAlreadyRegistered = 3002,
    /// Verification code expired
    VerificationCodeExpired = 3003,
    /// Verification code invalid
    VerificationCodeInvalid = 3004,
    /// Too many verification attempts
    TooManyAttempts = 3005,
    /// Password too short
    PasswordTooShort = 3006,
    /// Password confirmation does not match
    PasswordMismatch = 3007,
    /// Status value is not in the recognized set
    InvalidStatus = 3008,
    /// Role value is not in the recognized set
    InvalidRole = 3009,
    /// Email has already been verified
    EmailAlreadyVerified = 3010,
    /// Email has not been verified yet
    EmailNotVerified = 3011,

    // ==================== 4xxx: Document ====================
    /// Uploaded document exceeds the size limit
    DocumentTooLarge = 4001,
    /// Uploaded document has an unsupported type
    DocumentTypeUnsupported = 4002,
    /// Required document is missing from the request
    DocumentMissing = 4003,
    /// Stock file not found
    StockFileNotFound = 4101,
    /// No stock file is currently active
    NoActiveStockFile = 4102,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Document storage error
    StorageError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            // General
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",
            Self::RequiredField => "Required field missing",

            // Auth
            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid email or password",
            Self::TokenExpired => "Token has expired",
            Self::TokenInvalid => "Invalid token",
            Self::AccountDisabled => "Account is disabled",

            // Permission
            Self::PermissionDenied => "Permission denied",
            Self::RoleRequired => "Role required",
            Self::AdminRequired => "Admin role required",
            Self::PartnerNotActive => "Partner account is not active",

            // Partner
            Self::PartnerNotFound => "Partner not found",
            Self::EmailAlreadyRegistered => "Email is already registered",
            Self::VerificationCodeExpired => "Verification code expired",
            Self::VerificationCodeInvalid => "Invalid verification code",
            Self::TooManyAttempts => "Too many attempts, request a new code",
            Self::PasswordTooShort => "Password must be at least 8 characters",
            Self::PasswordMismatch => "Password confirmation does not match",
            Self::InvalidStatus => "Status value is not recognized",
            Self::InvalidRole => "Role value is not recognized",
            Self::EmailAlreadyVerified => "Email has already been verified",
            Self::EmailNotVerified => "Email has not been verified",

            // Document
            Self::DocumentTooLarge => "Document exceeds the size limit",
            Self::DocumentTypeUnsupported => "Document type is not supported",
            Self::DocumentMissing => "Required document is missing",
            Self::StockFileNotFound => "Stock file not found",
            Self::NoActiveStockFile => "No stock file is currently available",

            // System
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
            Self::StorageError => "Document storage error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error returned when converting an unrecognized u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::InvalidFormat,
            7 => Self::RequiredField,

            1001 => Self::NotAuthenticated,
            1002 => Self::InvalidCredentials,
            1003 => Self::TokenExpired,
            1004 => Self::TokenInvalid,
            1005 => Self::AccountDisabled,

            2001 => Self::PermissionDenied,
            2002 => Self::RoleRequired,
            2003 => Self::AdminRequired,
            2004 => Self::PartnerNotActive,

            3001 => Self::PartnerNotFound,
            3002 => Self::EmailAlreadyRegistered,
            3003 => Self::VerificationCodeExpired,
            3004 => Self::VerificationCodeInvalid,
            3005 => Self::TooManyAttempts,
            3006 => Self::PasswordTooShort,
            3007 => Self::PasswordMismatch,
            3008 => Self::InvalidStatus,
            3009 => Self::InvalidRole,
            3010 => Self::EmailAlreadyVerified,
            3011 => Self::EmailNotVerified,

            4001 => Self::DocumentTooLarge,
            4002 => Self::DocumentTypeUnsupported,
            4003 => Self::DocumentMissing,
            4101 => Self::StockFileNotFound,
            4102 => Self::NoActiveStockFile,

            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9003 => Self::ConfigError,
            9004 => Self::StorageError,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::EmailAlreadyRegistered.code(), 3002);
        assert_eq!(ErrorCode::NoActiveStockFile.code(), 4102);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::InvalidCredentials,
            ErrorCode::PartnerNotActive,
            ErrorCode::InvalidStatus,
            ErrorCode::DocumentTooLarge,
            ErrorCode::StorageError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(12345), Err(InvalidErrorCode(12345)));
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
    }

    #[test]
    fn test_default_messages() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(
            ErrorCode::EmailAlreadyRegistered.message(),
            "Email is already registered"
        );
        assert_eq!(
            ErrorCode::PasswordTooShort.message(),
            "Password must be at least 8 characters"
        );
    }

    #[test]
    fn test_serialize_as_u16() {
        let json = serde_json::to_string(&ErrorCode::InvalidCredentials).unwrap();
        assert_eq!(json, "1002");

        let code: ErrorCode = serde_json::from_str("3008").unwrap();
        assert_eq!(code, ErrorCode::InvalidStatus);
    }
}
