// shared/src/error/codes.rs
// 错误码表: 一处声明, 同时生成枚举/默认文案/u16 反查

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares every code once and derives the enum, its default message and the
/// `u16` reverse lookup from that single table.
macro_rules! error_codes {
    ($( $(#[$doc:meta])* $name:ident = $value:literal => $msg:literal, )+) => {
        /// Numeric error code carried by [`AppError`](super::AppError).
        ///
        /// The thousands digit picks the [`ErrorCategory`](super::ErrorCategory).
        /// On the wire and in the state file a code is a bare `u16`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u16", try_from = "u16")]
        #[repr(u16)]
        pub enum ErrorCode {
            $( $(#[$doc])* $name = $value, )+
        }

        impl ErrorCode {
            /// Every known code, in declaration order
            pub const ALL: &'static [ErrorCode] = &[$(ErrorCode::$name),+];

            /// Default English text, used when nothing more specific is known
            pub const fn message(&self) -> &'static str {
                match self {
                    $( ErrorCode::$name => $msg, )+
                }
            }
        }

        impl TryFrom<u16> for ErrorCode {
            type Error = InvalidErrorCode;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(ErrorCode::$name), )+
                    other => Err(InvalidErrorCode(other)),
                }
            }
        }
    };
}

error_codes! {
    // 0xxx
    Success = 0 => "Operation completed successfully",
    Unknown = 1 => "An unknown error occurred",
    /// A form or request failed client-side checks
    ValidationFailed = 2 => "Validation failed",
    NotFound = 3 => "Resource not found",
    AlreadyExists = 4 => "Resource already exists",
    InvalidRequest = 5 => "Invalid request",
    /// Response body did not have the expected shape
    InvalidFormat = 6 => "Invalid format",
    RequiredField = 7 => "Required field is missing",
    ValueOutOfRange = 8 => "Value is out of range",

    // 1xxx
    NotAuthenticated = 1001 => "User is not authenticated",
    InvalidCredentials = 1002 => "Invalid email or password",
    TokenExpired = 1003 => "Authentication token has expired",
    TokenInvalid = 1004 => "Authentication token is invalid",
    AccountLocked = 1006 => "Account is locked",

    // 2xxx
    PermissionDenied = 2001 => "You do not have permission to perform this action",
    AdminRequired = 2003 => "Administrator role is required",

    // 3xxx
    /// Signed in, but no restaurant is attached to the account
    TenantNotSelected = 3001 => "No tenant selected",
    TenantNotFound = 3002 => "Tenant not found",
    BranchNotFound = 3101 => "Branch not found",

    // 4xxx
    OrderNotFound = 4001 => "Order not found",
    OrderEmpty = 4007 => "Cart is empty",
    /// Kitchen / serving flow only moves forward
    InvalidStatusTransition = 4008 => "Status transition is not allowed",
    /// Guest tried to order without a table
    TableNotSelected = 4009 => "No table selected",
    SessionNotFound = 4010 => "Session not found",

    // 5xxx
    PaymentFailed = 5001 => "Payment processing failed",
    PaymentInvalidMethod = 5003 => "Invalid payment method",
    BillNotFound = 5006 => "Bill not found",
    /// Waited too long for a transfer to be confirmed
    PaymentQrExpired = 5007 => "QR code has expired",
    PaymentInProgress = 5008 => "A payment is already being processed",

    // 6xxx
    MenuItemNotFound = 6001 => "Menu item not found",
    MenuItemInvalidPrice = 6002 => "Menu item has invalid price",
    CategoryNotFound = 6101 => "Category not found",

    // 7xxx
    TableNotFound = 7001 => "Table not found",
    TableOccupied = 7002 => "Table is occupied",

    // 8xxx
    UserNotFound = 8001 => "User not found",
    UserEmailExists = 8002 => "Email is already registered",

    // 9xxx
    InternalError = 9001 => "Internal server error",
    NetworkError = 9003 => "Network error",
    TimeoutError = 9004 => "Operation timed out",
    ConfigError = 9005 => "Configuration error",
    /// State file could not be read or written
    StorageError = 9401 => "Local storage error",
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A `u16` that names no known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}
