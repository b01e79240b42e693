//! Which part of the platform an error code belongs to

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Domain of an [`ErrorCode`], taken from its thousands digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Auth,
    Permission,
    /// Restaurants and their branches
    Tenant,
    Order,
    Payment,
    Menu,
    Table,
    User,
    System,
}

impl ErrorCategory {
    const BY_THOUSAND: [ErrorCategory; 9] = [
        Self::General,
        Self::Auth,
        Self::Permission,
        Self::Tenant,
        Self::Order,
        Self::Payment,
        Self::Menu,
        Self::Table,
        Self::User,
    ];

    /// Anything at or above 9000 counts as a system error.
    pub fn from_code(code: u16) -> Self {
        Self::BY_THOUSAND
            .get(usize::from(code / 1000))
            .copied()
            .unwrap_or(Self::System)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Tenant => "tenant",
            Self::Order => "order",
            Self::Payment => "payment",
            Self::Menu => "menu",
            Self::Table => "table",
            Self::User => "user",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands_digit_picks_category() {
        let cases = [
            (0, ErrorCategory::General),
            (999, ErrorCategory::General),
            (1001, ErrorCategory::Auth),
            (3101, ErrorCategory::Tenant),
            (4010, ErrorCategory::Order),
            (6101, ErrorCategory::Menu),
            (8002, ErrorCategory::User),
            (9401, ErrorCategory::System),
            (u16::MAX, ErrorCategory::System),
        ];
        for (code, expected) in cases {
            assert_eq!(ErrorCategory::from_code(code), expected, "code {code}");
        }
    }

    #[test]
    fn test_codes_land_in_their_domain() {
        assert_eq!(ErrorCode::OrderEmpty.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::PaymentQrExpired.category(), ErrorCategory::Payment);
        assert_eq!(ErrorCode::TableNotSelected.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::StorageError.category().name(), "system");
    }

    #[test]
    fn test_snake_case_on_the_wire() {
        assert_eq!(serde_json::to_string(&ErrorCategory::Menu).unwrap(), "\"menu\"");
        let category: ErrorCategory = serde_json::from_str("\"auth\"").unwrap();
        assert_eq!(category, ErrorCategory::Auth);
    }
}
