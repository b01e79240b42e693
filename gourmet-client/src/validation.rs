//! Input validation helpers
//!
//! Forms are checked before anything is sent, so a rejected submission
//! never reaches the backend.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AiConfigUpdate, BranchCreate, BranchUpdate, CashbackUpdate, CategoryCreate, MenuItemCreate,
    MenuItemUpdate, RegisterRequest, RestaurantUpdate, TableCreate, TableUpdate, UserUpdate,
};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: branch, table, category, menu item, user
pub const MAX_NAME_LEN: usize = 200;

/// Notes and descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Phone numbers, bank codes, account numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords
pub const MAX_PASSWORD_LEN: usize = 128;

pub const MIN_PASSWORD_LEN: usize = 6;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

pub const MAX_ADDRESS_LEN: usize = 500;

/// Assistant temperature range, in percent
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<i64> = 0..=100;

// ── Field helpers ───────────────────────────────────────────────────

/// Required string: non-blank and within the length limit
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    check_len(value, field, max_len)
}

/// Optional string: within the length limit when present
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => check_len(v, field, max_len),
        None => Ok(()),
    }
}

/// Optional edit field: when present it must not be blank either
pub fn validate_optional_required(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_required_text(v, field, max_len),
        None => Ok(()),
    }
}

fn check_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    let value = value.trim();
    match value.split_once('@') {
        Some((user, domain)) if !user.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::validation(format!("'{value}' is not a valid email"))),
    }
}

pub fn validate_price(price: Decimal) -> Result<(), AppError> {
    if price <= Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::MenuItemInvalidPrice,
            format!("Price must be greater than 0 (got {price})"),
        ));
    }
    Ok(())
}

pub fn validate_percent(value: Decimal, field: &str) -> Result<(), AppError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(AppError::validation(format!(
            "{field} must be between 0 and 100 (got {value})"
        )));
    }
    Ok(())
}

pub fn validate_capacity(capacity: u32) -> Result<(), AppError> {
    if capacity == 0 {
        return Err(AppError::validation("capacity must be at least 1"));
    }
    Ok(())
}

/// Temperature as typed by the user, before narrowing to `u8`
pub fn validate_temperature(value: i64) -> Result<u8, AppError> {
    if !TEMPERATURE_RANGE.contains(&value) {
        return Err(AppError::validation(format!(
            "temperature must be between 0 and 100 (got {value})"
        )));
    }
    u8::try_from(value).map_err(|_| AppError::validation("temperature out of range"))
}

// ── Form validation ─────────────────────────────────────────────────

/// A request body that can be checked before submission
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

impl Validate for BranchCreate {
    fn validate(&self) -> Result<(), AppError> {
        validate_required_text(&self.branch_name, "branch_name", MAX_NAME_LEN)?;
        validate_required_text(&self.address, "address", MAX_ADDRESS_LEN)?;
        validate_required_text(&self.province, "province", MAX_NAME_LEN)?;
        validate_required_text(&self.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&self.manager_name, "manager_name", MAX_NAME_LEN)?;
        validate_required_text(&self.opening_hours, "opening_hours", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&self.closing_hours, "closing_hours", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.image, "image", MAX_URL_LEN)?;
        validate_optional_text(&self.google_maps_link, "google_maps_link", MAX_URL_LEN)?;
        validate_optional_text(&self.bank_code, "bank_code", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.bank_account_number, "bank_account_number", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.bank_account_name, "bank_account_name", MAX_NAME_LEN)?;
        if let Some(percent) = self.cashback_percent {
            validate_percent(percent, "cashback_percent")?;
        }
        Ok(())
    }
}

impl Validate for BranchUpdate {
    fn validate(&self) -> Result<(), AppError> {
        validate_optional_required(&self.branch_name, "branch_name", MAX_NAME_LEN)?;
        validate_optional_required(&self.address, "address", MAX_ADDRESS_LEN)?;
        validate_optional_required(&self.province, "province", MAX_NAME_LEN)?;
        validate_optional_required(&self.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_required(&self.manager_name, "manager_name", MAX_NAME_LEN)?;
        validate_optional_text(&self.image, "image", MAX_URL_LEN)?;
        validate_optional_text(&self.google_maps_link, "google_maps_link", MAX_URL_LEN)?;
        if let Some(percent) = self.cashback_percent {
            validate_percent(percent, "cashback_percent")?;
        }
        Ok(())
    }
}

impl Validate for TableCreate {
    fn validate(&self) -> Result<(), AppError> {
        validate_required_text(&self.table_number, "table_number", MAX_NAME_LEN)?;
        validate_capacity(self.capacity)
    }
}

impl Validate for TableUpdate {
    fn validate(&self) -> Result<(), AppError> {
        validate_optional_required(&self.table_number, "table_number", MAX_NAME_LEN)?;
        if let Some(capacity) = self.capacity {
            validate_capacity(capacity)?;
        }
        Ok(())
    }
}

impl Validate for CategoryCreate {
    fn validate(&self) -> Result<(), AppError> {
        validate_required_text(&self.category_name, "category_name", MAX_NAME_LEN)?;
        validate_optional_text(&self.description, "description", MAX_NOTE_LEN)
    }
}

impl Validate for MenuItemCreate {
    fn validate(&self) -> Result<(), AppError> {
        validate_required_text(&self.item_name, "item_name", MAX_NAME_LEN)?;
        validate_required_text(&self.category_id, "category_id", MAX_NAME_LEN)?;
        validate_required_text(&self.branch_id, "branch_id", MAX_NAME_LEN)?;
        validate_optional_text(&self.description, "description", MAX_NOTE_LEN)?;
        validate_optional_text(&self.image, "image", MAX_URL_LEN)?;
        validate_price(self.price)?;
        if let Some(discount) = self.discount_percent {
            validate_percent(discount, "discount_percent")?;
        }
        Ok(())
    }
}

impl Validate for MenuItemUpdate {
    fn validate(&self) -> Result<(), AppError> {
        validate_optional_required(&self.item_name, "item_name", MAX_NAME_LEN)?;
        validate_optional_text(&self.description, "description", MAX_NOTE_LEN)?;
        validate_optional_text(&self.image, "image", MAX_URL_LEN)?;
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(discount) = self.discount_percent {
            validate_percent(discount, "discount_percent")?;
        }
        Ok(())
    }
}

impl Validate for CashbackUpdate {
    fn validate(&self) -> Result<(), AppError> {
        validate_percent(self.cashback_percent, "cashback_percent")
    }
}

impl Validate for AiConfigUpdate {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(temperature) = self.temperature {
            validate_temperature(i64::from(temperature))?;
        }
        validate_optional_required(&self.system_prompt, "system_prompt", 10_000)
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_required_text(&self.full_name, "full_name", MAX_NAME_LEN)?;
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        check_len(&self.password, "password", MAX_PASSWORD_LEN)
    }
}

impl Validate for UserUpdate {
    fn validate(&self) -> Result<(), AppError> {
        validate_optional_required(&self.full_name, "full_name", MAX_NAME_LEN)
    }
}

impl Validate for RestaurantUpdate {
    fn validate(&self) -> Result<(), AppError> {
        validate_optional_required(&self.tenant_name, "tenant_name", MAX_NAME_LEN)?;
        validate_optional_required(&self.owner_name, "owner_name", MAX_NAME_LEN)?;
        if let Some(email) = &self.owner_email {
            validate_email(email)?;
        }
        Ok(())
    }
}
