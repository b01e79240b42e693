//! VietQR bank-transfer payload

use crate::{ClientError, ClientResult};
use chrono::{DateTime, Duration, Utc};
use reqwest::Url;
use rust_decimal::{Decimal, RoundingStrategy};
use shared::models::{BankInfo, short_id};

const IMAGE_BASE: &str = "https://img.vietqr.io/image";

pub const DEFAULT_BANK_CODE: &str = "VCB";
pub const DEFAULT_ACCOUNT_NUMBER: &str = "0123456789";
pub const DEFAULT_ACCOUNT_NAME: &str = "NHA HANG";

/// Account the guest transfers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccount {
    pub bank_code: String,
    pub account_number: String,
    pub account_name: String,
}

impl Default for BankAccount {
    fn default() -> Self {
        Self {
            bank_code: DEFAULT_BANK_CODE.to_string(),
            account_number: DEFAULT_ACCOUNT_NUMBER.to_string(),
            account_name: DEFAULT_ACCOUNT_NAME.to_string(),
        }
    }
}

impl BankAccount {
    /// Fill blanks with the house account
    pub fn with_defaults(
        bank_code: Option<&str>,
        account_number: Option<&str>,
        account_name: Option<&str>,
    ) -> Self {
        let pick = |value: Option<&str>, fallback: &str| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };
        Self {
            bank_code: pick(bank_code, DEFAULT_BANK_CODE),
            account_number: pick(account_number, DEFAULT_ACCOUNT_NUMBER),
            account_name: pick(account_name, DEFAULT_ACCOUNT_NAME),
        }
    }
}

impl From<&BankInfo> for BankAccount {
    fn from(info: &BankInfo) -> Self {
        Self::with_defaults(
            info.bank_code.as_deref(),
            info.bank_account_number.as_deref(),
            info.bank_account_name.as_deref(),
        )
    }
}

/// Transfer note: `DH {first 8 of order id} Ban{table}`
pub fn transfer_description(order_id: Option<&str>, table_number: Option<&str>) -> String {
    let order = order_id
        .filter(|id| !id.is_empty())
        .map(short_id)
        .unwrap_or_else(|| "UNKNOWN".to_string());
    format!("DH {} Ban{}", order, table_number.unwrap_or_default())
}

/// Amounts are whole đồng
pub fn round_amount(total: Decimal) -> Decimal {
    total.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Everything needed to show a payment QR
#[derive(Debug, Clone, PartialEq)]
pub struct VietQr {
    pub image_url: String,
    /// `VietQR|bank|account|amount|description`
    pub raw_data: String,
    pub description: String,
    pub amount: Decimal,
    pub account: BankAccount,
    pub expires_at: DateTime<Utc>,
}

impl VietQr {
    pub fn build(
        account: &BankAccount,
        total: Decimal,
        order_id: Option<&str>,
        table_number: Option<&str>,
        now: DateTime<Utc>,
        lifetime: std::time::Duration,
    ) -> ClientResult<Self> {
        let amount = round_amount(total);
        let description = transfer_description(order_id, table_number);
        let base = format!(
            "{IMAGE_BASE}/{}-{}-compact2.png",
            account.bank_code, account.account_number
        );
        let url = Url::parse_with_params(
            &base,
            [
                ("amount", amount.to_string()),
                ("addInfo", description.clone()),
                ("accountName", account.account_name.clone()),
            ],
        )
        .map_err(|e| ClientError::invalid(format!("Invalid bank account for QR: {e}")))?;
        let lifetime = Duration::from_std(lifetime)
            .map_err(|e| ClientError::Internal(format!("QR lifetime out of range: {e}")))?;

        Ok(Self {
            image_url: url.to_string(),
            raw_data: format!(
                "VietQR|{}|{}|{}|{}",
                account.bank_code, account.account_number, amount, description
            ),
            description,
            amount,
            account: account.clone(),
            expires_at: now + lifetime,
        })
    }

    /// Whole seconds until expiry, zero once expired
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u64 {
        (self.expires_at - now).num_seconds().max(0) as u64
    }
}
