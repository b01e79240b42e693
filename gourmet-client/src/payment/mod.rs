// gourmet-client/src/payment/mod.rs
// 账单支付: 访客扫码/现金, 员工确认

mod countdown;
mod vietqr;

pub use countdown::{CountdownTick, QrCountdown, URGENT_SECS, format_mmss};
pub use vietqr::{BankAccount, VietQr, round_amount, transfer_description};

use crate::client::GourmetClient;
use crate::http::HttpClient;
use crate::storage::{KeyValueStoreExt, keys};
use crate::{ClientError, ClientResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::ErrorCode;
use shared::models::{
    BillActionResult, BillStatus, BillStatusUpdate, PaymentMethod, SessionDetails, SessionItem,
    StaffBill,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// What the guest is paying for
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentContext {
    pub session_id: String,
    pub order_id: Option<String>,
    pub table_number: Option<String>,
    pub items: Vec<SessionItem>,
    pub subtotal: Decimal,
    pub vat: Decimal,
    pub total: Decimal,
    pub bill_status: BillStatus,
    pub bank: BankAccount,
}

impl PaymentContext {
    pub fn from_details(details: &SessionDetails) -> Self {
        let bill = &details.bill;
        Self {
            session_id: details.session_id.clone(),
            order_id: details.order.order_id.clone(),
            table_number: details.table_number.clone(),
            items: details.order.items.clone(),
            subtotal: details.order.subtotal,
            vat: details.order.vat,
            total: details.order.total,
            bill_status: bill.status,
            bank: BankAccount::with_defaults(
                bill.bank_code.as_deref(),
                bill.bank_account_number.as_deref(),
                bill.bank_account_name.as_deref(),
            ),
        }
    }
}

/// Snapshot stored under `payment_confirmation_data` for the thank-you screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub order_id: Option<String>,
    pub session_id: String,
    pub table_number: Option<String>,
    pub items: Vec<SessionItem>,
    pub subtotal: Decimal,
    pub vat: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub payment_method: String,
    pub timestamp: DateTime<Utc>,
}

/// Clears the in-flight flag when the action ends, however it ends
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> ClientResult<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            return Err(ClientError::rejected(ErrorCode::PaymentInProgress));
        }
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Guest payment screen for one session
pub struct PaymentFlow<H: HttpClient> {
    client: Arc<GourmetClient<H>>,
    context: PaymentContext,
    in_flight: AtomicBool,
}

impl<H: HttpClient> PaymentFlow<H> {
    /// Load the bill for the stored session, or `session_id` when given
    pub async fn load(client: Arc<GourmetClient<H>>, session_id: Option<&str>) -> ClientResult<Self> {
        let session_id = match session_id {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => client
                .store()
                .get(keys::CURRENT_SESSION_ID)
                .filter(|id| !id.is_empty())
                .ok_or_else(|| ClientError::rejected(ErrorCode::SessionNotFound))?,
        };
        let details = client.session_details(&session_id).await?;
        let context = PaymentContext::from_details(&details);
        tracing::info!(
            session_id = %context.session_id,
            total = %context.total,
            items = context.items.len(),
            "Payment context loaded"
        );
        Ok(Self::with_context(client, context))
    }

    pub fn with_context(client: Arc<GourmetClient<H>>, context: PaymentContext) -> Self {
        Self {
            client,
            context,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn context(&self) -> &PaymentContext {
        &self.context
    }

    pub fn is_processing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Transfer QR for the current bill, valid for the configured window
    pub fn qr(&self, now: DateTime<Utc>) -> ClientResult<VietQr> {
        VietQr::build(
            &self.context.bank,
            self.context.total,
            self.context.order_id.as_deref(),
            self.context.table_number.as_deref(),
            now,
            self.client.config().qr_expiry,
        )
    }

    /// Countdown matching the QR window
    pub fn countdown(&self) -> QrCountdown {
        QrCountdown::start(self.client.config().qr_expiry)
    }

    /// Pay with the chosen method
    pub async fn pay(&self, method: PaymentMethod) -> ClientResult<PaymentConfirmation> {
        match method {
            PaymentMethod::BankTransfer => self.confirm_qr_paid().await,
            PaymentMethod::Cash => self.pay_cash().await,
            PaymentMethod::Momo | PaymentMethod::Card => {
                tracing::warn!(%method, "Payment method not offered");
                Err(ClientError::rejected(ErrorCode::PaymentInvalidMethod))
            }
        }
    }

    /// Guest reports the bank transfer as done
    pub async fn confirm_qr_paid(&self) -> ClientResult<PaymentConfirmation> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        self.client
            .update_bill_status(&self.context.session_id, &BillStatusUpdate::bank_transfer_paid())
            .await?;

        let confirmation = self.confirmation("qr");
        self.client
            .store()
            .set_json(keys::PAYMENT_CONFIRMATION, &confirmation)?;
        tracing::info!(session_id = %self.context.session_id, "QR payment reported");
        Ok(confirmation)
    }

    /// Guest asks to pay cash at the counter
    pub async fn pay_cash(&self) -> ClientResult<PaymentConfirmation> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        self.client
            .update_bill_status(&self.context.session_id, &BillStatusUpdate::cash_requested())
            .await?;
        tracing::info!(session_id = %self.context.session_id, "Cash payment requested");
        Ok(self.confirmation("cash"))
    }

    /// Poll the bill until staff settle it.
    ///
    /// Gives up with `PaymentQrExpired` after the configured wait limit.
    pub async fn wait_until_settled(&self) -> ClientResult<BillStatus> {
        let limit = self.client.config().payment_wait_limit;
        let interval = self.client.config().order_poll_interval;
        let session_id = self.context.session_id.clone();

        let watch = async {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match self.client.session_details(&session_id).await {
                    Ok(details) if details.bill.status.is_settled() => {
                        return Ok(details.bill.status);
                    }
                    Ok(_) => {}
                    Err(e) if e.is_unauthorized() => return Err(e),
                    Err(e) => tracing::warn!(session_id = %session_id, error = %e, "Bill status check failed"),
                }
            }
        };

        match tokio::time::timeout(limit, watch).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(session_id = %session_id, "Stopped waiting for payment");
                Err(ClientError::rejected(ErrorCode::PaymentQrExpired))
            }
        }
    }

    fn confirmation(&self, method: &str) -> PaymentConfirmation {
        PaymentConfirmation {
            order_id: self.context.order_id.clone(),
            session_id: self.context.session_id.clone(),
            table_number: self.context.table_number.clone(),
            items: self.context.items.clone(),
            subtotal: self.context.subtotal,
            vat: self.context.vat,
            discount: Decimal::ZERO,
            total: self.context.total,
            payment_method: method.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Staff payment queues for one branch
pub struct StaffPayments<H: HttpClient> {
    client: Arc<GourmetClient<H>>,
    branch_id: String,
    cash_pending: Vec<StaffBill>,
    qr_paid: Vec<StaffBill>,
}

impl<H: HttpClient> StaffPayments<H> {
    pub fn new(client: Arc<GourmetClient<H>>, branch_id: impl Into<String>) -> Self {
        Self {
            client,
            branch_id: branch_id.into(),
            cash_pending: Vec::new(),
            qr_paid: Vec::new(),
        }
    }

    /// Fetch both queues at once
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let (cash, qr) = tokio::try_join!(
            self.client.cash_pending_bills(&self.branch_id),
            self.client.qr_paid_bills(&self.branch_id),
        )?;
        tracing::debug!(
            branch_id = %self.branch_id,
            cash_pending = cash.len(),
            qr_paid = qr.len(),
            "Payment queues refreshed"
        );
        self.cash_pending = cash;
        self.qr_paid = qr;
        Ok(())
    }

    pub fn cash_pending(&self) -> &[StaffBill] {
        &self.cash_pending
    }

    pub fn qr_paid(&self) -> &[StaffBill] {
        &self.qr_paid
    }

    pub async fn confirm_cash(&mut self, bill_id: &str) -> ClientResult<BillActionResult> {
        let result = self.client.confirm_cash(bill_id).await?;
        tracing::info!(bill_id, status = %result.bill_status, "Cash payment confirmed");
        self.refresh().await?;
        Ok(result)
    }

    pub async fn verify_qr(&mut self, bill_id: &str) -> ClientResult<BillActionResult> {
        let result = self.client.verify_qr(bill_id).await?;
        tracing::info!(bill_id, status = %result.bill_status, "QR payment verified");
        self.refresh().await?;
        Ok(result)
    }
}
