use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Flat per-day late charge. No cap, no compounding, no grace period.
pub const DAILY_LATE_FEE: Decimal = dec!(0.50);

/// Fixed policy ceiling on a single refund, independent of the original charge.
pub const REFUND_CEILING: Decimal = dec!(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "OVERDUE")]
    Overdue,
    #[serde(rename = "Invalid patron ID")]
    InvalidPatron,
    #[serde(rename = "No active borrow record found")]
    NoActiveBorrow,
    #[serde(rename = "No due date available")]
    NoDueDate,
}

impl std::fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => f.write_str("OK"),
            Self::Overdue => f.write_str("OVERDUE"),
            Self::InvalidPatron => f.write_str("Invalid patron ID"),
            Self::NoActiveBorrow => f.write_str("No active borrow record found"),
            Self::NoDueDate => f.write_str("No due date available"),
        }
    }
}

/// Derived late-fee quote. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeQuote {
    pub fee_amount: Decimal,
    pub days_overdue: i64,
    pub status: FeeStatus,
}

impl FeeQuote {
    pub fn zero(status: FeeStatus) -> Self {
        Self {
            fee_amount: Decimal::ZERO,
            days_overdue: 0,
            status,
        }
    }

    pub fn overdue(days_overdue: i64) -> Self {
        Self {
            fee_amount: late_fee_for(days_overdue),
            days_overdue,
            status: FeeStatus::Overdue,
        }
    }
}

/// Fee owed for a loan `days_overdue` whole days past due, rounded to cents.
pub fn late_fee_for(days_overdue: i64) -> Decimal {
    (Decimal::from(days_overdue) * DAILY_LATE_FEE).round_dp(2)
}

/// Outcome of a late-fee charge attempt against the payment gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub success: bool,
    pub transaction_id: Option<String>,
    pub message: String,
}

impl PaymentOutcome {
    pub fn accepted(transaction_id: String) -> Self {
        Self {
            success: true,
            transaction_id: Some(transaction_id),
            message: "Payment accepted.".to_string(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            transaction_id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundOutcome {
    pub success: bool,
    pub refund_id: Option<String>,
    pub message: String,
}

impl RefundOutcome {
    pub fn accepted(refund_id: String) -> Self {
        Self {
            success: true,
            refund_id: Some(refund_id),
            message: "Refund accepted.".to_string(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            refund_id: None,
            message: message.into(),
        }
    }
}
