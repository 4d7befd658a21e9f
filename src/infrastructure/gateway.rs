use crate::domain::fee::REFUND_CEILING;
use crate::domain::ports::{ChargeResponse, PaymentGateway, RefundResponse};
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicU64, Ordering};

/// Largest single charge the sandbox accepts.
pub const CHARGE_CEILING: Decimal = dec!(100);

/// A deterministic stand-in for the external payment gateway.
///
/// Applies the sandbox rules (decline non-positive or oversized amounts)
/// and hands out sequential `tx…`/`rf…` identifiers. Transport failures are
/// not simulated here; tests exercise those through their own gateway stubs.
#[derive(Default)]
pub struct SandboxGateway {
    seq: AtomicU64,
}

impl SandboxGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        1000 + self.seq.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl PaymentGateway for SandboxGateway {
    async fn charge(&self, amount: Decimal) -> Result<ChargeResponse> {
        if amount <= Decimal::ZERO || amount > CHARGE_CEILING {
            return Ok(ChargeResponse {
                success: false,
                transaction_id: None,
            });
        }
        Ok(ChargeResponse {
            success: true,
            transaction_id: Some(format!("tx{}", self.next_seq())),
        })
    }

    async fn refund(&self, transaction_id: &str, amount: Decimal) -> Result<RefundResponse> {
        if transaction_id.is_empty() || amount <= Decimal::ZERO || amount > REFUND_CEILING {
            return Ok(RefundResponse {
                success: false,
                refund_id: None,
            });
        }
        Ok(RefundResponse {
            success: true,
            refund_id: Some(format!("rf{}", self.next_seq())),
        })
    }
}
