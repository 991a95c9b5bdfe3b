use crate::domain::attempt::{AttemptId, CardLabel, NormalizedStatus};
use crate::domain::payment::RawPaymentResponse;

pub mod hyperswitch;
pub mod simulated;

#[async_trait::async_trait]
pub trait PaymentExecutor: Send + Sync {
    /// Always yields a response; transport failures are replaced by a simulated one.
    async fn execute(
        &self,
        attempt_id: &AttemptId,
        connector: &str,
        account_id: &str,
        instrument: CardLabel,
    ) -> RawPaymentResponse;
}

pub fn normalize_status(raw: &str) -> NormalizedStatus {
    match raw.trim().to_lowercase().as_str() {
        "charged" | "succeeded" => NormalizedStatus::Charged,
        "authorized" => NormalizedStatus::Authorized,
        "failed" => NormalizedStatus::Failure,
        "declined" => NormalizedStatus::Declined,
        _ => NormalizedStatus::Failure,
    }
}
