use crate::domain::attempt::CardLabel;
use crate::domain::payment::RawPaymentResponse;

pub const SIMULATED_CONNECTOR: &str = "simulated_connector";
pub const SIMULATED_DECLINE_MESSAGE: &str = "Simulated decline for test card";

pub fn fallback_response(instrument: CardLabel) -> RawPaymentResponse {
    match instrument {
        CardLabel::Success => RawPaymentResponse {
            payment_id: Some(format!("sim_{}", uuid::Uuid::new_v4().simple())),
            status: "succeeded".to_string(),
            connector: Some(SIMULATED_CONNECTOR.to_string()),
            error_code: None,
            error_message: None,
            simulated: true,
        },
        CardLabel::Fail => RawPaymentResponse {
            payment_id: Some(format!("sim_{}", uuid::Uuid::new_v4().simple())),
            status: "failed".to_string(),
            connector: Some(SIMULATED_CONNECTOR.to_string()),
            error_code: Some("SIMULATED_DECLINE".to_string()),
            error_message: Some(SIMULATED_DECLINE_MESSAGE.to_string()),
            simulated: true,
        },
    }
}
