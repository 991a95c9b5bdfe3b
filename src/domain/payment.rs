use crate::domain::attempt::CardLabel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct CardDetails {
    pub card_number: String,
    pub card_exp_month: String,
    pub card_exp_year: String,
    pub card_holder_name: String,
    pub card_cvc: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodData {
    pub card: CardDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoutingTarget {
    pub connector: String,
    pub merchant_connector_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoutingOverride {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: RoutingTarget,
}

#[derive(Debug, Clone, Serialize)]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub line3: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Phone {
    pub number: String,
    pub country_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Billing {
    pub address: Address,
    pub phone: Phone,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrowserInfo {
    pub user_agent: String,
    pub accept_header: String,
    pub language: String,
    pub color_depth: u8,
    pub screen_height: u32,
    pub screen_width: u32,
    pub time_zone: i32,
    pub java_enabled: bool,
    pub java_script_enabled: bool,
    pub ip_address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    pub amount: i64,
    pub currency: String,
    pub routing: RoutingOverride,
    pub confirm: bool,
    pub capture_method: String,
    pub profile_id: String,
    pub amount_to_capture: i64,
    pub customer_id: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub phone_country_code: String,
    pub description: String,
    pub authentication_type: String,
    pub return_url: String,
    pub payment_method: String,
    pub payment_method_type: String,
    pub payment_method_data: PaymentMethodData,
    pub billing: Billing,
    pub browser_info: BrowserInfo,
    pub statement_descriptor_name: String,
    pub statement_descriptor_suffix: String,
    pub metadata: serde_json::Value,
}

impl PaymentRequest {
    pub fn fixture(card: CardLabel, connector: &str, account_id: &str, profile_id: &str) -> Self {
        Self {
            amount: 640,
            currency: "USD".to_string(),
            routing: RoutingOverride {
                kind: "single".to_string(),
                data: RoutingTarget {
                    connector: connector.to_string(),
                    merchant_connector_id: account_id.to_string(),
                },
            },
            confirm: true,
            capture_method: "automatic".to_string(),
            profile_id: profile_id.to_string(),
            amount_to_capture: 640,
            customer_id: "cus_jkjdkjakd".to_string(),
            email: "guest@example.com".to_string(),
            name: "John Doe".to_string(),
            phone: "999999999".to_string(),
            phone_country_code: "+1".to_string(),
            description: "Routing feedback simulation payment".to_string(),
            authentication_type: "no_three_ds".to_string(),
            return_url: "https://example.com".to_string(),
            payment_method: "card".to_string(),
            payment_method_type: "credit".to_string(),
            payment_method_data: PaymentMethodData {
                card: CardDetails {
                    card_number: card.card_number().to_string(),
                    card_exp_month: "10".to_string(),
                    card_exp_year: "30".to_string(),
                    card_holder_name: "John Doe".to_string(),
                    card_cvc: "123".to_string(),
                },
            },
            billing: Billing {
                address: Address {
                    line1: "1467".to_string(),
                    line2: "Harrison Street".to_string(),
                    line3: "Harrison Street".to_string(),
                    city: "San Francisco".to_string(),
                    state: "California".to_string(),
                    zip: "94122".to_string(),
                    country: "US".to_string(),
                    first_name: "John".to_string(),
                    last_name: "Doe".to_string(),
                },
                phone: Phone {
                    number: "8056594427".to_string(),
                    country_code: "+1".to_string(),
                },
                email: "example@example.com".to_string(),
            },
            browser_info: BrowserInfo {
                user_agent: "Mozilla/5.0".to_string(),
                accept_header: "text/html".to_string(),
                language: "en-US".to_string(),
                color_depth: 24,
                screen_height: 1080,
                screen_width: 1920,
                time_zone: 0,
                java_enabled: true,
                java_script_enabled: true,
                ip_address: "127.0.0.1".to_string(),
            },
            statement_descriptor_name: "routing-sim".to_string(),
            statement_descriptor_suffix: "SIM".to_string(),
            metadata: serde_json::json!({
                "udf1": "value1",
                "new_customer": "true",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawPaymentResponse {
    #[serde(default)]
    pub payment_id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub connector: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(skip)]
    pub simulated: bool,
}
