//! AML screening request DTOs
//!
//! The forwarded payload mirrors what the caller sent, with the provider's
//! expected defaults filled in (`response_type`, `name_type`, `monitoring`).

use super::request_log::EnvType;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

/// Person screening request
#[derive(Debug, Deserialize, Validate)]
pub struct AmlPersonRequest {
    pub env_type: EnvType,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    #[validate(length(min = 2, max = 2))]
    pub country: String,
    #[validate(length(min = 1, max = 64))]
    pub request_id: String,
    pub response_type: Option<String>,
    pub monitoring: Option<String>,
}

impl AmlPersonRequest {
    pub fn into_payload(self) -> Value {
        json!({
            "first_name": self.first_name,
            "last_name": self.last_name,
            "middle_name": self.middle_name,
            "dob": self.dob,
            "gender": self.gender,
            "address": self.address,
            "state": self.state,
            "city": self.city,
            "zip": self.zip,
            "country": self.country,
            "request_id": self.request_id,
            "response_type": self.response_type.unwrap_or_else(|| "json".to_string()),
            "name_type": "p",
            "monitoring": self.monitoring.unwrap_or_else(|| "false".to_string()),
        })
    }
}

/// Organization screening request
#[derive(Debug, Deserialize, Validate)]
pub struct AmlOrganizationRequest {
    pub env_type: EnvType,
    #[validate(length(min = 1, max = 200))]
    pub company_name: String,
    pub address: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    #[validate(length(min = 2, max = 2))]
    pub country: String,
    #[validate(length(min = 1, max = 64))]
    pub request_id: String,
    pub response_type: Option<String>,
    pub monitoring: Option<String>,
}

impl AmlOrganizationRequest {
    pub fn into_payload(self) -> Value {
        json!({
            "company_name": self.company_name,
            "address": self.address,
            "state": self.state,
            "city": self.city,
            "zip": self.zip,
            "country": self.country,
            "request_id": self.request_id,
            "response_type": self.response_type.unwrap_or_else(|| "json".to_string()),
            "name_type": "c",
            "monitoring": self.monitoring.unwrap_or_else(|| "false".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_person_payload_defaults() {
        let req: AmlPersonRequest = serde_json::from_value(json!({
            "env_type": "sandbox",
            "first_name": "Jane",
            "country": "US",
            "request_id": "req-001"
        }))
        .unwrap();

        let payload = req.into_payload();
        assert_eq!(payload["response_type"], "json");
        assert_eq!(payload["name_type"], "p");
        assert_eq!(payload["monitoring"], "false");
        assert_eq!(payload["country"], "US");
    }

    #[test]
    fn test_organization_payload_keeps_caller_values() {
        let req: AmlOrganizationRequest = serde_json::from_value(json!({
            "env_type": "production",
            "company_name": "Acme Corp",
            "country": "GB",
            "request_id": "req-002",
            "response_type": "xml",
            "monitoring": "true"
        }))
        .unwrap();

        let payload = req.into_payload();
        assert_eq!(payload["response_type"], "xml");
        assert_eq!(payload["name_type"], "c");
        assert_eq!(payload["monitoring"], "true");
    }
}
