//! Request log domain models
//!
//! The append-only audit ledger for outbound verification provider calls,
//! plus the two-level outcome classification applied to provider responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Target environment of a provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvType {
    Sandbox,
    Production,
}

impl EnvType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvType::Sandbox => "sandbox",
            EnvType::Production => "production",
        }
    }
}

/// Coarse outcome of a provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MainStatus {
    Success,
    Failed,
}

impl MainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MainStatus::Success => "success",
            MainStatus::Failed => "failed",
        }
    }
}

/// Fine business-outcome tag. Closed vocabulary to keep downstream
/// reporting queryable; the classification rule populates a subset, the
/// remainder are reserved for provider-specific refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubStatus {
    Match,
    #[serde(rename = "No match")]
    NoMatch,
    #[serde(rename = "Partial Match")]
    PartialMatch,
    Failed,
    Found,
    #[serde(rename = "Not Found")]
    NotFound,
    Success,
    Started,
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Expired,
    Error,
    Verified,
    #[serde(rename = "No Found")]
    NoFound,
    Validation,
}

impl SubStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubStatus::Match => "Match",
            SubStatus::NoMatch => "No match",
            SubStatus::PartialMatch => "Partial Match",
            SubStatus::Failed => "Failed",
            SubStatus::Found => "Found",
            SubStatus::NotFound => "Not Found",
            SubStatus::Success => "Success",
            SubStatus::Started => "Started",
            SubStatus::Pending => "Pending",
            SubStatus::InProgress => "In Progress",
            SubStatus::Expired => "Expired",
            SubStatus::Error => "Error",
            SubStatus::Verified => "Verified",
            SubStatus::NoFound => "No Found",
            SubStatus::Validation => "Validation",
        }
    }
}

/// Classify a resolved provider response by HTTP status code and payload
/// shape. Pure; applied only when a response was actually received --
/// transport failures are recorded as (failed, Failed) without going
/// through this rule.
pub fn classify_response(status_code: u16, body: &serde_json::Value) -> (MainStatus, SubStatus) {
    match status_code {
        200 => {
            let found = body.as_array().is_some_and(|list| !list.is_empty());
            if found {
                (MainStatus::Success, SubStatus::Found)
            } else {
                (MainStatus::Success, SubStatus::NotFound)
            }
        }
        400 => (MainStatus::Failed, SubStatus::Validation),
        503 => (MainStatus::Failed, SubStatus::Failed),
        _ => (MainStatus::Failed, SubStatus::Error),
    }
}

/// Persisted audit record for one outbound provider call
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RequestLog {
    pub id: Uuid,
    /// Caller-supplied correlation key; indexed, not unique
    pub request_id: String,
    /// Provider-assigned transaction id, present only after resolution
    pub trans_id: Option<String>,
    pub user_id: Uuid,
    pub service: String,
    pub env_type: String,
    pub main_status: Option<String>,
    pub sub_status: Option<String>,
    pub request_at: DateTime<Utc>,
    pub response_at: Option<DateTime<Utc>>,
    pub country_source: Option<String>,
    pub request_type: Option<String>,
    pub request: serde_json::Value,
    pub response: Option<serde_json::Value>,
    pub created_by: Uuid,
}

/// Fields written when the Created record is inserted, before the
/// outbound call is attempted
#[derive(Debug, Clone)]
pub struct NewRequestLog {
    pub request_id: String,
    pub user_id: Uuid,
    pub service: String,
    pub env_type: EnvType,
    pub country_source: Option<String>,
    pub request_type: Option<String>,
    pub request: serde_json::Value,
    pub created_by: Uuid,
}

/// Fields written exactly once when the call resolves
#[derive(Debug, Clone)]
pub struct ResolvedLog {
    pub trans_id: Option<String>,
    pub main_status: MainStatus,
    pub sub_status: SubStatus,
    pub response: serde_json::Value,
    pub response_at: DateTime<Utc>,
}

/// Request log list filters
#[derive(Debug, Default, Deserialize)]
pub struct RequestLogFilters {
    pub service: Option<String>,
    pub env_type: Option<String>,
    pub main_status: Option<String>,
    pub request_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_200_with_matches() {
        let body = json!([{"name": "John Doe", "score": 92}]);
        assert_eq!(classify_response(200, &body), (MainStatus::Success, SubStatus::Found));
    }

    #[test]
    fn test_classify_200_empty_list() {
        let body = json!([]);
        assert_eq!(classify_response(200, &body), (MainStatus::Success, SubStatus::NotFound));
    }

    #[test]
    fn test_classify_200_non_list_payload() {
        // Non-list payloads count as "nothing found", same as the empty list
        let body = json!({"message": "ok"});
        assert_eq!(classify_response(200, &body), (MainStatus::Success, SubStatus::NotFound));
    }

    #[test]
    fn test_classify_400() {
        let body = json!({"error": "missing first_name"});
        assert_eq!(classify_response(400, &body), (MainStatus::Failed, SubStatus::Validation));
    }

    #[test]
    fn test_classify_503() {
        assert_eq!(
            classify_response(503, &json!(null)),
            (MainStatus::Failed, SubStatus::Failed)
        );
    }

    #[test]
    fn test_classify_fallback() {
        for code in [401u16, 404, 429, 500, 502] {
            assert_eq!(
                classify_response(code, &json!([{"ignored": true}])),
                (MainStatus::Failed, SubStatus::Error)
            );
        }
    }

    #[test]
    fn test_sub_status_wire_strings() {
        assert_eq!(SubStatus::NoMatch.as_str(), "No match");
        assert_eq!(SubStatus::PartialMatch.as_str(), "Partial Match");
        assert_eq!(SubStatus::InProgress.as_str(), "In Progress");
        assert_eq!(SubStatus::NoFound.as_str(), "No Found");
        assert_eq!(
            serde_json::to_value(SubStatus::NotFound).unwrap(),
            json!("Not Found")
        );
    }

    #[test]
    fn test_env_type_serde() {
        assert_eq!(serde_json::to_value(EnvType::Sandbox).unwrap(), json!("sandbox"));
        let env: EnvType = serde_json::from_value(json!("production")).unwrap();
        assert_eq!(env, EnvType::Production);
    }
}
