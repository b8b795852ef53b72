//! AML 服务代理与审计记录器
//!
//! 包裹每一次对外部核验服务的调用：外呼前同步落一条 Created 台账，
//! 调用落定后（成功、业务失败或传输失败）恰好更新一次。台账的存在
//! 不依赖外呼是否成功。

use crate::{
    error::AppError,
    models::request_log::{
        classify_response, EnvType, MainStatus, NewRequestLog, ResolvedLog, SubStatus,
    },
    models::service::ProviderEndpoint,
    repository::RequestLogStore,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// 外部服务的一次已落定响应（HTTP 等价状态码 + 响应体）
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: Value,
}

/// 外呼未得到响应（连接失败、超时、取消）
#[derive(Debug)]
pub struct TransportError(pub String);

pub struct AmlService {
    store: Arc<dyn RequestLogStore>,
    http: reqwest::Client,
}

impl AmlService {
    pub fn new(store: Arc<dyn RequestLogStore>, request_timeout_secs: u64) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { store, http })
    }

    /// 发起一次 AML 查询（person_info / organization_info）
    pub async fn request_info(
        &self,
        env_type: EnvType,
        endpoint: &ProviderEndpoint,
        payload: Value,
        user_id: uuid::Uuid,
        request_type: &str,
    ) -> Result<Value, AppError> {
        let request_id = payload
            .get("request_id")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let log = NewRequestLog {
            request_id,
            user_id,
            service: "aml".to_string(),
            env_type,
            country_source: payload
                .get("country")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            request_type: Some(request_type.to_string()),
            request: payload.clone(),
            created_by: user_id,
        };

        let url = format!("{}info", endpoint.url);
        let http = self.http.clone();
        let token = endpoint.token.clone();

        self.call_with_audit(log, async move {
            let response = http
                .post(&url)
                .bearer_auth(&token)
                .json(&payload)
                .send()
                .await
                .map_err(|e| TransportError(e.to_string()))?;

            let status = response.status().as_u16();
            let body = response.json::<Value>().await.unwrap_or_default();

            Ok(ProviderResponse { status, body })
        })
        .await
    }

    /// 审计记录器核心：台账先行，外呼居中，落定更新殿后
    ///
    /// - Created 写入失败对整个操作是致命的（无台账则不外呼）。
    /// - 外呼得到响应后按 (状态码, 响应体形态) 分类；落定更新失败
    ///   只记日志和指标，绝不吞掉供应商的结果。
    /// - 传输失败走失败路径更新（尽力而为），然后把原错误抛给调用方。
    pub async fn call_with_audit<F>(&self, log: NewRequestLog, call: F) -> Result<Value, AppError>
    where
        F: Future<Output = Result<ProviderResponse, TransportError>>,
    {
        // 台账必须在外呼之前存在
        let log_id = self.store.create(&log).await?;

        match call.await {
            Ok(provider) => {
                let (main_status, sub_status) = classify_response(provider.status, &provider.body);
                let trans_id = provider
                    .body
                    .get("transaction_id")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string());

                let resolved = ResolvedLog {
                    trans_id,
                    main_status,
                    sub_status,
                    response: provider.body.clone(),
                    response_at: Utc::now(),
                };

                if let Err(e) = self.store.resolve(log_id, &resolved).await {
                    // 审计缺口：告警但不影响返回
                    metrics::counter!("request_log_resolve_failures_total").increment(1);
                    tracing::error!(
                        log_id = %log_id,
                        error = %e,
                        "Failed to resolve request log after provider response"
                    );
                }

                match main_status {
                    MainStatus::Success => Ok(provider.body),
                    MainStatus::Failed => Err(AppError::ProviderBusiness {
                        status: provider.status,
                        payload: provider.body,
                    }),
                }
            }
            Err(TransportError(message)) => {
                let resolved = ResolvedLog {
                    trans_id: None,
                    main_status: MainStatus::Failed,
                    sub_status: SubStatus::Failed,
                    response: json!({ "message": message }),
                    response_at: Utc::now(),
                };

                if let Err(e) = self.store.resolve(log_id, &resolved).await {
                    metrics::counter!("request_log_resolve_failures_total").increment(1);
                    tracing::error!(
                        log_id = %log_id,
                        error = %e,
                        "Failed to resolve request log after transport error"
                    );
                }

                Err(AppError::ProviderTransport(message))
            }
        }
    }
}
