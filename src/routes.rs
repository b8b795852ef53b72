//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::{handlers, middleware::AppState};

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready));

    // 认证路由（无需认证）
    let auth_routes = Router::new().route("/api/auth/login", post(handlers::auth::login));

    // 需要认证的路由
    let authenticated_routes = Router::new()
        // 当前用户信息与登出
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/auth/logout", post(handlers::auth::logout))

        // 用户管理
        .route(
            "/api/admin/users",
            get(handlers::user::list_users)
                .post(handlers::user::create_user)
        )
        .route(
            "/api/admin/users/{id}",
            get(handlers::user::get_user)
                .put(handlers::user::update_user)
        )

        // 角色管理
        .route(
            "/api/admin/roles",
            get(handlers::role::list_roles)
                .post(handlers::role::create_role)
        )
        .route(
            "/api/admin/roles/{id}",
            get(handlers::role::get_role)
                .put(handlers::role::update_role)
        )

        // 权限目录
        .route(
            "/api/admin/permissions",
            get(handlers::permission::list_permissions)
                .post(handlers::permission::create_permission)
        )
        .route(
            "/api/admin/permissions/{id}",
            get(handlers::permission::get_permission)
                .put(handlers::permission::update_permission)
        )

        // 服务目录
        .route(
            "/api/admin/services",
            get(handlers::service::list_services)
        )
        .route(
            "/api/admin/services/{id}",
            get(handlers::service::get_service)
                .put(handlers::service::update_service)
        )

        // 请求日志
        .route(
            "/api/admin/request-logs",
            get(handlers::request_log::list_request_logs)
        )
        .route(
            "/api/admin/request-logs/{id}",
            get(handlers::request_log::get_request_log)
        )

        // AML 查询代理
        .route("/api/services/aml/person/info", post(handlers::aml::person_info))
        .route(
            "/api/services/aml/organization/info",
            post(handlers::aml::organization_info),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.jwt_service.clone(),
            crate::auth::middleware::jwt_auth_middleware,
        ));

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(authenticated_routes)
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
