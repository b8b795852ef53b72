//! 仓库层集成测试
//!
//! 需要 TEST_DATABASE_URL 指向一个可用的 Postgres 实例；
//! 未设置时这些测试直接跳过。

use kyx_service::auth::scope::AccessScope;
use kyx_service::error::AppError;
use kyx_service::models::request_log::{EnvType, NewRequestLog, RequestLogFilters};
use kyx_service::models::role::{CreatePermissionRequest, CreateRoleRequest};
use kyx_service::repository::{
    PermissionRepository, PgRequestLogStore, RequestLogRepository, RequestLogStore, RoleRepository,
    UserRepository,
};
use serial_test::serial;

mod common;
use common::{create_test_config, create_test_role, create_test_user};

#[tokio::test]
#[serial]
async fn test_role_list_scoped_to_creator() {
    let Some(config) = create_test_config() else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let pool = common::setup_test_db(&config).await;

    let base_role = create_test_role(&pool, "Base Operator", None).await;
    let alice = create_test_user(&pool, "alice@test.local", base_role, None).await;
    let bob = create_test_user(&pool, "bob@test.local", base_role, None).await;

    let role_repo = RoleRepository::new(pool.clone());
    let alice_role = role_repo
        .create(
            &CreateRoleRequest {
                name: "Alice Analysts".to_string(),
                description: None,
                status: true,
                permissions: vec![],
            },
            alice,
        )
        .await
        .unwrap();
    role_repo
        .create(
            &CreateRoleRequest {
                name: "Bob Reviewers".to_string(),
                description: None,
                status: true,
                permissions: vec![],
            },
            bob,
        )
        .await
        .unwrap();

    // Alice 只能看到自己创建的角色
    let visible = role_repo.list(&AccessScope::CreatedBy(alice)).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, alice_role.id);

    // 无限制范围看到全部（含种子角色）
    let all = role_repo.list(&AccessScope::Unrestricted).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
#[serial]
async fn test_foreign_role_find_by_id_returns_none() {
    let Some(config) = create_test_config() else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let pool = common::setup_test_db(&config).await;

    let base_role = create_test_role(&pool, "Base Operator", None).await;
    let alice = create_test_user(&pool, "alice@test.local", base_role, None).await;
    let bob = create_test_user(&pool, "bob@test.local", base_role, None).await;

    let role_repo = RoleRepository::new(pool.clone());
    let bob_role = role_repo
        .create(
            &CreateRoleRequest {
                name: "Bob Reviewers".to_string(),
                description: None,
                status: true,
                permissions: vec![],
            },
            bob,
        )
        .await
        .unwrap();

    // 他人创建的角色对受限范围不可见，查询结果为 None
    let foreign = role_repo
        .find_by_id(bob_role.id, &AccessScope::CreatedBy(alice))
        .await
        .unwrap();
    assert!(foreign.is_none());

    // 同一个 id 在无限制范围下可见，说明行本身存在
    let unrestricted = role_repo
        .find_by_id(bob_role.id, &AccessScope::Unrestricted)
        .await
        .unwrap();
    assert!(unrestricted.is_some());
}

#[tokio::test]
#[serial]
async fn test_user_list_and_find_scoped_to_creator() {
    let Some(config) = create_test_config() else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let pool = common::setup_test_db(&config).await;

    let base_role = create_test_role(&pool, "Base Operator", None).await;
    let alice = create_test_user(&pool, "alice@test.local", base_role, None).await;
    let bob = create_test_user(&pool, "bob@test.local", base_role, None).await;
    let alice_child = create_test_user(&pool, "child@test.local", base_role, Some(alice)).await;

    let user_repo = UserRepository::new(pool.clone());

    let visible = user_repo.list(&AccessScope::CreatedBy(alice)).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, alice_child);

    // Bob 按 id 查 Alice 创建的用户，结果为 None 而不是报错
    let foreign = user_repo
        .find_by_id(alice_child, &AccessScope::CreatedBy(bob))
        .await
        .unwrap();
    assert!(foreign.is_none());

    let own = user_repo
        .find_by_id(alice_child, &AccessScope::CreatedBy(alice))
        .await
        .unwrap();
    assert!(own.is_some());
}

#[tokio::test]
#[serial]
async fn test_request_log_browse_scoped_to_creator() {
    let Some(config) = create_test_config() else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let pool = common::setup_test_db(&config).await;

    let base_role = create_test_role(&pool, "Base Operator", None).await;
    let alice = create_test_user(&pool, "alice@test.local", base_role, None).await;
    let bob = create_test_user(&pool, "bob@test.local", base_role, None).await;

    let store = PgRequestLogStore::new(pool.clone());
    let alice_log = store
        .create(&NewRequestLog {
            request_id: "req-alice-1".to_string(),
            user_id: alice,
            service: "aml".to_string(),
            env_type: EnvType::Sandbox,
            country_source: Some("GB".to_string()),
            request_type: Some("person".to_string()),
            request: serde_json::json!({"first_name": "Ada"}),
            created_by: alice,
        })
        .await
        .unwrap();
    let bob_log = store
        .create(&NewRequestLog {
            request_id: "req-bob-1".to_string(),
            user_id: bob,
            service: "aml".to_string(),
            env_type: EnvType::Sandbox,
            country_source: Some("US".to_string()),
            request_type: Some("person".to_string()),
            request: serde_json::json!({"first_name": "Bo"}),
            created_by: bob,
        })
        .await
        .unwrap();

    let log_repo = RequestLogRepository::new(pool.clone());

    let visible = log_repo
        .list(
            &AccessScope::CreatedBy(alice),
            &RequestLogFilters::default(),
            50,
            0,
        )
        .await
        .unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, alice_log);

    // 他人的台账记录按 id 查询同样不可见
    let foreign = log_repo
        .find_by_id(bob_log, &AccessScope::CreatedBy(alice))
        .await
        .unwrap();
    assert!(foreign.is_none());

    let all = log_repo
        .list(
            &AccessScope::Unrestricted,
            &RequestLogFilters::default(),
            50,
            0,
        )
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
#[serial]
async fn test_duplicate_role_name_is_bad_request() {
    let Some(config) = create_test_config() else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let pool = common::setup_test_db(&config).await;

    let base_role = create_test_role(&pool, "Base Operator", None).await;
    let alice = create_test_user(&pool, "alice@test.local", base_role, None).await;

    let role_repo = RoleRepository::new(pool.clone());
    let req = CreateRoleRequest {
        name: "Compliance".to_string(),
        description: None,
        status: true,
        permissions: vec![],
    };

    role_repo.create(&req, alice).await.unwrap();
    let err = role_repo.create(&req, alice).await.unwrap_err();
    assert!(
        matches!(err, AppError::BadRequest(_)),
        "expected BadRequest, got {err:?}"
    );
}

#[tokio::test]
#[serial]
async fn test_duplicate_permission_name_is_bad_request() {
    let Some(config) = create_test_config() else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let pool = common::setup_test_db(&config).await;

    let permission_repo = PermissionRepository::new(pool.clone());
    let req = CreatePermissionRequest {
        name: "Read Ledger".to_string(),
        module: "request-log".to_string(),
    };

    permission_repo.create(&req).await.unwrap();
    let err = permission_repo.create(&req).await.unwrap_err();
    assert!(
        matches!(err, AppError::BadRequest(_)),
        "expected BadRequest, got {err:?}"
    );
}
