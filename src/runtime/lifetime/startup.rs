use std::error::Error;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_random_code;

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn build_cache(cache_type: &str) -> Option<Arc<dyn ObjectCache>> {
    let Some(constructor) = get_object_cache_plugin(cache_type) else {
        warn!("Cache backend '{}' not found in registry", cache_type);
        return None;
    };
    match constructor().await {
        Ok(cache) => {
            info!("Created {} cache backend", cache_type);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", cache_type, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到 moka
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn Error>> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();
    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(cache) = build_cache(cache_type).await {
        return Ok(cache);
    }
    if cache_type != "moka" {
        warn!("Falling back to memory cache");
        if let Some(cache) = build_cache("moka").await {
            return Ok(cache);
        }
    }
    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 没有管理员时创建默认的 admin 账号
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users_by_role(UserRole::Admin).await {
        Ok(count) if count > 0 => {
            debug!("Found {} admin account(s), skipping admin seed", count);
            return;
        }
        Ok(_) => info!("No admin account found, creating default admin..."),
        Err(e) => {
            warn!("Failed to count admin accounts: {}, skipping admin seed", e);
            return;
        }
    }

    // 优先使用环境变量，否则生成随机密码并只打印这一次
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let generated = generate_random_code(16);
        warn!("==========================================================");
        warn!("  ADMIN_PASSWORD not set, generated admin password: {}", generated);
        warn!("  It will not be shown again");
        warn!("==========================================================");
        generated
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin = CreateUserRequest {
        username: "admin".to_string(),
        email: "admin@schoolhub.local".to_string(),
        password: password_hash,
        role: UserRole::Admin,
        display_name: Some("Administrator".to_string()),
        student_code: None,
    };
    match storage.create_user(admin).await {
        Ok(user) => info!(
            "Default admin account created (ID: {}, username: {})",
            user.id, user.username
        ),
        Err(e) => warn!("Failed to create admin account: {}", e),
    }
}

/// 准备服务器启动的上下文：存储（含迁移）、默认管理员和缓存
pub async fn prepare_server_startup() -> Result<StartupContext, Box<dyn Error>> {
    // 已安装时返回 Err，忽略即可
    let _ = rustls::crypto::ring::default_provider().install_default();

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    if AppConfig::get().jwt.secret_generated {
        warn!("JWT secret is not configured, using a random secret; tokens expire on restart");
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}
