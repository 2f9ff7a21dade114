use crate::config::Argon2Config;
use crate::errors::SchoolHubError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

/// 按全局配置哈希密码
pub fn hash_password(password: &str) -> Result<String, SchoolHubError> {
    hash_password_with(password, &crate::config::AppConfig::get().argon2)
}

/// 按指定参数哈希密码（Argon2id）
pub fn hash_password_with(password: &str, params: &Argon2Config) -> Result<String, SchoolHubError> {
    let params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        None,
    )
    .map_err(|e| SchoolHubError::validation(format!("Argon2 参数错误: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SchoolHubError::validation(format!("密码哈希失败: {e}")))?;
    Ok(hash.to_string())
}

/// 验证密码，参数从哈希串中读取
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}
