use crate::cache::ObjectCache;
use crate::errors::Result;
use once_cell::sync::Lazy;
use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

/// 可选的对象缓存后端，按配置中的 `cache.type` 查找
static OBJECT_CACHE_REGISTRY: Lazy<HashMap<&'static str, ObjectCacheConstructor>> =
    Lazy::new(|| super::object_cache::builtin_plugins().into_iter().collect());

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    OBJECT_CACHE_REGISTRY.get(name).cloned()
}

pub fn debug_object_cache_registry() {
    let mut names: Vec<&str> = OBJECT_CACHE_REGISTRY.keys().copied().collect();
    names.sort_unstable();
    tracing::debug!("Object cache backends: {}", names.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_plugins_registered() {
        assert!(get_object_cache_plugin("moka").is_some());
        assert!(get_object_cache_plugin("redis").is_some());
        assert!(get_object_cache_plugin("memcached").is_none());
    }
}
