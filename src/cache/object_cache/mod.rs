pub mod moka;
pub mod redis;

use super::register::ObjectCacheConstructor;

/// 生成把具体缓存类型包装为注册表构造器的函数
#[macro_export]
macro_rules! object_cache_constructor {
    ($ty:ty) => {
        std::sync::Arc::new(|| {
            Box::pin(async {
                <$ty>::new()
                    .map(|cache| Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    .map_err($crate::errors::SchoolHubError::cache_connection)
            }) as $crate::cache::register::BoxedObjectCacheFuture
        }) as $crate::cache::register::ObjectCacheConstructor
    };
}

/// 内置缓存后端
pub(crate) fn builtin_plugins() -> Vec<(&'static str, ObjectCacheConstructor)> {
    vec![
        ("moka", crate::object_cache_constructor!(self::moka::MokaCacheWrapper)),
        ("redis", crate::object_cache_constructor!(self::redis::RedisObjectCache)),
    ]
}
