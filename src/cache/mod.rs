//! 缓存层
//!
//! `ObjectCache` 只处理字符串值，类型化读写通过 [`ObjectCacheExt`] 以 JSON 序列化完成。
//! 后端以插件形式在加载期注册（见 [`declare_object_cache_plugin!`]）。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错或值无法解析，调用方应回源
    ExistsButNoValue,
}

impl<T> CacheResult<T> {
    pub fn found(self) -> Option<T> {
        match self {
            CacheResult::Found(v) => Some(v),
            _ => None,
        }
    }
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;

    /// `ttl` 为 0 时使用配置中的默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);

    async fn remove(&self, key: &str);

    async fn invalidate_all(&self);
}

/// 类型化 JSON 读写
#[async_trait]
pub trait ObjectCacheExt {
    async fn get_json<T: DeserializeOwned + Send>(&self, key: &str) -> CacheResult<T>;

    async fn insert_json<T: Serialize + Sync>(&self, key: String, value: &T, ttl: u64);
}

#[async_trait]
impl<C: ObjectCache + ?Sized> ObjectCacheExt for C {
    async fn get_json<T: DeserializeOwned + Send>(&self, key: &str) -> CacheResult<T> {
        match self.get_raw(key).await {
            CacheResult::Found(raw) => match serde_json::from_str(&raw) {
                Ok(value) => CacheResult::Found(value),
                Err(e) => {
                    tracing::warn!("Discarding undecodable cache entry '{}': {}", key, e);
                    self.remove(key).await;
                    CacheResult::ExistsButNoValue
                }
            },
            CacheResult::NotFound => CacheResult::NotFound,
            CacheResult::ExistsButNoValue => CacheResult::ExistsButNoValue,
        }
    }

    async fn insert_json<T: Serialize + Sync>(&self, key: String, value: &T, ttl: u64) {
        match serde_json::to_string(value) {
            Ok(raw) => self.insert_raw(key, raw, ttl).await,
            Err(e) => tracing::error!("Failed to serialize cache entry '{}': {}", key, e),
        }
    }
}

/// 已认证用户缓存键
pub fn user_key(token: &str) -> String {
    format!("user:{token}")
}

/// 租户设置缓存键
pub fn settings_key(tenant_id: i64) -> String {
    format!("settings:{tenant_id}")
}

/// 租户状态缓存键
pub fn tenant_key(tenant_id: i64) -> String {
    format!("tenant:{tenant_id}")
}

/// 在加载期把缓存后端注册到插件表
///
/// 类型需提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[::ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                ::std::sync::Arc::new(|| {
                    ::std::boxed::Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::ScholarPrepError::cache_connection)?;
                        Ok(::std::boxed::Box::new(cache)
                            as ::std::boxed::Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapCache(Mutex<HashMap<String, String>>);

    #[async_trait]
    impl ObjectCache for MapCache {
        async fn get_raw(&self, key: &str) -> CacheResult<String> {
            match self.0.lock().unwrap().get(key) {
                Some(v) => CacheResult::Found(v.clone()),
                None => CacheResult::NotFound,
            }
        }

        async fn insert_raw(&self, key: String, value: String, _ttl: u64) {
            self.0.lock().unwrap().insert(key, value);
        }

        async fn remove(&self, key: &str) {
            self.0.lock().unwrap().remove(key);
        }

        async fn invalidate_all(&self) {
            self.0.lock().unwrap().clear();
        }
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let cache = MapCache::default();
        cache
            .insert_json("settings:1".to_string(), &vec![1, 2, 3], 0)
            .await;
        let value: CacheResult<Vec<i32>> = cache.get_json("settings:1").await;
        assert_eq!(value, CacheResult::Found(vec![1, 2, 3]));

        let missing: CacheResult<Vec<i32>> = cache.get_json("settings:2").await;
        assert_eq!(missing, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_dropped() {
        let cache = MapCache::default();
        cache
            .insert_raw("user:abc".to_string(), "not json".to_string(), 0)
            .await;
        let value: CacheResult<Vec<i32>> = cache.get_json("user:abc").await;
        assert_eq!(value, CacheResult::ExistsButNoValue);
        assert_eq!(cache.get_raw("user:abc").await, CacheResult::NotFound);
    }

    #[test]
    fn test_keys() {
        assert_eq!(user_key("t0k"), "user:t0k");
        assert_eq!(settings_key(42), "settings:42");
        assert_eq!(tenant_key(7), "tenant:7");
    }
}
