//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 实现核心库的 `KeyValueStore`。

use sukari::error::{ClientError, ClientResult};
use sukari::storage::KeyValueStore;

/// 浏览器 LocalStorage
///
/// 无状态，每次操作重新获取 `window.localStorage`；
/// 隐私模式等不可用的情况下读取返回 None，写入返回存储错误。
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl BrowserStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let storage = Self::storage().ok_or_else(|| ClientError::storage("localStorage unavailable"))?;
        storage
            .set_item(key, value)
            .map_err(|e| ClientError::storage(format!("{:?}", e)).in_op_with("storage.set", key))
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.clear();
        }
    }
}
