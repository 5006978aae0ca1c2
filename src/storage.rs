//! 持久化会话存储
//!
//! `KeyValueStore` 抽象浏览器 localStorage 一类的字符串键值存储，
//! `SessionStore` 在其上约定各字段的键名与编码方式。

use serde::Serialize;
use serde::de::DeserializeOwned;
use sukari_shared::{Advice, User};

use crate::config::Language;
use crate::error::{ClientError, ClientResult};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::BTreeMap;

// =========================================================
// 键名
// =========================================================

pub const KEY_TOKEN: &str = "token";
pub const KEY_USER: &str = "user";
pub const KEY_EDUCATION: &str = "education";
pub const KEY_ADVICE: &str = "advice";
pub const KEY_LANGUAGE: &str = "language";
pub const KEY_ONBOARDING_COMPLETE: &str = "onboarding_complete";
pub const KEY_EDUCATION_DONE: &str = "education_done";

const FLAG_SET: &str = "true";

/// 设备级完成标记
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    OnboardingComplete,
    EducationDone,
}

impl Flag {
    pub fn key(&self) -> &'static str {
        match self {
            Flag::OnboardingComplete => KEY_ONBOARDING_COMPLETE,
            Flag::EducationDone => KEY_EDUCATION_DONE,
        }
    }
}

// =========================================================
// 存储抽象
// =========================================================

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str);
    /// 清空全部键
    fn clear(&self);
}

/// 内存实现，用于测试
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }

    fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

// =========================================================
// 会话字段的持久化
// =========================================================

/// 启动时从存储中读到的会话字段
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedSession {
    pub token: Option<String>,
    pub user: Option<User>,
    pub education: Vec<String>,
    pub advice: Advice,
}

pub struct SessionStore<S> {
    kv: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub fn load(&self) -> PersistedSession {
        PersistedSession {
            token: self.kv.get(KEY_TOKEN).filter(|t| !t.is_empty()),
            user: self.read_json(KEY_USER),
            education: self.read_json(KEY_EDUCATION).unwrap_or_default(),
            advice: self.read_json(KEY_ADVICE).unwrap_or_default(),
        }
    }

    // 无法解码的值视为损坏，删除该键
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.kv.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Dropping corrupt '{}' entry: {}", key, e);
                self.kv.remove(key);
                None
            }
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> ClientResult<()> {
        let raw = serde_json::to_string(value)
            .map_err(|e| ClientError::storage(e.to_string()).in_op_with("storage.write", key))?;
        self.kv
            .set(key, &raw)
            .map_err(|e| e.in_op_with("storage.write", key))
    }

    fn write_or_remove<T: Serialize>(&self, key: &str, value: Option<&T>) -> ClientResult<()> {
        match value {
            Some(v) => self.write_json(key, v),
            None => {
                self.kv.remove(key);
                Ok(())
            }
        }
    }

    // --- 各字段：空值删除键而不是写入空值 ---

    pub fn save_token(&self, token: Option<&str>) -> ClientResult<()> {
        match token.filter(|t| !t.is_empty()) {
            Some(t) => self
                .kv
                .set(KEY_TOKEN, t)
                .map_err(|e| e.in_op_with("storage.write", KEY_TOKEN)),
            None => {
                self.kv.remove(KEY_TOKEN);
                Ok(())
            }
        }
    }

    pub fn save_user(&self, user: Option<&User>) -> ClientResult<()> {
        self.write_or_remove(KEY_USER, user)
    }

    pub fn save_education(&self, education: &[String]) -> ClientResult<()> {
        self.write_or_remove(KEY_EDUCATION, (!education.is_empty()).then_some(&education))
    }

    pub fn save_advice(&self, advice: &Advice) -> ClientResult<()> {
        self.write_or_remove(KEY_ADVICE, (!advice.is_empty()).then_some(advice))
    }

    // --- 完成标记 ---

    pub fn flag(&self, flag: Flag) -> bool {
        self.kv.get(flag.key()).as_deref() == Some(FLAG_SET)
    }

    pub fn set_flag(&self, flag: Flag, value: bool) -> ClientResult<()> {
        if value {
            self.kv
                .set(flag.key(), FLAG_SET)
                .map_err(|e| e.in_op_with("storage.flag", flag.key()))
        } else {
            self.kv.remove(flag.key());
            Ok(())
        }
    }

    // --- 语言 ---

    pub fn language(&self) -> Option<Language> {
        self.kv.get(KEY_LANGUAGE).and_then(|v| Language::parse(&v))
    }

    pub fn set_language(&self, lang: Language) -> ClientResult<()> {
        self.kv
            .set(KEY_LANGUAGE, lang.code())
            .map_err(|e| e.in_op_with("storage.write", KEY_LANGUAGE))
    }

    /// 清空全部键（包括标记和语言）
    pub fn clear(&self) {
        self.kv.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_remove_keys() {
        let store = SessionStore::new(MemoryStore::new());
        store.save_token(Some("abc")).unwrap();
        store.save_education(&["Walk daily".to_string()]).unwrap();
        assert_eq!(store.kv().keys(), vec![KEY_EDUCATION, KEY_TOKEN]);

        store.save_token(Some("")).unwrap();
        store.save_education(&[]).unwrap();
        store.save_advice(&Advice::default()).unwrap();
        assert!(store.kv().keys().is_empty());
    }

    #[test]
    fn corrupt_json_is_dropped() {
        let store = SessionStore::new(MemoryStore::new());
        store.kv().set(KEY_USER, "{not json").unwrap();
        store.kv().set(KEY_TOKEN, "abc").unwrap();

        let loaded = store.load();
        assert_eq!(loaded.token.as_deref(), Some("abc"));
        assert!(loaded.user.is_none());
        assert!(store.kv().get(KEY_USER).is_none());
    }

    #[test]
    fn flags_and_language() {
        let store = SessionStore::new(MemoryStore::new());
        assert!(!store.flag(Flag::EducationDone));
        store.set_flag(Flag::EducationDone, true).unwrap();
        assert!(store.flag(Flag::EducationDone));
        assert!(!store.flag(Flag::OnboardingComplete));

        assert_eq!(store.language(), None);
        store.set_language(Language::Sw).unwrap();
        assert_eq!(store.language(), Some(Language::Sw));

        store.set_flag(Flag::EducationDone, false).unwrap();
        assert!(store.kv().get(KEY_EDUCATION_DONE).is_none());
    }
}
