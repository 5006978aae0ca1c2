//! 会话上下文
//!
//! `SessionManager` 持有内存中的会话，并在每次字段写入后同步到
//! `SessionStore`。它是显式构造、显式注入的对象：启动时 `hydrate`，
//! 登出时 `logout` 整体清空。

use sukari_shared::{Advice, AuthResponse, ProfilePatch, ProfileResponse, User};

use crate::api::CareApi;
use crate::config::Language;
use crate::error::{ClientError, ClientResult};
use crate::request::HttpClient;
use crate::storage::{Flag, KeyValueStore, SessionStore};

#[cfg(test)]
mod tests;

// =========================================================
// 会话模型
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
    pub education: Vec<String>,
    pub advice: Advice,
}

impl Session {
    /// token 与 user 同时存在才算已登录
    pub fn is_authed(&self) -> bool {
        self.token().is_some() && self.user.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn profile_complete(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_profile_complete)
    }
}

/// 用户记录的更新方式
#[derive(Debug, Clone)]
pub enum UserUpdate {
    /// 整体替换（服务端响应是唯一可信来源）
    Replace(User),
    /// 在当前记录上合并部分字段
    Merge(ProfilePatch),
}

fn merge_user(user: &mut User, patch: ProfilePatch) {
    if let Some(name) = patch.name {
        user.name = name;
    }
    if let Some(diabetes_type) = patch.diabetes_type {
        user.diabetes_type = diabetes_type;
    }
    if let Some(height_cm) = patch.height_cm {
        user.height_cm = height_cm;
    }
    if let Some(weight_kg) = patch.weight_kg {
        user.weight_kg = weight_kg;
    }
    if let Some(doctor_id) = patch.doctor_id {
        user.doctor_id = doctor_id;
    }
}

// =========================================================
// 会话恢复
// =========================================================

/// 一次会话恢复的凭据：记录发起恢复时的 token
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreTicket {
    token: String,
}

impl RestoreTicket {
    pub fn token(&self) -> &str {
        &self.token
    }

    /// 调用 `/check_session`；不持有会话，可与用户操作并发
    pub async fn check<C: HttpClient>(self, api: &CareApi<C>) -> RestoreOutcome {
        let result = api
            .check_session(&self.token)
            .await
            .map_err(|e| e.in_op("session.restore"));
        RestoreOutcome {
            token: self.token,
            result,
        }
    }
}

#[derive(Debug)]
pub struct RestoreOutcome {
    token: String,
    result: ClientResult<ProfileResponse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreResult {
    /// 用户、教育提示与建议已用服务端数据刷新
    Refreshed,
    /// 会话已失效并清空
    Invalidated,
    /// 恢复期间 token 已被登录/登出改写，结果丢弃
    Superseded,
}

// =========================================================
// 会话管理器
// =========================================================

pub struct SessionManager<S> {
    session: Session,
    store: SessionStore<S>,
    restore_started: bool,
}

impl<S: KeyValueStore> SessionManager<S> {
    /// 从持久化存储构建会话
    pub fn hydrate(kv: S) -> Self {
        let store = SessionStore::new(kv);
        let persisted = store.load();
        let session = Session {
            token: persisted.token,
            user: persisted.user,
            education: persisted.education,
            advice: persisted.advice,
        };
        log::debug!("Session hydrated (authed: {})", session.is_authed());
        Self {
            session,
            store,
            restore_started: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn is_authed(&self) -> bool {
        self.session.is_authed()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }

    // --- 恢复 ---

    /// 每个进程只发起一次；没有 token 时不发起
    pub fn begin_restore(&mut self) -> Option<RestoreTicket> {
        if self.restore_started {
            return None;
        }
        self.restore_started = true;
        let token = self.session.token()?.to_string();
        Some(RestoreTicket { token })
    }

    pub fn finish_restore(&mut self, outcome: RestoreOutcome) -> RestoreResult {
        if self.session.token() != Some(outcome.token.as_str()) {
            log::info!("Session restore superseded by a newer sign-in state");
            return RestoreResult::Superseded;
        }

        match outcome.result {
            Ok(profile) => {
                self.apply_profile_response(profile);
                log::info!("Session restored");
                RestoreResult::Refreshed
            }
            Err(e) => {
                let e = ClientError::session_expired(e.to_string());
                log::info!("Session invalidated: {}", e);
                self.clear_session();
                RestoreResult::Invalidated
            }
        }
    }

    /// 便捷方法：发起、等待并应用一次恢复
    pub async fn restore<C: HttpClient>(&mut self, api: &CareApi<C>) -> Option<RestoreResult> {
        let ticket = self.begin_restore()?;
        let outcome = ticket.check(api).await;
        Some(self.finish_restore(outcome))
    }

    // --- 登录 / 注册 ---

    pub fn login(&mut self, resp: AuthResponse) {
        self.session = Session {
            token: Some(resp.access_token).filter(|t| !t.is_empty()),
            user: Some(resp.user),
            education: resp.education.unwrap_or_default(),
            advice: resp.advice.unwrap_or_default(),
        };
        self.persist_all();
        log::info!("Signed in");
    }

    /// 新注册从头开始引导流程：清除两个完成标记
    pub fn signup(&mut self, resp: AuthResponse) {
        self.login(resp);
        for flag in [Flag::OnboardingComplete, Flag::EducationDone] {
            self.write_flag(flag, false);
        }
    }

    // --- 用户记录 ---

    pub fn update_user(&mut self, update: UserUpdate) {
        match update {
            UserUpdate::Replace(user) => self.session.user = Some(user),
            UserUpdate::Merge(patch) => match self.session.user.as_mut() {
                Some(user) => merge_user(user, patch),
                None => {
                    log::warn!("Ignoring user merge without a signed-in user");
                    return;
                }
            },
        }
        self.persist_user();
    }

    /// 档案类响应：替换用户，附带的 education/advice 存在时一并替换
    pub fn apply_profile_response(&mut self, resp: ProfileResponse) {
        self.session.user = Some(resp.user);
        self.persist_user();
        if let Some(education) = resp.education {
            self.session.education = education;
            self.log_store_error(self.store.save_education(&self.session.education));
        }
        if let Some(advice) = resp.advice {
            self.session.advice = advice;
            self.log_store_error(self.store.save_advice(&self.session.advice));
        }
    }

    // --- 登出 ---

    /// 清空全部内存字段与全部持久化键（包括完成标记与语言）
    pub fn logout(&mut self) {
        self.session = Session::default();
        self.store.clear();
        log::info!("Signed out");
    }

    fn clear_session(&mut self) {
        self.session = Session::default();
        self.persist_all();
    }

    // --- 完成标记 ---

    pub fn education_done(&self) -> bool {
        self.store.flag(Flag::EducationDone)
    }

    pub fn onboarding_complete(&self) -> bool {
        self.store.flag(Flag::OnboardingComplete)
    }

    pub fn mark_education_done(&mut self) {
        self.write_flag(Flag::EducationDone, true);
    }

    pub fn mark_onboarding_complete(&mut self) {
        self.write_flag(Flag::OnboardingComplete, true);
    }

    // --- 语言 ---

    pub fn language(&self, default: Language) -> Language {
        self.store.language().unwrap_or(default)
    }

    pub fn set_language(&mut self, lang: Language) {
        self.log_store_error(self.store.set_language(lang));
    }

    // --- 持久化 ---

    fn write_flag(&self, flag: Flag, value: bool) {
        self.log_store_error(self.store.set_flag(flag, value));
    }

    fn persist_user(&self) {
        self.log_store_error(self.store.save_user(self.session.user.as_ref()));
    }

    fn persist_all(&self) {
        self.log_store_error(self.store.save_token(self.session.token()));
        self.persist_user();
        self.log_store_error(self.store.save_education(&self.session.education));
        self.log_store_error(self.store.save_advice(&self.session.advice));
    }

    // 写入失败不影响内存状态
    fn log_store_error(&self, result: ClientResult<()>) {
        if let Err(e) = result {
            log::warn!("Session persistence failed: {}", e);
        }
    }
}
