//! 认证模块
//!
//! 会话管理器放在 `StoredValue` 中，每次变更后把快照写入信号，
//! 组件只读信号；路由服务通过注入的认证信号检查登录状态。

use leptos::prelude::*;
use leptos::task::spawn_local;
use sukari::{CareApi, ClientConfig, Language, Session, SessionManager};
use sukari_shared::{AuthResponse, ProfileResponse};

use crate::web::{BrowserHttpClient, BrowserStore};

pub type Api = CareApi<BrowserHttpClient>;

/// 认证状态快照
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub session: Session,
    pub education_done: bool,
    pub onboarding_complete: bool,
    pub language: Language,
}

impl AuthState {
    fn snapshot(manager: &SessionManager<BrowserStore>, default_language: Language) -> Self {
        Self {
            session: manager.session().clone(),
            education_done: manager.education_done(),
            onboarding_complete: manager.onboarding_complete(),
            language: manager.language(default_language),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authed()
    }

    pub fn token(&self) -> Option<String> {
        self.session.token().map(str::to_string)
    }
}

/// 认证上下文
///
/// 包含只读状态信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    set_state: WriteSignal<AuthState>,
    manager: StoredValue<SessionManager<BrowserStore>>,
    api: StoredValue<Api>,
    default_language: Language,
}

impl AuthContext {
    /// 从 LocalStorage 同步加载会话
    pub fn new(config: &ClientConfig) -> Self {
        let manager = SessionManager::hydrate(BrowserStore);
        let default_language = config.default_language;
        let (state, set_state) = signal(AuthState::snapshot(&manager, default_language));
        let api = CareApi::new(BrowserHttpClient::new(config.request_timeout), config);

        Self {
            state,
            set_state,
            manager: StoredValue::new(manager),
            api: StoredValue::new(api),
            default_language,
        }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.is_authenticated()))
    }

    pub fn api(&self) -> Api {
        self.api.get_value()
    }

    /// 当前 token，不建立响应式依赖
    pub fn token(&self) -> Option<String> {
        self.state.with_untracked(|s| s.token())
    }

    /// 当前语言（响应式）
    pub fn language(&self) -> Language {
        self.state.with(|s| s.language)
    }

    pub fn language_untracked(&self) -> Language {
        self.state.with_untracked(|s| s.language)
    }

    pub fn read<R>(&self, f: impl FnOnce(&SessionManager<BrowserStore>) -> R) -> Option<R> {
        self.manager.try_with_value(f)
    }

    /// 修改会话并刷新快照
    pub fn mutate<R>(&self, f: impl FnOnce(&mut SessionManager<BrowserStore>) -> R) -> Option<R> {
        let out = self.manager.try_update_value(f);
        self.sync();
        out
    }

    fn sync(&self) {
        let default_language = self.default_language;
        if let Some(next) = self
            .manager
            .try_with_value(|m| AuthState::snapshot(m, default_language))
        {
            self.set_state.set(next);
        }
    }

    pub fn login(&self, resp: AuthResponse) {
        self.mutate(|m| m.login(resp));
    }

    pub fn signup(&self, resp: AuthResponse) {
        self.mutate(|m| m.signup(resp));
    }

    pub fn apply_profile(&self, resp: ProfileResponse) {
        self.mutate(|m| m.apply_profile_response(resp));
    }

    pub fn mark_education_done(&self) {
        self.mutate(|m| m.mark_education_done());
    }

    pub fn toggle_language(&self) {
        let next = self.state.with_untracked(|s| s.language.toggled());
        self.mutate(|m| m.set_language(next));
    }

    /// 注销并清除全部本地数据
    ///
    /// 导航由路由服务的认证状态监听自动处理。
    pub fn logout(&self) {
        self.mutate(|m| m.logout());
    }

    /// 后台校验持久化的 token，整个页面生命周期只发起一次
    ///
    /// 期间发生的登录/登出优先，迟到的结果由会话管理器丢弃。
    pub fn restore(&self) {
        let Some(ticket) = self.mutate(|m| m.begin_restore()).flatten() else {
            return;
        };
        let ctx = *self;
        let api = self.api();
        spawn_local(async move {
            let outcome = ticket.check(&api).await;
            if let Some(result) = ctx.mutate(|m| m.finish_restore(outcome)) {
                log::debug!("[Auth] restore finished: {:?}", result);
            }
        });
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}
