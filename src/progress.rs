//! 引导进度判定
//!
//! 三个条件：档案完整、已有血糖读数、已完成教育模块。
//! 前者来自会话，后者来自本地标记，只有"已有读数"需要一次网络请求。
//! 读数结果按 token 缓存，由路由守卫与导航栏共用。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::api::CareApi;
use crate::error::ClientResult;
use crate::request::HttpClient;
use crate::route::Requirements;
use crate::session::Session;

/// "是否已有读数"的三态结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingCheck {
    /// 请求尚未返回
    #[default]
    Unknown,
    Present,
    Absent,
}

impl ReadingCheck {
    pub fn is_present(&self) -> bool {
        matches!(self, ReadingCheck::Present)
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, ReadingCheck::Unknown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingProgress {
    pub profile_complete: bool,
    pub has_reading: ReadingCheck,
    pub education_done: bool,
}

impl OnboardingProgress {
    pub fn derive(session: &Session, has_reading: ReadingCheck, education_done: bool) -> Self {
        if education_done && has_reading == ReadingCheck::Absent {
            // 直接访问教育页可以绕过读数步骤，守卫会在下次进入受保护页面时纠正
            log::warn!("Education marked done but no reading on record");
        }
        Self {
            profile_complete: session.profile_complete(),
            has_reading,
            education_done,
        }
    }
}

// =========================================================
// 读数查询
// =========================================================

#[derive(Debug)]
pub enum ReadingLookup {
    /// 无需请求即可确定（不要求读数、没有 token、或命中缓存）
    Resolved(ReadingCheck),
    /// 需要请求 `GET /readings`
    Fetch(ReadingTicket),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadingTicket {
    token: String,
    generation: u64,
}

impl ReadingTicket {
    pub async fn fetch<C: HttpClient>(self, api: &CareApi<C>) -> ReadingFetch {
        let result = api
            .readings(&self.token)
            .await
            .map(|readings| readings.len())
            .map_err(|e| e.in_op("progress.has_reading"));
        ReadingFetch {
            ticket: self,
            result,
        }
    }
}

#[derive(Debug)]
pub struct ReadingFetch {
    ticket: ReadingTicket,
    result: ClientResult<usize>,
}

/// 共享的进度服务
#[derive(Debug, Default)]
pub struct ProgressService {
    cache: Option<(String, ReadingCheck)>,
    generation: u64,
}

impl ProgressService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cached(&self, token: &str) -> Option<ReadingCheck> {
        match &self.cache {
            Some((cached_token, check)) if cached_token == token => Some(*check),
            _ => None,
        }
    }

    pub fn lookup(&self, token: Option<&str>, requirements: Requirements) -> ReadingLookup {
        if !requirements.reading {
            return ReadingLookup::Resolved(ReadingCheck::Present);
        }
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return ReadingLookup::Resolved(ReadingCheck::Absent);
        };
        if let Some(check) = self.cached(token) {
            log::debug!("Reading check served from cache: {:?}", check);
            return ReadingLookup::Resolved(check);
        }
        ReadingLookup::Fetch(ReadingTicket {
            token: token.to_string(),
            generation: self.generation,
        })
    }

    /// 归类请求结果；失败一律视为没有读数，且不写入缓存
    ///
    /// 发起后又经过 `invalidate` 的请求返回 None，调用方应等待新一轮查询。
    pub fn complete(&mut self, fetch: ReadingFetch) -> Option<ReadingCheck> {
        let ReadingFetch { ticket, result } = fetch;
        if ticket.generation != self.generation {
            log::debug!("Discarding reading check from a stale generation");
            return None;
        }
        let check = match result {
            Ok(0) => ReadingCheck::Absent,
            Ok(_) => ReadingCheck::Present,
            Err(e) => {
                log::warn!("Reading check failed, treating as no reading: {}", e);
                return Some(ReadingCheck::Absent);
            }
        };
        self.cache = Some((ticket.token, check));
        Some(check)
    }

    /// 写入读数、切换账号等之后调用
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.cache = None;
    }

    /// 便捷方法：查询、按需请求并归类
    pub async fn resolve<C: HttpClient>(
        &mut self,
        api: &CareApi<C>,
        token: Option<&str>,
        requirements: Requirements,
    ) -> ReadingCheck {
        match self.lookup(token, requirements) {
            ReadingLookup::Resolved(check) => check,
            ReadingLookup::Fetch(ticket) => {
                let fetch = ticket.fetch(api).await;
                self.complete(fetch).unwrap_or_default()
            }
        }
    }
}

// =========================================================
// 组件存活标记
// =========================================================

/// 组件卸载后丢弃迟到的响应
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn end(&self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ClientErrorKind;
    use crate::request::{HttpMethod, MockHttpClient};
    use serde_json::json;

    const READINGS: &str = "http://api.test/readings";
    const NEEDS_READING: Requirements = Requirements {
        profile: false,
        reading: true,
        education: false,
    };

    fn api() -> CareApi<MockHttpClient> {
        let config = ClientConfig {
            api_base_url: "http://api.test".into(),
            ..Default::default()
        };
        CareApi::new(MockHttpClient::new(), &config)
    }

    #[tokio::test]
    async fn not_required_or_no_token_skips_the_network() {
        let api = api();
        let mut progress = ProgressService::new();

        let check = progress.resolve(&api, Some("tok"), Requirements::NONE).await;
        assert_eq!(check, ReadingCheck::Present);
        let check = progress.resolve(&api, None, NEEDS_READING).await;
        assert_eq!(check, ReadingCheck::Absent);
        assert!(api.client().requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn network_failure_fails_closed() {
        let api = api();
        api.client()
            .mock_failure(HttpMethod::Get, READINGS, ClientErrorKind::Network);
        let mut progress = ProgressService::new();

        let check = progress.resolve(&api, Some("tok"), NEEDS_READING).await;
        assert_eq!(check, ReadingCheck::Absent);
        assert_eq!(progress.cached("tok"), None);
    }

    #[tokio::test]
    async fn non_success_and_empty_list_are_absent() {
        let api = api();
        let mut progress = ProgressService::new();

        api.client()
            .mock_response(HttpMethod::Get, READINGS, 500, json!({ "error": "boom" }));
        assert_eq!(
            progress.resolve(&api, Some("tok"), NEEDS_READING).await,
            ReadingCheck::Absent
        );

        api.client()
            .mock_response(HttpMethod::Get, READINGS, 200, json!([]));
        assert_eq!(
            progress.resolve(&api, Some("tok"), NEEDS_READING).await,
            ReadingCheck::Absent
        );
    }

    #[tokio::test]
    async fn result_is_shared_until_invalidated() {
        let api = api();
        api.client().mock_response(
            HttpMethod::Get,
            READINGS,
            200,
            json!([{ "id": 1, "value": 120.0 }]),
        );
        let mut progress = ProgressService::new();

        for _ in 0..3 {
            assert_eq!(
                progress.resolve(&api, Some("tok"), NEEDS_READING).await,
                ReadingCheck::Present
            );
        }
        assert_eq!(api.client().count(HttpMethod::Get, READINGS), 1);

        // 其他账号不命中缓存
        progress.resolve(&api, Some("other"), NEEDS_READING).await;
        assert_eq!(api.client().count(HttpMethod::Get, READINGS), 2);

        progress.invalidate();
        progress.resolve(&api, Some("other"), NEEDS_READING).await;
        assert_eq!(api.client().count(HttpMethod::Get, READINGS), 3);
    }

    #[tokio::test]
    async fn fetch_started_before_invalidation_is_dropped() {
        let api = api();
        api.client()
            .mock_response(HttpMethod::Get, READINGS, 200, json!([]));
        let mut progress = ProgressService::new();

        let ReadingLookup::Fetch(stale) = progress.lookup(Some("tok"), NEEDS_READING) else {
            panic!("expected a fetch");
        };
        let stale = stale.fetch(&api).await;
        // 请求进行中用户新增了读数
        progress.invalidate();

        let ReadingLookup::Fetch(fresh) = progress.lookup(Some("tok"), NEEDS_READING) else {
            panic!("expected a fetch");
        };
        api.client().mock_response(
            HttpMethod::Get,
            READINGS,
            200,
            json!([{ "id": 1, "value": 120.0 }]),
        );
        let fresh = fresh.fetch(&api).await;

        assert_eq!(progress.complete(fresh), Some(ReadingCheck::Present));
        // 迟到的旧结果既不返回也不覆盖缓存
        assert_eq!(progress.complete(stale), None);
        assert_eq!(progress.cached("tok"), Some(ReadingCheck::Present));
    }

    #[tokio::test]
    async fn stale_failure_is_dropped_too() {
        let api = api();
        api.client()
            .mock_failure(HttpMethod::Get, READINGS, ClientErrorKind::Network);
        let mut progress = ProgressService::new();

        let ReadingLookup::Fetch(ticket) = progress.lookup(Some("tok"), NEEDS_READING) else {
            panic!("expected a fetch");
        };
        let fetch = ticket.fetch(&api).await;
        progress.invalidate();

        assert_eq!(progress.complete(fetch), None);
    }

    #[test]
    fn liveness_flag() {
        let live = Liveness::new();
        let handle = live.clone();
        assert!(handle.is_alive());
        live.end();
        assert!(!handle.is_alive());
    }
}
