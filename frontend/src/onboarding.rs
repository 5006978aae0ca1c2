//! 引导进度上下文
//!
//! 全局共享一个 `ProgressService`（按 token 缓存"是否已有读数"），
//! 每个组件各自持有一个存活标记，卸载后到达的结果不再写入其信号。

use leptos::prelude::*;
use leptos::task::spawn_local;
use sukari::progress::{Liveness, ReadingLookup};
use sukari::{OnboardingProgress, ProgressService, ReadingCheck, Requirements};

use crate::auth::use_auth;

#[derive(Clone, Copy)]
pub struct ProgressContext {
    service: StoredValue<ProgressService>,
    /// 每次失效加一，驱动依赖进度的组件重新查询
    epoch: RwSignal<u64>,
}

impl ProgressContext {
    pub fn new() -> Self {
        Self {
            service: StoredValue::new(ProgressService::new()),
            epoch: RwSignal::new(0),
        }
    }

    /// 新建读数、登录或登出后调用
    pub fn invalidate(&self) {
        self.service.update_value(|s| s.invalidate());
        self.epoch.update(|e| *e += 1);
    }
}

impl Default for ProgressContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_progress() -> ProgressContext {
    expect_context::<ProgressContext>()
}

/// 读数检查结果；需要网络时先返回 Unknown
pub fn use_reading_check(requirements: Requirements) -> ReadSignal<ReadingCheck> {
    let auth = use_auth();
    let ctx = use_progress();
    let (check, set_check) = signal(ReadingCheck::Unknown);

    let live = Liveness::new();
    on_cleanup({
        let live = live.clone();
        move || live.end()
    });

    // 每轮查询各有一个存活标记，重新查询时结束上一轮
    Effect::new(move |previous: Option<Liveness>| {
        if let Some(previous) = previous {
            previous.end();
        }
        let run = Liveness::new();

        ctx.epoch.track();
        let token = auth.state.with(|s| s.token());
        let lookup = ctx
            .service
            .with_value(|svc| svc.lookup(token.as_deref(), requirements));

        match lookup {
            ReadingLookup::Resolved(resolved) => set_check.set(resolved),
            ReadingLookup::Fetch(ticket) => {
                set_check.set(ReadingCheck::Unknown);
                let api = auth.api();
                let live = live.clone();
                let run = run.clone();
                spawn_local(async move {
                    let fetch = ticket.fetch(&api).await;
                    // 缓存是共享的，组件卸载后仍然记录
                    let resolved = ctx
                        .service
                        .try_update_value(|svc| svc.complete(fetch))
                        .flatten();
                    if let Some(resolved) = resolved {
                        if live.is_alive() && run.is_alive() {
                            set_check.set(resolved);
                        }
                    }
                });
            }
        }
        run
    });

    check
}

/// 当前会话的引导进度
pub fn use_onboarding_progress(requirements: Requirements) -> Signal<OnboardingProgress> {
    let auth = use_auth();
    let check = use_reading_check(requirements);
    Signal::derive(move || {
        auth.state
            .with(|s| OnboardingProgress::derive(&s.session, check.get(), s.education_done))
    })
}
