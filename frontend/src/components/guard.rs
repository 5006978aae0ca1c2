//! 引导守卫组件
//!
//! 包在需要引导步骤的页面外层。读数检查未完成时显示等待状态，
//! 需要跳转时用 replaceState 重定向，不留下历史记录。

use leptos::prelude::*;
use sukari::{GuardState, Route, guard};

use crate::auth::use_auth;
use crate::components::common::Loading;
use crate::onboarding::use_onboarding_progress;
use crate::web::router::use_router;

#[component]
pub fn OnboardingGuard(route: Route, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let progress = use_onboarding_progress(route.requirements());

    let decision = Memo::new(move |_| {
        let is_authed = auth.state.with(|s| s.is_authenticated());
        guard::decide(route, is_authed, &progress.get())
    });

    Effect::new(move |_| {
        if let GuardState::Redirect(target) = decision.get() {
            router.redirect(target);
        }
    });

    move || match decision.get() {
        GuardState::Allowed => children().into_any(),
        GuardState::Checking => view! { <Loading label="Checking onboarding..." /> }.into_any(),
        GuardState::Redirect(_) => ().into_any(),
    }
}
