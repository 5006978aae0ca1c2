//! Sukari 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `sukari::route`: 路由定义（领域模型，位于核心库）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话状态管理
//! - `onboarding`: 引导进度上下文
//! - `components`: UI 组件层

mod auth;
mod config;
pub mod logger;
mod onboarding;
mod components {
    pub mod common;
    pub mod guard;
    pub mod nav_bar;
    pub mod pages {
        pub mod dashboard;
        pub mod doctor_messages;
        pub mod education;
        pub mod food_insights;
        pub mod forgot_password;
        pub mod gamification;
        pub mod home;
        pub mod login;
        pub mod medications;
        pub mod onboarding;
        pub mod profile;
        pub mod readings;
        pub mod reminders;
        pub mod signup;
        pub mod smart_alerts;
    }
}

use crate::auth::AuthContext;
use crate::components::guard::OnboardingGuard;
use crate::components::nav_bar::NavBar;
use crate::components::pages::{
    dashboard::DashboardPage, doctor_messages::DoctorMessagesPage, education::EducationPage,
    food_insights::FoodInsightsPage, forgot_password::ForgotPasswordPage,
    gamification::GamificationPage, home::HomePage, login::LoginPage, medications::MedicationsPage,
    onboarding::OnboardingPage, profile::ProfilePage, readings::ReadingsPage,
    reminders::RemindersPage, signup::SignupPage, smart_alerts::SmartAlertsPage,
};
use crate::onboarding::ProgressContext;

use leptos::prelude::*;
use sukari::Route;

// 浏览器 API 封装：fetch、localStorage、history、定时器
pub(crate) mod web {
    mod http;
    pub mod router;
    mod storage;
    mod timer;

    pub use http::BrowserHttpClient;
    pub use storage::BrowserStore;
    pub use timer::Interval;
}

use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 有引导要求的页面包在守卫里；登录检查由路由服务完成。
fn route_matcher(route: Route) -> AnyView {
    match route {
        Route::Home => view! { <HomePage /> }.into_any(),
        Route::Login => view! { <LoginPage /> }.into_any(),
        Route::Signup => view! { <SignupPage /> }.into_any(),
        Route::ForgotPassword => view! { <ForgotPasswordPage /> }.into_any(),
        Route::Profile => view! { <ProfilePage /> }.into_any(),
        Route::Readings => view! {
            <OnboardingGuard route=Route::Readings>
                <ReadingsPage />
            </OnboardingGuard>
        }
        .into_any(),
        Route::Education => view! {
            <OnboardingGuard route=Route::Education>
                <EducationPage />
            </OnboardingGuard>
        }
        .into_any(),
        Route::Dashboard => view! {
            <OnboardingGuard route=Route::Dashboard>
                <DashboardPage />
            </OnboardingGuard>
        }
        .into_any(),
        Route::Onboarding => view! { <OnboardingPage /> }.into_any(),
        Route::Medications => view! { <MedicationsPage /> }.into_any(),
        Route::Reminders => view! { <RemindersPage /> }.into_any(),
        Route::DoctorMessages => view! { <DoctorMessagesPage /> }.into_any(),
        Route::FoodInsights => view! { <FoodInsightsPage /> }.into_any(),
        Route::SmartAlerts => view! { <SmartAlertsPage /> }.into_any(),
        Route::Gamification => view! { <GamificationPage /> }.into_any(),
        Route::NotFound => view! {
            <div class="flex items-center justify-center min-h-[60vh]">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = config::client_config();
    log::info!("[App] API base: {}", config.api_base_url);

    // 1. 从 LocalStorage 同步恢复会话
    let auth_ctx = AuthContext::new(&config);
    provide_context(auth_ctx);
    provide_context(ProgressContext::new());

    // 2. 后台校验 token
    auth_ctx.restore();

    // 3. 认证信号注入路由服务
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        <Router is_authenticated=is_authenticated>
            <div class="min-h-screen bg-base-200">
                <NavBar />
                <main>
                    <RouterOutlet matcher=route_matcher />
                </main>
            </div>
        </Router>
    }
}
