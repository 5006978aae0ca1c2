//! Sukari 客户端核心
//!
//! 与 DOM 无关的部分：会话、引导进度、路由守卫、导航可见性、引导向导，
//! 以及它们依赖的 HTTP 抽象、类型化接口与本地存储抽象。

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod medication;
pub mod nav;
pub mod progress;
pub mod request;
pub mod route;
pub mod session;
pub mod storage;
pub mod validate;
pub mod wizard;

pub use api::CareApi;
pub use config::{ClientConfig, Language};
pub use error::{ClientError, ClientErrorKind, ClientResult};
pub use guard::GuardState;
pub use progress::{OnboardingProgress, ProgressService, ReadingCheck};
pub use request::HttpClient;
pub use route::{Requirements, Route};
pub use session::{Session, SessionManager};
pub use storage::KeyValueStore;

// =========================================================
// 端到端流程测试
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MSG_LOGIN_FAILED, authenticate, register};
    use crate::request::{HttpMethod, MockHttpClient};
    use crate::storage::{KEY_TOKEN, MemoryStore};
    use crate::validate::{LoginForm, ProfileForm, ReadingForm, SignupForm};
    use crate::wizard::actions::{log_first_reading, save_profile};
    use serde_json::json;

    const BASE: &str = "http://api.test";

    fn api() -> CareApi<MockHttpClient> {
        let config = ClientConfig {
            api_base_url: BASE.into(),
            ..Default::default()
        };
        CareApi::new(MockHttpClient::new(), &config)
    }

    async fn enter(
        route: Route,
        session: &SessionManager<MemoryStore>,
        progress: &mut ProgressService,
        api: &CareApi<MockHttpClient>,
    ) -> GuardState {
        let check = progress
            .resolve(api, session.token(), route.requirements())
            .await;
        let state = OnboardingProgress::derive(session.session(), check, session.education_done());
        guard::decide(route, session.is_authed(), &state)
    }

    #[tokio::test]
    async fn signup_walks_the_onboarding_gates_in_order() {
        let api = api();
        let client = api.client();
        client.mock_response(
            HttpMethod::Post,
            "http://api.test/signup",
            201,
            json!({
                "access_token": "tok",
                "user": { "id": 9, "name": "Amina", "email": "amina@example.com", "height_cm": null, "weight_kg": null },
                "education": [],
                "advice": {}
            }),
        );
        client.mock_response(HttpMethod::Get, "http://api.test/readings", 200, json!([]));

        let mut session = SessionManager::hydrate(MemoryStore::new());
        let mut progress = ProgressService::new();

        let form = SignupForm {
            name: "Amina".into(),
            email: "amina@example.com".into(),
            password: "secret12".into(),
            diabetes_type: "type2".into(),
        };
        let resp = register(&api, &form).await.unwrap();
        session.signup(resp);
        progress.invalidate();
        assert!(session.is_authed());

        // 1. 档案不完整
        assert_eq!(
            enter(Route::Dashboard, &session, &mut progress, &api).await,
            GuardState::Redirect(Route::Profile)
        );

        // 2. 保存身高体重后去读数页
        client.mock_response(
            HttpMethod::Patch,
            "http://api.test/me",
            200,
            json!({ "id": 9, "name": "Amina", "email": "amina@example.com", "height_cm": 170.0, "weight_kg": 65.0 }),
        );
        let profile_form = ProfileForm {
            height_cm: "170".into(),
            weight_kg: "65".into(),
            ..Default::default()
        };
        let saved = save_profile(&api, session.token().unwrap(), &profile_form)
            .await
            .unwrap();
        session.apply_profile_response(saved.profile);
        assert_eq!(
            enter(Route::Dashboard, &session, &mut progress, &api).await,
            GuardState::Redirect(Route::Readings)
        );

        // 3. 首次读数后去教育页
        client.mock_response(
            HttpMethod::Post,
            "http://api.test/readings",
            201,
            json!({ "id": 1, "value": 110.0, "date": "2024-03-01", "time": "07:30" }),
        );
        client.mock_response(
            HttpMethod::Get,
            "http://api.test/readings",
            200,
            json!([{ "id": 1, "value": 110.0, "date": "2024-03-01", "time": "07:30" }]),
        );
        let reading_form = ReadingForm {
            value: "110".into(),
            date: "2024-03-01".into(),
            time: "07:30".into(),
            ..Default::default()
        };
        let token = session.token().unwrap().to_string();
        log_first_reading(&api, &token, &reading_form, || progress.invalidate())
            .await
            .unwrap();
        assert_eq!(
            enter(Route::Dashboard, &session, &mut progress, &api).await,
            GuardState::Redirect(Route::Education)
        );

        // 4. 教育完成后放行
        session.mark_education_done();
        assert_eq!(
            enter(Route::Dashboard, &session, &mut progress, &api).await,
            GuardState::Allowed
        );
    }

    #[tokio::test]
    async fn invalid_credentials_show_server_text_and_keep_token_unset() {
        let api = api();
        api.client().mock_response(
            HttpMethod::Post,
            "http://api.test/login",
            401,
            json!({ "error": "Invalid credentials" }),
        );
        let mut session = SessionManager::hydrate(MemoryStore::new());

        let form = LoginForm {
            email: "amina@example.com".into(),
            password: "wrongpass".into(),
        };
        let shown = match authenticate(&api, &form).await {
            Ok(resp) => {
                session.login(resp);
                None
            }
            Err(e) => Some(e.user_message(MSG_LOGIN_FAILED)),
        };

        assert_eq!(shown.as_deref(), Some("Invalid credentials"));
        assert!(session.token().is_none());
        assert!(session.store().kv().get(KEY_TOKEN).is_none());
        // 仍停留在登录页
        let stay = OnboardingProgress::derive(session.session(), ReadingCheck::Unknown, false);
        assert_eq!(guard::decide(Route::Login, session.is_authed(), &stay), GuardState::Allowed);
    }

    #[tokio::test]
    async fn oracle_network_failure_routes_to_readings() {
        let api = api();
        api.client().mock_failure(
            HttpMethod::Get,
            "http://api.test/readings",
            ClientErrorKind::Network,
        );
        let mut session = SessionManager::hydrate(MemoryStore::new());
        session.login(sukari_shared::AuthResponse {
            access_token: "tok".into(),
            user: sukari_shared::User {
                height_cm: Some(170.0),
                weight_kg: Some(65.0),
                ..Default::default()
            },
            education: None,
            advice: None,
        });
        session.mark_education_done();
        let mut progress = ProgressService::new();

        assert_eq!(
            enter(Route::Dashboard, &session, &mut progress, &api).await,
            GuardState::Redirect(Route::Readings)
        );
    }
}
