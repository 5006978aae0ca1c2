use super::*;
use crate::config::ClientConfig;
use crate::error::ClientErrorKind;
use crate::request::{HttpMethod, MockHttpClient};
use crate::storage::{
    KEY_ADVICE, KEY_EDUCATION, KEY_LANGUAGE, KEY_TOKEN, KEY_USER, MemoryStore,
};
use serde_json::json;

const CHECK_SESSION: &str = "http://api.test/check_session";

fn api() -> CareApi<MockHttpClient> {
    let config = ClientConfig {
        api_base_url: "http://api.test".into(),
        ..Default::default()
    };
    CareApi::new(MockHttpClient::new(), &config)
}

fn user(name: &str) -> User {
    User {
        id: 1,
        name: name.into(),
        email: "amina@example.com".into(),
        ..Default::default()
    }
}

fn auth_response(token: &str) -> AuthResponse {
    AuthResponse {
        access_token: token.into(),
        user: user("Amina"),
        education: Some(vec!["Check your feet daily".into()]),
        advice: Some(Advice {
            nutrition: vec!["Swap white ugali for brown".into()],
            ..Default::default()
        }),
    }
}

fn signed_in(token: &str) -> SessionManager<MemoryStore> {
    let mut session = SessionManager::hydrate(MemoryStore::new());
    session.login(auth_response(token));
    session
}

#[test]
fn authed_iff_token_and_user() {
    let mut s = Session::default();
    assert!(!s.is_authed());
    s.token = Some("tok".into());
    assert!(!s.is_authed());
    s.user = Some(user("Amina"));
    assert!(s.is_authed());
    s.token = Some(String::new());
    assert!(!s.is_authed());
    s.token = None;
    assert!(!s.is_authed());
}

#[test]
fn login_persists_every_field() {
    let session = signed_in("tok");
    let kv = session.store().kv();
    assert_eq!(kv.get(KEY_TOKEN).as_deref(), Some("tok"));
    assert!(kv.get(KEY_USER).unwrap().contains("Amina"));
    assert!(kv.get(KEY_EDUCATION).is_some());
    assert!(kv.get(KEY_ADVICE).is_some());

    // 用同样的键值重新构建得到同一会话
    let copy = MemoryStore::new();
    for key in [KEY_TOKEN, KEY_USER, KEY_EDUCATION, KEY_ADVICE] {
        copy.set(key, &kv.get(key).unwrap()).unwrap();
    }
    let rebuilt = SessionManager::hydrate(copy);
    assert_eq!(rebuilt.session(), session.session());
}

#[test]
fn hydrate_reads_persisted_fields() {
    let kv = MemoryStore::new();
    kv.set(KEY_TOKEN, "tok").unwrap();
    kv.set(KEY_USER, r#"{"id": 3, "name": "Otieno", "email": "o@example.com"}"#)
        .unwrap();
    kv.set(KEY_EDUCATION, r#"["Walk after meals"]"#).unwrap();

    let session = SessionManager::hydrate(kv);
    assert!(session.is_authed());
    assert_eq!(session.session().user.as_ref().unwrap().name, "Otieno");
    assert_eq!(session.session().education, vec!["Walk after meals".to_string()]);
    assert!(session.session().advice.is_empty());
}

#[test]
fn logout_wipes_fields_and_every_key() {
    let mut session = signed_in("tok");
    session.mark_education_done();
    session.mark_onboarding_complete();
    session.set_language(Language::Sw);

    session.logout();

    assert_eq!(session.session(), &Session::default());
    assert!(session.token().is_none());
    assert!(session.session().user.is_none());
    assert!(session.session().education.is_empty());
    assert!(session.session().advice.is_empty());
    assert!(session.store().kv().keys().is_empty());
    assert!(session.store().kv().get(KEY_LANGUAGE).is_none());
    assert!(!session.education_done());
}

#[test]
fn signup_clears_completion_flags() {
    let mut session = signed_in("old");
    session.mark_education_done();
    session.mark_onboarding_complete();

    session.signup(auth_response("new"));

    assert_eq!(session.token(), Some("new"));
    assert!(!session.education_done());
    assert!(!session.onboarding_complete());
}

#[test]
fn login_keeps_flags() {
    let mut session = signed_in("old");
    session.mark_education_done();
    session.login(auth_response("again"));
    assert!(session.education_done());
}

#[test]
fn empty_payloads_remove_keys() {
    let mut session = SessionManager::hydrate(MemoryStore::new());
    session.login(AuthResponse {
        access_token: "tok".into(),
        user: user("Amina"),
        education: None,
        advice: None,
    });
    let kv = session.store().kv();
    assert!(kv.get(KEY_EDUCATION).is_none());
    assert!(kv.get(KEY_ADVICE).is_none());
}

#[test]
fn merge_and_replace_user() {
    let mut session = signed_in("tok");
    session.update_user(UserUpdate::Merge(ProfilePatch {
        height_cm: Some(Some(170.0)),
        weight_kg: Some(Some(65.0)),
        ..Default::default()
    }));
    assert!(session.session().profile_complete());
    assert_eq!(session.session().user.as_ref().unwrap().name, "Amina");

    session.update_user(UserUpdate::Replace(user("Wanjiru")));
    assert!(!session.session().profile_complete());
    let stored = session.store().kv().get(KEY_USER).unwrap();
    assert!(stored.contains("Wanjiru"));
}

#[test]
fn merge_without_user_is_ignored() {
    let mut session = SessionManager::hydrate(MemoryStore::new());
    session.update_user(UserUpdate::Merge(ProfilePatch::default()));
    assert!(session.session().user.is_none());
    assert!(session.store().kv().get(KEY_USER).is_none());
}

#[tokio::test]
async fn restore_refreshes_user_and_extras() {
    let api = api();
    api.client().mock_response(
        HttpMethod::Get,
        CHECK_SESSION,
        200,
        json!({
            "id": 1, "name": "Amina K.", "email": "amina@example.com",
            "height_cm": 170.0, "weight_kg": 65.0,
            "education": ["Hydrate"],
        }),
    );
    let mut session = signed_in("tok");

    assert_eq!(session.restore(&api).await, Some(RestoreResult::Refreshed));
    assert_eq!(session.session().user.as_ref().unwrap().name, "Amina K.");
    assert_eq!(session.session().education, vec!["Hydrate".to_string()]);
    // advice 未随响应返回时保留原值
    assert!(!session.session().advice.is_empty());
    let sent = api.client().last().unwrap();
    assert_eq!(sent.headers.get("Authorization").unwrap(), "Bearer tok");
}

#[tokio::test]
async fn restore_runs_once() {
    let api = api();
    api.client()
        .mock_response(HttpMethod::Get, CHECK_SESSION, 200, json!({ "id": 1 }));
    let mut session = signed_in("tok");

    assert!(session.restore(&api).await.is_some());
    assert!(session.restore(&api).await.is_none());
    assert!(session.begin_restore().is_none());
    assert_eq!(api.client().count(HttpMethod::Get, CHECK_SESSION), 1);
}

#[tokio::test]
async fn restore_without_token_does_nothing() {
    let api = api();
    let mut session = SessionManager::hydrate(MemoryStore::new());
    assert!(session.restore(&api).await.is_none());
    assert!(api.client().requests.borrow().is_empty());
}

#[tokio::test]
async fn stale_session_is_invalidated() {
    let api = api();
    api.client().mock_response(
        HttpMethod::Get,
        CHECK_SESSION,
        401,
        json!({ "error": "Token has expired" }),
    );
    let mut session = signed_in("tok");
    session.mark_education_done();

    assert_eq!(session.restore(&api).await, Some(RestoreResult::Invalidated));
    assert!(!session.is_authed());
    let kv = session.store().kv();
    for key in [KEY_TOKEN, KEY_USER, KEY_EDUCATION, KEY_ADVICE] {
        assert!(kv.get(key).is_none(), "{} should be removed", key);
    }
    // 只清会话字段，不是完整登出
    assert!(session.education_done());
}

#[tokio::test]
async fn network_failure_also_invalidates() {
    let api = api();
    api.client()
        .mock_failure(HttpMethod::Get, CHECK_SESSION, ClientErrorKind::Timeout);
    let mut session = signed_in("tok");

    assert_eq!(session.restore(&api).await, Some(RestoreResult::Invalidated));
    assert!(session.token().is_none());
}

#[tokio::test]
async fn login_during_restore_wins() {
    let api = api();
    api.client().mock_response(
        HttpMethod::Get,
        CHECK_SESSION,
        401,
        json!({ "error": "Token has expired" }),
    );
    let mut session = signed_in("old");

    let ticket = session.begin_restore().unwrap();
    assert_eq!(ticket.token(), "old");
    session.login(auth_response("fresh"));
    let outcome = ticket.check(&api).await;

    assert_eq!(session.finish_restore(outcome), RestoreResult::Superseded);
    assert_eq!(session.token(), Some("fresh"));
    assert!(session.is_authed());
}

#[tokio::test]
async fn logout_during_restore_is_not_undone() {
    let api = api();
    api.client()
        .mock_response(HttpMethod::Get, CHECK_SESSION, 200, json!({ "id": 1 }));
    let mut session = signed_in("tok");

    let ticket = session.begin_restore().unwrap();
    session.logout();
    let outcome = ticket.check(&api).await;

    assert_eq!(session.finish_restore(outcome), RestoreResult::Superseded);
    assert!(session.session().user.is_none());
}
