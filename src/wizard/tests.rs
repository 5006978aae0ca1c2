use super::actions::*;
use super::*;
use crate::api::CareApi;
use crate::config::ClientConfig;
use crate::error::ClientErrorKind;
use crate::progress::ProgressService;
use crate::request::{HttpMethod, MockHttpClient};
use crate::storage::{KEY_ONBOARDING_COMPLETE, MemoryStore};
use crate::validate::{ProfileForm, ReadingForm};
use serde_json::json;

fn api() -> CareApi<MockHttpClient> {
    let config = ClientConfig {
        api_base_url: "http://api.test".into(),
        ..Default::default()
    };
    CareApi::new(MockHttpClient::new(), &config)
}

fn reading_form() -> ReadingForm {
    ReadingForm {
        value: "150".into(),
        date: "2024-03-01".into(),
        time: "07:30".into(),
        context: "post_meal".into(),
        notes: String::new(),
    }
}

#[test]
fn skipping_every_step_never_completes() {
    let mut session = SessionManager::hydrate(MemoryStore::new());
    let mut wizard = OnboardingWizard::new();

    wizard.proceed(); // welcome has nothing to skip
    for _ in 0..10 {
        wizard.skip();
    }
    assert_eq!(wizard.step(), WizardStep::Done);
    assert!(!session.onboarding_complete());
    assert!(session.store().kv().get(KEY_ONBOARDING_COMPLETE).is_none());
}

#[test]
fn only_the_done_step_commits() {
    let mut session = SessionManager::hydrate(MemoryStore::new());
    let mut wizard = OnboardingWizard::new();

    for step in &WizardStep::ALL[..5] {
        assert_eq!(wizard.step(), *step);
        assert_eq!(wizard.complete(&mut session), None);
        assert!(!session.onboarding_complete());
        wizard.proceed();
    }

    assert_eq!(wizard.complete(&mut session), Some(Route::Dashboard));
    assert!(session.onboarding_complete());
}

#[test]
fn failed_action_keeps_step_and_shows_error() {
    let mut wizard = OnboardingWizard::new();
    wizard.proceed();
    assert_eq!(wizard.step(), WizardStep::Profile);

    assert!(wizard.begin_action());
    assert!(!wizard.begin_action());
    wizard.proceed(); // ignored while busy
    wizard.finish_action(Err("Failed to save".into()));

    assert_eq!(wizard.step(), WizardStep::Profile);
    assert_eq!(wizard.error(), Some("Failed to save"));
    assert!(!wizard.is_busy());

    assert!(wizard.begin_action());
    assert_eq!(wizard.error(), None);
    wizard.finish_action(Ok(()));
    assert_eq!(wizard.step(), WizardStep::GlucoseReading);
}

#[test]
fn steps_without_actions_cannot_begin_one() {
    let mut wizard = OnboardingWizard::new();
    assert!(!wizard.begin_action());
    wizard.back();
    assert_eq!(wizard.step(), WizardStep::Welcome);
}

#[test]
fn entry_redirects_once_complete() {
    let mut session = SessionManager::hydrate(MemoryStore::new());
    assert!(matches!(OnboardingWizard::enter(&session), WizardEntry::Start(_)));
    session.mark_onboarding_complete();
    assert_eq!(
        OnboardingWizard::enter(&session),
        WizardEntry::Redirect(Route::Dashboard)
    );
}

#[tokio::test]
async fn save_profile_patches_then_fetches_bmi() {
    let api = api();
    api.client().mock_response(
        HttpMethod::Patch,
        "http://api.test/me",
        200,
        json!({ "id": 1, "name": "Amina", "email": "a@b.co", "height_cm": 170.0, "weight_kg": 65.0 }),
    );
    api.client().mock_response(
        HttpMethod::Get,
        "http://api.test/me/bmi",
        200,
        json!({ "bmi": 22.5, "category": "Normal" }),
    );

    let form = ProfileForm {
        height_cm: "170".into(),
        weight_kg: "65".into(),
        ..Default::default()
    };
    let saved = save_profile(&api, "tok", &form).await.unwrap();
    assert!(saved.profile.user.is_profile_complete());
    assert_eq!(saved.bmi.unwrap().category, "Normal");
}

#[tokio::test]
async fn save_profile_keeps_diabetes_type_and_doctor() {
    let api = api();
    api.client().mock_response(
        HttpMethod::Patch,
        "http://api.test/me",
        200,
        json!({ "id": 1, "name": "Amina", "email": "a@b.co", "diabetes_type": "type2", "doctor_id": 4 }),
    );

    let form = ProfileForm {
        diabetes_type: "type2".into(),
        height_cm: "170".into(),
        weight_kg: "65".into(),
        doctor_id: "4".into(),
    };
    save_profile(&api, "tok", &form).await.unwrap();

    let patch = api
        .client()
        .requests
        .borrow()
        .iter()
        .find(|r| r.method == HttpMethod::Patch)
        .and_then(|r| r.body.clone())
        .unwrap();
    let body: serde_json::Value = serde_json::from_str(&patch).unwrap();
    assert_eq!(body, json!({ "height_cm": 170.0, "weight_kg": 65.0 }));
}

#[tokio::test]
async fn profile_details_write_every_field() {
    let api = api();
    api.client().mock_response(
        HttpMethod::Patch,
        "http://api.test/me",
        200,
        json!({ "id": 1, "name": "Amina", "email": "a@b.co", "diabetes_type": "type1" }),
    );

    let form = ProfileForm {
        diabetes_type: "type1".into(),
        ..Default::default()
    };
    save_profile_details(&api, "tok", &form).await.unwrap();

    let sent = api.client().requests.borrow()[0].body.clone().unwrap();
    let body: serde_json::Value = serde_json::from_str(&sent).unwrap();
    assert_eq!(
        body,
        json!({ "diabetes_type": "type1", "height_cm": null, "weight_kg": null, "doctor_id": null })
    );
}

#[tokio::test]
async fn save_profile_surfaces_server_error() {
    let api = api();
    api.client().mock_response(
        HttpMethod::Patch,
        "http://api.test/me",
        400,
        json!({ "error": "height_cm must be numeric" }),
    );

    let err = save_profile(&api, "tok", &ProfileForm::default())
        .await
        .unwrap_err();
    assert_eq!(err.user_message(MSG_PROFILE_FAILED), "height_cm must be numeric");
    assert_eq!(api.client().count(HttpMethod::Get, "http://api.test/me/bmi"), 0);
}

#[tokio::test]
async fn invalid_profile_is_not_sent() {
    let api = api();
    let form = ProfileForm {
        height_cm: "12".into(),
        ..Default::default()
    };
    let err = save_profile(&api, "tok", &form).await.unwrap_err();
    assert_eq!(err.field_errors().unwrap().get("height_cm"), Some("Too short"));
    assert!(api.client().requests.borrow().is_empty());
}

#[tokio::test]
async fn reminder_failure_is_swallowed() {
    let api = api();
    api.client().mock_response(
        HttpMethod::Post,
        "http://api.test/readings",
        201,
        json!({
            "id": 5, "value": 150.0, "date": "2024-03-01", "time": "07:30", "context": "post_meal",
            "evaluation": { "status": "normal", "color": "green", "suggestions": [] }
        }),
    );
    api.client().mock_failure(
        HttpMethod::Post,
        "http://api.test/reminders",
        ClientErrorKind::Network,
    );

    let mut progress = ProgressService::new();
    let before = progress.generation();
    let created = log_first_reading(&api, "tok", &reading_form(), || progress.invalidate())
        .await
        .unwrap();

    assert_eq!(created.reading.id, 5);
    assert_eq!(progress.generation(), before + 1);
    assert_eq!(api.client().count(HttpMethod::Post, "http://api.test/reminders"), 1);
    let reminder: serde_json::Value =
        serde_json::from_str(api.client().last().unwrap().body.as_deref().unwrap()).unwrap();
    assert_eq!(reminder["scheduled_time"], "07:30");
    assert_eq!(reminder["frequency"], "daily");
}

#[tokio::test]
async fn failed_reading_does_not_invalidate() {
    let api = api();
    api.client().mock_response(
        HttpMethod::Post,
        "http://api.test/readings",
        500,
        json!({}),
    );

    let mut invalidated = false;
    let err = log_first_reading(&api, "tok", &reading_form(), || invalidated = true)
        .await
        .unwrap_err();
    assert!(!invalidated);
    assert_eq!(err.user_message(MSG_READING_FAILED), MSG_READING_FAILED);
    assert_eq!(api.client().count(HttpMethod::Post, "http://api.test/reminders"), 0);
}
