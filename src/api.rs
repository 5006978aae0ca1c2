use sukari_shared::insights::{
    EducationalInsights, FoodImpact, FoodImpactRequest, FoodRecommendations, GlucoseAlerts,
    KenyanFoods, UserProgress,
};
use sukari_shared::protocol::*;
use sukari_shared::{
    AuthResponse, Bmi, BmiSnapshot, CONTENT_TYPE_JSON, CreatedReading, DashboardSummary, Doctor,
    DoctorMessage, DoctorPatients, EnhancedProfile, ErrorBody, ForgotPasswordRequest,
    HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE, LoginRequest, Medication, MedicationPatch,
    MessageResponse, NewDoctorMessage, NewMedication, NewReading, NewReminder, ProfilePatch,
    ProfileResponse, Reading, Reminder, ReminderPatch, SignupRequest,
};

use crate::config::{ClientConfig, Language};
use crate::error::{ClientError, ClientResult};
use crate::request::{HttpClient, HttpRequest};

// =========================================================
// 业务接口: CareApi
// =========================================================

/// 后端 REST 接口的类型化封装
///
/// 接受任何实现了 HttpClient 的客户端，从而与具体的 HTTP 实现解耦。
/// token 由调用方按次传入，会话状态不属于这一层。
#[derive(Clone)]
pub struct CareApi<C: HttpClient> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> CareApi<C> {
    pub fn new(client: C, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.api_base_url.clone(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// 发送一个端点请求并解码响应
    ///
    /// 需鉴权的端点在没有 token 时不发出请求，直接返回 `SessionExpired`。
    pub async fn call<R: ApiRequest>(&self, req: &R, token: Option<&str>) -> ClientResult<R::Response> {
        let path = req.path();
        let url = format!("{}{}", self.base_url, path);
        let mut http = HttpRequest::new(&url, R::METHOD);

        if R::AUTHENTICATED {
            let token = token.filter(|t| !t.is_empty()).ok_or_else(|| {
                ClientError::session_expired("not signed in").in_op_with("api.call", path.clone())
            })?;
            http = http.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        if R::METHOD.has_body() {
            let body = serde_json::to_string(req)
                .map_err(|e| ClientError::from(e).in_op_with("api.encode", path.clone()))?;
            http = http
                .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
                .with_body(body);
        }

        let resp = self
            .client
            .send(http)
            .await
            .map_err(|e| e.in_op_with("api.call", path.clone()))?;

        if !resp.is_success() {
            // 错误体不是 JSON 时视为没有 error 字段
            let server_message = serde_json::from_str::<ErrorBody>(&resp.body)
                .ok()
                .and_then(|b| b.error);
            return Err(ClientError::http(resp.status, server_message).in_op_with("api.call", path));
        }

        if R::DISCARDS_BODY {
            return serde_json::from_value(serde_json::Value::Null)
                .map_err(|e| ClientError::from(e).in_op_with("api.decode", path));
        }
        resp.json::<R::Response>()
            .map_err(|e| e.in_op_with("api.decode", path))
    }

    // --- 认证 ---

    pub async fn signup(&self, req: &SignupRequest) -> ClientResult<AuthResponse> {
        self.call(req, None).await
    }

    pub async fn login(&self, req: &LoginRequest) -> ClientResult<AuthResponse> {
        self.call(req, None).await
    }

    pub async fn forgot_password(&self, email: &str) -> ClientResult<MessageResponse> {
        let req = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.call(&req, None).await
    }

    pub async fn check_session(&self, token: &str) -> ClientResult<ProfileResponse> {
        self.call(&CheckSessionRequest, Some(token)).await
    }

    // --- 档案 ---

    pub async fn update_profile(&self, token: &str, patch: &ProfilePatch) -> ClientResult<ProfileResponse> {
        self.call(patch, Some(token)).await
    }

    pub async fn bmi(&self, token: &str) -> ClientResult<Bmi> {
        self.call(&BmiRequest, Some(token)).await
    }

    pub async fn update_enhanced_profile(
        &self,
        token: &str,
        profile: &EnhancedProfile,
    ) -> ClientResult<ProfileResponse> {
        self.call(profile, Some(token)).await
    }

    pub async fn bmi_history(&self, token: &str) -> ClientResult<Vec<BmiSnapshot>> {
        self.call(&BmiHistoryRequest, Some(token)).await
    }

    pub async fn dashboard(&self, token: &str) -> ClientResult<DashboardSummary> {
        self.call(&DashboardRequest, Some(token)).await
    }

    // --- 血糖读数 ---

    pub async fn readings(&self, token: &str) -> ClientResult<Vec<Reading>> {
        self.call(&ListReadingsRequest, Some(token)).await
    }

    pub async fn create_reading(&self, token: &str, reading: &NewReading) -> ClientResult<CreatedReading> {
        self.call(reading, Some(token)).await
    }

    pub async fn delete_reading(&self, token: &str, id: i64) -> ClientResult<()> {
        self.call(&DeleteReadingRequest { id }, Some(token)).await?;
        Ok(())
    }

    // --- 用药 ---

    pub async fn medications(&self, token: &str) -> ClientResult<Vec<Medication>> {
        self.call(&ListMedicationsRequest, Some(token)).await
    }

    pub async fn create_medication(&self, token: &str, med: &NewMedication) -> ClientResult<Medication> {
        self.call(med, Some(token)).await
    }

    pub async fn update_medication(
        &self,
        token: &str,
        id: i64,
        patch: MedicationPatch,
    ) -> ClientResult<Medication> {
        self.call(&UpdateMedicationRequest { id, patch }, Some(token))
            .await
    }

    // --- 医生 ---

    pub async fn doctors(&self) -> ClientResult<Vec<Doctor>> {
        self.call(&ListDoctorsRequest, None).await
    }

    pub async fn doctor_patients(&self, doctor_id: i64) -> ClientResult<DoctorPatients> {
        self.call(&DoctorPatientsRequest { doctor_id }, None).await
    }

    // --- 提醒 ---

    pub async fn reminders(&self, token: &str) -> ClientResult<Vec<Reminder>> {
        Ok(self.call(&ListRemindersRequest, Some(token)).await?.reminders)
    }

    pub async fn create_reminder(&self, token: &str, reminder: &NewReminder) -> ClientResult<Reminder> {
        self.call(reminder, Some(token)).await
    }

    pub async fn update_reminder(
        &self,
        token: &str,
        id: i64,
        patch: ReminderPatch,
    ) -> ClientResult<Reminder> {
        self.call(&UpdateReminderRequest { id, patch }, Some(token))
            .await
    }

    pub async fn delete_reminder(&self, token: &str, id: i64) -> ClientResult<()> {
        self.call(&DeleteReminderRequest { id }, Some(token)).await?;
        Ok(())
    }

    // --- 医生消息 ---

    pub async fn doctor_messages(&self, token: &str) -> ClientResult<Vec<DoctorMessage>> {
        Ok(self
            .call(&ListDoctorMessagesRequest, Some(token))
            .await?
            .messages)
    }

    pub async fn send_doctor_message(
        &self,
        token: &str,
        message: &NewDoctorMessage,
    ) -> ClientResult<DoctorMessage> {
        self.call(message, Some(token)).await
    }

    // --- 内容 ---

    pub async fn kenyan_foods(&self) -> ClientResult<KenyanFoods> {
        self.call(&KenyanFoodsRequest, None).await
    }

    pub async fn food_recommendations(&self, token: &str, lang: Language) -> ClientResult<FoodRecommendations> {
        let req = FoodRecommendationsRequest {
            lang: lang.code().to_string(),
        };
        self.call(&req, Some(token)).await
    }

    pub async fn food_impact(&self, token: &str, food_name: &str, lang: Language) -> ClientResult<FoodImpact> {
        let req = FoodImpactRequest {
            food_name: food_name.to_string(),
            language: lang.code().to_string(),
        };
        self.call(&req, Some(token)).await
    }

    pub async fn glucose_alerts(&self, token: &str, lang: Language) -> ClientResult<GlucoseAlerts> {
        let req = GlucoseAlertsRequest {
            lang: lang.code().to_string(),
        };
        self.call(&req, Some(token)).await
    }

    pub async fn user_progress(&self, token: &str, lang: Language) -> ClientResult<UserProgress> {
        let req = UserProgressRequest {
            lang: lang.code().to_string(),
        };
        self.call(&req, Some(token)).await
    }

    pub async fn educational_insights(
        &self,
        token: &str,
        lang: Language,
    ) -> ClientResult<EducationalInsights> {
        let req = EducationalInsightsRequest {
            lang: lang.code().to_string(),
        };
        self.call(&req, Some(token)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientErrorKind;
    use crate::request::{HttpMethod, MockHttpClient};
    use serde_json::json;

    const BASE: &str = "http://api.test";

    fn api() -> CareApi<MockHttpClient> {
        let config = ClientConfig {
            api_base_url: BASE.to_string(),
            ..Default::default()
        };
        CareApi::new(MockHttpClient::new(), &config)
    }

    #[tokio::test]
    async fn bearer_header_and_json_body_are_attached() {
        let api = api();
        api.client().mock_response(
            HttpMethod::Post,
            "http://api.test/readings",
            201,
            json!({ "id": 1, "value": 120.0, "date": "2024-03-01", "time": "08:00" }),
        );

        let created = api
            .create_reading(
                "tok",
                &NewReading {
                    value: 120.0,
                    date: "2024-03-01".into(),
                    time: "08:00".into(),
                    context: None,
                    notes: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(created.reading.id, 1);
        assert!(created.evaluation.is_none());

        let sent = api.client().last().unwrap();
        assert_eq!(sent.headers.get("Authorization").unwrap(), "Bearer tok");
        assert_eq!(sent.headers.get("Content-Type").unwrap(), "application/json");
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "value": 120.0, "date": "2024-03-01", "time": "08:00" }));
    }

    #[tokio::test]
    async fn public_endpoints_send_no_token_and_gets_no_body() {
        let api = api();
        api.client()
            .mock_response(HttpMethod::Get, "http://api.test/doctors", 200, json!([]));

        assert!(api.doctors().await.unwrap().is_empty());
        let sent = api.client().last().unwrap();
        assert!(!sent.headers.contains_key("Authorization"));
        assert!(sent.body.is_none());
    }

    #[tokio::test]
    async fn error_field_is_carried() {
        let api = api();
        api.client().mock_response(
            HttpMethod::Post,
            "http://api.test/login",
            401,
            json!({ "error": "Invalid credentials" }),
        );

        let err = api
            .login(&LoginRequest {
                email: "a@b.co".into(),
                password: "wrongpass".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
    }

    #[tokio::test]
    async fn non_json_error_body_falls_back() {
        let api = api();
        api.client()
            .mock_raw(HttpMethod::Get, "http://api.test/dashboard", 502, "<html>Bad Gateway</html>");

        let err = api.dashboard("tok").await.unwrap_err();
        assert_eq!(err.user_message("Could not load dashboard"), "Could not load dashboard");
    }

    #[tokio::test]
    async fn authenticated_call_without_token_is_not_sent() {
        let api = api();
        let err = api.call(&ListReadingsRequest, None).await.unwrap_err();
        assert_eq!(err.kind, ClientErrorKind::SessionExpired);
        assert!(api.client().requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn empty_delete_response_decodes_as_unit() {
        let api = api();
        api.client()
            .mock_raw(HttpMethod::Delete, "http://api.test/readings/9", 204, "");
        api.delete_reading("tok", 9).await.unwrap();
    }

    #[tokio::test]
    async fn delete_ignores_whatever_the_server_says_on_success() {
        let api = api();
        api.client().mock_response(
            HttpMethod::Delete,
            "http://api.test/reminders/1",
            200,
            json!({ "message": "Reminder deleted" }),
        );
        api.delete_reminder("tok", 1).await.unwrap();

        api.client()
            .mock_raw(HttpMethod::Delete, "http://api.test/readings/2", 200, "Deleted");
        api.delete_reading("tok", 2).await.unwrap();

        api.client().mock_response(
            HttpMethod::Delete,
            "http://api.test/readings/3",
            404,
            json!({ "error": "Reading not found" }),
        );
        let err = api.delete_reading("tok", 3).await.unwrap_err();
        assert_eq!(err.user_message("Delete failed"), "Reading not found");
    }

    #[tokio::test]
    async fn language_and_wrapped_lists() {
        let api = api();
        api.client().mock_response(
            HttpMethod::Get,
            "http://api.test/user-progress?lang=sw",
            200,
            json!({ "progress": { "current_streak": 3, "level": { "level": 2, "title": {"en": "Tracker", "sw": "Mfuatiliaji"} } } }),
        );
        api.client().mock_response(
            HttpMethod::Get,
            "http://api.test/reminders",
            200,
            json!({ "reminders": [{ "id": 4, "title": "Check", "reminder_type": "glucose", "is_active": true }] }),
        );

        let progress = api.user_progress("tok", Language::Sw).await.unwrap();
        assert_eq!(progress.progress.current_streak, 3);
        assert_eq!(progress.progress.level.title.pick("sw"), "Mfuatiliaji");

        let reminders = api.reminders("tok").await.unwrap();
        assert_eq!(reminders.len(), 1);
        assert!(reminders[0].is_active);
    }

    #[tokio::test]
    async fn food_impact_posts_name_and_language() {
        let api = api();
        api.client().mock_response(
            HttpMethod::Post,
            "http://api.test/food-impact",
            200,
            json!({ "prediction": { "food": "ugali", "glucose_impact": "high", "estimated_spike": 60.0 } }),
        );

        let impact = api.food_impact("tok", "ugali", Language::En).await.unwrap();
        assert_eq!(impact.prediction.unwrap().glucose_impact, "high");
        let body: serde_json::Value =
            serde_json::from_str(api.client().last().unwrap().body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "food_name": "ugali", "language": "en" }));
    }
}
