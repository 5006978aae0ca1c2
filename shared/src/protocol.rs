use crate::insights::{
    EducationalInsights, FoodImpact, FoodImpactRequest, FoodRecommendations, GlucoseAlerts,
    KenyanFoods, UserProgress,
};
use crate::{
    AuthResponse, Bmi, BmiSnapshot, CreatedReading, DashboardSummary, Doctor, DoctorMessage,
    DoctorMessageList, DoctorPatients, EnhancedProfile, ForgotPasswordRequest, LoginRequest,
    Medication, MedicationPatch, MessageResponse, NewDoctorMessage, NewMedication, NewReading,
    NewReminder, ProfilePatch, ProfileResponse, Reading, Reminder, ReminderList, ReminderPatch,
    SignupRequest,
};
use serde::{
    Deserialize, Serialize,
    de::{DeserializeOwned, IgnoredAny},
};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// The implementing type is the JSON body for methods that carry one. Path and
/// query parameters live on `#[serde(skip)]` fields and are spliced in by `path`.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path template.
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the endpoint needs `Authorization: Bearer <token>`.
    const AUTHENTICATED: bool = true;
    /// Whether success is judged by status alone; the response body is never decoded.
    const DISCARDS_BODY: bool = false;

    /// The concrete path for this request instance.
    fn path(&self) -> String {
        Self::PATH.to_string()
    }
}

fn with_lang(path: &str, lang: &str) -> String {
    format!("{}?lang={}", path, lang)
}

// =========================================================
// Authentication & session
// =========================================================

impl ApiRequest for SignupRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/signup";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/login";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;
}

impl ApiRequest for ForgotPasswordRequest {
    type Response = MessageResponse;
    const PATH: &'static str = "/password/forgot";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;
}

/// Validate the stored token and fetch the current user
#[derive(Debug, Serialize)]
pub struct CheckSessionRequest;

impl ApiRequest for CheckSessionRequest {
    type Response = ProfileResponse;
    const PATH: &'static str = "/check_session";
    const METHOD: HttpMethod = HttpMethod::Get;
}

// =========================================================
// Profile
// =========================================================

impl ApiRequest for ProfilePatch {
    type Response = ProfileResponse;
    const PATH: &'static str = "/me";
    const METHOD: HttpMethod = HttpMethod::Patch;
}

#[derive(Debug, Serialize)]
pub struct BmiRequest;

impl ApiRequest for BmiRequest {
    type Response = Bmi;
    const PATH: &'static str = "/me/bmi";
    const METHOD: HttpMethod = HttpMethod::Get;
}

impl ApiRequest for EnhancedProfile {
    type Response = ProfileResponse;
    const PATH: &'static str = "/profile/enhanced";
    const METHOD: HttpMethod = HttpMethod::Put;
}

#[derive(Debug, Serialize)]
pub struct BmiHistoryRequest;

impl ApiRequest for BmiHistoryRequest {
    type Response = Vec<BmiSnapshot>;
    const PATH: &'static str = "/bmi-history";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Serialize)]
pub struct DashboardRequest;

impl ApiRequest for DashboardRequest {
    type Response = DashboardSummary;
    const PATH: &'static str = "/dashboard";
    const METHOD: HttpMethod = HttpMethod::Get;
}

// =========================================================
// Glucose log
// =========================================================

#[derive(Debug, Serialize)]
pub struct ListReadingsRequest;

impl ApiRequest for ListReadingsRequest {
    type Response = Vec<Reading>;
    const PATH: &'static str = "/readings";
    const METHOD: HttpMethod = HttpMethod::Get;
}

impl ApiRequest for NewReading {
    type Response = CreatedReading;
    const PATH: &'static str = "/readings";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Serialize)]
pub struct DeleteReadingRequest {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for DeleteReadingRequest {
    type Response = IgnoredAny;
    const PATH: &'static str = "/readings";
    const METHOD: HttpMethod = HttpMethod::Delete;
    const DISCARDS_BODY: bool = true;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

// =========================================================
// Medications
// =========================================================

#[derive(Debug, Serialize)]
pub struct ListMedicationsRequest;

impl ApiRequest for ListMedicationsRequest {
    type Response = Vec<Medication>;
    const PATH: &'static str = "/medications";
    const METHOD: HttpMethod = HttpMethod::Get;
}

impl ApiRequest for NewMedication {
    type Response = Medication;
    const PATH: &'static str = "/medications";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Serialize)]
pub struct UpdateMedicationRequest {
    #[serde(skip)]
    pub id: i64,
    #[serde(flatten)]
    pub patch: MedicationPatch,
}

impl ApiRequest for UpdateMedicationRequest {
    type Response = Medication;
    const PATH: &'static str = "/medications";
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

// =========================================================
// Doctors (public)
// =========================================================

#[derive(Debug, Serialize)]
pub struct ListDoctorsRequest;

impl ApiRequest for ListDoctorsRequest {
    type Response = Vec<Doctor>;
    const PATH: &'static str = "/doctors";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHENTICATED: bool = false;
}

#[derive(Debug, Serialize)]
pub struct DoctorPatientsRequest {
    #[serde(skip)]
    pub doctor_id: i64,
}

impl ApiRequest for DoctorPatientsRequest {
    type Response = DoctorPatients;
    const PATH: &'static str = "/doctors";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        format!("{}/{}/patients", Self::PATH, self.doctor_id)
    }
}

// =========================================================
// Reminders
// =========================================================

#[derive(Debug, Serialize)]
pub struct ListRemindersRequest;

impl ApiRequest for ListRemindersRequest {
    type Response = ReminderList;
    const PATH: &'static str = "/reminders";
    const METHOD: HttpMethod = HttpMethod::Get;
}

impl ApiRequest for NewReminder {
    type Response = Reminder;
    const PATH: &'static str = "/reminders";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Serialize)]
pub struct UpdateReminderRequest {
    #[serde(skip)]
    pub id: i64,
    #[serde(flatten)]
    pub patch: ReminderPatch,
}

impl ApiRequest for UpdateReminderRequest {
    type Response = Reminder;
    const PATH: &'static str = "/reminders";
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteReminderRequest {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for DeleteReminderRequest {
    type Response = IgnoredAny;
    const PATH: &'static str = "/reminders";
    const METHOD: HttpMethod = HttpMethod::Delete;
    const DISCARDS_BODY: bool = true;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

// =========================================================
// Doctor messages
// =========================================================

#[derive(Debug, Serialize)]
pub struct ListDoctorMessagesRequest;

impl ApiRequest for ListDoctorMessagesRequest {
    type Response = DoctorMessageList;
    const PATH: &'static str = "/doctor-messages";
    const METHOD: HttpMethod = HttpMethod::Get;
}

impl ApiRequest for NewDoctorMessage {
    type Response = DoctorMessage;
    const PATH: &'static str = "/doctor-messages";
    const METHOD: HttpMethod = HttpMethod::Post;
}

// =========================================================
// Food, alerts, progress, education
// =========================================================

#[derive(Debug, Serialize)]
pub struct KenyanFoodsRequest;

impl ApiRequest for KenyanFoodsRequest {
    type Response = KenyanFoods;
    const PATH: &'static str = "/kenyan-foods";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHENTICATED: bool = false;
}

#[derive(Debug, Serialize)]
pub struct FoodRecommendationsRequest {
    #[serde(skip)]
    pub lang: String,
}

impl ApiRequest for FoodRecommendationsRequest {
    type Response = FoodRecommendations;
    const PATH: &'static str = "/food-recommendations";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        with_lang(Self::PATH, &self.lang)
    }
}

/// The served contract is a POST carrying the food name and language.
impl ApiRequest for FoodImpactRequest {
    type Response = FoodImpact;
    const PATH: &'static str = "/food-impact";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Serialize)]
pub struct GlucoseAlertsRequest {
    #[serde(skip)]
    pub lang: String,
}

impl ApiRequest for GlucoseAlertsRequest {
    type Response = GlucoseAlerts;
    const PATH: &'static str = "/glucose-alerts";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        with_lang(Self::PATH, &self.lang)
    }
}

#[derive(Debug, Serialize)]
pub struct UserProgressRequest {
    #[serde(skip)]
    pub lang: String,
}

impl ApiRequest for UserProgressRequest {
    type Response = UserProgress;
    const PATH: &'static str = "/user-progress";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        with_lang(Self::PATH, &self.lang)
    }
}

#[derive(Debug, Serialize)]
pub struct EducationalInsightsRequest {
    #[serde(skip)]
    pub lang: String,
}

impl ApiRequest for EducationalInsightsRequest {
    type Response = EducationalInsights;
    const PATH: &'static str = "/educational-insights";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        with_lang(Self::PATH, &self.lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_parameters_are_spliced() {
        assert_eq!(DeleteReadingRequest { id: 12 }.path(), "/readings/12");
        assert_eq!(DoctorPatientsRequest { doctor_id: 3 }.path(), "/doctors/3/patients");
        assert_eq!(
            GlucoseAlertsRequest { lang: "sw".into() }.path(),
            "/glucose-alerts?lang=sw"
        );
    }

    #[test]
    fn path_fields_stay_out_of_the_body() {
        let req = UpdateMedicationRequest {
            id: 4,
            patch: MedicationPatch {
                status: Some(crate::MedicationStatus::Missed),
                ..Default::default()
            },
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "missed" }));
    }

    #[test]
    fn public_endpoints_skip_auth() {
        assert!(!LoginRequest::AUTHENTICATED);
        assert!(!ListDoctorsRequest::AUTHENTICATED);
        assert!(ListReadingsRequest::AUTHENTICATED);
    }
}
