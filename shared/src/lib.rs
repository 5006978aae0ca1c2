use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

pub mod insights;
pub mod protocol;
pub mod reading;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// 后端约定的日期与时间格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

pub const DIABETES_TYPES: [&str; 4] = ["type1", "type2", "gestational", "prediabetes"];

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 用户档案
///
/// 后端是唯一可信来源：每次档案变更成功后整体替换。
/// 所有医疗字段均可缺省，解码时缺失字段取默认值。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub diabetes_type: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub bmi: Option<f64>,
    pub bmi_category: Option<String>,
    pub doctor_id: Option<i64>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub last_hospital_visit: Option<String>,
    pub created_at: Option<String>,
}

impl User {
    /// 身高与体重均已填写（且非零）时档案才算完整
    pub fn is_profile_complete(&self) -> bool {
        let present = |v: Option<f64>| v.is_some_and(|x| x != 0.0);
        present(self.height_cm) && present(self.weight_kg)
    }
}

/// 个性化建议
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Advice {
    pub nutrition: Vec<String>,
    pub exercise: Vec<String>,
    pub medication: Vec<String>,
    pub bmi_category: Option<String>,
}

impl Advice {
    pub fn is_empty(&self) -> bool {
        self.nutrition.is_empty()
            && self.exercise.is_empty()
            && self.medication.is_empty()
            && self.bmi_category.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diabetes_type: Option<String>,
}

/// `/login` 与 `/signup` 的成功响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
    #[serde(default)]
    pub education: Option<Vec<String>>,
    #[serde(default)]
    pub advice: Option<Advice>,
}

/// 档案类响应：用户字段平铺，附带可选的 education/advice
///
/// 用于 `/check_session`、`PATCH /me`、`PUT /profile/enhanced`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub education: Option<Vec<String>>,
    #[serde(default)]
    pub advice: Option<Advice>,
}

/// `PATCH /me` 请求体
///
/// 外层 `None` 表示不修改该字段；`Some(None)` 表示显式清空。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diabetes_type: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<Option<i64>>,
}

/// `PUT /profile/enhanced` 请求体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnhancedProfile {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub last_hospital_visit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bmi {
    pub bmi: f64,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BmiSnapshot {
    pub id: i64,
    pub bmi: Option<f64>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub created_at: Option<String>,
}

// ---------------------------------------------------------
// 血糖读数
// ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Reading {
    pub id: i64,
    pub value: f64,
    pub date: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
    pub context: Option<String>,
    pub glucose_status: Option<String>,
    pub is_flagged: bool,
    pub created_at: Option<String>,
    pub user_id: Option<i64>,
}

impl Reading {
    /// 组合 date 与 time 为时间点；任一字段无法解析时返回 None
    pub fn taken_at(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(self.date.as_deref()?, DATE_FORMAT).ok()?;
        let time = parse_clock(self.time.as_deref()?)?;
        Some(date.and_time(time))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReading {
    pub value: f64,
    pub date: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// `POST /readings` 响应：读数本身，带有上下文时附带评估
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedReading {
    #[serde(flatten)]
    pub reading: Reading,
    #[serde(default)]
    pub evaluation: Option<reading::Evaluation>,
}

// ---------------------------------------------------------
// 用药
// ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicationStatus {
    #[default]
    Pending,
    Taken,
    Missed,
}

impl MedicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicationStatus::Pending => "pending",
            MedicationStatus::Taken => "taken",
            MedicationStatus::Missed => "missed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "taken" => Some(Self::Taken),
            "missed" => Some(Self::Missed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Medication {
    pub id: i64,
    pub name: String,
    pub dose: String,
    pub time: Option<String>,
    pub status: Option<MedicationStatus>,
    pub created_at: Option<String>,
    pub user_id: Option<i64>,
}

impl Medication {
    /// 状态缺省视为 pending
    pub fn effective_status(&self) -> MedicationStatus {
        self.status.unwrap_or_default()
    }

    pub fn scheduled_time(&self) -> Option<NaiveTime> {
        parse_clock(self.time.as_deref()?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMedication {
    pub name: String,
    pub dose: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MedicationStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MedicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose: Option<String>,
}

// ---------------------------------------------------------
// 提醒
// ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Reminder {
    pub id: i64,
    pub user_id: Option<i64>,
    pub reminder_type: String,
    pub title: String,
    pub message: Option<String>,
    pub scheduled_time: Option<String>,
    pub is_active: bool,
    pub frequency: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReminder {
    /// glucose / hospital / medication
    pub reminder_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub scheduled_time: String,
    /// daily / weekly / monthly
    pub frequency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReminderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReminderList {
    #[serde(default)]
    pub reminders: Vec<Reminder>,
}

// ---------------------------------------------------------
// 医生与消息
// ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorPatients {
    pub doctor: Doctor,
    pub patients: Vec<User>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorMessage {
    pub id: i64,
    pub user_id: Option<i64>,
    pub doctor_id: Option<i64>,
    /// user / doctor
    pub sender_type: String,
    pub message: String,
    pub is_read: bool,
    pub is_emergency: bool,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDoctorMessage {
    pub message: String,
    pub is_emergency: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorMessageList {
    #[serde(default)]
    pub messages: Vec<DoctorMessage>,
}

// ---------------------------------------------------------
// 面板
// ---------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSummary {
    pub latest_reading: Option<Reading>,
    pub recent_readings: Vec<Reading>,
    pub medications: Vec<Medication>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageResponse {
    pub message: Option<String>,
}

/// 后端错误体 `{ "error": "..." }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub error: Option<String>,
}

/// 解析 `HH:MM` 或 `HH:MM:SS`（后端返回 isoformat 时带秒）
pub fn parse_clock(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_complete_requires_height_and_weight() {
        let mut user = User::default();
        assert!(!user.is_profile_complete());
        user.height_cm = Some(170.0);
        assert!(!user.is_profile_complete());
        user.weight_kg = Some(65.0);
        assert!(user.is_profile_complete());
        user.weight_kg = Some(0.0);
        assert!(!user.is_profile_complete());
    }

    #[test]
    fn profile_response_splits_user_and_extras() {
        let body = r#"{
            "id": 7, "name": "Wanjiru", "email": "w@example.com",
            "height_cm": null, "weight_kg": 61.5,
            "education": ["tip"],
            "advice": {"nutrition": ["eat greens"], "bmi_category": null}
        }"#;
        let resp: ProfileResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.user.id, 7);
        assert_eq!(resp.user.weight_kg, Some(61.5));
        assert_eq!(resp.education, Some(vec!["tip".to_string()]));
        assert_eq!(resp.advice.unwrap().nutrition, vec!["eat greens".to_string()]);
    }

    #[test]
    fn profile_patch_omits_untouched_fields_and_nulls_cleared_ones() {
        let patch = ProfilePatch {
            height_cm: Some(Some(170.0)),
            doctor_id: Some(None),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "height_cm": 170.0, "doctor_id": null }));
    }

    #[test]
    fn reading_time_accepts_seconds() {
        let reading = Reading {
            date: Some("2024-03-01".into()),
            time: Some("07:30:00".into()),
            ..Default::default()
        };
        let at = reading.taken_at().unwrap();
        assert_eq!(at.format("%Y-%m-%d %H:%M").to_string(), "2024-03-01 07:30");
    }
}
