//! 表单校验
//!
//! 每个表单在发起网络请求前先在本地校验，失败时逐字段给出提示；
//! 校验通过则直接产出对应的请求体。

use chrono::NaiveDate;
use sukari_shared::reading::{CONTEXT_POST_MEAL, CONTEXT_PRE_MEAL};
use sukari_shared::{
    DATE_FORMAT, DIABETES_TYPES, LoginRequest, MedicationStatus, NewDoctorMessage, NewMedication,
    NewReading, NewReminder, ProfilePatch, SignupRequest, User, parse_clock,
};

pub const MSG_REQUIRED: &str = "Required";
pub const MSG_INVALID_EMAIL: &str = "Invalid email";
pub const MSG_PASSWORD_SHORT: &str = "Min 6 characters";

pub const REMINDER_TYPES: [&str; 3] = ["glucose", "medication", "hospital"];
pub const REMINDER_FREQUENCIES: [&str; 3] = ["daily", "weekly", "monthly"];

/// 逐字段的校验错误，保持字段出现顺序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同一字段只记录第一条
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.0.push((field, message.into()));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn first(&self) -> Option<(&'static str, &str)> {
        self.0.first().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn summary(&self) -> String {
        self.iter()
            .map(|(f, m)| format!("{}: {}", f, m))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

// =========================================================
// 通用规则
// =========================================================

fn required(errors: &mut FieldErrors, field: &'static str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, MSG_REQUIRED);
        false
    } else {
        true
    }
}

pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

fn email(errors: &mut FieldErrors, value: &str) {
    if required(errors, "email", value) && !is_valid_email(value) {
        errors.add("email", MSG_INVALID_EMAIL);
    }
}

fn password(errors: &mut FieldErrors, value: &str) {
    if required(errors, "password", value) && value.chars().count() < 6 {
        errors.add("password", MSG_PASSWORD_SHORT);
    }
}

fn clock(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if required(errors, field, value) && parse_clock(value.trim()).is_none() {
        errors.add(field, "Use HH:MM");
    }
}

/// 可选数值：空串为 None，无法解析时记录错误
fn optional_number(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    range: (f64, f64),
    messages: (&str, &str),
) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<f64>() {
        Ok(n) if n < range.0 => {
            errors.add(field, messages.0);
            None
        }
        Ok(n) if n > range.1 => {
            errors.add(field, messages.1);
            None
        }
        Ok(n) => Some(n),
        Err(_) => {
            errors.add(field, "Must be a number");
            None
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

// =========================================================
// 表单
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        email(&mut errors, &self.email);
        password(&mut errors, &self.password);
        errors.finish(|| LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub diabetes_type: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<SignupRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        if required(&mut errors, "name", &self.name) && self.name.trim().chars().count() < 2 {
            errors.add("name", "Too short");
        }
        email(&mut errors, &self.email);
        password(&mut errors, &self.password);
        let diabetes_type = non_empty(&self.diabetes_type);
        if let Some(t) = &diabetes_type {
            if !DIABETES_TYPES.contains(&t.as_str()) {
                errors.add("diabetes_type", "Unknown diabetes type");
            }
        }
        errors.finish(|| SignupRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            diabetes_type,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl ForgotPasswordForm {
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::new();
        email(&mut errors, &self.email);
        errors.finish(|| self.email.trim().to_string())
    }
}

/// 档案表单：空输入提交为 null（显式清空）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub diabetes_type: String,
    pub height_cm: String,
    pub weight_kg: String,
    pub doctor_id: String,
}

impl ProfileForm {
    /// 用当前用户预填；未登录时为空表单
    pub fn from_user(user: Option<&User>) -> Self {
        let Some(user) = user else {
            return Self::default();
        };
        Self {
            diabetes_type: user.diabetes_type.clone().unwrap_or_default(),
            height_cm: user.height_cm.map(|v| v.to_string()).unwrap_or_default(),
            weight_kg: user.weight_kg.map(|v| v.to_string()).unwrap_or_default(),
            doctor_id: user.doctor_id.map(|v| v.to_string()).unwrap_or_default(),
        }
    }

    /// 完整档案：四个字段都写入，空值即清空
    pub fn validate(&self) -> Result<ProfilePatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let (height, weight) = self.measurements(&mut errors);
        let diabetes_type = non_empty(&self.diabetes_type);
        if let Some(t) = &diabetes_type {
            if !DIABETES_TYPES.contains(&t.as_str()) {
                errors.add("diabetes_type", "Unknown diabetes type");
            }
        }
        let doctor_id = match non_empty(&self.doctor_id) {
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("doctor_id", "Unknown doctor");
                    None
                }
            },
            None => None,
        };
        errors.finish(|| ProfilePatch {
            name: None,
            diabetes_type: Some(diabetes_type),
            height_cm: Some(height),
            weight_kg: Some(weight),
            doctor_id: Some(doctor_id),
        })
    }

    /// 只写身高体重，其余字段不出现在请求体里
    pub fn validate_measurements(&self) -> Result<ProfilePatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let (height, weight) = self.measurements(&mut errors);
        errors.finish(|| ProfilePatch {
            height_cm: Some(height),
            weight_kg: Some(weight),
            ..Default::default()
        })
    }

    fn measurements(&self, errors: &mut FieldErrors) -> (Option<f64>, Option<f64>) {
        let height = optional_number(errors, "height_cm", &self.height_cm, (50.0, 250.0), ("Too short", "Too tall"));
        let weight = optional_number(errors, "weight_kg", &self.weight_kg, (20.0, 400.0), ("Too low", "Too high"));
        (height, weight)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingForm {
    pub value: String,
    pub date: String,
    pub time: String,
    pub context: String,
    pub notes: String,
}

impl ReadingForm {
    pub fn validate(&self) -> Result<NewReading, FieldErrors> {
        let mut errors = FieldErrors::new();
        let value = if required(&mut errors, "value", &self.value) {
            optional_number(&mut errors, "value", &self.value, (40.0, 500.0), ("Must be at least 40", "Must be at most 500"))
        } else {
            None
        };
        if required(&mut errors, "date", &self.date)
            && NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).is_err()
        {
            errors.add("date", "Use YYYY-MM-DD");
        }
        clock(&mut errors, "time", &self.time);
        let context = non_empty(&self.context);
        if let Some(c) = &context {
            if c != CONTEXT_PRE_MEAL && c != CONTEXT_POST_MEAL {
                errors.add("context", "Unknown meal context");
            }
        }
        errors.finish(|| NewReading {
            value: value.unwrap_or_default(),
            date: self.date.trim().to_string(),
            time: self.time.trim().to_string(),
            context,
            notes: non_empty(&self.notes),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicationForm {
    pub name: String,
    pub dose: String,
    pub time: String,
    pub status: String,
}

impl MedicationForm {
    pub fn validate(&self) -> Result<NewMedication, FieldErrors> {
        let mut errors = FieldErrors::new();
        required(&mut errors, "name", &self.name);
        required(&mut errors, "dose", &self.dose);
        clock(&mut errors, "time", &self.time);
        let status = match non_empty(&self.status) {
            Some(s) => match MedicationStatus::parse(&s) {
                Some(status) => Some(status),
                None => {
                    errors.add("status", "Unknown status");
                    None
                }
            },
            None => None,
        };
        errors.finish(|| NewMedication {
            name: self.name.trim().to_string(),
            dose: self.dose.trim().to_string(),
            time: self.time.trim().to_string(),
            status,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderForm {
    pub reminder_type: String,
    pub title: String,
    pub message: String,
    pub scheduled_time: String,
    pub frequency: String,
}

impl Default for ReminderForm {
    fn default() -> Self {
        Self {
            reminder_type: REMINDER_TYPES[0].to_string(),
            title: String::new(),
            message: String::new(),
            scheduled_time: String::new(),
            frequency: REMINDER_FREQUENCIES[0].to_string(),
        }
    }
}

impl ReminderForm {
    pub fn validate(&self) -> Result<NewReminder, FieldErrors> {
        let mut errors = FieldErrors::new();
        required(&mut errors, "title", &self.title);
        clock(&mut errors, "scheduled_time", &self.scheduled_time);
        if !REMINDER_TYPES.contains(&self.reminder_type.as_str()) {
            errors.add("reminder_type", "Unknown reminder type");
        }
        if !REMINDER_FREQUENCIES.contains(&self.frequency.as_str()) {
            errors.add("frequency", "Unknown frequency");
        }
        errors.finish(|| NewReminder {
            reminder_type: self.reminder_type.clone(),
            title: self.title.trim().to_string(),
            message: non_empty(&self.message),
            scheduled_time: self.scheduled_time.trim().to_string(),
            frequency: self.frequency.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageForm {
    pub message: String,
    pub is_emergency: bool,
}

impl MessageForm {
    pub fn validate(&self) -> Result<NewDoctorMessage, FieldErrors> {
        let mut errors = FieldErrors::new();
        let len = self.message.trim().chars().count();
        if required(&mut errors, "message", &self.message) {
            if len < 3 {
                errors.add("message", "Too short");
            } else if len > 500 {
                errors.add("message", "Too long");
            }
        }
        errors.finish(|| NewDoctorMessage {
            message: self.message.trim().to_string(),
            is_emergency: self.is_emergency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_rules() {
        let errors = LoginForm {
            email: "not-an-email".into(),
            password: "123".into(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.get("email"), Some(MSG_INVALID_EMAIL));
        assert_eq!(errors.get("password"), Some(MSG_PASSWORD_SHORT));

        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.first(), Some(("email", MSG_REQUIRED)));
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("amina@example.co.ke"));
        assert!(!is_valid_email("amina@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a b@example.com"));
    }

    #[test]
    fn profile_blank_fields_become_explicit_nulls() {
        let patch = ProfileForm {
            height_cm: "170".into(),
            weight_kg: "".into(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(patch.height_cm, Some(Some(170.0)));
        assert_eq!(patch.weight_kg, Some(None));
        assert_eq!(patch.doctor_id, Some(None));
    }

    #[test]
    fn measurements_leave_other_fields_out() {
        let form = ProfileForm::from_user(Some(&User {
            diabetes_type: Some("type2".into()),
            doctor_id: Some(4),
            ..Default::default()
        }));
        let patch = ProfileForm {
            height_cm: "170".into(),
            weight_kg: "65".into(),
            ..form
        }
        .validate_measurements()
        .unwrap();
        assert_eq!(patch.diabetes_type, None);
        assert_eq!(patch.doctor_id, None);
        let body = serde_json::to_value(&patch).unwrap();
        assert_eq!(body, serde_json::json!({ "height_cm": 170.0, "weight_kg": 65.0 }));
    }

    #[test]
    fn prefill_from_user() {
        let form = ProfileForm::from_user(Some(&User {
            diabetes_type: Some("type1".into()),
            height_cm: Some(170.0),
            doctor_id: Some(4),
            ..Default::default()
        }));
        assert_eq!(form.diabetes_type, "type1");
        assert_eq!(form.height_cm, "170");
        assert_eq!(form.weight_kg, "");
        assert_eq!(form.doctor_id, "4");
        assert_eq!(ProfileForm::from_user(None), ProfileForm::default());
    }

    #[test]
    fn profile_ranges() {
        let errors = ProfileForm {
            height_cm: "30".into(),
            weight_kg: "500".into(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.get("height_cm"), Some("Too short"));
        assert_eq!(errors.get("weight_kg"), Some("Too high"));
    }

    #[test]
    fn reading_rules() {
        let ok = ReadingForm {
            value: "110".into(),
            date: "2024-03-01".into(),
            time: "07:45".into(),
            context: "pre_meal".into(),
            notes: " ".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.value, 110.0);
        assert_eq!(ok.context.as_deref(), Some("pre_meal"));
        assert!(ok.notes.is_none());

        let errors = ReadingForm {
            value: "20".into(),
            date: "01/03/2024".into(),
            time: "".into(),
            context: "snack".into(),
            notes: String::new(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("time"), Some(MSG_REQUIRED));
    }

    #[test]
    fn message_length() {
        let short = MessageForm {
            message: "hi".into(),
            is_emergency: false,
        };
        assert_eq!(short.validate().unwrap_err().get("message"), Some("Too short"));

        let long = MessageForm {
            message: "x".repeat(501),
            is_emergency: true,
        };
        assert_eq!(long.validate().unwrap_err().get("message"), Some("Too long"));
    }

    #[test]
    fn reminder_defaults_are_valid_once_filled() {
        let form = ReminderForm {
            title: "Check sugar".into(),
            scheduled_time: "08:00".into(),
            ..Default::default()
        };
        let reminder = form.validate().unwrap();
        assert_eq!(reminder.reminder_type, "glucose");
        assert_eq!(reminder.frequency, "daily");
    }
}
