//! 向导各步骤的写操作
//!
//! 操作本身不持有会话；调用方在成功后把结果写回会话与进度服务。

use sukari_shared::{Bmi, CreatedReading, Medication, NewReminder, ProfilePatch, ProfileResponse};

use crate::api::CareApi;
use crate::error::{ClientError, ClientResult};
use crate::request::HttpClient;
use crate::validate::{MedicationForm, ProfileForm, ReadingForm};

pub const MSG_PROFILE_FAILED: &str = "Failed to save";
pub const MSG_READING_FAILED: &str = "Failed to save reading";
pub const MSG_MEDICATION_FAILED: &str = "Failed to save medication";

const COMPANION_REMINDER_TITLE: &str = "Check blood sugar";
const COMPANION_REMINDER_MESSAGE: &str = "Time for your daily glucose reading.";

#[derive(Debug, Clone)]
pub struct ProfileSaved {
    pub profile: ProfileResponse,
    /// BMI 请求失败时为 None，不影响保存结果
    pub bmi: Option<Bmi>,
}

/// 保存身高体重：`PATCH /me`，随后尽力获取 BMI
///
/// 请求体只含身高体重，注册时选的糖尿病类型与医生保持不变。
pub async fn save_profile<C: HttpClient>(
    api: &CareApi<C>,
    token: &str,
    form: &ProfileForm,
) -> ClientResult<ProfileSaved> {
    let patch = form.validate_measurements().map_err(ClientError::from)?;
    persist_profile(api, token, &patch).await
}

/// 档案页保存：四个字段整体写入
pub async fn save_profile_details<C: HttpClient>(
    api: &CareApi<C>,
    token: &str,
    form: &ProfileForm,
) -> ClientResult<ProfileSaved> {
    let patch = form.validate().map_err(ClientError::from)?;
    persist_profile(api, token, &patch).await
}

async fn persist_profile<C: HttpClient>(
    api: &CareApi<C>,
    token: &str,
    patch: &ProfilePatch,
) -> ClientResult<ProfileSaved> {
    let profile = api
        .update_profile(token, patch)
        .await
        .map_err(|e| e.in_op("profile.save"))?;

    let bmi = match api.bmi(token).await {
        Ok(bmi) => Some(bmi),
        Err(e) => {
            log::debug!("BMI unavailable after profile save: {}", e);
            None
        }
    };
    Ok(ProfileSaved { profile, bmi })
}

/// 记录首次读数
///
/// 创建成功后立即调用 `on_created`（调用方在此使进度缓存失效），
/// 再尽力创建一条每日血糖提醒；提醒失败只记录日志。
pub async fn log_first_reading<C, F>(
    api: &CareApi<C>,
    token: &str,
    form: &ReadingForm,
    on_created: F,
) -> ClientResult<CreatedReading>
where
    C: HttpClient,
    F: FnOnce(),
{
    let reading = form.validate().map_err(ClientError::from)?;
    let created = api
        .create_reading(token, &reading)
        .await
        .map_err(|e| e.in_op("wizard.log_first_reading"))?;
    on_created();

    let reminder = NewReminder {
        reminder_type: "glucose".to_string(),
        title: COMPANION_REMINDER_TITLE.to_string(),
        message: Some(COMPANION_REMINDER_MESSAGE.to_string()),
        scheduled_time: reading.time.clone(),
        frequency: "daily".to_string(),
    };
    if let Err(e) = api.create_reminder(token, &reminder).await {
        log::warn!("Companion reminder not created: {}", e);
    }

    Ok(created)
}

/// 可选步骤：添加一条用药
pub async fn add_medication<C: HttpClient>(
    api: &CareApi<C>,
    token: &str,
    form: &MedicationForm,
) -> ClientResult<Medication> {
    let med = form.validate().map_err(ClientError::from)?;
    api.create_medication(token, &med)
        .await
        .map_err(|e| e.in_op("wizard.add_medication"))
}
