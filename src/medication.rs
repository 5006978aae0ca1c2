use chrono::{NaiveTime, Timelike};
use sukari_shared::{Medication, MedicationPatch, MedicationStatus};

use crate::api::CareApi;
use crate::error::ClientResult;
use crate::request::HttpClient;

fn minutes_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// 到点（含当前分钟）仍未服用的用药；时间无法解析的跳过
pub fn overdue_pending(meds: &[Medication], now: NaiveTime) -> Vec<&Medication> {
    let now = minutes_of_day(now);
    meds.iter()
        .filter(|m| m.effective_status() == MedicationStatus::Pending)
        .filter(|m| m.scheduled_time().is_some_and(|t| minutes_of_day(t) <= now))
        .collect()
}

/// 把所有到点未服用的用药标记为漏服，返回更新后的记录
///
/// 逐条更新，遇到第一个失败即停止。
pub async fn mark_overdue_missed<C: HttpClient>(
    api: &CareApi<C>,
    token: &str,
    meds: &[Medication],
    now: NaiveTime,
) -> ClientResult<Vec<Medication>> {
    let mut updated = Vec::new();
    for med in overdue_pending(meds, now) {
        let patch = MedicationPatch {
            status: Some(MedicationStatus::Missed),
            ..Default::default()
        };
        let med = api
            .update_medication(token, med.id, patch)
            .await
            .map_err(|e| e.in_op_with("medication.mark_overdue", med.id.to_string()))?;
        updated.push(med);
    }
    if !updated.is_empty() {
        log::info!("Marked {} overdue medication(s) as missed", updated.len());
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::request::{HttpMethod, MockHttpClient};
    use serde_json::json;

    fn med(id: i64, time: &str, status: Option<MedicationStatus>) -> Medication {
        Medication {
            id,
            name: format!("med-{}", id),
            dose: "500mg".into(),
            time: Some(time.into()),
            status,
            ..Default::default()
        }
    }

    #[test]
    fn only_pending_and_due() {
        let meds = vec![
            med(1, "08:00", None),
            med(2, "08:00", Some(MedicationStatus::Taken)),
            med(3, "12:30", Some(MedicationStatus::Pending)),
            med(4, "12:31:00", None),
            med(5, "later", None),
        ];
        let now = NaiveTime::from_hms_opt(12, 30, 45).unwrap();
        let ids: Vec<i64> = overdue_pending(&meds, now).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn marks_each_overdue_medication() {
        let config = ClientConfig {
            api_base_url: "http://api.test".into(),
            ..Default::default()
        };
        let api = CareApi::new(MockHttpClient::new(), &config);
        api.client().mock_response(
            HttpMethod::Patch,
            "http://api.test/medications/1",
            200,
            json!({ "id": 1, "name": "Metformin", "dose": "500mg", "time": "08:00", "status": "missed" }),
        );

        let meds = vec![med(1, "08:00", None), med(2, "23:00", None)];
        let now = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let updated = mark_overdue_missed(&api, "tok", &meds, now).await.unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].effective_status(), MedicationStatus::Missed);
        let body = api.client().last().unwrap().body.unwrap();
        assert_eq!(body, r#"{"status":"missed"}"#);
    }
}
