//! 内容类接口的响应模型：食物、预测提醒、成长进度、教育洞察。
//!
//! 这些载荷由后端按语言生成，字段较松散，解码时一律给默认值。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 可能是单一字符串，也可能是按语言区分的对象
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Localized {
    Text(String),
    ByLanguage {
        #[serde(default)]
        en: String,
        #[serde(default)]
        sw: String,
    },
}

impl Localized {
    pub fn pick(&self, lang: &str) -> &str {
        match self {
            Localized::Text(s) => s,
            Localized::ByLanguage { en, sw } => {
                if lang == "sw" && !sw.is_empty() {
                    sw
                } else {
                    en
                }
            }
        }
    }
}

impl Default for Localized {
    fn default() -> Self {
        Localized::Text(String::new())
    }
}

// ---------------------------------------------------------
// 食物
// ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodInfo {
    pub name_en: String,
    pub name_sw: String,
    pub category: String,
    pub calories: f64,
    pub carbs: f64,
    pub fiber: f64,
    pub protein: f64,
    pub fat: f64,
    pub glycemic_index: Option<f64>,
    pub glucose_impact: String,
}

impl FoodInfo {
    pub fn display_name(&self, lang: &str) -> &str {
        if lang == "sw" && !self.name_sw.is_empty() {
            &self.name_sw
        } else {
            &self.name_en
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KenyanFoods {
    pub foods: BTreeMap<String, FoodInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodRecommendations {
    pub recommendations: Vec<String>,
    pub diabetes_friendly: Vec<String>,
    pub foods_to_limit: Vec<String>,
    pub diabetes_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodImpactRequest {
    pub food_name: String,
    pub language: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodImpactPrediction {
    pub food: String,
    pub glucose_impact: String,
    pub estimated_spike: f64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodImpact {
    pub prediction: Option<FoodImpactPrediction>,
}

// ---------------------------------------------------------
// 预测提醒
// ---------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlucoseAlert {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: String,
    pub title: Localized,
    pub message: Localized,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternsSummary {
    pub total_readings: u32,
    pub high_readings: u32,
    pub low_readings: u32,
    pub recent_trend: String,
    pub avg_pre_meal: Option<f64>,
    pub avg_post_meal: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlucoseAlerts {
    pub alerts: Vec<GlucoseAlert>,
    pub message: Option<String>,
    pub patterns_summary: Option<PatternsSummary>,
}

// ---------------------------------------------------------
// 成长进度
// ---------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Level {
    pub level: u32,
    pub title: Localized,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressStats {
    pub current_streak: u32,
    pub total_readings: u32,
    pub weekly_readings: u32,
    pub level: Level,
    pub total_points: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Badge {
    pub id: String,
    pub name: Localized,
    pub description: Localized,
    pub icon: Option<String>,
    pub points: u32,
    pub earned: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeStatus {
    pub completed: bool,
    pub progress: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyChallenge {
    pub id: String,
    pub name: Localized,
    pub description: Localized,
    pub points: u32,
    pub status: ChallengeStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProgress {
    pub progress: ProgressStats,
    pub badges: Vec<Badge>,
    pub daily_challenges: Vec<DailyChallenge>,
    pub available_badges: Vec<Badge>,
}

// ---------------------------------------------------------
// 教育洞察
// ---------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightTip {
    pub title: String,
    pub content: String,
    pub category: String,
    pub priority: String,
    pub local_relevance: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationalInsights {
    #[serde(alias = "tips")]
    pub insights: Vec<InsightTip>,
    pub summary: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localized_accepts_both_shapes() {
        let plain: Localized = serde_json::from_str(r#""Beginner""#).unwrap();
        assert_eq!(plain.pick("sw"), "Beginner");

        let both: Localized = serde_json::from_str(r#"{"en":"Beginner","sw":"Mwanzo"}"#).unwrap();
        assert_eq!(both.pick("sw"), "Mwanzo");
        assert_eq!(both.pick("en"), "Beginner");
    }

    #[test]
    fn alerts_tolerate_missing_summary() {
        let body = r#"{"alerts": [], "message": "Need more readings to generate predictions"}"#;
        let alerts: GlucoseAlerts = serde_json::from_str(body).unwrap();
        assert!(alerts.alerts.is_empty());
        assert!(alerts.patterns_summary.is_none());
    }
}
