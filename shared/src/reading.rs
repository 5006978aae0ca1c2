//! 血糖评估
//!
//! 与后端 `POST /readings` 返回的 `evaluation` 使用相同规则，
//! 供客户端在提交前即时展示。

use serde::{Deserialize, Serialize};

pub const CONTEXT_PRE_MEAL: &str = "pre_meal";
pub const CONTEXT_POST_MEAL: &str = "post_meal";

pub const TIPS_NORMAL: [&str; 3] = [
    "Maintain balanced meals with non-starchy veggies, lean protein, and healthy fats.",
    "Stay hydrated and keep up light daily activity.",
    "Aim for consistent meal times and portion control.",
];

pub const TIPS_HIGH: [&str; 4] = [
    "Take a 15–30 minute walk and hydrate with water.",
    "Reduce refined carbohydrates; choose low-GI, high-fiber foods.",
    "Include lean proteins and healthy fats to slow glucose spikes.",
    "Discuss supplements with your doctor (e.g., cinnamon, berberine).",
];

pub const TIPS_LOW: [&str; 1] =
    ["Consider a small balanced snack and consult your clinician if frequent."];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlucoseStatus {
    Low,
    Normal,
    High,
    Unknown,
}

impl GlucoseStatus {
    /// 餐前 80–130 正常；餐后（或未标注）低于 180 正常
    pub fn evaluate(value: f64, context: Option<&str>) -> Self {
        match context {
            Some(CONTEXT_PRE_MEAL) => {
                if value < 80.0 {
                    Self::Low
                } else if value <= 130.0 {
                    Self::Normal
                } else {
                    Self::High
                }
            }
            _ => {
                if value < 180.0 {
                    Self::Normal
                } else {
                    Self::High
                }
            }
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "yellow",
            Self::Normal => "green",
            Self::High => "red",
            Self::Unknown => "gray",
        }
    }

    pub fn suggestions(&self) -> &'static [&'static str] {
        match self {
            Self::Low => &TIPS_LOW,
            Self::Normal => &TIPS_NORMAL,
            Self::High => &TIPS_HIGH,
            Self::Unknown => &[],
        }
    }
}

/// 服务端评估结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub status: GlucoseStatus,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl Evaluation {
    pub fn local(value: f64, context: Option<&str>) -> Self {
        let status = GlucoseStatus::evaluate(value, context);
        Self {
            status,
            color: Some(status.color().to_string()),
            suggestions: status.suggestions().iter().map(|s| s.to_string()).collect(),
        }
    }
}
