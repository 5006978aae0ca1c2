//! 引导向导
//!
//! 线性流程：欢迎 → 档案 → 首次读数 → 用药 → 提醒 → 完成。
//! 只有在"完成"步骤确认时才写入 `onboarding_complete`。

use crate::route::Route;
use crate::session::SessionManager;
use crate::storage::KeyValueStore;

pub mod actions;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Welcome,
    Profile,
    GlucoseReading,
    Medication,
    Alerts,
    Done,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::Welcome,
        WizardStep::Profile,
        WizardStep::GlucoseReading,
        WizardStep::Medication,
        WizardStep::Alerts,
        WizardStep::Done,
    ];

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL
            .get(self.index() + 1)
            .copied()
            .unwrap_or(WizardStep::Done)
    }

    pub fn prev(&self) -> Self {
        match self.index() {
            0 => WizardStep::Welcome,
            i => Self::ALL[i - 1],
        }
    }

    /// 该步骤是否带有写操作
    pub fn has_action(&self) -> bool {
        matches!(
            self,
            WizardStep::Profile | WizardStep::GlucoseReading | WizardStep::Medication
        )
    }

    pub fn is_skippable(&self) -> bool {
        !matches!(self, WizardStep::Welcome | WizardStep::Done)
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Welcome => "Welcome",
            WizardStep::Profile => "Health Profile",
            WizardStep::GlucoseReading => "First Glucose Reading",
            WizardStep::Medication => "Medication",
            WizardStep::Alerts => "Smart Alerts",
            WizardStep::Done => "All set",
        }
    }
}

/// 进入向导页时的去向
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEntry {
    Start(OnboardingWizard),
    /// 已完成过引导
    Redirect(Route),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingWizard {
    step: WizardStep,
    busy: bool,
    error: Option<String>,
}

impl Default for OnboardingWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Welcome,
            busy: false,
            error: None,
        }
    }

    pub fn enter<S: KeyValueStore>(session: &SessionManager<S>) -> WizardEntry {
        if session.onboarding_complete() {
            WizardEntry::Redirect(Route::Dashboard)
        } else {
            WizardEntry::Start(Self::new())
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    fn advance(&mut self) {
        self.error = None;
        self.step = self.step.next();
    }

    /// "继续"：前进一步，不执行写操作
    pub fn proceed(&mut self) {
        if self.busy || self.step == WizardStep::Done {
            return;
        }
        self.advance();
    }

    /// "稍后"：跳过当前步骤的写操作
    pub fn skip(&mut self) {
        if self.busy || !self.step.is_skippable() {
            return;
        }
        log::debug!("Onboarding step skipped: {:?}", self.step);
        self.advance();
    }

    pub fn back(&mut self) {
        if self.busy {
            return;
        }
        self.error = None;
        self.step = self.step.prev();
    }

    /// 开始执行当前步骤的写操作；已有操作进行中或该步骤无操作时返回 false
    pub fn begin_action(&mut self) -> bool {
        if self.busy || !self.step.has_action() {
            return false;
        }
        self.busy = true;
        self.error = None;
        true
    }

    /// 写操作结束：成功则前进，失败则留在当前步骤并显示错误
    pub fn finish_action(&mut self, result: Result<(), String>) {
        self.busy = false;
        match result {
            Ok(()) => self.advance(),
            Err(message) => {
                log::warn!("Onboarding step {:?} failed: {}", self.step, message);
                self.error = Some(message);
            }
        }
    }

    /// 在"完成"步骤确认：写入完成标记并前往面板
    pub fn complete<S: KeyValueStore>(&mut self, session: &mut SessionManager<S>) -> Option<Route> {
        if self.step != WizardStep::Done || self.busy {
            return None;
        }
        session.mark_onboarding_complete();
        log::info!("Onboarding complete");
        Some(Route::Dashboard)
    }
}
