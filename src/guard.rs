//! 路由守卫状态机
//!
//! 每次求值都从当前会话与进度重新推导，不依赖路由器，可直接单测。

use crate::progress::{OnboardingProgress, ReadingCheck};
use crate::route::{Requirements, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// 读数请求尚未返回，显示加载状态而不是提前决定
    Checking,
    Redirect(Route),
    /// 终态：渲染页面
    Allowed,
}

impl GuardState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GuardState::Checking)
    }
}

/// 引导步骤检查，按 档案 → 读数 → 教育 的顺序，第一个未满足的生效
pub fn evaluate(
    current: Route,
    requirements: Requirements,
    progress: &OnboardingProgress,
) -> GuardState {
    let target = if requirements.profile && !progress.profile_complete {
        Some(Route::Profile)
    } else if requirements.reading && progress.has_reading != ReadingCheck::Present {
        match progress.has_reading {
            ReadingCheck::Unknown => return GuardState::Checking,
            _ => Some(Route::Readings),
        }
    } else if requirements.education && !progress.education_done {
        Some(Route::Education)
    } else {
        None
    };

    match target {
        // 已在目标页面时不再跳转
        Some(route) if route != current => GuardState::Redirect(route),
        _ => GuardState::Allowed,
    }
}

/// 登录检查：未登录访问私有页面去登录页，已登录访问登录/注册页去面板
pub fn check_auth(route: Route, is_authed: bool) -> Option<Route> {
    if route.requires_auth() && !is_authed {
        Some(Route::auth_failure_redirect())
    } else if route.should_redirect_when_authenticated() && is_authed {
        Some(Route::auth_success_redirect())
    } else {
        None
    }
}

/// 完整的进入判定：先登录检查，再按路由声明的步骤检查
pub fn decide(route: Route, is_authed: bool, progress: &OnboardingProgress) -> GuardState {
    if let Some(redirect) = check_auth(route, is_authed) {
        return GuardState::Redirect(redirect);
    }
    let requirements = route.requirements();
    if !is_authed || !requirements.any() {
        return GuardState::Allowed;
    }
    let state = evaluate(route, requirements, progress);
    if let GuardState::Redirect(target) = state {
        log::info!("Guard redirect {} -> {}", route, target);
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(profile: bool, reading: ReadingCheck, education: bool) -> OnboardingProgress {
        OnboardingProgress {
            profile_complete: profile,
            has_reading: reading,
            education_done: education,
        }
    }

    #[test]
    fn incomplete_profile_wins_regardless_of_other_requirements() {
        let cases = [
            Requirements { profile: true, reading: false, education: false },
            Requirements { profile: true, reading: true, education: false },
            Requirements { profile: true, reading: false, education: true },
            Requirements::ALL,
        ];
        for requirements in cases {
            for reading in [ReadingCheck::Unknown, ReadingCheck::Present, ReadingCheck::Absent] {
                for education in [false, true] {
                    assert_eq!(
                        evaluate(Route::Dashboard, requirements, &progress(false, reading, education)),
                        GuardState::Redirect(Route::Profile)
                    );
                }
            }
        }
    }

    #[test]
    fn all_satisfied_renders() {
        let state = evaluate(
            Route::Dashboard,
            Requirements::ALL,
            &progress(true, ReadingCheck::Present, true),
        );
        assert_eq!(state, GuardState::Allowed);
    }

    #[test]
    fn unresolved_reading_keeps_checking() {
        let state = evaluate(
            Route::Dashboard,
            Requirements::ALL,
            &progress(true, ReadingCheck::Unknown, true),
        );
        assert_eq!(state, GuardState::Checking);
        assert!(!state.is_terminal());
    }

    #[test]
    fn reading_then_education() {
        assert_eq!(
            evaluate(Route::Dashboard, Requirements::ALL, &progress(true, ReadingCheck::Absent, true)),
            GuardState::Redirect(Route::Readings)
        );
        assert_eq!(
            evaluate(Route::Dashboard, Requirements::ALL, &progress(true, ReadingCheck::Present, false)),
            GuardState::Redirect(Route::Education)
        );
    }

    #[test]
    fn no_redirect_to_the_current_route() {
        let requirements = Requirements { profile: true, ..Requirements::NONE };
        assert_eq!(
            evaluate(Route::Profile, requirements, &progress(false, ReadingCheck::Unknown, false)),
            GuardState::Allowed
        );
    }

    #[test]
    fn auth_gate() {
        let p = progress(true, ReadingCheck::Present, true);
        assert_eq!(decide(Route::Readings, false, &p), GuardState::Redirect(Route::Login));
        assert_eq!(decide(Route::Login, true, &p), GuardState::Redirect(Route::Dashboard));
        assert_eq!(decide(Route::Home, false, &p), GuardState::Allowed);
        assert_eq!(decide(Route::Medications, true, &progress(false, ReadingCheck::Absent, false)), GuardState::Allowed);
    }

    #[test]
    fn route_table_drives_decide() {
        let fresh = progress(true, ReadingCheck::Absent, false);
        assert_eq!(decide(Route::Readings, true, &fresh), GuardState::Allowed);
        assert_eq!(decide(Route::Education, true, &fresh), GuardState::Redirect(Route::Readings));
        assert_eq!(decide(Route::Dashboard, true, &fresh), GuardState::Redirect(Route::Readings));
    }
}
