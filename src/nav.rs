//! 导航栏可见性
//!
//! 与守卫使用同样的步骤顺序：档案 → 读数 → 教育 → 面板 → 次要功能。
//! 只决定显示哪些链接，从不触发跳转。

use crate::progress::{OnboardingProgress, ReadingCheck};
use crate::route::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLink {
    Page(Route),
    Logout,
}

impl NavLink {
    pub fn label(&self) -> &'static str {
        match self {
            NavLink::Logout => "Logout",
            NavLink::Page(route) => match route {
                Route::Home => "Home",
                Route::Login => "Login",
                Route::Signup => "Sign up",
                Route::Profile => "Profile",
                Route::Readings => "Readings",
                Route::Education => "Education",
                Route::Dashboard => "Dashboard",
                Route::Medications => "Medications",
                Route::Reminders => "Reminders",
                Route::DoctorMessages => "Doctor",
                Route::FoodInsights => "Food",
                Route::SmartAlerts => "Alerts",
                Route::Gamification => "Progress",
                Route::Onboarding => "Get started",
                Route::ForgotPassword => "Forgot password",
                Route::NotFound => "",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavInputs {
    pub is_authed: bool,
    pub profile_complete: bool,
    pub has_reading: ReadingCheck,
    pub education_done: bool,
}

impl NavInputs {
    pub fn new(is_authed: bool, progress: &OnboardingProgress) -> Self {
        Self {
            is_authed,
            profile_complete: progress.profile_complete,
            has_reading: progress.has_reading,
            education_done: progress.education_done,
        }
    }
}

const SECONDARY: [Route; 6] = [
    Route::Medications,
    Route::Reminders,
    Route::DoctorMessages,
    Route::FoodInsights,
    Route::SmartAlerts,
    Route::Gamification,
];

pub fn visible_links(inputs: NavInputs) -> Vec<NavLink> {
    if !inputs.is_authed {
        return vec![
            NavLink::Page(Route::Home),
            NavLink::Page(Route::Login),
            NavLink::Page(Route::Signup),
        ];
    }

    let mut links = vec![NavLink::Page(Route::Home), NavLink::Page(Route::Profile)];
    let readings = inputs.profile_complete;
    let education = readings && inputs.has_reading.is_present();
    let dashboard = education && inputs.education_done;

    if readings {
        links.push(NavLink::Page(Route::Readings));
    }
    if education {
        links.push(NavLink::Page(Route::Education));
    }
    if dashboard {
        links.push(NavLink::Page(Route::Dashboard));
        links.extend(SECONDARY.iter().copied().map(NavLink::Page));
    }
    links.push(NavLink::Logout);
    links
}

/// 首页 "Get started" 的去向：未登录去注册，引导未完成去向导
pub fn get_started(is_authed: bool, onboarding_complete: bool) -> NavLink {
    let route = match (is_authed, onboarding_complete) {
        (false, _) => Route::Signup,
        (true, false) => Route::Onboarding,
        (true, true) => Route::Dashboard,
    };
    NavLink::Page(route)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authed(profile: bool, reading: ReadingCheck, education: bool) -> NavInputs {
        NavInputs {
            is_authed: true,
            profile_complete: profile,
            has_reading: reading,
            education_done: education,
        }
    }

    fn pages(links: &[NavLink]) -> Vec<Route> {
        links
            .iter()
            .filter_map(|l| match l {
                NavLink::Page(r) => Some(*r),
                NavLink::Logout => None,
            })
            .collect()
    }

    #[test]
    fn signed_out_sees_entry_points_only() {
        let links = visible_links(NavInputs {
            is_authed: false,
            profile_complete: true,
            has_reading: ReadingCheck::Present,
            education_done: true,
        });
        assert_eq!(pages(&links), vec![Route::Home, Route::Login, Route::Signup]);
        assert!(!links.contains(&NavLink::Logout));
    }

    #[test]
    fn links_unlock_in_order() {
        let fresh = visible_links(authed(false, ReadingCheck::Unknown, false));
        assert_eq!(pages(&fresh), vec![Route::Home, Route::Profile]);
        assert_eq!(fresh.last(), Some(&NavLink::Logout));

        let profiled = visible_links(authed(true, ReadingCheck::Absent, false));
        assert_eq!(pages(&profiled), vec![Route::Home, Route::Profile, Route::Readings]);

        let pending = visible_links(authed(true, ReadingCheck::Unknown, true));
        assert!(!pages(&pending).contains(&Route::Education));

        let logged = visible_links(authed(true, ReadingCheck::Present, false));
        assert_eq!(pages(&logged).last(), Some(&Route::Education));

        let done = visible_links(authed(true, ReadingCheck::Present, true));
        let done = pages(&done);
        assert!(done.contains(&Route::Dashboard));
        assert!(done.contains(&Route::Gamification));
    }

    #[test]
    fn education_flag_alone_does_not_unlock_dashboard() {
        let links = visible_links(authed(true, ReadingCheck::Absent, true));
        assert!(!pages(&links).contains(&Route::Dashboard));
    }

    #[test]
    fn get_started_leads_into_the_wizard_until_it_is_done() {
        assert_eq!(get_started(false, true), NavLink::Page(Route::Signup));
        assert_eq!(get_started(true, false), NavLink::Page(Route::Onboarding));
        assert_eq!(get_started(true, false).label(), "Get started");
        assert_eq!(get_started(true, true), NavLink::Page(Route::Dashboard));
    }
}
