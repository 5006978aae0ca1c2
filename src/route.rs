//! 路由定义 - 领域模型
//!
//! 纯业务逻辑，不依赖 DOM。定义全部页面及其访问条件。

use std::fmt::Display;

/// 进入某个页面前必须完成的引导步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Requirements {
    pub profile: bool,
    pub reading: bool,
    pub education: bool,
}

impl Requirements {
    pub const NONE: Self = Self {
        profile: false,
        reading: false,
        education: false,
    };

    pub const ALL: Self = Self {
        profile: true,
        reading: true,
        education: true,
    };

    pub fn any(&self) -> bool {
        self.profile || self.reading || self.education
    }
}

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Login,
    Signup,
    ForgotPassword,
    Dashboard,
    Profile,
    Readings,
    Education,
    Onboarding,
    Medications,
    Reminders,
    DoctorMessages,
    FoodInsights,
    SmartAlerts,
    Gamification,
    NotFound,
}

impl Route {
    /// 将 URL path 解析为路由枚举（忽略查询串和末尾斜杠）
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("/");
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        match path {
            "/" => Self::Home,
            "/login" => Self::Login,
            "/signup" => Self::Signup,
            "/forgot-password" => Self::ForgotPassword,
            "/dashboard" => Self::Dashboard,
            "/profile" => Self::Profile,
            "/readings" => Self::Readings,
            "/education" => Self::Education,
            "/onboarding" => Self::Onboarding,
            "/medications" => Self::Medications,
            "/reminders" => Self::Reminders,
            "/doctor-messages" => Self::DoctorMessages,
            "/food-insights" => Self::FoodInsights,
            "/smart-alerts" => Self::SmartAlerts,
            "/gamification" => Self::Gamification,
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::ForgotPassword => "/forgot-password",
            Self::Dashboard => "/dashboard",
            Self::Profile => "/profile",
            Self::Readings => "/readings",
            Self::Education => "/education",
            Self::Onboarding => "/onboarding",
            Self::Medications => "/medications",
            Self::Reminders => "/reminders",
            Self::DoctorMessages => "/doctor-messages",
            Self::FoodInsights => "/food-insights",
            Self::SmartAlerts => "/smart-alerts",
            Self::Gamification => "/gamification",
            Self::NotFound => "/404",
        }
    }

    /// 是否需要登录
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Self::Home | Self::Login | Self::Signup | Self::ForgotPassword | Self::NotFound
        )
    }

    /// 已登录用户是否应该离开此路由
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Signup)
    }

    /// 进入前需要完成的引导步骤
    pub fn requirements(&self) -> Requirements {
        match self {
            Self::Dashboard => Requirements::ALL,
            Self::Readings => Requirements {
                profile: true,
                ..Requirements::NONE
            },
            Self::Education => Requirements {
                profile: true,
                reading: true,
                education: false,
            },
            _ => Requirements::NONE,
        }
    }

    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip_for_every_page() {
        let all = [
            Route::Home,
            Route::Login,
            Route::Signup,
            Route::ForgotPassword,
            Route::Dashboard,
            Route::Profile,
            Route::Readings,
            Route::Education,
            Route::Onboarding,
            Route::Medications,
            Route::Reminders,
            Route::DoctorMessages,
            Route::FoodInsights,
            Route::SmartAlerts,
            Route::Gamification,
        ];
        for route in all {
            assert_eq!(Route::from_path(route.to_path()), route);
        }
    }

    #[test]
    fn query_and_trailing_slash_are_ignored() {
        assert_eq!(Route::from_path("/readings/"), Route::Readings);
        assert_eq!(Route::from_path("/dashboard?tab=bmi"), Route::Dashboard);
        assert_eq!(Route::from_path(""), Route::Home);
        assert_eq!(Route::from_path("/nope"), Route::NotFound);
    }

    #[test]
    fn public_pages() {
        assert!(!Route::Home.requires_auth());
        assert!(!Route::ForgotPassword.requires_auth());
        assert!(Route::Onboarding.requires_auth());
        assert!(!Route::Onboarding.requirements().any());
    }
}
