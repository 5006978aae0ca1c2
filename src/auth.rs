//! 登录、注册与找回密码的提交流程
//!
//! 校验在本地完成，失败不发请求；后端错误的 `error` 字段原样返回给表单。
//! 成功后由调用方把响应交给 `SessionManager::login` / `signup`。

use sukari_shared::{AuthResponse, MessageResponse};

use crate::api::CareApi;
use crate::error::{ClientError, ClientResult};
use crate::request::HttpClient;
use crate::validate::{ForgotPasswordForm, LoginForm, SignupForm};

pub const MSG_LOGIN_FAILED: &str = "Login failed";
pub const MSG_SIGNUP_FAILED: &str = "Signup failed";
pub const MSG_RESET_FAILED: &str = "Could not send reset email";

pub async fn authenticate<C: HttpClient>(api: &CareApi<C>, form: &LoginForm) -> ClientResult<AuthResponse> {
    let req = form.validate().map_err(ClientError::from)?;
    api.login(&req).await.map_err(|e| e.in_op("auth.login"))
}

pub async fn register<C: HttpClient>(api: &CareApi<C>, form: &SignupForm) -> ClientResult<AuthResponse> {
    let req = form.validate().map_err(ClientError::from)?;
    api.signup(&req).await.map_err(|e| e.in_op("auth.signup"))
}

pub async fn request_password_reset<C: HttpClient>(
    api: &CareApi<C>,
    form: &ForgotPasswordForm,
) -> ClientResult<MessageResponse> {
    let email = form.validate().map_err(ClientError::from)?;
    api.forgot_password(&email)
        .await
        .map_err(|e| e.in_op("auth.forgot_password"))
}
