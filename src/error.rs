use std::fmt;

use crate::validate::FieldErrors;

// =========================================================
// 错误类型枚举
// =========================================================

/// 客户端错误分类
///
/// 每一类对应一种界面处理方式，见 `ClientError::user_message`。
#[derive(Debug, Clone, PartialEq)]
pub enum ClientErrorKind {
    /// 网络/传输失败（fetch 被拒绝、连接中断）
    Network,
    /// 请求超过配置的超时时间
    Timeout,
    /// 后端返回非 2xx，`server_message` 为响应体中的 `error` 字段
    Http {
        status: u16,
        server_message: Option<String>,
    },
    /// 2xx 响应体无法解码
    Decode,
    /// 提交前的本地校验失败（逐字段）
    Validation(FieldErrors),
    /// 会话失效：`/check_session` 非成功，或调用需鉴权接口时没有 token
    SessionExpired,
    /// 本地持久化存储读写失败
    Storage,
}

impl ClientErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientErrorKind::Network => "NETWORK",
            ClientErrorKind::Timeout => "TIMEOUT",
            ClientErrorKind::Http { .. } => "HTTP_STATUS",
            ClientErrorKind::Decode => "DECODE",
            ClientErrorKind::Validation(_) => "VALIDATION",
            ClientErrorKind::SessionExpired => "SESSION_EXPIRED",
            ClientErrorKind::Storage => "STORAGE",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 记录错误发生时所在的操作
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorSpan {
    /// 操作名称，如 "api.login", "session.restore"
    pub operation: String,
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

#[derive(Debug)]
pub struct ClientError {
    pub kind: ClientErrorKind,
    pub message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
}

impl ClientError {
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Timeout, message)
    }

    pub fn http(status: u16, server_message: Option<String>) -> Self {
        let message = match &server_message {
            Some(msg) => format!("HTTP {}: {}", status, msg),
            None => format!("HTTP {}", status),
        };
        Self::new(
            ClientErrorKind::Http {
                status,
                server_message,
            },
            message,
        )
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Decode, message)
    }

    pub fn validation(errors: FieldErrors) -> Self {
        let message = errors.summary();
        Self::new(ClientErrorKind::Validation(errors), message)
    }

    pub fn session_expired(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::SessionExpired, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Storage, message)
    }

    // --- Context builders ---

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    /// HTTP 状态码（仅 `Http` 类错误）
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ClientErrorKind::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match &self.kind {
            ClientErrorKind::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// 界面上展示的文本
    ///
    /// 后端返回了 `error` 字段时原样展示；校验错误展示第一条；
    /// 其余情况一律使用调用方给出的通用文案。
    pub fn user_message(&self, fallback: &str) -> String {
        match &self.kind {
            ClientErrorKind::Http {
                server_message: Some(msg),
                ..
            } if !msg.trim().is_empty() => msg.clone(),
            ClientErrorKind::Validation(errors) => errors
                .first()
                .map(|(_, msg)| msg.to_string())
                .unwrap_or_else(|| fallback.to_string()),
            _ => fallback.to_string(),
        }
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::decode(e.to_string()).with_source(e)
    }
}

impl From<FieldErrors> for ClientError {
    fn from(errors: FieldErrors) -> Self {
        ClientError::validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_shown_verbatim() {
        let err = ClientError::http(401, Some("Invalid credentials".into()));
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
    }

    #[test]
    fn missing_or_blank_server_message_falls_back() {
        assert_eq!(
            ClientError::http(500, None).user_message("Login failed"),
            "Login failed"
        );
        assert_eq!(
            ClientError::http(500, Some("  ".into())).user_message("Save failed"),
            "Save failed"
        );
        assert_eq!(
            ClientError::network("connection refused").user_message("Save failed"),
            "Save failed"
        );
    }

    #[test]
    fn display_includes_trace() {
        let err = ClientError::timeout("after 15000ms")
            .in_op_with("http.send", "/readings")
            .in_op("progress.has_reading");
        assert_eq!(
            err.to_string(),
            "[TIMEOUT] after 15000ms | trace: http.send(/readings) -> progress.has_reading"
        );
    }
}
