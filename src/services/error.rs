//! # 外部服务错误模型
//!
//! 文生图服务与 LLM 补全服务共用一套错误类型。
//! 每次调用只有一个请求往返，错误原样返回，不在本地重试。

/// 外部服务调用错误。
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// API Key 缺失或被拒绝。
    #[error("鉴权失败：{0}")]
    Auth(String),

    /// 服务返回非成功状态码。
    #[error("服务错误：HTTP {status} - {message}")]
    Api { status: u16, message: String },

    /// 网络或 HTTP 层错误。
    #[error("网络错误：{0}")]
    Network(#[from] reqwest::Error),

    /// JSON 序列化/反序列化错误。
    #[error("JSON 错误：{0}")]
    Json(#[from] serde_json::Error),

    /// 响应结构合法但内容不可用（空图片列表、像素数组不规则等）。
    #[error("响应内容无效：{0}")]
    InvalidResponse(String),
}

impl ServiceError {
    /// 按状态码映射错误：401/403 视为鉴权失败。
    pub(crate) fn from_status(status: u16, body: String) -> Self {
        let message = if body.trim().is_empty() {
            "（响应体为空）".to_string()
        } else {
            body.chars().take(500).collect()
        };

        match status {
            401 | 403 => Self::Auth(message),
            _ => Self::Api { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_separates_auth_failures() {
        assert!(matches!(
            ServiceError::from_status(401, "bad key".into()),
            ServiceError::Auth(_)
        ));
        assert!(matches!(
            ServiceError::from_status(503, String::new()),
            ServiceError::Api { status: 503, .. }
        ));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let err = ServiceError::from_status(500, "x".repeat(2000));
        let ServiceError::Api { message, .. } = err else {
            panic!("expected api error");
        };
        assert_eq!(message.chars().count(), 500);
    }
}
