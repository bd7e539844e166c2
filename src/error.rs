//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 各子模块维护自己的错误枚举（`ComposeError` / `LogoError` / `ServiceError`），
//! 在流水线与 CLI 层统一汇总为 `AppError`，调用方只需处理一种错误类型。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 子模块错误通过 `#[from]` 自动转换，`?` 即可向上传播。
//! - 数据库 / 配置 / 编码等无专属枚举的错误以字符串携带上下文。
//! - 实现 `Serialize` 将错误序列化为字符串，供 `--json` 输出使用。

use serde::Serialize;

use crate::compositor::ComposeError;
use crate::logo::LogoError;
use crate::services::ServiceError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 合成失败（图片非法 / 不支持的布局 / 文字渲染）
    #[error("{0}")]
    Compose(#[from] ComposeError),

    /// Logo 加载失败（下载 / 解码 / 读取）
    #[error("{0}")]
    Logo(#[from] LogoError),

    /// 外部服务调用失败
    #[error("{0}")]
    Service(#[from] ServiceError),

    /// 数据库操作失败
    #[error("数据库错误: {0}")]
    Database(String),

    /// 配置文件或参数非法
    #[error("配置错误: {0}")]
    Config(String),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 输出图片编码失败
    #[error("图片编码失败: {0}")]
    Encode(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_errors_convert_transparently() {
        let err: AppError = ComposeError::UnsupportedVariant(2).into();
        assert!(matches!(err, AppError::Compose(ComposeError::UnsupportedVariant(2))));
        assert_eq!(err.to_string(), ComposeError::UnsupportedVariant(2).to_string());

        let err: AppError = LogoError::Timeout("30s".to_string()).into();
        assert!(matches!(err, AppError::Logo(_)));
    }

    #[test]
    fn serializes_as_message_string() {
        let err = AppError::Config("bad".to_string());
        let json = serde_json::to_string(&err).expect("serialize");
        assert_eq!(json, "\"配置错误: bad\"");
    }

    #[test]
    fn json_error_output_carries_the_message() {
        let err: AppError = ComposeError::UnsupportedVariant(2).into();
        let value = serde_json::json!({ "error": err });

        assert_eq!(
            value["error"],
            serde_json::Value::String(ComposeError::UnsupportedVariant(2).to_string())
        );
    }
}
