//! # 外部服务模块（services）
//!
//! ## 设计思路
//!
//! 文生图与 LLM 补全都是托管服务，对本程序而言是不透明的单次往返：
//! - `BackgroundService`：提示词 → 背景图
//! - `CompletionService`：对话消息 → 文本
//!
//! 两者以 trait 形式注入到 `ConceptContext`，替代全局会话单例；
//! 测试中可直接替换为内存实现。HTTP 实现见 `background` / `completion`。

mod background;
mod completion;
mod config;
mod error;

use async_trait::async_trait;
use image::RgbImage;
use serde::{Deserialize, Serialize};

pub use background::{HttpBackgroundService, ImagePayload, image_from_pixel_rows};
pub use completion::HttpCompletionService;
pub use config::{BackgroundServiceConfig, CompletionConfig};
pub use error::ServiceError;

/// 对话角色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// 单条对话消息。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// 文生图服务。
#[async_trait]
pub trait BackgroundService: Send + Sync {
    /// 按提示词生成一张背景图。
    async fn generate_background(&self, prompt: &str) -> Result<RgbImage, ServiceError>;
}

/// LLM 补全服务。
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// 发送对话消息，返回模型回复文本。
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_serializes_lowercase_roles() {
        let json = serde_json::to_string(&ChatMessage::system("be brief")).expect("serialize");
        assert_eq!(json, r#"{"role":"system","content":"be brief"}"#);
    }
}
