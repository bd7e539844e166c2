//! # LLM 补全 HTTP 服务
//!
//! OpenAI 兼容的 chat completions 接口：
//! 请求 `{"model", "messages"}`，取 `choices[0].message.content` 并去除首尾空白。

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, CompletionConfig, CompletionService, ServiceError};

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// 基于 HTTP 的 LLM 补全服务。
pub struct HttpCompletionService {
    client: reqwest::Client,
    config: CompletionConfig,
    api_key: Option<String>,
}

impl HttpCompletionService {
    pub fn new(config: CompletionConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let api_key = config.api_key();

        Ok(Self {
            client,
            config,
            api_key,
        })
    }
}

#[async_trait]
impl CompletionService for HttpCompletionService {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ServiceError> {
        let start = Instant::now();
        let body = CompletionRequest {
            model: &self.config.model,
            messages,
        };

        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ServiceError::from_status(status.as_u16(), text));
        }

        let parsed: CompletionResponse = serde_json::from_slice(&response.bytes().await?)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ServiceError::InvalidResponse("响应中没有补全结果".to_string()))?;
        let content = content.trim().to_string();

        log::info!(
            "💬 补全完成 - 模型: {} 消息数: {} 回复长度: {} 耗时: {}ms",
            self.config.model,
            messages.len(),
            content.chars().count(),
            start.elapsed().as_millis()
        );

        Ok(content)
    }
}
