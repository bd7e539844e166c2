//! # 外部服务配置
//!
//! 服务地址、模型名与鉴权环境变量名。API Key 本身只从环境变量读取，不写入配置文件。

use serde::{Deserialize, Serialize};

/// 文生图服务配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundServiceConfig {
    /// 推理服务地址（POST JSON）。
    pub endpoint: String,
    /// 模型名。
    pub model: String,
    /// 模型版本。
    pub version: String,
    /// 服务名（同一模型可部署为多个服务）。
    pub service: String,
    /// 存放 API Key 的环境变量名。
    pub api_key_env: String,
    /// 单次请求超时（秒）。冷启动的推理容器可能需要很长时间。
    pub timeout_secs: u64,
}

impl Default for BackgroundServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000/generate".to_string(),
            model: "FLUX_1_schnell".to_string(),
            version: "HAPPY_RAY_4".to_string(),
            service: "CONCEPT_GEN_SERVICE".to_string(),
            api_key_env: "CONCEPT_IMAGE_API_KEY".to_string(),
            timeout_secs: 1_800,
        }
    }
}

/// LLM 补全服务配置（OpenAI 兼容 chat completions 接口）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8001/v1/chat/completions".to_string(),
            model: "llama3.1-70b".to_string(),
            api_key_env: "CONCEPT_LLM_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

fn validate_endpoint(name: &str, endpoint: &str) -> Result<(), String> {
    let parsed = reqwest::Url::parse(endpoint)
        .map_err(|e| format!("{} 地址格式错误：{}", name, e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(format!("{} 仅支持 HTTP/HTTPS：{}", name, endpoint));
    }
    Ok(())
}

impl BackgroundServiceConfig {
    pub fn validate(&self) -> Result<(), String> {
        validate_endpoint("image_service.endpoint", &self.endpoint)?;
        if self.model.trim().is_empty() {
            return Err("image_service.model 不能为空".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("image_service.timeout_secs 必须大于 0".to_string());
        }
        Ok(())
    }

    /// 读取 API Key；环境变量未设置时返回 `None`（允许无鉴权的内网服务）。
    pub fn api_key(&self) -> Option<String> {
        read_api_key(&self.api_key_env)
    }
}

impl CompletionConfig {
    pub fn validate(&self) -> Result<(), String> {
        validate_endpoint("completion.endpoint", &self.endpoint)?;
        if self.model.trim().is_empty() {
            return Err("completion.model 不能为空".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("completion.timeout_secs 必须大于 0".to_string());
        }
        Ok(())
    }

    pub fn api_key(&self) -> Option<String> {
        read_api_key(&self.api_key_env)
    }
}

fn read_api_key(env_name: &str) -> Option<String> {
    if env_name.trim().is_empty() {
        return None;
    }
    std::env::var(env_name)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(BackgroundServiceConfig::default().validate().is_ok());
        assert!(CompletionConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_http_endpoints() {
        let config = CompletionConfig {
            endpoint: "file:///etc/passwd".to_string(),
            ..CompletionConfig::default()
        };
        assert!(config.validate().is_err());

        let config = BackgroundServiceConfig {
            endpoint: "not a url".to_string(),
            ..BackgroundServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_env_name_means_no_key() {
        let config = CompletionConfig {
            api_key_env: String::new(),
            ..CompletionConfig::default()
        };
        assert!(config.api_key().is_none());
    }
}
