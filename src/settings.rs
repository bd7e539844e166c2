//! # 应用配置
//!
//! 单个 JSON 文件汇总各模块配置，所有字段均可省略（`#[serde(default)]`）：
//!
//! ```json
//! {
//!   "image_service": { "endpoint": "...", "model": "FLUX_1_schnell" },
//!   "completion": { "endpoint": "...", "model": "llama3.1-70b" },
//!   "logo": { "stage_root": "./stages" },
//!   "compositor": { "caption_band_height": 100 },
//!   "idea_db": "./ideas.db"
//! }
//! ```
//!
//! API Key 不进入配置文件，只从各服务配置指定的环境变量读取。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compositor::CompositorConfig;
use crate::error::AppError;
use crate::logo::LogoConfig;
use crate::services::{BackgroundServiceConfig, CompletionConfig};

/// 未配置 `idea_db` 时使用的数据库文件名。
pub const DEFAULT_IDEA_DB: &str = "ideas.db";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub image_service: BackgroundServiceConfig,
    pub completion: CompletionConfig,
    pub logo: LogoConfig,
    pub compositor: CompositorConfig,
    pub idea_db: Option<PathBuf>,
}

impl AppConfig {
    /// 读取配置文件；未指定路径时返回默认配置。读取后立即校验。
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let config = match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    AppError::Config(format!("读取配置文件失败 {}: {}", path.display(), e))
                })?;
                let parsed = Self::from_json(&content)?;
                log::info!("⚙️ 已加载配置文件: {}", path.display());
                parsed
            }
            None => {
                log::debug!("⚙️ 未指定配置文件，使用默认配置");
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, AppError> {
        serde_json::from_str(content)
            .map_err(|e| AppError::Config(format!("解析配置文件失败: {}", e)))
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.image_service.validate().map_err(AppError::Config)?;
        self.completion.validate().map_err(AppError::Config)?;
        self.logo
            .validate()
            .map_err(|e| AppError::Config(format!("logo.{}", e)))?;
        self.compositor
            .validate()
            .map_err(|e| AppError::Config(format!("compositor.{}", e)))?;
        Ok(())
    }

    /// 点子库路径，未配置时落在当前目录。
    pub fn idea_db_path(&self) -> PathBuf {
        self.idea_db
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IDEA_DB))
    }
}
