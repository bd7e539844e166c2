//! # 加载配置模块
//!
//! ## 设计思路
//!
//! 将 Logo 加载阶段所有“可调策略”集中到 `LogoConfig`：体积上限、网络超时、
//! 重定向次数、内网访问开关、解码像素上限、User-Agent 与 Stage 根目录。
//!
//! 不包含任何重试或缓存参数：加载失败直接返回给调用方。

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// 许多站点会拦截脚本直链下载，默认带上可识别的 User-Agent。
pub const DEFAULT_USER_AGENT: &str = "ConceptGenerator/1.0 (+https://example.com/concept-generator)";

/// Logo 加载配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoConfig {
    /// 下载/读取原始字节时允许的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 网络下载总超时（秒）。
    pub download_timeout: u64,
    /// 建立连接超时（秒）。
    pub connect_timeout: u64,
    /// 最大重定向次数，每一跳都会重新做地址安全校验。
    pub max_redirects: usize,
    /// 是否允许访问内网或本地地址（默认关闭，防 SSRF）。
    pub allow_private_network: bool,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 下载请求携带的 User-Agent。
    pub user_agent: String,
    /// `@db.schema.stage/path` 形式引用的本地根目录。
    pub stage_root: Option<PathBuf>,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            max_file_size: 20 * 1024 * 1024,
            download_timeout: 30,
            connect_timeout: 8,
            max_redirects: 5,
            allow_private_network: false,
            max_decoded_pixels: 40_000_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            stage_root: None,
        }
    }
}

impl LogoConfig {
    /// 校验参数范围，返回可读的错误描述。
    pub fn validate(&self) -> Result<(), String> {
        if self.max_file_size == 0 {
            return Err("max_file_size 必须大于 0".to_string());
        }
        if !(1..=600).contains(&self.download_timeout) {
            return Err("download_timeout 必须在 1~600 秒之间".to_string());
        }
        if !(1..=120).contains(&self.connect_timeout) {
            return Err("connect_timeout 必须在 1~120 秒之间".to_string());
        }
        if self.max_decoded_pixels == 0 {
            return Err("max_decoded_pixels 必须大于 0".to_string());
        }
        if self.user_agent.trim().is_empty() {
            return Err("user_agent 不能为空".to_string());
        }
        Ok(())
    }
}
