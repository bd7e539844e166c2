//! # Logo 加载模块（logo）
//!
//! ## 设计思路
//!
//! 将“来源识别 → 加载校验 → 解码”按职责拆分为多个子模块：
//!
//! - `source`：`LogoInput` / `StageRef` 来源模型
//! - `loader`：URL / Stage / 文件 / Base64 加载与安全校验
//! - `decode`：像素上限检查 + 解码
//! - `config/error`：配置、错误
//!
//! ## 调用链
//!
//! ```text
//! LogoLoader::load(LogoInput)
//!    ├─ loader.rs（来源加载 + URL/体积/签名校验）
//!    └─ decode.rs（header 尺寸检查 + 解码 → RGBA）
//! ```

mod config;
pub(crate) mod decode;
mod error;
mod loader;
mod source;

pub use config::{DEFAULT_USER_AGENT, LogoConfig};
pub use decode::decode_image;
pub use error::LogoError;
pub use loader::LogoLoader;
pub use source::{LogoInput, StageRef};
