//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `LogoInput` 表示 Logo 的来源语义（无 / URL / Stage / 文件 / Base64）
//! - `StageRef` 表示解析后的 `@db.schema.stage/path` 引用
//! - `RawLogoData` 表示已加载但未解码的字节

use std::fmt;
use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use super::LogoError;

static STAGE_REF_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^@([A-Za-z_][A-Za-z0-9_$]*)\.([A-Za-z_][A-Za-z0-9_$]*)\.([A-Za-z_][A-Za-z0-9_$]*)/(.+)$",
    )
    .expect("stage reference pattern is valid")
});

/// Logo 输入来源。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogoInput {
    /// 不使用 Logo。
    #[default]
    None,
    /// 网络地址来源。
    Url(String),
    /// Stage 引用来源。
    Stage(StageRef),
    /// 本地文件路径来源。
    File(PathBuf),
    /// Base64（支持 Data URL 与纯 Base64 字符串）。
    Base64(String),
}

impl LogoInput {
    /// 从命令行字符串推断来源：
    /// `@` 开头为 Stage，`http(s)://` 为 URL，`data:image/` 为 Base64，其余视为文件路径。
    pub fn parse(value: &str) -> Result<Self, LogoError> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("none") {
            return Ok(Self::None);
        }
        if value.starts_with('@') {
            return StageRef::parse(value).map(Self::Stage);
        }

        let lower = value.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(Self::Url(value.to_string()));
        }
        if lower.starts_with("data:image/") {
            return Ok(Self::Base64(value.to_string()));
        }

        Ok(Self::File(PathBuf::from(value)))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// `@<database>.<schema>.<stage>/<path>` 形式的 Stage 引用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRef {
    pub database: String,
    pub schema: String,
    pub stage: String,
    pub path: String,
}

impl StageRef {
    /// 解析 Stage 引用；路径中不允许出现 `..`、绝对路径或空段。
    pub fn parse(value: &str) -> Result<Self, LogoError> {
        let captures = STAGE_REF_PATTERN.captures(value.trim()).ok_or_else(|| {
            LogoError::InvalidStageRef(format!(
                "Stage 引用格式应为 @<database>.<schema>.<stage>/<file>：{}",
                value
            ))
        })?;

        let path = captures[4].to_string();
        let safe = path.split('/').all(|segment| {
            !segment.is_empty() && segment != "." && segment != ".." && !segment.contains('\\')
        });
        if !safe {
            return Err(LogoError::InvalidStageRef(format!("Stage 文件路径非法：{}", path)));
        }

        Ok(Self {
            database: captures[1].to_string(),
            schema: captures[2].to_string(),
            stage: captures[3].to_string(),
            path,
        })
    }

    /// 映射到本地目录：`<root>/<database>/<schema>/<stage>/<path>`。
    pub fn resolve(&self, root: &Path) -> Result<PathBuf, LogoError> {
        let mut resolved = root.join(&self.database).join(&self.schema).join(&self.stage);
        for segment in self.path.split('/') {
            resolved.push(segment);
        }

        let escapes = resolved
            .strip_prefix(root)
            .map(|relative| {
                relative
                    .components()
                    .any(|c| !matches!(c, Component::Normal(_)))
            })
            .unwrap_or(true);
        if escapes {
            return Err(LogoError::InvalidStageRef(format!(
                "Stage 路径越界：{}",
                resolved.display()
            )));
        }

        Ok(resolved)
    }
}

impl fmt::Display for StageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}.{}.{}/{}", self.database, self.schema, self.stage, self.path)
    }
}

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawLogoData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}
