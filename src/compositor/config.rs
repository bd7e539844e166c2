//! # 合成配置模块
//!
//! ## 设计思路
//!
//! 将合成阶段所有“可调参数”集中到 `CompositorConfig`：
//! 标语带高度、字号、Logo 尺寸上限比例、行距、字体文件与缩放滤镜。
//!
//! ## 实现思路
//!
//! - `Default` 给出与参考行为一致的默认值（100px 标语带、30 号字、1/2 宽、1/5 高）。
//! - `validate` 在加载配置后统一做范围检查，避免合成中途才暴露问题。
//! - `LogoResizeFilter` 负责与 `fast_image_resize` / `image` 两套滤镜之间的映射。

use std::path::PathBuf;

use fast_image_resize as fr;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// 标语带默认高度（像素）。
pub const CAPTION_BAND_HEIGHT: u32 = 100;
/// 标语默认字号。
pub const DEFAULT_FONT_SIZE: f32 = 30.0;
/// Logo 宽度上限占背景宽度的比例。
pub const LOGO_MAX_WIDTH_FRACTION: f64 = 0.5;
/// Logo 高度上限占背景高度的比例。
pub const LOGO_MAX_HEIGHT_FRACTION: f64 = 0.2;
/// 多行标语的行间距（像素）。
pub const DEFAULT_LINE_SPACING: u32 = 4;
/// 字号上限。
pub const MAX_FONT_SIZE: f32 = 512.0;

/// 合成配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// 画布底部标语带高度（像素）。
    pub caption_band_height: u32,
    /// 标语字号，取值 (0, 512]（内置点阵字体按 `font_size / 10` 取整数放大倍数）。
    pub font_size: f32,
    /// Logo 最大宽度 = 背景宽度 × 该比例。
    pub logo_max_width_fraction: f64,
    /// Logo 最大高度 = 背景高度 × 该比例。
    pub logo_max_height_fraction: f64,
    /// 多行标语行间距（像素）。
    pub line_spacing: u32,
    /// 可选 TrueType/OpenType 字体文件；为空时使用内置点阵字体。
    pub font_path: Option<PathBuf>,
    /// Logo 降采样滤镜。
    pub resize_filter: LogoResizeFilter,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            caption_band_height: CAPTION_BAND_HEIGHT,
            font_size: DEFAULT_FONT_SIZE,
            logo_max_width_fraction: LOGO_MAX_WIDTH_FRACTION,
            logo_max_height_fraction: LOGO_MAX_HEIGHT_FRACTION,
            line_spacing: DEFAULT_LINE_SPACING,
            font_path: None,
            resize_filter: LogoResizeFilter::default(),
        }
    }
}

impl CompositorConfig {
    /// 校验参数范围，返回可读的错误描述。
    pub fn validate(&self) -> Result<(), String> {
        if self.caption_band_height == 0 {
            return Err("caption_band_height 必须大于 0".to_string());
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 || self.font_size > MAX_FONT_SIZE {
            return Err(format!(
                "font_size 必须在 (0, {}] 区间内（当前：{}）",
                MAX_FONT_SIZE, self.font_size
            ));
        }
        for (name, value) in [
            ("logo_max_width_fraction", self.logo_max_width_fraction),
            ("logo_max_height_fraction", self.logo_max_height_fraction),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(format!("{} 必须在 (0, 1] 区间内（当前：{}）", name, value));
            }
        }
        Ok(())
    }
}

/// Logo 降采样滤镜。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoResizeFilter {
    Nearest,
    Bilinear,
    #[default]
    CatmullRom,
    Lanczos3,
}

impl LogoResizeFilter {
    pub(crate) fn to_fast_filter(self) -> fr::FilterType {
        match self {
            Self::Nearest => fr::FilterType::Box,
            Self::Bilinear => fr::FilterType::Bilinear,
            Self::CatmullRom => fr::FilterType::CatmullRom,
            Self::Lanczos3 => fr::FilterType::Lanczos3,
        }
    }

    pub(crate) fn to_image_filter(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Bilinear => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
