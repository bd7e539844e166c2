//! # 概念图合成模块（compositor）
//!
//! ## 设计思路
//!
//! 整个应用里唯一的本地图像逻辑：背景 + 可选 Logo + 标语 → 一张扁平 RGB 图。
//! 按职责拆分：
//!
//! - `color`：平均色、感知亮度、黑白对比色
//! - `layout`：Logo 目标尺寸、标语块坐标（纯几何）
//! - `resize`：Logo 缩放与 alpha 蒙版贴图
//! - `font`：标语字体（内置点阵 / TrueType）度量与绘制
//! - `compose`：`Compositor` 编排以上步骤
//! - `config/error`：配置与错误
//!
//! ## 调用链
//!
//! ```text
//! Compositor::compose
//!    ├─ layout::fit_logo_size → resize::resize_logo → resize::paste_with_alpha_mask
//!    ├─ color::average_color → 画布填充
//!    └─ font::measure → layout::tagline_origin → font::draw（color::contrast_color）
//! ```

mod color;
mod compose;
mod config;
mod error;
mod font;
mod layout;
mod resize;

pub use color::{average_color, contrast_color, contrast_for_luminance, luminance};
pub use compose::{Compositor, LayoutVariant, compose};
pub use config::{
    CAPTION_BAND_HEIGHT, CompositorConfig, DEFAULT_FONT_SIZE, LOGO_MAX_HEIGHT_FRACTION,
    LOGO_MAX_WIDTH_FRACTION, LogoResizeFilter, MAX_FONT_SIZE,
};
pub use error::ComposeError;
pub use font::TaglineFont;
pub use layout::{fit_logo_size, tagline_origin};
