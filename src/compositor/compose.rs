//! # 概念图合成
//!
//! ## 设计思路
//!
//! `Compositor` 持有合成配置与已加载的标语字体，`compose` 本身是纯函数：
//! 相同输入必然得到逐像素相同的输出，不做 I/O，不引入随机性。
//!
//! ## 处理顺序
//!
//! ```text
//! 布局编号校验 → 尺寸校验 → Logo 缩放 + alpha 贴图
//!    → 求平均色 → 扩展画布（平均色填充）→ 贴背景
//!    → 度量标语 → 居中绘制（黑/白对比色）
//! ```

use image::{RgbImage, RgbaImage};

use super::color::{average_color, contrast_color};
use super::font::TaglineFont;
use super::layout::{fit_logo_size, tagline_origin};
use super::resize::{paste_with_alpha_mask, resize_logo};
use super::{ComposeError, CompositorConfig};

/// 布局编号。目前只有 `1`：左上角 Logo + 底部标语带。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutVariant {
    #[default]
    LogoTopLeftCaptionBottom,
}

impl TryFrom<u32> for LayoutVariant {
    type Error = ComposeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::LogoTopLeftCaptionBottom),
            other => Err(ComposeError::UnsupportedVariant(other)),
        }
    }
}

/// 概念图合成器。
pub struct Compositor {
    config: CompositorConfig,
    font: TaglineFont,
}

impl Compositor {
    /// 按配置创建合成器；配置了字体文件时在这里加载，失败返回 `Render`。
    pub fn new(config: CompositorConfig) -> Result<Self, ComposeError> {
        let font = TaglineFont::from_config(&config)?;
        Ok(Self { config, font })
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// 合成概念图。
    ///
    /// - `background`：非空 RGB 背景，作为实现细节会被就地修改（贴 Logo）
    /// - `logo`：可选，alpha 通道作为贴图蒙版
    /// - `tagline`：任意文本，可为空，可含换行
    /// - `layout_variant`：仅支持 `1`
    ///
    /// 输出尺寸恒为 `(背景宽, 背景高 + caption_band_height)`。
    pub fn compose(
        &self,
        background: RgbImage,
        logo: Option<&RgbaImage>,
        tagline: &str,
        layout_variant: u32,
    ) -> Result<RgbImage, ComposeError> {
        match LayoutVariant::try_from(layout_variant)? {
            LayoutVariant::LogoTopLeftCaptionBottom => {
                self.compose_logo_top_left(background, logo, tagline)
            }
        }
    }

    fn compose_logo_top_left(
        &self,
        mut background: RgbImage,
        logo: Option<&RgbaImage>,
        tagline: &str,
    ) -> Result<RgbImage, ComposeError> {
        let (width, height) = background.dimensions();
        if width == 0 || height == 0 {
            return Err(ComposeError::InvalidImage(format!(
                "背景图片面积为零：{}x{}",
                width, height
            )));
        }

        let band = self.config.caption_band_height;
        let canvas_height = height.checked_add(band).ok_or_else(|| {
            ComposeError::InvalidImage(format!("画布高度溢出：{} + {}", height, band))
        })?;

        if let Some(logo) = logo {
            self.place_logo(&mut background, logo)?;
        }

        let avg = average_color(&background)?;
        let mut canvas = RgbImage::from_pixel(width, canvas_height, avg);
        image::imageops::replace(&mut canvas, &background, 0, 0);

        let text_size = self.font.measure(tagline)?;
        let (x, y) = tagline_origin(width, height, band, text_size);
        let text_color = contrast_color(avg);
        self.font.draw(&mut canvas, x, y, tagline, text_color)?;

        log::debug!(
            "🎨 合成完成 - 背景 {}x{} 画布 {}x{} 平均色 {:?} 文字色 {:?} 标语块 {}x{}@({}, {})",
            width,
            height,
            width,
            canvas_height,
            avg.0,
            text_color.0,
            text_size.0,
            text_size.1,
            x,
            y
        );

        Ok(canvas)
    }

    fn place_logo(&self, background: &mut RgbImage, logo: &RgbaImage) -> Result<(), ComposeError> {
        let (logo_w, logo_h) = logo.dimensions();
        if logo_w == 0 || logo_h == 0 {
            return Err(ComposeError::InvalidImage(format!(
                "Logo 图片面积为零：{}x{}",
                logo_w, logo_h
            )));
        }

        match fit_logo_size((logo_w, logo_h), background.dimensions(), &self.config) {
            Some((target_w, target_h)) => {
                let resized = resize_logo(logo, target_w, target_h, self.config.resize_filter);
                paste_with_alpha_mask(background, &resized);
            }
            None => paste_with_alpha_mask(background, logo),
        }

        Ok(())
    }
}

/// 使用默认配置（内置字体、100px 标语带）合成概念图。
pub fn compose(
    background: RgbImage,
    logo: Option<&RgbaImage>,
    tagline: &str,
    layout_variant: u32,
) -> Result<RgbImage, ComposeError> {
    Compositor::new(CompositorConfig::default())?.compose(background, logo, tagline, layout_variant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba};

    #[test]
    fn variant_parsing_accepts_only_one() {
        assert_eq!(
            LayoutVariant::try_from(1).expect("variant 1"),
            LayoutVariant::LogoTopLeftCaptionBottom
        );
        assert!(matches!(
            LayoutVariant::try_from(0),
            Err(ComposeError::UnsupportedVariant(0))
        ));
    }

    #[test]
    fn unsupported_variant_is_checked_before_image_validation() {
        let result = compose(RgbImage::new(0, 0), None, "x", 2);
        assert!(matches!(result, Err(ComposeError::UnsupportedVariant(2))));
    }

    #[test]
    fn zero_area_background_is_rejected() {
        let result = compose(RgbImage::new(10, 0), None, "x", 1);
        assert!(matches!(result, Err(ComposeError::InvalidImage(_))));
    }

    #[test]
    fn zero_area_logo_is_rejected() {
        let logo = RgbaImage::new(0, 3);
        let result = compose(RgbImage::new(10, 10), Some(&logo), "x", 1);
        assert!(matches!(result, Err(ComposeError::InvalidImage(_))));
    }

    #[test]
    fn average_color_includes_pasted_logo() {
        let background = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
        // 5x2 在上限内，不缩放
        let logo = RgbaImage::from_pixel(5, 2, Rgba([255, 255, 255, 255]));

        let out = compose(background, Some(&logo), "", 1).expect("compose");

        // 10 个白像素 / 100 → 25
        assert_eq!(*out.get_pixel(9, 109), Rgb([25, 25, 25]));
        assert_eq!(*out.get_pixel(0, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn custom_band_height_changes_canvas() {
        let config = CompositorConfig {
            caption_band_height: 40,
            ..CompositorConfig::default()
        };
        let compositor = Compositor::new(config).expect("compositor");
        let out = compositor
            .compose(RgbImage::from_pixel(50, 20, Rgb([200, 200, 200])), None, "", 1)
            .expect("compose");

        assert_eq!(out.dimensions(), (50, 60));
    }
}
