//! # Logo 缩放与贴图
//!
//! ## 实现思路
//!
//! - 缩放优先走 `fast_image_resize`（卷积滤镜，RGBA 自动预乘 alpha），
//!   失败时回退 `image::imageops::resize`，两者都只在需要缩小时调用。
//! - 贴图使用 Logo 自身的 alpha 作为蒙版：完全透明的像素不改变背景。

use fast_image_resize as fr;
use image::{RgbImage, RgbaImage};

use super::{ComposeError, LogoResizeFilter};

/// 将 Logo 缩放到精确的目标尺寸。
pub(crate) fn resize_logo(
    logo: &RgbaImage,
    target_width: u32,
    target_height: u32,
    filter: LogoResizeFilter,
) -> RgbaImage {
    log::debug!(
        "🧩 Logo 缩放：{}x{} -> {}x{}（filter={:?}）",
        logo.width(),
        logo.height(),
        target_width,
        target_height,
        filter
    );

    match resize_with_fast_image_resize(logo, target_width, target_height, filter) {
        Ok(resized) => resized,
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::imageops::resize：{}", err);
            image::imageops::resize(logo, target_width, target_height, filter.to_image_filter())
        }
    }
}

fn resize_with_fast_image_resize(
    logo: &RgbaImage,
    target_width: u32,
    target_height: u32,
    filter: LogoResizeFilter,
) -> Result<RgbaImage, ComposeError> {
    let src_image = fr::images::Image::from_vec_u8(
        logo.width(),
        logo.height(),
        logo.as_raw().clone(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| ComposeError::InvalidImage(format!("构建 Logo 源缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(filter.to_fast_filter()));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| ComposeError::InvalidImage(format!("fast_image_resize 执行失败：{}", e)))?;

    RgbaImage::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| ComposeError::InvalidImage("fast_image_resize 输出缓冲长度异常".to_string()))
}

/// 以 Logo 的 alpha 通道为蒙版，把 Logo 贴到背景左上角。
///
/// 超出背景的部分被裁掉。
pub(crate) fn paste_with_alpha_mask(background: &mut RgbImage, logo: &RgbaImage) {
    let width = logo.width().min(background.width());
    let height = logo.height().min(background.height());

    for y in 0..height {
        for x in 0..width {
            let src = logo.get_pixel(x, y).0;
            let alpha = src[3] as u32;
            if alpha == 0 {
                continue;
            }
            let dst = background.get_pixel_mut(x, y);
            for channel in 0..3 {
                let blended =
                    src[channel] as u32 * alpha + dst.0[channel] as u32 * (255 - alpha);
                dst.0[channel] = ((blended + 127) / 255) as u8;
            }
        }
    }
}
