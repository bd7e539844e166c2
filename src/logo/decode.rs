//! # 解码模块
//!
//! ## 设计思路
//!
//! 将“字节 → 图像”的过程集中管理，并在完整解码前做像素上限检查，
//! 降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 猜测格式并读取 header 尺寸
//! 2. 按像素上限快速拒绝
//! 3. 完整解码
//! 4. 再次校验实际尺寸（header 可能与数据不符）

use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageReader};

use super::LogoError;

/// 解码任意受支持格式的图片字节。
///
/// 命令行读取本地背景图时也走这条路径。
pub fn decode_image(bytes: &[u8], max_decoded_pixels: u64) -> Result<DynamicImage, LogoError> {
    image::guess_format(bytes)
        .map_err(|e| LogoError::InvalidFormat(format!("不支持的图片格式：{}", e)))?;

    let (header_width, header_height) = inspect_dimensions_from_memory(bytes)?;
    validate_pixel_limits(max_decoded_pixels, header_width, header_height)?;

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| LogoError::Decode(format!("图片解码失败：{}", e)))?;

    let (width, height) = decoded.dimensions();
    validate_pixel_limits(max_decoded_pixels, width, height)?;

    if width == 0 || height == 0 {
        return Err(LogoError::Decode(format!("图片尺寸为零：{}x{}", width, height)));
    }

    Ok(decoded)
}

/// 仅通过内存中的图片头信息读取宽高。
fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), LogoError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| LogoError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

    reader
        .into_dimensions()
        .map_err(|e| LogoError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
}

/// 校验像素数量是否超过配置上限。
fn validate_pixel_limits(max_decoded_pixels: u64, width: u32, height: u32) -> Result<(), LogoError> {
    let pixels = (width as u64) * (height as u64);

    if pixels > max_decoded_pixels {
        return Err(LogoError::ResourceLimit(format!(
            "图片像素过大：{} 像素（限制：{} 像素）",
            pixels, max_decoded_pixels
        )));
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgba};

    pub(crate) fn create_png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let r = (x % 255) as u8;
            let g = (y % 255) as u8;
            let b = ((x + y) % 255) as u8;
            Rgba([r, g, b, if x < width / 2 { 0 } else { 255 }])
        });

        let dyn_img = DynamicImage::ImageRgba8(img);
        let mut cursor = Cursor::new(Vec::new());
        dyn_img
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");
        cursor.into_inner()
    }

    #[test]
    fn decodes_png_and_keeps_alpha() {
        let png = create_png_bytes(64, 32);
        let decoded = decode_image(&png, 1_000_000).expect("decode");

        assert_eq!(decoded.dimensions(), (64, 32));
        let rgba = decoded.to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0).0[3], 0);
        assert_eq!(rgba.get_pixel(63, 0).0[3], 255);
    }

    #[test]
    fn rejects_too_many_pixels_before_decoding() {
        let png = create_png_bytes(200, 200);
        let result = decode_image(&png, 1_000);

        assert!(matches!(result, Err(LogoError::ResourceLimit(_))));
    }

    #[test]
    fn rejects_unknown_bytes() {
        let result = decode_image(b"<html>nope</html>", 1_000);
        assert!(matches!(result, Err(LogoError::InvalidFormat(_))));
    }
}
