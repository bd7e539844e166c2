//! # 颜色工具
//!
//! 平均色估计与黑白对比色选择。两者都是对输入的纯函数。

use image::{GenericImageView, Pixel, Rgb};

use super::ComposeError;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// 计算图片各颜色通道的算术平均值（向零截断）。
///
/// 返回值通道顺序固定为 R、G、B；若像素带 alpha 通道则忽略 alpha。
/// 空图片没有平均值，返回 `InvalidImage`。
pub fn average_color<I>(img: &I) -> Result<Rgb<u8>, ComposeError>
where
    I: GenericImageView,
    I::Pixel: Pixel<Subpixel = u8>,
{
    let (width, height) = img.dimensions();
    let count = (width as u64) * (height as u64);
    if count == 0 {
        return Err(ComposeError::InvalidImage(format!(
            "无法对空图片求平均色：{}x{}",
            width, height
        )));
    }

    let mut sums = [0u64; 3];
    for (_, _, pixel) in img.pixels() {
        let rgb = pixel.to_rgb();
        for (sum, channel) in sums.iter_mut().zip(rgb.0) {
            *sum += channel as u64;
        }
    }

    Ok(Rgb(sums.map(|sum| (sum / count) as u8)))
}

/// 感知亮度，取值 [0, 1]。
pub fn luminance(rgb: Rgb<u8>) -> f64 {
    let [r, g, b] = rgb.0;
    (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) / 255.0
}

/// 按亮度阈值选择文字颜色：亮度严格大于 0.5 用黑色，否则（含 0.5）用白色。
pub fn contrast_for_luminance(luminance: f64) -> Rgb<u8> {
    if luminance > 0.5 { BLACK } else { WHITE }
}

/// 为给定底色挑选可读性最高的文字颜色（仅黑或白）。
pub fn contrast_color(rgb: Rgb<u8>) -> Rgb<u8> {
    contrast_for_luminance(luminance(rgb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba, RgbImage};
    use proptest::prelude::*;

    #[test]
    fn average_of_two_by_two_fixture_truncates() {
        let img = RgbImage::from_vec(
            2,
            2,
            vec![0, 0, 0, 255, 255, 255, 255, 0, 0, 0, 255, 0],
        )
        .expect("fixture buffer");

        assert_eq!(average_color(&img).expect("average"), Rgb([127, 127, 63]));
    }

    #[test]
    fn average_ignores_alpha_channel() {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_fn(4, 4, |x, _| {
            Rgba([200, 100, 50, if x % 2 == 0 { 0 } else { 255 }])
        });

        assert_eq!(average_color(&img).expect("average"), Rgb([200, 100, 50]));
    }

    #[test]
    fn average_rejects_empty_image() {
        let img = RgbImage::new(0, 5);
        assert!(matches!(average_color(&img), Err(ComposeError::InvalidImage(_))));
    }

    #[test]
    fn contrast_threshold_boundaries() {
        assert_eq!(contrast_for_luminance(0.5), WHITE);
        assert_eq!(contrast_for_luminance(0.9), BLACK);
        assert_eq!(contrast_for_luminance(0.1), WHITE);
    }

    #[test]
    fn contrast_for_extremes() {
        assert_eq!(contrast_color(Rgb([0, 0, 0])), WHITE);
        assert_eq!(contrast_color(Rgb([255, 255, 255])), BLACK);
        assert_eq!(contrast_color(Rgb([30, 30, 30])), WHITE);
        // 纯绿亮度 0.587，纯红 0.299
        assert_eq!(contrast_color(Rgb([0, 255, 0])), BLACK);
        assert_eq!(contrast_color(Rgb([255, 0, 0])), WHITE);
    }

    proptest! {
        #[test]
        fn contrast_is_total_and_binary(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let color = contrast_color(Rgb([r, g, b]));
            prop_assert!(color == BLACK || color == WHITE);
            prop_assert_eq!(color == BLACK, luminance(Rgb([r, g, b])) > 0.5);
        }

        #[test]
        fn average_of_solid_image_is_that_color(
            r in any::<u8>(), g in any::<u8>(), b in any::<u8>(),
            w in 1u32..16, h in 1u32..16,
        ) {
            let img = RgbImage::from_pixel(w, h, Rgb([r, g, b]));
            prop_assert_eq!(average_color(&img).unwrap(), Rgb([r, g, b]));
        }

        #[test]
        fn average_stays_within_channel_extremes(pixels in prop::collection::vec(any::<[u8; 3]>(), 1..64)) {
            let width = pixels.len() as u32;
            let raw: Vec<u8> = pixels.iter().flatten().copied().collect();
            let img = RgbImage::from_vec(width, 1, raw).unwrap();
            let avg = average_color(&img).unwrap();

            for channel in 0..3 {
                let min = pixels.iter().map(|p| p[channel]).min().unwrap();
                let max = pixels.iter().map(|p| p[channel]).max().unwrap();
                prop_assert!(avg.0[channel] >= min && avg.0[channel] <= max);
            }
        }
    }
}
