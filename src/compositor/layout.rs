//! # 布局计算
//!
//! 只做几何：Logo 是否需要缩小、缩小到多大；标语文字块放在哪里。
//! 不触碰像素，方便单独测试。

use super::CompositorConfig;

/// 计算 Logo 在背景上的目标尺寸。
///
/// Logo 宽度超过 `背景宽 × logo_max_width_fraction` 或高度超过
/// `背景高 × logo_max_height_fraction` 时，按统一比例缩小到两个上限之内；
/// 否则返回 `None`，表示保持原尺寸（从不放大）。
pub fn fit_logo_size(
    logo: (u32, u32),
    background: (u32, u32),
    config: &CompositorConfig,
) -> Option<(u32, u32)> {
    let (logo_w, logo_h) = (logo.0 as f64, logo.1 as f64);
    let max_w = background.0 as f64 * config.logo_max_width_fraction;
    let max_h = background.1 as f64 * config.logo_max_height_fraction;

    if logo_w <= max_w && logo_h <= max_h {
        return None;
    }

    let scale = (max_w / logo_w).min(max_h / logo_h);
    // 1e-9 吸收 0.2 之类比例的浮点误差，避免 119.999.. 被截成 119
    let target_w = ((logo_w * scale + 1e-9).floor() as u32).max(1);
    let target_h = ((logo_h * scale + 1e-9).floor() as u32).max(1);

    Some((target_w, target_h))
}

/// 标语文字块左上角坐标：整张画布水平居中，标语带内垂直居中。
pub fn tagline_origin(
    canvas_width: u32,
    background_height: u32,
    caption_band_height: u32,
    text_size: (u32, u32),
) -> (i64, i64) {
    let x = (canvas_width as i64 - text_size.0 as i64).div_euclid(2);
    let y = background_height as i64
        + (caption_band_height as i64 - text_size.1 as i64).div_euclid(2);
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_within_bounds_is_not_resized() {
        let config = CompositorConfig::default();
        assert_eq!(fit_logo_size((200, 60), (400, 300), &config), None);
        assert_eq!(fit_logo_size((10, 10), (400, 300), &config), None);
    }

    #[test]
    fn wide_logo_is_limited_by_width() {
        let config = CompositorConfig::default();
        // 上限 200x100，宽度先触顶
        assert_eq!(fit_logo_size((800, 200), (400, 500), &config), Some((200, 50)));
    }

    #[test]
    fn tall_logo_is_limited_by_height() {
        let config = CompositorConfig::default();
        // 上限 200x60，比例 0.2
        assert_eq!(fit_logo_size((600, 300), (400, 300), &config), Some((120, 60)));
        assert_eq!(fit_logo_size((500, 500), (400, 300), &config), Some((60, 60)));
    }

    #[test]
    fn custom_fractions_are_respected() {
        let config = CompositorConfig {
            logo_max_width_fraction: 1.0,
            logo_max_height_fraction: 1.0,
            ..CompositorConfig::default()
        };
        assert_eq!(fit_logo_size((400, 300), (400, 300), &config), None);
        assert_eq!(fit_logo_size((800, 300), (400, 300), &config), Some((400, 150)));
    }

    #[test]
    fn tagline_is_centered_in_caption_band() {
        assert_eq!(tagline_origin(400, 300, 100, (352, 32)), (24, 334));
        assert_eq!(tagline_origin(400, 300, 100, (0, 0)), (200, 350));
    }

    #[test]
    fn oversized_tagline_starts_left_of_canvas() {
        let (x, y) = tagline_origin(100, 50, 100, (301, 140));
        assert_eq!(x, -101);
        assert_eq!(y, 30);
    }
}
