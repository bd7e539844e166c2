// End-to-end checks for concept compositing through the public API
use concept_generator::compositor::{
    ComposeError, Compositor, CompositorConfig, average_color, compose, contrast_color,
    fit_logo_size,
};
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use proptest::prelude::*;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
}

#[test]
fn fresh_start_scenario() {
    let background = solid(400, 300, [30, 30, 30]);
    let out = compose(background, None, "Fresh Start", 1).expect("compose");

    assert_eq!(out.dimensions(), (400, 400));

    for y in 0..300 {
        for x in 0..400 {
            assert_eq!(*out.get_pixel(x, y), Rgb([30, 30, 30]), "background changed at ({x}, {y})");
        }
    }

    let mut text_xs = Vec::new();
    let mut text_ys = Vec::new();
    for y in 300..400 {
        for x in 0..400 {
            let pixel = *out.get_pixel(x, y);
            if pixel == WHITE {
                text_xs.push(x);
                text_ys.push(y);
            } else {
                assert_eq!(pixel, Rgb([30, 30, 30]), "unexpected band pixel at ({x}, {y})");
            }
        }
    }

    assert!(!text_xs.is_empty(), "tagline should be drawn");
    let left = *text_xs.iter().min().expect("min x") as i64;
    let right = 399 - *text_xs.iter().max().expect("max x") as i64;
    // odd leftover space puts the extra pixel on the right
    assert!((left - right).abs() <= 1, "text not centered: left={left} right={right}");

    let top = *text_ys.iter().min().expect("min y");
    let bottom = *text_ys.iter().max().expect("max y");
    assert!(top > 300 && bottom < 399);
}

#[test]
fn output_dimensions_with_and_without_logo() {
    for (w, h) in [(1, 1), (64, 48), (400, 300), (123, 457)] {
        let out = compose(solid(w, h, [200, 10, 10]), None, "Hi", 1).expect("compose");
        assert_eq!(out.dimensions(), (w, h + 100));

        let logo = RgbaImage::from_pixel(500, 500, Rgba([0, 0, 255, 255]));
        let out = compose(solid(w, h, [200, 10, 10]), Some(&logo), "Hi", 1).expect("compose");
        assert_eq!(out.dimensions(), (w, h + 100));
    }
}

#[test]
fn oversized_logo_is_scaled_into_bounds() {
    let config = CompositorConfig::default();
    let (target_w, target_h) =
        fit_logo_size((800, 600), (400, 300), &config).expect("logo should be resized");

    assert!(target_w <= 200 && target_h <= 60);
    let ratio = target_w as f64 / target_h as f64;
    assert!((ratio - 800.0 / 600.0).abs() / (800.0 / 600.0) < 0.01);

    let logo = RgbaImage::from_pixel(800, 600, Rgba([255, 0, 0, 255]));
    let out = compose(solid(400, 300, [0, 0, 0]), Some(&logo), "", 1).expect("compose");

    for (x, y) in [(0, 0), (target_w - 1, target_h - 1)] {
        let Rgb([r, g, b]) = *out.get_pixel(x, y);
        assert!(r >= 250 && g <= 5 && b <= 5, "logo pixel ({x}, {y}) = {:?}", (r, g, b));
    }
    assert_eq!(*out.get_pixel(target_w, 0), Rgb([0, 0, 0]));
    assert_eq!(*out.get_pixel(0, target_h), Rgb([0, 0, 0]));
}

#[test]
fn logo_within_bounds_keeps_its_size() {
    let logo = RgbaImage::from_pixel(50, 20, Rgba([255, 0, 0, 255]));
    let out = compose(solid(400, 300, [0, 0, 0]), Some(&logo), "", 1).expect("compose");

    assert_eq!(*out.get_pixel(49, 19), Rgb([255, 0, 0]));
    assert_eq!(*out.get_pixel(50, 0), Rgb([0, 0, 0]));
    assert_eq!(*out.get_pixel(0, 20), Rgb([0, 0, 0]));
}

#[test]
fn transparent_logo_pixels_leave_background_untouched() {
    let mut logo = RgbaImage::from_pixel(20, 10, Rgba([255, 255, 0, 0]));
    logo.put_pixel(0, 0, Rgba([255, 255, 0, 255]));

    let out = compose(solid(400, 300, [10, 20, 30]), Some(&logo), "", 1).expect("compose");

    assert_eq!(*out.get_pixel(0, 0), Rgb([255, 255, 0]));
    for x in 1..20 {
        assert_eq!(*out.get_pixel(x, 5), Rgb([10, 20, 30]));
    }
}

#[test]
fn compose_is_idempotent() {
    let mut background = solid(120, 80, [90, 140, 200]);
    for x in 0..120 {
        background.put_pixel(x, 40, Rgb([250, 0, 0]));
    }
    let logo = RgbaImage::from_pixel(100, 40, Rgba([0, 200, 0, 128]));

    let first = compose(background.clone(), Some(&logo), "Same\nTwice", 1).expect("first");
    let second = compose(background, Some(&logo), "Same\nTwice", 1).expect("second");

    assert_eq!(first, second);
}

#[test]
fn unsupported_variant_is_rejected() {
    let result = compose(solid(10, 10, [0, 0, 0]), None, "x", 2);
    assert!(matches!(result, Err(ComposeError::UnsupportedVariant(2))));
}

#[test]
fn band_color_is_average_of_composited_background() {
    let mut background = solid(2, 2, [0, 0, 0]);
    background.put_pixel(1, 0, Rgb([255, 255, 255]));
    background.put_pixel(0, 1, Rgb([255, 0, 0]));
    background.put_pixel(1, 1, Rgb([0, 255, 0]));
    assert_eq!(average_color(&background).expect("avg"), Rgb([127, 127, 63]));

    let out = compose(background, None, "", 1).expect("compose");
    assert_eq!(*out.get_pixel(0, 50), Rgb([127, 127, 63]));
}

#[test]
fn light_background_gets_black_tagline() {
    let out = compose(solid(400, 100, [240, 240, 240]), None, "Bright", 1).expect("compose");
    let band_has_black = (100..200).any(|y| (0..400).any(|x| *out.get_pixel(x, y) == Rgb([0, 0, 0])));

    assert_eq!(contrast_color(Rgb([240, 240, 240])), Rgb([0, 0, 0]));
    assert!(band_has_black);
}

#[test]
fn custom_band_height_is_respected() {
    let config = CompositorConfig {
        caption_band_height: 40,
        ..CompositorConfig::default()
    };
    let compositor = Compositor::new(config).expect("compositor");
    let out = compositor
        .compose(solid(64, 64, [0, 0, 0]), None, "ok", 1)
        .expect("compose");

    assert_eq!(out.dimensions(), (64, 104));
}

#[test]
fn extreme_font_size_composes_without_panicking() {
    let config = CompositorConfig {
        font_size: 1e9,
        ..CompositorConfig::default()
    };
    assert!(config.validate().is_err());

    // built without validation: the bitmap scale is clamped instead of overflowing
    let compositor = Compositor::new(config).expect("compositor");
    let tagline = "Mess? Handled. Clean up in seconds.".repeat(3);
    let out = compositor
        .compose(solid(64, 64, [0, 0, 0]), None, &tagline, 1)
        .expect("compose");

    assert_eq!(out.dimensions(), (64, 164));
}

proptest! {
    #[test]
    fn average_stays_within_channel_bounds(
        pixels in proptest::collection::vec(any::<[u8; 3]>(), 1..64)
    ) {
        let width = pixels.len() as u32;
        let mut img = RgbImage::new(width, 1);
        for (x, p) in pixels.iter().enumerate() {
            img.put_pixel(x as u32, 0, Rgb(*p));
        }

        let avg = average_color(&img).expect("avg");
        for c in 0..3 {
            let min = pixels.iter().map(|p| p[c]).min().expect("min");
            let max = pixels.iter().map(|p| p[c]).max().expect("max");
            prop_assert!(avg.0[c] >= min && avg.0[c] <= max);
        }
    }
}
