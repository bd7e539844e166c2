//! # 标语字体模块
//!
//! ## 设计思路
//!
//! 标语需要“先度量再绘制”：合成器根据整块文字的包围盒计算居中位置。
//! 两种字体来源统一收敛到 `TaglineFont`：
//! - 内置点阵字体：`font8x8` 的 8x8 字形按整数倍放大，不依赖任何字体文件，永不失败
//! - TrueType/OpenType：通过 `rusttype` 加载用户提供的字体文件
//!
//! ## 实现思路
//!
//! - 点阵字体按比例排版：每个字形只占其墨迹列宽再加 1 列间隔，空白字形占固定列宽
//! - 放大倍数取 `font_size / 10`：大写字母 7 行墨迹，倍数 3 时约等于 30 号字的大写高度
//! - 多行文本按 `\n` 切分（兼容 `\r\n`），作为一个整体度量：宽取最宽行，高为各行高与行距之和
//! - 宽高一律用 `u64` 计算后再收窄，超出 `u32` 返回 `Render` 而不是溢出
//! - 行在块内左对齐，块整体由调用方居中
//! - 绘制越界部分直接裁剪，不报错

use std::path::Path;

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use rusttype::{Font, Scale, point};

use super::config::MAX_FONT_SIZE;
use super::{ComposeError, CompositorConfig};

const GLYPH_CELLS: u32 = 8;
/// 字形之间的间隔列数。
const GAP_CELLS: u32 = 1;
/// 无墨迹字形（空格等）的步进列数。
const BLANK_ADVANCE_CELLS: u32 = 3;
/// 字号到放大倍数的换算因子。
const FONT_SIZE_PER_SCALE: f32 = 10.0;
const MAX_BITMAP_SCALE: u32 = (MAX_FONT_SIZE / FONT_SIZE_PER_SCALE) as u32;

/// 标语字体。
pub enum TaglineFont {
    /// 内置点阵字体。
    Builtin(BitmapFont),
    /// 从字体文件加载的矢量字体。
    TrueType(VectorFont),
}

/// 内置点阵字体：每个字形 8x8，按 `scale` 倍放大。
#[derive(Debug, Clone, Copy)]
pub struct BitmapFont {
    scale: u32,
    line_spacing: u32,
}

/// 单个点阵字形：位图、墨迹起始列与步进列数。
#[derive(Debug, Clone, Copy)]
struct BitmapGlyph {
    rows: [u8; 8],
    left: u32,
    advance: u32,
}

/// 基于 `rusttype` 的矢量字体。
pub struct VectorFont {
    font: Font<'static>,
    scale: Scale,
    line_spacing: u32,
}

impl TaglineFont {
    /// 根据合成配置选择字体：配置了 `font_path` 则加载文件，否则使用内置字体。
    pub fn from_config(config: &CompositorConfig) -> Result<Self, ComposeError> {
        match &config.font_path {
            Some(path) => Self::from_file(path, config.font_size, config.line_spacing),
            None => Ok(Self::builtin(config.font_size, config.line_spacing)),
        }
    }

    /// 内置点阵字体。放大倍数取 `font_size / 10` 的最接近整数，限制在 `[1, 51]`。
    pub fn builtin(font_size: f32, line_spacing: u32) -> Self {
        let scale = (font_size / FONT_SIZE_PER_SCALE).round();
        let scale = if scale.is_finite() {
            (scale as u32).clamp(1, MAX_BITMAP_SCALE)
        } else {
            1
        };
        Self::Builtin(BitmapFont { scale, line_spacing })
    }

    /// 从字体文件加载。
    pub fn from_file(path: &Path, font_size: f32, line_spacing: u32) -> Result<Self, ComposeError> {
        let bytes = std::fs::read(path).map_err(|e| {
            ComposeError::Render(format!("无法读取字体文件 {}：{}", path.display(), e))
        })?;
        Self::from_bytes(bytes, font_size, line_spacing)
    }

    /// 从字体字节加载。字号越界或字节无法解析为字体时返回 `Render`。
    pub fn from_bytes(bytes: Vec<u8>, font_size: f32, line_spacing: u32) -> Result<Self, ComposeError> {
        if !font_size.is_finite() || font_size <= 0.0 || font_size > MAX_FONT_SIZE {
            return Err(ComposeError::Render(format!(
                "字号必须在 (0, {}] 区间内（当前：{}）",
                MAX_FONT_SIZE, font_size
            )));
        }
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| ComposeError::Render("字体数据无法解析".to_string()))?;

        Ok(Self::TrueType(VectorFont {
            font,
            scale: Scale::uniform(font_size),
            line_spacing,
        }))
    }

    /// 度量整块文字的包围盒 `(宽, 高)`。空文本返回 `(0, 0)`。
    pub fn measure(&self, text: &str) -> Result<(u32, u32), ComposeError> {
        let lines = split_lines(text);
        if lines.is_empty() {
            return Ok((0, 0));
        }

        let (width, line_height, spacing) = match self {
            Self::Builtin(font) => {
                let mut width = 0;
                for line in &lines {
                    width = width.max(font.line_width(line)?);
                }
                (width, font.glyph_size(), font.line_spacing)
            }
            Self::TrueType(font) => {
                let line_height = font.line_height()?;
                let width = lines
                    .iter()
                    .map(|line| font.line_width(line))
                    .max()
                    .unwrap_or(0);
                (width, line_height, font.line_spacing)
            }
        };

        let count = lines.len() as u64;
        let height = u64::from(line_height) * count + u64::from(spacing) * (count - 1);
        let height = u32::try_from(height).map_err(|_| {
            ComposeError::Render(format!(
                "标语高度溢出：{} 行，行高 {}，行距 {}",
                count, line_height, spacing
            ))
        })?;
        Ok((width, height))
    }

    /// 以 `(x, y)` 为文字块左上角绘制标语。
    pub fn draw(
        &self,
        canvas: &mut RgbImage,
        x: i64,
        y: i64,
        text: &str,
        color: Rgb<u8>,
    ) -> Result<(), ComposeError> {
        let lines = split_lines(text);

        match self {
            Self::Builtin(font) => {
                let advance = i64::from(font.glyph_size()) + i64::from(font.line_spacing);
                for (idx, line) in lines.iter().enumerate() {
                    font.draw_line(canvas, x, y + idx as i64 * advance, line, color);
                }
            }
            Self::TrueType(font) => {
                let advance = i64::from(font.line_height()?) + i64::from(font.line_spacing);
                for (idx, line) in lines.iter().enumerate() {
                    font.draw_line(canvas, x, y + idx as i64 * advance, line, color);
                }
            }
        }

        Ok(())
    }
}

impl BitmapFont {
    /// 行高。`scale` 不超过 `MAX_BITMAP_SCALE`，不会溢出。
    fn glyph_size(&self) -> u32 {
        GLYPH_CELLS * self.scale
    }

    /// 行宽：各字形步进之和，去掉末尾间隔。
    fn line_width(&self, line: &str) -> Result<u32, ComposeError> {
        let cells: u64 = line.chars().map(|ch| u64::from(Self::glyph(ch).advance)).sum();
        let width = cells.saturating_sub(u64::from(GAP_CELLS)) * u64::from(self.scale);
        u32::try_from(width).map_err(|_| {
            ComposeError::Render(format!("标语行宽溢出：{} 个字符", line.chars().count()))
        })
    }

    fn glyph(ch: char) -> BitmapGlyph {
        let rows = BASIC_FONTS
            .get(ch)
            .or_else(|| LATIN_FONTS.get(ch))
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8]);

        let columns = rows.iter().fold(0u8, |acc, bits| acc | bits);
        if columns == 0 {
            return BitmapGlyph {
                rows,
                left: 0,
                advance: BLANK_ADVANCE_CELLS,
            };
        }
        // 低位在左
        let left = columns.trailing_zeros();
        let right = u8::BITS - columns.leading_zeros();
        BitmapGlyph {
            rows,
            left,
            advance: right - left + GAP_CELLS,
        }
    }

    fn draw_line(&self, canvas: &mut RgbImage, x: i64, y: i64, line: &str, color: Rgb<u8>) {
        let scale = i64::from(self.scale);
        let mut pen_x = x;

        for ch in line.chars() {
            let glyph = Self::glyph(ch);
            for (row, bits) in glyph.rows.iter().enumerate() {
                for bit in glyph.left..GLYPH_CELLS {
                    if bits & (1 << bit) == 0 {
                        continue;
                    }
                    let block_x = pen_x + i64::from(bit - glyph.left) * scale;
                    let block_y = y + row as i64 * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            put_pixel_clipped(canvas, block_x + dx, block_y + dy, color);
                        }
                    }
                }
            }
            pen_x += i64::from(glyph.advance) * scale;
        }
    }
}

impl VectorFont {
    fn line_height(&self) -> Result<u32, ComposeError> {
        let v_metrics = self.font.v_metrics(self.scale);
        let height = (v_metrics.ascent - v_metrics.descent).ceil();
        if !height.is_finite() || height <= 0.0 {
            return Err(ComposeError::Render(format!(
                "字体纵向度量异常：ascent={} descent={}",
                v_metrics.ascent, v_metrics.descent
            )));
        }
        Ok(height as u32)
    }

    fn line_width(&self, line: &str) -> u32 {
        if line.is_empty() {
            return 0;
        }
        let ascent = self.font.v_metrics(self.scale).ascent;
        self.font
            .layout(line, self.scale, point(0.0, ascent))
            .filter_map(|glyph| glyph.pixel_bounding_box())
            .map(|bb| bb.max.x.max(0) as u32)
            .max()
            .unwrap_or(0)
    }

    fn draw_line(&self, canvas: &mut RgbImage, x: i64, y: i64, line: &str, color: Rgb<u8>) {
        let ascent = self.font.v_metrics(self.scale).ascent;
        let origin = point(x as f32, y as f32 + ascent);

        for glyph in self.font.layout(line, self.scale, origin) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i64 + bb.min.x as i64;
                let py = gy as i64 + bb.min.y as i64;
                blend_pixel_clipped(canvas, px, py, color, coverage);
            });
        }
    }
}

fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

fn put_pixel_clipped(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    canvas.put_pixel(x as u32, y as u32, color);
}

fn blend_pixel_clipped(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let alpha = coverage.clamp(0.0, 1.0);
    if alpha == 0.0 {
        return;
    }
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    for (d, s) in dst.0.iter_mut().zip(color.0) {
        *d = (s as f32 * alpha + *d as f32 * (1.0 - alpha)).round() as u8;
    }
}
