//! # 文生图 HTTP 服务
//!
//! ## 协议
//!
//! 请求：`POST {endpoint}`，JSON 体 `{"model", "version", "service", "prompt"}`。
//!
//! 响应：`{"images": [payload, ...]}`，取第一张。`payload` 两种形态：
//! - 原始像素数组：行 × 列 × 通道（3 或 4，alpha 丢弃）
//! - Base64 编码的图片文件（PNG/JPEG 等）

use std::io::Cursor;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use image::{ImageReader, RgbImage};
use serde::{Deserialize, Serialize};

use super::{BackgroundService, BackgroundServiceConfig, ServiceError};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    version: &'a str,
    service: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    images: Vec<ImagePayload>,
}

/// 服务返回的单张图片。
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ImagePayload {
    /// 行 × 列 × 通道 的原始像素值。
    Pixels(Vec<Vec<Vec<u8>>>),
    /// Base64 编码的图片文件。
    Encoded(String),
}

impl ImagePayload {
    /// 转换为 RGB 图片。
    pub fn into_rgb(self) -> Result<RgbImage, ServiceError> {
        match self {
            Self::Pixels(rows) => image_from_pixel_rows(&rows),
            Self::Encoded(data) => decode_encoded_image(&data),
        }
    }
}

/// 将原始像素数组（行 × 列 × 通道）转换为 RGB 图片。
///
/// 要求非空、每行等长、每个像素 3 或 4 个通道（第 4 通道视为 alpha 并丢弃）。
pub fn image_from_pixel_rows(rows: &[Vec<Vec<u8>>]) -> Result<RgbImage, ServiceError> {
    let height = rows.len();
    let width = rows.first().map(Vec::len).unwrap_or(0);
    if height == 0 || width == 0 {
        return Err(ServiceError::InvalidResponse(format!(
            "像素数组为空：{}x{}",
            width, height
        )));
    }

    let mut raw = Vec::with_capacity(width * height * 3);
    for (y, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(ServiceError::InvalidResponse(format!(
                "像素数组第 {} 行长度 {} 与首行 {} 不一致",
                y,
                row.len(),
                width
            )));
        }
        for (x, pixel) in row.iter().enumerate() {
            match pixel.as_slice() {
                [r, g, b] | [r, g, b, _] => raw.extend_from_slice(&[*r, *g, *b]),
                other => {
                    return Err(ServiceError::InvalidResponse(format!(
                        "像素 ({}, {}) 通道数 {} 非法（应为 3 或 4）",
                        x,
                        y,
                        other.len()
                    )));
                }
            }
        }
    }

    let (width, height) = (
        u32::try_from(width).map_err(|_| ServiceError::InvalidResponse("图片宽度溢出".to_string()))?,
        u32::try_from(height).map_err(|_| ServiceError::InvalidResponse("图片高度溢出".to_string()))?,
    );

    RgbImage::from_raw(width, height, raw)
        .ok_or_else(|| ServiceError::InvalidResponse("像素缓冲长度异常".to_string()))
}

fn decode_encoded_image(data: &str) -> Result<RgbImage, ServiceError> {
    let payload = match data.find(";base64,") {
        Some(idx) => &data[idx + 8..],
        None => data.trim(),
    };
    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ServiceError::InvalidResponse(format!("Base64 解码失败：{}", e)))?;

    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ServiceError::InvalidResponse(format!("无法识别图片格式：{}", e)))?
        .decode()
        .map_err(|e| ServiceError::InvalidResponse(format!("图片解码失败：{}", e)))?;

    let rgb = image.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(ServiceError::InvalidResponse("图片尺寸为零".to_string()));
    }
    Ok(rgb)
}

/// 基于 HTTP 的文生图服务。
pub struct HttpBackgroundService {
    client: reqwest::Client,
    config: BackgroundServiceConfig,
    api_key: Option<String>,
}

impl HttpBackgroundService {
    pub fn new(config: BackgroundServiceConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let api_key = config.api_key();

        Ok(Self {
            client,
            config,
            api_key,
        })
    }
}

#[async_trait]
impl BackgroundService for HttpBackgroundService {
    async fn generate_background(&self, prompt: &str) -> Result<RgbImage, ServiceError> {
        let start = Instant::now();
        let body = GenerateRequest {
            model: &self.config.model,
            version: &self.config.version,
            service: &self.config.service,
            prompt,
        };

        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ServiceError::from_status(status.as_u16(), text));
        }

        let parsed: GenerateResponse = serde_json::from_slice(&response.bytes().await?)?;
        let first = parsed
            .images
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::InvalidResponse("响应中没有图片".to_string()))?;
        let image = first.into_rgb()?;

        log::info!(
            "🖼️ 背景生成完成 - 模型: {}/{} 尺寸: {}x{} 耗时: {}ms",
            self.config.model,
            self.config.version,
            image.width(),
            image.height(),
            start.elapsed().as_millis()
        );

        Ok(image)
    }
}

/// 单色像素数组，测试与示例中使用。
#[cfg(test)]
pub(crate) fn solid_pixel_rows(width: usize, height: usize, color: image::Rgb<u8>) -> Vec<Vec<Vec<u8>>> {
    vec![vec![color.0.to_vec(); width]; height]
}
