//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理不同来源（URL / Stage / 本地文件 / Base64）的原始字节加载，
//! 并在“尽可能早”的阶段执行输入校验，尽快失败。
//!
//! ## 实现思路
//!
//! - URL：协议 + 主机安全 + 手动跟随重定向（逐跳校验）+ 内容类型 + 体积校验 + 流式下载。
//! - Stage：解析引用 → 映射到 `stage_root` 下的本地文件。
//! - 文件：存在性 + metadata 体积限制 + 读取。
//! - Base64：格式解析 + 解码前体积估算。
//! - 所有来源最终都做一次文件签名（magic bytes）校验，再进入解码。
//!
//! 单次请求、单次往返，不做重试与缓存。

use std::net::IpAddr;
use std::path::Path;
use std::time::{Duration, Instant};

use base64::{Engine as _, engine::general_purpose};
use image::RgbaImage;

use super::decode::decode_image;
use super::source::{RawLogoData, StageRef};
use super::{LogoConfig, LogoError, LogoInput};

const STREAM_SIGNATURE_PROBE_BYTES: usize = 4096;
const BUFFER_INITIAL_CAPACITY: usize = 16 * 1024;

/// Logo 加载器。
///
/// 持有配置与复用型 HTTP 客户端（不自动跟随重定向，由加载器逐跳校验）。
pub struct LogoLoader {
    config: LogoConfig,
    client: reqwest::Client,
}

impl LogoLoader {
    /// 根据配置创建加载器。
    pub fn new(config: LogoConfig) -> Result<Self, LogoError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.download_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| LogoError::Network(format!("无法创建 HTTP 客户端：{}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LogoConfig {
        &self.config
    }

    /// 处理主入口：按来源加载并解码 Logo。`LogoInput::None` 返回 `Ok(None)`。
    pub async fn load(&self, input: &LogoInput) -> Result<Option<RgbaImage>, LogoError> {
        let start = Instant::now();

        let raw = match input {
            LogoInput::None => return Ok(None),
            LogoInput::Url(url) => self.load_from_url(url).await?,
            LogoInput::Stage(stage) => self.load_from_stage(stage)?,
            LogoInput::File(path) => self.load_from_file(path)?,
            LogoInput::Base64(data) => self.load_from_base64(data)?,
        };

        let decoded = decode_image(&raw.bytes, self.config.max_decoded_pixels)?;
        let rgba = decoded.to_rgba8();

        log::info!(
            "✅ Logo 加载完成 - 来源: {} 尺寸: {}x{} 耗时: {}ms",
            raw.source_hint,
            rgba.width(),
            rgba.height(),
            start.elapsed().as_millis()
        );

        Ok(Some(rgba))
    }

    /// 从 URL 加载原始字节。
    pub(super) async fn load_from_url(&self, url: &str) -> Result<RawLogoData, LogoError> {
        log::info!("🌐 开始下载 Logo - URL: {}", redact_url_for_log(url));

        validate_url_safety(url, &self.config)?;
        let bytes = self.download_with_validation(url).await?;
        validate_image_signature(&bytes)?;

        Ok(RawLogoData {
            bytes,
            source_hint: "url",
        })
    }

    /// 从 Stage 引用加载原始字节。
    pub(super) fn load_from_stage(&self, stage: &StageRef) -> Result<RawLogoData, LogoError> {
        let root = self.config.stage_root.as_deref().ok_or_else(|| {
            LogoError::FileSystem(format!("未配置 stage_root，无法读取 {}", stage))
        })?;
        let path = stage.resolve(root)?;

        log::info!("📦 读取 Stage Logo - {} -> {}", stage, path.display());

        let mut raw = self.load_from_file(&path)?;
        raw.source_hint = "stage";
        Ok(raw)
    }

    /// 从本地路径加载原始字节。
    pub(super) fn load_from_file(&self, path: &Path) -> Result<RawLogoData, LogoError> {
        log::info!("📁 开始读取本地 Logo - 路径: {}", path.display());

        if !path.exists() {
            return Err(LogoError::FileSystem(format!("文件不存在：{}", path.display())));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| LogoError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if metadata.len() > self.config.max_file_size {
            return Err(LogoError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                self.config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| LogoError::FileSystem(format!("无法读取图片文件：{}", e)))?;
        validate_image_signature(&bytes)?;

        Ok(RawLogoData {
            bytes,
            source_hint: "file",
        })
    }

    /// 从 Base64 字符串加载原始字节。
    pub(super) fn load_from_base64(&self, data: &str) -> Result<RawLogoData, LogoError> {
        log::info!("📝 开始处理 base64 Logo");

        let bytes = parse_base64_with_limit(data, self.config.max_file_size)?;
        if bytes.len() as u64 > self.config.max_file_size {
            return Err(LogoError::ResourceLimit(format!(
                "Base64 解码后体积过大：{:.2} MB（限制：{:.2} MB）",
                bytes.len() as f64 / 1024.0 / 1024.0,
                self.config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }
        validate_image_signature(&bytes)?;

        Ok(RawLogoData {
            bytes,
            source_hint: "base64",
        })
    }

    /// 执行带校验的网络下载，手动跟随重定向。
    async fn download_with_validation(&self, url: &str) -> Result<Vec<u8>, LogoError> {
        let config = &self.config;
        let mut current_url = reqwest::Url::parse(url)
            .map_err(|e| LogoError::InvalidFormat(format!("URL 格式错误：{}", e)))?;

        for redirect_count in 0..=config.max_redirects {
            let response = self
                .client
                .get(current_url.clone())
                .header(
                    reqwest::header::ACCEPT,
                    "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8",
                )
                .send()
                .await
                .map_err(|e| map_reqwest_error(e, current_url.as_str(), config))?;

            if response.status().is_redirection() {
                if redirect_count >= config.max_redirects {
                    return Err(LogoError::Network(format!(
                        "重定向次数超过限制（{}）",
                        config.max_redirects
                    )));
                }

                let location = response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .ok_or_else(|| LogoError::Network("重定向响应缺少 Location 头".to_string()))?;
                let location_str = location
                    .to_str()
                    .map_err(|e| LogoError::InvalidFormat(format!("重定向地址无效：{}", e)))?;
                let next_url = current_url
                    .join(location_str)
                    .map_err(|e| LogoError::InvalidFormat(format!("重定向 URL 解析失败：{}", e)))?;

                validate_url_safety(next_url.as_str(), config)?;

                log::debug!("↪️ 跳转到: {}", redact_url_for_log(next_url.as_str()));
                current_url = next_url;
                continue;
            }

            if !response.status().is_success() {
                return Err(LogoError::Network(format!(
                    "HTTP {}: {}",
                    response.status().as_u16(),
                    status_message(response.status().as_u16())
                )));
            }

            if let Some(ct) = response.headers().get(reqwest::header::CONTENT_TYPE) {
                if let Ok(ct_str) = ct.to_str() {
                    if !is_image_content_type(ct_str) {
                        return Err(LogoError::InvalidFormat(format!("不是图片类型：{}", ct_str)));
                    }
                }
            }

            let total_len = response
                .headers()
                .get(reqwest::header::CONTENT_LENGTH)
                .and_then(|cl| cl.to_str().ok())
                .and_then(|cl| cl.parse::<u64>().ok());

            if let Some(size) = total_len {
                if size > config.max_file_size {
                    return Err(LogoError::ResourceLimit(format!(
                        "文件过大：{:.2} MB（限制：{:.2} MB）",
                        size as f64 / 1024.0 / 1024.0,
                        config.max_file_size as f64 / 1024.0 / 1024.0
                    )));
                }
            }

            let initial_capacity = total_len
                .map(|len| len.min(config.max_file_size) as usize)
                .filter(|len| *len > 0)
                .unwrap_or(BUFFER_INITIAL_CAPACITY);
            let mut buffer = Vec::with_capacity(initial_capacity);
            let mut response = response;
            let mut signature_validated = false;

            while let Some(chunk) = response
                .chunk()
                .await
                .map_err(|e| map_reqwest_error(e, current_url.as_str(), config))?
            {
                if (buffer.len() + chunk.len()) as u64 > config.max_file_size {
                    return Err(LogoError::ResourceLimit("下载后文件超过大小限制".to_string()));
                }
                buffer.extend_from_slice(&chunk);

                if !signature_validated {
                    signature_validated =
                        validate_stream_signature_probe(&buffer, STREAM_SIGNATURE_PROBE_BYTES)?;
                }
            }

            log::debug!("✅ 下载完成 - {} bytes", buffer.len());
            return Ok(buffer);
        }

        Err(LogoError::Network("下载流程异常结束".to_string()))
    }
}

/// 校验 URL 安全性。
///
/// 默认阻止本地/内网目标，防止 SSRF 风险。
fn validate_url_safety(url: &str, config: &LogoConfig) -> Result<(), LogoError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| LogoError::InvalidFormat(format!("URL 格式错误：{}", e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(LogoError::BlockedUrl("仅支持 HTTP/HTTPS".to_string()));
    }

    if config.allow_private_network {
        return Ok(());
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| LogoError::BlockedUrl("URL 缺少主机地址".to_string()))?;

    if is_local_hostname(host) {
        return Err(LogoError::BlockedUrl(format!("禁止访问本地网络地址：{}", host)));
    }

    let bare = host.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = bare.parse::<IpAddr>() {
        if is_private_or_local_ip(ip) {
            return Err(LogoError::BlockedUrl(format!("禁止访问内网 IP：{}", ip)));
        }
    }

    Ok(())
}

fn is_local_hostname(host: &str) -> bool {
    host.eq_ignore_ascii_case("localhost")
        || host.eq_ignore_ascii_case("localhost.")
        || host.ends_with(".local")
}

/// 判断 IP 是否属于本地/内网/链路本地等受限范围。
fn is_private_or_local_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            if v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_broadcast()
                || v4.is_documentation()
                || v4.is_unspecified()
                || v4.is_multicast()
            {
                return true;
            }

            let octets = v4.octets();
            octets[0] == 0 || (octets[0] == 100 && (octets[1] & 0b1100_0000) == 0b0100_0000)
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                || v6.is_unique_local()
                || v6.is_unicast_link_local()
                || v6.is_multicast()
        }
    }
}

fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|base| base.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false)
}

fn redact_url_for_log(url: &str) -> String {
    let Ok(parsed) = reqwest::Url::parse(url) else {
        return "<invalid-url>".to_string();
    };

    let host = parsed.host_str().unwrap_or("<unknown-host>");
    let port = parsed.port().map(|p| format!(":{}", p)).unwrap_or_default();

    format!("{}://{}{}{}", parsed.scheme(), host, port, parsed.path())
}

fn map_reqwest_error(e: reqwest::Error, url: &str, config: &LogoConfig) -> LogoError {
    let err_msg = e.to_string().replace(url, &redact_url_for_log(url));

    if e.is_timeout() {
        LogoError::Timeout(format!("下载超时（{}秒）", config.download_timeout))
    } else if e.is_connect() {
        LogoError::Network(format!("无法连接：{}", err_msg))
    } else {
        LogoError::Network(format!("请求失败：{}", err_msg))
    }
}

fn status_message(code: u16) -> &'static str {
    match code {
        404 => "未找到",
        403 => "访问被拒绝（站点可能禁止直链，可调整 user_agent）",
        500..=599 => "服务器错误",
        _ => "请求失败",
    }
}

fn estimate_base64_decoded_upper_bound_len(base64_data: &str) -> u64 {
    let len = base64_data.trim().len() as u64;
    len.div_ceil(4) * 3
}

/// 解析 Base64 输入（支持 Data URL / 纯 Base64），解码前先按体积上限估算。
fn parse_base64_with_limit(data: &str, max_file_size: u64) -> Result<Vec<u8>, LogoError> {
    let normalized = data.trim();

    let payload = if normalized.starts_with("data:image/") {
        let base64_start = normalized
            .find(";base64,")
            .ok_or_else(|| LogoError::InvalidFormat("缺少 base64 标记".to_string()))?;
        &normalized[base64_start + 8..]
    } else {
        normalized
    };

    let estimated_len = estimate_base64_decoded_upper_bound_len(payload);
    if estimated_len > max_file_size {
        return Err(LogoError::ResourceLimit(format!(
            "Base64 预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
            estimated_len as f64 / 1024.0 / 1024.0,
            max_file_size as f64 / 1024.0 / 1024.0
        )));
    }

    general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| LogoError::Decode(format!("Base64 解码失败：{}", e)))
}

/// 通过文件签名（magic bytes）校验输入是否为图片。
fn validate_image_signature(bytes: &[u8]) -> Result<(), LogoError> {
    if bytes.is_empty() {
        return Err(LogoError::InvalidFormat("图片内容为空".to_string()));
    }

    let kind = infer::get(bytes)
        .ok_or_else(|| LogoError::InvalidFormat("无法识别图片类型".to_string()))?;

    if kind.matcher_type() != infer::MatcherType::Image {
        return Err(LogoError::InvalidFormat(format!(
            "文件签名不是图片类型：{}",
            kind.mime_type()
        )));
    }

    Ok(())
}

/// 流式下载阶段的签名探测：尽早识别并拒绝非图片内容。
///
/// - `Ok(true)`：已识别为图片
/// - `Ok(false)`：字节不足以判断，继续下载
/// - `Err(...)`：已识别为非图片，或达到探测上限仍无法识别
fn validate_stream_signature_probe(bytes: &[u8], probe_limit: usize) -> Result<bool, LogoError> {
    if bytes.is_empty() {
        return Ok(false);
    }

    if let Some(kind) = infer::get(bytes) {
        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(LogoError::InvalidFormat(format!(
                "下载内容不是图片类型：{}",
                kind.mime_type()
            )));
        }
        return Ok(true);
    }

    if bytes.len() >= probe_limit {
        return Err(LogoError::InvalidFormat(format!(
            "下载前 {} 字节内无法识别图片类型",
            probe_limit
        )));
    }

    Ok(false)
}
