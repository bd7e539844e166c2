//! # Logo 错误模型
//!
//! 一个枚举覆盖 Logo 加载链路（URL / Stage / 文件 / Base64 → 解码）的全部失败来源。
//! 在流水线层经 `#[from]` 汇入 `AppError::Logo`。

/// Logo 加载错误。
#[derive(Debug, thiserror::Error)]
pub enum LogoError {
    /// 连接失败、非成功状态码、重定向异常。
    #[error("Logo 下载失败：{0}")]
    Network(String),

    /// 地址被安全策略拒绝（非 HTTP/HTTPS、本地或内网目标）。
    #[error("Logo 地址被拒绝：{0}")]
    BlockedUrl(String),

    /// Stage 引用格式非法或路径越界。
    #[error("Stage 引用无效：{0}")]
    InvalidStageRef(String),

    /// 字节不是可识别的图片，或内容类型不符。
    #[error("Logo 格式错误：{0}")]
    InvalidFormat(String),

    #[error("Logo 解码失败：{0}")]
    Decode(String),

    #[error("Logo 读取失败：{0}")]
    FileSystem(String),

    #[error("Logo 下载超时：{0}")]
    Timeout(String),

    /// 体积或像素数超出配置上限。
    #[error("Logo 超出限制：{0}")]
    ResourceLimit(String),
}
