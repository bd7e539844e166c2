//! # 合成错误模型
//!
//! ## 设计思路
//!
//! 合成链路只有三类失败：输入图片非法、文字度量/绘制失败、布局编号不受支持。
//! 三者均同步返回给直接调用方，合成器内部不做任何重试。

/// 概念图合成错误。
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// 背景或 Logo 尺寸非法（零面积、画布高度溢出等）。
    #[error("图片输入非法：{0}")]
    InvalidImage(String),

    /// 字体加载、字体度量或文字绘制失败。
    #[error("文字渲染失败：{0}")]
    Render(String),

    /// 未知的布局编号（当前仅支持 1）。
    #[error("不支持的布局编号：{0}（当前仅支持 1）")]
    UnsupportedVariant(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_variant_message_names_the_variant() {
        let err = ComposeError::UnsupportedVariant(2);
        assert!(err.to_string().contains('2'));
    }
}
