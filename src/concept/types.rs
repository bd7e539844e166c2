use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::logo::LogoInput;

/// 点子库中的一行。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaRow {
    pub id: i64,
    /// 产品 / 品牌描述。
    pub product: String,
    /// 来自消费者访谈的概念点子。
    pub idea_text: String,
}

/// 概念点子来源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdeaSource {
    /// 手工输入的品牌与点子。
    Manual { brand: String, concept: String },
    /// 从点子库选中的一行。
    Selected(IdeaRow),
}

impl IdeaSource {
    /// 解析为 `(brand, concept)`。
    pub fn resolve(&self) -> (&str, &str) {
        match self {
            Self::Manual { brand, concept } => (brand.as_str(), concept.as_str()),
            Self::Selected(row) => (row.product.as_str(), row.idea_text.as_str()),
        }
    }
}

/// 一次概念生成请求。
#[derive(Debug, Clone)]
pub struct ConceptRequest {
    pub idea: IdeaSource,
    pub logo: LogoInput,
    pub layout_variant: u32,
}

impl ConceptRequest {
    /// 默认布局、不带 Logo 的请求。
    pub fn new(idea: IdeaSource) -> Self {
        Self {
            idea,
            logo: LogoInput::None,
            layout_variant: 1,
        }
    }

    pub fn with_logo(mut self, logo: LogoInput) -> Self {
        self.logo = logo;
        self
    }
}

/// 流水线阶段，按执行顺序排列。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptStage {
    LoadingLogo,
    ResolvingIdea,
    SummarizingConcept,
    GeneratingBackground,
    GeneratingTagline,
    Composing,
}

impl ConceptStage {
    pub fn label(self) -> &'static str {
        match self {
            Self::LoadingLogo => "加载 Logo",
            Self::ResolvingIdea => "确定概念点子",
            Self::SummarizingConcept => "生成绘图指令",
            Self::GeneratingBackground => "生成背景",
            Self::GeneratingTagline => "生成标语",
            Self::Composing => "合成概念图",
        }
    }
}

/// 概念生成结果：最终图片与各阶段的文本产物。
#[derive(Debug, Clone)]
pub struct ConceptResult {
    pub image: RgbImage,
    pub brand: String,
    pub concept: String,
    pub drawing_instructions: String,
    pub tagline: String,
}

impl ConceptResult {
    pub fn summary(&self) -> ConceptSummary<'_> {
        ConceptSummary {
            brand: &self.brand,
            concept: &self.concept,
            drawing_instructions: &self.drawing_instructions,
            tagline: &self.tagline,
            width: self.image.width(),
            height: self.image.height(),
        }
    }
}

/// 结果的文本部分，供 `--json` 输出。
#[derive(Debug, Serialize)]
pub struct ConceptSummary<'a> {
    pub brand: &'a str,
    pub concept: &'a str,
    pub drawing_instructions: &'a str,
    pub tagline: &'a str,
    pub width: u32,
    pub height: u32,
}
