//! # 概念生成模块（concept）
//!
//! ## 设计思路
//!
//! 把“点子 → 绘图指令 → 背景 → 标语 → 合成”串成一条顺序流水线。
//! 外部服务与合成器都由 `ConceptContext` 显式注入，没有全局会话；
//! 每个阶段单次调用、失败即返回，不做重试。
//!
//! ## 实现思路
//!
//! - `types`：请求 / 结果 / 阶段等数据模型
//! - `prompts`：两类 LLM 提示词
//! - `generator`：流水线本身，阶段进度回调 + 计时日志
//! - `ideas`：SQLite 点子库（消费者访谈点子）
//!
//! ```text
//! ConceptGenerator::generate(request)
//!    ├─ LoadingLogo          LogoLoader::load（无 Logo 时跳过）
//!    ├─ ResolvingIdea        IdeaSource → (brand, concept)
//!    ├─ SummarizingConcept   CompletionService（summarize_messages）
//!    ├─ GeneratingBackground BackgroundService（绘图指令）
//!    ├─ GeneratingTagline    CompletionService（tagline_messages）
//!    └─ Composing            Compositor::compose
//! ```

mod generator;
mod ideas;
pub mod prompts;
mod types;

pub use generator::{ConceptContext, ConceptGenerator};
pub use ideas::IdeaRepository;
pub use types::{
    ConceptRequest, ConceptResult, ConceptStage, ConceptSummary, IdeaRow, IdeaSource,
};
