use std::sync::Arc;
use std::time::Instant;

use crate::compositor::Compositor;
use crate::error::AppError;
use crate::logo::LogoLoader;
use crate::services::{BackgroundService, CompletionService};

use super::prompts::{summarize_messages, tagline_messages};
use super::{ConceptRequest, ConceptResult, ConceptStage};

/// 流水线依赖的客户端集合，显式传入。
pub struct ConceptContext {
    pub background: Arc<dyn BackgroundService>,
    pub completion: Arc<dyn CompletionService>,
    pub logo_loader: LogoLoader,
    pub compositor: Compositor,
}

/// 概念生成流水线。
pub struct ConceptGenerator {
    context: ConceptContext,
}

impl ConceptGenerator {
    pub fn new(context: ConceptContext) -> Self {
        Self { context }
    }

    pub async fn generate(&self, request: &ConceptRequest) -> Result<ConceptResult, AppError> {
        self.generate_with_progress(request, |_| {}).await
    }

    /// 依次执行各阶段，每个阶段开始前回调 `on_stage`。任一阶段失败即返回。
    pub async fn generate_with_progress<F>(
        &self,
        request: &ConceptRequest,
        on_stage: F,
    ) -> Result<ConceptResult, AppError>
    where
        F: Fn(ConceptStage),
    {
        let total = Instant::now();
        let ctx = &self.context;

        let logo = if request.logo.is_none() {
            None
        } else {
            let start = enter_stage(&on_stage, ConceptStage::LoadingLogo);
            let logo = ctx.logo_loader.load(&request.logo).await?;
            leave_stage(ConceptStage::LoadingLogo, start);
            logo
        };

        let start = enter_stage(&on_stage, ConceptStage::ResolvingIdea);
        let (brand, concept) = request.idea.resolve();
        if brand.trim().is_empty() || concept.trim().is_empty() {
            return Err(AppError::Config("品牌与概念点子都不能为空".to_string()));
        }
        leave_stage(ConceptStage::ResolvingIdea, start);

        let start = enter_stage(&on_stage, ConceptStage::SummarizingConcept);
        let drawing_instructions = ctx
            .completion
            .complete(&summarize_messages(concept, brand))
            .await?;
        leave_stage(ConceptStage::SummarizingConcept, start);

        let start = enter_stage(&on_stage, ConceptStage::GeneratingBackground);
        let background = ctx
            .background
            .generate_background(&drawing_instructions)
            .await?;
        leave_stage(ConceptStage::GeneratingBackground, start);

        let start = enter_stage(&on_stage, ConceptStage::GeneratingTagline);
        let tagline = ctx.completion.complete(&tagline_messages(concept, brand)).await?;
        leave_stage(ConceptStage::GeneratingTagline, start);

        let start = enter_stage(&on_stage, ConceptStage::Composing);
        let image = ctx.compositor.compose(
            background,
            logo.as_ref(),
            &tagline,
            request.layout_variant,
        )?;
        leave_stage(ConceptStage::Composing, start);

        log::info!(
            "✅ 概念生成完成 - 品牌: {} 尺寸: {}x{} 总耗时: {}ms",
            brand,
            image.width(),
            image.height(),
            total.elapsed().as_millis()
        );

        Ok(ConceptResult {
            image,
            brand: brand.to_string(),
            concept: concept.to_string(),
            drawing_instructions,
            tagline,
        })
    }
}

fn enter_stage<F: Fn(ConceptStage)>(on_stage: &F, stage: ConceptStage) -> Instant {
    on_stage(stage);
    log::info!("▶️ {}", stage.label());
    Instant::now()
}

fn leave_stage(stage: ConceptStage, start: Instant) {
    log::info!("⏱️ {} 完成 - 耗时: {}ms", stage.label(), start.elapsed().as_millis());
}
