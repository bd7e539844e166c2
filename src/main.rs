//! # 概念图生成器 — 命令行入口
//!
//! 本文件仅负责参数解析、依赖组装与结果输出。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use image::RgbImage;

use concept_generator::compositor::Compositor;
use concept_generator::concept::{
    ConceptContext, ConceptGenerator, ConceptRequest, IdeaRepository, IdeaSource,
};
use concept_generator::error::AppError;
use concept_generator::logo::{LogoInput, LogoLoader, decode_image};
use concept_generator::services::{HttpBackgroundService, HttpCompletionService};
use concept_generator::settings::AppConfig;

#[derive(Parser)]
#[command(name = "concept-generator")]
#[command(about = "生成营销概念图：背景 + Logo + 标语")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON 配置文件路径
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 以 JSON 输出文本结果
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 离线合成：已有背景图 + 可选 Logo + 标语
    Compose(ComposeArgs),

    /// 完整流水线：点子 → 绘图指令 → 背景 → 标语 → 合成
    Generate(GenerateArgs),

    /// 点子库管理
    #[command(subcommand)]
    Ideas(IdeasCommand),
}

#[derive(Args)]
struct ComposeArgs {
    /// 背景图片文件
    #[arg(long)]
    background: PathBuf,

    /// Logo：文件路径、http(s) 地址、@db.schema.stage/file 或 data:image/...
    #[arg(long)]
    logo: Option<String>,

    /// 标语文本，可包含 `\n` 换行
    #[arg(long, default_value = "")]
    tagline: String,

    /// 布局编号
    #[arg(long, default_value_t = 1)]
    variant: u32,

    /// 输出 PNG 路径，默认按时间戳命名
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct GenerateArgs {
    /// 品牌描述（与 --concept 一起使用）
    #[arg(long, requires = "concept", conflicts_with = "idea_id")]
    brand: Option<String>,

    /// 概念点子
    #[arg(long, requires = "brand")]
    concept: Option<String>,

    /// 从点子库选择的点子 id
    #[arg(long)]
    idea_id: Option<i64>,

    /// Logo 来源，格式同 compose
    #[arg(long)]
    logo: Option<String>,

    /// 布局编号
    #[arg(long, default_value_t = 1)]
    variant: u32,

    /// 输出 PNG 路径，默认按时间戳命名
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum IdeasCommand {
    /// 列出点子
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// 新增点子
    Add {
        #[arg(long)]
        product: String,
        #[arg(long)]
        idea: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let json = cli.json;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("❌ {}", err);
            if json {
                if let Err(print_err) = print_json(&serde_json::json!({ "error": err })) {
                    eprintln!("错误: {} ({})", err, print_err);
                }
            } else {
                eprintln!("错误: {}", err);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Compose(args) => compose(args, &config, cli.json).await,
        Commands::Generate(args) => generate(args, &config, cli.json).await,
        Commands::Ideas(command) => ideas(command, &config, cli.json),
    }
}

async fn compose(args: ComposeArgs, config: &AppConfig, json: bool) -> Result<(), AppError> {
    let bytes = std::fs::read(&args.background)?;
    let background = decode_image(&bytes, config.logo.max_decoded_pixels)?.to_rgb8();

    let logo_input = parse_logo(args.logo.as_deref())?;
    let logo = LogoLoader::new(config.logo.clone())?.load(&logo_input).await?;

    let compositor = Compositor::new(config.compositor.clone())?;
    let tagline = unescape_newlines(&args.tagline);
    let image = compositor.compose(background, logo.as_ref(), &tagline, args.variant)?;

    let output = args.output.unwrap_or_else(default_output_path);
    save_png(&image, &output)?;

    if json {
        print_json(&serde_json::json!({
            "output": output,
            "width": image.width(),
            "height": image.height(),
        }))?;
    } else {
        println!("已保存: {} ({}x{})", output.display(), image.width(), image.height());
    }
    Ok(())
}

async fn generate(args: GenerateArgs, config: &AppConfig, json: bool) -> Result<(), AppError> {
    let idea = match (args.brand, args.concept, args.idea_id) {
        (Some(brand), Some(concept), None) => IdeaSource::Manual { brand, concept },
        (None, None, Some(id)) => {
            let repo = IdeaRepository::open(&config.idea_db_path())?;
            let row = repo
                .get(id)?
                .ok_or_else(|| AppError::Config(format!("点子库中不存在 id = {}", id)))?;
            IdeaSource::Selected(row)
        }
        _ => {
            return Err(AppError::Config(
                "需要指定 --brand 与 --concept，或 --idea-id".to_string(),
            ));
        }
    };

    let mut request = ConceptRequest::new(idea).with_logo(parse_logo(args.logo.as_deref())?);
    request.layout_variant = args.variant;

    let generator = ConceptGenerator::new(ConceptContext {
        background: Arc::new(HttpBackgroundService::new(config.image_service.clone())?),
        completion: Arc::new(HttpCompletionService::new(config.completion.clone())?),
        logo_loader: LogoLoader::new(config.logo.clone())?,
        compositor: Compositor::new(config.compositor.clone())?,
    });

    let result = generator
        .generate_with_progress(&request, |stage| {
            if !json {
                eprintln!("… {}", stage.label());
            }
        })
        .await?;

    let output = args.output.unwrap_or_else(default_output_path);
    save_png(&result.image, &output)?;

    if json {
        let mut value = serde_json::to_value(result.summary())
            .map_err(|e| AppError::Encode(format!("结果序列化失败: {}", e)))?;
        value["output"] = serde_json::json!(output);
        print_json(&value)?;
    } else {
        println!("## 概念点子\n{}\n", result.concept);
        println!("## 绘图指令\n{}\n", result.drawing_instructions);
        println!("## 标语\n{}\n", result.tagline);
        println!("已保存: {}", output.display());
    }
    Ok(())
}

fn ideas(command: IdeasCommand, config: &AppConfig, json: bool) -> Result<(), AppError> {
    let repo = IdeaRepository::open(&config.idea_db_path())?;

    match command {
        IdeasCommand::List { limit } => {
            let rows = repo.list(limit)?;
            if json {
                print_json(&rows)?;
            } else if rows.is_empty() {
                println!("点子库为空");
            } else {
                for row in rows {
                    println!("[{}] {}: {}", row.id, row.product, row.idea_text);
                }
            }
        }
        IdeasCommand::Add { product, idea } => {
            let id = repo.insert(&product, &idea)?;
            if json {
                print_json(&serde_json::json!({ "id": id }))?;
            } else {
                println!("已添加点子 id = {}", id);
            }
        }
    }
    Ok(())
}

fn parse_logo(value: Option<&str>) -> Result<LogoInput, AppError> {
    Ok(match value {
        Some(value) => LogoInput::parse(value)?,
        None => LogoInput::None,
    })
}

/// 命令行里无法直接输入换行，`\n` 字面量按换行处理。
fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

fn default_output_path() -> PathBuf {
    PathBuf::from(format!(
        "concept_{}.png",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ))
}

fn save_png(image: &RgbImage, path: &Path) -> Result<(), AppError> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| AppError::Encode(format!("保存 {} 失败: {}", path.display(), e)))?;
    log::info!("💾 已保存概念图: {}", path.display());
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Encode(format!("JSON 序列化失败: {}", e)))?;
    println!("{}", text);
    Ok(())
}
