//! # 概念图生成器 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 CLI (clap, main.rs)                      │
//! │   compose ── generate ── ideas list/add                  │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ Result<T, AppError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↓            库 (Rust)                             │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  ├─ settings ─── AppConfig (JSON 配置 + 校验)             │
//! │  │                                                       │
//! │  ├─ concept ──── 顺序流水线 + ConceptContext              │
//! │  │   └─ ideas         SQLite 点子库 (rusqlite)            │
//! │  │                                                       │
//! │  ├─ services ─── 文生图 / LLM 补全 (trait + HTTP 实现)    │
//! │  ├─ logo ─────── URL/Stage/文件/Base64 加载·校验·解码     │
//! │  └─ compositor ─ Logo 贴图·平均色·对比色·标语绘制         │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，汇总各模块错误 |
//! | [`settings`] | 配置文件读取、默认值与范围校验 |
//! | [`compositor`] | 确定性的本地合成：背景 + Logo + 标语 → 概念图 |
//! | [`logo`] | 从多种来源加载 Logo，含 SSRF / 体积 / 像素上限校验 |
//! | [`services`] | 外部文生图与 LLM 服务的抽象与 HTTP 实现 |
//! | [`concept`] | 串联以上模块的生成流水线与点子库 |

pub mod compositor;
pub mod concept;
pub mod error;
pub mod logo;
pub mod services;
pub mod settings;

#[cfg(test)]
mod test_support;
