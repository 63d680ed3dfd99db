//! # Image Question Solve
//!
//! 拍照解题助手：识别题目照片中的题干，在用户提供的题库里模糊检索
//! 正确答案内容，再回看图片确认答案所在的选项字母（防选项乱序）。
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - 题库记录、匹配结果、流程终态、图片附件
//! - `models/loaders/` - 题库加载器（Excel/CSV → `QuestionBank`）
//!
//! ### ② 业务能力层（Services）
//! - `services/matcher` - token-sort 模糊匹配能力（纯函数）
//! - `services/vision_service` - 视觉模型调用能力（`VisionClient` trait）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/resolution_flow` - 单张图片的完整流程编排
//!   （转写 → 匹配 → 阈值判定 → 选项位置验证）
//!
//! ### ④ 编排层（App）
//! - `app` - 配置校验、题库加载、结果渲染

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ImageAttachment, MatchResult, QuestionBank, QuestionRecord, ResolutionOutcome};
pub use services::{LlmVisionService, VisionClient};
pub use workflow::ResolutionFlow;
