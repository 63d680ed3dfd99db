use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::image::ImageAttachment;
use crate::models::loaders::load_bank;
use crate::models::question::{QuestionBank, ResolutionOutcome};
use crate::services::vision_service::LlmVisionService;
use crate::utils::truncate_text;
use crate::workflow::ResolutionFlow;

/// 应用主结构
///
/// 持有一个会话的配置和已加载的题库；题库加载失败或配置缺失
/// 会在初始化阶段报错，不会走到任何模型调用
pub struct App {
    config: Config,
    bank: QuestionBank,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;

        log_startup(&config);

        info!("📁 正在加载题库: {}", config.bank_file);
        let bank = load_bank(
            &config.bank_file,
            &config.question_column,
            &config.answer_column,
        )?;

        Ok(Self { config, bank })
    }

    /// 处理一张题目图片
    pub async fn run(self, image_path: &str) -> AppResult<()> {
        let image = ImageAttachment::from_path(image_path)?;
        info!(
            "📸 题目图片: {} ({}, {} 字节)",
            image.source_path(),
            image.mime(),
            image.len()
        );

        let client = LlmVisionService::new(&self.config);
        let flow = ResolutionFlow::new(self.bank, client);

        let outcome = flow.run(&image).await?;

        if let Ok(json) = serde_json::to_string_pretty(&outcome) {
            debug!("完整处理结果:\n{}", json);
        }

        render_outcome(&outcome);
        Ok(())
    }
}

/// 输出最终结果
fn render_outcome(outcome: &ResolutionOutcome) {
    info!("{}", "=".repeat(60));
    match outcome {
        ResolutionOutcome::Resolved {
            record,
            placement_advice,
            advised_letter,
            ..
        } => {
            info!("✅ 已在题库中找到该题");
            info!("📖 正确答案内容: {}", record.answer_text);
            if let Some(letter) = advised_letter {
                info!("💡 建议选择: {}", letter);
            }
            info!("💬 模型建议: {}", placement_advice);
        }
        ResolutionOutcome::NotFound {
            best_score,
            best_candidate,
            ..
        } => {
            warn!("❌ 题库中没有找到这道题 (最高匹配度: {}%)", best_score);
            warn!("最接近的题目: {}", truncate_text(best_candidate, 80));
        }
        ResolutionOutcome::TranscriptionFailed { reason } => {
            warn!("❌ 题干读取失败: {}", reason);
        }
        ResolutionOutcome::VerificationFailed { record, reason, .. } => {
            warn!("⚠️ 已命中题库但选项位置验证失败: {}", reason);
            info!("📖 正确答案内容（请自行比对图片）: {}", record.answer_text);
        }
    }
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 拍照解题助手（防选项乱序）");
    info!("🤖 模型: {} @ {}", config.llm_model_name, config.llm_api_base_url);
    info!(
        "📋 题库列名: 题目='{}' 答案='{}'",
        config.question_column, config.answer_column
    );
    info!("{}", "=".repeat(60));
}
