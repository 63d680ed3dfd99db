//! 解题流程 - 流程层
//!
//! 核心职责：定义"一张题目图片"的完整处理流程
//!
//! 流程顺序：
//! 1. 转写：视觉模型读出题干（只要题干，不要选项）
//! 2. 匹配：题干与题库做 token-sort 模糊匹配
//! 3. 阈值判定：分数 > 60 视为命中，否则报告最接近的候选
//! 4. 验证：第二次视觉调用，确认正确答案内容在图中的选项字母
//!
//! 题库只存"正确答案的内容"，不存位置字母；同一道题在不同卷面上
//! 选项顺序可能被打乱，所以位置必须每次从图片重新推导，绝不缓存。

use regex::Regex;
use tracing::{error, info, warn};

use crate::error::AppResult;
use crate::models::image::ImageAttachment;
use crate::models::question::{QuestionBank, ResolutionOutcome};
use crate::services::matcher;
use crate::services::vision_service::VisionClient;
use crate::utils::truncate_text;

/// 匹配阈值（固定值，不可配置）
///
/// 判定为命中要求分数严格大于该值：60 分算未命中，61 分算命中
const MATCH_THRESHOLD: u8 = 60;

/// 第一次调用的转写指令
const TRANSCRIBE_INSTRUCTION: &str =
    "提取图片中题目的文字内容。只要题干文本，不要包含任何答案选项。";

/// 解题流程
///
/// - 编排完整的单题处理流程：转写 → 匹配 → 验证
/// - 每张图片严格顺序执行，阶段之间不重叠
/// - 每次外部调用只尝试一次，失败直接转入对应终态，不重试
/// - 不持有任何全局状态，题库和客户端都在构造时显式传入
pub struct ResolutionFlow<C: VisionClient> {
    bank: QuestionBank,
    client: C,
}

impl<C: VisionClient> ResolutionFlow<C> {
    /// 创建新的解题流程
    pub fn new(bank: QuestionBank, client: C) -> Self {
        Self { bank, client }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// 处理一张题目图片，返回终态
    ///
    /// 模型调用失败以 [`ResolutionOutcome`] 的失败变体返回（Ok 包裹），
    /// 只有匹配器的内部错误（空候选集）才会作为 Err 传出。
    pub async fn run(&self, image: &ImageAttachment) -> AppResult<ResolutionOutcome> {
        // ========== 阶段 1: 转写题干 ==========
        info!("🔍 正在读取图片中的题干...");

        let stem = match self.client.transcribe(image, TRANSCRIBE_INSTRUCTION).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                error!("❌ 题干转写失败: {}", e);
                return Ok(ResolutionOutcome::TranscriptionFailed {
                    reason: e.to_string(),
                });
            }
        };

        // 调用名义上成功但返回空文本，同样按转写失败处理
        if stem.is_empty() {
            warn!("❌ 模型返回的题干为空");
            return Ok(ResolutionOutcome::TranscriptionFailed {
                reason: "模型返回的题干为空".to_string(),
            });
        }

        info!("✓ 读取到题干: {}", truncate_text(&stem, 60));

        // ========== 阶段 2: 题库模糊匹配 ==========
        let candidates = self.bank.question_texts();
        let match_result = matcher::best_match(&stem, &candidates)?;

        info!(
            "📖 最佳匹配: 第 {} 行, 分数 {}",
            match_result.index + 1,
            match_result.score
        );

        // ========== 阶段 3: 阈值判定 ==========
        if !is_match(match_result.score) {
            warn!(
                "❌ 题库中没有足够相似的题目 (最高分: {}%)",
                match_result.score
            );
            return Ok(ResolutionOutcome::NotFound {
                transcribed_stem: stem,
                best_score: match_result.score,
                best_candidate: match_result.candidate,
            });
        }

        // 行序保证：重复题目时匹配器稳定选中最先出现的那行
        let record = match self.bank.get(match_result.index) {
            Some(r) => r.clone(),
            None => {
                return Err(crate::error::AppError::Other(format!(
                    "匹配索引 {} 超出题库范围",
                    match_result.index
                )));
            }
        };

        info!("✅ 题库命中: {}", truncate_text(&record.question_text, 60));
        info!("📝 正确答案内容: {}", truncate_text(&record.answer_text, 60));

        // ========== 阶段 4: 回看图片验证选项位置 ==========
        info!("🔎 正在回看图片确认选项位置（防选项乱序）...");

        let verify_prompt = build_verify_prompt(&record.answer_text);
        let advice = match self.client.transcribe(image, &verify_prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!("❌ 选项位置验证失败: {}", e);
                return Ok(ResolutionOutcome::VerificationFailed {
                    record,
                    transcribed_stem: stem,
                    reason: e.to_string(),
                });
            }
        };

        let advised_letter = extract_option_letter(&advice);
        match advised_letter {
            Some(letter) => info!("💡 建议选择: {}", letter),
            None => warn!("未能从建议中提取选项字母，请阅读完整建议"),
        }

        Ok(ResolutionOutcome::Resolved {
            record,
            transcribed_stem: stem,
            placement_advice: advice,
            advised_letter,
        })
    }
}

/// 阈值判定：严格大于 60 才算命中
fn is_match(score: u8) -> bool {
    score > MATCH_THRESHOLD
}

/// 构建第二次调用的验证提示词
fn build_verify_prompt(answer_text: &str) -> String {
    format!(
        r#"这道题的正确答案内容是："{}"。
请观察这张图片，找出该答案内容位于可见选项 A、B、C、D 中的哪个位置。
请简短回答："建议选择 [X]，因为（简短理由）"。"#,
        answer_text
    )
}

/// 从位置建议中提取选项字母（A/B/C/D）
///
/// 优先取方括号中的字母，其次取第一个独立出现的大写字母
fn extract_option_letter(advice: &str) -> Option<char> {
    if let Ok(re) = Regex::new(r"[\[【]([A-D])[\]】]") {
        if let Some(caps) = re.captures(advice) {
            return caps.get(1).and_then(|m| m.as_str().chars().next());
        }
    }

    if let Ok(re) = Regex::new(r"\b([A-D])\b") {
        return re
            .captures(advice)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().chars().next());
    }

    None
}
