use serde::{Deserialize, Serialize};

/// 题库中的一条记录
///
/// 加载后不可变：流程的任何阶段都不会修改题库内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// 题目文本
    pub question_text: String,
    /// 正确答案的内容（与选项字母无关）
    pub answer_text: String,
}

/// 题库
///
/// 按源文件行序保存的有序记录列表，每个会话加载一次。
/// 同一题目文本出现多次时，匹配始终选中最先出现的那行。
#[derive(Debug, Clone)]
pub struct QuestionBank {
    records: Vec<QuestionRecord>,
    source_path: String,
}

impl QuestionBank {
    pub fn new(records: Vec<QuestionRecord>, source_path: impl Into<String>) -> Self {
        Self {
            records,
            source_path: source_path.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&QuestionRecord> {
        self.records.get(index)
    }

    /// 所有题目文本（保持行序），供模糊匹配使用
    pub fn question_texts(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.question_text.as_str()).collect()
    }
}

/// 一次模糊匹配的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// 最佳候选在候选列表中的索引（0-based）
    pub index: usize,
    /// 最佳候选文本
    pub candidate: String,
    /// 归一化相似度分数，范围 [0, 100]
    pub score: u8,
}

/// 一次完整解题流程的终态
#[derive(Debug, Clone, Serialize)]
pub enum ResolutionOutcome {
    /// 在题库中命中，且第二次模型调用给出了选项位置建议
    Resolved {
        record: QuestionRecord,
        /// 第一次模型调用转写出的题干
        transcribed_stem: String,
        /// 模型给出的完整位置建议（含理由）
        placement_advice: String,
        /// 从建议中提取到的选项字母（A/B/C/D），提取失败时为 None
        advised_letter: Option<char>,
    },
    /// 题库中没有足够相似的题目
    NotFound {
        transcribed_stem: String,
        /// 最高分（仍低于阈值）
        best_score: u8,
        /// 最接近的题目文本，供人工排查
        best_candidate: String,
    },
    /// 题干转写失败（调用失败、超时或返回空文本）
    TranscriptionFailed {
        reason: String,
    },
    /// 命中题库但第二次验证调用失败
    VerificationFailed {
        record: QuestionRecord,
        transcribed_stem: String,
        reason: String,
    },
}
