use crate::error::{AppResult, ConfigError};

/// 程序配置文件
///
/// 会话级配置对象：显式传入流程构造函数，不使用全局状态
#[derive(Clone, Debug)]
pub struct Config {
    /// 题库文件路径（Excel/CSV）
    pub bank_file: String,
    /// 题库中题目列的列名
    pub question_column: String,
    /// 题库中答案列的列名
    pub answer_column: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 单次模型调用的超时（秒）
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bank_file: String::new(),
            question_column: "Question".to_string(),
            answer_column: "Answer".to_string(),
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-2.0-flash".to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            bank_file: std::env::var("BANK_FILE").unwrap_or(default.bank_file),
            question_column: std::env::var("QUESTION_COLUMN").unwrap_or(default.question_column),
            answer_column: std::env::var("ANSWER_COLUMN").unwrap_or(default.answer_column),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
        }
    }

    /// 校验配置完整性
    ///
    /// 在加载题库和任何模型调用之前执行，缺少必要配置时立即失败
    pub fn validate(&self) -> AppResult<()> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey.into());
        }
        if self.bank_file.trim().is_empty() {
            return Err(ConfigError::MissingBankFile.into());
        }
        Ok(())
    }
}
