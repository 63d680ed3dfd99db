use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 配置错误
    Config(ConfigError),
    /// 题库文件错误
    Bank(BankError),
    /// 视觉模型调用错误
    Model(ModelError),
    /// 模糊匹配错误
    Match(MatchError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Bank(e) => write!(f, "题库错误: {}", e),
            AppError::Model(e) => write!(f, "模型错误: {}", e),
            AppError::Match(e) => write!(f, "匹配错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::Bank(e) => Some(e),
            AppError::Model(e) => Some(e),
            AppError::Match(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 配置错误
///
/// 在任何外部调用发生之前快速失败（模型调用昂贵且有频率限制）
#[derive(Debug)]
pub enum ConfigError {
    /// 缺少 API 密钥
    MissingApiKey,
    /// 缺少题库文件路径
    MissingBankFile,
    /// 缺少题目图片路径
    MissingImagePath,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingApiKey => write!(f, "未提供 LLM API 密钥 (LLM_API_KEY)"),
            ConfigError::MissingBankFile => write!(f, "未提供题库文件路径 (BANK_FILE)"),
            ConfigError::MissingImagePath => write!(f, "未提供题目图片路径"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// 题库文件错误
#[derive(Debug)]
pub enum BankError {
    /// 文件不存在
    NotFound {
        path: String,
    },
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 不支持的文件格式
    UnsupportedFormat {
        path: String,
        extension: String,
    },
    /// 配置的列名在表头中不存在
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },
    /// 过滤空行后题库为空
    EmptyBank {
        path: String,
    },
}

impl fmt::Display for BankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankError::NotFound { path } => write!(f, "题库文件不存在: {}", path),
            BankError::ReadFailed { path, source } => {
                write!(f, "读取题库文件失败 ({}): {}", path, source)
            }
            BankError::UnsupportedFormat { path, extension } => {
                write!(f, "不支持的题库文件格式 ({}): .{}", path, extension)
            }
            BankError::ColumnNotFound { column, available } => {
                write!(
                    f,
                    "在题库表头中找不到列 '{}'，可用的列: {:?}，请检查列名配置",
                    column, available
                )
            }
            BankError::EmptyBank { path } => {
                write!(f, "题库文件中没有有效的题目行: {}", path)
            }
        }
    }
}

impl std::error::Error for BankError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BankError::ReadFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 视觉模型调用错误
#[derive(Debug)]
pub enum ModelError {
    /// API 调用失败
    ApiCallFailed {
        model: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 调用超时
    Timeout {
        model: String,
        seconds: u64,
    },
    /// 返回内容为空
    EmptyContent {
        model: String,
    },
    /// 图片文件读取失败
    ImageReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 不支持的图片格式
    UnsupportedImage {
        path: String,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::ApiCallFailed { model, source } => {
                write!(f, "视觉模型 API 调用失败 (模型: {}): {}", model, source)
            }
            ModelError::Timeout { model, seconds } => {
                write!(f, "视觉模型调用超时 (模型: {}, 超时: {}秒)", model, seconds)
            }
            ModelError::EmptyContent { model } => {
                write!(f, "视觉模型返回内容为空 (模型: {})", model)
            }
            ModelError::ImageReadFailed { path, source } => {
                write!(f, "读取图片失败 ({}): {}", path, source)
            }
            ModelError::UnsupportedImage { path } => {
                write!(f, "不支持的图片格式: {} (支持 jpg/jpeg/png/webp)", path)
            }
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::ApiCallFailed { source, .. }
            | ModelError::ImageReadFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 模糊匹配错误
#[derive(Debug, PartialEq, Eq)]
pub enum MatchError {
    /// 候选集为空
    EmptyCandidateSet,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::EmptyCandidateSet => write!(f, "候选题目集为空，无法进行匹配"),
        }
    }
}

impl std::error::Error for MatchError {}

// ========== 从子错误类型转换 ==========

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<BankError> for AppError {
    fn from(err: BankError) -> Self {
        AppError::Bank(err)
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        AppError::Model(err)
    }
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        AppError::Match(err)
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建题库读取错误
    pub fn bank_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Bank(BankError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建模型 API 调用错误
    pub fn model_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Model(ModelError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 创建图片读取错误
    pub fn image_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Model(ModelError::ImageReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
