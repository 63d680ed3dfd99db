//! 视觉模型服务 - 业务能力层
//!
//! 只负责"把图片和指令发给视觉模型、拿回文本"这一个能力，不关心流程。
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的视觉服务（如 Gemini、Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequestArgs, ImageDetail, ImageUrl,
    },
    Client,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppResult, ModelError};
use crate::models::image::ImageAttachment;

/// 视觉模型的抽象能力
///
/// 流程层只依赖这个 trait；生产环境用 [`LlmVisionService`]，
/// 测试里注入返回脚本化文本的假实现。
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// 给定一张图片和一条指令，返回模型的文本回复
    async fn transcribe(&self, image: &ImageAttachment, instruction: &str) -> AppResult<String>;
}

/// 基于 async-openai 的视觉模型服务
pub struct LlmVisionService {
    client: Client<OpenAIConfig>,
    model_name: String,
    timeout_secs: u64,
}

impl LlmVisionService {
    /// 创建新的视觉模型服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
            timeout_secs: config.request_timeout_secs,
        }
    }

    /// 发送一次"文本 + 图片"的视觉请求
    async fn send_vision_request(
        &self,
        image: &ImageAttachment,
        instruction: &str,
    ) -> AppResult<String> {
        debug!("调用视觉模型 API，模型: {}", self.model_name);
        debug!(
            "指令长度: {} 字符, 图片: {} ({} 字节)",
            instruction.len(),
            image.mime(),
            image.len()
        );

        // 构建包含文本和图片的用户消息
        let content_parts: Vec<ChatCompletionRequestUserMessageContentPart> = vec![
            ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: instruction.to_string(),
                },
            ),
            ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url: image.to_data_url(),
                        detail: Some(ImageDetail::Auto),
                    },
                },
            ),
        ];

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
            .build()
            .map_err(|e| ModelError::ApiCallFailed {
                model: self.model_name.clone(),
                source: Box::new(e),
            })?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(0.3)
            .max_tokens(1024u32)
            .build()
            .map_err(|e| ModelError::ApiCallFailed {
                model: self.model_name.clone(),
                source: Box::new(e),
            })?;

        // 每次调用只尝试一次，带显式超时，不做任何重试
        let chat = self.client.chat();
        let call = chat.create(request);
        let response = tokio::time::timeout(Duration::from_secs(self.timeout_secs), call)
            .await
            .map_err(|_| {
                warn!("视觉模型调用超时 ({}秒)", self.timeout_secs);
                ModelError::Timeout {
                    model: self.model_name.clone(),
                    seconds: self.timeout_secs,
                }
            })?
            .map_err(|e| {
                warn!("视觉模型 API 调用失败: {}", e);
                ModelError::ApiCallFailed {
                    model: self.model_name.clone(),
                    source: Box::new(e),
                }
            })?;

        debug!("视觉模型 API 调用成功");

        // 提取响应内容
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| ModelError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl VisionClient for LlmVisionService {
    async fn transcribe(&self, image: &ImageAttachment, instruction: &str) -> AppResult<String> {
        self.send_vision_request(image, instruction).await
    }
}
