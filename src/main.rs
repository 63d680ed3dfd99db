use anyhow::Result;
use image_question_solve::error::ConfigError;
use image_question_solve::utils::logging;
use image_question_solve::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    // 题目图片路径来自第一个命令行参数
    let image_path = std::env::args()
        .nth(1)
        .ok_or(ConfigError::MissingImagePath)?;

    // 初始化并运行应用
    App::initialize(config)?.run(&image_path).await?;

    Ok(())
}
