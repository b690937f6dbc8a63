//! reader-translate 命令行入口
//!
//! 用法示例：
//!
//! ```text
//! reader-translate word bank
//! reader-translate --provider tencent sentence "The bank is closed."
//! reader-translate sign --timestamp 1700000000 --payload '{"SourceText":"bank"}'
//! ```

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use reader_translators::core::{print_error_message, print_info_message};
use reader_translators::env::{self, EnvVar};
use reader_translators::network::{Session, SessionOptions};
use reader_translators::signing::{Clock, SystemClock};
use reader_translators::translation::{
    build_provider, ConfigManager, ErrorSeverity, ProviderConfig, ProviderKind, ReversoClient,
    TencentClient, TranslationError, TranslationResult,
};

/// 电子书阅读器的单词与句子翻译工具
#[derive(Parser, Debug)]
#[command(name = "reader-translate", version, about, long_about = None)]
struct Cli {
    /// 配置文件路径 (TOML，或扩展名为 .json 的 JSON)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// 翻译提供者: tencent 或 reverso
    #[arg(long, global = true, default_value = "reverso")]
    provider: ProviderKind,

    /// 源语言，覆盖配置文件中所选提供者的设置
    #[arg(long, global = true)]
    source: Option<String>,

    /// 目标语言，覆盖配置文件中所选提供者的设置
    #[arg(long, global = true)]
    target: Option<String>,

    /// 输出更多日志 (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// 单行 JSON 输出
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 翻译单词
    Word { text: String },
    /// 翻译句子
    Sentence { text: String },
    /// 抓取 Reverso 上下文页面，输出译词和例句
    Context { text: String },
    /// 离线计算腾讯云请求头
    Sign {
        /// Unix 秒，缺省时使用当前时间
        #[arg(long)]
        timestamp: Option<i64>,
        /// 要签名的 JSON 请求体，按原样签名
        #[arg(long)]
        payload: String,
    },
    /// 打印环境变量说明
    Env,
    /// 写出示例配置文件
    InitConfig { path: PathBuf },
}

#[derive(Serialize)]
struct SignedHeaders<'a> {
    timestamp: i64,
    headers: Vec<HeaderLine<'a>>,
}

#[derive(Serialize)]
struct HeaderLine<'a> {
    name: &'a str,
    value: &'a str,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let no_color = env::core::NoColor::get_or_default(false);

    init_logging(cli.verbose, no_color);

    if let Err(error) = run(cli).await {
        print_error_message(&format!("Error: {}", error), no_color);
        if error.severity() == ErrorSeverity::Critical {
            eprintln!("运行 `reader-translate env` 查看可用的环境变量");
        }
        process::exit(1);
    }
}

fn init_logging(verbose: u8, no_color: bool) {
    let level = match verbose {
        0 => env::core::LogLevel::get().unwrap_or_else(|e| {
            print_error_message(&format!("Warning: {}，改用 warn", e), no_color);
            "warn".to_string()
        }),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let filter = EnvFilter::try_new(format!("reader_translators={level},reader_translate={level}"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // 日志走 stderr，stdout 只留给 JSON 结果
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .try_init();
}

async fn run(cli: Cli) -> TranslationResult<()> {
    match &cli.command {
        Commands::Env => {
            print_info_message(&env::generate_env_docs());
            return Ok(());
        }
        Commands::InitConfig { path } => {
            ConfigManager::generate_example_config(path)?;
            print_info_message(&format!("示例配置已写入 {}", path.display()));
            return Ok(());
        }
        _ => {}
    }

    let mut config = ConfigManager::new(cli.config.as_deref())?.into_config();
    apply_language_overrides(&mut config, cli.provider, &cli);
    debug!(provider = %cli.provider, "配置加载完成");

    match &cli.command {
        Commands::Word { text } => {
            let provider = build_provider(cli.provider, &config)?;
            let translation = provider.translate_word(text).await?;
            print_json(&translation, cli.compact)
        }
        Commands::Sentence { text } => {
            let provider = build_provider(cli.provider, &config)?;
            let translation = provider.translate_sentence(text).await?;
            print_json(&translation, cli.compact)
        }
        Commands::Context { text } => {
            let client = ReversoClient::new(Arc::new(session(&config)?), config.reverso.clone());
            let context = client
                .fetch_context(text, &config.reverso.source_lang, &config.reverso.target_lang)
                .await?;
            print_json(&context, cli.compact)
        }
        Commands::Sign { timestamp, payload } => {
            serde_json::from_str::<serde_json::Value>(payload).map_err(|e| {
                TranslationError::EncodingError(format!("--payload 不是有效的 JSON: {}", e))
            })?;

            let timestamp = timestamp.unwrap_or_else(|| SystemClock.now_unix());
            let client = TencentClient::from_config(Arc::new(session(&config)?), &config.tencent)?;
            let signed = client.sign(payload.as_bytes(), timestamp)?;
            info!(timestamp, "请求头已生成");

            let output = SignedHeaders {
                timestamp,
                headers: signed
                    .headers
                    .iter()
                    .map(|(name, value)| HeaderLine { name, value })
                    .collect(),
            };
            print_json(&output, cli.compact)
        }
        Commands::Env | Commands::InitConfig { .. } => Ok(()),
    }
}

/// `--source` / `--target` 只作用于所选的提供者；`context` 总是使用 Reverso
fn apply_language_overrides(config: &mut ProviderConfig, kind: ProviderKind, cli: &Cli) {
    let reverso_only = matches!(cli.command, Commands::Context { .. });
    let (source_lang, target_lang) = match kind {
        ProviderKind::Tencent if !reverso_only => {
            (&mut config.tencent.source_lang, &mut config.tencent.target_lang)
        }
        _ => (&mut config.reverso.source_lang, &mut config.reverso.target_lang),
    };

    if let Some(source) = &cli.source {
        *source_lang = source.clone();
    }
    if let Some(target) = &cli.target {
        *target_lang = target.clone();
    }
}

fn session(config: &ProviderConfig) -> TranslationResult<Session> {
    Session::new(SessionOptions {
        timeout: config.http.timeout(),
        user_agent: config.http.user_agent.clone(),
    })
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> TranslationResult<()> {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .map_err(|e| TranslationError::EncodingError(format!("输出序列化失败: {}", e)))?;

    print_info_message(&rendered);
    Ok(())
}
