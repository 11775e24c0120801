// ==========================================
// 客户门户导入预处理 - 命令行入口
// ==========================================
// 子命令: process（单个工作簿）/ batch（多个工作簿并发）
// 退出码: 0 成功，1 读取/其他错误，2 存在未解决的重复键
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use site_portal_import::importer::ResultBundlerImpl;
use site_portal_import::{
    logging, ConfigManager, ConflictReport, ImportError, ProcessOutcome, SiteImporter,
    SiteImporterImpl,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

const EXIT_FAILURE: u8 = 1;
const EXIT_CONFLICT: u8 = 2;

/// 客户门户工地/用户工作簿预处理
#[derive(Parser)]
#[command(name = "site-portal-import", version, about, long_about = None)]
struct Cli {
    /// 日志格式
    #[arg(long, default_value = "text", global = true)]
    log_format: LogFormat,

    /// JSON 配置文件（覆写工作表名、类型映射、输出文件名）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// 处理单个工作簿，写出四个结果文件
    Process {
        /// 输入工作簿
        input: PathBuf,

        /// 输出目录（默认当前目录）
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// 并发处理多个工作簿，每个输入写入以文件名命名的子目录
    Batch {
        /// 输入工作簿
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// 输出根目录
        #[arg(short, long)]
        output_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.log_format {
        LogFormat::Text => logging::init(),
        LogFormat::Json => logging::init_json(),
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "处理失败");
            eprintln!("错误: {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => ConfigManager::from_json_file(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
        None => ConfigManager::default(),
    };
    let importer = SiteImporterImpl::with_defaults(config);

    info!(app = site_portal_import::APP_NAME, version = site_portal_import::VERSION, "启动");

    match cli.command {
        Command::Process { input, output_dir } => match importer.import_from_excel(&input) {
            Ok(outcome) => {
                let written = write_outputs(&outcome, &output_dir)?;
                println!("{}", serde_json::to_string_pretty(&summary_json(&outcome, &written))?);
                Ok(ExitCode::SUCCESS)
            }
            Err(ImportError::DuplicateConflict(report)) => {
                print_conflicts(&input, &report);
                Ok(ExitCode::from(EXIT_CONFLICT))
            }
            Err(e) => Err(anyhow::Error::new(e).context(format!("无法处理 {}", input.display()))),
        },
        Command::Batch { inputs, output_dir } => {
            let results = importer.batch_process(inputs).await;

            let mut summaries = Vec::new();
            let mut failed = false;
            let mut conflicted = false;
            for (input, result) in results {
                match result {
                    Ok(outcome) => {
                        let dir = output_dir.join(input_stem(&input));
                        let written = write_outputs(&outcome, &dir)?;
                        summaries.push(summary_json(&outcome, &written));
                    }
                    Err(ImportError::DuplicateConflict(report)) => {
                        print_conflicts(&input, &report);
                        conflicted = true;
                    }
                    Err(e) => {
                        eprintln!("错误: {}: {}", input.display(), e);
                        failed = true;
                    }
                }
            }
            println!("{}", serde_json::to_string_pretty(&summaries)?);

            // 读取错误优先于冲突
            let code = if failed {
                ExitCode::from(EXIT_FAILURE)
            } else if conflicted {
                ExitCode::from(EXIT_CONFLICT)
            } else {
                ExitCode::SUCCESS
            };
            Ok(code)
        }
    }
}

fn write_outputs(outcome: &ProcessOutcome, dir: &Path) -> Result<Vec<PathBuf>> {
    ResultBundlerImpl::default()
        .write_to_dir(&outcome.bundle, dir)
        .with_context(|| format!("无法写入输出目录 {}", dir.display()))
}

fn summary_json(outcome: &ProcessOutcome, written: &[PathBuf]) -> serde_json::Value {
    json!({
        "batch_id": outcome.batch_id,
        "processed_at": outcome.processed_at,
        "elapsed_ms": outcome.elapsed.as_millis() as u64,
        "summary": outcome.summary,
        "warnings": outcome.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        "files": written,
    })
}

fn print_conflicts(input: &Path, report: &ConflictReport) {
    eprintln!("{}: {}", input.display(), report);
    for conflict in report.site_conflicts.iter().chain(&report.email_conflicts) {
        eprintln!("  - {}", conflict);
    }
}

fn input_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workbook".to_string())
}
