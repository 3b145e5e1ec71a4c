//! hlgplus-info - HLG+ / HDR10+ HEVC 码流检查工具
//!
//! 读取 Annex-B 格式的 .hevc/.h265 文件, 统计 SMPTE ST 2094-40 (HDR10+)
//! 动态元数据的分布, 输出树状文本报告与 PASS/PARTIAL/FAIL 判定.

mod logging;
mod report;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};

use report::ReportContext;

#[derive(Parser, Debug)]
#[command(
    name = "hlgplus-info",
    version,
    about = "HLG+ / HDR10+ HEVC 码流检查工具"
)]
struct Cli {
    /// 日志详细程度 (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// 额外写入日志文件的目录 (按天滚动)
    #[arg(long = "log-dir", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 输出 HLG+ 码流就绪报告
    Info {
        /// 输入 Annex-B 文件 (.hevc / .h265)
        #[arg(short, long)]
        input: PathBuf,

        /// 报告标题中的 profile 标签
        #[arg(short, long, default_value = "A")]
        profile: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = logging::init("hlgplus-info", cli.verbose, cli.log_dir.as_deref()) {
        eprintln!("警告: 日志初始化失败: {err:#}");
    }

    let code = match &cli.command {
        Command::Info { input, profile } => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            match run_info(input, profile, &mut out) {
                Ok(()) => 0,
                Err(err) => {
                    log::debug!("info 失败: {err:?}");
                    eprintln!("✖ {err:#}");
                    1
                }
            }
        }
    };
    process::exit(code);
}

/// 执行 info 子命令, 成功时报告已完整写入 `out`
///
/// 致命错误 (文件不存在, 读取失败, 没有 NAL 单元) 时不输出任何报告内容.
fn run_info(input: &Path, profile: &str, out: &mut impl Write) -> Result<()> {
    log::info!("hlgplus {} 分析输入: {}", hlgplus::version(), input.display());
    let analysis = hlgplus::analyze_file(input)?;

    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    let ctx = ReportContext {
        file_name: &file_name,
        profile,
    };
    report::render(out, &ctx, &analysis)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// AUD + 一个首分片 TRAIL_R, 没有 SEI
    const BARE_STREAM: &[u8] = &[0, 0, 0, 1, 0x46, 0x01, 0x50, 0, 0, 0, 1, 0x02, 0x01, 0xD0];

    #[test]
    fn test_命令行解析() {
        let cli = Cli::try_parse_from(["hlgplus-info", "-vv", "info", "-i", "a.hevc"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_dir.is_none());
        let Command::Info { input, profile } = cli.command;
        assert_eq!(input, PathBuf::from("a.hevc"));
        assert_eq!(profile, "A");

        let cli = Cli::try_parse_from([
            "hlgplus-info",
            "info",
            "--input",
            "b.h265",
            "--profile",
            "C",
            "--log-dir",
            "logs",
        ])
        .unwrap();
        assert_eq!(cli.log_dir, Some(PathBuf::from("logs")));
        let Command::Info { profile, .. } = cli.command;
        assert_eq!(profile, "C");
    }

    #[test]
    fn test_缺少input参数() {
        assert!(Cli::try_parse_from(["hlgplus-info", "info"]).is_err());
    }

    #[test]
    fn test_info_输出报告() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.hevc");
        std::fs::write(&path, BARE_STREAM).unwrap();

        let mut out = Vec::new();
        run_info(&path, "A", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("(Profile A)"));
        assert!(text.contains("bare.hevc"));
        assert!(text.contains("FAIL"));
    }

    #[test]
    fn test_info_文件不存在() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let err = run_info(&dir.path().join("missing.hevc"), "A", &mut out).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_info_没有nal单元() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.bin");
        std::fs::write(&path, [0x12, 0x34, 0x56, 0x78, 0x9A]).unwrap();

        let mut out = Vec::new();
        let err = run_info(&path, "A", &mut out).unwrap_err();
        assert!(err.to_string().contains("No Annex-B NAL units found"));
        assert!(out.is_empty());
    }
}
