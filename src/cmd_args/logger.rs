/*
 * Student records manager
 *
 *  Copyright (C) 2025 Hiroshi KUWAGATA
 */

//!
//! 診断ログの出力設定
//!
//! 標準出力は学生レコードの表示専用とし、ログは既定で標準エラー出力へ流す。
//!

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use flexi_logger::{
    Cleanup, Criterion, DeferredNow, FileSpec, Logger, LoggerHandle, Naming,
    WriteMode
};
use log::Record;

use super::Options;

/// ローテーション時のログファイル名の基底部
const LOG_BASENAME: &str = "students";

/// ローテーションを行うサイズ(バイト)
const ROTATE_SIZE: u64 = 2 * 1024 * 1024;

/// ローテーション後に残すログファイルの数
const KEEP_FILES: usize = 10;

///
/// ログの出力先
///
#[derive(Debug, PartialEq)]
enum LogTarget {
    /// 標準エラー出力
    Stderr,

    /// 単一ファイルへの追記
    File(PathBuf),

    /// ディレクトリ内でのローテーション
    Directory(PathBuf),
}

impl LogTarget {
    ///
    /// `--log-output`の値から出力先を決定する
    ///
    /// # 注記
    /// "-"は標準エラー出力。既存のパスは実体の種別に従う。未作成のパスは拡張
    /// 子の有無でファイルかディレクトリかを決める。
    ///
    fn resolve(path: &Path) -> Result<Self> {
        if path == Path::new("-") {
            return Ok(Self::Stderr);
        }

        if path.is_file() {
            Ok(Self::File(path.to_path_buf()))
        } else if path.is_dir() {
            Ok(Self::Directory(path.to_path_buf()))
        } else if path.exists() {
            Err(anyhow!("{}: unusable log output", path.display()))
        } else if path.extension().is_some() {
            Ok(Self::File(path.to_path_buf()))
        } else {
            Ok(Self::Directory(path.to_path_buf()))
        }
    }
}

///
/// ロガーの初期化
///
/// # 戻り値
/// 初期化に成功した場合はロガーのハンドルを`Ok()`でラップして返す。ハンドル
/// を破棄するとログ出力が止まるため、呼び出し側で保持すること。
///
pub(super) fn init(opts: &Options) -> Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str(opts.log_level())?
        .format(format)
        .write_mode(WriteMode::Direct);

    let logger = match LogTarget::resolve(&opts.log_output())? {
        LogTarget::Stderr => logger.log_to_stderr(),
        LogTarget::File(path) => logger.log_to_file(single_file(&path)?).append(),
        LogTarget::Directory(path) => logger
            .log_to_file(rotating_files(&path)?)
            .append()
            .rotate(
                Criterion::Size(ROTATE_SIZE),
                Naming::TimestampsCustomFormat {
                    current_infix: None,
                    format: "%Y%m%d-%H%M%S"
                },
                Cleanup::KeepLogFiles(KEEP_FILES),
            ),
    };

    Ok(logger.start()?)
}

///
/// ログ行の整形
///
/// # 注記
/// `[時刻 レベル] - メッセージ (ファイル:行)`の形式で出力する。
///
fn format(writer: &mut dyn Write, now: &mut DeferredNow, record: &Record)
    -> std::io::Result<()>
{
    write!(
        writer,
        "[{} {:5}] - {} ({})",
        now.format("%Y-%m-%d %H:%M:%S"),
        record.level(),
        record.args(),
        source_info(record),
    )
}

///
/// 出力元の`ファイル名:行番号`
///
fn source_info(record: &Record) -> String {
    let file = record.file()
        .and_then(|path| Path::new(path).file_name())
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "?????".to_string());

    let line = record.line()
        .map(|line| line.to_string())
        .unwrap_or_else(|| "???".to_string());

    format!("{}:{}", file, line)
}

///
/// 単一ファイル出力用のファイル指定を生成
///
/// # 注記
/// 親ディレクトリとファイルが無ければ作成する。
///
fn single_file(path: &Path) -> Result<FileSpec> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        File::create(path)?;
    }

    Ok(FileSpec::try_from(std::fs::canonicalize(path)?)?)
}

///
/// ローテーション出力用のファイル指定を生成
///
/// # 注記
/// ディレクトリが無ければ作成し、その中に`students_*.log`を書き出す。
///
fn rotating_files(dir: &Path) -> Result<FileSpec> {
    std::fs::create_dir_all(dir)?;
    let dir = std::fs::canonicalize(dir)?;

    Ok(FileSpec::try_from(dir.join(LOG_BASENAME))?.suffix("log"))
}
