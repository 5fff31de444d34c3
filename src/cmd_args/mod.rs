/*
 * Student records manager
 *
 *  Copyright (C) 2025 Hiroshi KUWAGATA
 */

//!
//! コマンドライン引数を取り扱うモジュール
//!

mod config;
mod logger;

use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use anyhow::{anyhow, Result};
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use directories::BaseDirs;
use flexi_logger::LoggerHandle;

use crate::command::{add, delete, list, update_email, CommandContext};
use crate::database::connection::ConnectInfo;
use crate::database::types::StudentId;
use crate::database::StudentManager;
use config::{Config, DatabaseInfo};

/// デフォルトのログレベル
const DEFAULT_LOG_LEVEL: &str = "warn";

/// デフォルトのログ出力先(標準エラー出力)
const DEFAULT_LOG_OUTPUT: &str = "-";

/// デフォルトのデータパス
static DEFAULT_DATA_PATH: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    BaseDirs::new()
        .map(|dirs| dirs.data_local_dir().join(env!("CARGO_PKG_NAME")))
});

///
/// デフォルトのコンフィグレーションファイルのパス情報を生成
///
/// # 戻り値
/// コンフィギュレーションファイルのパス情報。ホームディレクトリが特定できな
/// い環境では`None`を返す。
///
fn default_config_path() -> Option<PathBuf> {
    DEFAULT_DATA_PATH
        .as_ref()
        .map(|path| path.join("config.toml"))
}

///
/// グローバルオプション情報を格納する構造体
///
#[derive(Parser, Debug, Clone)]
#[command(
    name = "students",
    about = "studentsテーブルの操作ツール",
    version,
    long_about = None,
    subcommand_required = false,
    arg_required_else_help = true,
)]
pub struct Options {
    /// config.tomlを使用する場合のパス
    #[arg(short = 'c', long = "config")]
    config_path: Option<PathBuf>,

    /// ログレベル
    #[arg(long = "log-level", value_name = "LEVEL")]
    log_level: Option<String>,

    /// ログの出力先("-"で標準エラー出力)
    #[arg(long = "log-output", value_name = "PATH")]
    log_output: Option<PathBuf>,

    /// 出力形式をJSONに変更するか否かを表すフラグ
    #[arg(long = "json-output")]
    json: bool,

    /// 設定情報の表示
    #[arg(long = "show-options")]
    show_options: bool,

    /// デフォルト設定情報の保存
    #[arg(long = "save-default")]
    save_default: bool,

    /// コンフィギュレーションファイルから読み込んだ接続先の設定
    #[arg(skip)]
    database: DatabaseInfo,

    /// 実行するサブコマンド
    #[command(subcommand)]
    command: Option<Command>,
}

impl Options {
    ///
    /// ログレベルへのアクセサ
    ///
    pub(crate) fn log_level(&self) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }

    ///
    /// ログ出力先へのアクセサ
    ///
    pub(crate) fn log_output(&self) -> PathBuf {
        self.log_output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_OUTPUT))
    }

    ///
    /// JSON出力の指定有無を返す
    ///
    pub(crate) fn json(&self) -> bool {
        self.json
    }

    ///
    /// 接続パラメータの解決
    ///
    /// # 戻り値
    /// 環境変数、コンフィギュレーション、デフォルト値から解決した接続パラメー
    /// タを`Ok()`でラップして返す。
    ///
    pub(crate) fn connect_info(&self) -> Result<ConnectInfo> {
        self.database.resolve(|key| std::env::var(key).ok())
    }

    ///
    /// データベースのオープン
    ///
    /// # 戻り値
    /// マネージャオブジェクトを`Ok()`でラップして返す。ストアへの接続は各操作
    /// の実行時に行われる。
    ///
    pub(crate) fn open(&self) -> Result<StudentManager> {
        StudentManager::new(self.connect_info()?)
    }

    ///
    /// コンフィギュレーションファイルの適用
    ///
    /// # 戻り値
    /// 処理に成功した場合は`Ok(())`を返す。
    ///
    /// # 注記
    /// config.tomlを読み込みオプション情報に反映する。
    ///
    fn apply_config(&mut self) -> Result<()> {
        let path = if let Some(path) = &self.config_path {
            // オプションでコンフィギュレーションファイルのパスが指定されて
            // いる場合、そのパスに何もなければエラー
            if !path.exists() {
                return Err(anyhow!("{} is not exists", path.display()));
            }

            path.clone()

        } else if let Some(path) = default_config_path() {
            path

        } else {
            return Ok(());
        };

        // この時点でパスに何も無い場合はそのまま何もせず正常終了
        if !path.exists() {
            return Ok(());
        }

        // 指定されたパスにあるのがファイルでなければエラー
        if !path.is_file() {
            return Err(anyhow!("{} is not file", path.display()));
        }

        match config::load(&path) {
            Ok(config) => {
                self.merge_config(&config);
                Ok(())
            }

            Err(err) => Err(anyhow!("{}: {}", path.display(), err))
        }
    }

    ///
    /// コンフィギュレーションの内容をオプション情報に反映する
    ///
    /// # 注記
    /// コマンドラインで指定された値が優先される。
    ///
    fn merge_config(&mut self, config: &Config) {
        if self.log_level.is_none() {
            self.log_level = config.log_level();
        }

        if self.log_output.is_none() {
            self.log_output = config.log_output().map(PathBuf::from);
        }

        self.database = config.database();
    }

    ///
    /// オプション情報のバリデート
    ///
    /// # 戻り値
    /// オプション情報に矛盾が無い場合は`Ok(())`を返す。
    ///
    fn validate(&self) -> Result<()> {
        if self.show_options && self.save_default {
            return Err(anyhow!(
                "--show-options and --save-default can't be specified mutually"
            ));
        }

        Ok(())
    }

    ///
    /// サブコマンド指定の確認
    ///
    /// # 戻り値
    /// サブコマンドが指定されていない場合は使用方法を含むclapのエラー情報を
    /// `Err()`でラップして返す。
    ///
    fn require_command(&self) -> clap::error::Result<()> {
        if self.command.is_some() {
            Ok(())
        } else {
            Err(Options::command().error(
                ErrorKind::MissingSubcommand,
                "a subcommand is required"
            ))
        }
    }

    ///
    /// オプション設定内容の表示
    ///
    fn show_options(&self) -> Result<()> {
        let config_path = if let Some(path) = &self.config_path {
            path.display().to_string()
        } else {
            match default_config_path() {
                Some(path) if path.exists() => path.display().to_string(),
                _ => "(none)".to_string(),
            }
        };

        let info = self.connect_info()?;

        println!("global options");
        println!("   config path:   {}", config_path);
        println!("   log level:     {}", self.log_level());
        println!("   log output:    {}", self.log_output().display());
        println!("   json output:   {}", self.json());
        println!("");
        println!("database");
        println!("   host:          {}", info.host());
        println!("   port:          {}", info.port());
        println!("   database:      {}", info.database());
        println!("   user:          {}", info.user());
        println!("   password:      ********");

        // サブコマンドが指定されており、そのサブコマンドがオプションを持つなら
        // そのオプションも表示する。
        if let Some(command) = &self.command {
            let opts: Option<&dyn ShowOptions> = match command {
                Command::Add(opts) => Some(opts),
                Command::UpdateEmail(opts) => Some(opts),
                Command::Delete(opts) => Some(opts),
                Command::List => None,
            };

            if let Some(opts) = opts {
                println!("");
                opts.show_options();
            }
        }

        Ok(())
    }

    ///
    /// サブコマンドのコマンドコンテキストの生成
    ///
    pub(crate) fn build_context(&self) -> Result<Box<dyn CommandContext>> {
        match &self.command {
            Some(Command::List) => list::build_context(self),
            Some(Command::Add(opts)) => add::build_context(self, opts),
            Some(Command::UpdateEmail(opts)) => update_email::build_context(self, opts),
            Some(Command::Delete(opts)) => delete::build_context(self, opts),
            None => Err(anyhow!("command not specified")),
        }
    }
}

///
/// サブコマンドの定義
///
#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// 全学生の一覧(ID順)
    #[command(visible_alias = "ls")]
    List,

    /// 学生の登録
    Add(AddOpts),

    /// 学生のメールアドレスの更新
    UpdateEmail(UpdateEmailOpts),

    /// IDによる学生の削除
    Delete(DeleteOpts),
}

///
/// show_options()実装を要求するトレイト
///
trait ShowOptions {
    ///
    /// オプション設定内容の表示
    ///
    fn show_options(&self);
}

///
/// サブコマンドaddのオプション
///
#[derive(Clone, Args, Debug)]
pub(crate) struct AddOpts {
    /// 名
    #[arg()]
    first_name: String,

    /// 姓
    #[arg()]
    last_name: String,

    /// メールアドレス
    #[arg()]
    email: String,

    /// 入学日(YYYY-MM-DD)
    #[arg(value_name = "YYYY-MM-DD")]
    enrollment_date: String,
}

impl AddOpts {
    ///
    /// 名へのアクセサ
    ///
    pub(crate) fn first_name(&self) -> String {
        self.first_name.clone()
    }

    ///
    /// 姓へのアクセサ
    ///
    pub(crate) fn last_name(&self) -> String {
        self.last_name.clone()
    }

    ///
    /// メールアドレスへのアクセサ
    ///
    pub(crate) fn email(&self) -> String {
        self.email.clone()
    }

    ///
    /// 入学日文字列へのアクセサ
    ///
    /// # 注記
    /// 形式の検査はaddサブコマンドの実行時に行う。
    ///
    pub(crate) fn enrollment_date(&self) -> String {
        self.enrollment_date.clone()
    }
}

// ShowOptionsトレイトの実装
impl ShowOptions for AddOpts {
    fn show_options(&self) {
        println!("add command options");
        println!("   first name:       {}", self.first_name);
        println!("   last name:        {}", self.last_name);
        println!("   email:            {}", self.email);
        println!("   enrollment date:  {}", self.enrollment_date);
    }
}

///
/// サブコマンドupdate-emailのオプション
///
#[derive(Clone, Args, Debug)]
pub(crate) struct UpdateEmailOpts {
    /// 対象の学生ID(負の値も整数として受け付ける)
    #[arg(allow_negative_numbers = true)]
    student_id: StudentId,

    /// 新しいメールアドレス
    #[arg()]
    new_email: String,
}

impl UpdateEmailOpts {
    ///
    /// 対象IDへのアクセサ
    ///
    pub(crate) fn id(&self) -> StudentId {
        self.student_id
    }

    ///
    /// 新しいメールアドレスへのアクセサ
    ///
    pub(crate) fn email(&self) -> String {
        self.new_email.clone()
    }
}

// ShowOptionsトレイトの実装
impl ShowOptions for UpdateEmailOpts {
    fn show_options(&self) {
        println!("update-email command options");
        println!("   student id:  {}", self.student_id);
        println!("   new email:   {}", self.new_email);
    }
}

///
/// サブコマンドdeleteのオプション
///
#[derive(Clone, Args, Debug)]
pub(crate) struct DeleteOpts {
    /// 削除対象の学生ID(負の値も整数として受け付ける)
    #[arg(allow_negative_numbers = true)]
    student_id: StudentId,
}

impl DeleteOpts {
    ///
    /// 削除対象IDへのアクセサ
    ///
    pub(crate) fn id(&self) -> StudentId {
        self.student_id
    }
}

// ShowOptionsトレイトの実装
impl ShowOptions for DeleteOpts {
    fn show_options(&self) {
        println!("delete command options");
        println!("   student id:  {}", self.student_id);
    }
}

///
/// コマンドライン引数のパース処理
///
/// # 戻り値
/// オプション情報をまとめたオブジェクトを返す。
///
/// # 注記
/// 引数の誤りはclapが使用方法を表示して終了する(終了コード2)。
///
pub(crate) fn parse() -> Result<Arc<Options>> {
    let mut opts = Options::parse();

    /*
     * コンフィギュレーションファイルの適用
     */
    opts.apply_config()?;

    /*
     * 設定情報のバリデーション
     */
    opts.validate()?;

    /*
     * 設定情報の表示
     */
    if opts.show_options {
        opts.show_options()?;
        std::process::exit(0);
    }

    /*
     * デフォルト設定の保存
     */
    if opts.save_default {
        let path = if let Some(path) = &opts.config_path {
            path.clone()
        } else if let Some(path) = default_config_path() {
            path
        } else {
            return Err(anyhow!("can't determine default config path"));
        };

        Config::template().save(&path)?;
        println!("write default config to {}", path.display());
        std::process::exit(0);
    }

    /*
     * サブコマンドの必須確認(未指定時は使用方法を表示して終了コード2で終了)
     */
    if let Err(err) = opts.require_command() {
        err.exit();
    }

    /*
     * 設定情報の返却
     */
    Ok(Arc::new(opts))
}

///
/// ロガーの初期化
///
/// # 戻り値
/// ロガーのハンドルを`Ok()`でラップして返す。ハンドルはプログラム終了まで保
/// 持すること。
///
pub(crate) fn init_logger(opts: &Options) -> Result<LoggerHandle> {
    logger::init(opts)
}
