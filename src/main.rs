/*
 * Student records manager
 *
 *  Copyright (C) 2025 Hiroshi KUWAGATA
 */

//!
//! プログラムのエントリポイント
//!

mod cmd_args;
pub(crate) mod command;
pub(crate) mod database;

use std::sync::Arc;

use anyhow::Result;
use cmd_args::Options;
use command::CommandContext;

///
/// プログラムのエントリポイント
///
fn main() {
    /*
     * .envファイルがあれば環境変数として読み込む(既存の値は上書きしない)
     */
    dotenvy::dotenv().ok();

    /*
     * コマンドラインオプションのパース
     */
    let opts = match cmd_args::parse() {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    };

    /*
     * ロガーの初期化(ハンドルは終了まで保持する)
     */
    let _logger = match cmd_args::init_logger(&opts) {
        Ok(handle) => handle,
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    };

    let code = run(opts);
    if code != 0 {
        std::process::exit(code);
    }
}

///
/// プログラムの実行関数
///
/// # 引数
/// * `opts` - オプション情報をパックしたオブジェクト
///
/// # 戻り値
/// プロセスの終了コード。
///
fn run(opts: Arc<Options>) -> i32 {
    execute(opts.build_context(), opts.json())
}

///
/// コマンドコンテキストの実行と結果の表示
///
/// # 引数
/// * `context` - コマンドコンテキストの生成結果
/// * `json` - JSON形式で出力するか否か
///
/// # 戻り値
/// 該当なしを含む正常終了時は0を返す。入力値、設定、接続、ストアのいずれの
/// エラーでも標準エラー出力に1行を出力して1を返す。使用方法の誤りはここに到
/// 達する前にclapが終了コード2で終了させる。
///
fn execute(context: Result<Box<dyn CommandContext>>, json: bool) -> i32 {
    let result = context
        .and_then(|ctx| ctx.exec())
        .and_then(|outcome| command::report::print(&outcome, json));

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err);
            1
        }
    }
}
