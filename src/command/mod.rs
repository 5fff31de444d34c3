/*
 * Student records manager
 *
 *  Copyright (C) 2025 Hiroshi KUWAGATA
 */

//!
//! サブコマンドの処理を提供するモジュール
//!

pub(crate) mod add;
pub(crate) mod delete;
pub(crate) mod list;
pub(crate) mod report;
pub(crate) mod update_email;

use anyhow::Result;

use report::Outcome;

///
/// コマンドコンテキスト集約するトレイト
///
pub(crate) trait CommandContext {
    ///
    /// サブコマンドの実行
    ///
    /// # 戻り値
    /// 実行結果を`Ok()`でラップして返す。表示は呼び出し側で行う。
    ///
    fn exec(&self) -> Result<Outcome>;
}
