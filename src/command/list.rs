/*
 * Student records manager
 *
 *  Copyright (C) 2025 Hiroshi KUWAGATA
 */

//!
//! listサブコマンドの実装
//!

use anyhow::Result;
use log::debug;

use crate::cmd_args::Options;
use crate::database::StudentStore;
use super::report::Outcome;
use super::CommandContext;

///
/// listサブコマンドのコンテキスト情報をパックした構造体
///
struct ListCommandContext {
    /// データベースオブジェクト
    store: Box<dyn StudentStore>,
}

impl ListCommandContext {
    ///
    /// オブジェクトの生成
    ///
    fn new(opts: &Options) -> Result<Self> {
        Ok(Self {
            store: Box::new(opts.open()?),
        })
    }
}

// CommandContextトレイトの実装
impl CommandContext for ListCommandContext {
    fn exec(&self) -> Result<Outcome> {
        let rows = self.store.list()?;
        debug!("fetched {} students", rows.len());

        Ok(Outcome::Listed(rows))
    }
}

///
/// コマンドコンテキストの生成
///
pub(crate) fn build_context(opts: &Options) -> Result<Box<dyn CommandContext>> {
    Ok(Box::new(ListCommandContext::new(opts)?))
}

#[cfg(test)]
///
/// テスト用にストアを差し替えたコンテキストを生成
///
pub(crate) fn with_store(store: Box<dyn StudentStore>) -> Box<dyn CommandContext> {
    Box::new(ListCommandContext { store })
}
