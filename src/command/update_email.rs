/*
 * Student records manager
 *
 *  Copyright (C) 2025 Hiroshi KUWAGATA
 */

//! update-emailサブコマンドの実装

use anyhow::Result;
use log::info;

use crate::cmd_args::{Options, UpdateEmailOpts};
use crate::database::{types::StudentId, StudentStore};
use super::report::Outcome;
use super::CommandContext;

///
/// update-emailサブコマンドのコンテキスト情報をパックした構造体
///
struct UpdateEmailCommandContext {
    /// データベースオブジェクト
    store: Box<dyn StudentStore>,

    /// 対象ID
    id: StudentId,

    /// 新しいメールアドレス
    email: String,
}

impl UpdateEmailCommandContext {
    ///
    /// オブジェクトの生成
    ///
    fn new(opts: &Options, sub_opts: &UpdateEmailOpts) -> Result<Self> {
        Ok(Self {
            store: Box::new(opts.open()?),
            id: sub_opts.id(),
            email: sub_opts.email(),
        })
    }
}

impl CommandContext for UpdateEmailCommandContext {
    fn exec(&self) -> Result<Outcome> {
        match self.store.update_email(self.id, &self.email)? {
            Some(id) => {
                info!("email of student {} changed", id);
                Ok(Outcome::EmailUpdated(id))
            }

            // 該当なしはエラーとせず結果として報告する
            None => Ok(Outcome::NotFound(self.id)),
        }
    }
}

///
/// コマンドコンテキストの生成
///
pub(crate) fn build_context(opts: &Options, sub_opts: &UpdateEmailOpts)
    -> Result<Box<dyn CommandContext>>
{
    Ok(Box::new(UpdateEmailCommandContext::new(opts, sub_opts)?))
}

#[cfg(test)]
///
/// テスト用にストアを差し替えたコンテキストを生成
///
pub(crate) fn with_store(store: Box<dyn StudentStore>, id: StudentId, email: &str)
    -> Box<dyn CommandContext>
{
    Box::new(UpdateEmailCommandContext {
        store,
        id,
        email: email.to_string(),
    })
}
