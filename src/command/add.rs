/*
 * Student records manager
 *
 *  Copyright (C) 2025 Hiroshi KUWAGATA
 */

//!
//! addサブコマンドの実装

use anyhow::Result;
use log::info;

use crate::cmd_args::{AddOpts, Options};
use crate::database::{types::NewStudent, StudentStore};
use super::report::Outcome;
use super::CommandContext;

///
/// addサブコマンドのコンテキスト情報をパックした構造体
///
struct AddCommandContext {
    /// データベースオブジェクト
    store: Box<dyn StudentStore>,

    /// 名
    first_name: String,

    /// 姓
    last_name: String,

    /// メールアドレス
    email: String,

    /// 入学日(未検査の文字列)
    enrollment_date: String,
}

impl AddCommandContext {
    ///
    /// オブジェクトの生成
    ///
    fn new(opts: &Options, sub_opts: &AddOpts) -> Result<Self> {
        Ok(Self {
            store: Box::new(opts.open()?),
            first_name: sub_opts.first_name(),
            last_name: sub_opts.last_name(),
            email: sub_opts.email(),
            enrollment_date: sub_opts.enrollment_date(),
        })
    }
}

impl CommandContext for AddCommandContext {
    fn exec(&self) -> Result<Outcome> {
        // 入力値の検査はストアへの問い合わせより前に行う
        let student = NewStudent::new(
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.enrollment_date,
        )?;

        let id = self.store.insert(&student)?;
        info!("added {} {} as {}", student.first_name(), student.last_name(), id);

        Ok(Outcome::Added(id))
    }
}

///
/// コマンドコンテキストの生成
///
pub(crate) fn build_context(opts: &Options, sub_opts: &AddOpts)
    -> Result<Box<dyn CommandContext>>
{
    Ok(Box::new(AddCommandContext::new(opts, sub_opts)?))
}

#[cfg(test)]
///
/// テスト用にストアを差し替えたコンテキストを生成
///
pub(crate) fn with_store(
    store: Box<dyn StudentStore>,
    first_name: &str,
    last_name: &str,
    email: &str,
    enrollment_date: &str,
) -> Box<dyn CommandContext> {
    Box::new(AddCommandContext {
        store,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        enrollment_date: enrollment_date.to_string(),
    })
}
