/*
 * Student records manager
 *
 *  Copyright (C) 2025 Hiroshi KUWAGATA
 */

//! deleteサブコマンドの実装

use anyhow::Result;
use log::info;

use crate::cmd_args::{DeleteOpts, Options};
use crate::database::{types::StudentId, StudentStore};
use super::report::Outcome;
use super::CommandContext;

///
/// deleteサブコマンドのコンテキスト情報をパックした構造体
///
struct DeleteCommandContext {
    /// データベースオブジェクト
    store: Box<dyn StudentStore>,

    /// 対象ID
    id: StudentId,
}

impl DeleteCommandContext {
    ///
    /// オブジェクトの生成
    ///
    fn new(opts: &Options, sub_opts: &DeleteOpts) -> Result<Self> {
        Ok(Self {
            store: Box::new(opts.open()?),
            id: sub_opts.id(),
        })
    }
}

impl CommandContext for DeleteCommandContext {
    fn exec(&self) -> Result<Outcome> {
        if let Some(id) = self.store.delete(self.id)? {
            info!("student {} deleted", id);
            Ok(Outcome::Deleted(id))
        } else {
            Ok(Outcome::NotFound(self.id))
        }
    }
}

///
/// コマンドコンテキストの生成
///
pub(crate) fn build_context(opts: &Options, sub_opts: &DeleteOpts)
    -> Result<Box<dyn CommandContext>>
{
    Ok(Box::new(DeleteCommandContext::new(opts, sub_opts)?))
}

#[cfg(test)]
///
/// テスト用にストアを差し替えたコンテキストを生成
///
pub(crate) fn with_store(store: Box<dyn StudentStore>, id: StudentId)
    -> Box<dyn CommandContext>
{
    Box::new(DeleteCommandContext { store, id })
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::types::NewStudent;

    fn context(store: &Rc<MemoryStore>, id: StudentId) -> DeleteCommandContext {
        DeleteCommandContext {
            store: Box::new(Rc::clone(store)),
            id,
        }
    }

    #[test]
    /// 削除は1件だけに作用し、2回目は該当なしとなること
    fn delete_twice_reports_not_found() {
        let store = Rc::new(MemoryStore::new());
        let keep = NewStudent::new("Alan", "Turing", "alan@example.com", "1912-06-23")
            .unwrap();
        let gone = NewStudent::new("Ada", "Lovelace", "ada@example.com", "1815-12-10")
            .unwrap();
        store.insert(&keep).unwrap();
        let id = store.insert(&gone).unwrap();

        assert_eq!(context(&store, id).exec().unwrap(), Outcome::Deleted(id));
        assert_eq!(store.len(), 1);

        assert_eq!(context(&store, id).exec().unwrap(), Outcome::NotFound(id));
        assert_eq!(store.len(), 1);
    }
}
