/*
 * Student records manager
 *
 *  Copyright (C) 2025 Hiroshi KUWAGATA
 */

//!
//! テスト用のインメモリストア
//!

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use super::StudentStore;
use super::error::DbError;
use super::types::{NewStudent, Student, StudentId};

///
/// StudentStoreをメモリ上で模倣する構造体
///
/// # 注記
/// IDはSERIAL列と同様に1から単調増加で採番し、削除済みのIDは再利用しない。
///
#[derive(Default)]
pub(crate) struct MemoryStore {
    /// 登録済みレコード
    rows: RefCell<BTreeMap<StudentId, Student>>,

    /// 最後に採番したID
    last_id: Cell<i32>,

    /// 到達不能なストアを模倣するか否か
    unreachable: bool,
}

impl MemoryStore {
    ///
    /// 空のストアを生成
    ///
    pub(crate) fn new() -> Self {
        Self::default()
    }

    ///
    /// 全ての操作が接続エラーとなるストアを生成
    ///
    pub(crate) fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Default::default()
        }
    }

    ///
    /// 登録済みレコード数
    ///
    pub(crate) fn len(&self) -> usize {
        self.rows.borrow().len()
    }

    ///
    /// 接続の模倣
    ///
    fn connect(&self) -> Result<(), DbError> {
        if self.unreachable {
            let err = std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused"
            );
            return Err(DbError::Connection(sqlx::Error::Io(err)));
        }

        Ok(())
    }
}

// StudentStoreトレイトの実装
impl StudentStore for MemoryStore {
    fn list(&self) -> Result<Vec<Student>, DbError> {
        self.connect()?;

        Ok(self.rows.borrow().values().cloned().collect())
    }

    fn insert(&self, student: &NewStudent) -> Result<StudentId, DbError> {
        self.connect()?;

        let id = StudentId::new(self.last_id.get() + 1);
        self.last_id.set(id.value());
        self.rows.borrow_mut().insert(id, student.clone().into_student(id));

        Ok(id)
    }

    fn update_email(&self, id: StudentId, email: &str)
        -> Result<Option<StudentId>, DbError>
    {
        self.connect()?;

        Ok(self.rows.borrow_mut().get_mut(&id).map(|row| {
            row.set_email(email);
            id
        }))
    }

    fn delete(&self, id: StudentId) -> Result<Option<StudentId>, DbError> {
        self.connect()?;

        Ok(self.rows.borrow_mut().remove(&id).map(|_| id))
    }
}

// 複数のコンテキストから同じストアを参照するための実装
impl StudentStore for Rc<MemoryStore> {
    fn list(&self) -> Result<Vec<Student>, DbError> {
        self.as_ref().list()
    }

    fn insert(&self, student: &NewStudent) -> Result<StudentId, DbError> {
        self.as_ref().insert(student)
    }

    fn update_email(&self, id: StudentId, email: &str)
        -> Result<Option<StudentId>, DbError>
    {
        self.as_ref().update_email(id, email)
    }

    fn delete(&self, id: StudentId) -> Result<Option<StudentId>, DbError> {
        self.as_ref().delete(id)
    }
}
