/*
 * Student records manager
 *
 *  Copyright (C) 2025 Hiroshi KUWAGATA
 */

//!
//! データベースに登録する型を定義するモジュール
//!

use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::DbError;

/// 入学日の入力フォーマット
const DATE_FORMAT: &str = "%Y-%m-%d";

///
/// 文字列が空文字、または空白文字のみで構成されているかを判定する
///
fn is_blank(s: &str) -> bool {
    s.is_empty() || s.chars().all(char::is_whitespace)
}

///
/// 入学日文字列のパース
///
/// # 引数
/// * `s` - `YYYY-MM-DD`形式の日付文字列
///
/// # 戻り値
/// パースに成功した場合は日付を`Ok()`でラップして返す。形式が不正な場合はバ
/// リデーションエラーを`Err()`でラップして返す。
///
pub(crate) fn parse_enrollment_date(s: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| DbError::validation("enrollment_date must be YYYY-MM-DD"))
}

///
/// 学生IDを表す構造体
///
/// # 注記
/// IDはストアが採番する。このツール側で生成することはない。
///
#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord,
    Serialize, Deserialize
)]
#[serde(transparent)]
pub(crate) struct StudentId(i32);

impl StudentId {
    ///
    /// ストアから得た値による学生IDの生成
    ///
    pub(crate) fn new(raw: i32) -> Self {
        Self(raw)
    }

    ///
    /// 内部値へのアクセサ
    ///
    pub(crate) fn value(&self) -> i32 {
        self.0
    }
}

// FromStrトレイトの実装(コマンドライン引数からの変換に使用)
impl FromStr for StudentId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i32>().map(Self)
    }
}

// Displayトレイトの実装
impl Display for StudentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

///
/// studentsテーブルの1レコードを表す構造体
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Student {
    /// 学生ID
    student_id: StudentId,

    /// 名
    first_name: String,

    /// 姓
    last_name: String,

    /// メールアドレス
    email: String,

    /// 入学日
    enrollment_date: NaiveDate,
}

impl Student {
    ///
    /// レコードオブジェクトの生成
    ///
    pub(crate) fn new(
        student_id: StudentId,
        first_name: String,
        last_name: String,
        email: String,
        enrollment_date: NaiveDate,
    ) -> Self {
        Self { student_id, first_name, last_name, email, enrollment_date }
    }

    ///
    /// 学生IDへのアクセサ
    ///
    pub(crate) fn id(&self) -> StudentId {
        self.student_id
    }

    ///
    /// 名へのアクセサ
    ///
    pub(crate) fn first_name(&self) -> &str {
        &self.first_name
    }

    ///
    /// 姓へのアクセサ
    ///
    pub(crate) fn last_name(&self) -> &str {
        &self.last_name
    }

    ///
    /// メールアドレスへのアクセサ
    ///
    pub(crate) fn email(&self) -> &str {
        &self.email
    }

    ///
    /// 入学日へのアクセサ
    ///
    pub(crate) fn enrollment_date(&self) -> NaiveDate {
        self.enrollment_date
    }

    ///
    /// メールアドレスの差し替え
    ///
    #[cfg(test)]
    pub(crate) fn set_email<S>(&mut self, email: S)
    where
        S: Into<String>
    {
        self.email = email.into();
    }
}

///
/// 登録前の(IDを持たない)レコードを表す構造体
///
/// # 注記
/// 生成時にバリデーションを済ませるため、このオブジェクトが存在する時点で入
/// 学日は正しい日付であることが保証される。
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NewStudent {
    first_name: String,
    last_name: String,
    email: String,
    enrollment_date: NaiveDate,
}

impl NewStudent {
    ///
    /// 入力値からの生成
    ///
    /// # 引数
    /// * `first_name` - 名
    /// * `last_name` - 姓
    /// * `email` - メールアドレス(形式は検査しない)
    /// * `enrollment_date` - `YYYY-MM-DD`形式の入学日
    ///
    /// # 戻り値
    /// 入力値が正しい場合はオブジェクトを`Ok()`でラップして返す。名前が空、ま
    /// たは日付の形式が不正な場合はバリデーションエラーを返す。
    ///
    pub(crate) fn new(
        first_name: &str,
        last_name: &str,
        email: &str,
        enrollment_date: &str,
    ) -> Result<Self, DbError> {
        if is_blank(first_name) {
            return Err(DbError::validation("first_name must not be empty"));
        }

        if is_blank(last_name) {
            return Err(DbError::validation("last_name must not be empty"));
        }

        Ok(Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            enrollment_date: parse_enrollment_date(enrollment_date)?,
        })
    }

    ///
    /// 名へのアクセサ
    ///
    pub(crate) fn first_name(&self) -> &str {
        &self.first_name
    }

    ///
    /// 姓へのアクセサ
    ///
    pub(crate) fn last_name(&self) -> &str {
        &self.last_name
    }

    ///
    /// メールアドレスへのアクセサ
    ///
    pub(crate) fn email(&self) -> &str {
        &self.email
    }

    ///
    /// 入学日へのアクセサ
    ///
    pub(crate) fn enrollment_date(&self) -> NaiveDate {
        self.enrollment_date
    }

    ///
    /// 採番されたIDを付与してレコード化する
    ///
    #[cfg(test)]
    pub(crate) fn into_student(self, id: StudentId) -> Student {
        Student::new(
            id,
            self.first_name,
            self.last_name,
            self.email,
            self.enrollment_date,
        )
    }
}
