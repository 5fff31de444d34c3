/*
 * Student records manager
 *
 *  Copyright (C) 2025 Hiroshi KUWAGATA
 */

//!
//! データベース層のエラー型を定義するモジュール
//!

use thiserror::Error;

///
/// データベース操作で発生するエラーの分類
///
#[derive(Debug, Error)]
pub(crate) enum DbError {
    /// 入力値の形式エラー(ストアへの問い合わせ前に検出)
    #[error("validation error: {0}")]
    Validation(String),

    /// ストアへの接続失敗(到達不能、認証拒否など)
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// ステートメント実行時にストアが返したエラー
    #[error("store error: {0}")]
    Store(#[source] sqlx::Error),
}

impl DbError {
    ///
    /// バリデーションエラーの生成
    ///
    pub(crate) fn validation<S>(msg: S) -> Self
    where
        S: Into<String>
    {
        Self::Validation(msg.into())
    }

    ///
    /// バリデーションエラーか否か
    ///
    #[cfg(test)]
    pub(crate) fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    ///
    /// 接続エラーか否か
    ///
    #[cfg(test)]
    pub(crate) fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

// Fromトレイトの実装
//
// ステートメント実行中のエラーを振り分ける。通信路の断はConnection、それ以外
// はStoreとして扱う。
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_) |
            sqlx::Error::Tls(_) |
            sqlx::Error::PoolTimedOut |
            sqlx::Error::PoolClosed |
            sqlx::Error::WorkerCrashed => Self::Connection(err),
            _ => Self::Store(err),
        }
    }
}
