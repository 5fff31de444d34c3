/*
 * Student records manager
 *
 *  Copyright (C) 2025 Hiroshi KUWAGATA
 */

//!
//! ストアへの接続処理をまとめたモジュール
//!

use log::{debug, warn};
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, Connection, PgConnection};

use super::error::DbError;

/// デフォルトの接続先ホスト
pub(crate) const DEFAULT_HOST: &str = "localhost";

/// デフォルトの接続先ポート
pub(crate) const DEFAULT_PORT: u16 = 5432;

/// デフォルトのデータベース名
pub(crate) const DEFAULT_DATABASE: &str = "university";

/// デフォルトのユーザ名
pub(crate) const DEFAULT_USER: &str = "postgres";

/// デフォルトのパスワード
pub(crate) const DEFAULT_PASSWORD: &str = "postgres";

///
/// 接続パラメータをパックした構造体
///
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct ConnectInfo {
    /// ホスト名
    host: String,

    /// ポート番号
    port: u16,

    /// データベース名
    database: String,

    /// ユーザ名
    user: String,

    /// パスワード
    password: String,
}

impl ConnectInfo {
    ///
    /// オブジェクトの生成
    ///
    pub(crate) fn new(
        host: String,
        port: u16,
        database: String,
        user: String,
        password: String,
    ) -> Self {
        Self { host, port, database, user, password }
    }

    ///
    /// ホスト名へのアクセサ
    ///
    pub(crate) fn host(&self) -> &str {
        &self.host
    }

    ///
    /// ポート番号へのアクセサ
    ///
    pub(crate) fn port(&self) -> u16 {
        self.port
    }

    ///
    /// データベース名へのアクセサ
    ///
    pub(crate) fn database(&self) -> &str {
        &self.database
    }

    ///
    /// ユーザ名へのアクセサ
    ///
    pub(crate) fn user(&self) -> &str {
        &self.user
    }

    ///
    /// パスワードへのアクセサ
    ///
    #[cfg(test)]
    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    ///
    /// sqlxの接続オプションへの変換
    ///
    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
            .log_statements(log::LevelFilter::Debug)
    }
}

// Defaultトレイトの実装
impl Default for ConnectInfo {
    fn default() -> Self {
        Self::new(
            DEFAULT_HOST.to_string(),
            DEFAULT_PORT,
            DEFAULT_DATABASE.to_string(),
            DEFAULT_USER.to_string(),
            DEFAULT_PASSWORD.to_string(),
        )
    }
}

// Debugトレイトの実装(パスワードは伏せる)
impl std::fmt::Debug for ConnectInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectInfo")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"********")
            .finish()
    }
}

///
/// ストアへの接続
///
/// # 引数
/// * `info` - 接続パラメータ
///
/// # 戻り値
/// 接続に成功した場合はコネクションを`Ok()`でラップして返す。失敗した場合は
/// 接続エラーを`Err()`でラップして返す(リトライは行わない)。
///
pub(super) async fn open(info: &ConnectInfo) -> Result<PgConnection, DbError> {
    debug!(
        "connect to {}:{}/{} as {}",
        info.host(), info.port(), info.database(), info.user()
    );

    PgConnection::connect_with(&info.connect_options())
        .await
        .map_err(DbError::Connection)
}

///
/// コネクションの解放
///
/// # 注記
/// 正常経路での明示的なクローズ。クローズに失敗してもコネクションはドロップ
/// 時に破棄されるので、ログを残すのみとする。
///
pub(super) async fn release(conn: PgConnection) {
    if let Err(err) = conn.close().await {
        warn!("close connection failed: {}", err);
    }
}
