/*
 * Student records manager
 *
 *  Copyright (C) 2025 Hiroshi KUWAGATA
 */

//!
//! コンフィギュレーション情報の定義
//!

use std::default::Default;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::database::connection::{
    ConnectInfo, DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PASSWORD, DEFAULT_PORT,
    DEFAULT_USER,
};
use super::{DEFAULT_LOG_LEVEL, DEFAULT_LOG_OUTPUT};

///
/// コンフィギュレーションデータを集約する構造体
///
#[derive(Debug, Default, Deserialize, Serialize)]
pub(super) struct Config {
    global: Option<GlobalInfo>,
    database: Option<DatabaseInfo>,
}

impl Config {
    ///
    /// ログレベルへのアクセサ
    ///
    /// # 戻り値
    /// ログレベルが設定されている場合は`Some()`でラップして返す。
    ///
    pub(super) fn log_level(&self) -> Option<String> {
        self.global
            .as_ref()
            .and_then(|global| global.log_level.as_ref())
            .cloned()
    }

    ///
    /// ログ出力先へのアクセサ
    ///
    /// # 戻り値
    /// ログ出力先が設定されている場合は`Some()`でラップして返す。
    ///
    pub(super) fn log_output(&self) -> Option<String> {
        self.global
            .as_ref()
            .and_then(|global| global.log_output.as_ref())
            .cloned()
    }

    ///
    /// データベース設定へのアクセサ
    ///
    pub(super) fn database(&self) -> DatabaseInfo {
        self.database.clone().unwrap_or_default()
    }

    ///
    /// 保存用のデフォルト設定の生成
    ///
    /// # 注記
    /// パスワードはファイルに書き出さない。
    ///
    pub(super) fn template() -> Self {
        Self {
            global: Some(GlobalInfo {
                log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
                log_output: Some(DEFAULT_LOG_OUTPUT.to_string()),
            }),
            database: Some(DatabaseInfo {
                host: Some(DEFAULT_HOST.to_string()),
                port: Some(DEFAULT_PORT),
                dbname: Some(DEFAULT_DATABASE.to_string()),
                user: Some(DEFAULT_USER.to_string()),
                password: None,
            }),
        }
    }

    ///
    /// コンフィギュレーション情報の保存
    ///
    /// # 戻り値
    /// 保存に成功した場合は`Ok(())`を返す。失敗した場合はエラー情報を`Err()`で
    /// ラップして返す。
    ///
    pub(super) fn save<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>
    {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if let Err(err) = std::fs::write(path, &toml::to_string(self)?) {
            Err(anyhow!("write config error: {}", err))
        } else {
            Ok(())
        }
    }
}

///
/// グローバル設定を格納する構造体
///
#[derive(Debug, Deserialize, Serialize)]
struct GlobalInfo {
    /// ログレベル
    #[serde(skip_serializing_if = "Option::is_none")]
    log_level: Option<String>,

    /// ログの出力先
    #[serde(skip_serializing_if = "Option::is_none")]
    log_output: Option<String>,
}

///
/// 接続先の設定を格納する構造体
///
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(super) struct DatabaseInfo {
    /// ホスト名
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,

    /// ポート番号
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,

    /// データベース名
    #[serde(skip_serializing_if = "Option::is_none")]
    dbname: Option<String>,

    /// ユーザ名
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,

    /// パスワード
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
}

impl DatabaseInfo {
    ///
    /// 接続パラメータの解決
    ///
    /// # 引数
    /// * `lookup` - 環境変数の参照関数
    ///
    /// # 戻り値
    /// 解決した接続パラメータを`Ok()`でラップして返す。PGPORTが数値として解釈
    /// できない場合はエラー情報を`Err()`でラップして返す。
    ///
    /// # 注記
    /// 各パラメータは 環境変数 → コンフィギュレーション → デフォルト値 の順で
    /// 決定する。
    ///
    pub(super) fn resolve<F>(&self, lookup: F) -> Result<ConnectInfo>
    where
        F: Fn(&str) -> Option<String>
    {
        let pick = |key: &str, config: &Option<String>, default: &str| {
            lookup(key)
                .or_else(|| config.clone())
                .unwrap_or_else(|| default.to_string())
        };

        let port = match lookup("PGPORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|_| anyhow!("invalid PGPORT: {}", port))?,
            None => self.port.unwrap_or(DEFAULT_PORT),
        };

        Ok(ConnectInfo::new(
            pick("PGHOST", &self.host, DEFAULT_HOST),
            port,
            pick("PGDATABASE", &self.dbname, DEFAULT_DATABASE),
            pick("PGUSER", &self.user, DEFAULT_USER),
            pick("PGPASSWORD", &self.password, DEFAULT_PASSWORD),
        ))
    }
}

///
/// コンフィギュレーション情報の読み込み
///
pub(super) fn load<P>(path: P) -> Result<Config>
where
    P: AsRef<Path>
{
    Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    ///
    /// 固定の値を返す参照関数を生成
    ///
    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        move |key| map.get(key).cloned()
    }

    #[test]
    /// 何も指定が無ければデフォルト値になること
    fn resolve_defaults() {
        let info = DatabaseInfo::default().resolve(env(&[])).unwrap();
        assert_eq!(info, ConnectInfo::default());
    }

    #[test]
    /// 環境変数がデフォルト値を上書きすること
    fn resolve_from_env() {
        let info = DatabaseInfo::default()
            .resolve(env(&[
                ("PGHOST", "db.example"),
                ("PGPORT", "6543"),
                ("PGDATABASE", "school"),
                ("PGUSER", "admin"),
                ("PGPASSWORD", "s3cret"),
            ]))
            .unwrap();

        assert_eq!(info.host(), "db.example");
        assert_eq!(info.port(), 6543);
        assert_eq!(info.database(), "school");
        assert_eq!(info.user(), "admin");
        assert_eq!(info.password(), "s3cret");
    }

    #[test]
    /// 環境変数 → コンフィギュレーション → デフォルト値の優先順位
    fn env_overrides_config() {
        let config: Config = toml::from_str(concat!(
            "[database]\n",
            "host = \"config-host\"\n",
            "port = 7000\n",
            "user = \"config-user\"\n",
        )).unwrap();

        let info = config
            .database()
            .resolve(env(&[("PGUSER", "env-user")]))
            .unwrap();

        assert_eq!(info.host(), "config-host");
        assert_eq!(info.port(), 7000);
        assert_eq!(info.user(), "env-user");
        assert_eq!(info.database(), DEFAULT_DATABASE);
    }

    #[test]
    /// 数値でないPGPORTはエラーとなること
    fn invalid_port_is_error() {
        let err = DatabaseInfo::default()
            .resolve(env(&[("PGPORT", "five")]))
            .unwrap_err();

        assert!(err.to_string().contains("PGPORT"));
    }

    #[test]
    /// 保存用テンプレートにパスワードが含まれず、読み戻せること
    fn template_round_trip() {
        let text = toml::to_string(&Config::template()).unwrap();
        assert!(!text.contains("password"));

        let config: Config = toml::from_str(&text).unwrap();
        assert_eq!(config.log_level().as_deref(), Some(DEFAULT_LOG_LEVEL));
        assert_eq!(
            config.database().resolve(env(&[])).unwrap(),
            ConnectInfo::default()
        );
    }
}
