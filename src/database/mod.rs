/*
 * Student records manager
 *
 *  Copyright (C) 2025 Hiroshi KUWAGATA
 */

//!
//! データベース関連処理をまとめたモジュール
//!

pub(crate) mod connection;
pub(crate) mod error;
pub(crate) mod types;

#[cfg(test)]
pub(crate) mod memory;

use anyhow::Result;
use log::{debug, info};
use sqlx::postgres::PgRow;
use sqlx::{Connection, PgConnection, Row};
use tokio::runtime::{Builder, Runtime};

use crate::database::connection::ConnectInfo;
use crate::database::error::DbError;
use crate::database::types::{NewStudent, Student, StudentId};

/// 全件取得(ID昇順)
const SELECT_ALL: &str = "
    SELECT student_id, first_name, last_name, email, enrollment_date
    FROM students
    ORDER BY student_id
";

/// 新規登録(採番されたIDを返す)
const INSERT: &str = "
    INSERT INTO students (first_name, last_name, email, enrollment_date)
    VALUES ($1, $2, $3, $4)
    RETURNING student_id
";

/// メールアドレスの更新(更新したIDを返す)
const UPDATE_EMAIL: &str = "
    UPDATE students
    SET email = $1
    WHERE student_id = $2
    RETURNING student_id
";

/// 削除(削除したIDを返す)
const DELETE: &str = "
    DELETE FROM students
    WHERE student_id = $1
    RETURNING student_id
";

///
/// 学生レコードに対する操作を集約するトレイト
///
/// # 注記
/// 各操作はストアを直接読み書きする。実装側がレコードのコピーを保持すること
/// はない。
///
pub(crate) trait StudentStore {
    ///
    /// 全レコードの取得
    ///
    /// # 戻り値
    /// 学生IDの昇順に並んだレコードのリストを`Ok()`でラップして返す。レコード
    /// が無い場合は空のリストを返す。
    ///
    fn list(&self) -> Result<Vec<Student>, DbError>;

    ///
    /// レコードの登録
    ///
    /// # 戻り値
    /// ストアが採番した学生IDを`Ok()`でラップして返す。
    ///
    fn insert(&self, student: &NewStudent) -> Result<StudentId, DbError>;

    ///
    /// メールアドレスの更新
    ///
    /// # 戻り値
    /// 更新したレコードのIDを`Ok(Some())`で、該当レコードが無い場合は
    /// `Ok(None)`を返す。
    ///
    fn update_email(&self, id: StudentId, email: &str)
        -> Result<Option<StudentId>, DbError>;

    ///
    /// レコードの削除
    ///
    /// # 戻り値
    /// 削除したレコードのIDを`Ok(Some())`で、該当レコードが無い場合は
    /// `Ok(None)`を返す。
    ///
    fn delete(&self, id: StudentId) -> Result<Option<StudentId>, DbError>;
}

///
/// 取得行から学生レコードへの変換
///
fn to_student(row: &PgRow) -> Result<Student, DbError> {
    Ok(Student::new(
        StudentId::new(row.try_get("student_id")?),
        row.try_get("first_name")?,
        row.try_get("last_name")?,
        row.try_get("email")?,
        row.try_get("enrollment_date")?,
    ))
}

///
/// 全件取得の実行
///
async fn select_all(conn: &mut PgConnection) -> Result<Vec<Student>, DbError> {
    let rows = sqlx::query(SELECT_ALL)
        .fetch_all(&mut *conn)
        .await?;

    rows.iter().map(to_student).collect()
}

///
/// 新規登録の実行
///
/// # 注記
/// 登録とコミットを一つのトランザクションで行う。途中で失敗した場合はトラン
/// ザクションのドロップによりロールバックされる。
///
async fn insert_row(conn: &mut PgConnection, student: &NewStudent)
    -> Result<StudentId, DbError>
{
    let mut tnx = conn.begin().await?;

    let id = sqlx::query_scalar::<_, i32>(INSERT)
        .bind(student.first_name())
        .bind(student.last_name())
        .bind(student.email())
        .bind(student.enrollment_date())
        .fetch_one(&mut *tnx)
        .await?;

    tnx.commit().await?;
    info!("inserted student {}", id);

    Ok(StudentId::new(id))
}

///
/// IDで絞り込む更新系ステートメントの実行
///
/// # 注記
/// 対象行が無い場合はコミットせずにロールバックする。
///
async fn modify_row(conn: &mut PgConnection, sql: &str, email: Option<&str>,
    id: StudentId) -> Result<Option<StudentId>, DbError>
{
    let mut tnx = conn.begin().await?;

    let query = sqlx::query_scalar::<_, i32>(sql);
    let query = match email {
        Some(email) => query.bind(email),
        None => query,
    };

    let affected = query
        .bind(id.value())
        .fetch_optional(&mut *tnx)
        .await?;

    match affected {
        Some(id) => {
            tnx.commit().await?;
            debug!("committed change on student {}", id);
            Ok(Some(StudentId::new(id)))
        }

        None => {
            tnx.rollback().await?;
            debug!("no student with id {}, rolled back", id);
            Ok(None)
        }
    }
}

///
/// PostgreSQL上のstudentsテーブルを操作する構造体
///
/// # 注記
/// 接続は操作ごとに確立し、操作の終了とともに解放する。sqlxのドライバは非同
/// 期なので、カレントスレッド型のランタイムを保持して各操作をブロッキングで
/// 実行する。
///
pub(crate) struct StudentManager {
    /// 接続パラメータ
    info: ConnectInfo,

    /// 非同期処理を駆動するランタイム
    runtime: Runtime,
}

impl StudentManager {
    ///
    /// マネージャオブジェクトの生成
    ///
    /// # 引数
    /// * `info` - 接続パラメータ
    ///
    /// # 戻り値
    /// 生成に成功した場合はオブジェクトを`Ok()`でラップして返す。
    ///
    /// # 注記
    /// この時点ではストアへの接続は行わない。
    ///
    pub(crate) fn new(info: ConnectInfo) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self { info, runtime })
    }

    ///
    /// 1回分の接続スコープで非同期処理を実行する
    ///
    /// # 引数
    /// * `op` - 確立したコネクションを使って行う処理
    ///
    /// # 注記
    /// コネクションは`op`の成否に関わらず解放される。
    ///
    fn session<T, F>(&self, op: F) -> Result<T, DbError>
    where
        F: AsyncFnOnce(&mut PgConnection) -> Result<T, DbError>,
    {
        self.runtime.block_on(async {
            let mut conn = connection::open(&self.info).await?;
            let result = op(&mut conn).await;
            connection::release(conn).await;

            result
        })
    }
}

// StudentStoreトレイトの実装
impl StudentStore for StudentManager {
    fn list(&self) -> Result<Vec<Student>, DbError> {
        self.session(async |conn: &mut PgConnection| {
            select_all(conn).await
        })
    }

    fn insert(&self, student: &NewStudent) -> Result<StudentId, DbError> {
        self.session(async |conn: &mut PgConnection| {
            insert_row(conn, student).await
        })
    }

    fn update_email(&self, id: StudentId, email: &str)
        -> Result<Option<StudentId>, DbError>
    {
        self.session(async |conn: &mut PgConnection| {
            modify_row(conn, UPDATE_EMAIL, Some(email), id).await
        })
    }

    fn delete(&self, id: StudentId) -> Result<Option<StudentId>, DbError> {
        self.session(async |conn: &mut PgConnection| {
            modify_row(conn, DELETE, None, id).await
        })
    }
}

#[cfg(test)]
mod tests {
    //!
    //! 実ストアを使用するテスト
    //!
    //! PG*環境変数で指定したPostgreSQLが必要なため、通常は無効にしてある。
    //! `cargo test -- --ignored`で実行する。
    //!

    use super::*;

    ///
    /// 環境変数から接続パラメータを組み立てる
    ///
    fn test_info() -> ConnectInfo {
        let var = |key: &str, default: &str| {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        ConnectInfo::new(
            var("PGHOST", connection::DEFAULT_HOST),
            var("PGPORT", "5432").parse().unwrap(),
            var("PGDATABASE", connection::DEFAULT_DATABASE),
            var("PGUSER", connection::DEFAULT_USER),
            var("PGPASSWORD", connection::DEFAULT_PASSWORD),
        )
    }

    ///
    /// テーブルを用意した上でマネージャを生成する
    ///
    fn build_manager() -> StudentManager {
        let mgr = StudentManager::new(test_info()).unwrap();

        mgr.session(async |conn: &mut PgConnection| {
            sqlx::query(
                "CREATE TABLE IF NOT EXISTS students (
                    student_id SERIAL PRIMARY KEY,
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    enrollment_date DATE NOT NULL
                )"
            )
            .execute(&mut *conn)
            .await?;

            Ok::<(), DbError>(())
        }).unwrap();

        mgr
    }

    fn ada() -> NewStudent {
        NewStudent::new("Ada", "Lovelace", "ada@example.com", "1815-12-10")
            .unwrap()
    }

    #[test]
    /// 到達できない接続先は接続エラーになること
    fn unreachable_store_is_connection_error() {
        let info = ConnectInfo::new(
            "127.0.0.1".into(), 1, "university".into(), "postgres".into(),
            "postgres".into()
        );
        let mgr = StudentManager::new(info).unwrap();

        let err = mgr.list().unwrap_err();
        assert!(err.is_connection(), "{err}");
    }

    #[test]
    #[ignore = "requires a running PostgreSQL"]
    /// 登録したレコードが一覧にIDの昇順で現れること
    fn insert_then_list() {
        let mgr = build_manager();

        let id1 = mgr.insert(&ada()).unwrap();
        let id2 = mgr.insert(&ada()).unwrap();
        assert!(id1 < id2);

        let all = mgr.list().unwrap();
        assert!(all.windows(2).all(|w| w[0].id() < w[1].id()));

        let got = all.iter().find(|s| s.id() == id1).unwrap();
        assert_eq!(got.first_name(), "Ada");
        assert_eq!(got.last_name(), "Lovelace");
        assert_eq!(got.email(), "ada@example.com");
        assert_eq!(got.enrollment_date().to_string(), "1815-12-10");

        mgr.delete(id1).unwrap();
        mgr.delete(id2).unwrap();
    }

    #[test]
    #[ignore = "requires a running PostgreSQL"]
    /// メールアドレスの更新がその列だけに作用すること
    fn update_email_changes_only_email() {
        let mgr = build_manager();
        let id = mgr.insert(&ada()).unwrap();
        let before = mgr.list().unwrap();

        assert_eq!(mgr.update_email(id, "new@example.com").unwrap(), Some(id));

        let after = mgr.list().unwrap();
        assert_eq!(before.len(), after.len());

        let old = before.iter().find(|s| s.id() == id).unwrap();
        let new = after.iter().find(|s| s.id() == id).unwrap();
        let mut expected = old.clone();
        expected.set_email("new@example.com");
        assert_eq!(new, &expected);

        mgr.delete(id).unwrap();
    }

    #[test]
    #[ignore = "requires a running PostgreSQL"]
    /// 存在しないIDへの更新/削除はNoneとなり件数が変わらないこと
    fn missing_id_is_not_found() {
        let mgr = build_manager();
        let missing = StudentId::new(999_999);
        let count = mgr.list().unwrap().len();

        assert_eq!(mgr.update_email(missing, "x@example.com").unwrap(), None);
        assert_eq!(mgr.delete(missing).unwrap(), None);
        assert_eq!(mgr.list().unwrap().len(), count);
    }

    #[test]
    #[ignore = "requires a running PostgreSQL"]
    /// 削除は1件のみに作用し、2回目はNoneになること
    fn delete_is_idempotent() {
        let mgr = build_manager();
        let id = mgr.insert(&ada()).unwrap();
        let count = mgr.list().unwrap().len();

        assert_eq!(mgr.delete(id).unwrap(), Some(id));
        assert_eq!(mgr.list().unwrap().len(), count - 1);
        assert_eq!(mgr.delete(id).unwrap(), None);
    }
}
