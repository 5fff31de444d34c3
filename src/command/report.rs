/*
 * Student records manager
 *
 *  Copyright (C) 2025 Hiroshi KUWAGATA
 */

//!
//! サブコマンドの実行結果の表示処理
//!

use std::fmt::{Display, Formatter};

use anyhow::Result;
use serde_json::{json, Value};

use crate::database::types::{Student, StudentId};

///
/// サブコマンドの実行結果を表す列挙型
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// 一覧の取得(ID昇順)
    Listed(Vec<Student>),

    /// 登録完了(採番されたID)
    Added(StudentId),

    /// メールアドレスの更新完了
    EmailUpdated(StudentId),

    /// 削除完了
    Deleted(StudentId),

    /// 対象IDのレコードが存在しない(エラーではない)
    NotFound(StudentId),
}

impl Outcome {
    ///
    /// JSON表現への変換
    ///
    pub(crate) fn to_json(&self) -> Result<Value> {
        let value = match self {
            Self::Listed(rows) => serde_json::to_value(rows)?,
            Self::Added(id) => json!({"result": "added", "student_id": id}),
            Self::EmailUpdated(id) => {
                json!({"result": "email-updated", "student_id": id})
            }
            Self::Deleted(id) => json!({"result": "deleted", "student_id": id}),
            Self::NotFound(id) => json!({"result": "not-found", "student_id": id}),
        };

        Ok(value)
    }
}

///
/// 一覧表示用の1行の生成
///
fn row_line(row: &Student) -> String {
    format!(
        "{}: {} {} ({}) — {}",
        row.id(),
        row.first_name(),
        row.last_name(),
        row.email(),
        row.enrollment_date().format("%Y-%m-%d"),
    )
}

// Displayトレイトの実装(テキスト出力)
impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Listed(rows) if rows.is_empty() => {
                write!(f, "No students found.")
            }

            Self::Listed(rows) => {
                let lines: Vec<String> = rows.iter().map(row_line).collect();
                write!(f, "{}", lines.join("\n"))
            }

            Self::Added(id) => write!(f, "Added student with ID {}", id),
            Self::EmailUpdated(id) => write!(f, "Updated email for student {}", id),
            Self::Deleted(id) => write!(f, "Deleted student {}", id),
            Self::NotFound(id) => write!(f, "No student found with id {}", id),
        }
    }
}

///
/// 実行結果の文字列化
///
/// # 引数
/// * `outcome` - 実行結果
/// * `json` - JSON形式で出力するか否か
///
pub(crate) fn render(outcome: &Outcome, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string(&outcome.to_json()?)?)
    } else {
        Ok(outcome.to_string())
    }
}

///
/// 実行結果の標準出力への表示
///
pub(crate) fn print(outcome: &Outcome, json: bool) -> Result<()> {
    println!("{}", render(outcome, json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::types::NewStudent;

    fn ada(id: i32) -> Student {
        NewStudent::new("Ada", "Lovelace", "ada@example.com", "1815-12-10")
            .unwrap()
            .into_student(StudentId::new(id))
    }

    #[test]
    /// 一覧の各行が所定の書式になること
    fn listed_rows_are_formatted() {
        let outcome = Outcome::Listed(vec![ada(1), ada(2)]);

        assert_eq!(
            render(&outcome, false).unwrap(),
            "1: Ada Lovelace (ada@example.com) — 1815-12-10\n\
             2: Ada Lovelace (ada@example.com) — 1815-12-10"
        );
    }

    #[test]
    /// 空の一覧はエラーではなくメッセージになること
    fn empty_list_message() {
        assert_eq!(
            render(&Outcome::Listed(vec![]), false).unwrap(),
            "No students found."
        );
    }

    #[test]
    /// 単一結果のメッセージ
    fn single_line_messages() {
        let id = StudentId::new(5);

        assert_eq!(Outcome::Added(id).to_string(), "Added student with ID 5");
        assert_eq!(
            Outcome::EmailUpdated(id).to_string(),
            "Updated email for student 5"
        );
        assert_eq!(Outcome::Deleted(id).to_string(), "Deleted student 5");
        assert_eq!(
            Outcome::NotFound(id).to_string(),
            "No student found with id 5"
        );
    }

    #[test]
    /// JSON出力の形式
    fn json_output() {
        let listed = render(&Outcome::Listed(vec![ada(1)]), true).unwrap();
        let value: Value = serde_json::from_str(&listed).unwrap();
        assert_eq!(value[0]["student_id"], 1);
        assert_eq!(value[0]["enrollment_date"], "1815-12-10");

        let missing = render(&Outcome::NotFound(StudentId::new(9)), true).unwrap();
        assert_eq!(missing, r#"{"result":"not-found","student_id":9}"#);
    }
}
