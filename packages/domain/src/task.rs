//! # タスク
//!
//! Flowable の履歴タスクインスタンス（historic task instance）。
//! 実行中のプロセス内でユーザーに割り当てられた 1 単位の作業を表す。
//!
//! `assignee_user` は Flowable が返すフィールドではなく、
//! ユーザー補完処理が `assignee` をもとに後から埋める。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{form::FormVariable, serde_helpers::null_as_default, user::UserInfo};

/// タスク
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    /// 補完済みの担当者（補完前、または該当ユーザーがいない場合は `None`）
    #[serde(
        default,
        rename = "assignee_user",
        skip_serializing_if = "Option::is_none"
    )]
    pub assignee_user: Option<UserInfo>,
    #[serde(default)]
    pub form_key: Option<String>,
    #[serde(default)]
    pub task_definition_key: Option<String>,
    #[serde(default)]
    pub execution_id: Option<String>,
    #[serde(default)]
    pub process_instance_id: Option<String>,
    #[serde(default)]
    pub process_definition_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub claim_time: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    /// 送信済みのフォーム値（同名の値が複数含まれることがある）
    #[serde(default, deserialize_with = "null_as_default")]
    pub variables: Vec<FormVariable>,
}

impl Task {
    /// ID のみを持つタスクを作成する
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            assignee: None,
            assignee_user: None,
            form_key: None,
            task_definition_key: None,
            execution_id: None,
            process_instance_id: None,
            process_definition_id: None,
            description: None,
            create_time: None,
            start_time: None,
            claim_time: None,
            due_date: None,
            end_time: None,
            variables: Vec::new(),
        }
    }

    /// 担当者 ID（空文字列は未割り当てとして扱う）
    pub fn assignee_id(&self) -> Option<&str> {
        self.assignee.as_deref().filter(|id| !id.is_empty())
    }

    /// タスクが完了しているか（終了時刻が設定されているか）
    pub fn is_finished(&self) -> bool {
        self.end_time.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// フォーム値を名前で引けるマップに変換する
    ///
    /// 同名の値が複数ある場合は後に現れたものを採用する。
    pub fn variables_map(&self) -> HashMap<&str, &serde_json::Value> {
        self.variables
            .iter()
            .map(|v| (v.name.as_str(), &v.value))
            .collect()
    }
}
