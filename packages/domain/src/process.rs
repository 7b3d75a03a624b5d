//! # プロセスインスタンス
//!
//! ワークフロー定義の 1 回分の実行。
//! `started_by` は Flowable が返すフィールドではなく、
//! ユーザー補完処理が `start_user_id` をもとに後から埋める。

use serde::{Deserialize, Serialize};

use crate::{serde_helpers::null_as_default, user::UserInfo};

/// プロセスインスタンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub business_key: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suspended: bool,
    #[serde(default)]
    pub process_definition_url: Option<String>,
    #[serde(default)]
    pub activity_id: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    /// プロセスが終了していれば設定される
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub start_user_id: Option<String>,
    /// 補完済みの開始ユーザー（補完前、または該当ユーザーがいない場合は `None`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_by: Option<UserInfo>,
}

impl Process {
    /// ID のみを持つプロセスを作成する
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            url: None,
            business_key: None,
            suspended: false,
            process_definition_url: None,
            activity_id: None,
            start_time: None,
            end_time: None,
            start_user_id: None,
            started_by: None,
        }
    }

    /// 開始ユーザー ID（空文字列は未設定として扱う）
    pub fn start_user(&self) -> Option<&str> {
        self.start_user_id.as_deref().filter(|id| !id.is_empty())
    }

    /// プロセスが終了しているか
    pub fn is_finished(&self) -> bool {
        self.end_time.as_deref().is_some_and(|t| !t.is_empty())
    }
}
