//! # 一覧取得クエリと状態フィルタ
//!
//! 履歴タスク・履歴プロセスの一覧取得に使うクエリパラメータ。
//! クエリ文字列のキーは Flowable REST API に合わせて camelCase とする。

use std::fmt;

use serde::Serialize;

/// Flowable のデフォルトページサイズ
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// 履歴タスク一覧のクエリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_instance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_assignee:       Option<String>,
    pub start:               i64,
    pub size:                i64,
}

impl Default for TaskListQuery {
    fn default() -> Self {
        Self {
            process_instance_id: None,
            task_assignee:       None,
            start:               0,
            size:                DEFAULT_PAGE_SIZE,
        }
    }
}

impl TaskListQuery {
    /// 担当者で絞り込むクエリ
    pub fn for_assignee(assignee: impl Into<String>) -> Self {
        Self {
            task_assignee: Some(assignee.into()),
            ..Self::default()
        }
    }

    /// プロセスインスタンスで絞り込むクエリ
    pub fn for_process(process_instance_id: impl Into<String>) -> Self {
        Self {
            process_instance_id: Some(process_instance_id.into()),
            ..Self::default()
        }
    }

    /// オフセットとページサイズを指定する
    pub fn page(mut self, start: i64, size: i64) -> Self {
        self.start = start;
        self.size = size;
        self
    }
}

/// 履歴プロセス一覧のクエリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub involved_user: Option<String>,
    pub start:         i64,
    pub size:          i64,
}

impl Default for ProcessListQuery {
    fn default() -> Self {
        Self {
            involved_user: None,
            start:         0,
            size:          DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProcessListQuery {
    /// 関与ユーザーで絞り込むクエリ
    pub fn for_user(involved_user: impl Into<String>) -> Self {
        Self {
            involved_user: Some(involved_user.into()),
            ..Self::default()
        }
    }

    /// オフセットとページサイズを指定する
    pub fn page(mut self, start: i64, size: i64) -> Self {
        self.start = start;
        self.size = size;
        self
    }
}

/// タスクの状態フィルタ
///
/// `Open` は未完了のみ、`Completed` は完了済みのみ、`All` は両方を返す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskState {
    Open,
    Completed,
    #[default]
    All,
}

impl TaskState {
    /// 文字列から状態をパースする
    ///
    /// `"open"` / `"completed"` 以外はすべて [`All`](TaskState::All) として扱う。
    pub fn parse(s: &str) -> Self {
        match s {
            "open" => Self::Open,
            "completed" => Self::Completed,
            _ => Self::All,
        }
    }

    /// Flowable の `finished` パラメータに渡す値（`None` はパラメータ省略）
    pub fn finished_filter(self) -> Option<bool> {
        match self {
            Self::Open => Some(false),
            Self::Completed => Some(true),
            Self::All => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Completed => "completed",
            Self::All => "all",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// プロセスの状態フィルタ
///
/// `Running` は実行中のみ、`Completed` は終了済みのみ、`All` は両方を返す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessState {
    Running,
    Completed,
    #[default]
    All,
}

impl ProcessState {
    /// 文字列から状態をパースする
    ///
    /// `"running"` / `"completed"` 以外はすべて [`All`](ProcessState::All) として扱う。
    pub fn parse(s: &str) -> Self {
        match s {
            "running" => Self::Running,
            "completed" => Self::Completed,
            _ => Self::All,
        }
    }

    /// Flowable の `finished` パラメータに渡す値（`None` はパラメータ省略）
    pub fn finished_filter(self) -> Option<bool> {
        match self {
            Self::Running => Some(false),
            Self::Completed => Some(true),
            Self::All => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::All => "all",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
