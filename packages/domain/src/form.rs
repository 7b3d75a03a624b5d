//! # 送信用フォーム
//!
//! Flowable へ送るリクエストボディの型。
//! JSON のフィールド名は Flowable REST API に合わせて camelCase とする。

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// フォームの 1 行分（名前と値の組）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormVariable {
    pub name:  String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl FormVariable {
    pub fn new(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name:  name.into(),
            value: value.into(),
        }
    }
}

/// プロセス開始フォーム
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartProcessForm {
    pub process_definition_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_key:          Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variables:             Vec<FormVariable>,
}

impl StartProcessForm {
    pub fn new(process_definition_id: impl Into<String>) -> Self {
        Self {
            process_definition_id: process_definition_id.into(),
            business_key:          None,
            variables:             Vec::new(),
        }
    }

    pub fn with_business_key(mut self, business_key: impl Into<String>) -> Self {
        self.business_key = Some(business_key.into());
        self
    }

    pub fn with_variable(mut self, variable: FormVariable) -> Self {
        self.variables.push(variable);
        self
    }
}

/// タスクフォーム取得の条件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFormQuery {
    pub task_id:             String,
    pub form_definition_key: String,
}

impl TaskFormQuery {
    pub fn new(task_id: impl Into<String>, form_definition_key: impl Into<String>) -> Self {
        Self {
            task_id:             task_id.into(),
            form_definition_key: form_definition_key.into(),
        }
    }

    /// タスク ID とフォーム定義キーがどちらも空でないことを検証する
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.task_id.trim().is_empty() {
            return Err(DomainError::Validation("タスク ID は必須です".to_string()));
        }
        if self.form_definition_key.trim().is_empty() {
            return Err(DomainError::Validation(
                "フォーム定義キーは必須です".to_string(),
            ));
        }
        Ok(())
    }
}

/// タスクフォーム送信
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTaskForm {
    pub task_id:    String,
    pub properties: Vec<FormVariable>,
}

impl SubmitTaskForm {
    pub fn new(task_id: impl Into<String>, properties: Vec<FormVariable>) -> Self {
        Self {
            task_id: task_id.into(),
            properties,
        }
    }
}

/// タスクアクション送信（complete / claim / delegate / resolve）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskActionForm {
    pub action:    String,
    /// claim / delegate 時の担当者
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee:  Option<String>,
    pub variables: Vec<FormVariable>,
}

impl TaskActionForm {
    pub fn new(action: impl Into<String>, variables: Vec<FormVariable>) -> Self {
        Self {
            action: action.into(),
            assignee: None,
            variables,
        }
    }

    pub fn complete(variables: Vec<FormVariable>) -> Self {
        Self::new("complete", variables)
    }

    pub fn claim(assignee: impl Into<String>) -> Self {
        Self {
            assignee: Some(assignee.into()),
            ..Self::new("claim", Vec::new())
        }
    }
}

/// ユーザー作成フォーム
///
/// パスワードを含むため `Debug` 出力ではマスクする。
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserForm {
    pub id:         String,
    pub first_name: String,
    pub last_name:  String,
    pub email:      String,
    pub password:   String,
}

impl fmt::Debug for NewUserForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUserForm")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// 添付ファイルアップロード
///
/// multipart で送信する。`field_name` はファイルパートの名前と
/// コンテンツアイテムの `name` の両方に使われる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    pub task_id:    String,
    pub field_name: String,
    pub file_name:  String,
    pub mime_type:  String,
    pub content:    Bytes,
}

impl AttachmentUpload {
    /// 送信前に必須項目が空でないことを検証する
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.task_id.trim().is_empty() {
            return Err(DomainError::Validation("タスク ID は必須です".to_string()));
        }
        if self.field_name.trim().is_empty() {
            return Err(DomainError::Validation("フィールド名は必須です".to_string()));
        }
        if self.file_name.trim().is_empty() {
            return Err(DomainError::Validation("ファイル名は必須です".to_string()));
        }
        Ok(())
    }
}
