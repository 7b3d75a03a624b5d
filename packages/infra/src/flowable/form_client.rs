//! フォーム関連の Flowable クライアント

use async_trait::async_trait;
use flowlink_domain::{SubmitTaskForm, TaskFormQuery};
use reqwest::Method;
use serde_json::{Map, Value};

use super::{
    client_impl::FlowableClientImpl,
    paths,
    response::{handle_empty_response, handle_response},
};
use crate::error::FlowableError;

/// フォーム関連の Flowable クライアントトレイト
#[async_trait]
pub trait FlowableFormClient: Send + Sync {
    /// タスクに紐づくフォームインスタンスモデルを取得する
    ///
    /// Flowable の `POST form-api/form/form-instance-model` を呼び出す。
    /// タスク ID・フォーム定義キーが空の場合はリクエストを送らずに
    /// `InvalidInput` を返す。
    async fn get_task_form(&self, query: &TaskFormQuery) -> Result<Map<String, Value>, FlowableError>;

    /// タスクフォームを送信する
    ///
    /// Flowable の `POST process-api/form/form-data/` を呼び出す。
    /// 成功時のレスポンスボディは使わない。
    async fn submit_task_form(&self, form: &SubmitTaskForm) -> Result<(), FlowableError>;
}

#[async_trait]
impl FlowableFormClient for FlowableClientImpl {
    #[tracing::instrument(skip_all, level = "debug", fields(task_id = %query.task_id))]
    async fn get_task_form(&self, query: &TaskFormQuery) -> Result<Map<String, Value>, FlowableError> {
        query.validate()?;

        let response = self
            .request(Method::POST, paths::FORM_INSTANCE_MODEL)
            .json(query)
            .send()
            .await?;
        handle_response(response, None).await
    }

    #[tracing::instrument(skip_all, level = "debug", fields(task_id = %form.task_id))]
    async fn submit_task_form(&self, form: &SubmitTaskForm) -> Result<(), FlowableError> {
        let response = self
            .request(Method::POST, paths::FORM_DATA)
            .json(form)
            .send()
            .await?;
        handle_empty_response(response, None).await
    }
}
