//! タスク関連の Flowable クライアント

use async_trait::async_trait;
use flowlink_domain::{Task, TaskActionForm, TaskListQuery};
use flowlink_shared::Paginated;
use reqwest::Method;

use super::{
    client_impl::FlowableClientImpl,
    paths,
    response::{handle_response, warn_if_inconsistent},
};
use crate::error::FlowableError;

/// タスク関連の Flowable クライアントトレイト
#[async_trait]
pub trait FlowableTaskClient: Send + Sync {
    /// 履歴タスクインスタンスの一覧を取得する
    ///
    /// Flowable の `GET process-api/history/historic-task-instances/` を呼び出す。
    /// `finished` が `None` の場合はパラメータを付与せず、完了・未完了の両方を返す。
    async fn list_historic_tasks(
        &self,
        query: &TaskListQuery,
        finished: Option<bool>,
    ) -> Result<Paginated<Task>, FlowableError>;

    /// タスクに対してアクション（complete / claim など）を実行する
    ///
    /// Flowable の `POST process-api/runtime/tasks/{task_id}` を呼び出す。
    async fn execute_task_action(
        &self,
        task_id: &str,
        form: &TaskActionForm,
    ) -> Result<Task, FlowableError>;
}

#[async_trait]
impl FlowableTaskClient for FlowableClientImpl {
    #[tracing::instrument(skip_all, level = "debug", fields(?finished))]
    async fn list_historic_tasks(
        &self,
        query: &TaskListQuery,
        finished: Option<bool>,
    ) -> Result<Paginated<Task>, FlowableError> {
        let mut request = self
            .request(Method::GET, paths::HISTORIC_TASK_INSTANCES)
            .query(query);
        if let Some(finished) = finished {
            request = request.query(&[("finished", finished)]);
        }

        let response = request.send().await?;
        let page = handle_response(response, None).await?;
        warn_if_inconsistent(&page, "historic-task-instances");
        Ok(page)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%task_id, action = %form.action))]
    async fn execute_task_action(
        &self,
        task_id: &str,
        form: &TaskActionForm,
    ) -> Result<Task, FlowableError> {
        let path = paths::item(paths::RUNTIME_TASKS, task_id);

        let response = self.request(Method::POST, &path).json(form).send().await?;
        handle_response(response, None).await
    }
}
