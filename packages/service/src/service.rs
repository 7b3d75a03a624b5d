//! # ワークフローサービス
//!
//! Flowable クライアントを束ね、状態フィルタの変換とユーザー補完を行う。
//!
//! 一覧・単体取得の結果には、ユーザーディレクトリで解決した担当者
//! （[`Task::assignee_user`]）と開始ユーザー（[`Process::started_by`]）を添付する。
//! ディレクトリの取得に失敗しても警告を出すだけで、レコード自体は返す。

use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use chrono::TimeDelta;
use flowlink_domain::{
   Attachment,
   AttachmentUpload,
   NewUserForm,
   Process,
   ProcessListQuery,
   ProcessState,
   StartProcessForm,
   SubmitTaskForm,
   Task,
   TaskActionForm,
   TaskFormQuery,
   TaskListQuery,
   TaskState,
   UserInfo,
   clock::Clock,
};
use flowlink_infra::{FlowableClient, FlowableError};
use flowlink_shared::Paginated;
use serde_json::{Map, Value};

use crate::{
   directory::DirectoryCache,
   enrichment::{
      UserDirectory,
      attach_assignees,
      attach_starters,
      referenced_assignees,
      referenced_starters,
   },
};

/// ワークフローサービストレイト
#[async_trait]
pub trait WorkflowService: Send + Sync {
   /// タスクのフォームインスタンスモデルを取得する
   async fn get_task_form(
      &self,
      task_id: &str,
      form_definition_key: &str,
   ) -> Result<Map<String, Value>, FlowableError>;

   /// プロセスを開始し、新しいインスタンス ID を返す
   async fn start_process(&self, form: StartProcessForm) -> Result<String, FlowableError>;

   /// ユーザーのタスク一覧を状態で絞り込んで取得する（担当者を補完）
   async fn get_user_tasks(
      &self,
      state: TaskState,
      query: TaskListQuery,
   ) -> Result<Paginated<Task>, FlowableError>;

   /// プロセスインスタンスのタスク一覧を取得する（状態で絞り込まない、担当者を補完）
   async fn get_process_tasks(&self, query: TaskListQuery) -> Result<Paginated<Task>, FlowableError>;

   /// ユーザーが関与するプロセス一覧を状態で絞り込んで取得する（開始ユーザーを補完）
   async fn get_user_processes(
      &self,
      state: ProcessState,
      query: ProcessListQuery,
   ) -> Result<Paginated<Process>, FlowableError>;

   /// プロセスを 1 件取得する（開始ユーザーを補完）
   async fn get_process(&self, process_id: &str) -> Result<Process, FlowableError>;

   async fn submit_task(&self, form: SubmitTaskForm) -> Result<(), FlowableError>;

   async fn submit_task_action(
      &self,
      task_id: &str,
      form: TaskActionForm,
   ) -> Result<Task, FlowableError>;

   async fn create_user(&self, form: NewUserForm) -> Result<UserInfo, FlowableError>;

   async fn get_users(&self) -> Result<Vec<UserInfo>, FlowableError>;

   /// 指定した ID のユーザーをディレクトリの順序で返す
   ///
   /// ID が空なら Flowable へ問い合わせない。
   async fn get_users_by_ids(&self, ids: &[String]) -> Result<Vec<UserInfo>, FlowableError>;

   async fn create_attachment(&self, upload: AttachmentUpload) -> Result<Attachment, FlowableError>;

   async fn get_task_attachments(
      &self,
      task_id: &str,
   ) -> Result<Paginated<Attachment>, FlowableError>;
}

/// ワークフローサービス実装
///
/// C: FlowableClient
pub struct WorkflowServiceImpl<C> {
   client:          C,
   directory_cache: Option<DirectoryCache>,
}

impl<C> WorkflowServiceImpl<C>
where
   C: FlowableClient,
{
   /// ディレクトリキャッシュなしで作成する（補完のたびにディレクトリを取得する）
   pub fn new(client: C) -> Self {
      Self {
         client,
         directory_cache: None,
      }
   }

   /// 補完用のユーザーディレクトリを `ttl` の間キャッシュする
   pub fn with_directory_cache(mut self, ttl: TimeDelta) -> Self {
      self.directory_cache = Some(DirectoryCache::new(ttl));
      self
   }

   /// 指定した時刻プロバイダでディレクトリキャッシュを有効にする
   pub fn with_directory_cache_clock(mut self, ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
      self.directory_cache = Some(DirectoryCache::with_clock(ttl, clock));
      self
   }

   pub fn client(&self) -> &C {
      &self.client
   }

   /// 補完用のディレクトリを取得する（キャッシュが有効なら再利用する）
   async fn directory(&self) -> Result<Arc<UserDirectory>, FlowableError> {
      if let Some(cached) = self.directory_cache.as_ref().and_then(DirectoryCache::get) {
         tracing::debug!(users = cached.len(), "キャッシュ済みのユーザーディレクトリを使用");
         return Ok(cached);
      }

      let directory = Arc::new(UserDirectory::new(self.client.list_users().await?));
      if directory.is_empty() {
         tracing::warn!("ユーザーディレクトリが空です。補完対象のユーザーは解決されません");
      }
      if let Some(cache) = &self.directory_cache {
         cache.store(Arc::clone(&directory));
      }
      Ok(directory)
   }

   async fn enrich_tasks(&self, tasks: &mut [Task]) {
      if referenced_assignees(tasks).is_empty() {
         return;
      }

      match self.directory().await {
         Ok(directory) => attach_assignees(tasks, &directory),
         Err(e) => {
            tracing::warn!(error = %e, "担当者の補完に失敗しました。未補完のまま返します");
         }
      }
   }

   async fn enrich_processes(&self, processes: &mut [Process]) {
      if referenced_starters(processes).is_empty() {
         return;
      }

      match self.directory().await {
         Ok(directory) => attach_starters(processes, &directory),
         Err(e) => {
            tracing::warn!(error = %e, "開始ユーザーの補完に失敗しました。未補完のまま返します");
         }
      }
   }
}

#[async_trait]
impl<C> WorkflowService for WorkflowServiceImpl<C>
where
   C: FlowableClient,
{
   async fn get_task_form(
      &self,
      task_id: &str,
      form_definition_key: &str,
   ) -> Result<Map<String, Value>, FlowableError> {
      self.client
         .get_task_form(&TaskFormQuery::new(task_id, form_definition_key))
         .await
   }

   async fn start_process(&self, form: StartProcessForm) -> Result<String, FlowableError> {
      self.client.start_process_instance(&form).await
   }

   async fn get_user_tasks(
      &self,
      state: TaskState,
      query: TaskListQuery,
   ) -> Result<Paginated<Task>, FlowableError> {
      let mut page = self
         .client
         .list_historic_tasks(&query, state.finished_filter())
         .await?;
      self.enrich_tasks(&mut page.data).await;
      Ok(page)
   }

   async fn get_process_tasks(&self, query: TaskListQuery) -> Result<Paginated<Task>, FlowableError> {
      let mut page = self.client.list_historic_tasks(&query, None).await?;
      self.enrich_tasks(&mut page.data).await;
      Ok(page)
   }

   async fn get_user_processes(
      &self,
      state: ProcessState,
      query: ProcessListQuery,
   ) -> Result<Paginated<Process>, FlowableError> {
      let mut page = self
         .client
         .list_historic_processes(&query, state.finished_filter())
         .await?;
      self.enrich_processes(&mut page.data).await;
      Ok(page)
   }

   async fn get_process(&self, process_id: &str) -> Result<Process, FlowableError> {
      let mut process = self.client.get_historic_process(process_id).await?;
      self.enrich_processes(std::slice::from_mut(&mut process))
         .await;
      Ok(process)
   }

   async fn submit_task(&self, form: SubmitTaskForm) -> Result<(), FlowableError> {
      self.client.submit_task_form(&form).await
   }

   async fn submit_task_action(
      &self,
      task_id: &str,
      form: TaskActionForm,
   ) -> Result<Task, FlowableError> {
      self.client.execute_task_action(task_id, &form).await
   }

   async fn create_user(&self, form: NewUserForm) -> Result<UserInfo, FlowableError> {
      let user = self.client.create_user(&form).await?;
      if let Some(cache) = &self.directory_cache {
         cache.invalidate();
      }
      Ok(user)
   }

   async fn get_users(&self) -> Result<Vec<UserInfo>, FlowableError> {
      self.client.list_users().await
   }

   async fn get_users_by_ids(&self, ids: &[String]) -> Result<Vec<UserInfo>, FlowableError> {
      if ids.is_empty() {
         return Ok(Vec::new());
      }

      let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
      let users = self.client.list_users().await?;
      Ok(users
         .into_iter()
         .filter(|user| wanted.contains(user.id.as_str()))
         .collect())
   }

   async fn create_attachment(&self, upload: AttachmentUpload) -> Result<Attachment, FlowableError> {
      self.client.create_content_item(upload).await
   }

   async fn get_task_attachments(
      &self,
      task_id: &str,
   ) -> Result<Paginated<Attachment>, FlowableError> {
      self.client.list_content_items(task_id).await
   }
}

#[cfg(test)]
mod tests {
   use bytes::Bytes;
   use chrono::Utc;
   use flowlink_domain::clock::ManualClock;
   use flowlink_infra::mock::StubFlowableClient;
   use maplit::hashset;
   use pretty_assertions::assert_eq;
   use rstest::rstest;
   use serde_json::json;

   use super::*;

   const FINISHED: &str = "2024-01-01T00:00:00.000+0000";

   fn user(id: &str, first_name: &str) -> UserInfo {
      UserInfo {
         first_name: first_name.to_string(),
         ..UserInfo::new(id)
      }
   }

   fn task(id: &str, assignee: &str, finished: bool) -> Task {
      Task {
         assignee: Some(assignee.to_string()),
         process_instance_id: Some("p1".to_string()),
         end_time: finished.then(|| FINISHED.to_string()),
         ..Task::new(id)
      }
   }

   fn process(id: &str, start_user: &str, finished: bool) -> Process {
      Process {
         start_user_id: Some(start_user.to_string()),
         end_time: finished.then(|| FINISHED.to_string()),
         ..Process::new(id)
      }
   }

   fn stub() -> StubFlowableClient {
      StubFlowableClient::new()
         .with_users(vec![user("u1", "Ann"), user("u2", "Bob")])
         .with_tasks(vec![
            task("t1", "u1", false),
            task("t2", "u1", false),
            task("t3", "u1", true),
            task("t4", "u2", false),
         ])
         .with_processes(vec![
            process("p1", "u1", false),
            process("p2", "u1", true),
            process("p3", "ghost", false),
         ])
   }

   #[tokio::test]
   async fn test_未完了タスクの担当者を補完する() {
      let sut = WorkflowServiceImpl::new(stub());

      let page = sut
         .get_user_tasks(TaskState::Open, TaskListQuery::for_assignee("u1").page(0, 10))
         .await
         .unwrap();

      assert_eq!(page.data.len(), 2);
      assert!(page.is_consistent());
      for task in &page.data {
         assert!(!task.is_finished());
         assert_eq!(task.assignee_user.as_ref().unwrap().first_name, "Ann");
      }
   }

   #[rstest]
   #[case(TaskState::Open, Some(false), 2)]
   #[case(TaskState::Completed, Some(true), 1)]
   #[case(TaskState::All, None, 3)]
   #[tokio::test]
   async fn test_タスクの状態をfinishedパラメータに変換する(
      #[case] state: TaskState,
      #[case] expected_filter: Option<bool>,
      #[case] expected_len: usize,
   ) {
      let client = stub();
      let sut = WorkflowServiceImpl::new(client.clone());

      let page = sut
         .get_user_tasks(state, TaskListQuery::for_assignee("u1"))
         .await
         .unwrap();

      assert_eq!(client.finished_filters(), vec![expected_filter]);
      assert_eq!(page.data.len(), expected_len);
   }

   #[rstest]
   #[case(ProcessState::Running, Some(false))]
   #[case(ProcessState::Completed, Some(true))]
   #[case(ProcessState::parse("unknown"), None)]
   #[tokio::test]
   async fn test_プロセスの状態をfinishedパラメータに変換する(
      #[case] state: ProcessState,
      #[case] expected_filter: Option<bool>,
   ) {
      let client = stub();
      let sut = WorkflowServiceImpl::new(client.clone());

      let page = sut
         .get_user_processes(state, ProcessListQuery::for_user("u1"))
         .await
         .unwrap();

      assert_eq!(client.finished_filters(), vec![expected_filter]);
      for process in &page.data {
         assert_eq!(process.started_by.as_ref().unwrap().first_name, "Ann");
      }
   }

   #[tokio::test]
   async fn test_担当者が複数いてもディレクトリは1回だけ取得する() {
      let client = stub();
      let sut = WorkflowServiceImpl::new(client.clone());

      let page = sut
         .get_user_tasks(TaskState::All, TaskListQuery::for_process("p1"))
         .await
         .unwrap();

      assert_eq!(page.data.len(), 4);
      assert_eq!(client.list_users_calls(), 1);
      let names: Vec<_> = page
         .data
         .iter()
         .map(|t| t.assignee_user.as_ref().map(|u| u.first_name.as_str()))
         .collect();
      assert_eq!(
         names,
         vec![Some("Ann"), Some("Ann"), Some("Ann"), Some("Bob")]
      );
   }

   #[tokio::test]
   async fn test_ディレクトリが空でもタスク一覧を返す() {
      let client = StubFlowableClient::new().with_tasks(vec![task("t1", "u1", false)]);
      let sut = WorkflowServiceImpl::new(client.clone());

      let page = sut
         .get_user_tasks(TaskState::Open, TaskListQuery::for_assignee("u1"))
         .await
         .unwrap();

      assert_eq!(page.data.len(), 1);
      assert_eq!(page.data[0].assignee_user, None);
      assert_eq!(client.list_users_calls(), 1);
   }

   #[tokio::test]
   async fn test_プロセスのタスクは状態で絞り込まない() {
      let client = stub();
      let sut = WorkflowServiceImpl::new(client.clone());

      let page = sut
         .get_process_tasks(TaskListQuery::for_process("p1"))
         .await
         .unwrap();

      assert_eq!(page.data.len(), 4);
      assert_eq!(client.finished_filters(), vec![None]);
      assert_eq!(page.data[3].assignee_user.as_ref().unwrap().first_name, "Bob");
   }

   #[tokio::test]
   async fn test_プロセス取得で開始ユーザーを補完する() {
      let sut = WorkflowServiceImpl::new(stub());

      let process = sut.get_process("p1").await.unwrap();

      assert_eq!(process.started_by, Some(user("u1", "Ann")));
   }

   #[tokio::test]
   async fn test_ディレクトリに無い開始ユーザーは未設定のまま() {
      let sut = WorkflowServiceImpl::new(stub());

      let process = sut.get_process("p3").await.unwrap();

      assert_eq!(process.started_by, None);
   }

   #[tokio::test]
   async fn test_ディレクトリ取得に失敗してもプロセスを返す() {
      let sut = WorkflowServiceImpl::new(stub().failing_list_users());

      let process = sut.get_process("p1").await.unwrap();

      assert_eq!(process.id, "p1");
      assert_eq!(process.started_by, None);
   }

   #[tokio::test]
   async fn test_ディレクトリ取得に失敗してもタスク一覧を返す() {
      let sut = WorkflowServiceImpl::new(stub().failing_list_users());

      let page = sut
         .get_user_tasks(TaskState::All, TaskListQuery::for_assignee("u1"))
         .await
         .unwrap();

      assert_eq!(page.data.len(), 3);
      assert!(page.data.iter().all(|t| t.assignee_user.is_none()));
   }

   #[tokio::test]
   async fn test_存在しないプロセスはnot_foundを返す() {
      let sut = WorkflowServiceImpl::new(stub());

      let result = sut.get_process("missing").await;

      assert!(matches!(result, Err(FlowableError::NotFound(_))));
   }

   #[tokio::test]
   async fn test_参照するユーザーが無ければディレクトリを取得しない() {
      let client = StubFlowableClient::new()
         .with_users(vec![user("u1", "Ann")])
         .with_tasks(vec![Task {
            assignee: Some(String::new()),
            ..Task::new("t1")
         }]);
      let sut = WorkflowServiceImpl::new(client.clone());

      let page = sut
         .get_process_tasks(TaskListQuery::default())
         .await
         .unwrap();

      assert_eq!(page.data.len(), 1);
      assert_eq!(client.list_users_calls(), 0);
   }

   #[tokio::test]
   async fn test_キャッシュなしでは補完のたびにディレクトリを取得する() {
      let client = stub();
      let sut = WorkflowServiceImpl::new(client.clone());

      sut.get_process("p1").await.unwrap();
      sut.get_process("p1").await.unwrap();

      assert_eq!(client.list_users_calls(), 2);
   }

   #[tokio::test]
   async fn test_キャッシュ有効時は期限内のディレクトリを再利用する() {
      let client = stub();
      let clock = Arc::new(ManualClock::new(Utc::now()));
      let sut = WorkflowServiceImpl::new(client.clone())
         .with_directory_cache_clock(TimeDelta::minutes(5), clock.clone());

      sut.get_process("p1").await.unwrap();
      sut.get_process("p2").await.unwrap();
      assert_eq!(client.list_users_calls(), 1);

      clock.advance(TimeDelta::minutes(5));
      let process = sut.get_process("p1").await.unwrap();

      assert_eq!(client.list_users_calls(), 2);
      assert_eq!(process.started_by, Some(user("u1", "Ann")));
   }

   #[tokio::test]
   async fn test_取得に失敗したディレクトリはキャッシュしない() {
      let client = stub().failing_list_users();
      let sut = WorkflowServiceImpl::new(client.clone())
         .with_directory_cache(TimeDelta::minutes(5));

      sut.get_process("p1").await.unwrap();
      sut.get_process("p1").await.unwrap();

      assert_eq!(client.list_users_calls(), 2);
   }

   #[tokio::test]
   async fn test_プロセス開始で新しいインスタンスidを返す() {
      let client = stub().with_started_process_id("inst-42");
      let sut = WorkflowServiceImpl::new(client.clone());

      let id = sut
         .start_process(StartProcessForm::new("proc:1"))
         .await
         .unwrap();

      assert_eq!(id, "inst-42");
      assert_eq!(
         client.started_forms()[0].process_definition_id,
         "proc:1"
      );
   }

   #[tokio::test]
   async fn test_インスタンスidが返らなければエラー() {
      let sut = WorkflowServiceImpl::new(stub());

      let result = sut.start_process(StartProcessForm::new("proc:1")).await;

      assert_eq!(result, Err(FlowableError::MissingField("id")));
   }

   #[tokio::test]
   async fn test_指定idのユーザーをディレクトリ順で返す() {
      let client = StubFlowableClient::new().with_users(vec![
         user("u1", "Ann"),
         user("u2", "Bob"),
         user("u3", "Cy"),
      ]);
      let sut = WorkflowServiceImpl::new(client);

      let users = sut
         .get_users_by_ids(&["u3".to_string(), "u1".to_string(), "nobody".to_string()])
         .await
         .unwrap();

      let ids: Vec<_> = users.iter().map(|u| u.id.as_str()).collect();
      assert_eq!(ids, vec!["u1", "u3"]);
   }

   #[tokio::test]
   async fn test_空のid指定ではディレクトリを取得しない() {
      let client = stub();
      let sut = WorkflowServiceImpl::new(client.clone());

      let users = sut.get_users_by_ids(&[]).await.unwrap();

      assert!(users.is_empty());
      assert_eq!(client.list_users_calls(), 0);
   }

   #[tokio::test]
   async fn test_ユーザー作成後はキャッシュを破棄する() {
      let client = stub();
      let sut = WorkflowServiceImpl::new(client.clone())
         .with_directory_cache(TimeDelta::minutes(5));
      sut.get_process("p1").await.unwrap();

      let created = sut
         .create_user(NewUserForm {
            id:         "u9".to_string(),
            first_name: "Dee".to_string(),
            last_name:  "Ng".to_string(),
            email:      "dee@example.com".to_string(),
            password:   "pw".to_string(),
         })
         .await
         .unwrap();
      sut.get_process("p1").await.unwrap();

      assert_eq!(created.first_name, "Dee");
      assert_eq!(client.list_users_calls(), 2);
      let ids: HashSet<String> = sut
         .get_users()
         .await
         .unwrap()
         .into_iter()
         .map(|u| u.id)
         .collect();
      assert_eq!(ids, hashset! {"u1".to_string(), "u2".to_string(), "u9".to_string()});
   }

   #[tokio::test]
   async fn test_タスクフォームの取得とフォーム送信() {
      let mut form = Map::new();
      form.insert("key".to_string(), json!("approveForm"));
      let client = stub().with_task_form("t1", form);
      let sut = WorkflowServiceImpl::new(client.clone());

      let fetched = sut.get_task_form("t1", "approveForm").await.unwrap();
      sut.submit_task(SubmitTaskForm::new("t1", vec![]))
         .await
         .unwrap();

      assert_eq!(fetched["key"], json!("approveForm"));
      assert_eq!(client.submitted_forms().len(), 1);
   }

   #[tokio::test]
   async fn test_フォーム定義キーが空ならinvalid_input() {
      let sut = WorkflowServiceImpl::new(stub());

      let result = sut.get_task_form("t1", "").await;

      assert!(matches!(result, Err(FlowableError::InvalidInput(_))));
   }

   #[tokio::test]
   async fn test_タスクアクションでタスクを完了する() {
      let sut = WorkflowServiceImpl::new(stub());

      let task = sut
         .submit_task_action("t1", TaskActionForm::complete(vec![]))
         .await
         .unwrap();

      assert!(task.is_finished());
   }

   #[tokio::test]
   async fn test_既存の添付ファイルをタスクで絞り込んで返す() {
      let existing = |id: &str, task_id: &str| Attachment {
         id: id.to_string(),
         name: Some("invoice".to_string()),
         mime_type: Some("application/pdf".to_string()),
         task_id: Some(task_id.to_string()),
         process_instance_id: None,
         content_store_id: None,
         content_store_name: None,
         content_available: true,
         created: None,
         created_by: Some("u1".to_string()),
         last_modified: None,
         last_modified_by: None,
         url: None,
      };
      let sut = WorkflowServiceImpl::new(
         stub().with_attachments(vec![existing("a1", "t1"), existing("a2", "t2")]),
      );

      let page = sut.get_task_attachments("t2").await.unwrap();

      assert_eq!(page.total, 1);
      assert_eq!(page.data[0].id, "a2");
   }

   #[tokio::test]
   async fn test_添付ファイルの登録と一覧() {
      let sut = WorkflowServiceImpl::new(stub());

      let attachment = sut
         .create_attachment(AttachmentUpload {
            task_id:    "t1".to_string(),
            field_name: "invoice".to_string(),
            file_name:  "invoice.pdf".to_string(),
            mime_type:  "application/pdf".to_string(),
            content:    Bytes::from_static(b"%PDF"),
         })
         .await
         .unwrap();
      let page = sut.get_task_attachments("t1").await.unwrap();

      assert_eq!(page.data, vec![attachment]);
      assert!(sut.get_task_attachments("t2").await.unwrap().data.is_empty());
   }
}
