//! # テスト用スタブクライアント
//!
//! サービス層のテストで使用するインメモリの Flowable スタブ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! flowlink-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use flowlink_domain::{
   Attachment,
   AttachmentUpload,
   NewUserForm,
   Process,
   ProcessListQuery,
   StartProcessForm,
   SubmitTaskForm,
   Task,
   TaskActionForm,
   TaskFormQuery,
   TaskListQuery,
   UserInfo,
};
use flowlink_shared::Paginated;
use serde_json::{Map, Value};

use crate::{
   error::FlowableError,
   flowable::{
      FlowableContentClient,
      FlowableFormClient,
      FlowableIdentityClient,
      FlowableProcessClient,
      FlowableTaskClient,
   },
};

#[derive(Default)]
struct StubState {
   users:            Vec<UserInfo>,
   tasks:            Vec<Task>,
   processes:        Vec<Process>,
   attachments:      Vec<Attachment>,
   task_forms:       Vec<(String, Map<String, Value>)>,
   submitted_forms:  Vec<SubmitTaskForm>,
   started_forms:    Vec<StartProcessForm>,
   started_id:       Option<String>,
   fail_list_users:  bool,
   list_users_calls: usize,
   finished_filters: Vec<Option<bool>>,
}

/// インメモリの Flowable スタブ
///
/// clone したインスタンスは状態を共有するため、サービスに渡した後も
/// テスト側から呼び出し履歴を検査できる。
#[derive(Clone, Default)]
pub struct StubFlowableClient {
   state: Arc<Mutex<StubState>>,
}

impl StubFlowableClient {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn with_users(self, users: Vec<UserInfo>) -> Self {
      self.state.lock().unwrap().users = users;
      self
   }

   pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
      self.state.lock().unwrap().tasks = tasks;
      self
   }

   pub fn with_processes(self, processes: Vec<Process>) -> Self {
      self.state.lock().unwrap().processes = processes;
      self
   }

   pub fn with_attachments(self, attachments: Vec<Attachment>) -> Self {
      self.state.lock().unwrap().attachments = attachments;
      self
   }

   pub fn with_task_form(self, task_id: &str, form: Map<String, Value>) -> Self {
      self.state
         .lock()
         .unwrap()
         .task_forms
         .push((task_id.to_string(), form));
      self
   }

   /// プロセス開始時に返す ID（`None` のままだと `MissingField("id")`）
   pub fn with_started_process_id(self, id: &str) -> Self {
      self.state.lock().unwrap().started_id = Some(id.to_string());
      self
   }

   /// ユーザー一覧取得を失敗させる
   pub fn failing_list_users(self) -> Self {
      self.state.lock().unwrap().fail_list_users = true;
      self
   }

   /// `list_users` が呼ばれた回数
   pub fn list_users_calls(&self) -> usize {
      self.state.lock().unwrap().list_users_calls
   }

   /// 一覧取得で渡された `finished` パラメータの履歴
   pub fn finished_filters(&self) -> Vec<Option<bool>> {
      self.state.lock().unwrap().finished_filters.clone()
   }

   pub fn submitted_forms(&self) -> Vec<SubmitTaskForm> {
      self.state.lock().unwrap().submitted_forms.clone()
   }

   pub fn started_forms(&self) -> Vec<StartProcessForm> {
      self.state.lock().unwrap().started_forms.clone()
   }
}

fn paginate<T>(items: Vec<T>, start: i64, size: i64) -> Paginated<T> {
   let total = items.len() as i64;
   let data: Vec<T> = items
      .into_iter()
      .skip(start.max(0) as usize)
      .take(size.max(0) as usize)
      .collect();
   Paginated {
      size: data.len() as i64,
      data,
      total,
      start,
      sort: None,
      order: None,
   }
}

#[async_trait]
impl FlowableFormClient for StubFlowableClient {
   async fn get_task_form(&self, query: &TaskFormQuery) -> Result<Map<String, Value>, FlowableError> {
      query.validate()?;
      self.state
         .lock()
         .unwrap()
         .task_forms
         .iter()
         .find(|(task_id, _)| *task_id == query.task_id)
         .map(|(_, form)| form.clone())
         .ok_or_else(|| FlowableError::Unexpected("404 Not Found: ".to_string()))
   }

   async fn submit_task_form(&self, form: &SubmitTaskForm) -> Result<(), FlowableError> {
      self.state.lock().unwrap().submitted_forms.push(form.clone());
      Ok(())
   }
}

#[async_trait]
impl FlowableProcessClient for StubFlowableClient {
   async fn start_process_instance(&self, form: &StartProcessForm) -> Result<String, FlowableError> {
      let mut state = self.state.lock().unwrap();
      state.started_forms.push(form.clone());
      state
         .started_id
         .clone()
         .filter(|id| !id.is_empty())
         .ok_or(FlowableError::MissingField("id"))
   }

   async fn list_historic_processes(
      &self,
      query: &ProcessListQuery,
      finished: Option<bool>,
   ) -> Result<Paginated<Process>, FlowableError> {
      let mut state = self.state.lock().unwrap();
      state.finished_filters.push(finished);
      let matched = state
         .processes
         .iter()
         .filter(|p| finished.is_none_or(|f| p.is_finished() == f))
         .filter(|p| {
            query
               .involved_user
               .as_deref()
               .is_none_or(|user| p.start_user() == Some(user))
         })
         .cloned()
         .collect();
      Ok(paginate(matched, query.start, query.size))
   }

   async fn get_historic_process(&self, process_id: &str) -> Result<Process, FlowableError> {
      self.state
         .lock()
         .unwrap()
         .processes
         .iter()
         .find(|p| p.id == process_id)
         .cloned()
         .ok_or_else(|| FlowableError::NotFound(format!("プロセスインスタンス {process_id}")))
   }
}

#[async_trait]
impl FlowableTaskClient for StubFlowableClient {
   async fn list_historic_tasks(
      &self,
      query: &TaskListQuery,
      finished: Option<bool>,
   ) -> Result<Paginated<Task>, FlowableError> {
      let mut state = self.state.lock().unwrap();
      state.finished_filters.push(finished);
      let matched = state
         .tasks
         .iter()
         .filter(|t| finished.is_none_or(|f| t.is_finished() == f))
         .filter(|t| {
            query
               .task_assignee
               .as_deref()
               .is_none_or(|user| t.assignee_id() == Some(user))
         })
         .filter(|t| {
            query
               .process_instance_id
               .as_deref()
               .is_none_or(|pid| t.process_instance_id.as_deref() == Some(pid))
         })
         .cloned()
         .collect();
      Ok(paginate(matched, query.start, query.size))
   }

   async fn execute_task_action(
      &self,
      task_id: &str,
      form: &TaskActionForm,
   ) -> Result<Task, FlowableError> {
      let mut state = self.state.lock().unwrap();
      let task = state
         .tasks
         .iter_mut()
         .find(|t| t.id == task_id)
         .ok_or_else(|| FlowableError::Unexpected("404 Not Found: ".to_string()))?;
      if let Some(assignee) = &form.assignee {
         task.assignee = Some(assignee.clone());
      }
      if form.action == "complete" {
         task.end_time = Some("2024-01-01T00:00:00.000+0000".to_string());
      }
      Ok(task.clone())
   }
}

#[async_trait]
impl FlowableIdentityClient for StubFlowableClient {
   async fn create_user(&self, form: &NewUserForm) -> Result<UserInfo, FlowableError> {
      let mut state = self.state.lock().unwrap();
      if state.users.iter().any(|u| u.id == form.id) {
         return Err(FlowableError::Conflict(format!(
            "A user with id '{}' already exists",
            form.id
         )));
      }
      let user = UserInfo {
         first_name: form.first_name.clone(),
         last_name: form.last_name.clone(),
         email: form.email.clone(),
         ..UserInfo::new(form.id.clone())
      };
      state.users.push(user.clone());
      Ok(user)
   }

   async fn list_users(&self) -> Result<Vec<UserInfo>, FlowableError> {
      let mut state = self.state.lock().unwrap();
      state.list_users_calls += 1;
      if state.fail_list_users {
         return Err(FlowableError::Network("connection refused".to_string()));
      }
      Ok(state.users.clone())
   }
}

#[async_trait]
impl FlowableContentClient for StubFlowableClient {
   async fn create_content_item(&self, upload: AttachmentUpload) -> Result<Attachment, FlowableError> {
      upload.validate()?;
      let mut state = self.state.lock().unwrap();
      let attachment = Attachment {
         id: format!("content-{}", state.attachments.len() + 1),
         name: Some(upload.field_name),
         mime_type: Some(upload.mime_type),
         task_id: Some(upload.task_id),
         process_instance_id: None,
         content_store_id: None,
         content_store_name: None,
         content_available: !upload.content.is_empty(),
         created: None,
         created_by: None,
         last_modified: None,
         last_modified_by: None,
         url: None,
      };
      state.attachments.push(attachment.clone());
      Ok(attachment)
   }

   async fn list_content_items(&self, task_id: &str) -> Result<Paginated<Attachment>, FlowableError> {
      let matched = self
         .state
         .lock()
         .unwrap()
         .attachments
         .iter()
         .filter(|a| a.task_id.as_deref() == Some(task_id))
         .cloned()
         .collect();
      Ok(Paginated::single_page(matched))
   }
}
