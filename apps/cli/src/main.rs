//! # FlowLink CLI
//!
//! Flowable REST API を操作するコマンドラインツール。
//! 結果は整形済み JSON として標準出力に書き出し、ログは標準エラー出力に流す。
//!
//! ## 環境変数
//!
//! 接続設定は `.env` ファイルまたは環境変数で与える。
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `FLOWABLE_URL` | **Yes** | Flowable のベース URL |
//! | `FLOWABLE_APP_ROOT` | No | アプリケーションルート（デフォルト: `flowable-task`） |
//! | `FLOWABLE_ACCOUNT` | **Yes** | REST API のアカウント |
//! | `FLOWABLE_PASSWORD` | **Yes** | REST API のパスワード |
//! | `FLOWABLE_TIMEOUT_SECS` | No | リクエストタイムアウト秒数 |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//! | `FLOWLINK_DIRECTORY_CACHE_SECS` | No | ユーザーディレクトリのキャッシュ秒数（未設定時はキャッシュしない） |
//!
//! ## 使用例
//!
//! ```bash
//! flowlink tasks kermit --state open
//! flowlink process 2501
//! flowlink upload 5 invoice ./invoice.pdf --mime application/pdf
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use bytes::Bytes;
use chrono::TimeDelta;
use clap::{Parser, Subcommand};
use flowlink_domain::{
    AttachmentUpload,
    ProcessListQuery,
    ProcessState,
    StartProcessForm,
    TaskListQuery,
    TaskState,
};
use flowlink_infra::{FlowableClientImpl, FlowableConfig};
use flowlink_service::{WorkflowService, WorkflowServiceImpl};
use flowlink_shared::observability::{TracingConfig, init_tracing};
use serde::Serialize;

/// MIME タイプ未指定時のアップロード形式
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Flowable REST API client
#[derive(Debug, Parser)]
#[command(name = "flowlink", version, about, long_about = None)]
struct Cli {
    /// Enable debug logs for flowlink crates
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Cache the user directory for this many seconds during enrichment
    #[arg(long, global = true, env = "FLOWLINK_DIRECTORY_CACHE_SECS")]
    directory_cache_secs: Option<i64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every user in the directory
    Users,

    /// List tasks assigned to a user
    Tasks {
        user: String,
        /// open, completed or all (anything else means all)
        #[arg(long)]
        state: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },

    /// List every task of a process instance
    ProcessTasks {
        process_id: String,
        #[command(flatten)]
        page: PageArgs,
    },

    /// List process instances a user is involved in
    Processes {
        user: String,
        /// running, completed or all (anything else means all)
        #[arg(long)]
        state: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one process instance
    Process { process_id: String },

    /// Start a process instance and print its id
    Start {
        process_definition_id: String,
        #[arg(long)]
        business_key: Option<String>,
    },

    /// Show the form model of a task
    Form {
        task_id:             String,
        form_definition_key: String,
    },

    /// List attachments of a task
    Attachments { task_id: String },

    /// Attach a file to a task
    Upload {
        task_id:    String,
        field_name: String,
        path:       PathBuf,
        #[arg(long, default_value = DEFAULT_MIME_TYPE)]
        mime:       String,
    },
}

#[derive(Debug, Clone, Copy, clap::Args)]
struct PageArgs {
    #[arg(long, default_value_t = 0)]
    start: i64,
    #[arg(long, default_value_t = flowlink_domain::query::DEFAULT_PAGE_SIZE)]
    size:  i64,
}

fn task_state(state: Option<&str>) -> TaskState {
    state.map_or(TaskState::All, TaskState::parse)
}

fn process_state(state: Option<&str>) -> ProcessState {
    state.map_or(ProcessState::All, ProcessState::parse)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// キャッシュ秒数から有効期限を作る（0 以下・未指定はキャッシュしない）
fn directory_cache_ttl(secs: Option<i64>) -> anyhow::Result<Option<TimeDelta>> {
    secs.filter(|secs| *secs > 0)
        .map(|secs| {
            TimeDelta::try_seconds(secs)
                .with_context(|| format!("ディレクトリキャッシュの秒数が大きすぎます: {secs}"))
        })
        .transpose()
}

fn file_name(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .with_context(|| format!("ファイル名を取得できません: {}", path.display()))
}

async fn run<S: WorkflowService>(service: &S, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Users => print_json(&service.get_users().await?),
        Command::Tasks { user, state, page } => {
            let query = TaskListQuery::for_assignee(user).page(page.start, page.size);
            print_json(&service.get_user_tasks(task_state(state.as_deref()), query).await?)
        }
        Command::ProcessTasks { process_id, page } => {
            let query = TaskListQuery::for_process(process_id).page(page.start, page.size);
            print_json(&service.get_process_tasks(query).await?)
        }
        Command::Processes { user, state, page } => {
            let query = ProcessListQuery::for_user(user).page(page.start, page.size);
            print_json(
                &service
                    .get_user_processes(process_state(state.as_deref()), query)
                    .await?,
            )
        }
        Command::Process { process_id } => print_json(&service.get_process(&process_id).await?),
        Command::Start {
            process_definition_id,
            business_key,
        } => {
            let mut form = StartProcessForm::new(process_definition_id);
            if let Some(key) = business_key {
                form = form.with_business_key(key);
            }
            let id = service.start_process(form).await?;
            print_json(&serde_json::json!({ "id": id }))
        }
        Command::Form {
            task_id,
            form_definition_key,
        } => print_json(&service.get_task_form(&task_id, &form_definition_key).await?),
        Command::Attachments { task_id } => {
            print_json(&service.get_task_attachments(&task_id).await?)
        }
        Command::Upload {
            task_id,
            field_name,
            path,
            mime,
        } => {
            let content = tokio::fs::read(&path)
                .await
                .with_context(|| format!("ファイルを読み込めません: {}", path.display()))?;
            let upload = AttachmentUpload {
                task_id,
                field_name,
                file_name: file_name(&path)?,
                mime_type: mime,
                content: Bytes::from(content),
            };
            print_json(&service.create_attachment(upload).await?)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut tracing_config = TracingConfig::from_env("flowlink");
    if cli.verbose {
        tracing_config = tracing_config.with_default_filter("warn,flowlink=debug");
    }
    let app_name = tracing_config.app_name.clone();
    init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", app = %app_name).entered();

    let config = FlowableConfig::from_env().context("Flowable の接続設定を読み込めません")?;
    tracing::debug!(?config, "Flowable に接続します");

    let cache_ttl = directory_cache_ttl(cli.directory_cache_secs)?;

    let client = FlowableClientImpl::new(config)?;
    let mut service = WorkflowServiceImpl::new(client);
    if let Some(ttl) = cache_ttl {
        service = service.with_directory_cache(ttl);
    }

    run(&service, cli.command).await
}
