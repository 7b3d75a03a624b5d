//! # ログ出力の初期化
//!
//! CLI は標準出力に結果の JSON を書き出すため、ログはすべて標準エラー出力に流す。
//! 出力形式は環境変数 `LOG_FORMAT`（`json` / `pretty`）で切り替える。

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_LOG_FILTER: &str = "warn,flowlink=info";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 行 1 イベントの JSON
    Json,
    /// 端末向けの整形出力
    #[default]
    Pretty,
}

impl LogFormat {
    /// 大文字小文字を区別せずにパースする
    ///
    /// 解釈できない値は `None`。
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }

    /// 環境変数 `LOG_FORMAT` から読み取る
    ///
    /// 未設定・不正な値のときは [`LogFormat::Pretty`]。
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|value| Self::parse(&value))
            .unwrap_or_default()
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// ルートスパンに載せるアプリケーション名
    pub app_name:       String,
    pub log_format:     LogFormat,
    /// `RUST_LOG` 未設定時に使う `EnvFilter` の指定
    pub default_filter: String,
}

impl TracingConfig {
    pub fn new(app_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            app_name: app_name.into(),
            log_format,
            default_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    /// 出力形式を `LOG_FORMAT` から決める
    pub fn from_env(app_name: impl Into<String>) -> Self {
        Self::new(app_name, LogFormat::from_env())
    }

    /// `--verbose` などでフィルタを差し替える
    pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }
}

/// グローバルサブスクライバを登録する
///
/// `RUST_LOG` があればそれを優先する。プロセス内で 1 回だけ呼ぶこと。
#[cfg(feature = "observability")]
pub fn init_tracing(config: TracingConfig) {
    use tracing_subscriber::{EnvFilter, Layer as _, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let output = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry().with(filter).with(output).init();
}
