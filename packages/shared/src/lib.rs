//! # FlowLink 共有ユーティリティ
//!
//! FlowLink の各クレートから共通で使用されるユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - domain / infra / service / cli のすべてから依存される
//! - Flowable 固有の業務ロジックは含めない
//! - 外部クレートへの依存は最小限に抑える（tracing-subscriber は feature で分離）

pub mod observability;
pub mod paginated_response;

pub use paginated_response::Paginated;
