//! # ユーザーディレクトリのキャッシュ
//!
//! 補完のたびにディレクトリを取り直す代わりに、直近の取得結果を
//! 有効期限つきで保持する。有効期限の判定には [`Clock`] を使う。
//!
//! 取得に失敗した結果はキャッシュしない。ロックは値の読み書きの間だけ保持する。

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, Utc};
use flowlink_domain::clock::{Clock, SystemClock};

use crate::enrichment::UserDirectory;

struct CachedDirectory {
    fetched_at: DateTime<Utc>,
    directory:  Arc<UserDirectory>,
}

/// 有効期限つきのユーザーディレクトリキャッシュ
pub struct DirectoryCache {
    ttl:   TimeDelta,
    clock: Arc<dyn Clock>,
    entry: Mutex<Option<CachedDirectory>>,
}

impl DirectoryCache {
    /// システム時刻を使うキャッシュを作成する
    pub fn new(ttl: TimeDelta) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entry: Mutex::new(None),
        }
    }

    /// 有効期限内のディレクトリを返す
    pub fn get(&self) -> Option<Arc<UserDirectory>> {
        let now = self.clock.now();
        let entry = self.entry.lock().unwrap_or_else(|e| e.into_inner());
        entry
            .as_ref()
            .filter(|cached| now - cached.fetched_at < self.ttl)
            .map(|cached| Arc::clone(&cached.directory))
    }

    /// 取得したディレクトリを現在時刻で保存する
    pub fn store(&self, directory: Arc<UserDirectory>) {
        let fetched_at = self.clock.now();
        let mut entry = self.entry.lock().unwrap_or_else(|e| e.into_inner());
        *entry = Some(CachedDirectory {
            fetched_at,
            directory,
        });
    }

    /// 保持しているディレクトリを破棄する
    pub fn invalidate(&self) {
        *self.entry.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}
