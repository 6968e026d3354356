//! 延滞チェックの日次スケジューラ
//!
//! 設定された時刻（サーバーのローカル時刻）まで tokio タスクで待機し、
//! 延滞チェックを実行する。通知の結果はバッチの完了を待ってログに出す。

use crate::application::loan::{ServiceDependencies, check_overdue_loans};
use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use std::str::FromStr;
use thiserror::Error;
use tokio::task::JoinHandle;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("invalid time of day {0:?}, expected HH:MM")]
    InvalidTime(String),
}

/// 毎日決まった時刻に実行するスケジュール
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    at: NaiveTime,
}

impl DailySchedule {
    pub fn new(at: NaiveTime) -> Self {
        Self { at }
    }

    pub fn at(&self) -> NaiveTime {
        self.at
    }

    /// `now` より後で最初の実行日時
    ///
    /// ちょうど実行時刻の場合は翌日になる。
    pub fn next_run(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.at);
        if today > now {
            today
        } else {
            today + Duration::days(1)
        }
    }
}

impl FromStr for DailySchedule {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self::new)
            .map_err(|_| ScheduleError::InvalidTime(s.to_string()))
    }
}

/// 延滞チェックを毎日実行するタスクを起動する
pub fn spawn_overdue_check(deps: ServiceDependencies, schedule: DailySchedule) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = Local::now().naive_local();
            let next = schedule.next_run(now);
            let wait = (next - now).to_std().unwrap_or_default();
            tracing::info!(next_run = %next, "overdue check scheduled");
            tokio::time::sleep(wait).await;

            run_overdue_check(&deps).await;
        }
    })
}

async fn run_overdue_check(deps: &ServiceDependencies) {
    let today = Local::now().date_naive();

    let batch = match check_overdue_loans(deps, today).await {
        Ok(batch) => batch,
        Err(err) => {
            tracing::error!(error = %err, "overdue check failed");
            return;
        }
    };

    if batch.is_empty() {
        return;
    }

    // 通知の完了待ちは別タスクで行う
    tokio::spawn(async move {
        let report = batch.wait().await;
        tracing::info!(
            delivered = report.delivered,
            skipped = report.skipped,
            failed = report.failed,
            "overdue notices finished"
        );
    });
}
