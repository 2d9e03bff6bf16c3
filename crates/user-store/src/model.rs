//! User state document shape.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::StoreError;

const DEFAULT_FIRST_NAME: &str = "Developer";

/// The whole persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    pub profile: Profile,
    pub activity: Activity,
    pub app: AppInfo,
    /// Top-level keys this version does not know about, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub first_name: String,
    pub member_since: DateTime<Utc>,
    pub preferences: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub commits_today: u64,
    pub hours_today: f64,
    pub tasks_completed: u64,
    pub current_streak: u64,
    pub last_active_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    pub version: String,
    pub install_date: DateTime<Utc>,
    pub last_update_check: DateTime<Utc>,
}

impl UserState {
    /// Fresh state for a first run.
    pub fn defaults(version: &str, now: DateTime<Utc>) -> Self {
        Self {
            profile: Profile {
                first_name: DEFAULT_FIRST_NAME.to_string(),
                member_since: now,
                preferences: Map::new(),
                extra: Map::new(),
            },
            activity: Activity {
                commits_today: 0,
                hours_today: 0.0,
                tasks_completed: 0,
                current_streak: 1,
                last_active_date: now.date_naive(),
            },
            app: AppInfo {
                version: version.to_string(),
                install_date: now,
                last_update_check: now,
            },
            extra: Map::new(),
        }
    }
}

/// Which activity counter an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Commits,
    Hours,
    Tasks,
    Streak,
}

impl FromStr for ActivityKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commits" => Ok(Self::Commits),
            "hours" => Ok(Self::Hours),
            "tasks" => Ok(Self::Tasks),
            "streak" => Ok(Self::Streak),
            other => Err(StoreError::UnknownActivityKind(other.to_string())),
        }
    }
}

impl Activity {
    /// Apply one update. Counters are additive except the streak, which is
    /// replaced. Results never go below zero.
    pub fn apply(&mut self, kind: ActivityKind, value: f64) {
        match kind {
            ActivityKind::Commits => self.commits_today = add_count(self.commits_today, value),
            ActivityKind::Tasks => self.tasks_completed = add_count(self.tasks_completed, value),
            ActivityKind::Hours => self.hours_today = (self.hours_today + value).max(0.0),
            ActivityKind::Streak => self.current_streak = value.max(0.0).round() as u64,
        }
    }

    /// Start a new day if `today` is past the last active date.
    ///
    /// Daily counters reset; the streak continues only when the previous
    /// active day was yesterday. Returns whether anything changed.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.last_active_date >= today {
            return false;
        }

        let continued = today.pred_opt() == Some(self.last_active_date);
        self.current_streak = if continued {
            self.current_streak.saturating_add(1)
        } else {
            1
        };
        self.commits_today = 0;
        self.hours_today = 0.0;
        self.last_active_date = today;
        true
    }
}

fn add_count(current: u64, value: f64) -> u64 {
    (current as f64 + value).max(0.0).round() as u64
}
