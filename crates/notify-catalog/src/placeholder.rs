//! Typed placeholders and the live values that fill them.

use std::ops::RangeInclusive;

use rand::Rng;

const DEFAULT_FIRST_NAME: &str = "Developer";

/// Live application state consulted when filling placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulateContext {
    pub version: String,
    pub first_name: Option<String>,
    pub commits_today: u64,
    pub hours_today: f64,
    pub tasks_completed: u64,
    pub current_streak: u64,
}

/// Every placeholder name the catalog knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Version,
    FirstName,
    FeatureCount,
    BugCount,
    ServiceCount,
    MemberCount,
    CreditAmount,
    GoalCount,
    CommitsToday,
    HoursToday,
    TasksCompleted,
    CurrentStreak,
}

impl Placeholder {
    pub const ALL: [Placeholder; 12] = [
        Placeholder::Version,
        Placeholder::FirstName,
        Placeholder::FeatureCount,
        Placeholder::BugCount,
        Placeholder::ServiceCount,
        Placeholder::MemberCount,
        Placeholder::CreditAmount,
        Placeholder::GoalCount,
        Placeholder::CommitsToday,
        Placeholder::HoursToday,
        Placeholder::TasksCompleted,
        Placeholder::CurrentStreak,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::FirstName => "firstName",
            Self::FeatureCount => "featureCount",
            Self::BugCount => "bugCount",
            Self::ServiceCount => "serviceCount",
            Self::MemberCount => "memberCount",
            Self::CreditAmount => "creditAmount",
            Self::GoalCount => "goalCount",
            Self::CommitsToday => "commitsToday",
            Self::HoursToday => "hoursToday",
            Self::TasksCompleted => "tasksCompleted",
            Self::CurrentStreak => "currentStreak",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Range a random value is drawn from when no real value is available.
    fn plausible_range(self) -> Option<RangeInclusive<u64>> {
        match self {
            Self::FeatureCount => Some(3..=12),
            Self::BugCount => Some(5..=25),
            Self::ServiceCount => Some(2..=8),
            Self::MemberCount => Some(1_000..=10_000),
            Self::CreditAmount => Some(10..=100),
            Self::GoalCount => Some(1..=5),
            Self::CommitsToday => Some(1..=15),
            Self::HoursToday => Some(1..=8),
            Self::TasksCompleted => Some(1..=10),
            Self::CurrentStreak => Some(1..=30),
            Self::Version | Self::FirstName => None,
        }
    }

    /// Produce the rendered default value for this placeholder.
    pub fn produce<R: Rng + ?Sized>(self, ctx: &PopulateContext, rng: &mut R) -> String {
        let mut random = || {
            self.plausible_range()
                .map(|range| rng.gen_range(range))
                .unwrap_or_default()
        };

        match self {
            Self::Version => ctx.version.clone(),
            Self::FirstName => ctx
                .first_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(DEFAULT_FIRST_NAME)
                .to_string(),
            Self::CommitsToday => non_zero_or(ctx.commits_today, random).to_string(),
            Self::TasksCompleted => non_zero_or(ctx.tasks_completed, random).to_string(),
            Self::CurrentStreak => non_zero_or(ctx.current_streak, random).to_string(),
            Self::HoursToday => {
                if ctx.hours_today > 0.0 {
                    render_number(ctx.hours_today)
                } else {
                    random().to_string()
                }
            }
            Self::FeatureCount
            | Self::BugCount
            | Self::ServiceCount
            | Self::MemberCount
            | Self::CreditAmount
            | Self::GoalCount => random().to_string(),
        }
    }
}

fn non_zero_or(value: u64, fallback: impl FnOnce() -> u64) -> u64 {
    if value > 0 { value } else { fallback() }
}

/// Whole numbers render without a fractional part.
pub(crate) fn render_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
