//! Fixed notification templates grouped by category.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// Closed set of notification categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Update,
    Welcome,
    Onboarding,
    EveningReminder,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Update,
        Category::Welcome,
        Category::Onboarding,
        Category::EveningReminder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Welcome => "welcome",
            Self::Onboarding => "onboarding",
            Self::EveningReminder => "evening_reminder",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownCategory(s.to_string()))
    }
}

/// A notification template with `{placeholder}` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NotificationTemplate {
    pub category: Category,
    pub title: &'static str,
    pub body: &'static str,
}

const fn template(
    category: Category,
    title: &'static str,
    body: &'static str,
) -> NotificationTemplate {
    NotificationTemplate {
        category,
        title,
        body,
    }
}

const UPDATE: &[NotificationTemplate] = &[
    template(
        Category::Update,
        "PiPilot {version} is here",
        "{featureCount} new features and {bugCount} bug fixes are ready for you.",
    ),
    template(
        Category::Update,
        "Fresh build available",
        "Version {version} ships {featureCount} improvements across {serviceCount} services.",
    ),
    template(
        Category::Update,
        "We squashed {bugCount} bugs",
        "Update to {version} for a smoother, faster PiPilot.",
    ),
    template(
        Category::Update,
        "New integrations landed",
        "{serviceCount} new services now connect to PiPilot {version}.",
    ),
];

const WELCOME: &[NotificationTemplate] = &[
    template(
        Category::Welcome,
        "Welcome back, {firstName}!",
        "You're on a {currentStreak}-day streak. Let's keep it going.",
    ),
    template(
        Category::Welcome,
        "Good to see you, {firstName}",
        "Join {memberCount} developers building with PiPilot today.",
    ),
    template(
        Category::Welcome,
        "Ready to ship, {firstName}?",
        "You have {creditAmount} credits waiting to be used.",
    ),
    template(
        Category::Welcome,
        "Hey {firstName}, welcome to PiPilot",
        "Your AI pair programmer is warmed up and ready.",
    ),
];

const ONBOARDING: &[NotificationTemplate] = &[
    template(
        Category::Onboarding,
        "Start your first project",
        "Describe an idea and PiPilot will scaffold it in minutes.",
    ),
    template(
        Category::Onboarding,
        "Set your daily goals",
        "Pick {goalCount} goals for today and let PiPilot track your progress.",
    ),
    template(
        Category::Onboarding,
        "Connect your services",
        "Link up to {serviceCount} services to deploy straight from PiPilot.",
    ),
    template(
        Category::Onboarding,
        "You've got {creditAmount} free credits",
        "Spend them on builds, previews, and deployments.",
    ),
];

const EVENING_REMINDER: &[NotificationTemplate] = &[
    template(
        Category::EveningReminder,
        "Nice work today, {firstName}",
        "{commitsToday} commits and {hoursToday} hours of focus. Time to recharge.",
    ),
    template(
        Category::EveningReminder,
        "Daily wrap-up",
        "You completed {tasksCompleted} tasks today. Your streak is {currentStreak} days.",
    ),
    template(
        Category::EveningReminder,
        "Don't break the streak",
        "One more commit keeps your {currentStreak}-day streak alive, {firstName}.",
    ),
    template(
        Category::EveningReminder,
        "Plan tomorrow tonight",
        "Set {goalCount} goals now and start tomorrow with momentum.",
    ),
];

/// All categories in the catalog.
pub fn list_categories() -> BTreeSet<Category> {
    Category::ALL.into_iter().collect()
}

/// Templates for a category, in catalog order.
pub fn get_templates(category: Category) -> &'static [NotificationTemplate] {
    match category {
        Category::Update => UPDATE,
        Category::Welcome => WELCOME,
        Category::Onboarding => ONBOARDING,
        Category::EveningReminder => EVENING_REMINDER,
    }
}

/// Look up templates by category name.
pub fn get_templates_by_name(name: &str) -> Result<&'static [NotificationTemplate], CatalogError> {
    name.parse::<Category>().map(get_templates)
}
