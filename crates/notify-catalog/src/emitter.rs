//! Dispatch of notifications to the OS notification center.

use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::{Map, Value};

use crate::catalog::{NotificationTemplate, get_templates_by_name};
use crate::placeholder::PopulateContext;
use crate::populate::populate;
use crate::SinkError;

/// OS-side notification capability.
pub trait NotificationSink: Send + Sync {
    /// Whether the host can display notifications at all.
    fn is_supported(&self) -> bool;

    /// Display a transient notification.
    fn display(&self, title: &str, body: &str) -> Result<(), SinkError>;
}

/// Shows raw, random, or populated notifications through a sink.
pub struct Emitter<S> {
    sink: S,
}

impl<S: NotificationSink> Emitter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Show a notification. Returns `false` when the host has no
    /// notification support or the sink fails.
    pub fn show(&self, title: &str, body: &str) -> bool {
        if !self.sink.is_supported() {
            tracing::debug!("Notifications unsupported, dropping \"{title}\"");
            return false;
        }

        match self.sink.display(title, body) {
            Ok(()) => {
                tracing::debug!(event = "shown", title, "notification");
                true
            }
            Err(e) => {
                tracing::error!("Failed to show notification \"{title}\": {e}");
                false
            }
        }
    }

    /// Show a random template from `category` as-is.
    pub fn show_random(&self, category: &str) -> bool {
        self.show_random_with(category, &mut rand::thread_rng())
    }

    pub fn show_random_with<R: Rng + ?Sized>(&self, category: &str, rng: &mut R) -> bool {
        let Some(template) = pick(category, rng) else {
            return false;
        };
        self.show(template.title, template.body)
    }

    /// Show a random template from `category` with its placeholders filled.
    pub fn show_populated(
        &self,
        category: &str,
        overrides: &Map<String, Value>,
        ctx: &PopulateContext,
    ) -> bool {
        self.show_populated_with(category, overrides, ctx, &mut rand::thread_rng())
    }

    pub fn show_populated_with<R: Rng + ?Sized>(
        &self,
        category: &str,
        overrides: &Map<String, Value>,
        ctx: &PopulateContext,
        rng: &mut R,
    ) -> bool {
        let Some(template) = pick(category, rng) else {
            return false;
        };
        let notification = populate(template, overrides, ctx, rng);
        self.show(&notification.title, &notification.body)
    }
}

fn pick<R: Rng + ?Sized>(category: &str, rng: &mut R) -> Option<&'static NotificationTemplate> {
    match get_templates_by_name(category) {
        Ok(templates) => templates.choose(rng),
        Err(e) => {
            tracing::debug!("{e}");
            None
        }
    }
}
