//! Placeholder substitution for notification templates.
//!
//! Substitution is a single left-to-right pass: a value inserted for one
//! token is never scanned again, so override values containing `{token}`
//! text come through literally instead of being expanded a second time.

use std::collections::HashMap;

use rand::Rng;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::catalog::NotificationTemplate;
use crate::placeholder::{Placeholder, PopulateContext, render_number};

/// A template with its placeholders resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulatedNotification {
    pub title: String,
    pub body: String,
}

/// Fill a template from live state, letting `overrides` win over defaults.
///
/// Unknown placeholders stay literal and unused override keys are ignored.
/// A placeholder that appears more than once gets the same value everywhere
/// within a single call.
pub fn populate<R: Rng + ?Sized>(
    template: &NotificationTemplate,
    overrides: &Map<String, Value>,
    ctx: &PopulateContext,
    rng: &mut R,
) -> PopulatedNotification {
    let mut produced: HashMap<Placeholder, String> = HashMap::new();
    let mut lookup = |name: &str| -> Option<String> {
        if let Some(value) = overrides.get(name) {
            return Some(render_value(value));
        }
        let placeholder = Placeholder::from_name(name)?;
        Some(
            produced
                .entry(placeholder)
                .or_insert_with(|| placeholder.produce(ctx, &mut *rng))
                .clone(),
        )
    };

    let title = substitute(template.title, &mut lookup);
    let body = substitute(template.body, &mut lookup);
    PopulatedNotification { title, body }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map(render_number).unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

fn substitute(text: &str, lookup: &mut impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(|c: char| c == '{' || c == '}') {
            Some(close) if after[close..].starts_with('}') => {
                let name = &after[..close];
                match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            // Unterminated or nested brace: keep it literal and rescan.
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
