//! `UserStore`: in-memory state plus a single writer task for persistence.
//!
//! Mutations update memory synchronously and queue a full snapshot to the
//! writer. Writes land on disk in the order they were queued.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value};
use tokio::sync::{mpsc, oneshot};

use crate::merge::{overlay_fields, overlay_sections};
use crate::model::{Activity, ActivityKind, Profile, UserState};
use crate::StoreError;

enum WriteOp {
    Save(Box<UserState>),
    Flush(oneshot::Sender<()>),
}

/// Handle to the persisted user state. Cheap to clone.
#[derive(Clone)]
pub struct UserStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    path: PathBuf,
    state: RwLock<UserState>,
    writer: mpsc::UnboundedSender<WriteOp>,
}

impl UserStore {
    /// Load state from `path`, falling back to defaults on any failure.
    ///
    /// A missing or unreadable file is replaced by the defaults before this
    /// returns. Must be called inside a tokio runtime.
    pub async fn load(path: impl Into<PathBuf>, version: &str) -> Self {
        let path = path.into();
        let now = Utc::now();
        let defaults = UserState::defaults(version, now);

        let (mut state, healed) = match read_state(&path, &defaults).await {
            Ok(state) => {
                tracing::info!("User data loaded from {}", path.display());
                (state, false)
            }
            Err(e) => {
                tracing::warn!("No usable user data at {} ({e}), using defaults", path.display());
                (defaults, true)
            }
        };

        let mut changed = healed;
        if state.app.version != version {
            state.app.version = version.to_string();
            changed = true;
        }
        changed |= state.activity.roll_over(now.date_naive());

        let store = Self::spawn(path, state);
        if changed {
            store.save();
            store.flush().await;
        }
        store
    }

    fn spawn(path: PathBuf, state: UserState) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(writer_loop(path.clone(), rx));
        Self {
            inner: Arc::new(StoreInner {
                path,
                state: RwLock::new(state),
                writer: tx,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Copy of the current in-memory state.
    pub fn snapshot(&self) -> UserState {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Queue a write of the current state. Failures are logged by the writer.
    pub fn save(&self) {
        let snapshot = self.snapshot();
        self.enqueue(snapshot);
    }

    /// Wait until every write queued so far has finished.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.inner.writer.send(WriteOp::Flush(tx)).is_err() {
            tracing::warn!("User data writer stopped; flush skipped");
            return;
        }
        let _ = rx.await;
    }

    /// Apply an activity update for today and queue a save.
    pub fn update_activity(&self, kind: ActivityKind, value: f64) -> Activity {
        self.update_activity_on(kind, value, Utc::now().date_naive())
    }

    pub fn update_activity_on(&self, kind: ActivityKind, value: f64, today: NaiveDate) -> Activity {
        let (activity, snapshot) = self.mutate(|state| {
            state.activity.roll_over(today);
            state.activity.apply(kind, value);
            state.activity.clone()
        });
        self.enqueue(snapshot);
        activity
    }

    /// Shallow-merge `partial` into the profile and queue a save.
    ///
    /// The merge is rejected, leaving state untouched, if the result no
    /// longer has the profile's required shape.
    pub fn update_profile(&self, partial: Map<String, Value>) -> Result<Profile, StoreError> {
        let (updated, snapshot) = self.try_mutate(|state| {
            let Value::Object(mut fields) = serde_json::to_value(&state.profile)? else {
                return Err(StoreError::Malformed("profile is not an object".into()));
            };
            overlay_fields(&mut fields, partial);
            let profile: Profile = serde_json::from_value(Value::Object(fields))
                .map_err(|e| StoreError::InvalidProfile(e.to_string()))?;
            state.profile = profile;
            Ok(state.profile.clone())
        })?;
        self.enqueue(snapshot);
        Ok(updated)
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut UserState) -> R) -> (R, UserState) {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let out = f(&mut *state);
        (out, state.clone())
    }

    /// Like `mutate`, but `f` may refuse the change. `f` must leave the
    /// state untouched when it returns an error.
    fn try_mutate<R>(
        &self,
        f: impl FnOnce(&mut UserState) -> Result<R, StoreError>,
    ) -> Result<(R, UserState), StoreError> {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let out = f(&mut *state)?;
        Ok((out, state.clone()))
    }

    fn enqueue(&self, snapshot: UserState) {
        if self
            .inner
            .writer
            .send(WriteOp::Save(Box::new(snapshot)))
            .is_err()
        {
            tracing::error!("User data writer stopped; change kept in memory only");
        }
    }
}

async fn writer_loop(path: PathBuf, mut rx: mpsc::UnboundedReceiver<WriteOp>) {
    while let Some(op) = rx.recv().await {
        match op {
            WriteOp::Save(state) => match write_state(&path, &state).await {
                Ok(()) => tracing::debug!("User data saved to {}", path.display()),
                Err(e) => tracing::error!("Error saving user data: {e}"),
            },
            WriteOp::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("User data writer stopped");
}

async fn read_state(path: &Path, defaults: &UserState) -> Result<UserState, StoreError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let persisted: Value = serde_json::from_str(&raw)?;
    let Value::Object(persisted) = persisted else {
        return Err(StoreError::Malformed("top level is not an object".into()));
    };

    let Value::Object(mut merged) = serde_json::to_value(defaults)? else {
        return Err(StoreError::Malformed("defaults are not an object".into()));
    };
    overlay_sections(&mut merged, persisted);
    Ok(serde_json::from_value(Value::Object(merged))?)
}

async fn write_state(path: &Path, state: &UserState) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(state)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
