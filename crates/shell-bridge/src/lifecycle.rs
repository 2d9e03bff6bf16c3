//! Splash → walkthrough → main window sequencing.

use serde::Serialize;

/// One window stage. Each stage owns exactly one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Splash,
    Walkthrough,
    Main,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Splash, Stage::Walkthrough, Stage::Main];

    /// Window label used for this stage.
    pub fn label(self) -> &'static str {
        match self {
            Self::Splash => "splash",
            Self::Walkthrough => "walkthrough",
            Self::Main => "main",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::Splash => Some(Self::Walkthrough),
            Self::Walkthrough => Some(Self::Main),
            Self::Main => None,
        }
    }
}

/// "Stage complete" signal sent by a stage's page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageSignal {
    SplashComplete,
    WalkthroughComplete,
}

impl StageSignal {
    /// The stage this signal completes.
    pub fn completes(self) -> Stage {
        match self {
            Self::SplashComplete => Stage::Splash,
            Self::WalkthroughComplete => Stage::Walkthrough,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Stage,
    pub to: Stage,
}

/// Strictly linear stage machine with guarded transitions.
#[derive(Debug)]
pub struct Lifecycle {
    stage: Stage,
    /// Stage whose window is being swapped in.
    pending: Option<Stage>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            stage: Stage::Splash,
            pending: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Apply a stage signal.
    ///
    /// The signal is accepted only in the stage it completes and, when the
    /// sender is known, only from that stage's own window. Anything else is
    /// ignored and returns `None`.
    pub fn advance(&mut self, signal: StageSignal, sender: Option<&str>) -> Option<Transition> {
        let from = signal.completes();
        if self.stage != from {
            return None;
        }
        if sender.is_some_and(|label| label != from.label()) {
            return None;
        }
        let to = from.next()?;
        self.stage = to;
        self.pending = Some(to);
        Some(Transition { from, to })
    }

    /// Jump straight to `Main` when the app is reactivated with no windows.
    pub fn reopen(&mut self) -> Stage {
        self.stage = Stage::Main;
        Stage::Main
    }

    /// The window for the stage entered by the last transition exists now
    /// (or failed to open).
    pub fn finish_transition(&mut self) {
        self.pending = None;
    }

    /// True between closing an outgoing window and creating the next one.
    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }
}
