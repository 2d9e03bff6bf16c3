//! Window control capability and target resolution.

use crate::HostError;
use crate::lifecycle::Stage;

/// Native window operations, addressed by window label.
pub trait WindowHost: Send + Sync {
    /// Label of the window with input focus, if any.
    fn focused_window(&self) -> Option<String>;
    fn has_window(&self, label: &str) -> bool;

    fn minimize(&self, label: &str) -> Result<(), HostError>;
    fn toggle_maximize(&self, label: &str) -> Result<(), HostError>;
    fn close(&self, label: &str) -> Result<(), HostError>;
    fn is_maximized(&self, label: &str) -> Result<bool, HostError>;

    /// Create the window that belongs to `stage`.
    fn open_stage(&self, stage: Stage) -> Result<(), HostError>;
}

/// Pick the window a control command applies to.
///
/// The sender's own window wins; focus is only consulted when the sender is
/// unknown or already gone.
pub fn resolve_target<H: WindowHost + ?Sized>(host: &H, sender: Option<&str>) -> Option<String> {
    sender
        .filter(|label| host.has_window(label))
        .map(str::to_string)
        .or_else(|| host.focused_window())
}

/// Whether any stage window is still open.
pub fn any_stage_window<H: WindowHost + ?Sized>(host: &H) -> bool {
    Stage::ALL.into_iter().any(|s| host.has_window(s.label()))
}
