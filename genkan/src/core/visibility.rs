use std::collections::HashMap;

use thiserror::Error;

pub type WindowId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("window {0} is already tracked")]
    AlreadyExists(WindowId),
    #[error("window {0} is not tracked")]
    NotFound(WindowId),
}

/// One tracked toplevel window and whether the window system reports it
/// fully obscured.
#[derive(Debug, Clone, Copy)]
pub struct WindowRecord {
    pub handle: WindowId,
    pub obscured: bool,
}

/// Tracks per-window obscured state and answers "is anything visible".
///
/// Pure bookkeeping: mutations never invoke callbacks. The window-event
/// bridge derives RESUME/PAUSE from aggregate flips around these calls.
#[derive(Debug, Default)]
pub struct VisibilityTracker {
    windows: HashMap<WindowId, WindowRecord>,
}

impl VisibilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a window. New windows are assumed unobscured until
    /// the first visibility report says otherwise.
    pub fn add_window(&mut self, handle: WindowId) -> Result<(), WindowError> {
        if self.windows.contains_key(&handle) {
            return Err(WindowError::AlreadyExists(handle));
        }
        self.windows.insert(
            handle,
            WindowRecord {
                handle,
                obscured: false,
            },
        );
        Ok(())
    }

    pub fn remove_window(&mut self, handle: WindowId) -> Result<(), WindowError> {
        if self.windows.remove(&handle).is_none() {
            return Err(WindowError::NotFound(handle));
        }
        Ok(())
    }

    /// Replace the record for a tracked window with the given obscured
    /// state. The whole record is replaced, not merged.
    pub fn update_window(&mut self, handle: WindowId, obscured: bool) -> Result<(), WindowError> {
        if !self.windows.contains_key(&handle) {
            return Err(WindowError::NotFound(handle));
        }
        self.windows.insert(handle, WindowRecord { handle, obscured });
        Ok(())
    }

    pub fn contains(&self, handle: WindowId) -> bool {
        self.windows.contains_key(&handle)
    }

    /// True iff at least one tracked window is not obscured.
    pub fn is_any_visible(&self) -> bool {
        self.windows.values().any(|w| !w.obscured)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
