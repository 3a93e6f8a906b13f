use anyhow::Result;

use genkan_ipc::Bundle;

/// Application-supplied lifecycle callbacks.
///
/// Every method defaults to a successful no-op, so applications override
/// only what they care about. Failures are logged by the dispatcher; only
/// a failing `create` aborts anything (the startup sequence).
pub trait AppOps {
    /// Called once before the main loop; build widgets and state here.
    fn create(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called on every launch request, with the launch payload.
    fn reset(&mut self, _payload: &Bundle) -> Result<()> {
        Ok(())
    }

    /// Called when the application loses all visible windows.
    fn pause(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called when a window becomes visible again.
    fn resume(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called exactly once while shutting down, even when `create` failed.
    fn terminate(&mut self) -> Result<()> {
        Ok(())
    }
}
