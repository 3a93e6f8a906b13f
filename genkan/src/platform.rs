use genkan_ipc::AppStatus;

/// Trait for toolkit/window-system side effects requested by the
/// lifecycle dispatcher. This abstraction allows mocking in tests.
pub trait ToolkitShell {
    /// Bring the application's window to the front.
    fn raise_window(&self);
    /// Send the application's window behind other windows.
    fn lower_window(&self);
    /// Drop toolkit-side caches (images, fonts, render buffers).
    fn flush_caches(&self);
    /// Return freed allocator memory to the operating system.
    fn trim_memory(&self);
    /// Ask the enclosing toolkit loop to unwind.
    fn request_exit(&self);
}

/// Trait for reporting lifecycle status to the session manager.
pub trait SessionReporter {
    fn report(&self, status: AppStatus);
}

/// Process-level shell for applications without their own toolkit glue.
/// Window operations are logged only; the memory operations are real.
pub struct ProcessShell;

impl ToolkitShell for ProcessShell {
    fn raise_window(&self) {
        tracing::debug!("No toolkit attached, ignoring window raise");
    }

    fn lower_window(&self) {
        tracing::debug!("No toolkit attached, ignoring window lower");
    }

    fn flush_caches(&self) {
        tracing::info!("Flushing toolkit caches");
    }

    fn trim_memory(&self) {
        #[cfg(target_os = "linux")]
        unsafe {
            libc::malloc_trim(0);
        }
        tracing::debug!("Trimmed allocator caches");
    }

    fn request_exit(&self) {
        tracing::debug!("Exit requested");
    }
}

impl Default for ProcessShell {
    fn default() -> Self {
        Self
    }
}

/// Reporter that logs status transitions instead of talking to a real
/// session manager.
pub struct LogReporter;

impl SessionReporter for LogReporter {
    fn report(&self, status: AppStatus) {
        tracing::info!("Session status: {:?}", status);
    }
}

impl Default for LogReporter {
    fn default() -> Self {
        Self
    }
}
