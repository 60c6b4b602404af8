//! # Print Surfaces
//!
//! A print surface is a temporary place the fallback page is loaded into so
//! the host's print dialog can pick it up. It is acquired, loaded, asked to
//! print, and removed again:
//!
//! ```text
//! acquire ──► load(html + print trigger) ──► trigger ──► (delay) ──► remove
//!    │              │ error                     │ error                 ▲
//!    │              └───────────────────────────┴───────────────────────┘
//!    └── error: nothing to remove
//! ```
//!
//! Every [`SurfaceHandle`] is also a guard: dropping one without calling
//! [`SurfaceHandle::remove`] still tears the surface down.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tracing::{debug, error, info, instrument, warn};

use super::html;
use super::Document;
use crate::error::RenderSurfaceError;

/// Something that can host a page for printing.
#[async_trait]
pub trait PrintSurface: Send + Sync {
    /// Create a fresh, empty surface.
    async fn acquire(&self) -> Result<Box<dyn SurfaceHandle>, RenderSurfaceError>;
}

/// One acquired surface.
#[async_trait]
pub trait SurfaceHandle: Send {
    /// Put the page on the surface.
    async fn load(&mut self, html: &str) -> Result<(), RenderSurfaceError>;

    /// Open the host print dialog for the loaded page.
    async fn trigger_print(&mut self) -> Result<(), RenderSurfaceError>;

    /// Tear the surface down.
    async fn remove(self: Box<Self>) -> Result<(), RenderSurfaceError>;
}

/// Print a document through `surface`.
///
/// Returns once the print dialog was triggered and the surface was given
/// `teardown` to hand the page over. The surface is removed on every path
/// after it was acquired. A surface that cannot be removed after a
/// successful print is reported as [`RenderSurfaceError::Remove`].
#[instrument(skip_all, fields(layout = %document.layout))]
pub async fn print_document(
    surface: &dyn PrintSurface,
    document: &Document,
    teardown: Duration,
) -> Result<(), RenderSurfaceError> {
    let page = html::with_print_trigger(&document.to_html());

    let mut handle = surface
        .acquire()
        .await
        .inspect_err(|e| error!(error = %e, "Could not create print surface"))?;

    let printed = async {
        handle.load(&page).await?;
        handle.trigger_print().await
    }
    .await;

    match printed {
        Ok(()) => {
            info!("Print dialog opened");
            if !teardown.is_zero() {
                tokio::time::sleep(teardown).await;
            }
            handle
                .remove()
                .await
                .inspect_err(|e| error!(error = %e, "Print surface was not removed cleanly"))
        }
        Err(e) => {
            error!(error = %e, "Fallback print failed");
            if let Err(remove) = handle.remove().await {
                warn!(error = %remove, "Print surface was not removed cleanly");
            }
            Err(e)
        }
    }
}

// ============================================================================
// SYSTEM SURFACE
// ============================================================================

/// File name of the page inside the surface directory.
pub const PAGE_FILE: &str = "receipt.html";

/// Prints through the desktop's default HTML viewer.
///
/// The page is written into a fresh temporary directory and handed to the
/// platform opener (`xdg-open`, `open`, or `start` on Windows). The page
/// opens the print dialog itself once loaded.
#[derive(Debug, Clone, Default)]
pub struct SystemPrintSurface {
    opener: Option<String>,
}

impl SystemPrintSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open pages with `program <page>` instead of the platform opener.
    pub fn with_opener(program: impl Into<String>) -> Self {
        Self {
            opener: Some(program.into()),
        }
    }

    fn command(&self, page: &Path) -> tokio::process::Command {
        if let Some(program) = &self.opener {
            let mut cmd = tokio::process::Command::new(program);
            cmd.arg(page);
            return cmd;
        }
        platform_opener(page)
    }
}

#[cfg(target_os = "macos")]
fn platform_opener(page: &Path) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("open");
    cmd.arg(page);
    cmd
}

#[cfg(windows)]
fn platform_opener(page: &Path) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(page);
    cmd
}

#[cfg(not(any(target_os = "macos", windows)))]
fn platform_opener(page: &Path) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("xdg-open");
    cmd.arg(page);
    cmd
}

#[async_trait]
impl PrintSurface for SystemPrintSurface {
    async fn acquire(&self) -> Result<Box<dyn SurfaceHandle>, RenderSurfaceError> {
        let dir = tempfile::Builder::new()
            .prefix("boleta-")
            .tempdir()
            .map_err(|e| RenderSurfaceError::Create(e.to_string()))?;
        let page = dir.path().join(PAGE_FILE);
        debug!(page = %page.display(), "Created print surface");

        Ok(Box::new(SystemSurface {
            surface: self.clone(),
            dir: Some(dir),
            page,
        }))
    }
}

struct SystemSurface {
    surface: SystemPrintSurface,
    /// Deleted with its contents when dropped
    dir: Option<TempDir>,
    page: PathBuf,
}

#[async_trait]
impl SurfaceHandle for SystemSurface {
    async fn load(&mut self, html: &str) -> Result<(), RenderSurfaceError> {
        tokio::fs::write(&self.page, html)
            .await
            .map_err(|e| RenderSurfaceError::Load(format!("{}: {}", self.page.display(), e)))
    }

    async fn trigger_print(&mut self) -> Result<(), RenderSurfaceError> {
        let status = self
            .surface
            .command(&self.page)
            .status()
            .await
            .map_err(|e| RenderSurfaceError::Trigger(e.to_string()))?;

        if !status.success() {
            return Err(RenderSurfaceError::Trigger(format!(
                "opener exited with {}",
                status
            )));
        }
        Ok(())
    }

    async fn remove(self: Box<Self>) -> Result<(), RenderSurfaceError> {
        let mut surface = self;
        match surface.dir.take() {
            Some(dir) => dir
                .close()
                .map_err(|e| RenderSurfaceError::Remove(e.to_string())),
            None => Ok(()),
        }
    }
}

// ============================================================================
// RECORDING SURFACE
// ============================================================================

#[derive(Debug, Default)]
struct Recorded {
    fail_acquire: bool,
    fail_load: bool,
    fail_trigger: bool,
    fail_remove: bool,
    acquired: usize,
    removed: usize,
    loaded: Vec<String>,
    triggered: usize,
}

/// In-memory surface that records what would have been printed.
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    state: Arc<Mutex<Recorded>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail at acquisition.
    pub fn failing_acquire(self) -> Self {
        self.lock().fail_acquire = true;
        self
    }

    /// Fail when the page is loaded.
    pub fn failing_load(self) -> Self {
        self.lock().fail_load = true;
        self
    }

    /// Fail when the dialog is triggered.
    pub fn failing_trigger(self) -> Self {
        self.lock().fail_trigger = true;
        self
    }

    /// Fail when the surface is torn down.
    pub fn failing_remove(self) -> Self {
        self.lock().fail_remove = true;
        self
    }

    /// Pages loaded so far, in order.
    pub fn pages(&self) -> Vec<String> {
        self.lock().loaded.clone()
    }

    pub fn acquired(&self) -> usize {
        self.lock().acquired
    }

    pub fn triggered(&self) -> usize {
        self.lock().triggered
    }

    pub fn removed(&self) -> usize {
        self.lock().removed
    }

    /// Surfaces acquired but not yet removed.
    pub fn live(&self) -> usize {
        let state = self.lock();
        state.acquired - state.removed
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PrintSurface for RecordingSurface {
    async fn acquire(&self) -> Result<Box<dyn SurfaceHandle>, RenderSurfaceError> {
        let mut state = self.lock();
        if state.fail_acquire {
            return Err(RenderSurfaceError::Create("no display available".into()));
        }
        state.acquired += 1;
        Ok(Box::new(RecordedSurface {
            record: self.clone(),
        }))
    }
}

struct RecordedSurface {
    record: RecordingSurface,
}

#[async_trait]
impl SurfaceHandle for RecordedSurface {
    async fn load(&mut self, html: &str) -> Result<(), RenderSurfaceError> {
        let mut state = self.record.lock();
        if state.fail_load {
            return Err(RenderSurfaceError::Load("surface rejected the page".into()));
        }
        state.loaded.push(html.to_string());
        Ok(())
    }

    async fn trigger_print(&mut self) -> Result<(), RenderSurfaceError> {
        let mut state = self.record.lock();
        if state.fail_trigger {
            return Err(RenderSurfaceError::Trigger("print dialog blocked".into()));
        }
        state.triggered += 1;
        Ok(())
    }

    async fn remove(self: Box<Self>) -> Result<(), RenderSurfaceError> {
        // Counted on drop
        if self.record.lock().fail_remove {
            return Err(RenderSurfaceError::Remove("surface is stuck".into()));
        }
        Ok(())
    }
}

impl Drop for RecordedSurface {
    fn drop(&mut self) {
        self.record.lock().removed += 1;
    }
}
