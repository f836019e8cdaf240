use conflux_core::{Dashboard, DashboardConfig, DashboardConfigExt, ViewState};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to a loaded dataset. Queries hold it without locking the context.
pub type DashboardHandle = Arc<Dashboard>;

/// Holds all shared state for the CLI application.
/// This is a lightweight container - logic lives in the core and in `ViewState`.
#[derive(Clone)]
pub struct CliContext {
    pub config: Arc<RwLock<DashboardConfig>>,
    /// The loaded dataset. None until a file is loaded; replaced wholesale on reload.
    dashboard: Arc<RwLock<Option<DashboardHandle>>>,
    pub view: Arc<RwLock<ViewState>>,
}

impl CliContext {
    pub fn new() -> Self {
        Self::with_config(DashboardConfig::load())
    }

    pub fn with_config(config: DashboardConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            dashboard: Arc::new(RwLock::new(None)),
            view: Arc::new(RwLock::new(ViewState::new())),
        }
    }

    /// Install a freshly loaded dataset and reset the selection.
    pub async fn set_dashboard(&self, dashboard: Dashboard) -> DashboardHandle {
        let handle = Arc::new(dashboard);
        *self.dashboard.write().await = Some(Arc::clone(&handle));
        *self.view.write().await = ViewState::new();
        handle
    }

    pub async fn dashboard(&self) -> Option<DashboardHandle> {
        self.dashboard.read().await.clone()
    }

    /// Like [`CliContext::dashboard`], but an error message when nothing is loaded.
    pub async fn require_dashboard(&self) -> Result<DashboardHandle, String> {
        self.dashboard()
            .await
            .ok_or_else(|| "No dataset loaded (use `load --path <file>`)\n".to_string())
    }
}
