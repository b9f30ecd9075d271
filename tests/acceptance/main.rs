use cucumber::World;
use std::path::PathBuf;
use wiremock::MockServer;

/// One issue as served by the mock listing, in listing order.
#[derive(Debug, Clone)]
pub struct ServedIssue {
    pub closed: bool,
    pub json: serde_json::Value,
}

#[derive(Default, World)]
pub struct ExportWorld {
    pub captured_output: Vec<u8>,
    pub export_result: Option<Result<(), anyhow::Error>>,
    pub issues: Vec<ServedIssue>,
    pub per_page: Option<usize>,
    pub page_count_status: Option<u16>,
    pub failing_page: Option<(String, u32, u16)>,
    pub omitted_config_key: Option<String>,
    pub config_settings: Vec<(String, serde_json::Value)>,
    pub env_password: Option<String>,
    pub response_delay: Option<std::time::Duration>,
    pub server: Option<MockServer>,
    pub workdir: Option<tempfile::TempDir>,
    pub previous_csv: Option<Vec<u8>>,
}

impl std::fmt::Debug for ExportWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportWorld")
            .field("captured_output", &String::from_utf8_lossy(&self.captured_output))
            .field("export_result", &self.export_result)
            .field("issues", &self.issues)
            .field("per_page", &self.per_page)
            .field("page_count_status", &self.page_count_status)
            .field("failing_page", &self.failing_page)
            .field("omitted_config_key", &self.omitted_config_key)
            .field("config_settings", &self.config_settings)
            .field("env_password", &self.env_password.as_ref().map(|_| "***"))
            .field("response_delay", &self.response_delay)
            .field("server", &self.server.as_ref().map(|s| s.uri()))
            .field("workdir", &self.workdir.as_ref().map(|d| d.path().to_path_buf()))
            .finish()
    }
}

impl ExportWorld {
    /// Password the mock API accepts: the environment value wins over the file.
    pub fn effective_password(&self) -> &str {
        self.env_password.as_deref().unwrap_or(crate::steps::CONFIG_PASSWORD)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.workdir
            .as_ref()
            .expect("export has not been run")
            .path()
            .join("issues.csv")
    }
}

#[tokio::main]
async fn main() {
    ExportWorld::cucumber()
        .max_concurrent_scenarios(1)
        .run_and_exit("features")
        .await;
}
