use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{BrainrotError, BrainrotResult};

pub const GENERATING_TRANSCRIPT: (&str, u8) = ("Generating transcript", 0);
pub const GENERATING_AUDIO: (&str, u8) = ("Generating audio", 12);

#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn update(&self, job_id: &str, status: &str, progress: u8) -> BrainrotResult<()>;
}

/// Posts `{jobId, status, progress}` to a job-tracking endpoint.
pub struct HttpStatusStore {
    url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl HttpStatusStore {
    pub fn new(url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            url: url.into(),
            token,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl StatusStore for HttpStatusStore {
    async fn update(&self, job_id: &str, status: &str, progress: u8) -> BrainrotResult<()> {
        let mut request = self.http.post(&self.url).json(&serde_json::json!({
            "jobId": job_id,
            "status": status,
            "progress": progress,
        }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| BrainrotError::StatusReport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(BrainrotError::StatusReport(format!(
                "status endpoint returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Log the failure and keep going.
    #[default]
    BestEffort,
    /// Abort the session.
    FailFast,
}

/// Emits checkpoints for one job. Silent when there is no job to report on.
pub struct ProgressReporter {
    target: Option<(Arc<dyn StatusStore>, String)>,
    policy: StatusPolicy,
}

impl ProgressReporter {
    pub fn new(store: Arc<dyn StatusStore>, job_id: impl Into<String>, policy: StatusPolicy) -> Self {
        Self {
            target: Some((store, job_id.into())),
            policy,
        }
    }

    pub fn disabled() -> Self {
        Self {
            target: None,
            policy: StatusPolicy::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.target.is_some()
    }

    pub async fn checkpoint(&self, (status, progress): (&str, u8)) -> BrainrotResult<()> {
        let Some((store, job_id)) = &self.target else {
            return Ok(());
        };

        info!("Job {}: {} ({}%)", job_id, status, progress);
        match store.update(job_id, status, progress).await {
            Ok(()) => Ok(()),
            Err(e) if self.policy == StatusPolicy::BestEffort => {
                warn!("Could not report status for job {}: {}", job_id, e);
                Ok(())
            }
            Err(e) => Err(match e {
                BrainrotError::StatusReport(_) => e,
                other => BrainrotError::StatusReport(other.to_string()),
            }),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    pub(crate) struct RecordingStore {
        pub(crate) updates: Mutex<Vec<(String, String, u8)>>,
        pub(crate) broken: bool,
    }

    #[async_trait]
    impl StatusStore for RecordingStore {
        async fn update(&self, job_id: &str, status: &str, progress: u8) -> BrainrotResult<()> {
            if self.broken {
                return Err(BrainrotError::StatusReport("connection refused".into()));
            }
            self.updates
                .lock()
                .unwrap()
                .push((job_id.to_string(), status.to_string(), progress));
            Ok(())
        }
    }

    #[tokio::test]
    async fn disabled_reporter_is_silent() {
        let reporter = ProgressReporter::disabled();
        assert!(!reporter.is_enabled());
        reporter.checkpoint(GENERATING_AUDIO).await.unwrap();
    }

    #[tokio::test]
    async fn records_checkpoint() {
        let store = Arc::new(RecordingStore::default());
        let reporter = ProgressReporter::new(store.clone(), "job-1", StatusPolicy::FailFast);
        reporter.checkpoint(GENERATING_TRANSCRIPT).await.unwrap();

        assert_eq!(
            store.updates.lock().unwrap()[0],
            ("job-1".to_string(), "Generating transcript".to_string(), 0)
        );
    }

    #[tokio::test]
    async fn policy_decides_whether_failures_propagate() {
        let store = Arc::new(RecordingStore {
            broken: true,
            ..Default::default()
        });

        let lenient = ProgressReporter::new(store.clone(), "job-1", StatusPolicy::BestEffort);
        assert!(lenient.checkpoint(GENERATING_AUDIO).await.is_ok());

        let strict = ProgressReporter::new(store, "job-1", StatusPolicy::FailFast);
        assert!(matches!(
            strict.checkpoint(GENERATING_AUDIO).await,
            Err(BrainrotError::StatusReport(_))
        ));
    }

    #[tokio::test]
    async fn http_store_posts_job_update() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/jobs/status"))
            .and(header("authorization", "Bearer tok"))
            .and(body_json(serde_json::json!({
                "jobId": "abc",
                "status": "Generating audio",
                "progress": 12
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let store = HttpStatusStore::new(format!("{}/jobs/status", server.uri()), Some("tok".into()));
        store.update("abc", "Generating audio", 12).await.unwrap();
    }

    #[tokio::test]
    async fn http_store_maps_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = HttpStatusStore::new(server.uri(), None);
        assert!(matches!(
            store.update("abc", "x", 0).await,
            Err(BrainrotError::StatusReport(_))
        ));
    }
}
