//! Job endpoints of the IntelX REST API (`/api/jobs`).

use bytes::Bytes;
use intelx_api_types::{Job, JobListPage};
use reqwest::Method;
use url::Url;

use crate::{client::IntelXClient, error::IntelXError};

/// Plugin families that run against a job. Analyzers run first, connectors
/// after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    Analyzer,
    Connector,
}

impl PluginKind {
    fn segment(self) -> &'static str {
        match self {
            PluginKind::Analyzer => "analyzer",
            PluginKind::Connector => "connector",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum PluginAction {
    Kill,
    Retry,
}

impl PluginAction {
    fn segment(self) -> &'static str {
        match self {
            PluginAction::Kill => "kill",
            PluginAction::Retry => "retry",
        }
    }
}

/// Borrowed view over an [`IntelXClient`] exposing the job endpoints.
#[derive(Debug, Clone, Copy)]
pub struct JobService<'a> {
    client: &'a IntelXClient,
}

impl<'a> JobService<'a> {
    pub(crate) fn new(client: &'a IntelXClient) -> Self {
        Self { client }
    }

    fn job_url(&self, job_id: u64, tail: &[&str]) -> Result<Url, IntelXError> {
        let id = job_id.to_string();
        let mut segments = vec!["api", "jobs", id.as_str()];
        segments.extend_from_slice(tail);
        self.client.endpoint(&segments)
    }

    async fn plugin_action(
        &self,
        job_id: u64,
        kind: PluginKind,
        name: &str,
        action: PluginAction,
    ) -> Result<bool, IntelXError> {
        let url = self.job_url(job_id, &[kind.segment(), name, action.segment()])?;
        self.client.action(Method::PATCH, url).await
    }

    /// Lists the jobs of the instance.
    ///
    /// Endpoint: `GET /api/jobs`
    pub async fn list(&self) -> Result<JobListPage, IntelXError> {
        let url = self.client.endpoint(&["api", "jobs"])?;
        self.client.get_json(url).await
    }

    /// Fetches one job with its reports.
    ///
    /// Endpoint: `GET /api/jobs/{id}`
    pub async fn get(&self, job_id: u64) -> Result<Job, IntelXError> {
        let url = self.job_url(job_id, &[])?;
        self.client.get_json(url).await
    }

    /// Downloads the file sample analysed by a job. The bytes are returned
    /// exactly as served.
    ///
    /// Endpoint: `GET /api/jobs/{id}/download_sample`
    pub async fn download_sample(&self, job_id: u64) -> Result<Bytes, IntelXError> {
        let url = self.job_url(job_id, &["download_sample"])?;
        self.client.get_bytes(url).await
    }

    /// Deletes a job. Returns `true` when the service answers 204.
    ///
    /// Endpoint: `DELETE /api/jobs/{id}`
    pub async fn delete(&self, job_id: u64) -> Result<bool, IntelXError> {
        let url = self.job_url(job_id, &[])?;
        self.client.action(Method::DELETE, url).await
    }

    /// Stops a running job. Returns `true` when the service answers 204.
    ///
    /// Endpoint: `PATCH /api/jobs/{id}/kill`
    pub async fn kill(&self, job_id: u64) -> Result<bool, IntelXError> {
        let url = self.job_url(job_id, &["kill"])?;
        self.client.action(Method::PATCH, url).await
    }

    /// Endpoint: `PATCH /api/jobs/{id}/analyzer/{name}/kill`
    pub async fn kill_analyzer(&self, job_id: u64, analyzer: &str) -> Result<bool, IntelXError> {
        self.plugin_action(job_id, PluginKind::Analyzer, analyzer, PluginAction::Kill)
            .await
    }

    /// Endpoint: `PATCH /api/jobs/{id}/analyzer/{name}/retry`
    pub async fn retry_analyzer(&self, job_id: u64, analyzer: &str) -> Result<bool, IntelXError> {
        self.plugin_action(job_id, PluginKind::Analyzer, analyzer, PluginAction::Retry)
            .await
    }

    /// Endpoint: `PATCH /api/jobs/{id}/connector/{name}/kill`
    pub async fn kill_connector(&self, job_id: u64, connector: &str) -> Result<bool, IntelXError> {
        self.plugin_action(job_id, PluginKind::Connector, connector, PluginAction::Kill)
            .await
    }

    /// Endpoint: `PATCH /api/jobs/{id}/connector/{name}/retry`
    pub async fn retry_connector(
        &self,
        job_id: u64,
        connector: &str,
    ) -> Result<bool, IntelXError> {
        self.plugin_action(job_id, PluginKind::Connector, connector, PluginAction::Retry)
            .await
    }

    /// Kills one plugin run of a job, whichever family it belongs to.
    pub async fn kill_plugin(
        &self,
        job_id: u64,
        kind: PluginKind,
        name: &str,
    ) -> Result<bool, IntelXError> {
        self.plugin_action(job_id, kind, name, PluginAction::Kill)
            .await
    }

    /// Re-runs one plugin of a job, whichever family it belongs to.
    pub async fn retry_plugin(
        &self,
        job_id: u64,
        kind: PluginKind,
        name: &str,
    ) -> Result<bool, IntelXError> {
        self.plugin_action(job_id, kind, name, PluginAction::Retry)
            .await
    }
}
