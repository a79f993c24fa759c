//! # Snapshot Sources
//!
//! Fetches the raw member/relation payloads the engine consumes, either from
//! local JSON files or from the member repository's HTTP API:
//!
//! - `GET {base}/members`
//! - `GET {base}/relations`
//! - `GET {base}/patrons` (optional)
//! - `GET {base}/patron-referrals` (optional)
//!
//! Members and relations are required: if either fetch fails, no snapshot is
//! produced and the caller keeps its previous graph. The patron source is
//! best effort; a failure there yields a snapshot without patrons.

use crate::config::SourceConfig;
use relgraph_core::{GraphSession, RelgraphError, Snapshot, check_payload_size};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

// =============================================================================
// FILE SOURCE
// =============================================================================

/// Snapshot stored as JSON files (envelope or bare array per file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    pub members: PathBuf,
    pub relations: PathBuf,
    /// Patron and referral files, if the overlay is available.
    pub patrons: Option<(PathBuf, PathBuf)>,
}

impl FileSource {
    pub fn load(&self) -> Result<Snapshot, RelgraphError> {
        let members = read_validated(&self.members)?;
        let relations = read_validated(&self.relations)?;
        let snapshot = Snapshot::from_envelopes(&members, &relations)?;

        match &self.patrons {
            Some((patrons, referrals)) => {
                let patrons = read_validated(patrons)?;
                let referrals = read_validated(referrals)?;
                snapshot.with_patron_payloads(&patrons, &referrals)
            }
            None => Ok(snapshot),
        }
    }
}

/// Read a snapshot file after checking it is a regular file within the size limit.
fn read_validated(path: &Path) -> Result<Vec<u8>, RelgraphError> {
    let canonical = path.canonicalize().map_err(|e| {
        RelgraphError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(RelgraphError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    let metadata = std::fs::metadata(&canonical)
        .map_err(|e| RelgraphError::IoError(format!("Cannot read file metadata: {}", e)))?;
    check_payload_size(usize::try_from(metadata.len()).unwrap_or(usize::MAX))?;

    std::fs::read(&canonical)
        .map_err(|e| RelgraphError::IoError(format!("Read '{}': {}", path.display(), e)))
}

// =============================================================================
// REPOSITORY CLIENT
// =============================================================================

/// HTTP client for the member repository.
#[derive(Debug, Clone)]
pub struct RepositoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl RepositoryClient {
    /// Create a client for `base_url` (a trailing `/` is ignored).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base}{path}` and return the body, size-checked.
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, RelgraphError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RelgraphError::Upstream(format!("Cannot reach {}: {}", url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RelgraphError::Upstream(format!("GET {} returned {}", url, status)));
        }
        if let Some(len) = resp.content_length() {
            check_payload_size(usize::try_from(len).unwrap_or(usize::MAX))?;
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| RelgraphError::Upstream(format!("Read body of {}: {}", url, e)))?;
        check_payload_size(body.len())?;
        Ok(body.to_vec())
    }

    /// Fetch a full snapshot. Members and relations are fetched concurrently.
    pub async fn snapshot(&self) -> Result<Snapshot, RelgraphError> {
        let (members, relations) =
            tokio::try_join!(self.fetch("/members"), self.fetch("/relations"))?;
        let snapshot = Snapshot::from_envelopes(&members, &relations)?;

        let patrons = tokio::try_join!(self.fetch("/patrons"), self.fetch("/patron-referrals"));
        let with_patrons = patrons.and_then(|(patrons, referrals)| {
            snapshot.clone().with_patron_payloads(&patrons, &referrals)
        });

        match with_patrons {
            Ok(full) => Ok(full),
            Err(e) => {
                tracing::warn!("Patron overlay unavailable: {}", e);
                Ok(snapshot)
            }
        }
    }
}

// =============================================================================
// SNAPSHOT SOURCE
// =============================================================================

/// A configured snapshot source.
#[derive(Debug, Clone)]
pub enum SnapshotSource {
    Files(FileSource),
    Repository(RepositoryClient),
    /// Nothing configured: the graph starts empty.
    Empty,
}

impl SnapshotSource {
    /// Pick the source from configuration. The repository wins over files.
    #[must_use]
    pub fn from_config(config: &SourceConfig) -> Self {
        if let Some(url) = &config.api_url {
            return Self::Repository(RepositoryClient::new(url));
        }
        match (&config.members, &config.relations) {
            (Some(members), Some(relations)) => Self::Files(FileSource {
                members: members.clone(),
                relations: relations.clone(),
                patrons: config.patrons.clone().zip(config.referrals.clone()),
            }),
            _ => Self::Empty,
        }
    }

    pub async fn load(&self) -> Result<Snapshot, RelgraphError> {
        match self {
            Self::Files(files) => files.load(),
            Self::Repository(client) => client.snapshot().await,
            Self::Empty => {
                tracing::warn!("No snapshot source configured, starting with an empty graph");
                Ok(Snapshot::default())
            }
        }
    }

    /// Human-readable description for status output.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Files(files) => format!("files ({})", files.members.display()),
            Self::Repository(client) => format!("repository ({})", client.base_url()),
            Self::Empty => "none".to_string(),
        }
    }
}

// =============================================================================
// PERIODIC REFRESH
// =============================================================================

/// Re-load the snapshot every `every` and publish it into `session`.
///
/// A failed load keeps the previous graph and is retried on the next tick.
pub fn spawn_refresh(
    session: Arc<RwLock<GraphSession>>,
    source: SnapshotSource,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately; the initial snapshot is already loaded.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match source.load().await {
                Ok(snapshot) => {
                    let mut session = session.write().await;
                    session.refresh(snapshot);
                    tracing::info!("Snapshot refreshed (revision {})", session.revision());
                }
                Err(e) => tracing::warn!("Snapshot refresh failed: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).expect("create");
        file.write_all(contents.as_bytes()).expect("write");
        path
    }

    #[test]
    fn file_source_loads_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let members = write_file(
            dir.path(),
            "members.json",
            r#"{"success":true,"data":[{"email":"a","firstName":"A","lastName":"A","status":"active"}]}"#,
        );
        let relations = write_file(dir.path(), "relations.json", "[]");

        let source = FileSource {
            members,
            relations,
            patrons: None,
        };
        let snapshot = source.load().expect("load");

        assert_eq!(snapshot.members.len(), 1);
        assert!(snapshot.relations.is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = FileSource {
            members: PathBuf::from("/nonexistent/members.json"),
            relations: PathBuf::from("/nonexistent/relations.json"),
            patrons: None,
        };
        assert!(matches!(source.load(), Err(RelgraphError::IoError(_))));
    }

    #[test]
    fn directory_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = read_validated(dir.path());
        assert!(matches!(result, Err(RelgraphError::IoError(_))));
    }

    #[test]
    fn source_selection() {
        let mut config = SourceConfig::default();
        assert!(matches!(SnapshotSource::from_config(&config), SnapshotSource::Empty));

        config.members = Some(PathBuf::from("m.json"));
        config.relations = Some(PathBuf::from("r.json"));
        assert!(matches!(SnapshotSource::from_config(&config), SnapshotSource::Files(_)));

        config.api_url = Some("http://localhost:5000/api/".to_string());
        match SnapshotSource::from_config(&config) {
            SnapshotSource::Repository(client) => {
                assert_eq!(client.base_url(), "http://localhost:5000/api");
            }
            other => unreachable!("expected repository source, got {:?}", other),
        }
    }
}
