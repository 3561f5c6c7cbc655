// Weekly source implementations - HTTP, local files, and a router between them
use crate::application::weekly_source::WeeklySource;
use crate::domain::error::LoadError;
use crate::domain::observation::RawWeeklyRecord;
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct HttpWeeklySource {
    client: reqwest::Client,
}

impl HttpWeeklySource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WeeklySource for HttpWeeklySource {
    async fn fetch_week(&self, uri: &str) -> Result<Vec<RawWeeklyRecord>, LoadError> {
        tracing::debug!("Fetching weekly source {}", uri);

        let response = self
            .client
            .get(uri)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| LoadError::Unreachable {
                uri: uri.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(LoadError::Status {
                uri: uri.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| LoadError::Unreachable {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;
        parse_week(uri, &body)
    }
}

/// Reads weekly files from disk. Relative paths resolve against `root`.
#[derive(Debug, Clone, Default)]
pub struct FileWeeklySource {
    root: PathBuf,
}

impl FileWeeklySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl WeeklySource for FileWeeklySource {
    async fn fetch_week(&self, uri: &str) -> Result<Vec<RawWeeklyRecord>, LoadError> {
        let path = self.root.join(uri.strip_prefix("file://").unwrap_or(uri));
        tracing::debug!("Reading weekly source {}", path.display());

        let body = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| LoadError::Unreachable {
                uri: uri.to_string(),
                reason: e.to_string(),
            })?;
        parse_week(uri, &body)
    }
}

/// `http://` and `https://` URIs go over the network, anything else is a file.
#[derive(Debug, Clone, Default)]
pub struct RoutedWeeklySource {
    http: HttpWeeklySource,
    files: FileWeeklySource,
}

impl RoutedWeeklySource {
    pub fn new(http: HttpWeeklySource, files: FileWeeklySource) -> Self {
        Self { http, files }
    }
}

#[async_trait]
impl WeeklySource for RoutedWeeklySource {
    async fn fetch_week(&self, uri: &str) -> Result<Vec<RawWeeklyRecord>, LoadError> {
        if is_remote(uri) {
            self.http.fetch_week(uri).await
        } else {
            self.files.fetch_week(uri).await
        }
    }
}

fn is_remote(uri: &str) -> bool {
    uri.starts_with("http://") || uri.starts_with("https://")
}

fn parse_week(uri: &str, body: &str) -> Result<Vec<RawWeeklyRecord>, LoadError> {
    serde_json::from_str(body).map_err(|e| LoadError::Malformed {
        uri: uri.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_remote_detection() {
        assert!(is_remote("https://example.org/week1.json"));
        assert!(is_remote("http://localhost:8000/week1.json"));
        assert!(!is_remote("data/week1.json"));
        assert!(!is_remote("file:///tmp/week1.json"));
    }

    #[test]
    fn test_parse_week_rejects_non_array() {
        let err = parse_week("week1.json", r#"{"username": "alice"}"#).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { ref uri, .. } if uri == "week1.json"));
    }

    #[tokio::test]
    async fn test_file_source_reads_relative_and_file_uris() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("week1.json"),
            r#"[{"username": "alice", "total_deaths": 3, "total_playtime": 1.5,
                 "damage_dealt": 120, "damage_taken": 80}]"#,
        )
        .unwrap();
        let source = FileWeeklySource::new(dir.path());

        let records = source.fetch_week("week1.json").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].damage_taken, 80.0);

        let absolute = format!("file://{}", dir.path().join("week1.json").display());
        let routed = RoutedWeeklySource::new(HttpWeeklySource::default(), FileWeeklySource::default());
        assert_eq!(routed.fetch_week(&absolute).await.unwrap(), records);
    }

    #[tokio::test]
    async fn test_missing_file_is_unreachable() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileWeeklySource::new(dir.path());

        let err = source.fetch_week("week9.json").await.unwrap_err();

        assert!(matches!(err, LoadError::Unreachable { ref uri, .. } if uri == "week9.json"));
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("week1.json"), "[{\"total_deaths\": 3}]").unwrap();
        let source = FileWeeklySource::new(dir.path());

        let err = source.fetch_week("week1.json").await.unwrap_err();

        assert!(matches!(err, LoadError::Malformed { .. }));
    }
}
