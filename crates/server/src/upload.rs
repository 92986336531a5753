use std::path::{Path, PathBuf};

/// An uploaded file parked on disk for the length of one request.
///
/// The file is deleted when this value is dropped, including when a write
/// fails part way or the owning task is cancelled.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    /// Write `data` under `dir` with a collision-free name derived from the
    /// client's file name.
    pub async fn write(
        dir: &Path,
        client_name: Option<&str>,
        data: &[u8],
    ) -> std::io::Result<Self> {
        let path = dir.join(format!("{}-{}", uuid::Uuid::new_v4(), sanitize_file_name(client_name)));
        // Own the path before writing so a partial file is cleaned up too.
        let upload = Self { path };
        tokio::fs::write(&upload.path, data).await?;
        tracing::debug!(path = %upload.path.display(), bytes = data.len(), "upload stored");
        Ok(upload)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

}

impl Drop for TempUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "upload removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %self.path.display(), "failed to remove upload: {e}"),
        }
    }
}

/// Keep only the final path component, restricted to a safe character set.
fn sanitize_file_name(name: Option<&str>) -> String {
    let base = name
        .and_then(|n| n.rsplit(['/', '\\']).next())
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
