use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::util::guess_filename_from_url;

impl Client {
    /// Streams a content link returned by the service (e.g. from
    /// `transfer/directdl`) to `target`.
    ///
    /// An empty `target` falls back to the last path segment of `url`. The
    /// link is fetched as is, without the `apikey` parameter, in a single
    /// attempt.
    pub async fn download(&self, url: &str, target: &Path) -> Result<PathBuf> {
        let target = if target.as_os_str().is_empty() {
            guess_filename_from_url(url)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("download"))
        } else {
            target.to_path_buf()
        };

        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| Error::File {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }

        let mut resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(Error::Status(resp.status()));
        }

        let total = resp.content_length();
        debug!(url = %url, target = %target.display(), total = ?total, "downloading");

        let pb = if self.progress {
            let pb = match total {
                Some(len) => ProgressBar::new(len),
                None => ProgressBar::new_spinner(),
            };
            if let Ok(style) = ProgressStyle::with_template(
                "{spinner:.green} {bytes}/{total_bytes} ({bytes_per_sec}) {wide_bar} {eta}",
            ) {
                pb.set_style(style.progress_chars("=>-"));
            }
            Some(pb)
        } else {
            None
        };

        let file_err = |source| Error::File {
            path: target.clone(),
            source,
        };
        let mut out = tokio::fs::File::create(&target).await.map_err(file_err)?;

        while let Some(chunk) = resp.chunk().await? {
            out.write_all(&chunk).await.map_err(file_err)?;
            if let Some(pb) = &pb {
                pb.inc(chunk.len() as u64);
            }
        }
        out.flush().await.map_err(file_err)?;

        if let Some(pb) = &pb {
            pb.finish_and_clear();
        }
        Ok(target)
    }
}
