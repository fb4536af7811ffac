use reqwest::Body;
use reqwest::multipart::Part;
use std::fmt;
use std::path::PathBuf;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

use crate::error::{Error, Result};

/// File attached to `transfer/create`.
pub enum FileSource {
    /// Local file, opened when the request is built and closed once it settles.
    Path(PathBuf),
    /// Already-open reader, streamed as is.
    Reader {
        reader: Box<dyn AsyncRead + Send + Sync + Unpin>,
        file_name: String,
    },
    /// In-memory contents.
    Bytes { data: Vec<u8>, file_name: String },
}

impl FileSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        FileSource::Path(path.into())
    }

    pub fn reader<R>(reader: R, file_name: impl Into<String>) -> Self
    where
        R: AsyncRead + Send + Sync + Unpin + 'static,
    {
        FileSource::Reader {
            reader: Box::new(reader),
            file_name: file_name.into(),
        }
    }

    pub fn bytes(data: impl Into<Vec<u8>>, file_name: impl Into<String>) -> Self {
        FileSource::Bytes {
            data: data.into(),
            file_name: file_name.into(),
        }
    }

    /// Converts into a multipart part. For `Path`, the open handle moves into
    /// the part's body stream and is dropped with it.
    pub(crate) async fn into_part(self) -> Result<Part> {
        match self {
            FileSource::Path(path) => {
                let file = tokio::fs::File::open(&path).await.map_err(|source| Error::File {
                    path: path.clone(),
                    source,
                })?;
                let len = file
                    .metadata()
                    .await
                    .map_err(|source| Error::File {
                        path: path.clone(),
                        source,
                    })?
                    .len();
                let body = Body::wrap_stream(ReaderStream::new(file));
                Ok(Part::stream_with_length(body, len).file_name(file_name_of(&path)))
            }
            FileSource::Reader { reader, file_name } => {
                let body = Body::wrap_stream(ReaderStream::new(reader));
                Ok(Part::stream(body).file_name(file_name))
            }
            FileSource::Bytes { data, file_name } => Ok(Part::bytes(data).file_name(file_name)),
        }
    }
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSource::Path(p) => f.debug_tuple("Path").field(p).finish(),
            FileSource::Reader { file_name, .. } => f
                .debug_struct("Reader")
                .field("file_name", file_name)
                .finish_non_exhaustive(),
            FileSource::Bytes { data, file_name } => f
                .debug_struct("Bytes")
                .field("len", &data.len())
                .field("file_name", file_name)
                .finish(),
        }
    }
}

impl From<PathBuf> for FileSource {
    fn from(p: PathBuf) -> Self {
        FileSource::Path(p)
    }
}

impl From<&std::path::Path> for FileSource {
    fn from(p: &std::path::Path) -> Self {
        FileSource::Path(p.to_path_buf())
    }
}

fn file_name_of(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string())
}
