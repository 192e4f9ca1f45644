//! Downloading of files over HTTP.


use std::path::{Path, PathBuf};

use atomic_write_file::AtomicWriteFile;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("creating HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("GET {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("GET {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("writing download to {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Retrieves the content at a URL into a file.
pub trait Fetcher: Send + Sync {
    /// Downloads `url` to `dest`. On failure `dest` is left as it was.
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}

/// [Fetcher] performing an unauthenticated HTTP(S) GET.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        log::debug!("GET {url}");
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Request {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_owned(),
                status,
            });
        }

        let write_err = |source| FetchError::Write {
            path: dest.to_owned(),
            source,
        };
        let mut file = AtomicWriteFile::open(dest).map_err(write_err)?;
        let size = response.copy_to(&mut file).map_err(|source| FetchError::Request {
            url: url.to_owned(),
            source,
        })?;
        file.commit().map_err(write_err)?;

        log::info!("Downloaded {size} bytes from {url} to {dest:?}.");
        Ok(())
    }
}
