//! HTTP transport used by the pipeline.
//!
//! `HttpSession` owns one libcurl easy handle for the whole invocation so the
//! search request and the artifact download share its connection cache. The
//! handle is released when the session is dropped.

use std::cell::RefCell;
use std::io::Write;
use std::time::Duration;

use crate::config::HttpConfig;
use crate::error::TransportError;

/// The two network capabilities the pipeline consumes.
///
/// Both calls block until the exchange finishes. Redirects are followed.
pub trait Transport {
    /// GET `url` and return the body decoded as (lossy) UTF-8.
    fn get_page(&mut self, url: &str) -> Result<String, TransportError>;

    /// GET `url` and stream the body into `sink`. Returns the number of bytes written.
    fn download_to(&mut self, url: &str, sink: &mut dyn Write) -> Result<u64, TransportError>;
}

/// Curl-backed [`Transport`], scoped to one pipeline run.
pub struct HttpSession {
    easy: curl::easy::Easy,
}

impl HttpSession {
    pub fn new(cfg: &HttpConfig) -> Result<Self, TransportError> {
        let mut easy = curl::easy::Easy::new();
        easy.follow_location(true)?;
        if let Some(n) = cfg.max_redirections {
            easy.max_redirections(n)?;
        }
        if let Some(secs) = cfg.connect_timeout_secs {
            easy.connect_timeout(Duration::from_secs(secs))?;
        }
        if let Some(secs) = cfg.timeout_secs {
            easy.timeout(Duration::from_secs(secs))?;
        }
        if let Some(ua) = cfg.user_agent.as_deref() {
            easy.useragent(ua)?;
        }
        Ok(Self { easy })
    }

    /// Runs one GET, handing each body chunk to `on_data`.
    ///
    /// `on_data` returning an error aborts the transfer; that error wins over
    /// the generic curl write failure it causes.
    fn get_with<F>(&mut self, url: &str, mut on_data: F) -> Result<(), TransportError>
    where
        F: FnMut(&[u8]) -> std::io::Result<()>,
    {
        self.easy.url(url)?;
        self.easy.get(true)?;

        let write_err: RefCell<Option<std::io::Error>> = RefCell::new(None);
        let performed = {
            let mut transfer = self.easy.transfer();
            transfer.write_function(|data| match on_data(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    tracing::warn!("download write failed: {}", e);
                    *write_err.borrow_mut() = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_err.into_inner() {
            return Err(TransportError::Storage(e));
        }
        performed?;

        let code = self.easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(TransportError::Http {
                url: url.to_string(),
                code,
            });
        }
        Ok(())
    }
}

impl Transport for HttpSession {
    fn get_page(&mut self, url: &str) -> Result<String, TransportError> {
        let mut body = Vec::new();
        self.get_with(url, |data| {
            body.extend_from_slice(data);
            Ok(())
        })?;
        tracing::debug!("fetched {} bytes from {}", body.len(), url);
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn download_to(&mut self, url: &str, sink: &mut dyn Write) -> Result<u64, TransportError> {
        let mut written = 0u64;
        self.get_with(url, |data| {
            sink.write_all(data)?;
            written += data.len() as u64;
            Ok(())
        })?;
        sink.flush().map_err(TransportError::Storage)?;
        Ok(written)
    }
}
