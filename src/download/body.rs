//! Response body reader yielding bounded chunks, with optional gzip decoding.

use std::io::Write;

use flate2::write::GzDecoder;
use futures_util::{Stream, StreamExt};

use super::DownloadError;

/// Pulls a response body stream and hands it out in caller-sized chunks.
///
/// When the response declared gzip content-encoding, compressed frames are
/// fed through an incremental decoder and the decoded bytes are returned.
pub(crate) struct BodyReader<S> {
    stream: S,
    decoder: Option<GzDecoder<Vec<u8>>>,
    pending: Vec<u8>,
    position: usize,
    finished: bool,
    url: String,
}

impl<S, B> BodyReader<S>
where
    S: Stream<Item = Result<B, reqwest::Error>> + Unpin,
    B: AsRef<[u8]>,
{
    pub(crate) fn new(stream: S, gzip: bool, url: impl Into<String>) -> Self {
        Self {
            stream,
            decoder: gzip.then(|| GzDecoder::new(Vec::new())),
            pending: Vec::new(),
            position: 0,
            finished: false,
            url: url.into(),
        }
    }

    /// Fills `buf` with up to `buf.len()` bytes, returning 0 at end of body.
    pub(crate) async fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, DownloadError> {
        loop {
            let available = self.pending.len() - self.position;
            if available > 0 {
                let n = available.min(buf.len());
                buf[..n].copy_from_slice(&self.pending[self.position..self.position + n]);
                self.position += n;
                return Ok(n);
            }
            if self.finished {
                return Ok(0);
            }

            self.pending.clear();
            self.position = 0;
            match self.stream.next().await {
                Some(Ok(frame)) => self.accept(frame.as_ref())?,
                Some(Err(e)) => return Err(DownloadError::from_transport(&self.url, e)),
                None => {
                    self.finished = true;
                    self.finish_decoder()?;
                }
            }
        }
    }

    fn accept(&mut self, frame: &[u8]) -> Result<(), DownloadError> {
        match self.decoder.as_mut() {
            Some(decoder) => {
                decoder
                    .write_all(frame)
                    .map_err(|e| DownloadError::decode(&self.url, e))?;
                self.pending.append(decoder.get_mut());
            }
            None => self.pending.extend_from_slice(frame),
        }
        Ok(())
    }

    fn finish_decoder(&mut self) -> Result<(), DownloadError> {
        if let Some(decoder) = self.decoder.as_mut() {
            decoder
                .try_finish()
                .map_err(|e| DownloadError::decode(&self.url, e))?;
            self.pending.append(decoder.get_mut());
        }
        Ok(())
    }
}
