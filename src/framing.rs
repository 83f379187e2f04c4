//! Newline-delimited line reader for one connection half (spec.md §4.1).
//!
//! Messages arrive as arbitrary TCP fragments; the only contract is that
//! a `\n` ends a message. This wraps a [`BufReader`] the way
//! `syslog_cef_receiver` reads CEF lines off a socket: one `read_line`
//! call per message, reusing the same growable buffer.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

pub struct LineReader<R> {
    inner: BufReader<R>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: BufReader::new(reader),
        }
    }

    /// Read the next line, with only the trailing `\n` stripped. `\r` is
    /// payload, not a delimiter (spec.md §4.1: the protocol specifies LF
    /// termination) and is left in place, matching `server.py`'s
    /// `buffer.split('\n', 1)`. Returns `Ok(None)` on a clean EOF between
    /// messages.
    pub async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        let mut buf = String::new();
        let n = self.inner.read_line(&mut buf).await?;
        if n == 0 {
            return Ok(None);
        }
        if let Some(stripped) = buf.strip_suffix('\n') {
            buf.truncate(stripped.len());
        }
        Ok(Some(buf))
    }
}
