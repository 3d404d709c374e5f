//! PTY channel abstraction for interactive sessions.

use std::time::Duration;

use log::trace;
use regex::bytes::Regex;
use russh::client::Msg;
use russh::{Channel, ChannelMsg};
use tokio::time::Instant;

use super::buffer::PatternBuffer;
use crate::error::{ChannelError, Result};

/// High-level PTY channel for interactive device sessions.
///
/// Wraps a russh shell channel and provides pattern-based reads with a
/// deadline. Pager prompts (`--More--` and friends) are answered with a
/// space and removed from the captured output.
pub struct PtyChannel {
    /// The underlying shell channel.
    channel: Channel<Msg>,

    /// Pattern buffer for accumulating output.
    buffer: PatternBuffer,

    /// Pager prompt to answer automatically, if the device has one.
    pager: Option<Regex>,
}

impl PtyChannel {
    /// Wrap an open shell channel.
    pub fn new(channel: Channel<Msg>, search_depth: usize) -> Self {
        Self {
            channel,
            buffer: PatternBuffer::new(search_depth),
            pager: None,
        }
    }

    /// Set the pager prompt pattern.
    pub fn set_pager(&mut self, pager: Option<Regex>) {
        self.pager = pager;
    }

    /// Send a line of input followed by a newline.
    pub async fn send(&mut self, input: &str) -> Result<()> {
        let line = format!("{input}\n");
        self.write(line.as_bytes()).await
    }

    /// Read until `pattern` matches the tail of the output, or `timeout` elapses.
    ///
    /// Returns everything read since the previous successful read.
    pub async fn read_until(&mut self, pattern: &Regex, timeout: Duration) -> Result<Vec<u8>> {
        let deadline = Instant::now() + timeout;

        loop {
            if self.buffer.tail_contains(pattern) {
                return Ok(self.buffer.take());
            }

            let msg = tokio::time::timeout_at(deadline, self.channel.wait())
                .await
                .map_err(|_| ChannelError::PatternTimeout(timeout))?;

            match msg {
                Some(ChannelMsg::Data { data }) | Some(ChannelMsg::ExtendedData { data, .. }) => {
                    trace!("read {} bytes", data.len());
                    self.buffer.extend(&data);
                    self.answer_pager().await?;
                }
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    return Err(ChannelError::Closed.into());
                }
                Some(_) => {}
            }
        }
    }

    /// Discard output until the channel has been quiet for `quiet`.
    ///
    /// Login banners and the extra prompt echoed for the wake-up newline
    /// would otherwise be mistaken for the next command's output. Gives up
    /// waiting for silence after ten quiet periods.
    pub async fn settle(&mut self, quiet: Duration) -> Result<()> {
        let deadline = Instant::now() + quiet * 10;

        while Instant::now() < deadline {
            match tokio::time::timeout(quiet, self.channel.wait()).await {
                Err(_) => break,
                Ok(Some(ChannelMsg::Eof)) | Ok(Some(ChannelMsg::Close)) | Ok(None) => {
                    return Err(ChannelError::Closed.into());
                }
                Ok(Some(_)) => {}
            }
        }

        self.buffer.clear();
        Ok(())
    }

    /// Send EOF and close the channel.
    pub async fn close(self) -> Result<()> {
        self.channel.eof().await.map_err(ChannelError::Ssh)?;
        self.channel.close().await.map_err(ChannelError::Ssh)?;
        Ok(())
    }

    async fn answer_pager(&mut self) -> Result<()> {
        let paged = match &self.pager {
            Some(pager) => self.buffer.remove_tail_match(pager),
            None => false,
        };
        if paged {
            trace!("answering pager prompt");
            self.write(b" ").await?;
        }
        Ok(())
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        self.channel.data(data).await.map_err(ChannelError::Ssh)?;
        Ok(())
    }
}
