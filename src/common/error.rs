// src/common/error.rs

#[derive(Debug, thiserror::Error)]
pub enum HumonError<E = ()>
where
    E: core::fmt::Debug, // Debug is enough for the transport error in messages
{
    /// The link could not be opened (wrong port, device absent, permissions).
    #[error("could not open link on {port}: {cause:?}")]
    Connection { port: String, cause: E },

    /// Transmitting the command frame failed.
    #[error("write error: {0:?}")]
    Write(E),

    /// Underlying I/O error while reading from the link.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// Operation timed out.
    #[error("Operation timed out")]
    Timeout,

    /// A received line did not fit into the frame buffer.
    #[error("Frame overflow: needed {needed}, got {got}")]
    FrameOverflow { needed: usize, got: usize },

    /// A received line was not valid UTF-8.
    #[error("Received line is not valid UTF-8")]
    InvalidUtf8,

    /// The link was used after it had been closed (or before it was opened).
    #[error("Link is closed")]
    LinkClosed,

    /// The command frame could not be formatted into its buffer.
    #[error("Command formatting failed")]
    CommandFormat,

    /// A sampling request parameter is out of range.
    #[error("Invalid sampling request: {0}")]
    InvalidRequest(&'static str),
}
