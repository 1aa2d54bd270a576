//! Unified error type for the Spellwire client.

use spellwire_session::SessionError;
use spellwire_transport::TransportError;

/// Top-level error that wraps the layer-specific errors.
///
/// When using the `spellwire` crate, you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Opening or using the line stream failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The session ended with a fatal error (version mismatch, timeout,
    /// rejected login, transport failure).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The driver task is gone, so the client can't be reached anymore.
    #[error("client driver has stopped")]
    DriverGone,
}
