//! HTTP fetch of album audio into memory.
//!
//! Tracks are small promotional objects, so the whole file is pulled before
//! decoding starts. The agent is shared and carries consistent timeouts.

use std::io::Read;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(30);
/// Upper bound on a fetched audio object; anything past this is a
/// misconfigured URL, not an album track.
const MAX_AUDIO_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] Box<ureq::Error>),
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("audio object exceeds {MAX_AUDIO_BYTES} bytes")]
    TooLarge,
}

/// Return a shared HTTP agent with consistent timeouts.
fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .build()
    })
}

/// Fetch the complete audio object at `url`.
pub(super) fn fetch_audio(url: &str) -> Result<Arc<[u8]>, FetchError> {
    let response = agent().get(url).call().map_err(Box::new)?;
    let mut bytes: Vec<u8> = Vec::new();
    response
        .into_reader()
        .take(MAX_AUDIO_BYTES + 1)
        .read_to_end(&mut bytes)?;
    if bytes.len() as u64 > MAX_AUDIO_BYTES {
        return Err(FetchError::TooLarge);
    }
    Ok(bytes.into())
}
