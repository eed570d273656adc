use async_trait::async_trait;

use super::Backend;
use crate::error::BackendError;
use crate::system::snapshot::Usage;

/// Stand-in for operating systems without a sampling strategy.
#[derive(Debug, Default)]
pub struct UnsupportedBackend;

const REASON: &str = "platform not supported";

#[async_trait]
impl Backend for UnsupportedBackend {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    async fn read_cpu(&mut self) -> Result<f64, BackendError> {
        Err(BackendError::unavailable("cpu", REASON))
    }

    fn read_memory(&mut self) -> Result<Usage, BackendError> {
        Err(BackendError::unavailable("memory", REASON))
    }

    fn read_disk(&mut self) -> Result<Usage, BackendError> {
        Err(BackendError::unavailable("disk", REASON))
    }
}
