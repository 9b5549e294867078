use super::Storage;
use crate::errors::RequestError;
use crate::request::RowsRequest;
use config::STORAGE_ADAPTER_BLACK_HOLE;

/// Storage that keeps nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackHoleStorage;

impl Storage for BlackHoleStorage {
    fn save(&self, _request: &RowsRequest) -> Result<(), RequestError> {
        Ok(())
    }

    fn load(&self, _request: &mut RowsRequest) -> Result<(), RequestError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), RequestError> {
        Ok(())
    }

    fn adapter_name(&self) -> &'static str {
        STORAGE_ADAPTER_BLACK_HOLE
    }
}
