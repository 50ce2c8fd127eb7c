use crate::service::BlobService;

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub service: BlobService,
}

impl AppState {
    pub fn new(service: BlobService) -> Self {
        Self { service }
    }
}
