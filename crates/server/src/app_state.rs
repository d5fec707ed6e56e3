use command_queue::{CommandQueue, QueueSettings};

use crate::flash_store::FlashStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) queue_settings: QueueSettings,
    pub(crate) flash: FlashStore,
}

impl AppState {
    /// Fresh queue for one request.
    pub(crate) fn request_queue(&self) -> CommandQueue {
        CommandQueue::new(self.queue_settings.clone())
    }
}
