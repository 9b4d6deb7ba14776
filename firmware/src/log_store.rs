//! Trial log kept in flash.
//!
//! Every line is one entry of a `sequential-storage` queue in the log
//! partition. Entries are only ever pushed and iterated, never popped, so the
//! queue behaves as an append-only file that survives resets.

use defmt::{debug, warn};
use embassy_rp::flash;
use sequential_storage::cache::NoCache;
use sequential_storage::queue;
use timing_core::LogStore;

use crate::OM_FLASH;
use crate::config::LOG_ENTRY_MAX_LEN;
use crate::flash_layout::get_log_range;

pub type LogStoreError = sequential_storage::Error<flash::Error>;

#[derive(Default)]
pub struct FlashLogStore;

impl FlashLogStore {
    pub fn new() -> Self {
        Self
    }
}

impl LogStore for FlashLogStore {
    type Error = LogStoreError;

    async fn append_line(&mut self, line: &str) -> Result<(), Self::Error> {
        debug!("Appending {} bytes to the flash log", line.len());

        let mut flash = OM_FLASH.get().await.lock().await;

        // Refuse to overwrite old trials; a full partition is a write failure.
        queue::push(
            &mut *flash,
            get_log_range(),
            &mut NoCache::new(),
            line.as_bytes(),
            false,
        )
        .await
    }
}

/// Hand every stored line to `visit`, oldest first. Returns the number of
/// lines visited.
pub async fn for_each_line<F>(mut visit: F) -> Result<usize, LogStoreError>
where
    F: AsyncFnMut(&[u8]),
{
    let mut flash = OM_FLASH.get().await.lock().await;
    let mut cache = NoCache::new();
    let mut iterator = queue::iter(&mut *flash, get_log_range(), &mut cache).await?;

    let mut buffer = [0u8; LOG_ENTRY_MAX_LEN];
    let mut count = 0;
    while let Some(entry) = iterator.next(&mut buffer).await? {
        if core::str::from_utf8(&*entry).is_err() {
            warn!("Log entry {} is not valid UTF-8", count);
        }
        visit(&*entry).await;
        count += 1;
    }
    Ok(count)
}
