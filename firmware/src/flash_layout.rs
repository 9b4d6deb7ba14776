use core::ops::Range;

use crate::config::{FLASH_ERASE_BLOCK_SIZE, FLASH_SIZE, LOG_PARTITION_SIZE};

/// Offsets of the trial log partition, relative to the start of flash.
/// It sits at the very end of the chip, outside the FLASH region in memory.x.
pub const LOG_FLASH_RANGE: Range<u32> = {
    let end = FLASH_SIZE as u32;
    end - LOG_PARTITION_SIZE..end
};

const _: () = assert!(LOG_PARTITION_SIZE % FLASH_ERASE_BLOCK_SIZE == 0);
const _: () = assert!(LOG_PARTITION_SIZE / FLASH_ERASE_BLOCK_SIZE >= 2);

pub fn get_log_range() -> Range<u32> {
    LOG_FLASH_RANGE
}

pub fn get_log_size() -> u32 {
    LOG_FLASH_RANGE.end - LOG_FLASH_RANGE.start
}
