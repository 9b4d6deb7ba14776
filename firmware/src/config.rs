pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // Raspberry Pi Pico, W25Q16

pub const LOG_PARTITION_SIZE: u32 = 64 * 1024; // Must match the gap left at the end of memory.x
pub const FLASH_ERASE_BLOCK_SIZE: u32 = 4096;
pub const LOG_ENTRY_MAX_LEN: usize = 128; // A log line is about 80 bytes

pub const CONSOLE_BAUD_RATE: u32 = 115_200;
pub const CONSOLE_INTERRUPT_BYTE: u8 = 0x03; // Ctrl-C

pub const WATCHDOG_TIMEOUT_MS: u64 = 8_000; // ms
pub const WATCHDOG_FEED_INTERVAL_MS: u64 = 1_000; // ms

pub const RTC_BUS_FREQUENCY_HZ: u32 = 100_000; // DS1307 only does standard mode

pub const FW_VERSION_STR: &str = "0.1.0";
