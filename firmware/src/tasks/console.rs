//! UART console.
//!
//! At boot the stored trial log is written out verbatim, so a host terminal
//! can capture it as `log.txt`. After that the console only listens: a
//! Ctrl-C byte raises [`CANCEL`] and the trial runner stops at its next
//! check point.

use alloc::format;

use defmt::{info, trace, warn};
use embassy_executor::task;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{self, InterruptHandler, Uart};
use timing_core::CancelToken;

use crate::config::{CONSOLE_BAUD_RATE, CONSOLE_INTERRUPT_BYTE, FW_VERSION_STR};
use crate::config_resources::ConsoleResources;
use crate::log_store;

bind_interrupts!(struct Irqs {
    UART0_IRQ => InterruptHandler<UART0>;
});

/// Raised once by the console, checked by the trial runner.
pub static CANCEL: CancelToken = CancelToken::new();

#[task]
pub async fn console_task(r: ConsoleResources) {
    let mut config = uart::Config::default();
    config.baudrate = CONSOLE_BAUD_RATE;
    let uart = Uart::new(r.uart, r.tx, r.rx, Irqs, r.tx_dma, r.rx_dma, config);
    let (mut tx, mut rx) = uart.split();

    let banner = format!("# tempo {FW_VERSION_STR}: stored trials follow\r\n");
    if let Err(e) = tx.write(banner.as_bytes()).await {
        warn!("Console write failed: {:?}", e);
    }

    let dumped = log_store::for_each_line(async |line: &[u8]| {
        if let Err(e) = tx.write(line).await {
            warn!("Console write failed: {:?}", e);
        }
    })
    .await;
    match dumped {
        Ok(count) => info!("Dumped {} stored trial(s) to the console", count),
        Err(e) => warn!("Could not read the trial log: {:?}", defmt::Debug2Format(&e)),
    }
    if let Err(e) = tx.write(b"# end of log\r\n").await {
        warn!("Console write failed: {:?}", e);
    }

    let mut byte = [0u8; 1];
    loop {
        match rx.read(&mut byte).await {
            Ok(()) if byte[0] == CONSOLE_INTERRUPT_BYTE => {
                info!("Ctrl-C on the console, stopping");
                CANCEL.cancel();
                if let Err(e) = tx.write(b"^C\r\n").await {
                    warn!("Console write failed: {:?}", e);
                }
            }
            Ok(()) => trace!("Ignoring console byte {=u8:#04x}", byte[0]),
            Err(e) => warn!("Console read error: {:?}", e),
        }
    }
}
