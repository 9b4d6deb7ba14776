// Provide a mapping for the controller GPIO pins

//
//| GPIO # | Name      | Description                                                 |
//| ------ | --------- | ----------------------------------------------------------- |
//| 0      | UART0_TX  | Console output: log dump and operator messages.             |
//| 1      | UART0_RX  | Console input. Ctrl-C stops the trial loop.                 |
//| 14     | I2C1_SDA  | RTC data line. Controller is primary. External pull-up.     |
//| 15     | I2C1_SCL  | RTC clock line. Controller is primary. External pull-up.    |
//| 16     | BUTTON    | Trial button to ground. Internal pull-up, active low.       |
//| 25     | LED       | On-board LED. Not used.                                     |

use assign_resources::assign_resources;
use embassy_rp::peripherals;

assign_resources! {
  /// Bus and button the trial runner owns
  trial: TrialResources {
    i2c: I2C1,
    sda: PIN_14,
    scl: PIN_15,
    button: PIN_16,
  },
  console: ConsoleResources {
    uart: UART0,
    tx: PIN_0,
    rx: PIN_1,
    tx_dma: DMA_CH0,
    rx_dma: DMA_CH1,
  },
  flash: FlashResources {
    flash: FLASH,
    dma_ch: DMA_CH2,
  },
  watchdog: WatchdogResources {
    watchdog: WATCHDOG,
  },
}
