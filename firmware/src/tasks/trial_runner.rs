use defmt::{Display2Format, error, info};
use embassy_executor::task;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, I2c, InterruptHandler};
use embassy_rp::peripherals::I2C1;
use embassy_time::Delay;
use timing_core::config::RTC_ADDRESS;
use timing_core::{Hardware, LogWriter, Rtc, Termination, TimingConfig, TimingCoordinator};

use crate::config::RTC_BUS_FREQUENCY_HZ;
use crate::config_resources::TrialResources;
use crate::log_store::FlashLogStore;
use crate::tasks::console::CANCEL;

bind_interrupts!(struct Irqs {
    I2C1_IRQ => InterruptHandler<I2C1>;
});

#[task]
pub async fn trial_runner_task(r: TrialResources) {
    let mut config = i2c::Config::default();
    config.frequency = RTC_BUS_FREQUENCY_HZ;
    let bus = I2c::new_async(r.i2c, r.scl, r.sda, Irqs, config);
    // Button to ground, so pressed reads low.
    let button = Input::new(r.button, Pull::Up);

    let mut hw = Hardware::new(bus, button, Delay);
    let mut log = LogWriter::new(FlashLogStore::new());
    let mut coordinator = TimingCoordinator::new(TimingConfig::default(), Rtc::new(RTC_ADDRESS));

    info!(
        "Starting trials: aim for {} s between presses. Ctrl-C on the console stops.",
        coordinator.config().target_secs
    );

    match coordinator.run(&mut hw, &mut log, &CANCEL).await {
        Termination::Cancelled => info!("Trials stopped by operator"),
        Termination::RtcNotFound => {
            error!("No RTC answered at {=u8:#04x}, check its wiring", RTC_ADDRESS)
        }
        other => error!("Trials stopped: {}", Display2Format(&other)),
    }

    info!(
        "{} trial(s) run this session. Reset the board to start again.",
        coordinator.next_index() - 1
    );
}
