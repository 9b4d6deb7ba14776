pub mod console;
pub mod trial_runner;
pub mod watchdog_feeder;
