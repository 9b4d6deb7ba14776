/// The peripherals a trial needs, built once at startup and lent to the RTC
/// driver and the debouncer. Nothing else touches the bus or the pin.
pub struct Hardware<I2C, P, D> {
    /// Bus the RTC sits on.
    pub i2c: I2C,
    /// Button input, pulled up, low when pressed.
    pub button: P,
    pub delay: D,
}

impl<I2C, P, D> Hardware<I2C, P, D> {
    pub fn new(i2c: I2C, button: P, delay: D) -> Self {
        Self { i2c, button, delay }
    }
}
