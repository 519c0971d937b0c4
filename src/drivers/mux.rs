// ImpactWatch — TCA9548A I2C Multiplexer Driver
//
// The mux carries one MPU6050 per downstream channel, letting three
// identical-address sensors share the single I2C bus. Selecting a channel
// writes the one-hot channel mask to the control register; the selection
// sticks until the next write.

use anyhow::Context;

use crate::config::*;
use crate::drivers::imu::SharedBus;

pub struct Tca9548a {
    bus: SharedBus,
}

impl Tca9548a {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    /// Verify the mux answers on the bus by reading its control register.
    pub fn probe(&self) -> anyhow::Result<()> {
        let mut bus = self.bus.lock().unwrap();
        let mut mask = [0u8; 1];
        bus.read(I2C_ADDR_TCA9548A, &mut mask, I2C_TIMEOUT_TICKS)
            .context("TCA9548A not responding")?;
        Ok(())
    }

    /// Route the bus to one downstream channel (0–7).
    pub fn select(&self, channel: u8) -> anyhow::Result<()> {
        let mut bus = self.bus.lock().unwrap();
        bus.write(I2C_ADDR_TCA9548A, &[1u8 << channel], I2C_TIMEOUT_TICKS)
            .with_context(|| format!("TCA9548A select channel {} failed", channel))?;
        Ok(())
    }
}
