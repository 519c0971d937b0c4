// ImpactWatch — Sensor Array
//
// Owns the TCA9548A multiplexer and one MPU6050 handle per configured
// channel. Bring-up is atomic: if any device fails to answer or take its
// configuration, the whole attempt is discarded and the supervisor retries.
// Sampling is best-effort: a sensor that fails one read is skipped for
// that cycle only.

use anyhow::{bail, Context};

use crate::config::*;
use crate::drivers::imu::{Mpu6050, SharedBus};
use crate::drivers::mux::Tca9548a;
use crate::readings::AccelerationSample;

/// One accelerometer bound to one mux channel. Built during bring-up and
/// immutable for the rest of the process lifetime.
pub struct SensorChannel {
    pub index: usize,
    mux_channel: u8,
    imu: Mpu6050,
}

pub struct SensorArray {
    mux: Tca9548a,
    channels: Vec<SensorChannel>,
}

impl SensorArray {
    /// Bring up the mux and every configured sensor as one atomic unit.
    /// Any failure aborts the attempt; the caller decides retry policy.
    pub fn bring_up(bus: SharedBus) -> anyhow::Result<Self> {
        log::info!("Initializing TCA9548A multiplexer...");
        let mux = Tca9548a::new(bus);
        mux.probe()?;

        log::info!("Initializing MPU6050 sensors...");
        let mut channels = Vec::with_capacity(SENSOR_MUX_CHANNELS.len());
        for (index, &mux_channel) in SENSOR_MUX_CHANNELS.iter().enumerate() {
            mux.select(mux_channel)?;

            let imu = Mpu6050::new(bus);
            if !imu.is_connected() {
                bail!("sensor {} not found on mux channel {}", index + 1, mux_channel);
            }
            imu.init()
                .with_context(|| format!("sensor {} config (±2g) failed", index + 1))?;

            channels.push(SensorChannel { index, mux_channel, imu });
        }

        log::info!("MPU6050 sensors initialized with sensitivity ±2g");
        Ok(Self { mux, channels })
    }

    /// Read every sensor once, in channel order. A failed read is logged
    /// and that sensor is omitted from this cycle — no retry, no abort.
    pub fn sample_all(&mut self) -> Vec<AccelerationSample> {
        let mut samples = Vec::with_capacity(self.channels.len());

        for channel in &self.channels {
            match self.read_channel(channel) {
                Ok(sample) => samples.push(sample),
                Err(e) => log::warn!("Error reading sensor {}: {}", channel.index + 1, e),
            }
        }

        samples
    }

    fn read_channel(&self, channel: &SensorChannel) -> anyhow::Result<AccelerationSample> {
        self.mux.select(channel.mux_channel)?;
        let (ax, ay, az) = channel.imu.read_accel()?;
        Ok(AccelerationSample { sensor_index: channel.index, ax, ay, az })
    }
}
