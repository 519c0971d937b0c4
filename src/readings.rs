// ImpactWatch — Sensor Reading Types

use serde::Serialize;

// ---------------------------------------------------------------------------
// Acceleration Sample (raw 3-axis reading from one MPU6050)
// ---------------------------------------------------------------------------
/// One sensor's acceleration for the current sampling cycle, in m/s².
#[derive(Debug, Clone, Copy)]
pub struct AccelerationSample {
    /// 0-based position in the sensor array (mux channel order).
    pub sensor_index: usize,
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
}

// ---------------------------------------------------------------------------
// Derived G-Force Reading
// ---------------------------------------------------------------------------
/// Per-sensor L1 g-force total, derived from an [`AccelerationSample`].
#[derive(Debug, Clone, Copy)]
pub struct GForceReading {
    pub sensor_index: usize,
    pub total_g: f32,
}

// ---------------------------------------------------------------------------
// Threshold Event (wire format)
// ---------------------------------------------------------------------------
/// Emitted only when a sensor's total g-force exceeds the threshold.
/// Field names are the JSON wire names; `sensor` is 1-based for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdEvent {
    pub sensor: usize,
    pub total_acceleration_g: f32,
}
