// ImpactWatch — Threshold Filter
//
// Pure per-cycle evaluation: convert each axis to g, sum absolute values
// (L1 norm — cheap on a small core, accurate enough for impact detection),
// and keep only the sensors above the g-force threshold.

use crate::config::{GRAVITY_MS2, G_FORCE_THRESHOLD};
use crate::readings::{AccelerationSample, GForceReading, ThresholdEvent};

/// Total L1 g-force of one sample. Each axis is converted to g first,
/// then the absolute components are summed.
pub fn g_force(sample: &AccelerationSample) -> GForceReading {
    let gx = sample.ax / GRAVITY_MS2;
    let gy = sample.ay / GRAVITY_MS2;
    let gz = sample.az / GRAVITY_MS2;
    GForceReading {
        sensor_index: sample.sensor_index,
        total_g: gx.abs() + gy.abs() + gz.abs(),
    }
}

/// Evaluate one cycle of samples. Every sensor's total is logged; an event
/// is emitted only when the total strictly exceeds [`G_FORCE_THRESHOLD`].
/// Returns an empty vec when no sensor exceeds — the caller uses that to
/// decide whether anything goes on the wire.
pub fn evaluate(samples: &[AccelerationSample]) -> Vec<ThresholdEvent> {
    let mut events = Vec::new();

    for sample in samples {
        let reading = g_force(sample);
        log::info!(
            "Sensor {}: total_accel_g = {:.3}",
            reading.sensor_index + 1,
            reading.total_g
        );

        if reading.total_g > G_FORCE_THRESHOLD {
            events.push(ThresholdEvent {
                sensor: reading.sensor_index + 1,
                total_acceleration_g: reading.total_g,
            });
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(index: usize, ax: f32, ay: f32, az: f32) -> AccelerationSample {
        AccelerationSample { sensor_index: index, ax, ay, az }
    }

    /// One sample worth exactly `total_g` (all on the x axis).
    fn sample_with_total_g(index: usize, total_g: f32) -> AccelerationSample {
        sample(index, total_g * GRAVITY_MS2, 0.0, 0.0)
    }

    #[test]
    fn total_is_l1_norm_of_per_axis_g() {
        let s = sample(0, 9.81, -19.62, 4.905);
        let reading = g_force(&s);
        // (|9.81| + |-19.62| + |4.905|) / 9.81 = 1 + 2 + 0.5
        assert!((reading.total_g - 3.5).abs() < 1e-6);
    }

    #[test]
    fn conversion_happens_per_axis_before_summing() {
        let s = sample(0, -9.81, 0.0, 0.0);
        assert!((g_force(&s).total_g - 1.0).abs() < 1e-6);
    }

    #[test]
    fn boundary_is_exclusive_at_threshold() {
        let at = evaluate(&[sample_with_total_g(0, 2.0)]);
        assert!(at.is_empty());

        let above = evaluate(&[sample_with_total_g(0, 2.0001)]);
        assert_eq!(above.len(), 1);
    }

    #[test]
    fn emits_only_exceeding_sensors_in_order() {
        let samples = [
            sample_with_total_g(0, 2.5),
            sample_with_total_g(1, 1.0),
            sample_with_total_g(2, 3.0),
        ];
        let events = evaluate(&samples);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].sensor, 1);
        assert!((events[0].total_acceleration_g - 2.5).abs() < 1e-4);
        assert_eq!(events[1].sensor, 3);
        assert!((events[1].total_acceleration_g - 3.0).abs() < 1e-4);
    }

    #[test]
    fn all_quiet_returns_empty() {
        let samples = [
            sample_with_total_g(0, 0.9),
            sample_with_total_g(1, 1.1),
            sample_with_total_g(2, 0.0),
        ];
        assert!(evaluate(&samples).is_empty());
    }

    #[test]
    fn negative_axes_count_toward_total() {
        let s = sample(0, -9.81, -9.81, -9.81);
        let events = evaluate(&[s]);
        assert_eq!(events.len(), 1);
        assert!((events[0].total_acceleration_g - 3.0).abs() < 1e-5);
    }
}
