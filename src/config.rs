// ImpactWatch — Hardware & System Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V)

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_I2C_SDA: i32 = 6;     // D4 — I2C data line
pub const PIN_I2C_SCL: i32 = 7;     // D5 — I2C clock line

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_TCA9548A: u8 = 0x70;
pub const I2C_ADDR_MPU6050: u8 = 0x68;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Sensor Array
// ---------------------------------------------------------------------------
/// Multiplexer channels carrying one MPU6050 each, in sampling order.
pub const SENSOR_MUX_CHANNELS: [u8; 3] = [0, 1, 2];

pub const ACCEL_SCALE_2G: f32 = 16384.0;  // LSB/g at ±2 g (most sensitive)
pub const GRAVITY_MS2: f32 = 9.81;        // m/s² per g

/// Total L1 g-force above which a sensor reading becomes a threshold event.
pub const G_FORCE_THRESHOLD: f32 = 2.0;

// ---------------------------------------------------------------------------
// Wireless Access Point (fixed at build time)
// ---------------------------------------------------------------------------
pub const AP_SSID: &str = "ImpactWatch-AP";
pub const AP_PASSWORD: &str = "impact1234";
pub const AP_CHANNEL: u8 = 6;

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------
pub const HTTP_PORT: u16 = 80;
pub const RECV_BUFFER_SIZE: usize = 2048;  // request read buffer

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------
pub const INIT_RETRY_DELAY_MS: u64 = 5000;     // sensor bring-up retry
pub const ACCEPT_TIMEOUT_S: u64 = 100;         // accept-side socket timeout
pub const ACCEPT_PACING_MS: u64 = 1000;        // pause between served clients
pub const STREAM_INTERVAL_MS: u64 = 1000;      // SSE frame pacing (1 Hz)
pub const CLIENT_READ_TIMEOUT_MS: u64 = 5000;  // request-line read timeout
