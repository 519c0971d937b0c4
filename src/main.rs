// ImpactWatch — Firmware Entry Point
//
// Boot sequence:
//   1. Bring up the I2C bus, TCA9548A mux, and all three MPU6050 sensors,
//      retrying forever with a 5-second delay (no operator present).
//   2. Start the wireless access point (fixed SSID/password/channel).
//   3. Bind the HTTP listener on port 80.
//   4. Enter the single-client accept loop: static page, one-shot JSON
//      poll, or SSE stream per connection.
//
// Access-point or socket failure is unrecoverable here — the device
// restarts and tries again from scratch.

mod config;
mod drivers;
mod init;
mod readings;
mod sensors;
mod server;
mod threshold;
mod wifi;

use std::net::TcpListener;
use std::sync::Mutex;
use std::time::Duration;

use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::prelude::*;

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use crate::config::*;
use crate::sensors::SensorArray;

fn main() -> anyhow::Result<()> {
    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("ImpactWatch firmware starting…");

    // ---- Peripherals ------------------------------------------------------
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // ---- I2C bus (shared by the mux and all sensors) ----------------------
    log::info!("Initializing I2C...");
    let i2c_config = I2cConfig::new().baudrate(400u32.kHz().into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio6, // SDA
        peripherals.pins.gpio7, // SCL
        &i2c_config,
    )?;
    // The bus lives for the entire programme duration (firmware never exits).
    let i2c_bus: &'static Mutex<I2cDriver<'static>> = Box::leak(Box::new(Mutex::new(i2c)));

    // ---- Sensor bring-up: retry forever -----------------------------------
    let mut sensors = init::supervise(
        "sensor initialization",
        Duration::from_millis(INIT_RETRY_DELAY_MS),
        || SensorArray::bring_up(i2c_bus),
    );

    // ---- Access point -----------------------------------------------------
    log::info!("Setting up access point...");
    let (_wifi, ap_ip) = match wifi::start_access_point(peripherals.modem, sysloop, nvs) {
        Ok(ap) => ap,
        Err(e) => {
            log::error!("Failed to start access point: {:#}", e);
            esp_idf_hal::reset::restart();
        }
    };

    // ---- Listening socket -------------------------------------------------
    log::info!("Binding to {} on port {}...", ap_ip, HTTP_PORT);
    let listener = match TcpListener::bind((ap_ip, HTTP_PORT)) {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Failed to bind socket: {}", e);
            esp_idf_hal::reset::restart();
        }
    };
    server::set_accept_timeout(&listener, Duration::from_secs(ACCEPT_TIMEOUT_S));
    log::info!("Listening for connections on {}", ap_ip);

    // ---- Serve clients, one at a time, forever ----------------------------
    server::run(listener, &mut sensors)
}
