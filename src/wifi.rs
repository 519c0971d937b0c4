// ImpactWatch — Wireless Access Point Bring-up
//
// The device hosts its own network; clients join it and talk to the HTTP
// server directly. SSID, password, and channel are build-time constants.
// Failure here is fatal — main resets the device.

use std::net::Ipv4Addr;

use anyhow::Context;
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{
    AccessPointConfiguration, AuthMethod, BlockingWifi, Configuration, EspWifi,
};

use crate::config::*;

/// Start the access point and return the driver (which must stay alive)
/// together with the AP interface address the server binds to.
pub fn start_access_point(
    modem: Modem,
    sysloop: EspSystemEventLoop,
    nvs: EspDefaultNvsPartition,
) -> anyhow::Result<(BlockingWifi<EspWifi<'static>>, Ipv4Addr)> {
    let mut wifi = BlockingWifi::wrap(
        EspWifi::new(modem, sysloop.clone(), Some(nvs))?,
        sysloop,
    )?;

    wifi.set_configuration(&Configuration::AccessPoint(AccessPointConfiguration {
        ssid: AP_SSID
            .try_into()
            .map_err(|_| anyhow::anyhow!("SSID longer than 32 bytes"))?,
        password: AP_PASSWORD
            .try_into()
            .map_err(|_| anyhow::anyhow!("password longer than 64 bytes"))?,
        channel: AP_CHANNEL,
        auth_method: AuthMethod::WPA2Personal,
        ..Default::default()
    }))?;

    wifi.start().context("starting access point")?;
    wifi.wait_netif_up().context("waiting for AP interface")?;

    let ip = wifi.wifi().ap_netif().get_ip_info()?.ip;
    log::info!("Access point '{}' started. IP address: {}", AP_SSID, ip);

    Ok((wifi, ip))
}
