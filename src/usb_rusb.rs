// src/usb_rusb.rs
//
// rusb-backed implementation of the library's UsbTransport capability.
// Owns the device handle for the process lifetime; the interface is
// released again when the transport is dropped.

use anyhow::{anyhow, Context as _, Result};
use rusb::{Context, DeviceHandle, UsbContext as _};
use std::time::Duration;
use wh1080_lib::station::{TransportError, UsbTransport};

/// USB vendor ID of WH1080-family stations.
pub const VENDOR_ID: u16 = 0x1941;
/// USB product ID of WH1080-family stations.
pub const PRODUCT_ID: u16 = 0x8021;

const INTERFACE: u8 = 0;

pub struct RusbTransport {
    handle: DeviceHandle<Context>,
}

impl RusbTransport {
    /// Find the station by vendor/product ID and claim its interface.
    ///
    /// Fails if no matching device is plugged in. The kernel HID driver is
    /// detached first; leaving it attached makes every transfer fail with
    /// an I/O error.
    pub fn open() -> Result<Self> {
        let context = Context::new().context("initialize libusb context")?;

        let mut handle = context
            .open_device_with_vid_pid(VENDOR_ID, PRODUCT_ID)
            .ok_or_else(|| {
                anyhow!(
                    "weather station not found (vendor {VENDOR_ID:#06x}, product {PRODUCT_ID:#06x})"
                )
            })?;

        if handle.kernel_driver_active(INTERFACE).unwrap_or(false) {
            handle
                .detach_kernel_driver(INTERFACE)
                .context("detach kernel driver")?;
        }

        handle
            .claim_interface(INTERFACE)
            .context("claim interface 0")?;

        Ok(Self { handle })
    }
}

impl UsbTransport for RusbTransport {
    fn control_transfer(
        &mut self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, TransportError> {
        self.handle
            .write_control(request_type, request, value, index, data, timeout)
            .map_err(|e| TransportError(e.to_string()))
    }

    fn read(
        &mut self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportError> {
        self.handle
            .read_interrupt(endpoint, buf, timeout)
            .map_err(|e| TransportError(e.to_string()))
    }
}

impl Drop for RusbTransport {
    fn drop(&mut self) {
        let _ = self.handle.release_interface(INTERFACE);
    }
}
