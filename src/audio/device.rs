use cpal::traits::{DeviceTrait, HostTrait};

use crate::error::{Result, TimeShiftError};

/// Human-readable device name
pub fn describe(device: &cpal::Device) -> String {
    match device.description() {
        Ok(desc) => desc.name().to_string(),
        Err(_) => "Unknown".to_string(),
    }
}

/// First device whose name contains `name` (case insensitive)
pub fn find_device<I, E>(devices: std::result::Result<I, E>, name: &str) -> Result<cpal::Device>
where
    I: Iterator<Item = cpal::Device>,
    E: std::fmt::Display,
{
    let needle = name.to_lowercase();
    devices
        .map_err(|e| TimeShiftError::AudioDevice(format!("{}", e)))?
        .find(|device| describe(device).to_lowercase().contains(&needle))
        .ok_or_else(|| TimeShiftError::AudioDevice(format!("No device matching {:?}", name)))
}

/// Names of the host's input and output devices
pub fn list_devices() -> Result<(Vec<String>, Vec<String>)> {
    let host = cpal::default_host();
    let inputs = host
        .input_devices()
        .map_err(|e| TimeShiftError::AudioDevice(format!("{}", e)))?
        .map(|d| describe(&d))
        .collect();
    let outputs = host
        .output_devices()
        .map_err(|e| TimeShiftError::AudioDevice(format!("{}", e)))?
        .map(|d| describe(&d))
        .collect();
    Ok((inputs, outputs))
}
