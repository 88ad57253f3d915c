//! Device inventory queries.
//!
//! A stateless pass-through: the platform answers, the toolkit forwards.
//! Field sets mirror what the client bridge already renders.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub device_name: String,
    pub model: String,
    pub brand: String,
    pub manufacturer: String,
    pub android_version: String,
    pub api_level: u32,
    pub build_id: String,
    pub hardware: String,
    pub product: String,
    pub device: String,
    pub board: String,
    pub boot_loader: String,
    pub fingerprint: String,
    pub host: String,
    pub id: String,
    pub tags: String,
    #[serde(rename = "type")]
    pub build_type: String,
    pub user: String,
    pub display: String,
    pub screen_density: f32,
    pub screen_width: u32,
    pub screen_height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryInfo {
    /// Charge level in percent.
    pub level: u8,
    pub is_charging: bool,
    pub status: String,
    pub health: String,
    pub technology: String,
    /// Degrees Celsius.
    pub temperature: f32,
    /// Millivolts.
    pub voltage: u32,
}

/// Memory figures, in bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    pub total_memory: u64,
    pub available_memory: u64,
    pub used_memory: u64,
    pub memory_usage_percentage: f64,
    pub is_low_memory: bool,
}

impl MemoryInfo {
    /// Derive used memory and percentage from the two platform figures.
    pub fn from_totals(total_memory: u64, available_memory: u64, is_low_memory: bool) -> Self {
        let used_memory = total_memory.saturating_sub(available_memory);
        Self {
            total_memory,
            available_memory,
            used_memory,
            memory_usage_percentage: percentage(used_memory, total_memory),
            is_low_memory,
        }
    }
}

/// Storage figures, in bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    pub total_storage: u64,
    pub available_storage: u64,
    pub used_storage: u64,
    pub storage_usage_percentage: f64,
}

impl StorageInfo {
    pub fn from_totals(total_storage: u64, available_storage: u64) -> Self {
        let used_storage = total_storage.saturating_sub(available_storage);
        Self {
            total_storage,
            available_storage,
            used_storage,
            storage_usage_percentage: percentage(used_storage, total_storage),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub network_type: String,
    pub is_connected: bool,
    #[serde(rename = "wifiSSID")]
    pub wifi_ssid: String,
    #[serde(rename = "wifiBSSID")]
    pub wifi_bssid: String,
    /// dBm.
    pub wifi_signal_strength: i32,
    pub ip_address: String,
}

fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Platform source of device inventory.
pub trait DeviceInfoProvider: Send + Sync + 'static {
    fn device_info(&self) -> impl Future<Output = Result<DeviceInfo>> + Send;
    fn battery_info(&self) -> impl Future<Output = Result<BatteryInfo>> + Send;
    fn memory_info(&self) -> impl Future<Output = Result<MemoryInfo>> + Send;
    fn storage_info(&self) -> impl Future<Output = Result<StorageInfo>> + Send;
    fn network_info(&self) -> impl Future<Output = Result<NetworkInfo>> + Send;
    fn is_device_rooted(&self) -> impl Future<Output = Result<bool>> + Send;
}
