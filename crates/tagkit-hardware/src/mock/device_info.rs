//! Fixed device inventory for tests and the demo binary.

use crate::{
    Result,
    device_info::{
        BatteryInfo, DeviceInfo, DeviceInfoProvider, MemoryInfo, NetworkInfo, StorageInfo,
    },
};

/// Device info provider answering with canned values.
///
/// Every field is public so tests can tweak a single answer.
#[derive(Debug, Clone, PartialEq)]
pub struct MockDeviceInfo {
    pub device: DeviceInfo,
    pub battery: BatteryInfo,
    pub memory: MemoryInfo,
    pub storage: StorageInfo,
    pub network: NetworkInfo,
    pub rooted: bool,
}

impl Default for MockDeviceInfo {
    fn default() -> Self {
        Self {
            device: DeviceInfo {
                device_name: "Mock Device".to_string(),
                model: "MK-1".to_string(),
                brand: "tagkit".to_string(),
                manufacturer: "tagkit".to_string(),
                android_version: "14".to_string(),
                api_level: 34,
                build_id: "UQ1A.240205.004".to_string(),
                hardware: "mock".to_string(),
                product: "mock_product".to_string(),
                device: "mock_device".to_string(),
                board: "mock_board".to_string(),
                boot_loader: "unknown".to_string(),
                fingerprint: "tagkit/mock/mock:14/UQ1A/1:user/release-keys".to_string(),
                host: "localhost".to_string(),
                id: "UQ1A.240205.004".to_string(),
                tags: "release-keys".to_string(),
                build_type: "user".to_string(),
                user: "builder".to_string(),
                display: "UQ1A.240205.004".to_string(),
                screen_density: 2.75,
                screen_width: 1080,
                screen_height: 2400,
            },
            battery: BatteryInfo {
                level: 80,
                is_charging: false,
                status: "Discharging".to_string(),
                health: "Good".to_string(),
                technology: "Li-ion".to_string(),
                temperature: 28.5,
                voltage: 4012,
            },
            memory: MemoryInfo::from_totals(8 << 30, 3 << 30, false),
            storage: StorageInfo::from_totals(128 << 30, 64 << 30),
            network: NetworkInfo {
                network_type: "WIFI".to_string(),
                is_connected: true,
                wifi_ssid: "MockNet".to_string(),
                wifi_bssid: "02:00:00:00:00:00".to_string(),
                wifi_signal_strength: -55,
                ip_address: "192.168.1.20".to_string(),
            },
            rooted: false,
        }
    }
}

impl DeviceInfoProvider for MockDeviceInfo {
    async fn device_info(&self) -> Result<DeviceInfo> {
        Ok(self.device.clone())
    }

    async fn battery_info(&self) -> Result<BatteryInfo> {
        Ok(self.battery.clone())
    }

    async fn memory_info(&self) -> Result<MemoryInfo> {
        Ok(self.memory.clone())
    }

    async fn storage_info(&self) -> Result<StorageInfo> {
        Ok(self.storage.clone())
    }

    async fn network_info(&self) -> Result<NetworkInfo> {
        Ok(self.network.clone())
    }

    async fn is_device_rooted(&self) -> Result<bool> {
        Ok(self.rooted)
    }
}
