//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements both [`StoragePort`] (the LED state keys) and [`ConfigPort`]
//! (a postcard-encoded [`SystemConfig`] blob).
//!
//! - **`target_os = "espidf"`**: raw `nvs_*` calls against the default NVS
//!   partition. A group write sets every key through one handle and ends
//!   with a single `nvs_commit`.
//! - **`not(target_os = "espidf")`**: an in-memory map, for host tests and
//!   simulation.
//!
//! If the partition cannot be initialised at boot, [`NvsAdapter::unavailable`]
//! gives an adapter whose reads and writes fail with
//! [`StorageError::Unavailable`]; the state machine then runs on defaults.

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::SystemConfig;
use crate::persist::NAMESPACE;
use log::info;

#[cfg(target_os = "espidf")]
use log::warn;

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const CONFIG_KEY: &str = "syscfg";

/// NVS keys and namespaces are limited to 15 bytes plus the terminator.
#[cfg(target_os = "espidf")]
const NVS_KEY_BUF: usize = 16;

#[cfg(target_os = "espidf")]
const MAX_BLOB_SIZE: usize = 256;

pub struct NvsAdapter {
    available: bool,
    #[cfg(not(target_os = "espidf"))]
    store: std::cell::RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsAdapter {
    /// Create a new NvsAdapter and initialise NVS flash.
    ///
    /// Returns `Err(StorageError)` if flash initialisation fails
    /// unrecoverably. On first boot or after a version mismatch the NVS
    /// partition is erased and re-initialised automatically.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES as esp_err_t
                || ret == ESP_ERR_NVS_NEW_VERSION_FOUND as esp_err_t
            {
                warn!("NVS: erasing and re-initialising flash partition");
                let ret2 = unsafe { nvs_flash_erase() };
                if ret2 != ESP_OK as esp_err_t {
                    return Err(StorageError::IoError(ret2));
                }
                let ret3 = unsafe { nvs_flash_init() };
                if ret3 != ESP_OK as esp_err_t {
                    return Err(StorageError::IoError(ret3));
                }
            } else if ret != ESP_OK as esp_err_t {
                return Err(StorageError::IoError(ret));
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            available: true,
            #[cfg(not(target_os = "espidf"))]
            store: std::cell::RefCell::new(HashMap::new()),
        })
    }

    /// An adapter for a partition that failed to initialise. Every
    /// operation reports [`StorageError::Unavailable`].
    pub fn unavailable() -> Self {
        Self {
            available: false,
            #[cfg(not(target_os = "espidf"))]
            store: std::cell::RefCell::new(HashMap::new()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// NUL-terminated copy of a key or namespace, truncated to 15 bytes.
    #[cfg(target_os = "espidf")]
    fn c_name(name: &str) -> [u8; NVS_KEY_BUF] {
        let mut buf = [0u8; NVS_KEY_BUF];
        let bytes = name.as_bytes();
        let len = bytes.len().min(NVS_KEY_BUF - 1);
        buf[..len].copy_from_slice(&bytes[..len]);
        buf
    }

    /// Open an NVS namespace, execute a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(namespace: &str, write: bool, f: F) -> Result<T, esp_err_t>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, esp_err_t>,
    {
        let ns_buf = Self::c_name(namespace);

        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        // SAFETY: `ns_buf` is NUL-terminated and outlives the call.
        let ret = unsafe { nvs_open(ns_buf.as_ptr().cast(), mode, &mut handle) };
        if ret != ESP_OK as esp_err_t {
            return Err(ret);
        }

        let result = f(handle);
        // SAFETY: `handle` was opened above and is not used afterwards.
        unsafe {
            nvs_close(handle);
        }
        result
    }
}

impl StoragePort for NvsAdapter {
    fn read_i8(&self, namespace: &str, key: &str) -> Result<Option<i8>, StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }

        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            Ok(self
                .store
                .borrow()
                .get(&composite)
                .and_then(|v| v.first().copied())
                .map(|b| b as i8))
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(namespace, false, |handle| {
                let key_buf = Self::c_name(key);
                let mut value: i8 = 0;
                // SAFETY: `key_buf` is NUL-terminated; `value` is a valid out-pointer.
                let ret = unsafe { nvs_get_i8(handle, key_buf.as_ptr().cast(), &mut value) };
                if ret == ESP_ERR_NVS_NOT_FOUND as esp_err_t {
                    return Ok(None);
                }
                if ret != ESP_OK as esp_err_t {
                    return Err(ret);
                }
                Ok(Some(value))
            });
            match result {
                Ok(v) => Ok(v),
                // A namespace that was never written cannot be opened read-only.
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND as esp_err_t => Ok(None),
                Err(e) => Err(StorageError::IoError(e)),
            }
        }
    }

    fn write_i8_all(&mut self, namespace: &str, entries: &[(&str, i8)]) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }

        #[cfg(not(target_os = "espidf"))]
        {
            let mut store = self.store.borrow_mut();
            for (key, value) in entries {
                store.insert(Self::composite_key(namespace, key), vec![*value as u8]);
            }
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(namespace, true, |handle| {
                for (key, value) in entries {
                    let key_buf = Self::c_name(key);
                    // SAFETY: `key_buf` is NUL-terminated and outlives the call.
                    let ret = unsafe { nvs_set_i8(handle, key_buf.as_ptr().cast(), *value) };
                    if ret != ESP_OK as esp_err_t {
                        return Err(ret);
                    }
                }
                // SAFETY: `handle` is open read-write.
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK as esp_err_t {
                    return Err(ret);
                }
                Ok(())
            });
            result.map_err(|e| {
                warn!("NvsAdapter: NVS write error {}", e);
                StorageError::IoError(e)
            })
        }
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        if !self.available {
            return Err(ConfigError::IoError);
        }

        #[cfg(not(target_os = "espidf"))]
        {
            let key = Self::composite_key(NAMESPACE, CONFIG_KEY);
            if let Some(bytes) = self.store.borrow().get(&key) {
                let cfg: SystemConfig =
                    postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
                cfg.validate()?;
                info!("NvsAdapter: loaded config from store");
                Ok(cfg)
            } else {
                info!("NvsAdapter: no stored config, using defaults");
                Ok(SystemConfig::default())
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(NAMESPACE, false, |handle| {
                let key_buf = Self::c_name(CONFIG_KEY);
                let mut size: usize = 0;

                // First call: get size
                // SAFETY: a null output pointer asks NVS for the blob length only.
                let ret = unsafe {
                    nvs_get_blob(handle, key_buf.as_ptr().cast(), core::ptr::null_mut(), &mut size)
                };
                if ret != ESP_OK as esp_err_t {
                    return Err(ret);
                }
                if size == 0 || size > MAX_BLOB_SIZE {
                    return Err(ESP_ERR_NVS_INVALID_LENGTH as esp_err_t);
                }

                let mut buf = vec![0u8; size];
                // SAFETY: `buf` holds exactly `size` bytes.
                let ret = unsafe {
                    nvs_get_blob(handle, key_buf.as_ptr().cast(), buf.as_mut_ptr().cast(), &mut size)
                };
                if ret != ESP_OK as esp_err_t {
                    return Err(ret);
                }
                Ok(buf)
            });

            match result {
                Ok(bytes) => {
                    let cfg: SystemConfig =
                        postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
                    cfg.validate()?;
                    info!("NvsAdapter: loaded config from NVS ({} bytes)", bytes.len());
                    Ok(cfg)
                }
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND as esp_err_t => {
                    info!("NvsAdapter: no stored config, using defaults");
                    Ok(SystemConfig::default())
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS read error {}", e);
                    Err(ConfigError::IoError)
                }
            }
        }
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if !self.available {
            return Err(ConfigError::IoError);
        }
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;

        #[cfg(not(target_os = "espidf"))]
        {
            let key = Self::composite_key(NAMESPACE, CONFIG_KEY);
            self.store.borrow_mut().insert(key, bytes);
            info!("NvsAdapter: config saved (simulation)");
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(NAMESPACE, true, |handle| {
                let key_buf = Self::c_name(CONFIG_KEY);
                // SAFETY: `bytes` outlives the call; NVS copies the blob.
                let ret = unsafe {
                    nvs_set_blob(handle, key_buf.as_ptr().cast(), bytes.as_ptr().cast(), bytes.len())
                };
                if ret != ESP_OK as esp_err_t {
                    return Err(ret);
                }
                // SAFETY: `handle` is open read-write.
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK as esp_err_t {
                    return Err(ret);
                }
                Ok(())
            });
            match result {
                Ok(()) => {
                    info!("NvsAdapter: config saved to NVS ({} bytes)", bytes.len());
                    Ok(())
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS write error {}", e);
                    Err(ConfigError::IoError)
                }
            }
        }
    }
}
