//! C-compatible API exposed to the host web server.
//!
//! The host calls `pricer_init` once at start-up, then `pricer_predict` /
//! `pricer_health` per request. Returned strings are owned by Rust and must
//! be released with `pricer_free_str`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::sync::OnceLock;

use crate::common::config::AppCfg;
use crate::common::error::PricerCode;
use crate::common::log;
use crate::inference::InferenceGateway;

use super::service::{PriceService, FALLBACK_JSON};

static SERVICE: OnceLock<PriceService> = OnceLock::new();

fn service() -> Option<&'static PriceService> {
    SERVICE.get()
}

/// ABI version to coordinate with the host.
#[no_mangle]
pub extern "C" fn pricer_api_version() -> u32 {
    1
}

/// Load configuration and artefacts. Only the first call has any effect.
/// Returns `Ok` when both capabilities are loaded, `NotReady` otherwise.
#[no_mangle]
pub extern "C" fn pricer_init() -> u32 {
    let service = SERVICE.get_or_init(|| {
        let cfg = AppCfg::load();
        log::init(&cfg);
        PriceService::from_config(&cfg)
    });

    if service.gateway().is_ready() {
        PricerCode::Ok as u32
    } else {
        PricerCode::NotReady as u32
    }
}

/// Predict a price for a JSON property record. Returns a JSON payload.
#[no_mangle]
pub extern "C" fn pricer_predict(input: *const c_char) -> *const c_char {
    let service = match service() {
        Some(service) => service,
        None => return string_to_raw(not_loaded_json()),
    };

    if input.is_null() {
        // No body at all is a malformed record, same as a JSON `null`.
        return string_to_raw(service.predict_json("null").to_json());
    }
    let input = unsafe { CStr::from_ptr(input) };

    string_to_raw(service.predict_bytes(input.to_bytes()).to_json())
}

/// Readiness report as JSON.
#[no_mangle]
pub extern "C" fn pricer_health() -> *const c_char {
    let report = match service() {
        Some(service) => service.health(),
        None => PriceService::new(InferenceGateway::unloaded()).health(),
    };
    string_to_raw(serde_json::to_string(&report).unwrap_or_else(|_| FALLBACK_JSON.to_string()))
}

/// Free strings allocated by Rust.
#[no_mangle]
pub extern "C" fn pricer_free_str(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    unsafe {
        let _ = CString::from_raw(ptr as *mut c_char);
    }
}

fn not_loaded_json() -> String {
    PriceService::new(InferenceGateway::unloaded())
        .predict_json("{}")
        .to_json()
}

fn string_to_raw(s: String) -> *const c_char {
    match CString::new(s) {
        Ok(cstring) => cstring.into_raw(),
        Err(_) => fallback_json_raw(),
    }
}

fn fallback_json_raw() -> *const c_char {
    match CString::new(FALLBACK_JSON) {
        Ok(cstring) => cstring.into_raw(),
        Err(_) => std::ptr::null(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn take_json(ptr: *const c_char) -> Value {
        assert!(!ptr.is_null());
        let text = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
        pricer_free_str(ptr);
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn predict_without_artefacts_reports_not_loaded() {
        // No artefacts exist at the default paths inside the test working directory.
        assert_eq!(pricer_init(), PricerCode::NotReady as u32);

        let body = CString::new(r#"{"bhk": 2}"#).unwrap();
        let payload = take_json(pricer_predict(body.as_ptr()));
        assert_eq!(payload["success"], Value::Bool(false));
        assert_eq!(payload["error"], "Model not loaded properly");

        let health = take_json(pricer_health());
        assert_eq!(health["model_loaded"], Value::Bool(false));
        assert_eq!(health["scaler_loaded"], Value::Bool(false));
    }

    #[test]
    fn strings_round_trip_and_free() {
        let ptr = string_to_raw("{\"ok\":true}".to_string());
        assert_eq!(take_json(ptr)["ok"], Value::Bool(true));
        pricer_free_str(std::ptr::null());
    }

    #[test]
    fn interior_nul_falls_back_to_error_payload() {
        let payload = take_json(string_to_raw("bad\0json".to_string()));
        assert_eq!(payload["success"], Value::Bool(false));
    }
}
