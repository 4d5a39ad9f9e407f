use crate::error::{DefaultSoilError, SoilErrorCode};
use crate::helpers::{handle_ffi_result, track_error};
use soil_health_core::Municipality;

#[no_mangle]
/// Number of municipalities; valid codes are `0..count`.
pub extern "C" fn soil_municipality_count() -> u8 {
    Municipality::ALL.len() as u8
}

#[no_mangle]
/// Location-picker centre of a municipality.
///
/// Codes: 0 Sallapadan, 1 Bucay, 2 Lagangilang.
///
/// Returns
/// - `SoilErrorCode::Ok` (0) on success with both outputs written
/// - `SoilErrorCode::NullPointer` if `out_lng` or `out_lat` is null
/// - `SoilErrorCode::InvalidParameter` for an unknown code
///
/// # Safety
///
/// - `out_lng` and `out_lat` must be null or valid pointers to `f64`.
pub unsafe extern "C" fn soil_municipality_center(
    code: u8,
    out_lng: *mut f64,
    out_lat: *mut f64,
) -> SoilErrorCode {
    if out_lng.is_null() {
        return track_error(&DefaultSoilError::null_pointer("out_lng"));
    }
    if out_lat.is_null() {
        return track_error(&DefaultSoilError::null_pointer("out_lat"));
    }

    handle_ffi_result(|| {
        let municipality = Municipality::from_u8(code).ok_or_else(|| {
            DefaultSoilError::invalid_parameter(format!("Unknown municipality code {code}"))
        })?;
        let center = municipality.center();
        unsafe {
            *out_lng = center.lng;
            *out_lat = center.lat;
        }
        Ok::<(), DefaultSoilError>(())
    })
}
