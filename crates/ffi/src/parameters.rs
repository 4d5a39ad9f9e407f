use crate::error::{DefaultSoilError, SoilErrorCode};
use crate::helpers::{clear_last_error, handle_ffi_result, track_error};
use soil_health_core::{derive_soil_parameters, Celsius, DerivedParameters, Ph, PhClass};

/// Derived soil parameters for one temperature reading.
///
/// `ph` and `fertility` are rounded for display (one decimal and whole
/// percent); the `raw_` fields carry the unrounded values.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SoilParameters {
    /// pH rounded to one decimal
    pub ph: f64,
    /// Fertility rounded to a whole percentage
    pub fertility: f64,
    /// Unrounded pH
    pub raw_ph: f64,
    /// Unrounded fertility
    pub raw_fertility: f64,
    /// Point scale 1 (stressful) to 5 (ideal)
    pub point_scale: u8,
}

impl From<DerivedParameters> for SoilParameters {
    fn from(p: DerivedParameters) -> Self {
        Self {
            ph: p.ph(),
            fertility: p.fertility(),
            raw_ph: p.raw_ph,
            raw_fertility: p.raw_fertility,
            point_scale: p.point_scale.value(),
        }
    }
}

#[no_mangle]
/// Derive pH, fertility and point scale from a soil temperature in °C.
///
/// Returns
/// - `SoilErrorCode::Ok` (0) on success with `out` filled
/// - `SoilErrorCode::NullPointer` if `out` is null
/// - `SoilErrorCode::InvalidParameter` if `temperature` is NaN or infinite
///
/// `out` is left untouched on error.
///
/// # Safety
///
/// - `out` must be null or a valid pointer to a `SoilParameters` that this function will write to.
pub unsafe extern "C" fn soil_derive_parameters(
    temperature: f64,
    out: *mut SoilParameters,
) -> SoilErrorCode {
    if out.is_null() {
        return track_error(&DefaultSoilError::null_pointer("out"));
    }

    handle_ffi_result(|| {
        let temperature = Celsius::try_new(temperature)
            .map_err(|e| DefaultSoilError::invalid_parameter(e.to_string()))?;
        let params = SoilParameters::from(derive_soil_parameters(temperature));
        unsafe {
            *out = params;
        }
        Ok::<(), DefaultSoilError>(())
    })
}

#[no_mangle]
/// Marker colour class for a pH reading.
///
/// Returns 0 strongly acidic, 1 moderately acidic, 2 slightly acidic,
/// 3 optimal, 4 alkaline, or -1 if `ph` is outside [0, 14] (see
/// `soil_get_last_error`).
pub extern "C" fn soil_ph_class(ph: f64) -> i32 {
    match Ph::try_new(ph) {
        Ok(ph) => {
            clear_last_error();
            PhClass::classify(ph).as_i32()
        }
        Err(e) => {
            track_error(&DefaultSoilError::invalid_parameter(e.to_string()));
            -1
        }
    }
}
