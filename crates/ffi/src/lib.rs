//! C API for the soil derivation and municipality lookups
//!
//! Every fallible function returns a [`SoilErrorCode`] and records a message
//! retrievable with [`soil_get_last_error`] on the calling thread.

mod error;
mod geography;
mod helpers;
mod parameters;

pub use error::{soil_get_last_error, soil_get_last_error_code, SoilErrorCode};
pub use geography::{soil_municipality_center, soil_municipality_count};
pub use parameters::{soil_derive_parameters, soil_ph_class, SoilParameters};

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use std::ptr;

    fn last_error() -> Option<String> {
        let msg = soil_get_last_error();
        if msg.is_null() {
            None
        } else {
            Some(unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned())
        }
    }

    #[test]
    fn test_derive_parameters() {
        let mut out = SoilParameters::default();
        let code = unsafe { soil_derive_parameters(28.5, &mut out) };
        assert_eq!(code, SoilErrorCode::Ok);
        assert_eq!(out.ph, 6.0);
        assert_eq!(out.point_scale, 4);
        assert!((out.raw_ph - 5.95).abs() < 1e-9);
        assert_eq!(soil_get_last_error_code(), SoilErrorCode::Ok);
        assert!(last_error().is_none());
    }

    #[test]
    fn test_derive_rejects_null_and_nan() {
        let code = unsafe { soil_derive_parameters(22.0, ptr::null_mut()) };
        assert_eq!(code, SoilErrorCode::NullPointer);
        assert_eq!(last_error().as_deref(), Some("Parameter 'out' cannot be null"));

        let mut out = SoilParameters::default();
        let code = unsafe { soil_derive_parameters(f64::NAN, &mut out) };
        assert_eq!(code, SoilErrorCode::InvalidParameter);
        assert_eq!(soil_get_last_error_code(), SoilErrorCode::InvalidParameter);
        assert_eq!(out, SoilParameters::default());
    }

    #[test]
    fn test_ph_class_codes() {
        assert_eq!(soil_ph_class(5.0), 0);
        assert_eq!(soil_ph_class(7.0), 3);
        assert_eq!(soil_ph_class(8.0), 4);
        assert_eq!(soil_ph_class(15.0), -1);
        assert!(last_error().is_some());
    }

    #[test]
    fn test_municipality_center() {
        let (mut lng, mut lat) = (0.0, 0.0);
        let code = unsafe { soil_municipality_center(1, &mut lng, &mut lat) };
        assert_eq!(code, SoilErrorCode::Ok);
        assert_eq!((lng, lat), (120.74, 17.55));

        let code = unsafe { soil_municipality_center(9, &mut lng, &mut lat) };
        assert_eq!(code, SoilErrorCode::InvalidParameter);
        let code = unsafe { soil_municipality_center(0, ptr::null_mut(), &mut lat) };
        assert_eq!(code, SoilErrorCode::NullPointer);
        assert_eq!(soil_municipality_count(), 3);
    }
}
