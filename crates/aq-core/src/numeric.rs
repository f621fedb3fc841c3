use crate::AqError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, AqError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(AqError::NonFinite { what, value: v })
    }
}

pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, AqError> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(AqError::InvalidArg { what });
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_non_negative_rejects_negative() {
        assert!(ensure_non_negative(0.0, "p").is_ok());
        assert!(ensure_non_negative(17.75, "p").is_ok());
        assert!(matches!(
            ensure_non_negative(-1.0, "p"),
            Err(AqError::InvalidArg { what: "p" })
        ));
        assert!(matches!(
            ensure_non_negative(Real::INFINITY, "p"),
            Err(AqError::NonFinite { .. })
        ));
    }
}
