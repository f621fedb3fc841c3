use thiserror::Error;

pub type AqResult<T> = Result<T, AqError>;

#[derive(Error, Debug)]
pub enum AqError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn what(err: &AqError) -> &'static str {
        match err {
            AqError::NonFinite { what, .. } | AqError::InvalidArg { what } => what,
        }
    }

    #[test]
    fn messages_name_the_setting() {
        let errors = [
            AqError::NonFinite {
                what: "minimum_pressure",
                value: f64::NAN,
            },
            AqError::InvalidArg {
                what: "nominal_pressure",
            },
        ];
        for err in &errors {
            assert!(err.to_string().contains(what(err)));
        }
        assert_eq!(errors[1].to_string(), "Invalid argument: nominal_pressure");
    }
}
