//! Body validation on top of `validator`. Every DTO attaches an explicit
//! message to each rule; the first failing message becomes the 400 body.

use validator::Validate;

use crate::error::ApiError;

pub fn validate<T: Validate>(input: &T) -> Result<(), ApiError> {
    match input.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let message = errors
                .field_errors()
                .into_iter()
                .flat_map(|(_, errs)| errs.iter())
                .next()
                .and_then(|err| err.message.as_ref())
                .map(|msg| msg.to_string())
                .unwrap_or_else(|| "Invalid request body".to_string());
            Err(ApiError::bad_request(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(email(message = "Email must be a valid email"))]
        email: String,
    }

    #[test]
    fn first_failing_message_wins() {
        let input = Sample {
            name: String::new(),
            email: "not-an-email".into(),
        };
        let err = validate(&input).unwrap_err();
        let body = err.to_json();
        let message = body["message"].as_str().unwrap();
        assert!(message == "Name is required" || message == "Email must be a valid email");
    }

    #[test]
    fn valid_input_passes() {
        let input = Sample {
            name: "Abebe".into(),
            email: "abebe@example.com".into(),
        };
        assert!(validate(&input).is_ok());
    }
}
