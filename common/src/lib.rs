use validator::{ValidationError, ValidationErrors};

/// Joins every field error message into a single `; `-separated string.
///
/// Fields are visited in name order so the output is stable across runs.
/// Errors raised without a message fall back to `"<field> is invalid"`.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(m) => m.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
        username: String,
        #[validate(email(message = "Invalid email format"))]
        email: String,
        #[validate(custom(function = "not_blank"))]
        description: String,
    }

    #[test]
    fn messages_are_joined_in_field_order() {
        let sample = Sample {
            username: "ab".into(),
            email: "nope".into(),
            description: "   ".into(),
        };
        let errors = sample.validate().unwrap_err();
        assert_eq!(
            format_validation_errors(&errors),
            "description is invalid; Invalid email format; Username must be at least 3 characters"
        );
    }

    #[test]
    fn valid_input_passes() {
        let sample = Sample {
            username: "student1".into(),
            email: "student1@example.com".into(),
            description: "Medical appointment".into(),
        };
        assert!(sample.validate().is_ok());
    }
}
