use serde::Serialize;

use crate::profile::models::ProfileInput;

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn message(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validates a profile payload before it touches the database.
///
/// Rules:
/// - fullName is required and at most 100 characters
/// - mobileNumber, when present, must be exactly 10 digits
/// - dob parses via serde (NaiveDate), so only its range is checked here
pub fn validate_profile(input: &ProfileInput) -> ValidationReport {
    let mut errors = Vec::new();

    let full_name = input.full_name.trim();
    if full_name.is_empty() {
        errors.push(FieldError {
            field: "fullName".to_string(),
            message: "is required".to_string(),
        });
    } else if full_name.chars().count() > 100 {
        errors.push(FieldError {
            field: "fullName".to_string(),
            message: "must be at most 100 characters".to_string(),
        });
    }

    let mobile = input.mobile_number.trim();
    if !mobile.is_empty() && (mobile.len() != 10 || !mobile.chars().all(|c| c.is_ascii_digit())) {
        errors.push(FieldError {
            field: "mobileNumber".to_string(),
            message: "must be exactly 10 digits".to_string(),
        });
    }

    if let Some(dob) = input.dob {
        let today = chrono::Utc::now().date_naive();
        if dob >= today {
            errors.push(FieldError {
                field: "dob".to_string(),
                message: "must be in the past".to_string(),
            });
        }
    }

    ValidationReport {
        passed: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> ProfileInput {
        ProfileInput {
            full_name: "Asha Verma".to_string(),
            mobile_number: "9876543210".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_profile_passes() {
        assert!(validate_profile(&valid_input()).passed);
    }

    #[test]
    fn test_missing_full_name_fails() {
        let input = ProfileInput {
            full_name: "   ".to_string(),
            ..valid_input()
        };
        let report = validate_profile(&input);
        assert!(!report.passed);
        assert!(report.message().contains("fullName"));
    }

    #[test]
    fn test_bad_mobile_number_fails() {
        for bad in ["12345", "98765432101", "98765abcde"] {
            let input = ProfileInput {
                mobile_number: bad.to_string(),
                ..valid_input()
            };
            assert!(!validate_profile(&input).passed, "accepted {bad}");
        }
    }

    #[test]
    fn test_empty_mobile_number_is_allowed() {
        let input = ProfileInput {
            mobile_number: String::new(),
            ..valid_input()
        };
        assert!(validate_profile(&input).passed);
    }

    #[test]
    fn test_future_dob_fails() {
        let input = ProfileInput {
            dob: Some(chrono::Utc::now().date_naive() + chrono::Duration::days(30)),
            ..valid_input()
        };
        assert!(!validate_profile(&input).passed);
    }
}
