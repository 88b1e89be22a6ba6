use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A user profile row. Field names on the wire stay camelCase for
/// compatibility with existing frontends.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub full_name: String,
    pub dob: Option<NaiveDate>,
    pub gender: String,
    pub mobile_number: String,
    pub city: String,
    pub highest_qualification: String,
    pub occupation: String,
    pub work_experience: String,
    pub interests: String,
    pub profile_picture: String,
    pub recommendations: Value,
}

impl ProfileRow {
    /// The recommendations column is JSONB and may hold anything an older
    /// writer left there; anything that is not an array reads as empty.
    pub fn normalized_recommendations(&self) -> Vec<Value> {
        match &self.recommendations {
            Value::Array(items) => items.clone(),
            _ => Vec::new(),
        }
    }
}

/// Incoming profile payload for create/update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub mobile_number: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub highest_qualification: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub work_experience: String,
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub profile_picture: String,
    #[serde(default)]
    pub recommendations: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row_with_recommendations(value: Value) -> ProfileRow {
        ProfileRow {
            user_id: Uuid::new_v4(),
            full_name: "Asha Verma".to_string(),
            dob: None,
            gender: String::new(),
            mobile_number: String::new(),
            city: String::new(),
            highest_qualification: String::new(),
            occupation: String::new(),
            work_experience: String::new(),
            interests: String::new(),
            profile_picture: String::new(),
            recommendations: value,
        }
    }

    #[test]
    fn test_recommendations_array_passes_through() {
        let row = row_with_recommendations(json!(["electrician", "plumber"]));
        assert_eq!(row.normalized_recommendations().len(), 2);
    }

    #[test]
    fn test_non_array_recommendations_read_as_empty() {
        for junk in [json!("oops"), json!(42), Value::Null] {
            assert!(row_with_recommendations(junk).normalized_recommendations().is_empty());
        }
    }
}
