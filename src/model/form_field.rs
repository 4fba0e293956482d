use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::repository::record_store::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Email,
    Phone,
    Number,
    Date,
    Select,
    Checkbox,
    Radio,
}

impl FieldType {
    /// Types whose answers must come from the field's option list.
    pub fn uses_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Checkbox | FieldType::Radio)
    }
}

/// Admin-defined question shown on the lead intake form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub label: String,
    #[serde(default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl FormField {
    /// Checks one submitted answer against this field.
    ///
    /// Checkbox answers are comma separated; every part must be an option.
    pub fn check_answer(&self, answer: Option<&str>) -> Result<(), String> {
        let answer = answer.map(str::trim).filter(|a| !a.is_empty());
        let Some(answer) = answer else {
            if self.required {
                return Err(format!("{} is required", self.label));
            }
            return Ok(());
        };

        match self.field_type {
            FieldType::Select | FieldType::Radio => {
                if !self.options.iter().any(|o| o == answer) {
                    return Err(format!("{} must be one of: {}", self.label, self.options.join(", ")));
                }
            }
            FieldType::Checkbox => {
                for part in answer.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                    if !self.options.iter().any(|o| o == part) {
                        return Err(format!("{}: '{}' is not an option", self.label, part));
                    }
                }
            }
            FieldType::Number => {
                if answer.parse::<f64>().is_err() {
                    return Err(format!("{} must be a number", self.label));
                }
            }
            FieldType::Date => {
                if chrono::NaiveDate::parse_from_str(answer, "%Y-%m-%d").is_err() {
                    return Err(format!("{} must be a date (YYYY-MM-DD)", self.label));
                }
            }
            FieldType::Email => {
                if !answer.validate_email() {
                    return Err(format!("{} must be an email address", self.label));
                }
            }
            FieldType::Text | FieldType::Textarea | FieldType::Phone => {}
        }
        Ok(())
    }
}

impl Record for FormField {
    const COLLECTION: &'static str = "form_fields";
    const LABEL: &'static str = "form field";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(field_type: FieldType, required: bool, options: &[&str]) -> FormField {
        FormField {
            id: None,
            label: "Venue".to_string(),
            field_type,
            required,
            options: options.iter().map(|o| o.to_string()).collect(),
            sort_order: 0,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_required_field_needs_answer() {
        let f = field(FieldType::Text, true, &[]);
        assert!(f.check_answer(None).is_err());
        assert!(f.check_answer(Some("   ")).is_err());
        assert!(f.check_answer(Some("Beach")).is_ok());
    }

    #[test]
    fn test_optional_field_accepts_missing_answer() {
        let f = field(FieldType::Number, false, &[]);
        assert!(f.check_answer(None).is_ok());
        assert!(f.check_answer(Some("12")).is_ok());
        assert!(f.check_answer(Some("twelve")).is_err());
    }

    #[test]
    fn test_select_answer_must_be_an_option() {
        let f = field(FieldType::Select, true, &["Beach", "Garden"]);
        assert!(f.check_answer(Some("Garden")).is_ok());
        assert!(f.check_answer(Some("Rooftop")).is_err());
    }

    #[test]
    fn test_checkbox_accepts_several_options() {
        let f = field(FieldType::Checkbox, false, &["Photo", "Video", "Music"]);
        assert!(f.check_answer(Some("Photo, Music")).is_ok());
        assert!(f.check_answer(Some("Photo, Drone")).is_err());
    }

    #[test]
    fn test_date_answer_format() {
        let f = field(FieldType::Date, false, &[]);
        assert!(f.check_answer(Some("2024-08-15")).is_ok());
        assert!(f.check_answer(Some("15/08/2024")).is_err());
    }

    #[test]
    fn test_email_answer_uses_address_rules() {
        let f = field(FieldType::Email, false, &[]);
        assert!(f.check_answer(Some("ana@example.com")).is_ok());
        assert!(f.check_answer(Some("a@")).is_err());
        assert!(f.check_answer(Some("@example.com")).is_err());
        assert!(f.check_answer(Some("not an email")).is_err());
    }
}
