use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::form_field::FieldType;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FormFieldRequest {
    #[validate(length(min = 1, max = 200, message = "Label is required"))]
    pub label: String,

    #[serde(default)]
    pub field_type: FieldType,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub options: Vec<String>,

    #[serde(default)]
    pub sort_order: Option<i32>,
}
