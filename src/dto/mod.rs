pub mod catalog_dto;
pub mod employee_dto;
pub mod form_field_dto;
pub mod lead_dto;
pub mod note_dto;
pub mod quotation_dto;
pub mod storage_dto;

use crate::repository::record_store::ListQuery;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;

/// Newest-first page built from optional `page`/`limit` query values.
pub fn page_query(page: Option<u32>, limit: Option<u32>) -> ListQuery {
    ListQuery::page(page.unwrap_or(DEFAULT_PAGE), limit.unwrap_or(DEFAULT_LIMIT)).sorted_by("createdAt", true)
}

/// Empty or whitespace-only form values count as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let query = page_query(None, None);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 20);
        assert!(query.descending);
        assert_eq!(page_query(Some(3), Some(5)).skip(), 10);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some(" x ".to_string())), Some("x".to_string()));
        assert_eq!(non_blank(None), None);
    }
}
