//! Print-friendly quotation page, meant for the browser's print-to-PDF.

use askama::Template;

use crate::dto::quotation_dto::QuotationPrint;

pub const NO_LEAD: &str = "No lead assigned";

pub struct PrintRow {
    pub index: usize,
    pub particulars: String,
    pub remarks: String,
    pub amount: String,
    pub quantity: i64,
    pub total: String,
}

pub struct PrintCategory {
    pub name: String,
    pub rows: Vec<PrintRow>,
    pub total: String,
}

#[derive(Template)]
#[template(path = "quotation_print.html")]
pub struct QuotationPrintTemplate {
    pub company_name: String,
    pub company_lines: Vec<String>,
    pub title: String,
    pub quotation_date: String,
    pub status: String,
    pub lead_name: String,
    pub lead_lines: Vec<String>,
    pub categories: Vec<PrintCategory>,
    pub sub_total: String,
    pub agency_fee_percent: String,
    pub agency_fees: String,
    pub grand_total: String,
    pub notes: String,
}

/// `1234567.5` -> `1,234,567.50`.
pub fn format_money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, cents)
}

fn format_percent(value: f64) -> String {
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

impl QuotationPrintTemplate {
    pub fn new(print: &QuotationPrint) -> Self {
        let quotation = &print.quotation;
        let company = &print.company;

        let categories = quotation
            .categories
            .iter()
            .map(|category| PrintCategory {
                name: category.category_name.clone(),
                rows: category
                    .items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| PrintRow {
                        index: i + 1,
                        particulars: item.particulars.clone(),
                        remarks: item.remarks.clone().unwrap_or_default(),
                        amount: format_money(item.amount),
                        quantity: item.quantity,
                        total: format_money(item.line_total()),
                    })
                    .collect(),
                total: format_money(category.items.iter().map(|item| item.line_total()).sum()),
            })
            .collect();

        let (lead_name, lead_lines) = match &print.lead {
            Some(lead) => (
                lead.full_name.clone(),
                [Some(lead.lead_id.clone()), Some(lead.email.clone()), lead.phone.clone()]
                    .into_iter()
                    .flatten()
                    .collect(),
            ),
            None => (NO_LEAD.to_string(), Vec::new()),
        };

        QuotationPrintTemplate {
            company_name: company.name.clone(),
            company_lines: [company.address.clone(), company.email.clone(), company.phone.clone()]
                .into_iter()
                .flatten()
                .collect(),
            title: quotation.title.clone(),
            quotation_date: quotation
                .quotation_date
                .map(|d| d.format("%B %-d, %Y").to_string())
                .unwrap_or_default(),
            status: quotation.status.to_string(),
            lead_name,
            lead_lines,
            categories,
            sub_total: format_money(quotation.sub_total),
            agency_fee_percent: format_percent(quotation.agency_fee_percent),
            agency_fees: format_money(quotation.agency_fees),
            grand_total: format_money(quotation.grand_total),
            notes: quotation.notes.clone().unwrap_or_default(),
        }
    }
}

pub fn render_quotation(print: &QuotationPrint) -> Result<String, askama::Error> {
    QuotationPrintTemplate::new(print).render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "0.00");
        assert_eq!(format_money(240.0), "240.00");
        assert_eq!(format_money(2240.0), "2,240.00");
        assert_eq!(format_money(1234567.5), "1,234,567.50");
        assert_eq!(format_money(-1500.25), "-1,500.25");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(12.0), "12");
        assert_eq!(format_percent(7.5), "7.5");
        assert_eq!(format_percent(0.0), "0");
    }
}
