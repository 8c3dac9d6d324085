//! CSV export of a waitlist's signups.

use crate::types::Timestamp;

pub const CSV_HEADER: &str = "Name,Email,Referral Count,Referred By,Date Joined,Referral ID";

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// One exported signup, already joined with its referral data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub name: Option<String>,
    pub email: String,
    pub referral_count: i64,
    /// Display name of the referrer; `None` when not referred or dangling.
    pub referred_by: Option<String>,
    pub created_at: Timestamp,
    pub referral_id: String,
}

/// Wrap a text field in double quotes, doubling embedded quotes.
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

impl ExportRow {
    fn to_line(&self) -> String {
        [
            quote_field(self.name.as_deref().unwrap_or("")),
            quote_field(&self.email),
            self.referral_count.to_string(),
            quote_field(self.referred_by.as_deref().unwrap_or("")),
            self.created_at.format("%Y-%m-%d").to_string(),
            quote_field(&self.referral_id),
        ]
        .join(",")
    }
}

/// Header line followed by one line per row, in the order given.
pub fn render_csv(rows: &[ExportRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADER.to_string());
    lines.extend(rows.iter().map(ExportRow::to_line));
    lines.join("\n")
}

pub fn export_filename(slug: &str) -> String {
    format!("{slug}-signups.csv")
}
