use chrono::NaiveDate;
use regex::Regex;

/// Period and validity date derived from a source filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedPeriod {
    /// Ledger key, `YYYY-MM`.
    pub period: String,
    /// First day the snapshot speaks for. The day part of the filename when
    /// present, otherwise the first of the month.
    pub valid_from: NaiveDate,
}

/// Read the publication date out of a snapshot filename. The publisher is
/// not consistent: `DLP20240101.zip`, `lekarny_2024_03.csv` and
/// `distributori-2024-03-15.csv` all occur. The first digit group that
/// forms a real calendar date wins.
pub fn derive_period(name: &str) -> Option<DerivedPeriod> {
    // Unseparated day (20240101) or -/_ separated (2024-01[-01]).
    let re = Regex::new(r"(\d{4})[-_]?(\d{2})(?:[-_]?(\d{2}))?").unwrap();

    for caps in re.captures_iter(name) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps
            .get(3)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(1);
        if let Some(valid_from) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(DerivedPeriod {
                period: format!("{:04}-{:02}", year, month),
                valid_from,
            });
        }
    }
    None
}
