use chrono::{Datelike, NaiveDate};

use super::error::FaturaError;
use super::types::Direction;

/// Gapless invoice numbers, one sequence per direction.
///
/// Supplier invoices are numbered `FF-{year}-{n}`, client invoices
/// `FC-{year}-{n}`. Both counters restart at 1 when the year changes.
#[derive(Debug, Clone)]
pub struct FaturaNumbering {
    year: i32,
    next_supplier: u64,
    next_client: u64,
    zero_pad: usize,
}

impl FaturaNumbering {
    /// Both sequences start at 1.
    pub fn new(year: i32) -> Self {
        Self::resume(year, 1, 1)
    }

    /// Continue from the last numbers issued by the invoice store.
    pub fn resume(year: i32, next_supplier: u64, next_client: u64) -> Self {
        Self {
            year,
            next_supplier,
            next_client,
            zero_pad: 4,
        }
    }

    /// Set zero-padding width (default: 4, so "0001").
    pub fn with_padding(mut self, width: usize) -> Self {
        self.zero_pad = width;
        self
    }

    pub fn prefix(direction: Direction) -> &'static str {
        match direction {
            Direction::Supplier => "FF-",
            Direction::Client => "FC-",
        }
    }

    /// Issue the next number for `direction` on `issue_date`.
    ///
    /// A date in a later year resets both counters; a date in an earlier
    /// year is rejected, since issuing it would break the sequence.
    pub fn issue(&mut self, direction: Direction, issue_date: NaiveDate) -> Result<String, FaturaError> {
        let year = issue_date.year();
        if year < self.year {
            return Err(FaturaError::Numbering(format!(
                "issue date {issue_date} is before the current sequence year {}",
                self.year
            )));
        }
        if year > self.year {
            self.year = year;
            self.next_supplier = 1;
            self.next_client = 1;
        }

        let counter = match direction {
            Direction::Supplier => &mut self.next_supplier,
            Direction::Client => &mut self.next_client,
        };
        let n = *counter;
        *counter += 1;
        Ok(self.format(direction, n))
    }

    /// Preview the next number for `direction` without consuming it.
    pub fn peek(&self, direction: Direction) -> String {
        let n = match direction {
            Direction::Supplier => self.next_supplier,
            Direction::Client => self.next_client,
        };
        self.format(direction, n)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    fn format(&self, direction: Direction, n: u64) -> String {
        format!(
            "{}{}-{:0>width$}",
            Self::prefix(direction),
            self.year,
            n,
            width = self.zero_pad
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn directions_have_independent_sequences() {
        let mut seq = FaturaNumbering::new(2024);
        let d = date(2024, 3, 1);
        assert_eq!(seq.issue(Direction::Supplier, d).unwrap(), "FF-2024-0001");
        assert_eq!(seq.issue(Direction::Supplier, d).unwrap(), "FF-2024-0002");
        assert_eq!(seq.issue(Direction::Client, d).unwrap(), "FC-2024-0001");
    }

    #[test]
    fn peek_does_not_consume() {
        let mut seq = FaturaNumbering::new(2024);
        assert_eq!(seq.peek(Direction::Client), "FC-2024-0001");
        assert_eq!(seq.peek(Direction::Client), "FC-2024-0001");
        seq.issue(Direction::Client, date(2024, 1, 2)).unwrap();
        assert_eq!(seq.peek(Direction::Client), "FC-2024-0002");
    }

    #[test]
    fn new_year_resets_both() {
        let mut seq = FaturaNumbering::resume(2024, 57, 12).with_padding(3);
        assert_eq!(seq.issue(Direction::Supplier, date(2024, 12, 30)).unwrap(), "FF-2024-057");
        assert_eq!(seq.issue(Direction::Client, date(2025, 1, 2)).unwrap(), "FC-2025-001");
        assert_eq!(seq.peek(Direction::Supplier), "FF-2025-001");
        assert_eq!(seq.year(), 2025);
    }

    #[test]
    fn rejects_past_year() {
        let mut seq = FaturaNumbering::new(2025);
        assert!(seq.issue(Direction::Supplier, date(2024, 12, 31)).is_err());
        assert_eq!(seq.peek(Direction::Supplier), "FF-2025-0001");
    }
}
