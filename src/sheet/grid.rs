use chrono::{Days, NaiveDate};

use crate::error::Error;
use crate::model::{DATE_FORMAT, check_range, day_count};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Date,
    Morning,
    MorningObservation,
    Afternoon,
    AfternoonObservation,
    CandidateSignature,
    OrganizationSignature,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Date,
        Column::Morning,
        Column::MorningObservation,
        Column::Afternoon,
        Column::AfternoonObservation,
        Column::CandidateSignature,
        Column::OrganizationSignature,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Morning => "Matin",
            Column::MorningObservation | Column::AfternoonObservation => "Observation(s)",
            Column::Afternoon => "Après-midi",
            Column::CandidateSignature => "Signature",
            Column::OrganizationSignature => "Signature CFA",
        }
    }

    /// Column width in points.
    pub fn width(self) -> f32 {
        match self {
            Column::Date | Column::Morning | Column::Afternoon => 60.0,
            Column::MorningObservation | Column::AfternoonObservation => 80.0,
            Column::CandidateSignature | Column::OrganizationSignature => 70.0,
        }
    }
}

/// One calendar day of the sign-in grid. Every cell but the date is left
/// blank: the sheet is filled in by hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridRow {
    pub date: NaiveDate,
    pub morning: String,
    pub morning_note: String,
    pub afternoon: String,
    pub afternoon_note: String,
    pub candidate_signature: String,
    pub organization_signature: String,
}

impl GridRow {
    fn blank(date: NaiveDate) -> Self {
        Self {
            date,
            morning: String::new(),
            morning_note: String::new(),
            afternoon: String::new(),
            afternoon_note: String::new(),
            candidate_signature: String::new(),
            organization_signature: String::new(),
        }
    }

    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::Date => self.date.format(DATE_FORMAT).to_string(),
            Column::Morning => self.morning.clone(),
            Column::MorningObservation => self.morning_note.clone(),
            Column::Afternoon => self.afternoon.clone(),
            Column::AfternoonObservation => self.afternoon_note.clone(),
            Column::CandidateSignature => self.candidate_signature.clone(),
            Column::OrganizationSignature => self.organization_signature.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    pub columns: Vec<Column>,
    pub rows: Vec<GridRow>,
}

impl Grid {
    pub fn header(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.label()).collect()
    }

    pub fn without_column(mut self, column: Column) -> Self {
        self.columns.retain(|&c| c != column);
        self
    }

    pub fn col_widths(&self) -> Vec<f32> {
        self.columns.iter().map(|c| c.width()).collect()
    }

    pub fn width(&self) -> f32 {
        self.col_widths().iter().sum()
    }
}

/// One row per day from `start` to `end` inclusive, ascending, under the
/// full seven-column header.
pub fn build_grid(start: NaiveDate, end: NaiveDate) -> Result<Grid, Error> {
    check_range(start, end)?;
    let rows = (0..day_count(start, end))
        .map(|offset| {
            start
                .checked_add_days(Days::new(offset as u64))
                .map(GridRow::blank)
                .ok_or(Error::InvalidRange { start, end })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Grid {
        columns: Column::ALL.to_vec(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn one_row_per_day_inclusive() {
        let grid = build_grid(date(2024, 1, 8), date(2024, 1, 12)).unwrap();
        let dates: Vec<String> = grid.rows.iter().map(|r| r.cell(Column::Date)).collect();
        assert_eq!(
            dates,
            ["08/01/2024", "09/01/2024", "10/01/2024", "11/01/2024", "12/01/2024"]
        );
    }

    #[test]
    fn single_day_gives_single_row() {
        let grid = build_grid(date(2024, 2, 29), date(2024, 2, 29)).unwrap();
        assert_eq!(grid.rows.len(), 1);
    }

    #[test]
    fn rows_cross_month_and_year_boundaries_without_gaps() {
        let start = date(2023, 12, 20);
        let grid = build_grid(start, date(2024, 1, 15)).unwrap();
        assert_eq!(grid.rows.len(), 27);
        for (i, row) in grid.rows.iter().enumerate() {
            assert_eq!((row.date - start).num_days(), i as i64);
        }
    }

    #[test]
    fn reversed_range_fails() {
        let err = build_grid(date(2024, 1, 12), date(2024, 1, 8)).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { .. }));
    }

    #[test]
    fn data_cells_are_blank() {
        let grid = build_grid(date(2024, 1, 8), date(2024, 1, 9)).unwrap();
        for row in &grid.rows {
            for &col in &grid.columns[1..] {
                assert!(row.cell(col).is_empty());
            }
        }
    }

    #[test]
    fn header_has_seven_columns_and_can_drop_candidate_signature() {
        let grid = build_grid(date(2024, 1, 8), date(2024, 1, 8)).unwrap();
        assert_eq!(
            grid.header(),
            [
                "Date",
                "Matin",
                "Observation(s)",
                "Après-midi",
                "Observation(s)",
                "Signature",
                "Signature CFA"
            ]
        );
        assert_eq!(grid.width(), 480.0);

        let grid = grid.without_column(Column::CandidateSignature);
        assert_eq!(grid.columns.len(), 6);
        assert_eq!(grid.header().last(), Some(&"Signature CFA"));
        assert_eq!(grid.width(), 410.0);
    }
}
