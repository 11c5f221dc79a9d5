//! Spreadsheet export (xlsx)

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use serde_json::{Map, Value};

use crate::{
    engine::summary::{DailySheet, MonthlySummary},
    error::{AppError, AppResult},
};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

impl From<XlsxError> for AppError {
    fn from(err: XlsxError) -> Self {
        AppError::Internal(format!("Spreadsheet error: {}", err))
    }
}

fn write_header(worksheet: &mut Worksheet, columns: &[&str]) -> Result<(), XlsxError> {
    let bold = Format::new().set_bold();
    for (col, title) in (0u16..).zip(columns) {
        worksheet.write_string_with_format(0, col, *title, &bold)?;
    }
    Ok(())
}

/// Paid cars of a day, then a blank row and the totals
pub fn daily_sheet(sheet: &DailySheet) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet.date.format("%Y-%m-%d").to_string())?;
    write_header(
        worksheet,
        &["car_number", "attend_count", "first_time", "last_time"],
    )?;

    let mut row = 1u32;
    for entry in &sheet.rows {
        worksheet.write_string(row, 0, &entry.car_number)?;
        worksheet.write_number(row, 1, f64::from(entry.attend_count))?;
        worksheet.write_string(row, 2, entry.first_time.format("%H:%M:%S").to_string())?;
        worksheet.write_string(row, 3, entry.last_time.format("%H:%M:%S").to_string())?;
        row += 1;
    }

    // blank row before the totals
    row += 1;
    let bold = Format::new().set_bold();
    worksheet.write_string_with_format(row, 0, format!("{} cars", sheet.total_cars), &bold)?;
    worksheet.write_string_with_format(row, 1, format!("total {}", sheet.total_attendance), &bold)?;

    Ok(workbook.save_to_buffer()?)
}

/// One row per stored report, then a blank row and the `Total` row
pub fn monthly_summary(summary: &MonthlySummary) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    write_header(
        worksheet,
        &[
            "date",
            "daily_count",
            "average_come",
            "paid_car",
            "non_paid_car",
            "general_count",
        ],
    )?;

    let mut row = 1u32;
    for entry in &summary.rows {
        worksheet.write_string(row, 0, entry.date.format("%Y-%m-%d").to_string())?;
        worksheet.write_number(row, 1, f64::from(entry.daily_count))?;
        worksheet.write_number(row, 2, round2(entry.average_come))?;
        worksheet.write_number(row, 3, f64::from(entry.paid_car))?;
        worksheet.write_number(row, 4, f64::from(entry.non_paid_car))?;
        worksheet.write_number(row, 5, f64::from(entry.general_count))?;
        row += 1;
    }

    row += 1;
    let total = &summary.total;
    let bold = Format::new().set_bold();
    worksheet.write_string_with_format(row, 0, "Total", &bold)?;
    worksheet.write_number_with_format(row, 1, f64::from(total.daily_count), &bold)?;
    worksheet.write_number_with_format(row, 2, round2(total.average_come), &bold)?;
    worksheet.write_number_with_format(row, 3, f64::from(total.paid_car), &bold)?;
    worksheet.write_number_with_format(row, 4, f64::from(total.non_paid_car), &bold)?;
    worksheet.write_number_with_format(row, 5, f64::from(total.general_count), &bold)?;

    Ok(workbook.save_to_buffer()?)
}

/// Arbitrary JSON objects; the first object's keys become the header row
pub fn json_rows(rows: &[Map<String, Value>]) -> AppResult<Vec<u8>> {
    let first = rows
        .first()
        .ok_or_else(|| AppError::Validation("Nothing to export".to_string()))?;
    let columns: Vec<&str> = first.keys().map(String::as_str).collect();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    write_header(worksheet, &columns)?;

    for (row, object) in (1u32..).zip(rows) {
        for (col, key) in (0u16..).zip(&columns) {
            match object.get(*key) {
                None | Some(Value::Null) => {}
                Some(Value::String(text)) => {
                    worksheet.write_string(row, col, text)?;
                }
                Some(Value::Number(number)) => match number.as_f64() {
                    Some(value) => {
                        worksheet.write_number(row, col, value)?;
                    }
                    None => {
                        worksheet.write_string(row, col, number.to_string())?;
                    }
                },
                Some(Value::Bool(flag)) => {
                    worksheet.write_boolean(row, col, *flag)?;
                }
                Some(other) => {
                    worksheet.write_string(row, col, other.to_string())?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::summary::{DailySheetRow, MonthlyRow, MonthlyTotal};
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::json;

    fn is_xlsx(bytes: &[u8]) -> bool {
        bytes.starts_with(b"PK")
    }

    #[test]
    fn test_daily_sheet_workbook() {
        let sheet = DailySheet {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            rows: vec![DailySheetRow {
                car_number: "01A001AA".to_string(),
                attend_count: 3,
                first_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                last_time: NaiveTime::from_hms_opt(17, 30, 0).unwrap(),
            }],
            total_cars: 1,
            total_attendance: 3,
        };
        assert!(is_xlsx(&daily_sheet(&sheet).unwrap()));
    }

    #[test]
    fn test_monthly_workbook() {
        let summary = MonthlySummary {
            rows: vec![MonthlyRow {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                daily_count: 7,
                average_come: 3.5,
                paid_car: 2,
                non_paid_car: 3,
                general_count: 7,
            }],
            total: MonthlyTotal::default(),
        };
        assert!(is_xlsx(&monthly_summary(&summary).unwrap()));
    }

    #[test]
    fn test_json_rows() {
        let rows: Vec<Map<String, Value>> = vec![
            json!({"car_number": "01A001AA", "visits": 3, "paid": true})
                .as_object()
                .cloned()
                .unwrap(),
            json!({"car_number": "01B002BB", "extra": [1, 2]})
                .as_object()
                .cloned()
                .unwrap(),
        ];
        assert!(is_xlsx(&json_rows(&rows).unwrap()));
        assert!(matches!(json_rows(&[]), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(3.333_333), 3.33);
        assert_eq!(round2(0.0), 0.0);
    }
}
