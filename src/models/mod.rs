//! Data models for Market Scan

pub mod attendance_window;
pub mod daily_report;
pub mod exception_number;
pub mod operator;
pub mod scan;
pub mod unknown_scan;

// Re-export commonly used types
pub use attendance_window::AttendanceWindow;
pub use daily_report::DailyReport;
pub use exception_number::ExceptionNumber;
pub use operator::OperatorClaims;
pub use scan::ScanRecord;
pub use unknown_scan::UnknownScan;
