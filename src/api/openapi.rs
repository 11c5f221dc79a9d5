//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    attendance_window, cars, daily_reports, exception_numbers, export, health, unknown_cars,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Market Scan API",
        version = "1.0.0",
        description = "Vehicle attendance tracking from license-plate scans",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Cars
        cars::create_scan,
        cars::day_attendance,
        cars::week_attendance,
        cars::month_attendance,
        cars::snapshot,
        cars::car_view,
        // Exception numbers
        exception_numbers::list_exception_numbers,
        exception_numbers::create_exception_number,
        exception_numbers::delete_exception_number,
        // Attendance window
        attendance_window::get_attendance_window,
        attendance_window::update_attendance_window,
        // Daily reports
        daily_reports::get_daily_reports,
        daily_reports::generate_daily_report,
        daily_reports::export_daily_reports,
        // Export
        export::export_rows,
        // Unknown cars
        unknown_cars::list_unknown_cars,
        unknown_cars::create_unknown_car,
        unknown_cars::purge_unknown_cars,
    ),
    components(
        schemas(
            // Scans
            crate::models::scan::ScanRecord,
            crate::models::scan::CreateScan,
            crate::models::scan::CreateUnknownScan,
            crate::api::ImageUpload,
            // Views
            crate::engine::AttendanceEnvelope,
            crate::engine::orchestrator::Attendance,
            crate::engine::orchestrator::Timing,
            crate::engine::orchestrator::CarShot,
            crate::engine::orchestrator::CarDayScans,
            crate::engine::CarView,
            crate::engine::frequency::RankedEntry,
            crate::engine::histogram::Graphic,
            crate::engine::histogram::HourSlot,
            crate::engine::histogram::DaySlot,
            crate::engine::histogram::WeekdaySlot,
            crate::engine::window::CarDay,
            crate::engine::window::CarSnapshot,
            // Configuration
            crate::models::exception_number::ExceptionNumber,
            crate::models::exception_number::CreateExceptionNumber,
            crate::models::attendance_window::AttendanceWindow,
            crate::models::attendance_window::UpdateAttendanceWindow,
            // Reports
            crate::models::daily_report::DailyReport,
            crate::models::daily_report::DailyReportLookup,
            crate::engine::summary::DailySheet,
            crate::engine::summary::DailySheetRow,
            crate::engine::summary::MonthlySummary,
            crate::engine::summary::MonthlyRow,
            crate::engine::summary::MonthlyTotal,
            // Unknown cars
            crate::models::unknown_scan::UnknownScan,
            crate::models::unknown_scan::PurgeResult,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "cars", description = "Scan ingestion and attendance views"),
        (name = "exception_numbers", description = "Plates excluded from accounting"),
        (name = "attendance_window", description = "Paid-presence window"),
        (name = "daily_reports", description = "Persisted daily reports"),
        (name = "export", description = "Spreadsheet export"),
        (name = "unknown_cars", description = "Unreadable plates")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_views() {
        let doc = ApiDoc::openapi();
        for path in ["/cars/day", "/cars/{car_number}", "/daily-reports/generate", "/unknown-cars"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
