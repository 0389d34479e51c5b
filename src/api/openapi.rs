//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, contact, donations, health, inventory, school_requests, schools, stats};
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CFS Tracker API",
        version = "0.3.0",
        description = "Donation intake, refurbishment inventory and school deliveries for Computers for Schools Kenya",
        contact(name = "Computers for Schools Kenya", email = "info@cfsk.org")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Identity
        auth::me,
        // Donations
        donations::create_donation,
        donations::list_donations,
        donations::my_donations,
        donations::user_donations,
        donations::get_donation,
        donations::donation_stats,
        donations::update_donation_status,
        // School requests
        school_requests::create_request,
        school_requests::list_requests,
        school_requests::my_requests,
        school_requests::user_requests,
        school_requests::get_request,
        school_requests::request_stats,
        school_requests::update_request_status,
        // Schools
        schools::list_schools,
        schools::get_school,
        // Inventory
        inventory::list_inventory,
        inventory::get_inventory_item,
        inventory::update_inventory_item,
        inventory::fulfill_request,
        // Contact
        contact::submit_message,
        contact::list_messages,
        contact::update_message_status,
        // Stats
        stats::dashboard,
        stats::impact_report,
        stats::beneficiaries,
        stats::reports,
    ),
    components(
        schemas(
            // Enums
            models::enums::UserRole,
            models::enums::DonationComputerType,
            models::enums::DonationCondition,
            models::enums::DonationStatus,
            models::enums::RequestComputerType,
            models::enums::RequestStatus,
            models::enums::InventoryComputerType,
            models::enums::ReceivedCondition,
            models::enums::RefurbishedCondition,
            models::enums::InventoryStatus,
            models::enums::ContactStatus,
            models::enums::SchoolLevel,
            models::enums::SchoolStatus,
            // Shared
            models::Pagination,
            models::user::AuthUser,
            models::user::User,
            auth::MeResponse,
            crate::api::MessageResponse,
            // Donations
            models::donation::Donation,
            models::donation::CreateDonation,
            models::donation::UpdateDonationStatus,
            models::donation::DonationPage,
            models::donation::DonationStats,
            // School requests
            models::school_request::SchoolRequest,
            models::school_request::CreateSchoolRequest,
            models::school_request::UpdateRequestStatus,
            models::school_request::SchoolRequestPage,
            models::school_request::SchoolRequestStats,
            // Schools
            models::school::School,
            models::school::SchoolPage,
            // Inventory
            models::inventory::InventoryItem,
            models::inventory::InventoryListEntry,
            models::inventory::UpdateInventoryItem,
            models::inventory::FulfillRequest,
            inventory::FulfillResponse,
            // Contact
            models::contact::ContactMessage,
            models::contact::CreateContactMessage,
            models::contact::UpdateContactStatus,
            models::contact::ContactPage,
            // Stats
            models::stats::PendingCounts,
            models::stats::DashboardStatistics,
            models::stats::DashboardResponse,
            models::stats::ImpactStatistics,
            models::stats::Beneficiary,
            models::stats::ReportSummary,
            models::stats::ReportApprovals,
            models::stats::ReportResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Caller identity"),
        (name = "donations", description = "Donation intake and status workflow"),
        (name = "school-requests", description = "School equipment requests"),
        (name = "schools", description = "School directory"),
        (name = "inventory", description = "Refurbishment inventory and fulfillment"),
        (name = "contact", description = "Contact form"),
        (name = "stats", description = "Dashboard, impact and reports")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_workflow_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/donations/{id}/status",
            "/schools/requests/{id}/status",
            "/inventory/fulfill",
            "/stats/reports",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
