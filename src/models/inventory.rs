//! Computer inventory model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::{
    InventoryComputerType, InventoryStatus, ReceivedCondition, RefurbishedCondition, RequestStatus,
};

/// One physical unit derived from a donation
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InventoryItem {
    pub id: i64,
    pub donation_id: i64,
    pub computer_type: InventoryComputerType,
    pub status: InventoryStatus,
    pub condition_received: ReceivedCondition,
    pub condition_after_refurbishment: Option<RefurbishedCondition>,
    pub refurbishment_notes: Option<String>,
    /// Placeholder `PENDING-{donation}-{suffix}` until a real asset tag is set
    pub serial_number: String,
    pub assigned_school_request_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inventory listing row with the donor name
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct InventoryListEntry {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub item: InventoryItem,
    pub donor_name: Option<String>,
}

/// Unit to insert when a donation batch is generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInventoryItem {
    pub donation_id: i64,
    pub computer_type: InventoryComputerType,
    pub condition_received: ReceivedCondition,
    pub status: InventoryStatus,
    pub serial_number: String,
}

/// Refurbishment update
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateInventoryItem {
    pub computer_type: Option<InventoryComputerType>,
    /// One of received, in-refurbishment, ready, unusable
    pub status: Option<String>,
    pub condition_after_refurbishment: Option<RefurbishedCondition>,
    pub refurbishment_notes: Option<String>,
    pub serial_number: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct InventoryQuery {
    pub status: Option<InventoryStatus>,
}

/// Assign inventory units to a school request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FulfillRequest {
    pub request_id: i64,
    pub inventory_item_ids: Vec<i64>,
}

/// Result of one fulfillment call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FulfillmentOutcome {
    /// Units newly assigned to the request in this call
    pub delivered: i64,
    /// Units assigned to the request over all calls
    pub assigned_count: i64,
    /// Quantity requested by the school
    pub quantity: i64,
    pub request_status: RequestStatus,
    /// Whether a school directory counter was incremented
    pub school_credited: bool,
}
