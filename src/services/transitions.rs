//! Status transition table for donations, school requests and inventory units.
//!
//! Every status change goes through one of the functions below, which decide
//! whether the move is allowed and which side effects it triggers. Handlers
//! and services never re-derive these rules.

use crate::{
    error::{AppError, AppResult},
    models::enums::{DonationStatus, InventoryStatus, RequestStatus},
};

/// Donation statuses whose entry generates the inventory batch
pub const FULFILLMENT_ELIGIBLE: [DonationStatus; 2] =
    [DonationStatus::Collected, DonationStatus::Processing];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// Create one inventory unit per donated computer (idempotent)
    GenerateInventory,
    /// Thank the donor and confirm the pickup date
    NotifyDonor,
    /// Tell the school about the new request status
    NotifyRequester,
}

/// Outcome of an allowed transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub effects: Vec<SideEffect>,
}

impl TransitionPlan {
    fn new(effects: Vec<SideEffect>) -> Self {
        Self { effects }
    }

    pub fn has(&self, effect: SideEffect) -> bool {
        self.effects.contains(&effect)
    }
}

/// Position along the approval pipeline; `rejected` sits outside it
fn donation_rank(status: DonationStatus) -> Option<u8> {
    match status {
        DonationStatus::Pending => Some(0),
        DonationStatus::Approved => Some(1),
        DonationStatus::Collected => Some(2),
        DonationStatus::Processing => Some(3),
        DonationStatus::Delivered => Some(4),
        DonationStatus::Rejected => None,
    }
}

/// Donations move forward along the pipeline (steps may be skipped).
/// `rejected` can be entered from any state but `delivered` and is terminal.
/// Re-applying the current status is allowed and repeats its side effects.
pub fn donation(current: DonationStatus, requested: DonationStatus) -> AppResult<TransitionPlan> {
    use DonationStatus::*;

    let allowed = match (current, requested) {
        (from, to) if from == to => true,
        (Rejected, _) => false,
        (Delivered, Rejected) => false,
        (_, Rejected) => true,
        (from, to) => donation_rank(to) > donation_rank(from),
    };

    if !allowed {
        return Err(AppError::InvalidTransition(format!(
            "Donation cannot move from {} to {}",
            current, requested
        )));
    }

    let mut effects = Vec::new();
    if FULFILLMENT_ELIGIBLE.contains(&requested) {
        effects.push(SideEffect::GenerateInventory);
    }
    if requested == Approved {
        effects.push(SideEffect::NotifyDonor);
    }
    Ok(TransitionPlan::new(effects))
}

/// Requests are approved or rejected by an admin. `fulfilled` is only ever
/// set by fulfillment, once enough units are assigned.
pub fn school_request(current: RequestStatus, requested: RequestStatus) -> AppResult<TransitionPlan> {
    use RequestStatus::*;

    let allowed = match (current, requested) {
        (_, Fulfilled) => {
            return Err(AppError::BusinessRule(
                "Requests become fulfilled by assigning inventory; use POST /inventory/fulfill"
                    .to_string(),
            ))
        }
        (from, to) if from == to => true,
        (Fulfilled, _) | (Rejected, _) => false,
        (Approved, Pending) => false,
        _ => true,
    };

    if !allowed {
        return Err(AppError::InvalidTransition(format!(
            "School request cannot move from {} to {}",
            current, requested
        )));
    }

    Ok(TransitionPlan::new(vec![SideEffect::NotifyRequester]))
}

/// Refurbishment moves: received -> in-refurbishment -> ready, or to
/// unusable from any non-delivered state. `delivered` is reserved for
/// fulfillment.
pub fn inventory(current: InventoryStatus, requested: InventoryStatus) -> AppResult<()> {
    use InventoryStatus::*;

    let allowed = match (current, requested) {
        (_, Delivered) if current != Delivered => {
            return Err(AppError::BusinessRule(
                "Units are delivered by fulfilling a school request".to_string(),
            ))
        }
        (from, to) if from == to => true,
        (Delivered, _) | (Unusable, _) => false,
        (_, Unusable) => true,
        (Received, InRefurbishment) | (Received, Ready) | (InRefurbishment, Ready) => true,
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(AppError::InvalidTransition(format!(
            "Inventory unit cannot move from {} to {}",
            current, requested
        )))
    }
}

/// Request status once `assigned` units are linked to a request asking for `quantity`
pub fn status_after_assignment(current: RequestStatus, assigned: i64, quantity: i64) -> RequestStatus {
    if assigned >= quantity {
        RequestStatus::Fulfilled
    } else {
        current
    }
}
