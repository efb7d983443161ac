//! Counters shown on the buyer and seller dashboards.

use domains::ApprovalStatus;
use serde::Serialize;

use crate::message::MessageService;
use crate::notification::NotificationService;
use crate::property::PropertyService;
use crate::request::RequestService;
use crate::saved::SavedPropertyService;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerStats {
    pub saved: usize,
    /// Bookings and visits combined
    pub requests: usize,
    pub unread_messages: usize,
    pub unread_notifications: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerStats {
    pub total: usize,
    pub approved: usize,
    pub pending: usize,
    pub rejected: usize,
    pub pending_requests: usize,
}

#[derive(Clone)]
pub struct DashboardService {
    properties: PropertyService,
    requests: RequestService,
    notifications: NotificationService,
    saved: SavedPropertyService,
    messages: MessageService,
}

impl DashboardService {
    pub fn new(
        properties: PropertyService,
        requests: RequestService,
        notifications: NotificationService,
        saved: SavedPropertyService,
        messages: MessageService,
    ) -> Self {
        Self {
            properties,
            requests,
            notifications,
            saved,
            messages,
        }
    }

    pub fn buyer_stats(&self, email: &str) -> BuyerStats {
        BuyerStats {
            saved: self.saved.count_for(email),
            requests: self.requests.list_for_requester(email).len(),
            unread_messages: self.messages.unread_count_for(email),
            unread_notifications: self.notifications.unread_count_for(email),
        }
    }

    pub fn seller_stats(&self, email: &str) -> SellerStats {
        let listings = self.properties.list_by_seller(email);
        let count = |status: ApprovalStatus| listings.iter().filter(|p| p.status == status).count();
        SellerStats {
            total: listings.len(),
            approved: count(ApprovalStatus::Approved),
            pending: count(ApprovalStatus::Pending),
            rejected: count(ApprovalStatus::Rejected),
            pending_requests: self
                .requests
                .list_for_seller(email)
                .iter()
                .filter(|r| r.status == ApprovalStatus::Pending)
                .count(),
        }
    }
}
