use serde::Serialize;

use crate::repos::subscription_repo::SubscriptionId;

#[derive(Debug, Serialize)]
pub struct CreateSubscriptionResponse {
    pub subscription_id: SubscriptionId,
}
