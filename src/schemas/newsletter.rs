use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::models::Newsletter;
use crate::error::ApiError;

use super::{check_email, finish_validation};

#[derive(Debug, Clone, Deserialize)]
pub struct NewsletterSubscribe {
    pub email: String,
}

impl NewsletterSubscribe {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = HashMap::new();
        check_email("email", &self.email, &mut errors);
        finish_validation("Invalid subscription payload", errors)
    }
}

#[derive(Debug, Serialize)]
pub struct NewsletterResponse {
    pub id: i64,
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
    pub is_active: bool,
}

impl From<Newsletter> for NewsletterResponse {
    fn from(sub: Newsletter) -> Self {
        Self {
            id: sub.id,
            email: sub.email,
            subscribed_at: sub.subscribed_at,
            is_active: sub.is_active,
        }
    }
}
