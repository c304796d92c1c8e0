/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::api::{ApiClient, Auth, path_segment};
use crate::errors::CloudAppError;
use crate::parsers::from_empty_str_to_none;
use crate::properties::GiftCardStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Holds information returned from the Gift Card API.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GiftCard {
    pub id: u64,

    /// Redemption code
    pub code: String,

    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    pub plan: Option<String>,

    #[serde(default)]
    pub months: Option<u32>,

    #[serde(default)]
    pub href: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub redeemed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub effective_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl GiftCard {
    const BASE_URI: &'static str = "/gift_cards/";

    /// Returns details for the gift card with the given code
    pub async fn find(client: ApiClient, code: &str) -> Result<Self, CloudAppError> {
        let req_url = Self::url_for(&client, code)?;
        client.get(req_url.as_str(), None, Auth::Required).await
    }

    /// Applies the gift card to the authenticated user's account
    pub async fn redeem(client: ApiClient, code: &str) -> Result<Self, CloudAppError> {
        let req_url = Self::url_for(&client, code)?;
        client.put(req_url.as_str(), &json!({})).await
    }

    pub fn status(&self) -> GiftCardStatus {
        match self.redeemed_at {
            Some(_) => GiftCardStatus::Redeemed,
            None => GiftCardStatus::Unredeemed,
        }
    }

    fn url_for(client: &ApiClient, code: &str) -> Result<url::Url, CloudAppError> {
        client
            .endpoints()
            .api_url(Self::BASE_URI)?
            .join(&path_segment(code)?)
            .map_err(CloudAppError::from)
    }
}
