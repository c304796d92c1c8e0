/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::api::{ApiClient, Auth};
use crate::errors::CloudAppError;
use crate::parsers::from_empty_str_to_none;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Holds information returned from the Account API.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Account {
    pub id: u64,

    pub email: String,

    /// Custom domain items are shared from
    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    pub domain: Option<String>,

    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    pub domain_home_page: Option<String>,

    /// Whether new items default to private
    #[serde(default)]
    pub private_items: bool,

    #[serde(default)]
    pub subscribed: bool,

    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    pub subscription_expires_at: Option<String>,

    #[serde(default)]
    pub alpha: bool,

    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    pub plan: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub activated_at: Option<DateTime<Utc>>,

    /// Usage statistics, filled in by [`Account::find`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<AccountStats>,
}

/// Usage statistics for an account
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccountStats {
    #[serde(default)]
    pub items: u64,

    #[serde(default)]
    pub views: u64,
}

impl Account {
    const ACCOUNT_URI: &'static str = "/account";
    const STATS_URI: &'static str = "/account/stats";
    const REGISTER_URI: &'static str = "/register";
    const RESET_URI: &'static str = "/reset";

    /// Returns the authenticated user's account along with its usage stats
    pub async fn find(client: ApiClient) -> Result<Self, CloudAppError> {
        let req_url = client.endpoints().api_url(Self::ACCOUNT_URI)?;
        let mut account = client
            .get::<Account>(req_url.as_str(), None, Auth::Required)
            .await?;
        account.stats = Some(Self::stats(client).await?);
        Ok(account)
    }

    /// Returns the number of items and views for the authenticated user
    pub async fn stats(client: ApiClient) -> Result<AccountStats, CloudAppError> {
        let req_url = client.endpoints().api_url(Self::STATS_URI)?;
        client.get(req_url.as_str(), None, Auth::Required).await
    }

    /// Changes account settings. Changing the email or password requires `current_password`.
    pub async fn update(client: ApiClient, changes: &AccountUpdate) -> Result<Self, CloudAppError> {
        let req_url = client.endpoints().api_url(Self::ACCOUNT_URI)?;
        let data = json!({ "user": changes });
        client.put(req_url.as_str(), &data).await
    }

    /// Registers a new account. Credentials are not needed.
    pub async fn create(
        client: ApiClient,
        email: &str,
        password: &str,
    ) -> Result<Self, CloudAppError> {
        let req_url = client.endpoints().api_url(Self::REGISTER_URI)?;
        let data = json!({
            "user": { "email": email, "password": password, "accept_tos": true }
        });
        client.post(req_url.as_str(), &data, Auth::Skip).await
    }

    /// Sends a password reset email. Credentials are not needed.
    pub async fn reset_password(client: ApiClient, email: &str) -> Result<(), CloudAppError> {
        let req_url = client.endpoints().api_url(Self::RESET_URI)?;
        let data = json!({ "user": { "email": email } });
        client
            .post_no_content(req_url.as_str(), &data, Auth::Skip)
            .await
    }
}

/// Account settings that can be changed. Only set fields are sent.
#[derive(Serialize, Default, Debug, Clone)]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_items: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_home_page: Option<String>,
}
