/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::account::{Account, AccountStats, AccountUpdate};
use crate::api::{ApiClient, Creds, Endpoints};
use crate::errors::CloudAppError;
use crate::gift_card::GiftCard;
use crate::item::{BookmarkProps, FindOptions, Item, ItemQuery, ItemUpdate, UploadOptions};
use futures::Stream;
use std::path::Path;

/// A simple interface over the item, account and gift card calls.
///
/// ```rust,no_run
/// # async fn run() -> Result<(), cloudapp::CloudAppError> {
/// use cloudapp::{Client, Creds};
///
/// let client = Client::new(Creds::new("me@example.com", "password"))?;
///
/// let item = client.upload("/path/to/image.png").await?;
/// let slug = item.slug().unwrap_or_default();
/// client.rename(&slug, Some("Big Screenshot")).await?;
/// client.privacy(&slug, Some(true)).await?;
/// client.delete(&slug).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    api_client: ApiClient,
}

impl Client {
    /// Creates a client that authenticates every request with `creds`
    pub fn new(creds: Creds) -> Result<Self, CloudAppError> {
        Self::with_endpoints(Some(creds), Endpoints::default())
    }

    /// Creates a client without credentials. Only public items can be looked up.
    pub fn anonymous() -> Result<Self, CloudAppError> {
        Self::with_endpoints(None, Endpoints::default())
    }

    /// Creates a client against non-default hosts
    pub fn with_endpoints(creds: Option<Creds>, endpoints: Endpoints) -> Result<Self, CloudAppError> {
        Ok(Self {
            api_client: ApiClient::new(creds, endpoints)?,
        })
    }

    /// Replaces the credentials used by this client
    pub fn authenticate(&mut self, username: &str, password: &str) {
        self.api_client = self
            .api_client
            .with_creds(Some(Creds::new(username, password)));
    }

    /// The lower level client, for use with the resource types directly
    pub fn api_client(&self) -> &ApiClient {
        &self.api_client
    }

    /// Get metadata about an item like name, type, or view count by its slug
    pub async fn item(&self, slug: &str) -> Result<Item, CloudAppError> {
        Item::find(self.api_client.clone(), slug, &FindOptions::default()).await
    }

    /// Like [`Client::item`] but also finds items in the trash
    pub async fn trashed_item(&self, slug: &str) -> Result<Item, CloudAppError> {
        Item::find(self.api_client.clone(), slug, &FindOptions { deleted: true }).await
    }

    /// Page through your items
    pub async fn items(&self, query: &ItemQuery) -> Result<Vec<Item>, CloudAppError> {
        Item::all(self.api_client.clone(), query).await
    }

    /// Stream every item matching the query, fetching pages as needed
    pub fn items_stream(
        &self,
        query: ItemQuery,
    ) -> impl Stream<Item = Result<Item, CloudAppError>> + use<> {
        Item::stream_all(self.api_client.clone(), query)
    }

    /// Create a new item by bookmarking a link. The name defaults to empty.
    pub async fn bookmark(&self, url: &str, name: Option<&str>) -> Result<Item, CloudAppError> {
        let props = BookmarkProps {
            name: name.unwrap_or_default().to_string(),
            redirect_url: url.to_string(),
        };
        Item::create_bookmark(self.api_client.clone(), &props).await
    }

    /// Create a new item by uploading a file
    pub async fn upload(&self, path: impl AsRef<Path>) -> Result<Item, CloudAppError> {
        Item::upload(self.api_client.clone(), path, &UploadOptions::default()).await
    }

    /// Upload a file as a private item
    pub async fn upload_private(&self, path: impl AsRef<Path>) -> Result<Item, CloudAppError> {
        Item::upload(self.api_client.clone(), path, &UploadOptions { private: true }).await
    }

    /// Change the name of an item. The name defaults to empty.
    pub async fn rename(&self, slug: &str, name: Option<&str>) -> Result<Item, CloudAppError> {
        let changes = ItemUpdate {
            name: Some(name.unwrap_or_default().to_string()),
            ..Default::default()
        };
        self.update(slug, &changes).await
    }

    /// Switch an item between a private and a public url. Defaults to public.
    pub async fn privacy(&self, slug: &str, private: Option<bool>) -> Result<Item, CloudAppError> {
        let changes = ItemUpdate {
            private: Some(private.unwrap_or(false)),
            ..Default::default()
        };
        self.update(slug, &changes).await
    }

    /// Send an item to the trash
    pub async fn delete(&self, slug: &str) -> Result<Item, CloudAppError> {
        self.api_client.require_auth()?;
        self.item(slug).await?.delete().await
    }

    /// Restore an item from the trash
    pub async fn recover(&self, slug: &str) -> Result<Item, CloudAppError> {
        self.api_client.require_auth()?;
        self.trashed_item(slug).await?.recover().await
    }

    /// Current account details including usage stats
    pub async fn account(&self) -> Result<Account, CloudAppError> {
        Account::find(self.api_client.clone()).await
    }

    pub async fn account_stats(&self) -> Result<AccountStats, CloudAppError> {
        Account::stats(self.api_client.clone()).await
    }

    pub async fn update_account(&self, changes: &AccountUpdate) -> Result<Account, CloudAppError> {
        Account::update(self.api_client.clone(), changes).await
    }

    /// Register a new account
    pub async fn register(&self, email: &str, password: &str) -> Result<Account, CloudAppError> {
        Account::create(self.api_client.clone(), email, password).await
    }

    /// Request a password reset email
    pub async fn reset_password(&self, email: &str) -> Result<(), CloudAppError> {
        Account::reset_password(self.api_client.clone(), email).await
    }

    pub async fn gift_card(&self, code: &str) -> Result<GiftCard, CloudAppError> {
        GiftCard::find(self.api_client.clone(), code).await
    }

    pub async fn redeem_gift_card(&self, code: &str) -> Result<GiftCard, CloudAppError> {
        GiftCard::redeem(self.api_client.clone(), code).await
    }

    // Looks the item up first so updates go to its href
    async fn update(&self, slug: &str, changes: &ItemUpdate) -> Result<Item, CloudAppError> {
        self.api_client.require_auth()?;
        self.item(slug).await?.update(changes).await
    }
}
