/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::api::{ApiClient, Auth, path_segment};
use crate::errors::CloudAppError;
use crate::macros::{obj_from_url, obj_update_from_url, objs_from_url};
use crate::parsers::from_item_type;
use crate::properties::ItemType;
use async_stream::try_stream;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;
use log::debug;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::Path;

/// Page size used when streaming without an explicit per_page
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Holds information returned for a CloudApp item (a "drop").
///
/// Items are created by uploading a file or bookmarking a link. Deleting an
/// item moves it to the trash, after which `deleted_at` is set.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Item {
    #[serde(skip)]
    pub(crate) client: Option<ApiClient>,

    /// API resource url, the target of updates and deletes
    pub href: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub private: bool,

    #[serde(default)]
    pub subscribed: bool,

    /// Public share url, ends in the item's slug
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,

    #[serde(default, deserialize_with = "from_item_type")]
    pub item_type: ItemType,

    #[serde(default)]
    pub view_counter: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Item {
    const ITEMS_URI: &'static str = "/items";
    const NEW_ITEM_URI: &'static str = "/items/new";

    /// Returns the item at the provided full url
    pub async fn from_url(client: ApiClient, url: &str) -> Result<Self, CloudAppError> {
        obj_from_url!(client, url, None, Auth::Optional, Item)
    }

    /// Finds an item by its slug, for example "2wr4".
    ///
    /// Credentials are sent when the client has them, which lets the owner see
    /// private and trashed items.
    pub async fn find(
        client: ApiClient,
        slug: &str,
        options: &FindOptions,
    ) -> Result<Self, CloudAppError> {
        let req_url = client
            .endpoints()
            .share_url(&format!("/{}", path_segment(slug)?))?;
        let params = options.to_params();
        obj_from_url!(client, req_url.as_str(), Some(&params), Auth::Optional, Item)
    }

    /// Lists a page of the authenticated user's items
    pub async fn all(client: ApiClient, query: &ItemQuery) -> Result<Vec<Self>, CloudAppError> {
        let req_url = client.endpoints().api_url(Self::ITEMS_URI)?;
        let params = query.to_params();
        objs_from_url!(client, req_url.as_str(), Some(&params), Auth::Required, Item)
    }

    /// Pages through all items matching the query, starting at `query.page`.
    ///
    /// Stops at the first empty page, so a service that serves fewer items per page
    /// than asked for is still walked to the end.
    pub fn stream_all(
        client: ApiClient,
        query: ItemQuery,
    ) -> impl Stream<Item = Result<Self, CloudAppError>> {
        try_stream! {
            let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE).max(1);
            let mut page = query.page.unwrap_or(1);

            loop {
                let page_query = ItemQuery {
                    page: Some(page),
                    per_page: Some(per_page),
                    ..query.clone()
                };
                let items = Self::all(client.clone(), &page_query).await?;
                let is_done = items.is_empty();

                for item in items {
                    yield item
                }

                if is_done {
                    break;
                }
                page += 1;
            }
        }
    }

    /// Creates a new item by bookmarking a link
    pub async fn create_bookmark(
        client: ApiClient,
        props: &BookmarkProps,
    ) -> Result<Self, CloudAppError> {
        let req_url = client.endpoints().api_url(Self::ITEMS_URI)?;
        let data = json!({ "item": props });
        client
            .post::<_, Item>(req_url.as_str(), &data, Auth::Required)
            .await
            .map(|mut v| {
                v.client = Some(client.clone());
                v
            })
    }

    /// Creates a new item by uploading a local file.
    ///
    /// The API first hands out a one-time upload target. The file is posted there as
    /// multipart form data and the storage host redirects back to the created item.
    pub async fn upload(
        client: ApiClient,
        path: impl AsRef<Path>,
        options: &UploadOptions,
    ) -> Result<Self, CloudAppError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| CloudAppError::InvalidPath(path.display().to_string()))?
            .to_string();

        let req_url = client.endpoints().api_url(Self::NEW_ITEM_URI)?;
        let params = options.to_params();
        let target = client
            .get::<UploadTarget>(req_url.as_str(), Some(&params), Auth::Required)
            .await?;

        if target.uploads_remaining == Some(0) {
            return Err(CloudAppError::UploadQuotaExhausted());
        }
        let file_size = tokio::fs::metadata(path).await?.len();
        if let Some(max_size) = target.max_upload_size {
            if file_size > max_size {
                return Err(CloudAppError::FileTooLarge(file_size, max_size));
            }
        }

        let mime = mime_guess::from_path(path).first_or_octet_stream();
        debug!("Uploading {} ({} bytes, {})", file_name, file_size, mime);

        // Storage expects its own fields ahead of the file
        let mut form = Form::new();
        for (key, value) in target.params {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            form = form.text(key, value);
        }
        let data = tokio::fs::read(path).await?;
        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str(mime.essence_str())?;
        form = form.part("file", part);

        client
            .post_multipart::<Item>(&target.url, form)
            .await
            .map(|mut v| {
                v.client = Some(client.clone());
                v
            })
    }

    /// Applies the set fields of `changes` to this item, returning the updated item
    pub async fn update(&self, changes: &ItemUpdate) -> Result<Self, CloudAppError> {
        self.update_with_client(self.api_client()?, changes).await
    }

    /// Applies the set fields of `changes` to this item using the provided client
    pub async fn update_with_client(
        &self,
        client: ApiClient,
        changes: &ItemUpdate,
    ) -> Result<Self, CloudAppError> {
        let data = json!({ "item": changes });
        obj_update_from_url!(client, &self.href, &data, Item)
    }

    /// Moves this item to the trash, returning the trashed item
    pub async fn delete(&self) -> Result<Self, CloudAppError> {
        let client = self.api_client()?;
        client.delete::<Item>(&self.href).await.map(|mut v| {
            v.client = Some(client.clone());
            v
        })
    }

    /// Restores this item from the trash
    pub async fn recover(&self) -> Result<Self, CloudAppError> {
        let client = self.api_client()?;
        let data = json!({ "deleted": true, "item": { "deleted_at": null } });
        obj_update_from_url!(client, &self.href, &data, Item)
    }

    /// Downloads the content behind this item
    pub async fn content(&self) -> Result<Bytes, CloudAppError> {
        let content_url = self
            .content_url
            .as_deref()
            .ok_or(CloudAppError::ResponseMissing())?;
        self.api_client()?.get_bytes(content_url).await
    }

    /// The slug, taken from the last segment of the share url
    pub fn slug(&self) -> Option<String> {
        let share_url = url::Url::parse(&self.url).ok()?;
        share_url
            .path_segments()?
            .filter(|s| !s.is_empty())
            .next_back()
            .map(String::from)
    }

    /// True when this item is in the trash
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    fn api_client(&self) -> Result<ApiClient, CloudAppError> {
        self.client
            .as_ref()
            .ok_or(CloudAppError::ClientNotFound())
            .cloned()
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.href == other.href
    }
}
impl Eq for Item {}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "name: {}, type: {}, url: {}",
            self.name.as_deref().unwrap_or(""),
            self.item_type,
            self.url
        )
    }
}

/// Options for looking up a single item
#[derive(Debug, Default, Clone)]
pub struct FindOptions {
    /// Also return the item when it is in the trash
    pub deleted: bool,
}

impl FindOptions {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        if self.deleted {
            vec![("deleted", "true".to_string())]
        } else {
            Vec::new()
        }
    }
}

/// Filters for listing items. Unset fields use the API's defaults.
#[derive(Debug, Default, Clone)]
pub struct ItemQuery {
    /// Page number starting at 1
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub item_type: Option<ItemType>,
    /// List trashed items
    pub deleted: bool,
}

impl ItemQuery {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            params.push(("per_page", per_page.to_string()));
        }
        if let Some(item_type) = self.item_type {
            let item_type: &'static str = item_type.into();
            params.push(("type", item_type.to_string()));
        }
        if self.deleted {
            params.push(("deleted", "true".to_string()));
        }
        params
    }
}

/// Options for uploading a file
#[derive(Debug, Default, Clone)]
pub struct UploadOptions {
    /// Give the new item a private url
    pub private: bool,
}

impl UploadOptions {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        if self.private {
            vec![("item[private]", "true".to_string())]
        } else {
            Vec::new()
        }
    }
}

/// Properties used in the creation of a bookmark
#[derive(Serialize, Default, Debug, Clone)]
pub struct BookmarkProps {
    pub name: String,
    pub redirect_url: String,
}

/// Fields that can be changed on an existing item. Only set fields are sent.
#[derive(Serialize, Default, Debug, Clone)]
pub struct ItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

// Expected response when requesting a new upload
#[derive(Deserialize, Debug)]
struct UploadTarget {
    url: String,

    #[serde(default)]
    params: BTreeMap<String, serde_json::Value>,

    #[serde(default)]
    max_upload_size: Option<u64>,

    #[serde(default)]
    uploads_remaining: Option<u64>,
}
