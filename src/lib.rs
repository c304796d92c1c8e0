/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! # CloudApp
//!
//! A client library for the CloudApp API, the service behind `cl.ly` links.
//!
//! ## Features
//!
//! - Items ("drops")
//!     - Look up by slug, including trashed items
//!     - List and stream with page, type and trash filters
//!     - Upload files and bookmark links
//!     - Rename, change privacy, trash and recover
//! - Account information, usage stats, settings, registration and password reset
//! - Gift cards, lookup and redemption
//! - Lower level interface for handling the raw communication
//!
//! *The CloudApp API uses HTTP basic auth. Credentials are held by the client they are
//! given to, there is no global login state.*
//!
//! There are two ways of calling the API. The [`Client`] offers short named calls with
//! defaults for optional arguments, while the resource types ([`Item`], [`Account`],
//! [`GiftCard`]) work directly with an [`ApiClient`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cloudapp::{Client, Creds, Item, ItemQuery, ItemType, CloudAppError};
//! use futures::{pin_mut, StreamExt};
//!
//! async fn list_images(username: &str, password: &str) -> Result<(), CloudAppError> {
//!     let client = Client::new(Creds::new(username, password))?;
//!
//!     // Bookmark a link, the name is optional
//!     let bookmark = client.bookmark("http://getcloudapp.com", Some("CloudApp")).await?;
//!     println!("Created {}", bookmark);
//!
//!     // Page through every image
//!     let images = client.items_stream(ItemQuery {
//!         item_type: Some(ItemType::Image),
//!         ..Default::default()
//!     });
//!     pin_mut!(images);
//!     while let Some(image) = images.next().await {
//!         println!("{}", image?);
//!     }
//!
//!     // The resource types can be used directly as well
//!     let trashed = Item::all(
//!         client.api_client().clone(),
//!         &ItemQuery { deleted: true, ..Default::default() },
//!     )
//!     .await?;
//!     println!("{} items in the trash", trashed.len());
//!     Ok(())
//! }
//! ```
//!
pub mod account;
pub mod api;
pub mod client;
pub mod errors;
pub mod gift_card;
pub mod item;
mod macros;
mod parsers;
pub mod properties;

pub use account::*;
pub use api::*;
pub use client::*;
pub use errors::*;
pub use gift_card::*;
pub use item::*;
pub use properties::*;
