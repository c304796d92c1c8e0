/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

extern crate cloudapp;

use anyhow::{Result, anyhow};
use cloudapp::{Client, Creds, ItemQuery, ItemType};
use dotenvy::dotenv;
use futures::{StreamExt, pin_mut};

// Uploads a file, names it, and prints the share url along with the newest images
#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    // Login is read from CLOUDAPP_USERNAME and CLOUDAPP_PASSWORD
    let creds = Creds::from_env().ok_or(anyhow!("CLOUDAPP_USERNAME/CLOUDAPP_PASSWORD not set"))?;
    let client = Client::new(creds)?;

    let path = std::env::args()
        .nth(1)
        .ok_or(anyhow!("usage: share_file <path> [name]"))?;
    let name = std::env::args().nth(2);

    let item = client.upload(&path).await?;
    let slug = item.slug().ok_or(anyhow!("uploaded item has no slug"))?;
    let item = match name {
        Some(name) => client.rename(&slug, Some(&name)).await?,
        None => item,
    };
    println!("Shared {} at {}", item.name.as_deref().unwrap_or(""), item.url);

    let stats = client.account_stats().await?;
    println!("{} items, {} views", stats.items, stats.views);

    let images = client.items_stream(ItemQuery {
        item_type: Some(ItemType::Image),
        per_page: Some(10),
        ..Default::default()
    });
    pin_mut!(images);
    let mut shown = 0;
    while let Some(image) = images.next().await {
        println!("  {}", image?);
        shown += 1;
        if shown == 10 {
            break;
        }
    }
    Ok(())
}
