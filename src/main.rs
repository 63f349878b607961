mod cli;

use anyhow::Result;
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use mosaic::placement::{fibonacci_anchors, group_consecutive};
use mosaic::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Show { data, load_more, refresh, json } => {
            let mut config = FeedConfig::load(cli.config.as_deref())?;
            if data.is_some() {
                config.data_location = data;
            }
            let mosaic = Mosaic::from_config(config)?;
            let view = mosaic.open_view();
            if let Err(e) = view.mount().await {
                eprintln!("{}", e.user_message().unwrap_or("Failed to load feed"));
                return Err(e.into());
            }
            if refresh {
                view.refresh();
            }
            if load_more {
                view.load_more();
            }
            view.settled().await;
            print_blocks(&view.render(), json)?;
        }
        Commands::Slots { images } => {
            let anchors = fibonacci_anchors(images);
            println!("anchors: {:?}", anchors);
            for group in group_consecutive(&anchors) {
                println!("{} ad(s) before image {}", group.len(), group[0]);
            }
        }
    }
    Ok(())
}

fn print_blocks(blocks: &[RenderBlock], as_json: bool) -> Result<()> {
    if as_json {
        let out: Vec<_> = blocks
            .iter()
            .map(|b| match b {
                RenderBlock::Segment { segment, items, video } => json!({ "segment": segment, "video": video, "items": items }),
                RenderBlock::LoadingIndicator => json!({ "loading": true }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    for block in blocks {
        match block {
            RenderBlock::Segment { segment, items, video } => {
                println!("== {segment} ({} items)", items.len());
                if let Some(v) = video {
                    println!("   video {}", v.src);
                }
                for item in items {
                    match item {
                        FeedItem::Image(img) => println!("   {:<10} {}", item.key(), img.title.as_deref().unwrap_or(&img.alt)),
                        FeedItem::Ad(ad) => println!("   {:<10} [sponsored] {} -> {}", item.key(), ad.title, ad.url),
                    }
                }
            }
            RenderBlock::LoadingIndicator => println!("== loading..."),
        }
    }
    Ok(())
}
