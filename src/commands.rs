use std::io::Read as _;
use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::{LogArgs, RevisitArgs, StoreArgs};
use crate::page::PageDescriptor;
use crate::store::LocalFsStore;
use crate::tracker::Tracker;

pub fn log(args: LogArgs) -> anyhow::Result<()> {
    let page = read_page(&args.page)?;
    if page.page_id.is_empty() {
        anyhow::bail!("page descriptor has no pageId");
    }

    let tracker = open(&args.store);
    tracker.log_history(&page).context("log history")?;
    match args.day {
        Some(day) => tracker.log_summary_at(&page, day).context("log summary")?,
        None => tracker.log_summary(&page).context("log summary")?,
    }

    tracing::info!(page_id = %page.page_id, "logged page view");
    Ok(())
}

pub fn recent(args: StoreArgs) -> anyhow::Result<()> {
    let history = open(&args.store).history();
    let json = serde_json::to_string_pretty(&history).context("serialize history")?;
    println!("{json}");
    Ok(())
}

pub fn revisit(args: RevisitArgs) -> anyhow::Result<()> {
    let revisit = open(&args.store).is_revisit(&args.page_id);
    println!("{revisit}");
    Ok(())
}

pub fn popular(args: StoreArgs) -> anyhow::Result<()> {
    let ranked = open(&args.store)
        .popular()
        .into_iter()
        .map(|(id, tag)| (id, tag.total()))
        .collect::<Vec<_>>();
    let json = serde_json::to_string_pretty(&ranked).context("serialize popular tags")?;
    println!("{json}");
    Ok(())
}

pub fn series(args: StoreArgs) -> anyhow::Result<()> {
    let tracker = open(&args.store);
    let summary = tracker.series_summary();
    let most_viewed = tracker.most_viewed_series();

    let json = serde_json::to_string_pretty(&serde_json::json!({
        "series": summary,
        "mostViewed": most_viewed,
    }))
    .context("serialize series summary")?;
    println!("{json}");
    Ok(())
}

pub fn reset(args: StoreArgs) -> anyhow::Result<()> {
    open(&args.store).reset().context("reset store")?;
    tracing::info!(store = %args.store, "cleared history store");
    Ok(())
}

fn open(store_dir: &str) -> Tracker<LocalFsStore> {
    Tracker::new(LocalFsStore::new(PathBuf::from(store_dir)))
}

fn read_page(path: &str) -> anyhow::Result<PageDescriptor> {
    let raw = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read page descriptor from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("read page descriptor: {path}"))?
    };

    serde_json::from_str(&raw).context("parse page descriptor json")
}
