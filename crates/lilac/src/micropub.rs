use std::path::PathBuf;

use crate::body::{parse_form, parse_json, read_body};
use crate::prelude::{eprintln, println, *};
use crate::store::FileStore;
use chrono::Utc;
use colored::Colorize;
use lilac_core::micropub::{Micropub, MicropubRequest, Outcome, ServiceConfig};
use lilac_core::post::Post;
use log::info;

#[derive(Debug, clap::Args, Clone)]
pub struct PublishOptions {
    /// Micropub request body; reads stdin when omitted or `-`
    file: Option<PathBuf>,

    /// Body is application/x-www-form-urlencoded instead of JSON
    #[arg(long)]
    form: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct SourceOptions {
    /// URL of the stored post
    #[arg(long)]
    url: String,

    /// Only return these properties (repeatable)
    #[arg(short, long = "property")]
    properties: Vec<String>,
}

#[derive(Debug, clap::Args, Clone)]
pub struct ListOptions {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

fn open_service(global: &crate::Global, me: String) -> Result<Micropub<FileStore>> {
    if global.verbose {
        eprintln!("Loading store from {}...", global.store.display());
    }

    let store = FileStore::open(&global.store)?;
    let config = ServiceConfig {
        me,
        media_endpoint: global.media_endpoint.clone(),
    };
    Ok(Micropub::new(config, store))
}

pub fn publish(options: PublishOptions, global: crate::Global) -> Result<()> {
    let me = global
        .me
        .clone()
        .ok_or_eyre("--me (or LILAC_ME) is required to publish posts")?;

    let body = read_body(options.file.as_deref())?;
    let request = if options.form {
        MicropubRequest::from_form(&parse_form(&body))?
    } else {
        MicropubRequest::from_json(&parse_json(&body)?)?
    };

    let mut service = open_service(&global, me)?;
    let outcome = service.handle(request, Utc::now())?;
    service.store().save()?;

    if global.verbose {
        eprintln!("Saved store to {}", service.store().path().display());
    }
    info!("{}", outcome_message(&outcome));

    match outcome {
        Outcome::Created(url) => println!("{url}"),
        other => println!("{}", outcome_message(&other).green()),
    }
    Ok(())
}

pub fn source(options: SourceOptions, global: crate::Global) -> Result<()> {
    let service = open_service(&global, global.me.clone().unwrap_or_default())?;
    let response = service.source(&options.url, &options.properties)?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub fn config(global: crate::Global) -> Result<()> {
    let service = open_service(&global, global.me.clone().unwrap_or_default())?;

    println!("{}", serde_json::to_string_pretty(&service.config())?);
    Ok(())
}

pub fn list(options: ListOptions, global: crate::Global) -> Result<()> {
    let store = FileStore::open(&global.store)?;
    let posts = store.posts();

    if options.json {
        std::println!("{}", serde_json::to_string_pretty(posts)?);
    } else if posts.is_empty() {
        std::println!("No posts found.");
    } else {
        let mut table = new_table();
        table.add_row(prettytable::row![
            "URL".bold().cyan(),
            "Type".bold().cyan(),
            "Published".bold().cyan(),
            "Name".bold().cyan()
        ]);
        for (url, post) in posts {
            let [post_type, published, name] = list_row(post);
            table.add_row(prettytable::row![
                url.bright_white(),
                post_type.green(),
                published.bright_yellow(),
                name.bright_black()
            ]);
        }
        table.printstd();
    }

    Ok(())
}

fn outcome_message(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Created(url) => f!("Created {url}"),
        Outcome::Updated(url) => f!("Updated {url}"),
        Outcome::Deleted(url) => f!("Deleted {url}"),
    }
}

fn list_row(post: &Post) -> [String; 3] {
    [
        post.post_type.to_string(),
        post.published.to_rfc3339(),
        post.name.clone().unwrap_or_else(|| "-".to_string()),
    ]
}
