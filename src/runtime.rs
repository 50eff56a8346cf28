//! Application runner wiring the CLI to the preview pipeline.

use crate::controls::{Cli, PreviewControls};
use crate::preview::{self, PreviewError};
use crate::scroll::{HeaderTransform, ScrollConfig, ScrollSample};
use reqwest::Client;
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::time::Duration;
use tokio::runtime::Builder;

const USER_AGENT: &str = "siteglue/0.1";

/// Boxed error type used at the binary boundary.
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Runs the CLI to completion.
///
/// In scroll-table mode no I/O beyond stdout happens; otherwise the host
/// page is read, decorated on a current-thread runtime, and written back
/// out byte-faithfully.
pub fn run(cli: Cli) -> Result<(), DynError> {
    if let Some(table) = cli.scroll_table.as_deref() {
        return print_scroll_table(&cli, table);
    }

    let host = read_host(&cli.host)?;
    let announcement = match cli.announcement_file.as_deref() {
        Some(path) => Some(
            fs::read_to_string(path).map_err(|err| format!("failed to read '{path}': {err}"))?,
        ),
        None => None,
    };
    let controls = cli.build_controls();

    let rt = Builder::new_current_thread().enable_all().build()?;
    let rendered = rt.block_on(render_home(&controls, &host, announcement));

    // No added newline: on a contained failure stdout must reproduce the
    // host document exactly.
    print!("{rendered}");
    io::stdout().flush()?;
    Ok(())
}

/// Runs the preview pipeline once, containing every failure.
///
/// On any error the host page is returned untouched and a single
/// diagnostic line is emitted; nothing else on the page observes the
/// failure. `announcement_override` skips the fetch stage when the
/// announcement markup is already at hand.
pub async fn render_home(
    controls: &PreviewControls,
    host: &str,
    announcement_override: Option<String>,
) -> String {
    match preview_once(controls, host, announcement_override).await {
        Ok(rendered) => rendered,
        Err(err) => {
            eprintln!("announcement preview failed: {err}");
            host.to_string()
        }
    }
}

async fn preview_once(
    controls: &PreviewControls,
    host: &str,
    announcement_override: Option<String>,
) -> Result<String, PreviewError> {
    let announcement = match announcement_override {
        Some(html) => html,
        None => {
            let client = build_client(controls.timeout())?;
            preview::fetch_announcement(&client, controls.announcement_url()).await?
        }
    };
    crate::debug_log!("announcement page: {} bytes", announcement.len());

    let triple = preview::extract_triple(&announcement, controls.markers())?;
    let assembled = preview::assemble_preview(&triple, controls.budget());
    crate::debug_log!("assembled preview: {} bytes", assembled.len());

    preview::mount_preview(host, controls.mount_selector(), &assembled)
}

fn build_client(timeout: Option<Duration>) -> Result<Client, PreviewError> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(PreviewError::Http)
}

#[derive(Serialize)]
struct StyleRow {
    offset: f64,
    #[serde(flatten)]
    transform: HeaderTransform,
}

fn print_scroll_table(cli: &Cli, table: &str) -> Result<(), DynError> {
    let config = ScrollConfig::with_recipe(cli.recipe.recipe());
    let mut rows = Vec::new();
    for entry in table.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let offset: f64 = entry
            .parse()
            .map_err(|err| format!("bad scroll offset '{entry}': {err}"))?;
        let sample = ScrollSample::at(offset);
        rows.push(StyleRow {
            offset,
            transform: config.transform_at(sample.offset(), cli.viewport_width),
        });
    }
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn read_host(source: &str) -> Result<String, DynError> {
    if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|err| format!("failed to read stdin: {err}"))?;
        Ok(buf)
    } else {
        Ok(fs::read_to_string(source)
            .map_err(|err| format!("failed to read '{source}': {err}"))?)
    }
}
