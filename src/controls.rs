//! Configuration surface shared by the library and the CLI.

use crate::preview::MarkerSet;
use crate::scroll::TransformRecipe;
use crate::snippet::HOME_SNIPPET_BUDGET;
use clap::{Parser, ValueEnum};
use std::time::Duration;
use url::Url;

/// Default mount point selector in the host page.
pub const DEFAULT_MOUNT_SELECTOR: &str = "#announcement";

/// Default URL of the announcement page.
pub const DEFAULT_ANNOUNCEMENT_URL: &str = "https://example.com/announcement/index.html";

/// Settings the preview pipeline runs under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewControls {
    announcement_url: Url,
    budget: usize,
    mount_selector: String,
    markers: MarkerSet,
    timeout: Option<Duration>,
}

impl PreviewControls {
    /// Constructs a new set of preview controls.
    pub fn new(
        announcement_url: Url,
        budget: usize,
        mount_selector: String,
        markers: MarkerSet,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            announcement_url,
            budget,
            mount_selector,
            markers,
            timeout,
        }
    }

    /// URL the announcement page is fetched from.
    pub fn announcement_url(&self) -> &Url {
        &self.announcement_url
    }

    /// Snippet character budget.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Mount point selector in the host page.
    pub fn mount_selector(&self) -> &str {
        &self.mount_selector
    }

    /// Fragment marker selectors.
    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// Fetch timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Command-line interface for the siteglue binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "siteglue",
    about = "Bakes a blog's client-side decorations into its pages"
)]
pub struct Cli {
    /// Host page to decorate ('-' reads stdin)
    #[arg(long, env = "SITEGLUE_HOST", default_value = "-")]
    pub host: String,

    /// URL of the announcement page fetched for the preview block
    #[arg(
        long,
        env = "SITEGLUE_ANNOUNCEMENT_URL",
        default_value = DEFAULT_ANNOUNCEMENT_URL
    )]
    pub announcement_url: Url,

    /// Read the announcement page from a local file instead of fetching
    #[arg(long, env = "SITEGLUE_ANNOUNCEMENT_FILE")]
    pub announcement_file: Option<String>,

    /// Snippet character budget
    #[arg(long, env = "SITEGLUE_BUDGET", default_value_t = HOME_SNIPPET_BUDGET)]
    pub budget: usize,

    /// Mount point selector in the host page
    #[arg(long, env = "SITEGLUE_MOUNT", default_value = DEFAULT_MOUNT_SELECTOR)]
    pub mount: String,

    /// Selector of the announcement title marker
    #[arg(long, default_value = ".antitle")]
    pub title_marker: String,

    /// Selector of the announcement date marker
    #[arg(long, default_value = ".andate")]
    pub date_marker: String,

    /// Selector of the announcement text marker
    #[arg(long, default_value = ".antext")]
    pub text_marker: String,

    /// Seconds before the fetch is abandoned (0 disables the timeout)
    #[arg(long, env = "SITEGLUE_TIMEOUT", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Comma-separated scroll offsets; prints transforms as JSON and exits
    #[arg(long)]
    pub scroll_table: Option<String>,

    /// Viewport width used when computing the scroll table
    #[arg(long, default_value_t = 1024.0)]
    pub viewport_width: f64,

    /// Transform recipe used for the scroll table
    #[arg(long, value_enum, default_value = "adaptive")]
    pub recipe: RecipeArg,
}

impl Cli {
    /// Converts the parsed CLI into `PreviewControls`.
    pub fn build_controls(&self) -> PreviewControls {
        PreviewControls::new(
            self.announcement_url.clone(),
            self.budget,
            self.mount.clone(),
            self.marker_set(),
            self.timeout(),
        )
    }

    /// Returns the marker selectors as a set.
    pub fn marker_set(&self) -> MarkerSet {
        MarkerSet {
            title: self.title_marker.clone(),
            date: self.date_marker.clone(),
            text: self.text_marker.clone(),
        }
    }

    /// Returns the fetch timeout, treating 0 as disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Transform recipe choices exposed on the command line.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum RecipeArg {
    /// Fade the header at any viewport width.
    Fade,
    /// Fade above the breakpoint, shrink below it.
    Adaptive,
}

impl RecipeArg {
    /// Maps the CLI choice onto the library recipe.
    pub fn recipe(self) -> TransformRecipe {
        match self {
            Self::Fade => TransformRecipe::FadeOnly,
            Self::Adaptive => TransformRecipe::Adaptive,
        }
    }
}
