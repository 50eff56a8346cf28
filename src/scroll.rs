//! Header transforms driven by the page scroll offset.
//!
//! A [`ScrollController`] is constructed with its target selector and
//! configuration injected, and observes nothing until attached. The math
//! itself lives on [`ScrollConfig`] so page variants share one parameterized
//! recipe instead of near-identical listeners.

use crate::markup::{self, MarkupError};
use scraper::Html;
use serde::Serialize;

/// Viewport width separating the wide and narrow header recipes.
pub const HEADER_BREAKPOINT_PX: f64 = 768.0;

/// Scroll distance over which the header fades out completely.
pub const FADE_DISTANCE_PX: f64 = 200.0;

/// Lower bound on the narrow-viewport scale factor.
pub const SCALE_FLOOR: f64 = 0.8;

/// Scale lost per pixel scrolled in the narrow recipe.
///
/// Zero keeps the scale pinned at 1.0, so [`SCALE_FLOOR`] only engages if
/// this rate is ever raised. The shipped pages carry the zero coefficient,
/// most likely a leftover, and its effective behavior is preserved here.
pub const SCALE_RATE_PER_PX: f64 = 0.0;

/// Header height at the top of the page, in pixels.
pub const HEIGHT_MAX_PX: f64 = 200.0;

/// Lower bound on the shrinking header height, in pixels.
pub const HEIGHT_FLOOR_PX: f64 = 60.0;

/// Height lost per pixel scrolled in the narrow recipe.
pub const HEIGHT_RATE_PER_PX: f64 = 0.5;

/// One scroll notification, carrying every offset source the page exposes.
///
/// Sources are tried in order; a page may report any subset of them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollSample {
    /// Standard scroll offset property.
    pub scroll_y: Option<f64>,
    /// Root-element fallback offset.
    pub document_element: Option<f64>,
    /// Body fallback offset.
    pub body: Option<f64>,
}

impl ScrollSample {
    /// Builds a sample whose primary source reports `offset`.
    pub fn at(offset: f64) -> Self {
        Self {
            scroll_y: Some(offset),
            ..Self::default()
        }
    }

    /// Resolves the effective offset: the standard property, then the root
    /// element, then the body, then zero.
    pub fn offset(&self) -> f64 {
        self.scroll_y
            .or(self.document_element)
            .or(self.body)
            .unwrap_or(0.0)
    }
}

/// Which transform runs under which viewport condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransformRecipe {
    /// Fade the header at any viewport width (desktop-only pages).
    FadeOnly,
    /// Fade above the breakpoint, scale and shrink below it (mobile-aware
    /// pages).
    Adaptive,
}

/// Tunable knobs for the header transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollConfig {
    /// Viewport width separating wide from narrow mode.
    pub breakpoint_px: f64,
    /// Scroll distance over which opacity reaches zero.
    pub fade_distance_px: f64,
    /// Lower bound on the scale factor.
    pub scale_floor: f64,
    /// Scale lost per scrolled pixel.
    pub scale_rate_per_px: f64,
    /// Header height at offset zero.
    pub height_max_px: f64,
    /// Lower bound on the header height.
    pub height_floor_px: f64,
    /// Height lost per scrolled pixel.
    pub height_rate_per_px: f64,
    /// Selected recipe.
    pub recipe: TransformRecipe,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: HEADER_BREAKPOINT_PX,
            fade_distance_px: FADE_DISTANCE_PX,
            scale_floor: SCALE_FLOOR,
            scale_rate_per_px: SCALE_RATE_PER_PX,
            height_max_px: HEIGHT_MAX_PX,
            height_floor_px: HEIGHT_FLOOR_PX,
            height_rate_per_px: HEIGHT_RATE_PER_PX,
            recipe: TransformRecipe::Adaptive,
        }
    }
}

impl ScrollConfig {
    /// Returns the default config with `recipe` selected.
    pub fn with_recipe(recipe: TransformRecipe) -> Self {
        Self {
            recipe,
            ..Self::default()
        }
    }

    /// Computes the header transform for `offset` at `viewport_width`.
    ///
    /// The viewport mode is derived here on every call; callers must not
    /// cache it across samples, since a resize can flip it mid-session.
    pub fn transform_at(&self, offset: f64, viewport_width: f64) -> HeaderTransform {
        let wide = viewport_width > self.breakpoint_px;
        match self.recipe {
            TransformRecipe::FadeOnly => self.fade(offset),
            TransformRecipe::Adaptive if wide => self.fade(offset),
            TransformRecipe::Adaptive => self.shrink(offset),
        }
    }

    fn fade(&self, offset: f64) -> HeaderTransform {
        // Deliberately unclamped: offsets past the fade distance push the
        // value negative and the styling layer treats it as fully
        // transparent.
        HeaderTransform {
            opacity: Some(1.0 - offset / self.fade_distance_px),
            scale: None,
            height_px: None,
        }
    }

    fn shrink(&self, offset: f64) -> HeaderTransform {
        let scale = (1.0 - offset * self.scale_rate_per_px).max(self.scale_floor);
        let height = (self.height_max_px - offset * self.height_rate_per_px)
            .max(self.height_floor_px);
        HeaderTransform {
            opacity: None,
            scale: Some(scale),
            height_px: Some(height),
        }
    }
}

/// Style values to apply to the header for one scroll sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeaderTransform {
    /// Opacity, when the fade recipe ran. May leave the `[0, 1]` range.
    pub opacity: Option<f64>,
    /// Scale factor, when the shrink recipe ran.
    pub scale: Option<f64>,
    /// Explicit height in pixels, when the shrink recipe ran.
    pub height_px: Option<f64>,
}

impl HeaderTransform {
    /// Renders the transform as an inline `style` attribute payload.
    pub fn inline_style(&self) -> String {
        let mut style = String::new();
        if let Some(opacity) = self.opacity {
            style.push_str(&format!("opacity:{opacity};"));
        }
        if let Some(scale) = self.scale {
            style.push_str(&format!("transform:scale({scale});"));
        }
        if let Some(height) = self.height_px {
            style.push_str(&format!("height:{height}px;"));
        }
        style
    }
}

/// Scroll listener with an explicit attach/detach lifecycle.
pub struct ScrollController {
    config: ScrollConfig,
    target: String,
    attached: bool,
}

impl ScrollController {
    /// Builds a detached controller for the element at `target`.
    pub fn new(config: ScrollConfig, target: impl Into<String>) -> Self {
        Self {
            config,
            target: target.into(),
            attached: false,
        }
    }

    /// Returns the configured recipe and knobs.
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Selector of the element the transforms apply to.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether the controller currently observes scroll samples.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Verifies the target exists in `host` and starts observing samples.
    ///
    /// A missing target is a markup mismatch, not a runtime condition to
    /// recover from; callers are expected to propagate the error.
    pub fn attach(&mut self, host: &Html) -> Result<(), MarkupError> {
        markup::require_first(host, &self.target)?;
        self.attached = true;
        Ok(())
    }

    /// Stops observing samples.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// Handles one scroll notification. Returns `None` while detached.
    pub fn on_scroll(&self, sample: &ScrollSample, viewport_width: f64) -> Option<HeaderTransform> {
        self.attached
            .then(|| self.config.transform_at(sample.offset(), viewport_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDE: f64 = 1024.0;
    const NARROW: f64 = 480.0;

    #[test]
    fn wide_opacity_is_a_pure_function_of_offset() {
        let config = ScrollConfig::default();
        assert_eq!(config.transform_at(0.0, WIDE).opacity, Some(1.0));
        assert_eq!(config.transform_at(200.0, WIDE).opacity, Some(0.0));
        // Past the fade distance the value goes negative; no clamping.
        assert_eq!(config.transform_at(400.0, WIDE).opacity, Some(-1.0));
    }

    #[test]
    fn narrow_height_shrinks_to_the_floor() {
        let config = ScrollConfig::default();
        assert_eq!(config.transform_at(0.0, NARROW).height_px, Some(200.0));
        assert_eq!(config.transform_at(280.0, NARROW).height_px, Some(60.0));
        assert_eq!(config.transform_at(1000.0, NARROW).height_px, Some(60.0));
    }

    #[test]
    fn narrow_scale_holds_at_one_with_the_zero_rate() {
        let config = ScrollConfig::default();
        for offset in [0.0, 150.0, 5000.0] {
            assert_eq!(config.transform_at(offset, NARROW).scale, Some(1.0));
        }
    }

    #[test]
    fn scale_floor_engages_once_the_rate_is_real() {
        let config = ScrollConfig {
            scale_rate_per_px: 0.01,
            ..ScrollConfig::default()
        };
        assert_eq!(config.transform_at(1000.0, NARROW).scale, Some(SCALE_FLOOR));
    }

    #[test]
    fn fade_only_recipe_ignores_the_breakpoint() {
        let config = ScrollConfig::with_recipe(TransformRecipe::FadeOnly);
        let transform = config.transform_at(100.0, NARROW);
        assert_eq!(transform.opacity, Some(0.5));
        assert_eq!(transform.height_px, None);
    }

    #[test]
    fn offset_sources_resolve_in_order() {
        let sample = ScrollSample {
            scroll_y: None,
            document_element: Some(40.0),
            body: Some(99.0),
        };
        assert_eq!(sample.offset(), 40.0);

        let body_only = ScrollSample {
            body: Some(7.0),
            ..ScrollSample::default()
        };
        assert_eq!(body_only.offset(), 7.0);
        assert_eq!(ScrollSample::default().offset(), 0.0);
    }

    #[test]
    fn controller_lifecycle_gates_samples() {
        let host = Html::parse_document("<div id=\"header\"><h1>Blog</h1></div>");
        let mut controller =
            ScrollController::new(ScrollConfig::default(), "#header");
        assert!(controller.on_scroll(&ScrollSample::at(10.0), WIDE).is_none());

        controller.attach(&host).expect("target present");
        let transform = controller
            .on_scroll(&ScrollSample::at(100.0), WIDE)
            .expect("attached");
        assert_eq!(transform.opacity, Some(0.5));

        controller.detach();
        assert!(controller.on_scroll(&ScrollSample::at(100.0), WIDE).is_none());
    }

    #[test]
    fn attach_fails_fast_on_a_missing_target() {
        let host = Html::parse_document("<main>no header here</main>");
        let mut controller =
            ScrollController::new(ScrollConfig::default(), "#header");
        let err = controller.attach(&host).unwrap_err();
        assert!(matches!(err, MarkupError::MissingElement { .. }));
        assert!(!controller.is_attached());
    }

    #[test]
    fn inline_style_renders_present_fields_only() {
        let fade = HeaderTransform {
            opacity: Some(0.5),
            scale: None,
            height_px: None,
        };
        assert_eq!(fade.inline_style(), "opacity:0.5;");

        let shrink = HeaderTransform {
            opacity: None,
            scale: Some(1.0),
            height_px: Some(120.0),
        };
        assert_eq!(shrink.inline_style(), "transform:scale(1);height:120px;");
    }
}
