//! Plain-terminal rendering of block frames.

use smartfeed_core::pipeline::{BlockView, RenderFrame, ViewSource};
use smartfeed_core::ThemeMode;

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Skeleton rows printed while a block has nothing to show yet
const SKELETON_ROWS: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    heading: &'static str,
    muted: &'static str,
    reset: &'static str,
}

impl Palette {
    pub fn for_theme(theme: ThemeMode) -> Self {
        if theme.is_dark(system_prefers_dark()) {
            Self {
                heading: BOLD,
                muted: DIM,
                reset: RESET,
            }
        } else {
            Self {
                heading: BOLD,
                muted: "",
                reset: RESET,
            }
        }
    }

    pub fn plain() -> Self {
        Self {
            heading: "",
            muted: "",
            reset: "",
        }
    }
}

/// Terminals that export `COLORFGBG` ("fg;bg") tell us the background colour.
/// Without it, assume dark.
fn system_prefers_dark() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|v| v.rsplit(';').next().and_then(|bg| bg.parse::<u8>().ok()))
        .map(|bg| bg < 7 || bg == 8)
        .unwrap_or(true)
}

fn source_label(view: &BlockView) -> String {
    match (view.source, &view.cache_age) {
        (ViewSource::Placeholder, _) => "loading".to_string(),
        (ViewSource::Network, _) => "live".to_string(),
        (ViewSource::Cache, Some(age)) => format!("cached {}", age),
        (ViewSource::Cache, None) => "cached".to_string(),
        (ViewSource::Default, _) => "offline".to_string(),
    }
}

pub fn render_frame(frame: &RenderFrame, palette: Palette) -> String {
    let view = &frame.view;
    let p = palette;
    let mut out = format!(
        "{}{}{} {}[{} | {}]{}\n",
        p.heading,
        view.title,
        p.reset,
        p.muted,
        frame.state,
        source_label(view),
        p.reset
    );

    if view.items.is_empty() {
        if view.loading {
            for _ in 0..SKELETON_ROWS {
                out.push_str(&format!("  {}░░░░░░░░░░░░░░░░░░░░{}\n", p.muted, p.reset));
            }
        }
        return out;
    }

    for (i, item) in view.items.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, item.title));
        let mut meta = vec![item.published.clone(), format!("{} مشاهدة", item.views)];
        if let Some(ref category) = item.category {
            meta.insert(0, category.clone());
        }
        out.push_str(&format!("     {}{} · {}{}\n", p.muted, meta.join(" · "), item.path, p.reset));
    }
    out
}
