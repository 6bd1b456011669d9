// Box layout for the document tree: pluggable text measurement, greedy line wrapping,
// block and flex flow. Pure functions over a borrowed `Document`; callers that
// need it off the async executor run it inside `tokio::task::spawn_blocking`.

pub mod flow;
pub mod font_metrics;

pub use flow::{
    layout_subtree, layout_subtree_with, rendered_width, BoxContent, LayoutBox, Rect, TextLine,
    TextStyle,
};
pub use font_metrics::{get_metrics, FontFamily, StaticMetrics, TextMeasure};
