//! Box layout over the document tree.
//!
//! Supports the subset of CSS the resume templates use: block flow, single-axis
//! flex rows (fixed and percentage widths, `flex: 1`, `gap`, wrapping, the common
//! `justify-content` / `align-items` values), box edges, explicit and minimum
//! heights, absolute positioning, images and wrapped text. Transforms do not
//! affect layout; they are recorded on the box for the painter.
//!
//! Sizing follows `box-sizing: border-box` throughout.

use crate::dom::style::{
    parse_transform_origin, Background, BorderSide, Length, Rgba, Side, TransformFn,
};
use crate::dom::{Document, InlineStyle, NodeData, NodeId};
use crate::layout::font_metrics::{wrap_with, FontFamily, StaticMetrics, TextMeasure};

pub const DEFAULT_FONT_SIZE: f32 = 16.0;
pub const DEFAULT_LINE_HEIGHT: f32 = 1.2;
/// Size of an `img` with no width or height.
pub const DEFAULT_IMAGE_SIZE: f32 = 64.0;

const TOP: usize = 0;
const RIGHT: usize = 1;
const BOTTOM: usize = 2;
const LEFT: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LineHeight {
    Multiplier(f32),
    Px(f32),
}

/// Inherited text properties.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub family: FontFamily,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: Rgba,
    pub align: TextAlign,
    line_height: LineHeight,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            family: FontFamily::default(),
            size: DEFAULT_FONT_SIZE,
            bold: false,
            italic: false,
            color: Rgba::BLACK,
            align: TextAlign::Left,
            line_height: LineHeight::Multiplier(DEFAULT_LINE_HEIGHT),
        }
    }
}

impl TextStyle {
    pub fn line_height_px(&self) -> f32 {
        match self.line_height {
            LineHeight::Multiplier(m) => m * self.size,
            LineHeight::Px(px) => px,
        }
    }

    /// The style a child of an element with `style` sees.
    pub fn inherit(&self, style: &InlineStyle) -> TextStyle {
        let mut next = self.clone();
        if let Some(Length::Px(px)) = style.length("font-size") {
            next.size = px;
        }
        if let Some(family) = style.get("font-family") {
            next.family = FontFamily::from_css(family);
        }
        if let Some(weight) = style.get("font-weight") {
            next.bold = match weight.trim() {
                "bold" | "bolder" => true,
                "normal" | "lighter" => false,
                n => n.parse::<u16>().map(|w| w >= 600).unwrap_or(next.bold),
            };
        }
        if let Some(font_style) = style.get("font-style") {
            next.italic = matches!(font_style.trim(), "italic" | "oblique");
        }
        if let Some(color) = style.color("color") {
            next.color = color;
        }
        if let Some(align) = style.get("text-align") {
            next.align = match align.trim() {
                "center" => TextAlign::Center,
                "right" | "end" => TextAlign::Right,
                _ => TextAlign::Left,
            };
        }
        match style.length("line-height") {
            Some(Length::Number(m)) => next.line_height = LineHeight::Multiplier(m),
            Some(Length::Percent(p)) => next.line_height = LineHeight::Multiplier(p / 100.0),
            Some(Length::Px(px)) => next.line_height = LineHeight::Px(px),
            _ => {}
        }
        next
    }

    /// The style inherited by `node` from its ancestors.
    pub fn inherited_by(doc: &Document, node: NodeId) -> TextStyle {
        doc.ancestors(node)
            .iter()
            .rev()
            .filter_map(|a| doc.style(*a))
            .fold(TextStyle::default(), |acc, style| acc.inherit(style))
    }
}

/// One laid-out line of text. `y` is the top of the line box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoxContent {
    Block,
    Image { src: String },
    Text { lines: Vec<TextLine>, style: TextStyle },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoration {
    pub background: Option<Background>,
    /// Top, right, bottom, left.
    pub borders: [Option<BorderSide>; 4],
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    pub node: NodeId,
    /// Border box.
    pub rect: Rect,
    pub content: BoxContent,
    pub decoration: Decoration,
    pub transforms: Vec<TransformFn>,
    pub transform_origin: (Length, Length),
    pub children: Vec<LayoutBox>,
}

impl LayoutBox {
    /// Full content extent measured from the top of this box, including
    /// descendants that overflow it.
    pub fn scroll_height(&self) -> f32 {
        (self.max_bottom() - self.rect.y).max(self.rect.height)
    }

    fn max_bottom(&self) -> f32 {
        self.children
            .iter()
            .map(LayoutBox::max_bottom)
            .fold(self.rect.bottom(), f32::max)
    }

    /// The box generated for `node`, if it is in this subtree.
    pub fn find(&self, node: NodeId) -> Option<&LayoutBox> {
        if self.node == node {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(node))
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.rect.x += dx;
        self.rect.y += dy;
        if let BoxContent::Text { lines, .. } = &mut self.content {
            for line in lines {
                line.x += dx;
                line.y += dy;
            }
        }
        for child in &mut self.children {
            child.translate(dx, dy);
        }
    }

    pub fn image_sources(&self) -> Vec<&str> {
        let mut out = Vec::new();
        if let BoxContent::Image { src } = &self.content {
            out.push(src.as_str());
        }
        for child in &self.children {
            out.extend(child.image_sources());
        }
        out
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry points
// ────────────────────────────────────────────────────────────────────────────

/// Lays out `root` and its subtree inside a containing block `available_width`
/// pixels wide, with the root's margin box at the origin.
///
/// Returns `None` when the node does not exist or is `display: none`.
pub fn layout_subtree(doc: &Document, root: NodeId, available_width: f32) -> Option<LayoutBox> {
    layout_subtree_with(doc, root, available_width, &StaticMetrics)
}

/// `layout_subtree` with text measured by `measure` instead of the static tables.
pub fn layout_subtree_with(
    doc: &Document,
    root: NodeId,
    available_width: f32,
    measure: &dyn TextMeasure,
) -> Option<LayoutBox> {
    let inherited = TextStyle::inherited_by(doc, root);
    let engine = Engine { doc, measure };
    engine
        .layout_node(root, 0.0, 0.0, available_width, &inherited, None)
        .map(|placed| placed.layout)
}

/// Width of `node` as the user sees it in a viewport `viewport_width` pixels wide:
/// the border-box width times the scale factors of the node and every ancestor.
///
/// `None` when the node is not attached or not rendered.
pub fn rendered_width(doc: &Document, node: NodeId, viewport_width: f32) -> Option<f32> {
    if !doc.is_attached(node) {
        return None;
    }
    let page = layout_subtree(doc, doc.body(), viewport_width)?;
    let layout = page.find(node)?;
    let scale: f32 = std::iter::once(node)
        .chain(doc.ancestors(node))
        .map(|n| horizontal_scale(doc, n))
        .product();
    Some(layout.rect.width * scale)
}

fn horizontal_scale(doc: &Document, node: NodeId) -> f32 {
    doc.style(node)
        .map(|style| {
            style
                .transforms()
                .iter()
                .map(|t| match t {
                    TransformFn::Scale(sx, _) => *sx,
                    _ => 1.0,
                })
                .product()
        })
        .unwrap_or(1.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

struct Placed {
    layout: LayoutBox,
    outer_height: f32,
    /// Height may be stretched by a flex row.
    stretchable: bool,
}

struct FlexItem {
    node: NodeId,
    basis: f32,
    grow: f32,
    fixed: bool,
    margin_h: f32,
}

struct Engine<'a> {
    doc: &'a Document,
    measure: &'a dyn TextMeasure,
}

impl<'a> Engine<'a> {
    fn layout_node(
        &self,
        node: NodeId,
        x: f32,
        y: f32,
        containing_width: f32,
        text: &TextStyle,
        forced_width: Option<f32>,
    ) -> Option<Placed> {
        match self.doc.data(node)? {
            NodeData::Text(raw) => {
                let width = forced_width.unwrap_or(containing_width);
                Some(self.layout_text(node, raw, x, y, width, text))
            }
            NodeData::Element(el) => {
                let style = &el.style;
                if is_hidden(style) {
                    return None;
                }
                let is_image = el.tag == "img";
                let src = el.src.clone();
                self.layout_element(
                    node,
                    style,
                    x,
                    y,
                    containing_width,
                    text,
                    forced_width,
                    is_image.then(|| src.unwrap_or_default()),
                )
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_element(
        &self,
        node: NodeId,
        style: &InlineStyle,
        x: f32,
        y: f32,
        containing_width: f32,
        parent_text: &TextStyle,
        forced_width: Option<f32>,
        image_src: Option<String>,
    ) -> Option<Placed> {
        let text = parent_text.inherit(style);
        let (mut margin, auto_margin) = edges(style, "margin", containing_width);
        let (padding, _) = edges(style, "padding", containing_width);
        let borders = Side::ALL.map(|side| style.border(side));
        let bw = borders.map(|b| b.map_or(0.0, |b| b.width));

        let specified_width = style
            .length("width")
            .and_then(|l| l.resolve(containing_width));
        let mut width = match (forced_width, specified_width, &image_src) {
            (Some(w), _, _) => w,
            (None, Some(w), _) => w,
            (None, None, Some(_)) => DEFAULT_IMAGE_SIZE,
            (None, None, None) => (containing_width - margin[LEFT] - margin[RIGHT]).max(0.0),
        };
        if let Some(max) = style
            .length("max-width")
            .and_then(|l| l.resolve(containing_width))
        {
            width = width.min(max);
        }
        if forced_width.is_none() && auto_margin[LEFT] && auto_margin[RIGHT] {
            let free = (containing_width - width).max(0.0) / 2.0;
            margin[LEFT] = free;
            margin[RIGHT] = free;
        }

        let bx = x + margin[LEFT];
        let by = y + margin[TOP];
        let cx = bx + bw[LEFT] + padding[LEFT];
        let cy = by + bw[TOP] + padding[TOP];
        let content_width =
            (width - bw[LEFT] - bw[RIGHT] - padding[LEFT] - padding[RIGHT]).max(0.0);
        let inset_v = bw[TOP] + bw[BOTTOM] + padding[TOP] + padding[BOTTOM];

        let explicit_height = style.length("height").and_then(fixed_px);
        let (children, content_height, content) = match image_src {
            Some(src) => {
                let h = explicit_height.unwrap_or(width);
                (Vec::new(), h - inset_v, BoxContent::Image { src })
            }
            None if is_flex_row(style) => {
                let (children, h) = self.flex_row(node, style, cx, cy, content_width, &text);
                (children, h, BoxContent::Block)
            }
            None => {
                let gap = if is_flex(style) {
                    gaps(style, content_width).0
                } else {
                    0.0
                };
                let (children, h) = self.block_flow(node, cx, cy, content_width, &text, gap);
                (children, h, BoxContent::Block)
            }
        };

        let mut height = explicit_height.unwrap_or(content_height + inset_v);
        if let Some(min) = style.length("min-height").and_then(fixed_px) {
            height = height.max(min);
        }
        let height = height.max(0.0);

        let radius = style
            .length("border-radius")
            .and_then(|l| l.resolve(width))
            .unwrap_or(0.0);

        let layout = LayoutBox {
            node,
            rect: Rect {
                x: bx,
                y: by,
                width,
                height,
            },
            content,
            decoration: Decoration {
                background: style.background(),
                borders,
                radius,
            },
            transforms: style.transforms(),
            transform_origin: parse_transform_origin(style.get("transform-origin")),
            children,
        };
        Some(Placed {
            layout,
            outer_height: margin[TOP] + height + margin[BOTTOM],
            stretchable: explicit_height.is_none(),
        })
    }

    // ── block flow ──────────────────────────────────────────────────────────

    fn block_flow(
        &self,
        parent: NodeId,
        cx: f32,
        cy: f32,
        content_width: f32,
        text: &TextStyle,
        gap: f32,
    ) -> (Vec<LayoutBox>, f32) {
        let mut boxes = Vec::new();
        let mut cursor = cy;
        let mut placed_any = false;

        for child in self.doc.children(parent) {
            if let Some(style) = self.doc.style(child) {
                if style.get("position") == Some("absolute") {
                    if let Some(placed) =
                        self.layout_absolute(child, style, cx, cursor, content_width, text)
                    {
                        boxes.push(placed.layout);
                    }
                    continue;
                }
            }
            if is_blank_text(self.doc, child) {
                continue;
            }
            let top = if placed_any { cursor + gap } else { cursor };
            if let Some(placed) = self.layout_node(child, cx, top, content_width, text, None) {
                cursor = top + placed.outer_height;
                boxes.push(placed.layout);
                placed_any = true;
            }
        }
        (boxes, cursor - cy)
    }

    fn layout_absolute(
        &self,
        node: NodeId,
        style: &InlineStyle,
        cx: f32,
        cursor: f32,
        content_width: f32,
        text: &TextStyle,
    ) -> Option<Placed> {
        let left = style
            .length("left")
            .and_then(|l| l.resolve(content_width))
            .unwrap_or(0.0);
        let top = style.length("top").and_then(fixed_px);
        let y = top.map_or(cursor, |t| t);
        self.layout_node(node, cx + left, y, content_width, text, None)
    }

    // ── flex rows ───────────────────────────────────────────────────────────

    fn flex_row(
        &self,
        parent: NodeId,
        style: &InlineStyle,
        cx: f32,
        cy: f32,
        content_width: f32,
        text: &TextStyle,
    ) -> (Vec<LayoutBox>, f32) {
        let (row_gap, column_gap) = gaps(style, content_width);
        let wrap = matches!(style.get("flex-wrap"), Some("wrap"));
        let justify = style.get("justify-content").unwrap_or("flex-start");
        let align = style.get("align-items").unwrap_or("stretch");

        let items: Vec<FlexItem> = self
            .doc
            .children(parent)
            .iter()
            .filter(|&&c| !is_blank_text(self.doc, c))
            .filter(|&&c| !self.doc.style(c).is_some_and(is_hidden))
            .map(|&c| self.flex_item(c, content_width, text))
            .collect();

        let mut lines: Vec<Vec<FlexItem>> = Vec::new();
        let mut current: Vec<FlexItem> = Vec::new();
        let mut used = 0.0_f32;
        for item in items {
            let outer = item.basis + item.margin_h;
            if wrap && !current.is_empty() && used + column_gap + outer > content_width {
                lines.push(std::mem::take(&mut current));
                used = 0.0;
            }
            used += if current.is_empty() { outer } else { column_gap + outer };
            current.push(item);
        }
        if !current.is_empty() {
            lines.push(current);
        }

        let mut boxes = Vec::new();
        let mut line_y = cy;
        for (index, line) in lines.iter().enumerate() {
            if index > 0 {
                line_y += row_gap;
            }
            let widths = resolve_line_widths(line, content_width, column_gap);
            let used: f32 = widths.iter().sum::<f32>()
                + line.iter().map(|i| i.margin_h).sum::<f32>()
                + column_gap * line.len().saturating_sub(1) as f32;
            let free = (content_width - used).max(0.0);
            let n = line.len() as f32;
            let (offset, spacing) = match justify.trim() {
                "space-between" if line.len() > 1 => (0.0, free / (n - 1.0)),
                "space-around" => (free / n / 2.0, free / n),
                "center" => (free / 2.0, 0.0),
                "flex-end" | "end" => (free, 0.0),
                _ => (0.0, 0.0),
            };

            let mut x = cx + offset;
            let mut placed_line = Vec::new();
            for (item, width) in line.iter().zip(&widths) {
                if let Some(placed) =
                    self.layout_node(item.node, x, line_y, content_width, text, Some(*width))
                {
                    placed_line.push(placed);
                }
                x += width + item.margin_h + column_gap + spacing;
            }

            let line_height = placed_line
                .iter()
                .map(|p| p.outer_height)
                .fold(0.0_f32, f32::max);
            for mut placed in placed_line {
                let slack = line_height - placed.outer_height;
                match align.trim() {
                    "center" => placed.layout.translate(0.0, slack / 2.0),
                    "flex-end" | "end" => placed.layout.translate(0.0, slack),
                    "stretch" if placed.stretchable && !is_text(&placed.layout) => {
                        placed.layout.rect.height += slack;
                    }
                    _ => {}
                }
                boxes.push(placed.layout);
            }
            line_y += line_height;
        }
        (boxes, line_y - cy)
    }

    fn flex_item(&self, node: NodeId, content_width: f32, text: &TextStyle) -> FlexItem {
        let Some(style) = self.doc.style(node) else {
            return FlexItem {
                node,
                basis: self.max_content_width(node, text).min(content_width),
                grow: 0.0,
                fixed: false,
                margin_h: 0.0,
            };
        };
        let (margin, _) = edges(style, "margin", content_width);
        let margin_h = margin[LEFT] + margin[RIGHT];
        let (grow, zero_basis) = flex_factors(style);
        let explicit = style.length("width").and_then(|l| l.resolve(content_width));
        let basis = match explicit {
            Some(w) => w,
            None if zero_basis => 0.0,
            None => self.max_content_width(node, text).min(content_width),
        };
        FlexItem {
            node,
            basis,
            grow,
            fixed: explicit.is_some(),
            margin_h,
        }
    }

    /// Border-box width the node would take with no line breaks.
    fn max_content_width(&self, node: NodeId, text: &TextStyle) -> f32 {
        match self.doc.data(node) {
            Some(NodeData::Text(raw)) => {
                let joined = raw.split_whitespace().collect::<Vec<_>>().join(" ");
                self.measure_run(&joined, text)
            }
            Some(NodeData::Element(el)) => {
                let style = &el.style;
                if is_hidden(style) {
                    return 0.0;
                }
                if let Some(w) = style.length("width").and_then(fixed_px) {
                    return w;
                }
                if el.tag == "img" {
                    return DEFAULT_IMAGE_SIZE;
                }
                let inner_text = text.inherit(style);
                let (padding, _) = edges(style, "padding", 0.0);
                let bw: f32 = [Side::Left, Side::Right]
                    .iter()
                    .filter_map(|s| style.border(*s))
                    .map(|b| b.width)
                    .sum();
                let children = self.doc.children(node);
                let child_widths = children.iter().map(|&c| {
                    let margin_h = self
                        .doc
                        .style(c)
                        .map(|s| {
                            let (m, _) = edges(s, "margin", 0.0);
                            m[LEFT] + m[RIGHT]
                        })
                        .unwrap_or(0.0);
                    self.max_content_width(c, &inner_text) + margin_h
                });
                let inner = if is_flex_row(style) {
                    let widths: Vec<f32> = child_widths.collect();
                    let gap = gaps(style, 0.0).1;
                    widths.iter().sum::<f32>() + gap * widths.len().saturating_sub(1) as f32
                } else {
                    child_widths.fold(0.0, f32::max)
                };
                inner + padding[LEFT] + padding[RIGHT] + bw
            }
            None => 0.0,
        }
    }

    fn layout_text(
        &self,
        node: NodeId,
        raw: &str,
        x: f32,
        y: f32,
        width: f32,
        text: &TextStyle,
    ) -> Placed {
        let line_height = text.line_height_px();
        let lines: Vec<TextLine> = wrap_with(raw, width, |s| self.measure_run(s, text))
            .into_iter()
            .enumerate()
            .map(|(i, (line, line_width))| {
                let offset = match text.align {
                    TextAlign::Left => 0.0,
                    TextAlign::Center => ((width - line_width) / 2.0).max(0.0),
                    TextAlign::Right => (width - line_width).max(0.0),
                };
                TextLine {
                    text: line,
                    x: x + offset,
                    y: y + i as f32 * line_height,
                    width: line_width,
                    height: line_height,
                }
            })
            .collect();
        let height = lines.len() as f32 * line_height;
        Placed {
            layout: LayoutBox {
                node,
                rect: Rect {
                    x,
                    y,
                    width,
                    height,
                },
                content: BoxContent::Text {
                    lines,
                    style: text.clone(),
                },
                decoration: Decoration::default(),
                transforms: Vec::new(),
                transform_origin: parse_transform_origin(None),
                children: Vec::new(),
            },
            outer_height: height,
            stretchable: false,
        }
    }

    fn measure_run(&self, run: &str, text: &TextStyle) -> f32 {
        self.measure
            .measure_px(run, text.family, text.size, text.bold, text.italic)
    }
}

/// Shrinks or grows a flex line's bases to fill `content_width`.
fn resolve_line_widths(line: &[FlexItem], content_width: f32, gap: f32) -> Vec<f32> {
    let mut widths: Vec<f32> = line.iter().map(|i| i.basis).collect();
    let used: f32 = line.iter().map(|i| i.basis + i.margin_h).sum::<f32>()
        + gap * line.len().saturating_sub(1) as f32;
    let free = content_width - used;

    if free < 0.0 {
        let shrinkable: f32 = line.iter().filter(|i| !i.fixed).map(|i| i.basis).sum();
        if shrinkable > 0.0 {
            for (w, item) in widths.iter_mut().zip(line) {
                if !item.fixed {
                    *w = (*w - -free * item.basis / shrinkable).max(0.0);
                }
            }
        }
        return widths;
    }

    let total_grow: f32 = line.iter().map(|i| i.grow).sum();
    if total_grow > 0.0 {
        for (w, item) in widths.iter_mut().zip(line) {
            *w += free * item.grow / total_grow;
        }
    }
    widths
}

// ────────────────────────────────────────────────────────────────────────────
// Style helpers
// ────────────────────────────────────────────────────────────────────────────

fn is_hidden(style: &InlineStyle) -> bool {
    style.get("display") == Some("none")
}

fn is_flex(style: &InlineStyle) -> bool {
    matches!(style.get("display"), Some("flex") | Some("inline-flex"))
}

fn is_flex_row(style: &InlineStyle) -> bool {
    is_flex(style)
        && !matches!(
            style.get("flex-direction"),
            Some("column") | Some("column-reverse")
        )
}

fn is_text(layout: &LayoutBox) -> bool {
    matches!(layout.content, BoxContent::Text { .. })
}

fn is_blank_text(doc: &Document, node: NodeId) -> bool {
    matches!(doc.data(node), Some(NodeData::Text(t)) if t.trim().is_empty())
}

/// Pixel values that do not depend on a containing size.
fn fixed_px(len: Length) -> Option<f32> {
    match len {
        Length::Px(px) | Length::Number(px) => Some(px),
        Length::Percent(_) | Length::Auto => None,
    }
}

/// Resolved top/right/bottom/left values and which of them were `auto`.
fn edges(style: &InlineStyle, prop: &str, base: f32) -> ([f32; 4], [bool; 4]) {
    let mut values = [0.0; 4];
    let mut auto = [false; 4];
    for (i, side) in Side::ALL.iter().enumerate() {
        match style.edge(prop, *side) {
            Some(Length::Auto) => auto[i] = true,
            Some(len) => values[i] = len.resolve(base).unwrap_or(0.0),
            None => {}
        }
    }
    (values, auto)
}

/// `(row_gap, column_gap)`.
fn gaps(style: &InlineStyle, base: f32) -> (f32, f32) {
    let resolve = |raw: Option<&str>| {
        raw.and_then(Length::parse)
            .and_then(|l| l.resolve(base))
            .unwrap_or(0.0)
    };
    let (mut row, mut column) = match style.get("gap") {
        Some(raw) => {
            let parts: Vec<&str> = raw.split_whitespace().collect();
            let row = resolve(parts.first().copied());
            let column = parts.get(1).map_or(row, |c| resolve(Some(c)));
            (row, column)
        }
        None => (0.0, 0.0),
    };
    if style.get("row-gap").is_some() {
        row = resolve(style.get("row-gap"));
    }
    if style.get("column-gap").is_some() {
        column = resolve(style.get("column-gap"));
    }
    (row, column)
}

/// `(grow, zero_basis)` from `flex` / `flex-grow`.
fn flex_factors(style: &InlineStyle) -> (f32, bool) {
    if let Some(flex) = style.get("flex") {
        let parts: Vec<&str> = flex.split_whitespace().collect();
        return match parts.as_slice() {
            ["none"] => (0.0, false),
            ["auto"] => (1.0, false),
            [grow] => (grow.parse().unwrap_or(0.0), true),
            [grow, _shrink] => (grow.parse().unwrap_or(0.0), true),
            [grow, _shrink, basis, ..] => {
                let zero_basis = Length::parse(basis)
                    .and_then(|b| b.resolve(0.0))
                    .is_some_and(|b| b == 0.0);
                (grow.parse().unwrap_or(0.0), zero_basis)
            }
            [] => (0.0, false),
        };
    }
    let grow = style
        .get("flex-grow")
        .and_then(|g| g.parse().ok())
        .unwrap_or(0.0);
    (grow, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_element(doc: &mut Document, parent: NodeId, tag: &str, css: &str) -> NodeId {
        let id = doc.create_element(tag);
        if let Some(style) = doc.style_mut(id) {
            *style = InlineStyle::parse(css);
        }
        doc.append_child(parent, id);
        id
    }

    fn make_text(doc: &mut Document, parent: NodeId, text: &str) -> NodeId {
        let id = doc.create_text(text);
        doc.append_child(parent, id);
        id
    }

    // ── block flow ──────────────────────────────────────────────────────────

    #[test]
    fn test_block_children_stack_inside_padding() {
        let mut doc = Document::new();
        let body = doc.body();
        let root = make_element(&mut doc, body, "div", "padding: 10px");
        let a = make_element(&mut doc, root, "div", "height: 50px; margin-bottom: 5px");
        let b = make_element(&mut doc, root, "div", "height: 30px; margin-bottom: 5px");

        let layout = layout_subtree(&doc, root, 400.0).unwrap();
        assert_eq!(layout.rect.height, 110.0);
        let a_box = layout.find(a).unwrap();
        let b_box = layout.find(b).unwrap();
        assert_eq!(a_box.rect, Rect { x: 10.0, y: 10.0, width: 380.0, height: 50.0 });
        assert_eq!(b_box.rect.y, 65.0);
    }

    #[test]
    fn test_display_none_is_skipped() {
        let mut doc = Document::new();
        let body = doc.body();
        let root = make_element(&mut doc, body, "div", "");
        let hidden = make_element(&mut doc, root, "div", "display: none; height: 80px");
        make_element(&mut doc, root, "div", "height: 20px");

        let layout = layout_subtree(&doc, root, 300.0).unwrap();
        assert!(layout.find(hidden).is_none());
        assert_eq!(layout.rect.height, 20.0);
    }

    #[test]
    fn test_min_height_and_scroll_height() {
        let mut doc = Document::new();
        let body = doc.body();
        let short = make_element(&mut doc, body, "div", "width: 794px; min-height: 1123px");
        make_element(&mut doc, short, "div", "height: 100px");
        let layout = layout_subtree(&doc, short, 794.0).unwrap();
        assert_eq!(layout.rect.height, 1123.0);
        assert_eq!(layout.scroll_height(), 1123.0);

        let tall = make_element(&mut doc, body, "div", "width: 794px; min-height: 1123px");
        make_element(&mut doc, tall, "div", "height: 2000px");
        let layout = layout_subtree(&doc, tall, 794.0).unwrap();
        assert_eq!(layout.scroll_height(), 2000.0);
    }

    #[test]
    fn test_auto_margins_centre_sized_block() {
        let mut doc = Document::new();
        let body = doc.body();
        let root = make_element(&mut doc, body, "div", "");
        let inner = make_element(
            &mut doc,
            root,
            "div",
            "width: 200px; margin: 0 auto; height: 10px",
        );
        let layout = layout_subtree(&doc, root, 600.0).unwrap();
        assert_eq!(layout.find(inner).unwrap().rect.x, 200.0);
    }

    // ── text ────────────────────────────────────────────────────────────────

    #[test]
    fn test_text_wraps_and_sets_height() {
        let mut doc = Document::new();
        let body = doc.body();
        let p = make_element(
            &mut doc,
            body,
            "p",
            "font-size: 10px; line-height: 1.5; width: 120px",
        );
        let text = make_text(
            &mut doc,
            p,
            "Led development teams and delivered projects that improved engagement",
        );
        let layout = layout_subtree(&doc, p, 800.0).unwrap();
        let text_box = layout.find(text).unwrap();
        let BoxContent::Text { lines, style } = &text_box.content else {
            panic!("expected text content");
        };
        assert!(lines.len() > 1);
        assert_eq!(style.line_height_px(), 15.0);
        assert_eq!(layout.rect.height, lines.len() as f32 * 15.0);
        assert!(lines.iter().all(|l| l.width <= 120.0));
    }

    /// Every character advances by the same amount.
    struct FixedAdvance(f32);

    impl TextMeasure for FixedAdvance {
        fn measure_px(&self, text: &str, _: FontFamily, _: f32, _: bool, _: bool) -> f32 {
            text.chars().count() as f32 * self.0
        }
    }

    #[test]
    fn test_text_is_wrapped_with_the_given_measure() {
        let mut doc = Document::new();
        let body = doc.body();
        let p = make_element(&mut doc, body, "p", "width: 100px; text-align: right");
        let text = make_text(&mut doc, p, "aaaa bbbb cccc");

        let layout = layout_subtree_with(&doc, p, 800.0, &FixedAdvance(10.0)).unwrap();
        let BoxContent::Text { lines, .. } = &layout.find(text).unwrap().content else {
            panic!("expected text content");
        };
        let placed: Vec<(&str, f32, f32)> =
            lines.iter().map(|l| (l.text.as_str(), l.x, l.width)).collect();
        assert_eq!(placed, vec![("aaaa bbbb", 10.0, 90.0), ("cccc", 60.0, 40.0)]);
    }

    #[test]
    fn test_text_style_inherits_through_ancestors() {
        let mut doc = Document::new();
        let body = doc.body();
        let outer = make_element(
            &mut doc,
            body,
            "div",
            "font-size: 11px; color: #fff; font-weight: 700",
        );
        let inner = make_element(&mut doc, outer, "span", "");
        let style = TextStyle::inherited_by(&doc, inner);
        assert_eq!(style.size, 11.0);
        assert!(style.bold);
        assert_eq!(style.color, Rgba::WHITE);
    }

    // ── flex ────────────────────────────────────────────────────────────────

    #[test]
    fn test_flex_row_percent_and_grow() {
        let mut doc = Document::new();
        let body = doc.body();
        let row = make_element(&mut doc, body, "div", "display: flex");
        let side = make_element(&mut doc, row, "div", "width: 33.333%; padding: 24px");
        let main = make_element(&mut doc, row, "div", "flex: 1; padding: 24px");
        make_element(&mut doc, main, "div", "height: 300px");

        let layout = layout_subtree(&doc, row, 600.0).unwrap();
        let side_box = layout.find(side).unwrap();
        let main_box = layout.find(main).unwrap();
        assert!((side_box.rect.width - 200.0).abs() < 0.01);
        assert!((main_box.rect.width - 400.0).abs() < 0.01);
        assert!((main_box.rect.x - 200.0).abs() < 0.01);
        // Stretched to the tallest item.
        assert_eq!(side_box.rect.height, main_box.rect.height);
    }

    #[test]
    fn test_space_between_pushes_last_item_right() {
        let mut doc = Document::new();
        let body = doc.body();
        let row = make_element(
            &mut doc,
            body,
            "div",
            "display: flex; justify-content: space-between",
        );
        make_element(&mut doc, row, "div", "width: 100px; height: 10px");
        let last = make_element(&mut doc, row, "div", "width: 100px; height: 10px");
        let layout = layout_subtree(&doc, row, 500.0).unwrap();
        assert_eq!(layout.find(last).unwrap().rect.x, 400.0);
    }

    #[test]
    fn test_flex_wrap_starts_new_line() {
        let mut doc = Document::new();
        let body = doc.body();
        let row = make_element(&mut doc, body, "div", "display: flex; flex-wrap: wrap; gap: 10px");
        make_element(&mut doc, row, "div", "width: 200px; height: 20px");
        make_element(&mut doc, row, "div", "width: 200px; height: 20px");
        let third = make_element(&mut doc, row, "div", "width: 200px; height: 20px");
        let layout = layout_subtree(&doc, row, 500.0).unwrap();
        let third_box = layout.find(third).unwrap();
        assert_eq!(third_box.rect.x, 0.0);
        assert_eq!(third_box.rect.y, 30.0);
        assert_eq!(layout.rect.height, 50.0);
    }

    #[test]
    fn test_flex_column_uses_gap() {
        let mut doc = Document::new();
        let body = doc.body();
        let col = make_element(
            &mut doc,
            body,
            "div",
            "display: flex; flex-direction: column; gap: 4px",
        );
        make_element(&mut doc, col, "div", "height: 10px");
        let second = make_element(&mut doc, col, "div", "height: 10px");
        let layout = layout_subtree(&doc, col, 100.0).unwrap();
        assert_eq!(layout.find(second).unwrap().rect.y, 14.0);
    }

    // ── rendered width ──────────────────────────────────────────────────────

    #[test]
    fn test_rendered_width_applies_ancestor_scale() {
        let mut doc = Document::new();
        let body = doc.body();
        let wrapper = make_element(
            &mut doc,
            body,
            "div",
            "transform: scale(0.5); transform-origin: top left",
        );
        let page = make_element(&mut doc, wrapper, "div", "width: 794px");
        let width = rendered_width(&doc, page, 1280.0).unwrap();
        assert!((width - 397.0).abs() < 0.01);

        let detached = doc.create_element("div");
        assert_eq!(rendered_width(&doc, detached, 1280.0), None);
    }
}
