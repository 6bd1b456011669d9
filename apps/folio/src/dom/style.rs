//! Inline style declarations and the value parsers layout and paint rely on.
//!
//! Only the subset of CSS the resume templates emit is understood. Unknown
//! properties are kept verbatim so a clone round-trips its styles.

use std::fmt::Write as _;

use cssparser::{Delimiter, ParseError, Parser, ParserInput, Token};

/// CSS reference pixels per millimetre (96 px per inch).
pub const PX_PER_MM: f32 = 96.0 / 25.4;

// ────────────────────────────────────────────────────────────────────────────
// Declarations
// ────────────────────────────────────────────────────────────────────────────

/// Ordered `property: value` pairs of an element's `style` attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    decls: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn parse(css: &str) -> Self {
        let mut style = InlineStyle::default();
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        while !parser.is_exhausted() {
            let decl = parser.parse_until_after(Delimiter::Semicolon, parse_declaration);
            if let Ok((name, value)) = decl {
                style.set(&name, &value);
            }
        }
        style
    }

    pub fn get(&self, prop: &str) -> Option<&str> {
        let prop = prop.trim().to_ascii_lowercase();
        self.decls
            .iter()
            .find(|(p, _)| *p == prop)
            .map(|(_, v)| v.as_str())
    }

    /// Sets a declaration in place (keeping its position) or appends it.
    /// An empty value removes the property, as assigning `""` through the CSSOM does.
    pub fn set(&mut self, prop: &str, value: &str) {
        let prop = prop.trim().to_ascii_lowercase();
        let value = value.trim();
        if prop.is_empty() {
            return;
        }
        if value.is_empty() {
            self.remove(&prop);
            return;
        }
        match self.decls.iter_mut().find(|(p, _)| *p == prop) {
            Some((_, v)) => *v = value.to_string(),
            None => self.decls.push((prop, value.to_string())),
        }
    }

    pub fn remove(&mut self, prop: &str) {
        let prop = prop.trim().to_ascii_lowercase();
        self.decls.retain(|(p, _)| *p != prop);
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.decls.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for (i, (p, v)) in self.decls.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{p}: {v};");
        }
        out
    }

    pub fn length(&self, prop: &str) -> Option<Length> {
        self.get(prop).and_then(Length::parse)
    }

    pub fn color(&self, prop: &str) -> Option<Rgba> {
        self.get(prop).and_then(Rgba::parse)
    }

    /// Resolves one side of a box property, honouring the shorthand and the
    /// longhand (`padding-left` wins over `padding`).
    pub fn edge(&self, shorthand: &str, side: Side) -> Option<Length> {
        let longhand = format!("{shorthand}-{}", side.as_str());
        if let Some(len) = self.length(&longhand) {
            return Some(len);
        }
        let parts = parse_value(self.get(shorthand)?, |p| {
            let mut parts = Vec::new();
            while let Ok(token) = p.next() {
                parts.push(token_length(token)?);
            }
            Some(parts)
        })?;
        let [top, right, bottom, left] = match parts.as_slice() {
            [all] => [*all; 4],
            [v, h] => [*v, *h, *v, *h],
            [t, h, b] => [*t, *h, *b, *h],
            [t, r, b, l, ..] => [*t, *r, *b, *l],
            [] => return None,
        };
        Some(match side {
            Side::Top => top,
            Side::Right => right,
            Side::Bottom => bottom,
            Side::Left => left,
        })
    }

    /// Border width and colour for one side (`border-<side>` overrides `border`).
    pub fn border(&self, side: Side) -> Option<BorderSide> {
        let longhand = format!("border-{}", side.as_str());
        self.get(&longhand)
            .or_else(|| self.get("border"))
            .and_then(BorderSide::parse)
    }

    pub fn background(&self) -> Option<Background> {
        self.get("background")
            .or_else(|| self.get("background-image"))
            .or_else(|| self.get("background-color"))
            .and_then(Background::parse)
    }

    pub fn transforms(&self) -> Vec<TransformFn> {
        self.get("transform").map(parse_transform).unwrap_or_default()
    }
}

/// `name: value` up to the next `;`, with the value kept as written.
fn parse_declaration<'i>(p: &mut Parser<'i, '_>) -> Result<(String, String), ParseError<'i, ()>> {
    let name = p.expect_ident()?.to_string();
    p.expect_colon()?;
    p.skip_whitespace();
    let start = p.position();
    while p.next().is_ok() {}
    Ok((name, p.slice_from(start).to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    fn as_str(&self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lengths
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f32),
    Percent(f32),
    /// Unitless number (line-height multipliers, `0`).
    Number(f32),
    Auto,
}

impl Length {
    pub fn parse(raw: &str) -> Option<Length> {
        parse_value(raw, |p| token_length(p.next().ok()?))
    }

    /// Pixel value against `base` (used for percentages). `Auto` resolves to `None`.
    pub fn resolve(&self, base: f32) -> Option<f32> {
        match *self {
            Length::Px(px) => Some(px),
            Length::Percent(p) => Some(base * p / 100.0),
            Length::Number(n) if n == 0.0 => Some(0.0),
            Length::Number(n) => Some(n),
            Length::Auto => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Colours and backgrounds
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }

    pub fn parse(raw: &str) -> Option<Rgba> {
        parse_value(raw, parse_color)
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => Some(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Rgba {
            a: nibble(3)?,
            ..Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)
        }),
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a: byte(6)?,
        }),
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Rgba> {
    Some(match name.to_ascii_lowercase().as_str() {
        "white" => Rgba::WHITE,
        "black" => Rgba::BLACK,
        "transparent" => Rgba::TRANSPARENT,
        "gray" | "grey" => Rgba::rgb(128, 128, 128),
        "silver" => Rgba::rgb(192, 192, 192),
        "red" => Rgba::rgb(255, 0, 0),
        "green" => Rgba::rgb(0, 128, 0),
        "blue" => Rgba::rgb(0, 0, 255),
        "navy" => Rgba::rgb(0, 0, 128),
        "orange" => Rgba::rgb(255, 165, 0),
        "purple" => Rgba::rgb(128, 0, 128),
        _ => return None,
    })
}

/// One colour value: `#hex`, a named colour, or `rgb()`/`rgba()`.
fn parse_color(p: &mut Parser<'_, '_>) -> Option<Rgba> {
    let token = p.next().ok()?.clone();
    match token {
        Token::Hash(ref hex) | Token::IDHash(ref hex) => parse_hex(hex),
        Token::Ident(ref name) => named_color(name),
        Token::Function(ref name)
            if name.eq_ignore_ascii_case("rgb") || name.eq_ignore_ascii_case("rgba") =>
        {
            nested(p, parse_rgb_args)
        }
        _ => None,
    }
}

/// Arguments of `rgb()`/`rgba()`, comma or space separated, with an
/// optional alpha after `/` or a fourth comma.
fn parse_rgb_args(p: &mut Parser<'_, '_>) -> Option<Rgba> {
    let mut channels = Vec::with_capacity(4);
    while let Ok(token) = p.next() {
        match *token {
            Token::Number { value, .. } => channels.push((value, false)),
            Token::Percentage { unit_value, .. } => channels.push((unit_value, true)),
            Token::Comma | Token::Delim('/') => {}
            _ => return None,
        }
    }
    let channel = |(value, percent): (f32, bool)| {
        let v = if percent { value * 255.0 } else { value };
        v.clamp(0.0, 255.0).round() as u8
    };
    let alpha = |(value, _): (f32, bool)| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    match channels.as_slice() {
        [r, g, b] => Some(Rgba::rgb(channel(*r), channel(*g), channel(*b))),
        [r, g, b, a] => Some(Rgba {
            a: alpha(*a),
            ..Rgba::rgb(channel(*r), channel(*g), channel(*b))
        }),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientDirection {
    ToRight,
    ToLeft,
    ToBottom,
    ToTop,
}

impl GradientDirection {
    fn from_side(side: &str) -> Option<Self> {
        match side.to_ascii_lowercase().as_str() {
            "right" => Some(GradientDirection::ToRight),
            "left" => Some(GradientDirection::ToLeft),
            "top" => Some(GradientDirection::ToTop),
            "bottom" => Some(GradientDirection::ToBottom),
            _ => None,
        }
    }

    /// Snaps an angle to the nearest axis (`90deg` points right).
    fn from_degrees(deg: f32) -> Self {
        match ((deg.rem_euclid(360.0) + 45.0) / 90.0) as u32 % 4 {
            0 => GradientDirection::ToTop,
            1 => GradientDirection::ToRight,
            2 => GradientDirection::ToBottom,
            _ => GradientDirection::ToLeft,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Solid(Rgba),
    LinearGradient {
        direction: GradientDirection,
        stops: Vec<Rgba>,
    },
}

enum GradientArg {
    Direction(GradientDirection),
    Stop(Rgba),
}

impl Background {
    pub fn parse(raw: &str) -> Option<Background> {
        parse_value(raw, |p| {
            let token = p.next().ok()?.clone();
            match token {
                Token::Function(ref name) if name.eq_ignore_ascii_case("linear-gradient") => {
                    nested(p, parse_gradient_args)
                }
                _ => None,
            }
        })
        .or_else(|| Rgba::parse(raw).map(Background::Solid))
    }
}

fn parse_gradient_args(p: &mut Parser<'_, '_>) -> Option<Background> {
    let mut direction = None;
    let mut stops = Vec::new();
    loop {
        let arg = until_comma(p, |arg| {
            if arg.try_parse(|a| a.expect_ident_matching("to")).is_ok() {
                let side = arg.expect_ident().ok()?.clone();
                while arg.next().is_ok() {}
                return GradientDirection::from_side(&side).map(GradientArg::Direction);
            }
            if let Ok(deg) = arg.try_parse(parse_degrees) {
                return Some(GradientArg::Direction(GradientDirection::from_degrees(deg)));
            }
            let color = parse_color(arg)?;
            // Stop positions are ignored; stops are spread evenly.
            while arg.next().is_ok() {}
            Some(GradientArg::Stop(color))
        });
        match arg {
            Some(GradientArg::Direction(d)) if stops.is_empty() && direction.is_none() => {
                direction = Some(d)
            }
            Some(GradientArg::Stop(color)) => stops.push(color),
            _ => {}
        }
        if p.next().is_err() {
            break;
        }
    }
    match stops.len() {
        0 => None,
        1 => Some(Background::Solid(stops[0])),
        _ => Some(Background::LinearGradient {
            direction: direction.unwrap_or(GradientDirection::ToBottom),
            stops,
        }),
    }
}

fn parse_degrees<'i>(p: &mut Parser<'i, '_>) -> Result<f32, ParseError<'i, ()>> {
    let location = p.current_source_location();
    match *p.next()? {
        Token::Dimension {
            value, ref unit, ..
        } if unit.eq_ignore_ascii_case("deg") => Ok(value),
        Token::Dimension {
            value, ref unit, ..
        } if unit.eq_ignore_ascii_case("turn") => Ok(value * 360.0),
        _ => Err(location.new_custom_error(())),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderSide {
    pub width: f32,
    pub color: Rgba,
}

impl BorderSide {
    /// Parses `<width> <style> <color>` in any order. `none` yields `None`.
    pub fn parse(raw: &str) -> Option<BorderSide> {
        let (width, color, visible) = parse_value(raw, |p| {
            let mut width = None;
            let mut color = Rgba::BLACK;
            let mut visible = true;
            loop {
                let before = p.state();
                let Ok(token) = p.next().cloned() else {
                    break;
                };
                match token {
                    Token::Ident(ref keyword)
                        if keyword.eq_ignore_ascii_case("none")
                            || keyword.eq_ignore_ascii_case("hidden") =>
                    {
                        visible = false
                    }
                    Token::Ident(ref keyword)
                        if ["solid", "dashed", "dotted", "double"]
                            .iter()
                            .any(|s| keyword.eq_ignore_ascii_case(s)) => {}
                    Token::Dimension { .. } | Token::Number { .. } => {
                        width = token_length(&token).and_then(|l| l.resolve(0.0));
                    }
                    _ => {
                        p.reset(&before);
                        color = parse_color(p)?;
                    }
                }
            }
            Some((width, color, visible))
        })?;
        let width = width.unwrap_or(1.0);
        (visible && width > 0.0).then_some(BorderSide { width, color })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Transforms
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum TransformFn {
    Scale(f32, f32),
    Translate(Length, Length),
    /// Any other function, kept verbatim and ignored by layout and paint.
    Other(String),
}

impl TransformFn {
    pub fn is_scale(&self) -> bool {
        matches!(self, TransformFn::Scale(..))
    }
}

/// One `name(args)` entry of a transform list.
struct TransformComponent {
    /// Lowercased function name.
    name: String,
    /// Comma-separated arguments; `None` where an argument is not a single
    /// plain length or number (`calc()`, `var()`).
    args: Vec<Option<Length>>,
    /// The component exactly as written, nested parentheses included.
    source: String,
}

impl TransformComponent {
    fn to_fn(&self) -> TransformFn {
        let number = |i: usize| match self.args.get(i) {
            Some(Some(Length::Number(n))) => Some(*n),
            _ => None,
        };
        let length = |i: usize| self.args.get(i).copied().flatten().unwrap_or(Length::Px(0.0));
        let verbatim = || TransformFn::Other(self.source.clone());
        match self.name.as_str() {
            "scale" => match (number(0), number(1)) {
                (Some(sx), Some(sy)) => TransformFn::Scale(sx, sy),
                (Some(s), None) if self.args.len() == 1 => TransformFn::Scale(s, s),
                _ => verbatim(),
            },
            "scalex" => number(0).map_or_else(verbatim, |s| TransformFn::Scale(s, 1.0)),
            "scaley" => number(0).map_or_else(verbatim, |s| TransformFn::Scale(1.0, s)),
            "scale3d" => match (number(0), number(1)) {
                (Some(sx), Some(sy)) => TransformFn::Scale(sx, sy),
                _ => verbatim(),
            },
            "translate" => TransformFn::Translate(length(0), length(1)),
            "translatex" => TransformFn::Translate(length(0), Length::Px(0.0)),
            "translatey" => TransformFn::Translate(Length::Px(0.0), length(0)),
            _ => verbatim(),
        }
    }
}

/// Tokenizes a transform list into its components. Anything that is not a
/// function (`none`, stray tokens) is skipped.
fn transform_components(raw: &str) -> Vec<TransformComponent> {
    let mut input = ParserInput::new(raw);
    let mut parser = Parser::new(&mut input);
    let mut out = Vec::new();
    loop {
        parser.skip_whitespace();
        let start = parser.position();
        let name = match parser.next() {
            Ok(Token::Function(name)) => name.to_ascii_lowercase(),
            Ok(_) => continue,
            Err(_) => break,
        };
        let args: Result<_, ParseError<'_, ()>> = parser.parse_nested_block(|p| {
            let mut args = Vec::new();
            let mut current: Option<Option<Length>> = None;
            while let Ok(token) = p.next() {
                if matches!(token, Token::Comma) {
                    args.push(current.take().flatten());
                } else if current.is_none() {
                    current = Some(token_length(token));
                } else {
                    current = Some(None);
                }
            }
            if let Some(last) = current {
                args.push(last);
            }
            Ok(args)
        });
        out.push(TransformComponent {
            name,
            args: args.unwrap_or_default(),
            source: parser.slice_from(start).trim().to_string(),
        });
    }
    out
}

pub fn parse_transform(raw: &str) -> Vec<TransformFn> {
    transform_components(raw)
        .iter()
        .map(TransformComponent::to_fn)
        .collect()
}

/// Removes every scale component (`scale`, `scaleX`, `scaleY`, `scale3d`) from a
/// transform value, keeping the other components in order and as written.
///
/// Returns `None` when nothing remains, so the caller can drop the property.
pub fn strip_scale(raw: &str) -> Option<String> {
    let kept: Vec<String> = transform_components(raw)
        .into_iter()
        .filter(|c| !c.name.starts_with("scale"))
        .map(|c| c.source)
        .collect();
    (!kept.is_empty()).then(|| kept.join(" "))
}

/// `transform-origin` as fractions/pixels of the border box. Defaults to the centre.
pub fn parse_transform_origin(raw: Option<&str>) -> (Length, Length) {
    let center = (Length::Percent(50.0), Length::Percent(50.0));
    let Some(raw) = raw else {
        return center;
    };
    let origin = parse_value(raw, |p| {
        let mut x = None;
        let mut y = None;
        while let Ok(token) = p.next() {
            match *token {
                Token::Ident(ref keyword) => match keyword.to_ascii_lowercase().as_str() {
                    "left" => x = Some(Length::Percent(0.0)),
                    "right" => x = Some(Length::Percent(100.0)),
                    "top" => y = Some(Length::Percent(0.0)),
                    "bottom" => y = Some(Length::Percent(100.0)),
                    "center" => {}
                    _ => return None,
                },
                _ => {
                    let len = token_length(token)?;
                    if x.is_none() {
                        x = Some(len);
                    } else {
                        y = Some(len);
                    }
                }
            }
        }
        Some((x, y))
    });
    match origin {
        Some((x, y)) => (x.unwrap_or(center.0), y.unwrap_or(center.1)),
        None => center,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tokenizer helpers
// ────────────────────────────────────────────────────────────────────────────

/// Runs `parse` over a whole value; trailing tokens make the value invalid.
fn parse_value<T>(
    raw: &str,
    parse: impl FnOnce(&mut Parser<'_, '_>) -> Option<T>,
) -> Option<T> {
    let mut input = ParserInput::new(raw);
    let mut parser = Parser::new(&mut input);
    let value = parse(&mut parser)?;
    parser.is_exhausted().then_some(value)
}

/// Parses the block of the function or parenthesis token just consumed.
fn nested<T>(
    p: &mut Parser<'_, '_>,
    parse: impl FnOnce(&mut Parser<'_, '_>) -> Option<T>,
) -> Option<T> {
    p.parse_nested_block(|inner| match parse(&mut *inner) {
        Some(value) => Ok(value),
        None => Err(inner.new_custom_error::<(), ()>(())),
    })
    .ok()
}

/// Parses one comma-separated argument, leaving the comma unconsumed.
fn until_comma<T>(
    p: &mut Parser<'_, '_>,
    parse: impl FnOnce(&mut Parser<'_, '_>) -> Option<T>,
) -> Option<T> {
    p.parse_until_before(Delimiter::Comma, |arg| match parse(&mut *arg) {
        Some(value) => Ok(value),
        None => Err(arg.new_custom_error::<(), ()>(())),
    })
    .ok()
}

fn token_length(token: &Token<'_>) -> Option<Length> {
    match *token {
        Token::Number { value, .. } => Some(Length::Number(value)),
        Token::Percentage { unit_value, .. } => Some(Length::Percent(unit_value * 100.0)),
        Token::Dimension {
            value, ref unit, ..
        } => {
            let px = match unit.to_ascii_lowercase().as_str() {
                "px" => value,
                "mm" => value * PX_PER_MM,
                "cm" => value * PX_PER_MM * 10.0,
                "in" => value * 96.0,
                "pt" => value * 96.0 / 72.0,
                _ => return None,
            };
            Some(Length::Px(px))
        }
        Token::Ident(ref keyword) if keyword.eq_ignore_ascii_case("auto") => Some(Length::Auto),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_serialize_keeps_order() {
        let style = InlineStyle::parse("width: 210mm; Font-Size: 11px ;; color:#fff");
        assert_eq!(style.get("font-size"), Some("11px"));
        assert_eq!(style.to_css(), "width: 210mm; font-size: 11px; color: #fff;");
    }

    #[test]
    fn test_set_empty_value_removes() {
        let mut style = InlineStyle::parse("transform: scale(0.5); margin: 0 auto");
        style.set("transform", "");
        assert_eq!(style.get("transform"), None);
        assert_eq!(style.get("margin"), Some("0 auto"));
    }

    #[test]
    fn test_lengths() {
        assert_eq!(Length::parse("12px"), Some(Length::Px(12.0)));
        assert_eq!(Length::parse("50%"), Some(Length::Percent(50.0)));
        assert_eq!(Length::parse("auto"), Some(Length::Auto));
        let Some(Length::Px(a4)) = Length::parse("210mm") else {
            panic!("mm should resolve to px");
        };
        assert!((a4 - 793.7).abs() < 0.1, "210mm ≈ 793.7px, got {a4}");
        assert_eq!(Length::Percent(25.0).resolve(800.0), Some(200.0));
    }

    #[test]
    fn test_box_shorthand_expansion() {
        let style = InlineStyle::parse("padding: 8px 16px; padding-left: 4px");
        assert_eq!(style.edge("padding", Side::Top), Some(Length::Px(8.0)));
        assert_eq!(style.edge("padding", Side::Right), Some(Length::Px(16.0)));
        assert_eq!(style.edge("padding", Side::Left), Some(Length::Px(4.0)));
    }

    #[test]
    fn test_colors() {
        assert_eq!(Rgba::parse("#fff"), Some(Rgba::WHITE));
        assert_eq!(Rgba::parse("#1e293b"), Some(Rgba::rgb(0x1e, 0x29, 0x3b)));
        assert_eq!(Rgba::parse("rgb(10, 20, 30)"), Some(Rgba::rgb(10, 20, 30)));
        assert_eq!(Rgba::parse("transparent").map(|c| c.a), Some(0));
        assert_eq!(Rgba::parse("chartreuse-ish"), None);
        assert_eq!(
            Rgba::parse("rgba(0, 0, 0, 0.5)"),
            Some(Rgba { a: 128, ..Rgba::BLACK })
        );
        assert_eq!(Rgba::parse("rgb(100% 0% 0%)"), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(Rgba::parse("#fff extra"), None);
    }

    #[test]
    fn test_declarations_keep_nested_values_whole() {
        let style = InlineStyle::parse(
            "background: linear-gradient(to right, rgba(0, 0, 0, 0.1), #fff); color: #111",
        );
        assert_eq!(
            style.get("background"),
            Some("linear-gradient(to right, rgba(0, 0, 0, 0.1), #fff)")
        );
        assert_eq!(style.color("color"), Some(Rgba::rgb(0x11, 0x11, 0x11)));
    }

    #[test]
    fn test_gradient_background() {
        let bg = Background::parse("linear-gradient(to right, #9333ea, #ec4899 50%, #fb923c)");
        let Some(Background::LinearGradient { direction, stops }) = bg else {
            panic!("expected gradient");
        };
        assert_eq!(direction, GradientDirection::ToRight);
        assert_eq!(stops.len(), 3);

        let bg = Background::parse("linear-gradient(90deg, rgb(255, 0, 0), #00f)");
        assert_eq!(
            bg,
            Some(Background::LinearGradient {
                direction: GradientDirection::ToRight,
                stops: vec![Rgba::rgb(255, 0, 0), Rgba::rgb(0, 0, 255)],
            })
        );
        assert_eq!(
            Background::parse("#eff6ff"),
            Some(Background::Solid(Rgba::rgb(0xef, 0xf6, 0xff)))
        );
    }

    #[test]
    fn test_border_side() {
        let border = BorderSide::parse("2px solid #1e293b").unwrap();
        assert_eq!(border.width, 2.0);
        assert_eq!(border.color, Rgba::rgb(0x1e, 0x29, 0x3b));
        assert_eq!(BorderSide::parse("none"), None);
    }

    // ── transforms ──────────────────────────────────────────────────────────

    #[test]
    fn test_strip_scale_keeps_other_components() {
        assert_eq!(
            strip_scale("translate(10px, 4px) scale(0.35) rotate(2deg)"),
            Some("translate(10px, 4px) rotate(2deg)".to_string())
        );
        assert_eq!(strip_scale("scaleX(2) scaleY(0.5)"), None);
        assert_eq!(strip_scale("scale(0.5)"), None);
    }

    #[test]
    fn test_strip_scale_keeps_nested_arguments_intact() {
        assert_eq!(
            strip_scale("translate(calc(10px + 5px), 0) scale(0.5)"),
            Some("translate(calc(10px + 5px), 0)".to_string())
        );
        assert_eq!(
            strip_scale("translateX(calc(1px + 1px)) scale(0.5)"),
            Some("translateX(calc(1px + 1px))".to_string())
        );
        assert_eq!(
            strip_scale("scale(0.5) rotate(calc(1deg * (2 + 3)))"),
            Some("rotate(calc(1deg * (2 + 3)))".to_string())
        );
    }

    #[test]
    fn test_calc_argument_does_not_swallow_following_functions() {
        let fns = parse_transform("translate(calc(10px + 5px), 4px) scale(0.5)");
        assert_eq!(fns.len(), 2);
        assert_eq!(fns[0], TransformFn::Translate(Length::Px(0.0), Length::Px(4.0)));
        assert_eq!(fns[1], TransformFn::Scale(0.5, 0.5));
        assert_eq!(
            parse_transform("scale(calc(1 / 2))"),
            vec![TransformFn::Other("scale(calc(1 / 2))".to_string())]
        );
    }

    #[test]
    fn test_parse_transform_functions() {
        let fns = parse_transform("scale(0.5) translateX(12px) skewX(3deg)");
        assert_eq!(fns[0], TransformFn::Scale(0.5, 0.5));
        assert_eq!(fns[1], TransformFn::Translate(Length::Px(12.0), Length::Px(0.0)));
        assert_eq!(fns[2], TransformFn::Other("skewX(3deg)".to_string()));
        assert!(parse_transform("none").is_empty());
    }

    #[test]
    fn test_transform_origin() {
        assert_eq!(
            parse_transform_origin(Some("top left")),
            (Length::Percent(0.0), Length::Percent(0.0))
        );
        assert_eq!(
            parse_transform_origin(None),
            (Length::Percent(50.0), Length::Percent(50.0))
        );
    }
}
