//! SVG serialization
//!
//! Every string written here is either a fixed literal, a number, or a colour
//! produced by [`Color::to_hex`](super::Color::to_hex), so no escaping is needed.

use std::fmt::{self, Display, Formatter, Write};

use super::scene::{
    Animation, Element, Gradient, GradientKind, Illustration, Paint, Shape, Style, TransformOp,
};

/// Number formatted to at most three decimals with trailing zeros dropped
struct Num(f32);

impl Display for Num {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rounded = (self.0 * 1000.0).round() / 1000.0;
        if rounded == 0.0 || !rounded.is_finite() {
            f.write_str("0")
        } else {
            write!(f, "{rounded}")
        }
    }
}

impl Display for Illustration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}rem" height="{}rem">"#,
            Num(self.view_box.width),
            Num(self.view_box.height),
            Num(self.width_rem),
            Num(self.height_rem),
        )?;

        if !self.gradients.is_empty() {
            f.write_str("<defs>")?;
            for gradient in &self.gradients {
                write_gradient(f, gradient)?;
            }
            f.write_str("</defs>")?;
        }

        for element in &self.elements {
            write_element(f, element)?;
        }

        f.write_str("</svg>")
    }
}

fn write_gradient(f: &mut impl Write, gradient: &Gradient) -> fmt::Result {
    let tag = match gradient.kind {
        GradientKind::Vertical => {
            write!(
                f,
                r#"<linearGradient id="{}" x1="0%" y1="0%" x2="0%" y2="100%">"#,
                gradient.id
            )?;
            "linearGradient"
        }
        GradientKind::Radial => {
            write!(
                f,
                r#"<radialGradient id="{}" cx="50%" cy="50%" r="50%">"#,
                gradient.id
            )?;
            "radialGradient"
        }
    };

    for stop in &gradient.stops {
        write!(
            f,
            r#"<stop offset="{}%" stop-color="{}" stop-opacity="{}"/>"#,
            Num(stop.offset * 100.0),
            stop.color.to_hex(),
            Num(stop.opacity),
        )?;
    }

    write!(f, "</{tag}>")
}

fn write_element(f: &mut impl Write, element: &Element) -> fmt::Result {
    let tag = match &element.shape {
        Shape::Path(d) => {
            write!(f, r#"<path d="{d}""#)?;
            "path"
        }
        Shape::Circle { cx, cy, r } => {
            write!(
                f,
                r#"<circle cx="{}" cy="{}" r="{}""#,
                Num(*cx),
                Num(*cy),
                Num(*r)
            )?;
            "circle"
        }
        Shape::Ellipse { cx, cy, rx, ry } => {
            write!(
                f,
                r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}""#,
                Num(*cx),
                Num(*cy),
                Num(*rx),
                Num(*ry)
            )?;
            "ellipse"
        }
        Shape::Rect {
            x,
            y,
            width,
            height,
            corner,
        } => {
            write!(
                f,
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}""#,
                Num(*x),
                Num(*y),
                Num(*width),
                Num(*height),
                Num(*corner)
            )?;
            "rect"
        }
        Shape::Polygon(points) => {
            f.write_str(r#"<polygon points=""#)?;
            for (i, (x, y)) in points.iter().enumerate() {
                if i > 0 {
                    f.write_char(' ')?;
                }
                write!(f, "{},{}", Num(*x), Num(*y))?;
            }
            f.write_char('"')?;
            "polygon"
        }
        Shape::Line { x1, y1, x2, y2 } => {
            write!(
                f,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                Num(*x1),
                Num(*y1),
                Num(*x2),
                Num(*y2)
            )?;
            "line"
        }
    };

    write_style(f, &element.style)?;

    if !element.transform.is_empty() {
        f.write_str(r#" transform=""#)?;
        for (i, op) in element.transform.iter().enumerate() {
            if i > 0 {
                f.write_char(' ')?;
            }
            write_transform(f, op)?;
        }
        f.write_char('"')?;
    }

    if let Some(class) = &element.class {
        write!(f, r#" class="{class}""#)?;
    }

    if element.animations.is_empty() {
        return f.write_str("/>");
    }

    f.write_char('>')?;
    for animation in &element.animations {
        write_animation(f, animation)?;
    }
    write!(f, "</{tag}>")
}

fn write_style(f: &mut impl Write, style: &Style) -> fmt::Result {
    match &style.fill {
        Paint::None => f.write_str(r#" fill="none""#)?,
        Paint::Solid(color) => write!(f, r#" fill="{}""#, color.to_hex())?,
        Paint::Gradient(id) => write!(f, r#" fill="url(#{id})""#)?,
    }

    if let Some(opacity) = style.fill_opacity {
        write!(f, r#" fill-opacity="{}""#, Num(opacity))?;
    }

    if let Some(stroke) = &style.stroke {
        write!(
            f,
            r#" stroke="{}" stroke-width="{}""#,
            stroke.color.to_hex(),
            Num(stroke.width)
        )?;
        if stroke.opacity < 1.0 {
            write!(f, r#" stroke-opacity="{}""#, Num(stroke.opacity))?;
        }
        if stroke.round_cap {
            f.write_str(r#" stroke-linecap="round""#)?;
        }
    }

    if let Some(opacity) = style.opacity {
        write!(f, r#" opacity="{}""#, Num(opacity))?;
    }

    Ok(())
}

fn write_transform(f: &mut impl Write, op: &TransformOp) -> fmt::Result {
    match *op {
        TransformOp::Translate(x, y) => write!(f, "translate({} {})", Num(x), Num(y)),
        TransformOp::Rotate { deg, cx, cy } if cx == 0.0 && cy == 0.0 => {
            write!(f, "rotate({})", Num(deg))
        }
        TransformOp::Rotate { deg, cx, cy } => {
            write!(f, "rotate({} {} {})", Num(deg), Num(cx), Num(cy))
        }
        TransformOp::Scale(s) => write!(f, "scale({})", Num(s)),
    }
}

fn write_animation(f: &mut impl Write, animation: &Animation) -> fmt::Result {
    match animation {
        Animation::Attribute {
            name,
            values,
            dur_secs,
            begin_secs,
        } => write!(
            f,
            r#"<animate attributeName="{name}" values="{values}" dur="{}s" begin="{}s" repeatCount="indefinite"/>"#,
            Num(*dur_secs),
            Num(*begin_secs),
        ),
        Animation::Rotate { values, dur_secs } => write!(
            f,
            r#"<animateTransform attributeName="transform" type="rotate" values="{values}" dur="{}s" additive="sum" repeatCount="indefinite"/>"#,
            Num(*dur_secs),
        ),
    }
}
