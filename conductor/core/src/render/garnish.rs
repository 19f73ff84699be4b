//! Garnish placement
//!
//! Most garnishes hang off the right-hand rim edge at `(rim.cx + rim.rx - 5, rim.cy)`.
//! The lemon slice sits on the left edge and the olive skewer crosses the rim centre.

use crate::cocktail::Garnish;

use super::color::Color;
use super::glass::EllipseGeometry;
use super::scene::{Element, Layer, Shape, Stroke, Style, TransformOp};

const PEEL: Color = Color::rgb(0xf9, 0x73, 0x16);
const CHERRY: Color = Color::rgb(0x9f, 0x12, 0x39);
const CHERRY_STEM: Color = Color::rgb(0x3f, 0x2c, 0x2c);
const MINT: Color = Color::rgb(0x22, 0xc5, 0x5e);
const MINT_VEIN: Color = Color::rgb(0x14, 0x53, 0x2d);
const LEMON: Color = Color::rgb(0xfe, 0xf0, 0x8a);
const RIND: Color = Color::rgb(0xfd, 0xe0, 0x47);
const OLIVE: Color = Color::rgb(0x65, 0xa3, 0x0d);
const OLIVE_SHINE: Color = Color::rgb(0xbe, 0xf2, 0x64);
const SKEWER: Color = Color::rgb(0xa3, 0xa3, 0xa3);
const PETAL: Color = Color::rgb(0xf4, 0x72, 0xb6);

fn part(shape: Shape, style: Style) -> Element {
    Element::new(Layer::Garnish, shape, style)
}

fn path(d: String, style: Style) -> Element {
    part(Shape::Path(d), style)
}

fn circle(cx: f32, cy: f32, r: f32, style: Style) -> Element {
    part(Shape::Circle { cx, cy, r }, style)
}

/// Garnish elements anchored on the rim
pub(super) fn garnish_elements(garnish: Garnish, rim: EllipseGeometry) -> Vec<Element> {
    let gx = rim.cx + rim.rx - 5.0;
    let gy = rim.cy;

    match garnish {
        Garnish::None => Vec::new(),

        Garnish::OrangePeel => vec![path(
            format!(
                "M{} {} Q{} {} {} {} Q{} {} {} {}",
                gx - 5.0,
                gy - 5.0,
                gx + 10.0,
                gy - 5.0,
                gx + 5.0,
                gy + 5.0,
                gx,
                gy + 15.0,
                gx - 5.0,
                gy + 10.0
            ),
            Style::outline(Stroke::new(PEEL, 3.0).rounded()),
        )],

        Garnish::Cherry => vec![
            path(
                format!(
                    "M{} {} Q{} {} {} {}",
                    gx,
                    gy + 5.0,
                    gx + 5.0,
                    gy - 10.0,
                    gx + 10.0,
                    gy - 15.0
                ),
                Style::outline(Stroke::new(CHERRY_STEM, 1.0)),
            ),
            circle(gx, gy + 5.0, 5.0, Style::fill(CHERRY)),
            circle(gx - 1.0, gy + 3.0, 1.5, Style::fill(Color::WHITE).with_opacity(0.4)),
        ],

        Garnish::Mint => {
            let leaf = Style::fill(MINT).with_stroke(Stroke::new(MINT_VEIN, 0.5));
            [
                path("M10 10 Q5 0 0 5 Q5 15 10 10 Z".into(), leaf.clone()),
                path("M10 10 Q15 0 20 5 Q15 15 10 10 Z".into(), leaf),
                path(
                    "M10 10 Q10 -5 10 5".into(),
                    Style::outline(Stroke::new(MINT_VEIN, 1.0)),
                ),
            ]
            .into_iter()
            .map(|e| e.with_transform(TransformOp::Translate(gx - 10.0, gy - 10.0)))
            .collect()
        }

        Garnish::LemonSlice => {
            let rind = Stroke::new(RIND, 1.0);
            let spoke = |x2: f32, y2: f32| {
                part(
                    Shape::Line {
                        x1: 0.0,
                        y1: 0.0,
                        x2,
                        y2,
                    },
                    Style::outline(rind.clone()),
                )
            };
            [
                circle(0.0, 0.0, 10.0, Style::fill(LEMON).with_stroke(rind.clone())),
                spoke(0.0, 10.0),
                spoke(8.0, -6.0),
                spoke(-8.0, -6.0),
                path(
                    "M0 0 L10 10 L-10 10 Z".into(),
                    Style::fill(Color::BLACK)
                        .with_fill_opacity(0.5)
                        .with_opacity(0.1),
                ),
            ]
            .into_iter()
            .map(|e| {
                e.with_transform(TransformOp::Translate(rim.cx - rim.rx, rim.cy - 5.0))
                    .with_transform(TransformOp::rotate(-20.0))
            })
            .collect()
        }

        Garnish::Olive => vec![
            part(
                Shape::Line {
                    x1: rim.cx - 10.0,
                    y1: rim.cy - 5.0,
                    x2: rim.cx + 20.0,
                    y2: rim.cy - 15.0,
                },
                Style::outline(Stroke::new(SKEWER, 1.0)),
            ),
            part(
                Shape::Ellipse {
                    cx: rim.cx,
                    cy: rim.cy - 8.0,
                    rx: 4.0,
                    ry: 5.0,
                },
                Style::fill(OLIVE),
            )
            .with_transform(TransformOp::rotate(15.0)),
            circle(
                rim.cx + 1.0,
                rim.cy - 9.0,
                1.0,
                Style::fill(OLIVE_SHINE).with_opacity(0.6),
            ),
        ],

        Garnish::Flower => {
            let petals = [(0.0, -5.0), (5.0, 0.0), (0.0, 5.0), (-5.0, 0.0)]
                .into_iter()
                .map(|(x, y)| circle(x, y, 3.0, Style::fill(PETAL)));
            petals
                .chain(std::iter::once(circle(0.0, 0.0, 2.0, Style::fill(LEMON))))
                .map(|e| e.with_transform(TransformOp::Translate(gx - 5.0, gy)))
                .collect()
        }
    }
}
