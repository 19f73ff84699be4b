//! Ice shapes

use crate::cocktail::{GlassType, Ice};

use super::color::Color;
use super::scene::{Element, Layer, Shape, Stroke, Style, TransformOp};
use super::ICE_GRADIENT;

/// (x, y, size, rotation) for each cube; rotation pivots on the cube centre
const CUBES: [(f32, f32, f32, f32); 3] = [
    (35.0, 60.0, 12.0, 10.0),
    (52.0, 75.0, 14.0, -15.0),
    (45.0, 50.0, 10.0, 5.0),
];

const SHARDS: [[(f32, f32); 3]; 4] = [
    [(35.0, 60.0), (40.0, 55.0), (45.0, 62.0)],
    [(50.0, 70.0), (55.0, 65.0), (60.0, 72.0)],
    [(45.0, 80.0), (40.0, 85.0), (55.0, 85.0)],
    [(60.0, 60.0), (65.0, 55.0), (70.0, 60.0)],
];

/// Ice elements for a drink. Stemmed glasses never hold ice.
pub(super) fn ice_elements(glass: GlassType, ice: Ice) -> Vec<Element> {
    if glass.is_stemmed() {
        return Vec::new();
    }

    match ice {
        Ice::None => Vec::new(),
        Ice::Sphere => vec![Element::new(
            Layer::Ice,
            Shape::Circle {
                cx: 50.0,
                cy: 70.0,
                r: 14.0,
            },
            Style::gradient(ICE_GRADIENT).with_stroke(Stroke::translucent(Color::WHITE, 0.3, 0.5)),
        )
        .with_class("float-ice")],
        Ice::Cubes => CUBES
            .iter()
            .map(|&(x, y, size, deg)| {
                Element::new(
                    Layer::Ice,
                    Shape::Rect {
                        x,
                        y,
                        width: size,
                        height: size,
                        corner: 1.0,
                    },
                    Style::gradient(ICE_GRADIENT)
                        .with_stroke(Stroke::translucent(Color::WHITE, 0.3, 1.0)),
                )
                .with_transform(TransformOp::Rotate {
                    deg,
                    cx: x + size / 2.0,
                    cy: y + size / 2.0,
                })
                .with_class("float-ice")
            })
            .collect(),
        Ice::Crushed => SHARDS
            .iter()
            .map(|points| {
                Element::new(
                    Layer::Ice,
                    Shape::Polygon(points.to_vec()),
                    Style::fill(Color::WHITE)
                        .with_fill_opacity(0.4)
                        .with_opacity(0.7),
                )
            })
            .collect(),
    }
}
