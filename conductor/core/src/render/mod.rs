//! Cocktail illustration
//!
//! [`render_cocktail`] maps a [`VisualStructure`] to an [`Illustration`]. It is a
//! pure function: the same structure and scale always produce the same
//! picture. Paint order, bottom to top:
//!
//! ```text
//! stem/base -> liquid -> ice -> glass outline -> rim -> liquid surface -> garnish -> bubbles
//! ```
//!
//! Randomized sparkles are a separate, opt-in pass ([`decorate_sparkles`]).

pub mod color;
mod garnish;
mod glass;
mod ice;
mod scene;
mod svg;

pub use color::Color;
pub use glass::{EllipseGeometry, GlassGeometry};
pub use scene::{
    Animation, Element, Gradient, GradientKind, GradientStop, Illustration, Layer, Paint, Shape,
    Stroke, Style, TransformOp, ViewBox,
};

use rand::Rng;

use crate::cocktail::VisualStructure;

/// Cocktail view box
pub const VIEW_BOX: ViewBox = ViewBox {
    width: 100.0,
    height: 120.0,
};

/// Output width at scale 1.0
pub const BASE_WIDTH_REM: f32 = 10.0;

/// Output height at scale 1.0
pub const BASE_HEIGHT_REM: f32 = 12.0;

/// Scale of a card that has not been revealed yet
pub const UNREVEALED_SCALE: f32 = 1.2;

/// Scale of a revealed card
pub const REVEALED_SCALE: f32 = 0.8;

/// Gradient id used by the liquid body
pub const LIQUID_GRADIENT: &str = "liquidGradient";

/// Gradient id used by ice
pub const ICE_GRADIENT: &str = "iceGradient";

const ICE_TINT: Color = Color::rgb(0xdb, 0xea, 0xfe);

const SPARKLE_COUNT: usize = 6;

/// Glass scale for a cocktail card
#[must_use]
pub const fn card_scale(revealed: bool) -> f32 {
    if revealed {
        REVEALED_SCALE
    } else {
        UNREVEALED_SCALE
    }
}

fn effective_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

fn liquid_gradient(liquid: Color) -> Gradient {
    Gradient {
        id: LIQUID_GRADIENT.to_string(),
        kind: GradientKind::Vertical,
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: liquid,
                opacity: 0.7,
            },
            GradientStop {
                offset: 0.5,
                color: liquid,
                opacity: 0.85,
            },
            GradientStop {
                offset: 1.0,
                color: Color::BLACK,
                opacity: 0.8,
            },
        ],
    }
}

fn ice_gradient() -> Gradient {
    Gradient {
        id: ICE_GRADIENT.to_string(),
        kind: GradientKind::Radial,
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: Color::WHITE,
                opacity: 0.8,
            },
            GradientStop {
                offset: 1.0,
                color: ICE_TINT,
                opacity: 0.3,
            },
        ],
    }
}

fn bubble(cx: f32, cy: f32, r: f32, opacity: f32, rise_to: f32, dur_secs: f32) -> Element {
    Element::new(
        Layer::Bubble,
        Shape::Circle { cx, cy, r },
        Style::fill(Color::WHITE).with_opacity(opacity),
    )
    .with_animation(Animation::attribute(
        "cy",
        &format!("{cy};{rise_to}"),
        dur_secs,
    ))
    .with_animation(Animation::attribute(
        "opacity",
        &format!("{opacity};0"),
        dur_secs,
    ))
}

/// Draw a cocktail
///
/// A non-finite or non-positive `scale` is treated as 1.0. Scale only changes
/// the output size; the view box and every element stay where they are.
///
/// # Examples
///
/// ```
/// use bistro_core::cocktail::{Garnish, GlassType, Ice, VisualStructure};
/// use bistro_core::render::{render_cocktail, Layer};
///
/// let visual = VisualStructure::new(GlassType::Rocks, Garnish::Cherry, Ice::Cubes, "#9333ea");
/// let picture = render_cocktail(&visual, 1.0);
///
/// assert_eq!(picture.count(Layer::Ice), 3);
/// assert!(picture.has(Layer::Garnish));
/// assert!(!picture.has(Layer::StemBase));
/// ```
#[must_use]
pub fn render_cocktail(visual: &VisualStructure, scale: f32) -> Illustration {
    let scale = effective_scale(scale);
    let geometry = GlassGeometry::for_glass(visual.glass_type);
    let liquid = Color::liquid(&visual.color_hex);

    let mut picture = Illustration::new(VIEW_BOX, BASE_WIDTH_REM * scale, BASE_HEIGHT_REM * scale);
    picture.gradients.push(liquid_gradient(liquid));
    picture.gradients.push(ice_gradient());

    let glass_stroke = |opacity: f32, width: f32| Stroke::translucent(Color::WHITE, opacity, width);

    for d in [geometry.stem, geometry.base].into_iter().flatten() {
        picture.push(Element::new(
            Layer::StemBase,
            Shape::Path(d.to_string()),
            Style::outline(glass_stroke(0.2, 3.0)),
        ));
    }

    picture.push(Element::new(
        Layer::Liquid,
        Shape::Path(geometry.liquid.to_string()),
        Style::gradient(LIQUID_GRADIENT),
    ));

    picture.extend(ice::ice_elements(visual.glass_type, visual.ice));

    picture.push(Element::new(
        Layer::Glass,
        Shape::Path(geometry.outline.to_string()),
        Style::outline(glass_stroke(0.3, 1.5)),
    ));

    let rim = geometry.rim;
    picture.push(Element::new(
        Layer::Rim,
        Shape::Ellipse {
            cx: rim.cx,
            cy: rim.cy,
            rx: rim.rx,
            ry: rim.ry,
        },
        Style::outline(glass_stroke(0.5, 1.0)),
    ));

    let surface = geometry.surface;
    picture.push(Element::new(
        Layer::LiquidSurface,
        Shape::Ellipse {
            cx: surface.cx,
            cy: surface.cy,
            rx: surface.rx,
            ry: surface.ry,
        },
        Style::fill(liquid).with_fill_opacity(0.3),
    ));

    picture.extend(garnish::garnish_elements(visual.garnish, rim));

    picture.push(bubble(rim.cx - 5.0, 60.0, 1.0, 0.6, 40.0, 2.5));
    picture.push(bubble(rim.cx + 5.0, 70.0, 1.5, 0.5, 45.0, 3.0));

    picture
}

/// Add twinkling sparkles over the lower glass
///
/// This is the only randomized part of a cocktail picture and is kept out of
/// [`render_cocktail`] so rendering stays deterministic.
pub fn decorate_sparkles<R: Rng + ?Sized>(picture: &mut Illustration, glow: Color, rng: &mut R) {
    let width = picture.view_box.width;
    let height = picture.view_box.height;

    for _ in 0..SPARKLE_COUNT {
        let cx = width * rng.gen_range(0.2..0.8);
        let cy = height * rng.gen_range(0.4..0.8);
        let begin_secs = rng.gen_range(0.0..3.0);

        picture.push(
            Element::new(
                Layer::Sparkle,
                Shape::Circle { cx, cy, r: 0.8 },
                Style::fill(Color::WHITE)
                    .with_stroke(Stroke::translucent(glow, 0.6, 0.4))
                    .with_opacity(0.0),
            )
            .with_animation(Animation::Attribute {
                name: "opacity".to_string(),
                values: "0;1;0".to_string(),
                dur_secs: 3.0,
                begin_secs,
            }),
        );
    }
}
