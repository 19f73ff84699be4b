//! Baron's portrait as a vector illustration

use crate::render::{
    Animation, Color, Element, Illustration, Layer, Shape, Stroke, Style, TransformOp, ViewBox,
};

use super::{CharacterState, Presentation};

const FUR: Color = Color::rgb(0x15, 0x15, 0x15);
const NIGHT: Color = Color::rgb(0x0f, 0x0f, 0x15);
const AMBER: Color = Color::rgb(0xf5, 0x9e, 0x0b);
const PUPIL: Color = Color::rgb(0x20, 0x10, 0x30);
const NOSE: Color = Color::rgb(0xf4, 0x72, 0xb6);
const WHISKER: Color = Color::rgb(0x66, 0x66, 0x66);
const BOW: Color = Color::rgb(0xb9, 0x1c, 0x1c);
const KNOT: Color = Color::rgb(0xef, 0x44, 0x44);
const VEST: Color = Color::rgb(0x1e, 0x1b, 0x4b);
const STEEL: Color = Color::rgb(0xcb, 0xd5, 0xe1);
const SLATE: Color = Color::rgb(0x64, 0x74, 0x8b);
const SLATE_DARK: Color = Color::rgb(0x47, 0x55, 0x69);

/// Portrait size
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PortraitSize {
    /// Chat bubble avatar
    #[default]
    Small,
    /// Header avatar
    Medium,
    /// Intro screen
    Large,
}

impl PortraitSize {
    /// Edge length in rem
    #[must_use]
    pub const fn rem(self) -> f32 {
        match self {
            Self::Small => 2.5,
            Self::Medium => 5.0,
            Self::Large => 10.0,
        }
    }
}

fn eye(cx: f32, drift: bool) -> [Element; 3] {
    let mut pupil = Element::new(
        Layer::Eyes,
        Shape::Circle { cx, cy: 50.0, r: 2.0 },
        Style::fill(PUPIL),
    );
    if drift {
        pupil = pupil.with_animation(Animation::attribute(
            "cx",
            &format!("{};{};{}", cx - 1.0, cx + 1.0, cx - 1.0),
            2.0,
        ));
    }

    [
        Element::new(
            Layer::Eyes,
            Shape::Ellipse {
                cx,
                cy: 50.0,
                rx: 7.0,
                ry: 9.0,
            },
            Style::fill(AMBER),
        ),
        pupil,
        Element::new(
            Layer::Eyes,
            Shape::Circle {
                cx: cx + 2.0,
                cy: 46.0,
                r: 2.0,
            },
            Style::fill(Color::WHITE).with_opacity(0.8),
        ),
    ]
}

fn shaker() -> Vec<Element> {
    let rim = Stroke::new(SLATE_DARK, 1.0);
    let sway = Animation::Rotate {
        values: "-15 10 15;15 10 15;-15 10 15".to_string(),
        dur_secs: 0.2,
    };

    [
        Element::new(
            Layer::Shaker,
            Shape::Rect {
                x: 0.0,
                y: 0.0,
                width: 20.0,
                height: 30.0,
                corner: 2.0,
            },
            Style::fill(STEEL).with_stroke(rim.clone()),
        ),
        Element::new(
            Layer::Shaker,
            Shape::Path("M0 0 L20 0 L15 -10 L5 -10 Z".to_string()),
            Style::fill(SLATE).with_stroke(rim),
        ),
        Element::new(
            Layer::Shaker,
            Shape::Rect {
                x: 5.0,
                y: -14.0,
                width: 10.0,
                height: 4.0,
                corner: 1.0,
            },
            Style::fill(STEEL),
        ),
    ]
    .into_iter()
    .map(|e| {
        e.with_transform(TransformOp::Translate(60.0, 50.0))
            .with_transform(TransformOp::rotate(-15.0))
            .with_animation(sway.clone())
    })
    .collect()
}

/// Draw Baron in a given state
///
/// ```
/// use bistro_core::avatar::{render_portrait, CharacterState, PortraitSize};
/// use bistro_core::render::Layer;
///
/// let mixing = render_portrait(CharacterState::Mixing, PortraitSize::Medium);
/// assert!(mixing.has(Layer::Shaker));
/// assert!(!render_portrait(CharacterState::Idle, PortraitSize::Medium).has(Layer::Shaker));
/// ```
#[must_use]
pub fn render_portrait(state: CharacterState, size: PortraitSize) -> Illustration {
    let flags = Presentation::for_state(state);
    let edge = size.rem();
    let mut picture = Illustration::new(
        ViewBox {
            width: 100.0,
            height: 100.0,
        },
        edge,
        edge,
    );

    picture.push(Element::new(
        Layer::Backdrop,
        Shape::Circle {
            cx: 50.0,
            cy: 50.0,
            r: 50.0,
        },
        Style::fill(NIGHT),
    ));

    let mut left_ear = Element::new(
        Layer::Ears,
        Shape::Path("M20 38 L32 15 L50 38 Z".to_string()),
        Style::fill(FUR),
    );
    if flags.ear_twitch {
        left_ear = left_ear.with_class("ear-twitch");
    }
    picture.push(left_ear);
    picture.push(Element::new(
        Layer::Ears,
        Shape::Path("M80 38 L68 15 L50 38 Z".to_string()),
        Style::fill(FUR),
    ));

    picture.push(Element::new(
        Layer::Head,
        Shape::Circle {
            cx: 50.0,
            cy: 55.0,
            r: 32.0,
        },
        Style::fill(FUR),
    ));

    let eyes = eye(38.0, flags.pupil_drift)
        .into_iter()
        .chain(eye(62.0, flags.pupil_drift));
    if flags.blinking {
        picture.extend(eyes.map(|e| e.with_class("blink")));
    } else {
        picture.extend(eyes);
    }

    picture.push(Element::new(
        Layer::Muzzle,
        Shape::Path("M48 64 L52 64 L50 67 Z".to_string()),
        Style::fill(NOSE).with_opacity(0.4),
    ));

    for d in ["M50 67 Q45 72 38 69", "M50 67 Q55 72 62 69"] {
        let mut mouth = Element::new(
            Layer::Mouth,
            Shape::Path(d.to_string()),
            Style::outline(Stroke::new(WHISKER, 1.5)),
        );
        if flags.mouth_moving {
            mouth = mouth
                .with_transform(TransformOp::Translate(0.0, 1.0))
                .with_animation(Animation::attribute("stroke-width", "1.5;2;1.5", 0.2));
        }
        picture.push(mouth);
    }

    for deg in [-90.0, 90.0] {
        picture.push(
            Element::new(
                Layer::Bowtie,
                Shape::Path("M40 88 L60 88 L50 98 Z".to_string()),
                Style::fill(BOW),
            )
            .with_transform(TransformOp::Rotate {
                deg,
                cx: 50.0,
                cy: 93.0,
            })
            .with_transform(TransformOp::Scale(0.65)),
        );
    }
    picture.push(Element::new(
        Layer::Bowtie,
        Shape::Circle {
            cx: 50.0,
            cy: 93.0,
            r: 3.5,
        },
        Style::fill(KNOT),
    ));

    picture.push(Element::new(
        Layer::Vest,
        Shape::Path("M18 100 Q50 92 82 100".to_string()),
        Style::fill(VEST),
    ));

    if flags.shaker {
        picture.extend(shaker());
    }

    picture
}
