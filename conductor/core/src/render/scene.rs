//! Scene primitives
//!
//! An [`Illustration`] is an ordered list of tagged vector elements. Keeping
//! the scene structured (rather than going straight to SVG text) lets callers
//! inspect what was drawn: how many ice shapes, whether a stem exists, which
//! garnish was placed. [`Illustration`] implements `Display` as an SVG document.

use serde::{Deserialize, Serialize};

use super::color::Color;

/// User-space coordinate box, anchored at the origin
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    /// Width in user units
    pub width: f32,
    /// Height in user units
    pub height: f32,
}

/// What part of the picture an element belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Stem and foot of a stemmed glass
    StemBase,
    /// Liquid body
    Liquid,
    /// Ice shapes
    Ice,
    /// Glass outline
    Glass,
    /// Rim ellipse
    Rim,
    /// Translucent liquid surface
    LiquidSurface,
    /// Rim decoration
    Garnish,
    /// Rising bubbles
    Bubble,
    /// Decorative sparkle (the only randomized layer)
    Sparkle,
    /// Portrait background disc
    Backdrop,
    /// Portrait ears
    Ears,
    /// Portrait head
    Head,
    /// Portrait eyes, pupils and shine
    Eyes,
    /// Portrait nose
    Muzzle,
    /// Portrait mouth
    Mouth,
    /// Portrait bow tie
    Bowtie,
    /// Portrait vest
    Vest,
    /// Cocktail shaker overlay
    Shaker,
}

/// Element geometry in view-box units
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// SVG path data
    Path(String),
    /// Circle
    Circle {
        /// Centre x
        cx: f32,
        /// Centre y
        cy: f32,
        /// Radius
        r: f32,
    },
    /// Axis-aligned ellipse
    Ellipse {
        /// Centre x
        cx: f32,
        /// Centre y
        cy: f32,
        /// Horizontal radius
        rx: f32,
        /// Vertical radius
        ry: f32,
    },
    /// Rectangle with optional rounded corners
    Rect {
        /// Left edge
        x: f32,
        /// Top edge
        y: f32,
        /// Width
        width: f32,
        /// Height
        height: f32,
        /// Corner radius
        corner: f32,
    },
    /// Closed polygon
    Polygon(Vec<(f32, f32)>),
    /// Straight line
    Line {
        /// Start x
        x1: f32,
        /// Start y
        y1: f32,
        /// End x
        x2: f32,
        /// End y
        y2: f32,
    },
}

/// Fill paint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    /// No fill
    None,
    /// Flat colour
    Solid(Color),
    /// Reference to a gradient in the illustration's definitions
    Gradient(String),
}

/// Stroke settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Stroke colour
    pub color: Color,
    /// Stroke opacity (0.0-1.0)
    pub opacity: f32,
    /// Stroke width in user units
    pub width: f32,
    /// Round line caps
    pub round_cap: bool,
}

impl Stroke {
    /// Opaque stroke
    #[must_use]
    pub const fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            opacity: 1.0,
            width,
            round_cap: false,
        }
    }

    /// Translucent stroke
    #[must_use]
    pub const fn translucent(color: Color, opacity: f32, width: f32) -> Self {
        Self {
            color,
            opacity,
            width,
            round_cap: false,
        }
    }

    /// Use round line caps
    #[must_use]
    pub const fn rounded(mut self) -> Self {
        self.round_cap = true;
        self
    }
}

/// Paint settings for one element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Fill paint
    pub fill: Paint,
    /// Fill opacity, if not opaque
    pub fill_opacity: Option<f32>,
    /// Stroke, if any
    pub stroke: Option<Stroke>,
    /// Whole-element opacity, if not opaque
    pub opacity: Option<f32>,
}

impl Style {
    /// Solid fill, no stroke
    #[must_use]
    pub fn fill(color: Color) -> Self {
        Self {
            fill: Paint::Solid(color),
            fill_opacity: None,
            stroke: None,
            opacity: None,
        }
    }

    /// Gradient fill, no stroke
    #[must_use]
    pub fn gradient(id: &str) -> Self {
        Self {
            fill: Paint::Gradient(id.to_string()),
            fill_opacity: None,
            stroke: None,
            opacity: None,
        }
    }

    /// Stroke only
    #[must_use]
    pub fn outline(stroke: Stroke) -> Self {
        Self {
            fill: Paint::None,
            fill_opacity: None,
            stroke: Some(stroke),
            opacity: None,
        }
    }

    /// Add a stroke
    #[must_use]
    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Set fill opacity
    #[must_use]
    pub fn with_fill_opacity(mut self, opacity: f32) -> Self {
        self.fill_opacity = Some(opacity);
        self
    }

    /// Set whole-element opacity
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }
}

/// One step of an element transform, applied left to right
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TransformOp {
    /// Move by (x, y)
    Translate(f32, f32),
    /// Rotate by `deg` degrees about (cx, cy)
    Rotate {
        /// Angle in degrees
        deg: f32,
        /// Pivot x
        cx: f32,
        /// Pivot y
        cy: f32,
    },
    /// Uniform scale
    Scale(f32),
}

impl TransformOp {
    /// Rotation about the local origin
    #[must_use]
    pub const fn rotate(deg: f32) -> Self {
        Self::Rotate {
            deg,
            cx: 0.0,
            cy: 0.0,
        }
    }
}

/// Looping cosmetic animation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Animation {
    /// `<animate>` over an attribute
    Attribute {
        /// Attribute name
        name: String,
        /// Semicolon separated keyframe values
        values: String,
        /// Loop duration in seconds
        dur_secs: f32,
        /// Start offset in seconds
        begin_secs: f32,
    },
    /// `<animateTransform type="rotate">`, added to the element transform
    Rotate {
        /// Semicolon separated `angle cx cy` keyframes
        values: String,
        /// Loop duration in seconds
        dur_secs: f32,
    },
}

impl Animation {
    /// Attribute animation starting immediately
    #[must_use]
    pub fn attribute(name: &str, values: &str, dur_secs: f32) -> Self {
        Self::Attribute {
            name: name.to_string(),
            values: values.to_string(),
            dur_secs,
            begin_secs: 0.0,
        }
    }
}

/// A drawable element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Layer tag
    pub layer: Layer,
    /// Geometry
    pub shape: Shape,
    /// Paint
    pub style: Style,
    /// Transform steps
    pub transform: Vec<TransformOp>,
    /// CSS class hook for surface-side motion (`blink`, `float-ice`, ...)
    pub class: Option<String>,
    /// Inline animations
    pub animations: Vec<Animation>,
}

impl Element {
    /// New untransformed element
    #[must_use]
    pub fn new(layer: Layer, shape: Shape, style: Style) -> Self {
        Self {
            layer,
            shape,
            style,
            transform: Vec::new(),
            class: None,
            animations: Vec::new(),
        }
    }

    /// Append a transform step
    #[must_use]
    pub fn with_transform(mut self, op: TransformOp) -> Self {
        self.transform.push(op);
        self
    }

    /// Set the CSS class hook
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    /// Attach an animation
    #[must_use]
    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animations.push(animation);
        self
    }
}

/// Gradient direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradientKind {
    /// Top to bottom
    Vertical,
    /// Centre outwards
    Radial,
}

/// One colour stop
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Offset along the gradient (0.0-1.0)
    pub offset: f32,
    /// Stop colour
    pub color: Color,
    /// Stop opacity
    pub opacity: f32,
}

/// Gradient definition referenced by [`Paint::Gradient`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    /// Identifier used in `url(#id)`
    pub id: String,
    /// Direction
    pub kind: GradientKind,
    /// Colour stops
    pub stops: Vec<GradientStop>,
}

/// A complete vector picture
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Illustration {
    /// Coordinate box for all elements
    pub view_box: ViewBox,
    /// Rendered width in rem
    pub width_rem: f32,
    /// Rendered height in rem
    pub height_rem: f32,
    /// Gradient definitions
    pub gradients: Vec<Gradient>,
    /// Elements in paint order
    pub elements: Vec<Element>,
}

impl Illustration {
    /// Empty illustration
    #[must_use]
    pub fn new(view_box: ViewBox, width_rem: f32, height_rem: f32) -> Self {
        Self {
            view_box,
            width_rem,
            height_rem,
            gradients: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Append an element on top
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Append several elements on top
    pub fn extend(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.elements.extend(elements);
    }

    /// Elements on one layer, in paint order
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.layer == layer)
    }

    /// Number of elements on one layer
    #[must_use]
    pub fn count(&self, layer: Layer) -> usize {
        self.layer(layer).count()
    }

    /// Whether anything was drawn on a layer
    #[must_use]
    pub fn has(&self, layer: Layer) -> bool {
        self.layer(layer).next().is_some()
    }

    /// Look up a gradient definition
    #[must_use]
    pub fn gradient(&self, id: &str) -> Option<&Gradient> {
        self.gradients.iter().find(|g| g.id == id)
    }

    /// Render as an SVG document
    #[must_use]
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}
