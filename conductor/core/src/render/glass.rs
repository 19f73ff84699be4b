//! Glass geometry table

use crate::cocktail::GlassType;

/// Ellipse in view-box units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipseGeometry {
    /// Centre x
    pub cx: f32,
    /// Centre y
    pub cy: f32,
    /// Horizontal radius
    pub rx: f32,
    /// Vertical radius
    pub ry: f32,
}

/// Drawing data for one glass type
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlassGeometry {
    /// Glass outline path
    pub outline: &'static str,
    /// Liquid silhouette path
    pub liquid: &'static str,
    /// Rim ellipse
    pub rim: EllipseGeometry,
    /// Translucent liquid surface ellipse
    pub surface: EllipseGeometry,
    /// Stem path, for stemmed glasses
    pub stem: Option<&'static str>,
    /// Foot path, for stemmed glasses
    pub base: Option<&'static str>,
}

const RIM_CX: f32 = 50.0;

const fn ellipse(cy: f32, rx: f32, ry: f32) -> EllipseGeometry {
    EllipseGeometry {
        cx: RIM_CX,
        cy,
        rx,
        ry,
    }
}

const ROCKS: GlassGeometry = GlassGeometry {
    outline: "M25 25 L28 95 Q28 100 50 100 Q72 100 72 95 L75 25",
    liquid: "M27 45 L28 92 Q28 96 50 96 Q72 96 72 92 L73 45",
    rim: ellipse(25.0, 25.0, 5.0),
    surface: ellipse(45.0, 22.5, 5.0),
    stem: None,
    base: None,
};

const HIGHBALL: GlassGeometry = GlassGeometry {
    outline: "M30 15 L32 95 Q32 100 50 100 Q68 100 68 95 L70 15",
    liquid: "M31 30 L32 92 Q32 96 50 96 Q68 96 68 92 L69 30",
    rim: ellipse(15.0, 20.0, 4.0),
    surface: ellipse(30.0, 18.0, 4.0),
    stem: None,
    base: None,
};

const MARTINI: GlassGeometry = GlassGeometry {
    outline: "M15 20 L50 60 L85 20",
    liquid: "M25 32 L50 60 L75 32",
    rim: ellipse(20.0, 35.0, 6.0),
    surface: ellipse(30.0, 24.5, 6.0),
    stem: Some("M50 60 L50 95"),
    base: Some("M30 100 L70 100"),
};

const COUPE: GlassGeometry = GlassGeometry {
    outline: "M20 20 Q20 60 50 60 Q80 60 80 20",
    liquid: "M25 25 Q25 55 50 55 Q75 55 75 25",
    rim: ellipse(20.0, 30.0, 6.0),
    surface: ellipse(30.0, 27.0, 6.0),
    stem: Some("M50 60 L50 95"),
    base: Some("M30 100 L70 100"),
};

const FLUTE: GlassGeometry = GlassGeometry {
    outline: "M35 15 Q30 70 50 70 Q70 70 65 15",
    liquid: "M37 25 Q35 65 50 65 Q65 65 63 25",
    rim: ellipse(15.0, 15.0, 3.0),
    surface: ellipse(45.0, 13.5, 3.0),
    stem: Some("M50 70 L50 95"),
    base: Some("M35 100 L65 100"),
};

impl GlassGeometry {
    /// Look up the geometry for a glass type
    #[must_use]
    pub const fn for_glass(glass: GlassType) -> &'static Self {
        match glass {
            GlassType::Rocks => &ROCKS,
            GlassType::Highball => &HIGHBALL,
            GlassType::Martini => &MARTINI,
            GlassType::Coupe => &COUPE,
            GlassType::Flute => &FLUTE,
        }
    }
}
