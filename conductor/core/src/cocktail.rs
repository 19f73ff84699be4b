//! Cocktail Artifacts
//!
//! The structured drink description returned by the mix collaborator. A
//! cocktail is immutable once received and is shared read-only between the
//! artifact message that serves it and the whisper message that may follow.
//!
//! # Lenient enums
//!
//! The visual structure is a closed set of enums, but the generator is an LLM.
//! Every enum deserializes from any string (or `null`): unknown values degrade
//! to the documented default (`rocks` glass, no ice, no garnish) instead of
//! failing the whole turn.

use serde::{Deserialize, Serialize};

/// Liquid colour used when `colorHex` is missing or unparseable
pub const DEFAULT_LIQUID_HEX: &str = "#ea580c";

/// Keyword used for the whisper card's backdrop when the cocktail has none
pub const DEFAULT_IMAGE_KEYWORD: &str = "abstract_art";

const ATMOSPHERE_IMAGE_BASE: &str = "https://image.pollinations.ai/prompt/";
const ATMOSPHERE_IMAGE_SUFFIX: &str =
    "%20mysterious%20cinematic%20atmospheric%20dark?width=300&height=450&nologo=true";

/// Shape of the glass the drink is served in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Option<String>")]
pub enum GlassType {
    /// V-shaped cocktail glass on a stem
    Martini,
    /// Old fashioned tumbler
    #[default]
    Rocks,
    /// Tall straight glass
    Highball,
    /// Champagne flute
    Flute,
    /// Shallow rounded bowl on a stem
    Coupe,
}

impl GlassType {
    /// Every glass, in table order
    pub const ALL: [Self; 5] = [
        Self::Martini,
        Self::Rocks,
        Self::Highball,
        Self::Flute,
        Self::Coupe,
    ];

    /// Parse a glass name, falling back to [`GlassType::Rocks`]
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match normalize(name).as_str() {
            "martini" => Self::Martini,
            "rocks" => Self::Rocks,
            "highball" => Self::Highball,
            "flute" => Self::Flute,
            "coupe" => Self::Coupe,
            _ => Self::default(),
        }
    }

    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Martini => "martini",
            Self::Rocks => "rocks",
            Self::Highball => "highball",
            Self::Flute => "flute",
            Self::Coupe => "coupe",
        }
    }

    /// Stemmed glasses carry a stem and a base and never show ice
    #[must_use]
    pub const fn is_stemmed(&self) -> bool {
        matches!(self, Self::Martini | Self::Coupe | Self::Flute)
    }
}

impl From<Option<String>> for GlassType {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map_or_else(Self::default, Self::parse)
    }
}

/// Decoration placed on the rim
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Option<String>")]
pub enum Garnish {
    /// Twisted orange peel ribbon
    OrangePeel,
    /// Cocktail cherry on a stem
    Cherry,
    /// Mint sprig
    Mint,
    /// Lemon wheel on the rim
    LemonSlice,
    /// Olive on a pick
    Olive,
    /// Edible flower
    Flower,
    /// Nothing on the rim
    #[default]
    None,
}

impl Garnish {
    /// Every garnish, including [`Garnish::None`]
    pub const ALL: [Self; 7] = [
        Self::OrangePeel,
        Self::Cherry,
        Self::Mint,
        Self::LemonSlice,
        Self::Olive,
        Self::Flower,
        Self::None,
    ];

    /// Parse a garnish name, falling back to [`Garnish::None`]
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match normalize(name).as_str() {
            "orange_peel" => Self::OrangePeel,
            "cherry" => Self::Cherry,
            "mint" => Self::Mint,
            "lemon_slice" => Self::LemonSlice,
            "olive" => Self::Olive,
            "flower" => Self::Flower,
            _ => Self::None,
        }
    }

    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OrangePeel => "orange_peel",
            Self::Cherry => "cherry",
            Self::Mint => "mint",
            Self::LemonSlice => "lemon_slice",
            Self::Olive => "olive",
            Self::Flower => "flower",
            Self::None => "none",
        }
    }
}

impl From<Option<String>> for Garnish {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map_or_else(Self::default, Self::parse)
    }
}

/// Ice in the glass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Option<String>")]
pub enum Ice {
    /// Three square cubes
    Cubes,
    /// One large sphere
    Sphere,
    /// Crushed shards
    Crushed,
    /// Served neat
    #[default]
    None,
}

impl Ice {
    /// Every ice style, including [`Ice::None`]
    pub const ALL: [Self; 4] = [Self::Cubes, Self::Sphere, Self::Crushed, Self::None];

    /// Parse an ice name, falling back to [`Ice::None`]
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match normalize(name).as_str() {
            "cubes" => Self::Cubes,
            "sphere" => Self::Sphere,
            "crushed" => Self::Crushed,
            _ => Self::None,
        }
    }

    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cubes => "cubes",
            Self::Sphere => "sphere",
            Self::Crushed => "crushed",
            Self::None => "none",
        }
    }
}

impl From<Option<String>> for Ice {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map_or_else(Self::default, Self::parse)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

/// Renderable structure of a drink
///
/// Must agree with the poetic [`Cocktail::visual_description`]; that agreement
/// is the generator's contract and is not checked here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualStructure {
    /// Glass shape
    pub glass_type: GlassType,
    /// Rim decoration
    pub garnish: Garnish,
    /// Ice style
    pub ice: Ice,
    /// Dominant liquid colour as `#rrggbb` text (not validated here)
    pub color_hex: String,
}

impl Default for VisualStructure {
    fn default() -> Self {
        Self {
            glass_type: GlassType::default(),
            garnish: Garnish::default(),
            ice: Ice::default(),
            color_hex: DEFAULT_LIQUID_HEX.to_string(),
        }
    }
}

impl VisualStructure {
    /// Build a structure from its four parts
    pub fn new(glass_type: GlassType, garnish: Garnish, ice: Ice, color_hex: impl Into<String>) -> Self {
        Self {
            glass_type,
            garnish,
            ice,
            color_hex: color_hex.into(),
        }
    }
}

/// What goes into the glass
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Base spirit
    pub base: String,
    /// Adjunct
    pub adjunct: String,
    /// The abstract ingredient ("the soul"), e.g. "the first light of morning"
    #[serde(rename = "abstract")]
    pub soul: String,
}

/// A generated cocktail
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cocktail {
    /// Poetic drink name; whispers are de-duplicated by this name
    pub name: String,
    /// Ingredients
    pub recipe: Recipe,
    /// Poetic description of colour, glass and garnish
    #[serde(rename = "visual", alias = "visualDescription")]
    pub visual_description: String,
    /// Structured rendering data
    #[serde(default)]
    pub visual_structure: VisualStructure,
    /// Tasting notes
    pub taste: String,
    /// Line revealed on the whisper card
    pub whisper: String,
    /// Suggested track ("Artist - Song")
    #[serde(rename = "music", alias = "musicSuggestion")]
    pub music_suggestion: String,
    /// English keyword for the whisper card backdrop
    #[serde(default)]
    pub image_keyword: String,
}

impl Cocktail {
    /// Backdrop image for the whisper card
    ///
    /// Falls back to [`DEFAULT_IMAGE_KEYWORD`] when the keyword is blank.
    /// Characters outside `[A-Za-z0-9_-]` are percent-encoded.
    #[must_use]
    pub fn atmosphere_image_url(&self) -> String {
        let keyword = self.image_keyword.trim();
        let keyword = if keyword.is_empty() {
            DEFAULT_IMAGE_KEYWORD
        } else {
            keyword
        };

        let mut encoded = String::with_capacity(keyword.len());
        for byte in keyword.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
                encoded.push(char::from(byte));
            } else {
                encoded.push_str(&format!("%{byte:02X}"));
            }
        }

        format!("{ATMOSPHERE_IMAGE_BASE}{encoded}{ATMOSPHERE_IMAGE_SUFFIX}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn midnight_ember_json() -> &'static str {
        r##"{
            "name": "Midnight Ember",
            "recipe": {"base": "Smoked bourbon", "adjunct": "Blood orange", "abstract": "A sigh at the end of autumn"},
            "visual": "Amber liquid in a heavy rocks glass, a cherry resting on the rim over clinking cubes",
            "visualStructure": {"glassType": "rocks", "garnish": "cherry", "ice": "cubes", "colorHex": "#EA580C"},
            "taste": "Smoke first, then citrus, then warmth",
            "whisper": "Even embers remember the fire, meow",
            "music": "Chet Baker - Almost Blue",
            "imageKeyword": "city_night"
        }"##
    }

    #[test]
    fn test_deserialize_collaborator_payload() {
        let cocktail: Cocktail = serde_json::from_str(midnight_ember_json()).unwrap();

        assert_eq!(cocktail.name, "Midnight Ember");
        assert_eq!(cocktail.recipe.soul, "A sigh at the end of autumn");
        assert_eq!(cocktail.visual_structure.glass_type, GlassType::Rocks);
        assert_eq!(cocktail.visual_structure.garnish, Garnish::Cherry);
        assert_eq!(cocktail.visual_structure.ice, Ice::Cubes);
        assert_eq!(cocktail.visual_structure.color_hex, "#EA580C");
        assert_eq!(cocktail.music_suggestion, "Chet Baker - Almost Blue");
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let cocktail: Cocktail = serde_json::from_str(midnight_ember_json()).unwrap();
        let value = serde_json::to_value(&cocktail).unwrap();

        assert_eq!(value["recipe"]["abstract"], "A sigh at the end of autumn");
        assert_eq!(value["visualStructure"]["glassType"], "rocks");
        assert_eq!(value["visualStructure"]["garnish"], "cherry");
        assert_eq!(value["visual"], cocktail.visual_description.as_str());
        assert_eq!(value["music"], "Chet Baker - Almost Blue");
    }

    #[test]
    fn test_unknown_enum_values_degrade_to_defaults() {
        let structure: VisualStructure = serde_json::from_str(
            r##"{"glassType": "tiki_mug", "garnish": "umbrella", "ice": "glacier", "colorHex": "#123456"}"##,
        )
        .unwrap();

        assert_eq!(structure.glass_type, GlassType::Rocks);
        assert_eq!(structure.garnish, Garnish::None);
        assert_eq!(structure.ice, Ice::None);
    }

    #[test]
    fn test_missing_and_null_fields_degrade_to_defaults() {
        let structure: VisualStructure = serde_json::from_str(r#"{"glassType": null}"#).unwrap();
        assert_eq!(structure, VisualStructure::default());
        assert_eq!(structure.color_hex, DEFAULT_LIQUID_HEX);
    }

    #[test]
    fn test_parse_is_forgiving_about_case_and_separators() {
        assert_eq!(GlassType::parse(" Martini "), GlassType::Martini);
        assert_eq!(Garnish::parse("Orange-Peel"), Garnish::OrangePeel);
        assert_eq!(Garnish::parse("lemon slice"), Garnish::LemonSlice);
        assert_eq!(Ice::parse("SPHERE"), Ice::Sphere);
    }

    #[test]
    fn test_stemmed_glasses() {
        let stemmed: Vec<_> = GlassType::ALL.iter().filter(|g| g.is_stemmed()).collect();
        assert_eq!(
            stemmed,
            vec![&GlassType::Martini, &GlassType::Flute, &GlassType::Coupe]
        );
    }

    #[test]
    fn test_atmosphere_image_url() {
        let mut cocktail: Cocktail = serde_json::from_str(midnight_ember_json()).unwrap();
        assert!(cocktail
            .atmosphere_image_url()
            .starts_with("https://image.pollinations.ai/prompt/city_night%20mysterious"));

        cocktail.image_keyword = "   ".to_string();
        assert!(cocktail.atmosphere_image_url().contains("/prompt/abstract_art%20"));

        cocktail.image_keyword = "rainy window".to_string();
        assert!(cocktail.atmosphere_image_url().contains("/prompt/rainy%20window%20"));
    }
}
