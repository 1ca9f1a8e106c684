//! Custom cake design record and its reducer.
//!
//! Every wizard step emits a [`DesignPatch`] holding only the fields it owns;
//! [`CakeDesign::apply`] shallow-merges the patch into the current snapshot.
//! No validation happens here, step gating lives in [`crate::domain::wizard`].

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

pub const MIN_LAYERS: u8 = 1;
pub const MAX_LAYERS: u8 = 5;
pub const MAX_CANDLES: u32 = 100;
pub const MAX_CAKE_TEXT_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[default]
    Birthday,
    Wedding,
    Anniversary,
    Graduation,
    BabyShower,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FrostingType {
    #[default]
    Buttercream,
    Fondant,
    WhippedCream,
    Ganache,
    CreamCheese,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CandleType {
    #[default]
    Regular,
    Number,
    Sparkler,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TextFont {
    #[default]
    Script,
    Bold,
    Elegant,
    Playful,
    Modern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TextPosition {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Coarse client-side cost bucket. The backend prices designs on its own;
/// this only drives the cart estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DesignComplexity {
    Simple,
    Moderate,
    Complex,
    Intricate,
}

impl DesignComplexity {
    pub fn surcharge(self) -> Decimal {
        match self {
            DesignComplexity::Simple => Decimal::ZERO,
            DesignComplexity::Moderate => Decimal::from(50),
            DesignComplexity::Complex => Decimal::from(100),
            DesignComplexity::Intricate => Decimal::from(200),
        }
    }
}

impl FromStr for DesignComplexity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(DesignComplexity::Simple),
            "moderate" => Ok(DesignComplexity::Moderate),
            "complex" => Ok(DesignComplexity::Complex),
            "intricate" => Ok(DesignComplexity::Intricate),
            _ => Err(()),
        }
    }
}

/// Flavor and size chosen for a single tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct LayerSpec {
    pub flavor_id: Option<i64>,
    pub size_id: Option<i64>,
}

impl LayerSpec {
    pub fn is_complete(&self) -> bool {
        self.flavor_id.is_some() && self.size_id.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Decoration3D {
    pub decoration_type: String,
    pub position: Vec3,
    pub color: String,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CakeDesign {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub event_type: EventType,
    pub event_date: Option<NaiveDate>,

    pub num_layers: u8,
    pub layers: Vec<LayerSpec>,

    pub frosting_type: FrostingType,
    pub frosting_color: String,
    pub theme_id: Option<i64>,
    pub candles_count: u32,
    pub candle_type: CandleType,
    pub cake_text: Option<String>,
    pub text_color: String,
    pub text_font: TextFont,
    pub text_position: TextPosition,
    pub decorations: Vec<Decoration3D>,
    pub special_instructions: Option<String>,
    pub dietary_restrictions: Option<String>,

    #[serde(deserialize_with = "lenient_complexity")]
    #[schema(value_type = Option<DesignComplexity>)]
    pub design_complexity: Option<DesignComplexity>,
}

impl Default for CakeDesign {
    fn default() -> Self {
        Self {
            customer_name: String::new(),
            customer_email: String::new(),
            customer_phone: String::new(),
            event_type: EventType::default(),
            event_date: None,
            num_layers: MIN_LAYERS,
            layers: vec![LayerSpec::default()],
            frosting_type: FrostingType::default(),
            frosting_color: "#FFFFFF".to_string(),
            theme_id: None,
            candles_count: 0,
            candle_type: CandleType::default(),
            cake_text: None,
            text_color: "#000000".to_string(),
            text_font: TextFont::default(),
            text_position: TextPosition::default(),
            decorations: Vec::new(),
            special_instructions: None,
            dietary_restrictions: None,
            design_complexity: Some(DesignComplexity::Simple),
        }
    }
}

impl CakeDesign {
    /// Tier lookup by 1-based layer number.
    pub fn layer(&self, number: u8) -> Option<&LayerSpec> {
        let index = usize::from(number).checked_sub(1)?;
        self.layers.get(index)
    }

    /// Assign a tier by 1-based layer number. Numbers beyond `num_layers` are
    /// ignored.
    pub fn set_layer(&mut self, number: u8, spec: LayerSpec) -> bool {
        if number == 0 || number > self.num_layers {
            return false;
        }
        self.resize_layers();
        self.layers[usize::from(number) - 1] = spec;
        true
    }

    /// Layer numbers in `1..=num_layers` still missing a flavor or a size.
    pub fn incomplete_layers(&self) -> Vec<u8> {
        (1..=self.num_layers)
            .filter(|n| !self.layer(*n).is_some_and(LayerSpec::is_complete))
            .collect()
    }

    pub fn complexity_surcharge(&self) -> Decimal {
        self.design_complexity
            .map_or(Decimal::ZERO, DesignComplexity::surcharge)
    }

    /// Shallow-merge a partial update into this design.
    pub fn apply(&mut self, patch: DesignPatch) {
        let DesignPatch {
            customer_name,
            customer_email,
            customer_phone,
            event_type,
            event_date,
            num_layers,
            layers,
            frosting_type,
            frosting_color,
            theme_id,
            candles_count,
            candle_type,
            cake_text,
            text_color,
            text_font,
            text_position,
            decorations,
            special_instructions,
            dietary_restrictions,
            design_complexity,
        } = patch;

        set_if_some(&mut self.customer_name, customer_name);
        set_if_some(&mut self.customer_email, customer_email);
        set_if_some(&mut self.customer_phone, customer_phone);
        set_if_some(&mut self.event_type, event_type);
        set_if_some(&mut self.event_date, event_date);
        if let Some(layers) = layers {
            if num_layers.is_none() {
                self.num_layers = u8::try_from(layers.len()).unwrap_or(u8::MAX);
            }
            self.layers = layers;
        }
        set_if_some(&mut self.num_layers, num_layers);
        set_if_some(&mut self.frosting_type, frosting_type);
        set_if_some(&mut self.frosting_color, frosting_color);
        set_if_some(&mut self.theme_id, theme_id);
        set_if_some(&mut self.candles_count, candles_count);
        set_if_some(&mut self.candle_type, candle_type);
        set_if_some(&mut self.cake_text, cake_text);
        set_if_some(&mut self.text_color, text_color);
        set_if_some(&mut self.text_font, text_font);
        set_if_some(&mut self.text_position, text_position);
        set_if_some(&mut self.decorations, decorations);
        set_if_some(&mut self.special_instructions, special_instructions);
        set_if_some(&mut self.dietary_restrictions, dietary_restrictions);
        set_if_some(&mut self.design_complexity, design_complexity);

        self.resize_layers();
    }

    /// Keep `layers` the same length as `num_layers`.
    fn resize_layers(&mut self) {
        self.layers
            .resize(usize::from(self.num_layers), LayerSpec::default());
    }
}

fn set_if_some<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Partial update emitted by a wizard step. Absent fields are left alone;
/// nullable fields accept an explicit `null` to clear them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(default)]
pub struct DesignPatch {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub event_type: Option<EventType>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<NaiveDate>)]
    pub event_date: Option<Option<NaiveDate>>,
    pub num_layers: Option<u8>,
    pub layers: Option<Vec<LayerSpec>>,
    pub frosting_type: Option<FrostingType>,
    pub frosting_color: Option<String>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<i64>)]
    pub theme_id: Option<Option<i64>>,
    pub candles_count: Option<u32>,
    pub candle_type: Option<CandleType>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub cake_text: Option<Option<String>>,
    pub text_color: Option<String>,
    pub text_font: Option<TextFont>,
    pub text_position: Option<TextPosition>,
    pub decorations: Option<Vec<Decoration3D>>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub special_instructions: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub dietary_restrictions: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<DesignComplexity>)]
    pub design_complexity: Option<Option<DesignComplexity>>,
}

/// Immutable snapshot handed to the backend when the wizard finishes.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DesignSubmission {
    #[serde(flatten)]
    pub design: CakeDesign,
    pub estimated_surcharge: Decimal,
    pub submitted_at: DateTime<Utc>,
}

impl DesignSubmission {
    pub fn from_design(design: &CakeDesign) -> Self {
        Self {
            design: design.clone(),
            estimated_surcharge: design.complexity_surcharge(),
            submitted_at: Utc::now(),
        }
    }
}

/// Marks a field as present even when its value is `null`, so that
/// `Option<Option<T>>` can tell "clear" apart from "leave alone".
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn lenient_complexity<'de, D>(deserializer: D) -> Result<Option<DesignComplexity>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}
