//! Widget customization: the stored partial blob, the fully resolved
//! configuration, and the merge between them.
//!
//! Storage holds a [`PartialCustomization`] (every field optional). Readers
//! never see it directly: [`merge_with_defaults`] fills every missing field
//! from the defaults and clamps numbers into range. Defaults are applied on
//! read only, so changing a default changes every waitlist that never set
//! that field.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

impl FromStr for Theme {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "auto" => Ok(Self::Auto),
            other => Err(CoreError::Validation(format!(
                "Invalid theme '{other}'. Must be one of: light, dark, auto"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animation {
    None,
    #[default]
    Fade,
    Slide,
    Bounce,
}

impl FromStr for Animation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "fade" => Ok(Self::Fade),
            "slide" => Ok(Self::Slide),
            "bounce" => Ok(Self::Bounce),
            other => Err(CoreError::Validation(format!(
                "Invalid animation '{other}'. Must be one of: none, fade, slide, bounce"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Numeric bounds
// ---------------------------------------------------------------------------

/// Inclusive range for a numeric customization field.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub field: &'static str,
    pub min: i32,
    pub max: i32,
}

impl Bounds {
    /// Reject values outside `[min, max]`.
    pub fn check(&self, value: f64) -> Result<(), CoreError> {
        if !value.is_finite() || value < f64::from(self.min) || value > f64::from(self.max) {
            return Err(CoreError::Validation(format!(
                "{} must be between {} and {}, got {value}",
                self.field, self.min, self.max
            )));
        }
        Ok(())
    }

    /// Round to the nearest integer and clamp into `[min, max]`.
    pub fn clamp(&self, value: f64) -> i32 {
        if !value.is_finite() {
            return self.min;
        }
        let rounded = value.round().clamp(f64::from(self.min), f64::from(self.max));
        rounded as i32
    }
}

pub const FORM_WIDTH: Bounds = Bounds { field: "formWidth", min: 300, max: 800 };
pub const BORDER_RADIUS: Bounds = Bounds { field: "borderRadius", min: 0, max: 24 };
pub const FONT_SIZE: Bounds = Bounds { field: "fontSize", min: 12, max: 24 };
pub const PADDING: Bounds = Bounds { field: "padding", min: 12, max: 48 };
pub const SHADOW_INTENSITY: Bounds = Bounds { field: "shadowIntensity", min: 0, max: 10 };

/// Maximum length of a color string.
pub const MAX_COLOR_LEN: usize = 64;

/// Maximum length of a text field (button, header, description, placeholder).
pub const MAX_TEXT_LEN: usize = 500;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_FORM_WIDTH: i32 = 400;
pub const DEFAULT_BUTTON_COLOR: &str = "#3b82f6";
pub const DEFAULT_BUTTON_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";
pub const DEFAULT_TEXT_COLOR: &str = "#1f2937";
pub const DEFAULT_BORDER_RADIUS: i32 = 8;
pub const DEFAULT_BUTTON_TEXT: &str = "Join Waitlist";
pub const DEFAULT_DESCRIPTION_TEXT: &str = "Be the first to know when we launch!";
pub const DEFAULT_PLACEHOLDER_TEXT: &str = "Enter your email";
pub const DEFAULT_FONT_SIZE: i32 = 16;
pub const DEFAULT_PADDING: i32 = 24;
pub const DEFAULT_SHADOW_INTENSITY: i32 = 2;

/// Default header line for a waitlist called `name`.
pub fn default_header_text(name: &str) -> String {
    format!("Join {name}")
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved customization served to the widget. Every field is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    pub theme: Theme,
    pub form_width: i32,
    pub button_color: String,
    pub button_text_color: String,
    pub background_color: String,
    pub text_color: String,
    pub border_radius: i32,
    pub include_leaderboard: bool,
    pub referrer_tracking: bool,
    pub include_brand_badge: bool,
    pub include_name_field: bool,
    pub button_text: String,
    pub header_text: String,
    pub description_text: String,
    pub placeholder_text: String,
    pub animation: Animation,
    pub font_size: i32,
    pub padding: i32,
    pub shadow_intensity: i32,
}

impl Customization {
    /// The defaults for a waitlist called `waitlist_name`.
    pub fn defaults_for(waitlist_name: &str) -> Self {
        merge_with_defaults(&PartialCustomization::default(), waitlist_name)
    }
}

// ---------------------------------------------------------------------------
// Partial (stored) customization
// ---------------------------------------------------------------------------

/// Customization as stored and as accepted on update. `None` means "use the
/// default"; JSON `null` deserializes to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialCustomization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_leaderboard: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer_tracking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_brand_badge: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_name_field: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_intensity: Option<f64>,
}

/// Keys of a stored blob that could not be read and were ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoredKeys(pub Vec<String>);

impl fmt::Display for IgnoredKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

impl PartialCustomization {
    /// Read a stored JSON blob leniently.
    ///
    /// A non-object blob reads as empty. Inside an object, each key whose
    /// value has the wrong type is dropped on its own so one bad field does
    /// not discard the rest. Unknown keys are ignored silently.
    pub fn from_stored(value: Option<&serde_json::Value>) -> (Self, IgnoredKeys) {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return (Self::default(), IgnoredKeys::default());
        };
        let Some(object) = value.as_object() else {
            return (Self::default(), IgnoredKeys(vec!["<root>".into()]));
        };

        if let Ok(mut parsed) = serde_json::from_value::<Self>(value.clone()) {
            let ignored = parsed.drop_invalid_colors();
            return (parsed, IgnoredKeys(ignored));
        }

        let mut kept = serde_json::Map::new();
        let mut ignored = Vec::new();
        for (key, field) in object {
            let mut single = serde_json::Map::new();
            single.insert(key.clone(), field.clone());
            if serde_json::from_value::<Self>(serde_json::Value::Object(single)).is_ok() {
                kept.insert(key.clone(), field.clone());
            } else {
                ignored.push(key.clone());
            }
        }
        let mut parsed =
            serde_json::from_value::<Self>(serde_json::Value::Object(kept)).unwrap_or_default();
        ignored.extend(parsed.drop_invalid_colors());
        (parsed, IgnoredKeys(ignored))
    }

    /// Clear color fields that are not a recognised CSS color, returning
    /// their keys. Stored colors end up inside the embed page's `<style>`.
    fn drop_invalid_colors(&mut self) -> Vec<String> {
        let mut dropped = Vec::new();
        for (key, slot) in [
            ("buttonColor", &mut self.button_color),
            ("buttonTextColor", &mut self.button_text_color),
            ("backgroundColor", &mut self.background_color),
            ("textColor", &mut self.text_color),
        ] {
            if slot.as_deref().is_some_and(|c| !is_valid_color(c)) {
                *slot = None;
                dropped.push(key.to_string());
            }
        }
        dropped
    }

    /// Validate every supplied field against its range and length limits.
    pub fn validate(&self) -> Result<(), CoreError> {
        let numbers = [
            (FORM_WIDTH, self.form_width),
            (BORDER_RADIUS, self.border_radius),
            (FONT_SIZE, self.font_size),
            (PADDING, self.padding),
            (SHADOW_INTENSITY, self.shadow_intensity),
        ];
        for (bounds, value) in numbers {
            if let Some(v) = value {
                bounds.check(v)?;
            }
        }

        let colors = [
            ("buttonColor", &self.button_color),
            ("buttonTextColor", &self.button_text_color),
            ("backgroundColor", &self.background_color),
            ("textColor", &self.text_color),
        ];
        for (field, value) in colors {
            if let Some(color) = value {
                validate_color(field, color)?;
            }
        }

        let texts = [
            ("buttonText", &self.button_text),
            ("headerText", &self.header_text),
            ("descriptionText", &self.description_text),
            ("placeholderText", &self.placeholder_text),
        ];
        for (field, value) in texts {
            if let Some(text) = value {
                if text.chars().count() > MAX_TEXT_LEN {
                    return Err(CoreError::Validation(format!(
                        "{field} must be at most {MAX_TEXT_LEN} characters"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Field-by-field overlay: every field set in `over` replaces the
    /// corresponding field of `self`.
    pub fn overlay(&self, over: &PartialCustomization) -> PartialCustomization {
        PartialCustomization {
            theme: over.theme.or(self.theme),
            form_width: over.form_width.or(self.form_width),
            button_color: over.button_color.clone().or_else(|| self.button_color.clone()),
            button_text_color: over
                .button_text_color
                .clone()
                .or_else(|| self.button_text_color.clone()),
            background_color: over
                .background_color
                .clone()
                .or_else(|| self.background_color.clone()),
            text_color: over.text_color.clone().or_else(|| self.text_color.clone()),
            border_radius: over.border_radius.or(self.border_radius),
            include_leaderboard: over.include_leaderboard.or(self.include_leaderboard),
            referrer_tracking: over.referrer_tracking.or(self.referrer_tracking),
            include_brand_badge: over.include_brand_badge.or(self.include_brand_badge),
            include_name_field: over.include_name_field.or(self.include_name_field),
            button_text: over.button_text.clone().or_else(|| self.button_text.clone()),
            header_text: over.header_text.clone().or_else(|| self.header_text.clone()),
            description_text: over
                .description_text
                .clone()
                .or_else(|| self.description_text.clone()),
            placeholder_text: over
                .placeholder_text
                .clone()
                .or_else(|| self.placeholder_text.clone()),
            animation: over.animation.or(self.animation),
            font_size: over.font_size.or(self.font_size),
            padding: over.padding.or(self.padding),
            shadow_intensity: over.shadow_intensity.or(self.shadow_intensity),
        }
    }

    /// Parse URL query overrides (iframe embed).
    ///
    /// Keys use the same camelCase names as the JSON blob; `color` is accepted
    /// as an alias for `buttonColor`. Values that fail to parse, and string
    /// values that fail validation, are ignored.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let text = |key: &str, limit: usize| {
            params
                .get(key)
                .filter(|v| !v.is_empty() && v.chars().count() <= limit)
                .cloned()
        };
        let color = |key: &str| text(key, MAX_COLOR_LEN).filter(|v| is_valid_color(v));
        let number = |key: &str| params.get(key).and_then(|v| v.trim().parse::<f64>().ok());
        let flag = |key: &str| params.get(key).and_then(|v| parse_flag(v));

        PartialCustomization {
            theme: params.get("theme").and_then(|v| v.parse().ok()),
            form_width: number("formWidth"),
            button_color: color("buttonColor").or_else(|| color("color")),
            button_text_color: color("buttonTextColor"),
            background_color: color("backgroundColor"),
            text_color: color("textColor"),
            border_radius: number("borderRadius"),
            include_leaderboard: flag("includeLeaderboard"),
            referrer_tracking: flag("referrerTracking"),
            include_brand_badge: flag("includeBrandBadge"),
            include_name_field: flag("includeNameField"),
            button_text: text("buttonText", MAX_TEXT_LEN),
            header_text: text("headerText", MAX_TEXT_LEN),
            description_text: text("descriptionText", MAX_TEXT_LEN),
            placeholder_text: text("placeholderText", MAX_TEXT_LEN),
            animation: params.get("animation").and_then(|v| v.parse().ok()),
            font_size: number("fontSize"),
            padding: number("padding"),
            shadow_intensity: number("shadowIntensity"),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), `rgb()`/`rgba()`/`hsl()`/
/// `hsla()` with plain numeric arguments, or a bare color keyword.
static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})|(?:rgba?|hsla?)\([0-9a-zA-Z.,%/+\s-]+\)|[a-zA-Z]+)$",
    )
    .expect("valid regex")
});

/// Whether `value` is a CSS color this service will put into a stylesheet.
pub fn is_valid_color(value: &str) -> bool {
    value.chars().count() <= MAX_COLOR_LEN && COLOR_RE.is_match(value.trim())
}

fn validate_color(field: &str, color: &str) -> Result<(), CoreError> {
    if color.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if color.chars().count() > MAX_COLOR_LEN {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_COLOR_LEN} characters"
        )));
    }
    if !is_valid_color(color) {
        return Err(CoreError::Validation(format!(
            "{field} must be a hex, rgb(), hsl() or named color"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Resolve a partial customization against the defaults.
///
/// Set fields win field by field; numbers are rounded and clamped. The
/// result depends only on the arguments.
pub fn merge_with_defaults(partial: &PartialCustomization, waitlist_name: &str) -> Customization {
    let or_default = |value: &Option<String>, default: &str| {
        value.clone().unwrap_or_else(|| default.to_string())
    };

    Customization {
        theme: partial.theme.unwrap_or_default(),
        form_width: partial
            .form_width
            .map_or(DEFAULT_FORM_WIDTH, |v| FORM_WIDTH.clamp(v)),
        button_color: or_default(&partial.button_color, DEFAULT_BUTTON_COLOR),
        button_text_color: or_default(&partial.button_text_color, DEFAULT_BUTTON_TEXT_COLOR),
        background_color: or_default(&partial.background_color, DEFAULT_BACKGROUND_COLOR),
        text_color: or_default(&partial.text_color, DEFAULT_TEXT_COLOR),
        border_radius: partial
            .border_radius
            .map_or(DEFAULT_BORDER_RADIUS, |v| BORDER_RADIUS.clamp(v)),
        include_leaderboard: partial.include_leaderboard.unwrap_or(true),
        referrer_tracking: partial.referrer_tracking.unwrap_or(true),
        include_brand_badge: partial.include_brand_badge.unwrap_or(false),
        include_name_field: partial.include_name_field.unwrap_or(true),
        button_text: or_default(&partial.button_text, DEFAULT_BUTTON_TEXT),
        header_text: partial
            .header_text
            .clone()
            .unwrap_or_else(|| default_header_text(waitlist_name)),
        description_text: or_default(&partial.description_text, DEFAULT_DESCRIPTION_TEXT),
        placeholder_text: or_default(&partial.placeholder_text, DEFAULT_PLACEHOLDER_TEXT),
        animation: partial.animation.unwrap_or_default(),
        font_size: partial
            .font_size
            .map_or(DEFAULT_FONT_SIZE, |v| FONT_SIZE.clamp(v)),
        padding: partial.padding.map_or(DEFAULT_PADDING, |v| PADDING.clamp(v)),
        shadow_intensity: partial
            .shadow_intensity
            .map_or(DEFAULT_SHADOW_INTENSITY, |v| SHADOW_INTENSITY.clamp(v)),
    }
}

// ---------------------------------------------------------------------------
// Widget configuration payload
// ---------------------------------------------------------------------------

/// Waitlist summary embedded in the widget configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetWaitlist {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub signup_count: i64,
}

/// What `GET /widget/{slug}/config` returns and what the embed page inlines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetConfig {
    pub waitlist: WidgetWaitlist,
    pub customization: Customization,
}

impl WidgetConfig {
    pub fn resolve(waitlist: WidgetWaitlist, stored: &PartialCustomization) -> Self {
        let customization = merge_with_defaults(stored, &waitlist.name);
        Self {
            waitlist,
            customization,
        }
    }
}
