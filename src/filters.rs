use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::media_types::MediaKind;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?[0-9A-Fa-f]{6}$").expect("hex color pattern is valid")
});

pub const ORIENTATION_PARAM: &str = "orientation";
pub const COLOR_PARAM: &str = "color";
pub const SIZE_PARAM: &str = "size";

/// Color swatches offered next to the custom color picker.
pub const SUPPORTED_COLORS: [(&str, &str); 12] = [
    ("red", "#EF4444"),
    ("orange", "#F97316"),
    ("yellow", "#EAB308"),
    ("green", "#22C55E"),
    ("turquoise", "#06B6D4"),
    ("blue", "#3B82F6"),
    ("violet", "#8B5CF6"),
    ("pink", "#EC4899"),
    ("brown", "#A3A3A3"),
    ("black", "#000000"),
    ("gray", "#6B7280"),
    ("white", "#FFFFFF"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    pub const ALL: [Orientation; 3] = [
        Orientation::Landscape,
        Orientation::Portrait,
        Orientation::Square,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Square => "square",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Orientation::Landscape => "Landscape",
            Orientation::Portrait => "Portrait",
            Orientation::Square => "Square",
        }
    }
}

impl FromStr for Orientation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "landscape" => Ok(Orientation::Landscape),
            "portrait" => Ok(Orientation::Portrait),
            "square" => Ok(Orientation::Square),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimum size filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MinSize {
    Small,
    Medium,
    Large,
}

impl MinSize {
    pub const ALL: [MinSize; 3] = [MinSize::Small, MinSize::Medium, MinSize::Large];

    pub fn as_str(&self) -> &'static str {
        match self {
            MinSize::Small => "small",
            MinSize::Medium => "medium",
            MinSize::Large => "large",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MinSize::Small => "Small",
            MinSize::Medium => "Medium",
            MinSize::Large => "Large",
        }
    }
}

impl FromStr for MinSize {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(MinSize::Small),
            "medium" => Ok(MinSize::Medium),
            "large" => Ok(MinSize::Large),
            _ => Err(()),
        }
    }
}

impl fmt::Display for MinSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A 6-digit hex color, normalized to uppercase and stored without `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Accepts `#RRGGBB` (form input) or `RRGGBB` (URL form), any case.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if !HEX_COLOR.is_match(value) {
            return None;
        }
        Some(HexColor(value.trim_start_matches('#').to_ascii_uppercase()))
    }

    /// URL form: `FF0000`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// CSS / form form: `#FF0000`.
    pub fn css(&self) -> String {
        format!("#{}", self.0)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Filters applied to a search. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FilterState {
    pub orientation: Option<Orientation>,
    pub color: Option<HexColor>,
    pub size: Option<MinSize>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.applied_count() == 0
    }

    pub fn applied_count(&self) -> usize {
        [
            self.orientation.is_some(),
            self.color.is_some(),
            self.size.is_some(),
        ]
        .into_iter()
        .filter(|applied| *applied)
        .count()
    }

    /// Non-empty fields only, in a fixed order so the mapping is idempotent.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(orientation) = self.orientation {
            pairs.push((ORIENTATION_PARAM, orientation.as_str().to_string()));
        }
        if let Some(color) = &self.color {
            pairs.push((COLOR_PARAM, color.as_str().to_string()));
        }
        if let Some(size) = self.size {
            pairs.push((SIZE_PARAM, size.as_str().to_string()));
        }
        pairs
    }

    /// Upstream search parameters; the video search has no color filter.
    pub fn search_params(&self, kind: MediaKind) -> Vec<(&'static str, String)> {
        self.to_query_pairs()
            .into_iter()
            .filter(|(key, _)| kind == MediaKind::Photos || *key != COLOR_PARAM)
            .collect()
    }

    /// Form-urlencoded query without leading `?`; empty when no filter applies.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_query_pairs())
            .finish()
    }

    /// Re-derives filters from query pairs. Unknown values are dropped; the
    /// first occurrence of a repeated key wins.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut state = FilterState::default();
        let mut seen = (false, false, false);

        for (key, value) in pairs {
            let value = value.as_ref().trim();
            match key.as_ref() {
                ORIENTATION_PARAM if !seen.0 => {
                    seen.0 = true;
                    state.orientation = value.parse().ok();
                }
                COLOR_PARAM if !seen.1 => {
                    seen.1 = true;
                    state.color = HexColor::parse(value);
                }
                SIZE_PARAM if !seen.2 => {
                    seen.2 = true;
                    state.size = value.parse().ok();
                }
                _ => {}
            }
        }

        state
    }

    pub fn from_query_string(query: &str) -> Self {
        Self::from_query_pairs(url::form_urlencoded::parse(
            query.trim_start_matches('?').as_bytes(),
        ))
    }

    pub fn from_query_map(params: &HashMap<String, String>) -> Self {
        Self::from_query_pairs(params.iter())
    }
}

pub fn is_filter_param(key: &str) -> bool {
    matches!(key, ORIENTATION_PARAM | COLOR_PARAM | SIZE_PARAM)
}

/// Canonical form of a page query: valid filter params in fixed order, then
/// every other param in its original order. Empty and invalid filter values
/// are dropped.
pub fn canonical_query(query: &str) -> (FilterState, String) {
    let pairs: Vec<(String, String)> =
        url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect();

    let filters = FilterState::from_query_pairs(pairs.iter().map(|(k, v)| (k, v)));
    let canonical = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(filters.to_query_pairs())
        .extend_pairs(pairs.iter().filter(|(key, _)| !is_filter_param(key)))
        .finish();
    (filters, canonical)
}

/// Appends a filter query to a path, leaving the path bare when no filter applies.
pub fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}
