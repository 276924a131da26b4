use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    #[default]
    Normal,
    Large,
    Larger,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Contrast {
    #[default]
    Normal,
    High,
}

impl FontSize {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "normal" => Some(Self::Normal),
            "large" => Some(Self::Large),
            "larger" => Some(Self::Larger),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Large => "large",
            Self::Larger => "larger",
        }
    }
}

impl Contrast {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "normal" => Some(Self::Normal),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

/// Display preferences in effect for one request.
///
/// Built by the accessibility middleware and handed to handlers through the
/// request extensions; every page document embeds it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Accessibility {
    pub font_size: FontSize,
    pub contrast: Contrast,
    pub dyslexia: bool,
}

/// Accessibility overrides accepted on any GET request.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AccessibilityParams {
    /// One of `normal`, `large`, `larger`. Other values are ignored.
    #[param(example = "large")]
    pub font_size: Option<String>,
    /// One of `normal`, `high`. Other values are ignored.
    #[param(example = "high")]
    pub contrast: Option<String>,
    /// `true` enables the dyslexia-friendly font; any other value disables it.
    #[param(example = "true")]
    pub dyslexia: Option<String>,
}

impl Accessibility {
    /// Apply request overrides on top of the stored preferences.
    ///
    /// Returns the resolved preferences and whether anything was supplied
    /// that must be persisted.
    pub fn apply(self, params: &AccessibilityParams) -> (Self, bool) {
        let mut next = self;
        let mut changed = false;

        if let Some(font_size) = params.font_size.as_deref().and_then(FontSize::parse) {
            next.font_size = font_size;
            changed = true;
        }
        if let Some(contrast) = params.contrast.as_deref().and_then(Contrast::parse) {
            next.contrast = contrast;
            changed = true;
        }
        if let Some(ref dyslexia) = params.dyslexia {
            next.dyslexia = dyslexia == "true";
            changed = true;
        }

        (next, changed)
    }
}
