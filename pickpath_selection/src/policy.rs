// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection policy: the knobs a host can turn, loadable from JSON.

use std::fmt;

use pickpath_path::FallbackPolicy;
use pickpath_responder::DEFAULT_WRAPPER_CLASS;
use serde::{Deserialize, Serialize};

use crate::geometry::ScrollAlign;
use crate::zoom::ZoomLimits;

/// What happens to a selection when the geometry under it changes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationMode {
    /// Clear the selection.
    #[default]
    Drop,
    /// Keep the selection and recompute its overlay from the live node.
    Reproject,
}

/// Errors loading a [`SelectionPolicy`].
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// The document is not valid policy JSON.
    #[error("invalid selection policy: {0}")]
    Json(#[from] serde_json::Error),
}

/// Host-tunable selection behavior.
///
/// Every field has a default, so a policy document only needs to name what
/// it changes:
///
/// ```rust
/// use pickpath_selection::{InvalidationMode, SelectionPolicy};
///
/// let policy = SelectionPolicy::from_json_str(r#"{ "on_scroll": "reproject" }"#).unwrap();
/// assert_eq!(policy.on_scroll, InvalidationMode::Reproject);
/// assert_eq!(policy.on_zoom, InvalidationMode::Drop);
/// assert_eq!(policy.text_preview_chars, 200);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionPolicy {
    /// What a container scroll does to the selection.
    pub on_scroll: InvalidationMode,
    /// What a zoom change does to the selection.
    pub on_zoom: InvalidationMode,
    /// How stale paths fall back when their sibling indices no longer match.
    pub fallback: FallbackPolicy,
    /// Class that marks the render wrapper inside the container.
    pub wrapper_class: String,
    /// How many characters of text the inspector previews.
    pub text_preview_chars: usize,
    /// Zoom bounds and step.
    pub zoom: ZoomLimits,
    /// Alignment for scroll-into-view.
    pub scroll_align: ScrollAlign,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            on_scroll: InvalidationMode::Drop,
            on_zoom: InvalidationMode::Drop,
            fallback: FallbackPolicy::default(),
            wrapper_class: DEFAULT_WRAPPER_CLASS.into(),
            text_preview_chars: 200,
            zoom: ZoomLimits::default(),
            scroll_align: ScrollAlign::Center,
        }
    }
}

impl SelectionPolicy {
    /// Parse a policy document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, PolicyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the policy for values that will not behave as the host likely intends.
    pub fn validate(&self) -> PolicyReport {
        let mut warnings = Vec::new();
        let ZoomLimits { min, max, step } = self.zoom;
        if !(min.is_finite() && max.is_finite()) {
            warnings.push(PolicyWarning::NonFiniteZoomBounds);
        } else if min > max {
            warnings.push(PolicyWarning::InvertedZoomBounds { min, max });
        }
        if min <= 0.0 {
            warnings.push(PolicyWarning::NonPositiveZoomMin(min));
        }
        if step.is_nan() || step <= 0.0 {
            warnings.push(PolicyWarning::NonPositiveZoomStep(step));
        }
        if self.wrapper_class.is_empty()
            || self.wrapper_class.chars().any(char::is_whitespace)
        {
            warnings.push(PolicyWarning::InvalidWrapperClass(
                self.wrapper_class.clone(),
            ));
        }
        PolicyReport { warnings }
    }
}

/// A questionable policy value.
#[derive(Clone, Debug, PartialEq)]
pub enum PolicyWarning {
    /// `zoom.min` is greater than `zoom.max`; the bounds are used swapped.
    InvertedZoomBounds {
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },
    /// A zoom bound is infinite or NaN.
    NonFiniteZoomBounds,
    /// `zoom.min` is zero or negative.
    NonPositiveZoomMin(f64),
    /// `zoom.step` is zero, negative, or NaN; the wheel will not zoom.
    NonPositiveZoomStep(f64),
    /// `wrapper_class` is empty or contains whitespace, so no element can match it.
    InvalidWrapperClass(String),
}

impl fmt::Display for PolicyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvertedZoomBounds { min, max } => {
                write!(f, "zoom.min ({min}) is greater than zoom.max ({max})")
            }
            Self::NonFiniteZoomBounds => f.write_str("zoom bounds must be finite"),
            Self::NonPositiveZoomMin(min) => write!(f, "zoom.min ({min}) must be positive"),
            Self::NonPositiveZoomStep(step) => write!(f, "zoom.step ({step}) must be positive"),
            Self::InvalidWrapperClass(class) => {
                write!(f, "wrapper_class {class:?} cannot match an element")
            }
        }
    }
}

/// Result of [`SelectionPolicy::validate`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolicyReport {
    /// Everything worth a warning, in field order.
    pub warnings: Vec<PolicyWarning>,
}

impl PolicyReport {
    /// Returns true if nothing was flagged.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Log every warning at `warn` level.
    pub fn log(&self) {
        for warning in &self.warnings {
            tracing::warn!(%warning, "selection policy");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_the_default() {
        let policy = SelectionPolicy::from_json_str("{}").unwrap();
        assert_eq!(policy, SelectionPolicy::default());
        assert!(policy.validate().is_clean());
    }

    #[test]
    fn nested_fields_default_individually() {
        let policy = SelectionPolicy::from_json_str(
            r#"{
                "fallback": "first_match",
                "zoom": { "max": 3.0 },
                "scroll_align": "nearest"
            }"#,
        )
        .unwrap();
        assert_eq!(policy.fallback, FallbackPolicy::FirstMatch);
        assert_eq!(policy.zoom.max, 3.0);
        assert_eq!(policy.zoom.min, 0.2);
        assert_eq!(policy.zoom.step, 0.1);
        assert_eq!(policy.scroll_align, ScrollAlign::Nearest);
        assert_eq!(policy.wrapper_class, "render-wrapper");
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = SelectionPolicy::from_json_str(r#"{ "on_scroll": "sometimes" }"#).unwrap_err();
        assert!(matches!(err, PolicyError::Json(_)));
        assert!(err.to_string().starts_with("invalid selection policy"));
    }

    #[test]
    fn validation_flags_bad_values() {
        let policy = SelectionPolicy {
            zoom: ZoomLimits {
                min: 4.0,
                max: 2.0,
                step: 0.0,
            },
            wrapper_class: "render wrapper".into(),
            ..SelectionPolicy::default()
        };
        let report = policy.validate();
        assert_eq!(
            report.warnings,
            vec![
                PolicyWarning::InvertedZoomBounds { min: 4.0, max: 2.0 },
                PolicyWarning::NonPositiveZoomStep(0.0),
                PolicyWarning::InvalidWrapperClass("render wrapper".into()),
            ]
        );
    }

    #[test]
    fn policy_round_trips_through_json() {
        let policy = SelectionPolicy {
            on_zoom: InvalidationMode::Reproject,
            text_preview_chars: 40,
            ..SelectionPolicy::default()
        };
        let json = serde_json::to_string(&policy).unwrap();
        assert_eq!(SelectionPolicy::from_json_str(&json).unwrap(), policy);
    }
}
