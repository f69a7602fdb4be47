//! Input abstractions for sensitivity filtering.
//!
//! ## Purpose
//!
//! This module provides a unified abstraction for the numeric filter inputs
//! (coordinates, sensitivities) so that slices, vectors, and ndarray arrays
//! go through one interface, plus the fixed-format objective record whose
//! radius field switches filtering on.
//!
//! ## Design notes
//!
//! * **Zero-copy where possible**: Provides direct slice access to underlying data buffers.
//! * **Fail-fast validation**: Non-contiguous ndarray inputs are rejected.
//! * **Fixed-format record**: The radius field is located by byte offset, not by parsing.
//!
//! ## Key concepts
//!
//! * **FilterInput Trait**: Types that can provide a contiguous slice view.
//! * **ObjectSet**: The objective record. A blank radius field disables filtering.
//!
//! ## Invariants
//!
//! * Returned slices must represent all elements in the input container.
//! * A record too short to hold the radius field is treated as blank.
//!
//! ## Non-goals
//!
//! * This module does not interpret any record field other than the radius.

// Feature-gated imports
#[cfg(feature = "cpu")]
use ndarray::{ArrayBase, Data, Ix1};

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::FilterError;

// ============================================================================
// Numeric Inputs
// ============================================================================

/// Trait for types that can be used as numeric input for filtering.
pub trait FilterInput<T: Float> {
    /// Convert the input to a contiguous slice.
    fn as_filter_slice(&self) -> Result<&[T], FilterError>;
}

impl<T: Float> FilterInput<T> for [T] {
    fn as_filter_slice(&self) -> Result<&[T], FilterError> {
        Ok(self)
    }
}

impl<T: Float> FilterInput<T> for Vec<T> {
    fn as_filter_slice(&self) -> Result<&[T], FilterError> {
        Ok(self.as_slice())
    }
}

#[cfg(feature = "cpu")]
impl<T: Float, S> FilterInput<T> for ArrayBase<S, Ix1>
where
    S: Data<Elem = T>,
{
    fn as_filter_slice(&self) -> Result<&[T], FilterError> {
        self.as_slice().ok_or_else(|| {
            FilterError::InvalidInput("ndarray input must be contiguous in memory".to_string())
        })
    }
}

// ============================================================================
// Objective Record
// ============================================================================

/// Byte offset of the radius field inside the objective record.
pub const RADIUS_FIELD_OFFSET: usize = 81;

/// Leading characters of the radius field that decide "no radius".
pub const RADIUS_BLANK_WIDTH: usize = 5;

/// Full width of the radius field.
pub const RADIUS_FIELD_WIDTH: usize = 20;

/// Fixed-format objective record carrying the filter radius.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectSet {
    record: String,
}

impl ObjectSet {
    /// Wrap a raw record.
    pub fn new(record: impl Into<String>) -> Self {
        Self {
            record: record.into(),
        }
    }

    /// A record with a blank radius field.
    pub fn unfiltered() -> Self {
        Self::new(" ".repeat(RADIUS_FIELD_OFFSET + RADIUS_FIELD_WIDTH))
    }

    /// A record whose radius field holds `radius`.
    ///
    /// The shorter of the plain and exponent forms is written. Fails with
    /// [`FilterError::InvalidRadius`] when neither fits the field without
    /// losing digits.
    pub fn with_radius(radius: f64) -> Result<Self, FilterError> {
        let plain = radius.to_string();
        let scientific = format!("{radius:e}");
        let text = if scientific.len() < plain.len() {
            scientific
        } else {
            plain
        };
        if text.len() > RADIUS_FIELD_WIDTH {
            return Err(FilterError::InvalidRadius(text));
        }

        let mut record = " ".repeat(RADIUS_FIELD_OFFSET);
        record.push_str(&format!("{text:<width$}", width = RADIUS_FIELD_WIDTH));
        Ok(Self::new(record))
    }

    /// The raw record.
    pub fn as_str(&self) -> &str {
        &self.record
    }

    /// Raw bytes of the radius field (possibly shorter than the field width).
    pub fn radius_field(&self) -> &[u8] {
        field(self.record.as_bytes(), RADIUS_FIELD_OFFSET, RADIUS_FIELD_WIDTH)
    }

    /// Whether a radius is configured, i.e. filtering is requested.
    pub fn is_filtered(&self) -> bool {
        field(self.record.as_bytes(), RADIUS_FIELD_OFFSET, RADIUS_BLANK_WIDTH)
            .iter()
            .any(|b| !b.is_ascii_whitespace())
    }

    /// Configured filter radius, or `None` when the field is blank.
    pub fn filter_radius<T: Float>(&self) -> Result<Option<T>, FilterError> {
        if !self.is_filtered() {
            return Ok(None);
        }

        let text = String::from_utf8_lossy(self.radius_field());
        let trimmed = text.trim();
        // Fortran exponents
        let normalized = trimmed.replace(['D', 'd'], "E");

        let radius = normalized
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite() && *r > 0.0)
            .and_then(T::from)
            .filter(|r: &T| r.is_finite() && *r > T::zero())
            .ok_or_else(|| FilterError::InvalidRadius(trimmed.to_string()))?;

        Ok(Some(radius))
    }
}

impl From<&str> for ObjectSet {
    fn from(record: &str) -> Self {
        Self::new(record)
    }
}

fn field(bytes: &[u8], offset: usize, width: usize) -> &[u8] {
    let start = offset.min(bytes.len());
    let end = (offset + width).min(bytes.len());
    &bytes[start..end]
}
