//! Placeholder detection and value merging for legal document templates.
//!
//! A template starts as converted markup. [`detect::Detector`] scans it for fill-in
//! placeholders and yields an ordered list of [`model::Field`]s; answers collected into a
//! [`values::ValueMap`] are validated, formatted and written back with [`merge::fill_html`].

pub mod caption;
pub mod detect;
pub mod format;
pub mod infer;
pub mod keys;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod util;
pub mod validate;
pub mod values;

pub use detect::{DetectionProfile, Detector, DetectorConfig, detect_placeholders};
pub use format::format_by_type;
pub use merge::{Merger, fill_html};
pub use model::{Field, FieldType, Template};
pub use validate::{ValidationError, validate_by_type, validate_field};
pub use values::ValueMap;
