//! Languages of the activity views and their user-facing messages.
//!
//! - `registry`: the fixed language table, indexed once (English is canonical)
//! - `language`: the `Language` handle, only constructible for enabled codes
//! - `strings`: per-language message templates
//!
//! ```rust,ignore
//! use activity_signup::i18n::Language;
//!
//! let hungarian = Language::from_code("hu")?;
//! assert_eq!(hungarian.strings().activity_full, "A tevékenység betelt");
//! ```

mod language;
mod registry;
mod strings;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::{fill, LanguageStrings};
