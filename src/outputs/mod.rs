//! Output generation for the weekly digest.
//!
//! # Submodules
//!
//! - [`html`]: Renders the email subject and HTML body
//! - [`json`]: Writes a preview of a run (HTML body plus ranked listings as JSON)
//!
//! # Preview Structure
//!
//! ```text
//! preview_dir/
//! ├── week-of-13-oct-2025.html
//! └── week-of-13-oct-2025.json
//! ```

pub mod html;
pub mod json;
