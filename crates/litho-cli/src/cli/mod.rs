//! CLI command implementations.
//!
//! - `fill` - Hatch annotated layers of an SVG drawing
//! - `section` - Render a YAML section file
//! - `rocks` - List rock fills

pub mod common;
pub mod fill;
pub mod rocks;
pub mod section;

pub use fill::cmd_fill;
pub use rocks::cmd_rocks;
pub use section::cmd_section;
