//! Form rendering module
//!
//! - `field_renderer`: one field with its border state and error line
//! - `simple_form`: the single-page registration form
//! - `wizard_form`: the multi-step registration wizard

mod field_renderer;
mod simple_form;
mod wizard_form;

pub use simple_form::draw_simple;
pub use wizard_form::draw_wizard;
