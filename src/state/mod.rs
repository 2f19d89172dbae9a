//! Front end state: field layout per form and the two pages

mod fields;
mod pages;

pub use fields::*;
pub use pages::*;

use serde::{Deserialize, Serialize};

/// Which form is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Simple,
    Wizard,
}

impl View {
    pub fn toggled(self) -> Self {
        match self {
            View::Simple => View::Wizard,
            View::Wizard => View::Simple,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Simple => "Registration Form",
            View::Wizard => "Multi-Step Registration",
        }
    }
}
