//! Form state management and validation with a multi-step wizard
//!
//! The [`form`] module is the generic engine: field registry, schema
//! validation, scoped context, field renderers and the wizard. The
//! [`registration`] module wires it up for the two registration flows the
//! terminal front end ships with.

pub mod form;
pub mod registration;
