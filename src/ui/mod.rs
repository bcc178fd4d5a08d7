//! State a login screen keeps between user actions. Rendering lives elsewhere;
//! this is the model a UI layer drives and renders from.

mod login_form;

pub use login_form::*;
