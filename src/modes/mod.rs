pub mod human;
pub mod login_form;

pub use human::HumanMode;
pub use login_form::{Field, LoginForm};
