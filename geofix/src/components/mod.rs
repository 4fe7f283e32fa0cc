pub mod help_bar;
pub mod location_screen;
pub mod permission_prompt;

// Re-export core Component trait
pub use geofix_core::Component;

pub use help_bar::{HelpBar, HelpBarProps};
pub use location_screen::{LOCATION_ICON, LocationScreen, LocationScreenProps, SPINNERS};
pub use permission_prompt::{PermissionPrompt, PermissionPromptProps};
