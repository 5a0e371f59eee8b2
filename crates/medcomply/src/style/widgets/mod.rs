//! Widget style functions built on the shared palette.

mod buttons;
mod containers;
mod inputs;
pub mod palette;
mod shadows;

pub use shadows::radius;

pub use containers::{
    error_banner_style, header_style, panel_style, rule_chip_style, table_header_style,
    table_row_style,
};

pub use buttons::{
    ghost_button_style, physician_row_selected_style, physician_row_style, primary_button_style,
};

pub use inputs::{field_input_style, scrollable_style};
