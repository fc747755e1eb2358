pub mod broken_template;
pub mod empty_lines;
pub mod indent;
pub mod no_interpolation;
pub mod no_undef;
pub mod quotes;
