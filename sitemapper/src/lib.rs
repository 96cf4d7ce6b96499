pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    build_options, format_event, http_settings, parse_filter_arg, resolve_output_path,
};
