//! Unit tests for configuration loading and precedence.
//!
//! - `helpers`: shared test utilities
//! - `precedence`: layer precedence tests
//! - `field_resolution`: URL, token, topic, and enterprise URL resolution
//! - `allow_list`: `pr_numbers` parsing and consistency validation
//! - `loading`: end-to-end loading from the environment and CLI flags

mod helpers;
