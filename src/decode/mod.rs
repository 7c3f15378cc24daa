//! Response decoder module
//!
//! EC2 Query API responses are XML. They are converted to JSON values first,
//! then items and continuation tokens are pulled out by `/`-separated paths.
//!
//! # Overview
//!
//! - [`xml_to_json`] - element tree to nested JSON objects
//! - [`extract_by_path`] / [`extract_list`] - path lookups that tolerate the
//!   XML quirk where a one-element list decodes to a bare object
//! - [`QueryDecoder`] - per-operation decoder producing [`PageResult`]s
//!
//! [`PageResult`]: crate::pagination::PageResult

mod path;
mod types;
mod xml;

pub use path::{extract_by_path, extract_list, extract_string};
pub use types::{QueryDecoder, ResponseDecoder, ResponseShape};
pub use xml::{parse_error_response, xml_to_json, ServiceErrorBody};
