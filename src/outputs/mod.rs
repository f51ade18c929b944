//! Output generation for the extracted dataset.
//!
//! # Submodules
//!
//! - [`json`]: Writes the merged record collection as the persisted JSON dataset
//!
//! # Output Structure
//!
//! ```text
//! data.json        # pretty-printed array of records, replaced on every run
//! ```

pub mod json;
