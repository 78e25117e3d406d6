//! Development entry points. Elements built here carry the location they
//! were written at, readable through [`Attributes::source`](crate::Attributes::source).

pub use vellum_core::create_fragment as Fragment;
pub use vellum_core::{Props, Source, Tag, jsx_dev};
