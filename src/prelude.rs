//! Extension traits, importable in one line with `use switchyard::prelude::*`.

pub use crate::ext::RequestExt;
