mod constants;
mod document;
mod sort_order;
mod value;

pub use constants::*;
pub use document::*;
pub use sort_order::*;
pub use value::*;
