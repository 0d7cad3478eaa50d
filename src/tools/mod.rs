pub mod load_index;
pub mod lookup;
pub mod select;
pub mod stats;

pub use load_index::*;
pub use lookup::*;
pub use select::*;
pub use stats::*;
