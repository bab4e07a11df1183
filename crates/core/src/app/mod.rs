pub mod confirmation;
pub mod selector;

pub use confirmation::*;
pub use selector::*;
