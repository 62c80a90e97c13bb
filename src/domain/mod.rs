mod aggregate;
mod money;
mod summary;
mod transaction;

pub use aggregate::*;
pub use money::*;
pub use summary::*;
pub use transaction::*;
