//! Persistence contracts the engine consumes.
//!
//! Every function takes the connection it runs on so an operation can chain
//! lookups and writes inside one `DatabaseTransaction`. Storage-level unique
//! constraints back every check-then-insert done by the operations.

pub(crate) mod budgets;
pub(crate) mod categories;
pub(crate) mod membership;
pub(crate) mod users;
