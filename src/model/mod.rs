mod commit;
mod provider;

pub use commit::{Commit, Credentials, TakeWhile};
pub use provider::Provider;
