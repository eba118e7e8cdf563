pub mod builder;
pub mod merge;
pub mod reconcile;
pub mod registrar;
pub mod store;

pub use reconcile::{ReconcileService, ReloadStats};
pub use registrar::{RegisterService, RegisterSummary};
pub use store::RosterStore;
