mod interval;
mod poller;
mod state;

pub use interval::PollInterval;
pub use poller::{Poller, PollerHandle};
pub use state::{
    DashboardSnapshot, DashboardState, Readings, SharedDashboard, FETCH_ERROR_MESSAGE,
};
