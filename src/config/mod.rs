mod settings;
mod validation;

pub use settings::{
    AccountSettings, ApplicationSettings, PollerSettings, RpcSettings, Settings,
};
pub use validation::validate_settings;
