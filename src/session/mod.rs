pub mod backend;
pub mod dto;
pub mod error;
pub mod sim_session;
pub mod urls;

pub use backend::SimulationBackend;
pub use error::RequestError;
pub use sim_session::SimSession;
pub use urls::*;
