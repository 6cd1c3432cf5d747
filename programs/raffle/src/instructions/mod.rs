pub mod initialize;
pub mod enter_raffle;
pub mod check_upkeep;
pub mod perform_upkeep;
pub mod vrf_callback;
pub mod raffle_snapshot;
pub mod close_request;
#[cfg(feature = "devnet")]
pub mod mock_fulfill;

pub use initialize::*;
pub use enter_raffle::*;
pub use check_upkeep::*;
pub use perform_upkeep::*;
pub use vrf_callback::*;
pub use raffle_snapshot::*;
pub use close_request::*;
#[cfg(feature = "devnet")]
pub use mock_fulfill::*;
