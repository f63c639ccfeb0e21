// ============================================================================
// Token Module
// In-memory implementations of the external asset interfaces
// ============================================================================

mod fixed_supply;
mod host_wallet;

pub use fixed_supply::FixedSupplyToken;
pub use host_wallet::HostWallet;
