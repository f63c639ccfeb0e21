// ============================================================================
// Host Wallet
// In-memory native currency payout for tests and demos
// ============================================================================

use crate::domain::AccountId;
use crate::interfaces::NativeCurrency;
use crate::numeric::Amount;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Records native-currency payouts made by the exchange.
///
/// Payouts can be switched off to exercise the `TransferRejected` path.
#[derive(Debug, Default)]
pub struct HostWallet {
    paid: Mutex<HashMap<AccountId, Amount>>,
    reject: AtomicBool,
}

impl HostWallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total paid out to `account` so far
    pub fn paid_to(&self, account: &AccountId) -> Amount {
        self.paid.lock().get(account).copied().unwrap_or_default()
    }

    pub fn set_rejecting(&self, reject: bool) {
        self.reject.store(reject, Ordering::Relaxed);
    }
}

impl NativeCurrency for HostWallet {
    fn pay(&self, to: &AccountId, amount: Amount) -> bool {
        if self.reject.load(Ordering::Relaxed) {
            return false;
        }
        let mut paid = self.paid.lock();
        let entry = paid.entry(to.clone()).or_default();
        match entry.checked_add(amount) {
            Ok(total) => {
                *entry = total;
                true
            },
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payouts_accumulate() {
        let wallet = HostWallet::new();
        let alice = AccountId::from("0xalice");

        assert!(wallet.pay(&alice, Amount::new(3)));
        assert!(wallet.pay(&alice, Amount::new(4)));
        assert_eq!(wallet.paid_to(&alice), Amount::new(7));
    }

    #[test]
    fn test_rejecting_wallet() {
        let wallet = HostWallet::new();
        let alice = AccountId::from("0xalice");

        wallet.set_rejecting(true);
        assert!(!wallet.pay(&alice, Amount::new(3)));
        assert_eq!(wallet.paid_to(&alice), Amount::ZERO);

        wallet.set_rejecting(false);
        assert!(wallet.pay(&alice, Amount::new(3)));
        assert_eq!(wallet.paid_to(&alice), Amount::new(3));
    }
}
