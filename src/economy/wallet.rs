//! Applies cross-domain currency change events to the wallet.
//!
//! Spend paths inside the economy domain validate-and-deduct synchronously
//! on the `Wallet` resource; this system exists for grants arriving from
//! other domains (kill rewards, stage-clear bonuses, world-boss payouts).

use bevy::prelude::*;

use crate::shared::*;

pub fn apply_currency_changes(
    mut gold_events: EventReader<GoldChangeEvent>,
    mut diamond_events: EventReader<DiamondChangeEvent>,
    mut wallet: ResMut<Wallet>,
    mut stats: ResMut<PlayStats>,
) {
    for ev in gold_events.read() {
        if ev.amount >= 0.0 {
            wallet.add_gold(ev.amount);
            stats.total_gold_earned += ev.amount.floor();
            debug!(
                "[Economy] Gold +{}: {}. New balance: {}",
                ev.amount.floor(),
                ev.reason,
                wallet.gold
            );
        } else {
            let cost = -ev.amount;
            if wallet.try_spend_gold(cost) {
                stats.total_gold_spent += cost.floor();
            } else {
                // Spends should be validated before the event is sent.
                warn!(
                    "[Economy] Tried to spend {} gold but only have {} (reason: {}). Clamping to 0.",
                    cost, wallet.gold, ev.reason
                );
                stats.total_gold_spent += wallet.gold;
                wallet.gold = 0.0;
            }
        }
    }

    for ev in diamond_events.read() {
        if ev.amount >= 0 {
            wallet.add_diamond(ev.amount as u64);
            stats.total_diamond_earned += ev.amount as u64;
            debug!(
                "[Economy] Diamond +{}: {}. New balance: {}",
                ev.amount, ev.reason, wallet.diamond
            );
        } else {
            let cost = (-ev.amount) as u64;
            if !wallet.try_spend_diamond(cost) {
                warn!(
                    "[Economy] Tried to spend {} diamond but only have {} (reason: {}). Clamping to 0.",
                    cost, wallet.diamond, ev.reason
                );
                wallet.diamond = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_spend_is_all_or_nothing() {
        let mut wallet = Wallet {
            gold: 100.0,
            diamond: 10,
        };
        assert!(!wallet.try_spend_gold(150.0));
        assert_eq!(wallet.gold, 100.0);
        assert!(wallet.try_spend_gold(100.0));
        assert_eq!(wallet.gold, 0.0);

        assert!(!wallet.try_spend_diamond(11));
        assert_eq!(wallet.diamond, 10);
        assert!(wallet.try_spend_diamond(10));
        assert_eq!(wallet.diamond, 0);
    }

    #[test]
    fn test_wallet_rejects_negative_and_nan_costs() {
        let mut wallet = Wallet {
            gold: 100.0,
            diamond: 0,
        };
        assert!(!wallet.try_spend_gold(-5.0));
        assert!(!wallet.try_spend_gold(f64::NAN));
        assert_eq!(wallet.gold, 100.0);
    }

    #[test]
    fn test_gold_stays_integer_valued() {
        let mut wallet = Wallet::default();
        wallet.add_gold(10.7);
        assert_eq!(wallet.gold, 10.0);
        wallet.add_gold(0.9);
        assert_eq!(wallet.gold, 10.0);
    }
}
