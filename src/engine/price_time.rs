// ============================================================================
// Price/Time Priority Matching Algorithm (FIFO)
// Best price first; within a price level, oldest order first
// ============================================================================

use crate::domain::{Order, OrderBookSide, OrderId};
use crate::interfaces::{Fill, IncomingOrder, MatchPlan, MatchingAlgorithm};
use std::collections::HashMap;

/// Price/Time Priority (FIFO) matching algorithm
///
/// Orders at the same price level are matched in time priority order.
/// Each fill executes at the resting order's price.
///
/// # Example
/// ```text
/// Asks:  4 @ 5 (order #1, first)
///        4 @ 2 (order #2, second)
///
/// Incoming: Buy 6 @ 4
/// Result: 5 against #1, then 1 against #2
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct PriceTimePriority;

impl PriceTimePriority {
    pub fn new() -> Self {
        Self
    }
}

impl MatchingAlgorithm for PriceTimePriority {
    fn plan_match(
        &self,
        incoming: &IncomingOrder,
        opposite_side: &OrderBookSide,
        orders: &HashMap<OrderId, Order>,
    ) -> MatchPlan {
        let mut plan = MatchPlan::unmatched(incoming.volume);

        for level in opposite_side.levels_by_priority() {
            if plan.remaining.is_zero() || !self.prices_cross(incoming, level.price) {
                break;
            }

            let mut level_left = level.total_volume();

            for order_id in level.order_ids() {
                if plan.remaining.is_zero() || level_left.is_zero() {
                    break;
                }

                // Filled and cancelled orders stay queued at zero volume
                let Some(maker) = orders.get(order_id).filter(|o| o.is_active()) else {
                    continue;
                };

                let volume = plan.remaining.min(maker.remaining());
                plan.fills.push(Fill {
                    maker_order_id: maker.id,
                    maker: maker.owner.clone(),
                    price: level.price,
                    volume,
                });
                plan.remaining = plan.remaining.saturating_sub(volume);
                level_left = level_left.saturating_sub(volume);
            }

            if level_left.is_zero() {
                tracing::trace!(price = %level.price, "level exhausted");
                plan.exhausted_levels.push(level.price);
            }
        }

        plan
    }

    fn name(&self) -> &str {
        "PriceTime"
    }
}
