// ============================================================================
// Basic Usage Example
// ============================================================================

use std::sync::Arc;
use token_exchange::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "logging")]
    token_exchange::logging::init_logging("token_exchange=debug");

    println!("=== Token Exchange Example ===\n");

    let owner = AccountId::from("0x7c06ab2f0e3a9c4e");
    let wallet = Arc::new(HostWallet::new());
    let mut exchange = ExchangeBuilder::new(owner.as_str(), "0xe8c4a1d07f3b5a92")
        .with_name("fixed-market")
        .with_event_handler(Arc::new(LoggingEventHandler))
        .build(wallet.clone())?;

    // Register FIXED; the whole supply starts with the owner
    let token = Arc::new(FixedSupplyToken::new(
        "0xfixedtoken",
        "FIXED",
        &owner,
        Amount::new(1_000_000),
    ));
    exchange.add_token(&owner, "FIXED", token.clone())?;
    println!("Registered FIXED at {}\n", token.address());

    // Sellers get tokens and deposit them; buyers deposit currency
    println!("Funding accounts...");
    for i in 0u64..5 {
        let seller = AccountId::from(format!("0xseller{}", i));
        token.transfer(&owner, &seller, Amount::new(10));
        token.approve(&seller, exchange.address(), Amount::new(10));
        exchange.deposit_token(&seller, "FIXED", Amount::new(10))?;

        let buyer = AccountId::from(format!("0xbuyer{}", i));
        exchange.deposit_currency(&buyer, Amount::new(1_000))?;
    }

    // Add sell orders at different prices
    println!("Adding sell orders...");
    for i in 0u64..5 {
        let seller = AccountId::from(format!("0xseller{}", i));
        exchange.submit_order(&seller, "FIXED", Side::Sell, Price::new(50 + i * 2), Volume::new(5))?;
    }

    // Add buy orders
    println!("Adding buy orders...");
    for i in 0u64..5 {
        let buyer = AccountId::from(format!("0xbuyer{}", i));
        exchange.submit_order(&buyer, "FIXED", Side::Buy, Price::new(48 - i * 2), Volume::new(5))?;
    }

    print_depth(&exchange)?;

    // A buyer crosses the two cheapest asks
    println!("\n=== Crossing Order ===");
    let taker = AccountId::from("0xbuyer0");
    let events = exchange.submit_order(&taker, "FIXED", Side::Buy, Price::new(52), Volume::new(8))?;
    for event in &events {
        if let ExchangeEvent::BuyOrderFulfilled {
            filled,
            remaining,
            trades,
            ..
        } = event
        {
            println!("Filled {} (remaining {}) in {} trades", filled, remaining, trades.len());
            for trade in trades {
                println!("  {} from {} @ {}", trade.volume, trade.seller(), trade.price);
            }
        }
    }

    print_depth(&exchange)?;

    // Cancel a resting bid and withdraw what it held
    println!("\n=== Cancel and Withdraw ===");
    let bidder = AccountId::from("0xbuyer4");
    let bid = exchange
        .get_order(OrderId::new(10))
        .cloned()
        .ok_or("bid #10 not found")?;
    exchange.cancel_order(&bidder, "FIXED", Side::Buy, bid.price, bid.id)?;
    let free = exchange.get_currency_balance(&bidder);
    exchange.withdraw_currency(&bidder, free)?;
    println!("{} withdrew {}", bidder, wallet.paid_to(&bidder));

    println!("\nLedger conserved: {}", exchange.verify_conservation());
    Ok(())
}

fn print_depth(exchange: &Exchange) -> Result<(), ExchangeError> {
    println!("\n=== Order Book Snapshot ===");
    let snapshot = exchange.market_depth("FIXED", 5)?;

    println!("\nBids:");
    for (price, volume) in &snapshot.bids {
        println!("  {} @ {}", volume, price);
    }

    println!("\nAsks:");
    for (price, volume) in &snapshot.asks {
        println!("  {} @ {}", volume, price);
    }

    if let Some(spread) = snapshot.spread {
        println!("\nSpread: {}", spread);
    }
    if let Some(mid) = snapshot.mid_price {
        println!("Mid Price: {}", mid);
    }
    Ok(())
}
