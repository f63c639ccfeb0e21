// ============================================================================
// Exchange
// Custody, token registry and one matching engine per registered symbol
// ============================================================================

use crate::domain::{
    AccountId, Asset, Balance, BookSideSnapshot, ExchangeConfig, Order, OrderBookSnapshot,
    OrderId, Side, Symbol, Trade,
};
use crate::engine::{CustodyLedger, LedgerBatch, MatchingEngine, Supply, TokenRegistry};
use crate::error::{ExchangeError, ExchangeResult};
use crate::interfaces::{
    EventHandler, ExchangeEvent, IncomingOrder, MatchPlan, MatchingAlgorithm, NativeCurrency,
    TokenContract,
};
use crate::numeric::{Amount, Price, Volume};
use std::collections::HashMap;
use std::sync::Arc;

/// A custodial exchange.
///
/// Every mutating call takes `&mut self` and is atomic: it either applies
/// all of its balance and book changes and returns exactly one event, or
/// returns an error and changes nothing.
pub struct Exchange {
    config: ExchangeConfig,
    registry: TokenRegistry,
    ledger: CustodyLedger,
    books: HashMap<Symbol, MatchingEngine>,
    algorithm: Arc<dyn MatchingAlgorithm>,
    native: Arc<dyn NativeCurrency>,
    event_handler: Arc<dyn EventHandler>,
    /// Id the next accepted order gets
    next_order_id: OrderId,
}

impl Exchange {
    /// Create an exchange. Use [`ExchangeBuilder`](crate::engine::ExchangeBuilder)
    /// to get a validated configuration and defaults.
    pub fn new(
        config: ExchangeConfig,
        algorithm: Arc<dyn MatchingAlgorithm>,
        native: Arc<dyn NativeCurrency>,
        event_handler: Arc<dyn EventHandler>,
    ) -> Self {
        tracing::info!(
            name = %config.name,
            owner = %config.owner,
            address = %config.address,
            algorithm = algorithm.name(),
            "exchange created"
        );
        Self {
            config,
            registry: TokenRegistry::new(),
            ledger: CustodyLedger::new(),
            books: HashMap::new(),
            algorithm,
            native,
            event_handler,
            next_order_id: OrderId::new(1),
        }
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Address token contracts see for the exchange
    pub fn address(&self) -> &AccountId {
        &self.config.address
    }

    pub fn ledger(&self) -> &CustodyLedger {
        &self.ledger
    }

    fn emit(&self, event: ExchangeEvent) -> Vec<ExchangeEvent> {
        self.event_handler.on_event(event.clone());
        vec![event]
    }

    fn engine(&self, symbol: &str) -> ExchangeResult<&MatchingEngine> {
        self.books.get(symbol).ok_or_else(|| unknown(symbol))
    }

    // ========================================================================
    // Token registry
    // ========================================================================

    /// Register a token contract under `symbol`. Owner only.
    pub fn add_token(
        &mut self,
        caller: &AccountId,
        symbol: impl Into<Symbol>,
        contract: Arc<dyn TokenContract>,
    ) -> ExchangeResult<Vec<ExchangeEvent>> {
        let symbol = symbol.into();
        let event = self
            .registry
            .add_token(caller, &self.config.owner, symbol.clone(), contract)
            .inspect_err(|e| tracing::warn!(%caller, %symbol, error = %e, "token registration rejected"))?;

        self.books.insert(
            symbol.clone(),
            MatchingEngine::new(symbol.clone(), Arc::clone(&self.algorithm)),
        );
        tracing::info!(%symbol, "token registered");
        Ok(self.emit(event))
    }

    pub fn has_token(&self, symbol: &str) -> bool {
        self.registry.has_token(symbol)
    }

    /// Registered symbols in sorted order
    pub fn symbols(&self) -> Vec<Symbol> {
        self.registry.symbols().cloned().collect()
    }

    // ========================================================================
    // Custody
    // ========================================================================

    /// Credit `amount` of native currency attached to the call.
    pub fn deposit_currency(&mut self, account: &AccountId, amount: Amount) -> ExchangeResult<Vec<ExchangeEvent>> {
        if amount.is_zero() {
            return Err(ExchangeError::InvalidAmount);
        }
        let mut batch = self.ledger.batch();
        batch.deposit(account, &Asset::Currency, amount)?;
        let changes = batch.finish();
        self.ledger.commit(changes);

        tracing::info!(%account, %amount, "currency deposited");
        Ok(self.emit(ExchangeEvent::CurrencyDeposited {
            account: account.clone(),
            amount,
        }))
    }

    /// Pay out `amount` of available currency through the host.
    pub fn withdraw_currency(&mut self, account: &AccountId, amount: Amount) -> ExchangeResult<Vec<ExchangeEvent>> {
        if amount.is_zero() {
            return Err(ExchangeError::InvalidAmount);
        }
        let mut batch = self.ledger.batch();
        batch
            .withdraw(account, &Asset::Currency, amount)
            .inspect_err(|e| tracing::warn!(%account, %amount, error = %e, "currency withdrawal rejected"))?;

        if !self.native.pay(account, amount) {
            tracing::warn!(%account, %amount, "currency payout refused");
            return Err(ExchangeError::TransferRejected {
                asset: Asset::Currency,
            });
        }
        let changes = batch.finish();
        self.ledger.commit(changes);

        tracing::info!(%account, %amount, "currency withdrawn");
        Ok(self.emit(ExchangeEvent::CurrencyWithdrawn {
            account: account.clone(),
            amount,
        }))
    }

    /// Pull `amount` tokens from `account` through the token contract.
    ///
    /// The account must have approved the exchange address beforehand.
    pub fn deposit_token(
        &mut self,
        account: &AccountId,
        symbol: &str,
        amount: Amount,
    ) -> ExchangeResult<Vec<ExchangeEvent>> {
        let registration = self.registry.resolve(symbol)?;
        if amount.is_zero() {
            return Err(ExchangeError::InvalidAmount);
        }
        let asset = Asset::Token(registration.symbol.clone());

        let mut batch = self.ledger.batch();
        batch.deposit(account, &asset, amount)?;

        let exchange = &self.config.address;
        if !registration
            .contract
            .transfer_from(exchange, account, exchange, amount)
        {
            tracing::warn!(%account, %symbol, %amount, "token transfer_from refused");
            return Err(ExchangeError::TransferRejected { asset });
        }
        let changes = batch.finish();
        self.ledger.commit(changes);

        tracing::info!(%account, %symbol, %amount, "token deposited");
        Ok(self.emit(ExchangeEvent::TokenDeposited {
            account: account.clone(),
            symbol: Symbol::from(symbol),
            amount,
        }))
    }

    /// Send `amount` available tokens back to `account`.
    pub fn withdraw_token(
        &mut self,
        account: &AccountId,
        symbol: &str,
        amount: Amount,
    ) -> ExchangeResult<Vec<ExchangeEvent>> {
        let registration = self.registry.resolve(symbol)?;
        if amount.is_zero() {
            return Err(ExchangeError::InvalidAmount);
        }
        let asset = Asset::Token(registration.symbol.clone());

        let mut batch = self.ledger.batch();
        batch
            .withdraw(account, &asset, amount)
            .inspect_err(|e| tracing::warn!(%account, %symbol, %amount, error = %e, "token withdrawal rejected"))?;

        if !registration
            .contract
            .transfer(&self.config.address, account, amount)
        {
            tracing::warn!(%account, %symbol, %amount, "token transfer refused");
            return Err(ExchangeError::TransferRejected { asset });
        }
        let changes = batch.finish();
        self.ledger.commit(changes);

        tracing::info!(%account, %symbol, %amount, "token withdrawn");
        Ok(self.emit(ExchangeEvent::TokenWithdrawn {
            account: account.clone(),
            symbol: Symbol::from(symbol),
            amount,
        }))
    }

    /// Available native currency of `account`
    pub fn get_currency_balance(&self, account: &AccountId) -> Amount {
        self.ledger.available(account, &Asset::Currency)
    }

    /// Available tokens of `account`
    pub fn get_token_balance(&self, account: &AccountId, symbol: &str) -> ExchangeResult<Amount> {
        let registration = self.registry.resolve(symbol)?;
        Ok(self
            .ledger
            .available(account, &Asset::Token(registration.symbol.clone())))
    }

    /// Available and escrowed balance of any asset
    pub fn get_balance(&self, account: &AccountId, asset: &Asset) -> Balance {
        self.ledger.balance(account, asset)
    }

    pub fn supply(&self, asset: &Asset) -> Supply {
        self.ledger.supply(asset)
    }

    /// Check that every asset's holdings equal its deposits minus withdrawals
    /// and that escrow matches what resting orders hold.
    pub fn verify_conservation(&self) -> bool {
        if !self.ledger.is_conserved() {
            return false;
        }
        let escrowed = |asset: &Asset| -> Amount {
            self.ledger
                .accounts()
                .map(|(_, account)| account.balance(asset).escrowed())
                .sum()
        };

        let currency_held: Amount = self
            .books
            .values()
            .map(|engine| engine.escrow_held(Side::Buy))
            .sum();
        if escrowed(&Asset::Currency) != currency_held {
            return false;
        }
        self.books.values().all(|engine| {
            escrowed(&Asset::Token(engine.symbol().clone())) == engine.escrow_held(Side::Sell)
        })
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Submit a limit order.
    ///
    /// The full escrow is locked first, the order crosses the opposite side
    /// at resting prices, and whatever is left rests in the book. Emits
    /// `*OrderFulfilled` if anything matched, `Limit*OrderCreated` otherwise.
    pub fn submit_order(
        &mut self,
        account: &AccountId,
        symbol: &str,
        side: Side,
        price: Price,
        volume: Volume,
    ) -> ExchangeResult<Vec<ExchangeEvent>> {
        let engine = self
            .books
            .get_mut(symbol)
            .ok_or_else(|| unknown(symbol))?;
        if price.is_zero() {
            return Err(ExchangeError::InvalidOrder {
                reason: "price must be positive",
            });
        }
        if volume.is_zero() {
            return Err(ExchangeError::InvalidOrder {
                reason: "volume must be positive",
            });
        }

        let symbol = engine.symbol().clone();
        let token = Asset::Token(symbol.clone());
        let order_id = self.next_order_id;
        let next_order_id = order_id.next()?;
        let incoming = IncomingOrder {
            side,
            price,
            volume,
        };

        let mut batch = self.ledger.batch();
        let escrow = match side {
            Side::Buy => (Asset::Currency, price.notional(volume)),
            Side::Sell => (token.clone(), volume.as_amount()),
        };
        batch
            .lock(account, &escrow.0, escrow.1)
            .inspect_err(|e| tracing::warn!(%account, %symbol, %side, %price, %volume, error = %e, "order rejected"))?;

        let plan = engine.plan(&incoming);
        let trades = settle(&mut batch, &plan, account, &incoming, &token, &symbol, order_id)?;

        let remainder = (!plan.remaining.is_zero()).then(|| {
            Order::new(
                order_id,
                account.clone(),
                symbol.clone(),
                side,
                price,
                plan.remaining,
            )
        });
        engine.apply(&plan, side, remainder)?;
        let changes = batch.finish();
        self.ledger.commit(changes);
        self.next_order_id = next_order_id;

        let event = if plan.has_fills() {
            let filled = volume.saturating_sub(plan.remaining);
            tracing::info!(%account, %symbol, %side, %order_id, %filled, remaining = %plan.remaining, "order fulfilled");
            ExchangeEvent::order_fulfilled(
                side,
                order_id,
                symbol,
                account.clone(),
                price,
                filled,
                plan.remaining,
                trades,
            )
        } else {
            tracing::info!(%account, %symbol, %side, %order_id, %price, %volume, "limit order created");
            ExchangeEvent::order_created(side, order_id, symbol, account.clone(), price, volume)
        };
        Ok(self.emit(event))
    }

    /// Cancel a resting order and release the escrow of its remaining volume.
    pub fn cancel_order(
        &mut self,
        account: &AccountId,
        symbol: &str,
        side: Side,
        price: Price,
        order_id: OrderId,
    ) -> ExchangeResult<Vec<ExchangeEvent>> {
        let engine = self
            .books
            .get_mut(symbol)
            .ok_or_else(|| unknown(symbol))?;
        let order = engine
            .find_cancelable(account, side, price, order_id)
            .inspect_err(|e| tracing::warn!(%account, %symbol, %order_id, error = %e, "cancel rejected"))?;

        let symbol = engine.symbol().clone();
        let asset = match side {
            Side::Buy => Asset::Currency,
            Side::Sell => Asset::Token(symbol.clone()),
        };
        let mut batch = self.ledger.batch();
        batch.unlock(account, &asset, order.escrowed())?;

        let released = engine
            .cancel(order_id)
            .ok_or(ExchangeError::OrderNotFound { order_id })?;
        let changes = batch.finish();
        self.ledger.commit(changes);

        tracing::info!(%account, %symbol, %side, %order_id, %released, "order canceled");
        Ok(self.emit(ExchangeEvent::order_canceled(
            side, order_id, symbol, price, released,
        )))
    }

    /// Levels of one side of a book, ascending by price, including empty ones
    pub fn get_order_book(&self, symbol: &str, side: Side) -> ExchangeResult<BookSideSnapshot> {
        Ok(self.engine(symbol)?.snapshot(side))
    }

    /// Two-sided snapshot of the `levels` best non-empty levels per side
    pub fn market_depth(&self, symbol: &str, levels: usize) -> ExchangeResult<OrderBookSnapshot> {
        Ok(self.engine(symbol)?.market_depth(levels))
    }

    /// Any order that ever rested, in whatever state it is now
    pub fn get_order(&self, order_id: OrderId) -> Option<&Order> {
        self.books
            .values()
            .find_map(|engine| engine.get_order(order_id))
    }
}

fn unknown(symbol: &str) -> ExchangeError {
    ExchangeError::UnknownToken {
        symbol: Symbol::from(symbol),
    }
}

/// Stage the ledger side of every planned fill and build the trades.
///
/// The taker's escrow was locked at its limit price; fills execute at the
/// maker's price, so a buy taker gets the difference back.
fn settle(
    batch: &mut LedgerBatch<'_>,
    plan: &MatchPlan,
    taker: &AccountId,
    incoming: &IncomingOrder,
    token: &Asset,
    symbol: &Symbol,
    taker_order_id: OrderId,
) -> ExchangeResult<Vec<Trade>> {
    let mut trades = Vec::with_capacity(plan.fills.len());

    for fill in &plan.fills {
        let notional = fill.price.notional(fill.volume);
        let tokens = fill.volume.as_amount();

        match incoming.side {
            Side::Buy => {
                batch.spend_escrow(taker, &Asset::Currency, notional)?;
                batch.credit(&fill.maker, &Asset::Currency, notional)?;
                batch.spend_escrow(&fill.maker, token, tokens)?;
                batch.credit(taker, token, tokens)?;

                if let Some(improvement) = incoming.price.checked_sub(fill.price) {
                    if !improvement.is_zero() {
                        batch.unlock(taker, &Asset::Currency, improvement.notional(fill.volume))?;
                    }
                }
            },
            Side::Sell => {
                batch.spend_escrow(taker, token, tokens)?;
                batch.credit(&fill.maker, token, tokens)?;
                batch.spend_escrow(&fill.maker, &Asset::Currency, notional)?;
                batch.credit(taker, &Asset::Currency, notional)?;
            },
        }

        tracing::debug!(
            %symbol,
            maker_order = %fill.maker_order_id,
            taker_order = %taker_order_id,
            price = %fill.price,
            volume = %fill.volume,
            "trade"
        );
        trades.push(Trade::new(
            symbol.clone(),
            fill.maker_order_id,
            taker_order_id,
            fill.maker.clone(),
            taker.clone(),
            incoming.side,
            fill.price,
            fill.volume,
        ));
    }

    Ok(trades)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PriceTimePriority;
    use crate::interfaces::RecordingEventHandler;
    use crate::token::{FixedSupplyToken, HostWallet};

    struct Fixture {
        exchange: Exchange,
        token: Arc<FixedSupplyToken>,
        wallet: Arc<HostWallet>,
        events: Arc<RecordingEventHandler>,
    }

    fn owner() -> AccountId {
        AccountId::from("0xowner")
    }

    fn trader() -> AccountId {
        AccountId::from("0xtrader")
    }

    fn fixture() -> Fixture {
        let config = ExchangeConfig::new(owner(), AccountId::from("0xexchange"));
        let wallet = Arc::new(HostWallet::new());
        let events = Arc::new(RecordingEventHandler::new());
        let mut exchange = Exchange::new(
            config,
            Arc::new(PriceTimePriority::new()),
            wallet.clone(),
            events.clone(),
        );
        let token = Arc::new(FixedSupplyToken::new(
            "0xfixed",
            "FIXED",
            &owner(),
            Amount::new(1_000_000),
        ));
        exchange.add_token(&owner(), "FIXED", token.clone()).unwrap();
        events.clear();
        Fixture {
            exchange,
            token,
            wallet,
            events,
        }
    }

    fn fund_tokens(f: &mut Fixture, account: &AccountId, amount: u128) {
        let exchange_address = f.exchange.address().clone();
        f.token.transfer(&owner(), account, Amount::new(amount));
        f.token.approve(account, &exchange_address, Amount::new(amount));
        f.exchange
            .deposit_token(account, "FIXED", Amount::new(amount))
            .unwrap();
    }

    #[test]
    fn test_currency_round_trip() {
        let mut f = fixture();
        f.exchange.deposit_currency(&trader(), Amount::new(1)).unwrap();
        assert_eq!(f.exchange.get_currency_balance(&trader()), Amount::new(1));

        f.exchange.withdraw_currency(&trader(), Amount::new(1)).unwrap();
        assert_eq!(f.exchange.get_currency_balance(&trader()), Amount::ZERO);
        assert_eq!(f.wallet.paid_to(&trader()), Amount::new(1));
        assert_eq!(f.events.names(), vec!["CurrencyDeposited", "CurrencyWithdrawn"]);
        assert!(f.exchange.verify_conservation());
    }

    #[test]
    fn test_rejected_payout_changes_nothing() {
        let mut f = fixture();
        f.exchange.deposit_currency(&trader(), Amount::new(10)).unwrap();
        f.wallet.set_rejecting(true);

        let err = f
            .exchange
            .withdraw_currency(&trader(), Amount::new(10))
            .unwrap_err();
        assert_eq!(
            err,
            ExchangeError::TransferRejected {
                asset: Asset::Currency
            }
        );
        assert_eq!(f.exchange.get_currency_balance(&trader()), Amount::new(10));
        assert_eq!(f.events.names(), vec!["CurrencyDeposited"]);
    }

    #[test]
    fn test_zero_amounts_rejected() {
        let mut f = fixture();
        assert_eq!(
            f.exchange.deposit_currency(&trader(), Amount::ZERO).unwrap_err(),
            ExchangeError::InvalidAmount
        );
        assert_eq!(
            f.exchange
                .withdraw_token(&trader(), "FIXED", Amount::ZERO)
                .unwrap_err(),
            ExchangeError::InvalidAmount
        );
        assert!(f.events.events().is_empty());
    }

    #[test]
    fn test_token_deposit_needs_allowance() {
        let mut f = fixture();
        let err = f
            .exchange
            .deposit_token(&owner(), "FIXED", Amount::new(2000))
            .unwrap_err();
        assert!(matches!(err, ExchangeError::TransferRejected { .. }));
        assert_eq!(f.exchange.get_token_balance(&owner(), "FIXED"), Ok(Amount::ZERO));
        assert_eq!(f.exchange.supply(&Asset::Token(Symbol::from("FIXED"))), Supply::default());
    }

    #[test]
    fn test_token_round_trip() {
        let mut f = fixture();
        fund_tokens(&mut f, &trader(), 2000);
        assert_eq!(f.token.balance_of(f.exchange.address()), Amount::new(2000));

        f.exchange
            .withdraw_token(&trader(), "FIXED", Amount::new(500))
            .unwrap();
        assert_eq!(f.exchange.get_token_balance(&trader(), "FIXED"), Ok(Amount::new(1500)));
        assert_eq!(f.token.balance_of(&trader()), Amount::new(500));
        assert!(f.exchange.verify_conservation());
    }

    #[test]
    fn test_unknown_token_everywhere() {
        let mut f = fixture();
        let unknown = ExchangeError::UnknownToken {
            symbol: Symbol::from("SOMETHING"),
        };
        assert_eq!(
            f.exchange.get_token_balance(&trader(), "SOMETHING").unwrap_err(),
            unknown
        );
        assert_eq!(
            f.exchange
                .submit_order(&trader(), "SOMETHING", Side::Buy, Price::new(1), Volume::new(1))
                .unwrap_err(),
            unknown
        );
        assert_eq!(
            f.exchange
                .get_order_book("SOMETHING", Side::Sell)
                .unwrap_err(),
            unknown
        );
        assert_eq!(
            f.exchange
                .cancel_order(&trader(), "SOMETHING", Side::Buy, Price::new(1), OrderId::new(1))
                .unwrap_err(),
            unknown
        );

        // Rejected before the contract is touched
        fund_tokens(&mut f, &trader(), 10);
        f.token.approve(&trader(), f.exchange.address(), Amount::new(10));
        let held = f.token.balance_of(f.exchange.address());
        assert_eq!(
            f.exchange
                .deposit_token(&trader(), "SOMETHING", Amount::new(5))
                .unwrap_err(),
            unknown
        );
        assert_eq!(
            f.exchange
                .withdraw_token(&trader(), "SOMETHING", Amount::new(5))
                .unwrap_err(),
            unknown
        );
        assert_eq!(f.token.balance_of(f.exchange.address()), held);
        assert_eq!(f.token.allowance(&trader(), f.exchange.address()), Amount::new(10));
        assert_eq!(f.exchange.get_token_balance(&trader(), "FIXED"), Ok(Amount::new(10)));
        assert!(f.exchange.verify_conservation());
    }

    /// Token whose outgoing transfers always fail
    struct FrozenToken {
        inner: FixedSupplyToken,
    }

    impl TokenContract for FrozenToken {
        fn address(&self) -> &AccountId {
            self.inner.address()
        }

        fn transfer_from(
            &self,
            spender: &AccountId,
            from: &AccountId,
            to: &AccountId,
            amount: Amount,
        ) -> bool {
            self.inner.transfer_from(spender, from, to, amount)
        }

        fn transfer(&self, _from: &AccountId, _to: &AccountId, _amount: Amount) -> bool {
            false
        }

        fn balance_of(&self, account: &AccountId) -> Amount {
            self.inner.balance_of(account)
        }

        fn approve(&self, owner: &AccountId, spender: &AccountId, amount: Amount) -> bool {
            self.inner.approve(owner, spender, amount)
        }

        fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
            self.inner.allowance(owner, spender)
        }
    }

    #[test]
    fn test_refused_token_withdrawal_changes_nothing() {
        let mut f = fixture();
        let frozen = Arc::new(FrozenToken {
            inner: FixedSupplyToken::new("0xfrozen", "FROZEN", &trader(), Amount::new(100)),
        });
        f.exchange
            .add_token(&owner(), "FROZEN", frozen.clone())
            .unwrap();
        frozen.approve(&trader(), f.exchange.address(), Amount::new(50));
        f.exchange
            .deposit_token(&trader(), "FROZEN", Amount::new(50))
            .unwrap();
        f.events.clear();

        let err = f
            .exchange
            .withdraw_token(&trader(), "FROZEN", Amount::new(10))
            .unwrap_err();
        assert_eq!(
            err,
            ExchangeError::TransferRejected {
                asset: Asset::Token(Symbol::from("FROZEN"))
            }
        );
        assert_eq!(f.exchange.get_token_balance(&trader(), "FROZEN"), Ok(Amount::new(50)));
        assert_eq!(frozen.balance_of(f.exchange.address()), Amount::new(50));
        assert_eq!(frozen.balance_of(&trader()), Amount::new(50));
        assert!(f.events.events().is_empty());
        assert!(f.exchange.verify_conservation());
    }

    #[test]
    fn test_buy_below_limit_releases_difference() {
        let mut f = fixture();
        let seller = AccountId::from("0xseller");
        fund_tokens(&mut f, &seller, 10);
        f.exchange.deposit_currency(&trader(), Amount::new(50)).unwrap();

        f.exchange
            .submit_order(&seller, "FIXED", Side::Sell, Price::new(3), Volume::new(10))
            .unwrap();
        f.exchange
            .submit_order(&trader(), "FIXED", Side::Buy, Price::new(5), Volume::new(10))
            .unwrap();

        let balance = f.exchange.get_balance(&trader(), &Asset::Currency);
        assert_eq!(balance.available(), Amount::new(20));
        assert_eq!(balance.escrowed(), Amount::ZERO);
        assert_eq!(f.exchange.get_currency_balance(&seller), Amount::new(30));
        assert_eq!(f.exchange.get_token_balance(&trader(), "FIXED"), Ok(Amount::new(10)));
        assert!(f.exchange.verify_conservation());
    }

    #[test]
    fn test_insufficient_escrow_rejected() {
        let mut f = fixture();
        f.exchange.deposit_currency(&trader(), Amount::new(14)).unwrap();
        let err = f
            .exchange
            .submit_order(&trader(), "FIXED", Side::Buy, Price::new(3), Volume::new(5))
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InsufficientBalance { .. }));
        assert!(f.exchange.get_order_book("FIXED", Side::Buy).unwrap().is_empty());
        assert_eq!(f.events.names(), vec!["CurrencyDeposited"]);
    }

    #[test]
    fn test_zero_price_or_volume_rejected() {
        let mut f = fixture();
        f.exchange.deposit_currency(&trader(), Amount::new(100)).unwrap();
        let zero_price = f
            .exchange
            .submit_order(&trader(), "FIXED", Side::Buy, Price::new(0), Volume::new(5));
        assert!(matches!(zero_price, Err(ExchangeError::InvalidOrder { .. })));
        let zero_volume = f
            .exchange
            .submit_order(&trader(), "FIXED", Side::Buy, Price::new(5), Volume::new(0));
        assert!(matches!(zero_volume, Err(ExchangeError::InvalidOrder { .. })));
    }

    #[test]
    fn test_order_ids_are_global() {
        let mut f = fixture();
        let other = Arc::new(FixedSupplyToken::new("0xother", "OTHER", &owner(), Amount::new(10)));
        f.exchange.add_token(&owner(), "OTHER", other).unwrap();
        f.exchange.deposit_currency(&trader(), Amount::new(100)).unwrap();

        f.exchange
            .submit_order(&trader(), "FIXED", Side::Buy, Price::new(1), Volume::new(1))
            .unwrap();
        f.exchange
            .submit_order(&trader(), "OTHER", Side::Buy, Price::new(1), Volume::new(1))
            .unwrap();

        assert_eq!(f.exchange.get_order(OrderId::new(1)).unwrap().symbol, Symbol::from("FIXED"));
        assert_eq!(f.exchange.get_order(OrderId::new(2)).unwrap().symbol, Symbol::from("OTHER"));
        assert_eq!(f.exchange.symbols(), vec![Symbol::from("FIXED"), Symbol::from("OTHER")]);
    }

    #[test]
    fn test_cancel_checks() {
        let mut f = fixture();
        f.exchange.deposit_currency(&trader(), Amount::new(15)).unwrap();
        f.exchange
            .submit_order(&trader(), "FIXED", Side::Buy, Price::new(3), Volume::new(5))
            .unwrap();
        let id = OrderId::new(1);

        let stranger = f
            .exchange
            .cancel_order(&owner(), "FIXED", Side::Buy, Price::new(3), id)
            .unwrap_err();
        assert!(matches!(stranger, ExchangeError::NotOwner { .. }));

        f.exchange
            .cancel_order(&trader(), "FIXED", Side::Buy, Price::new(3), id)
            .unwrap();
        assert_eq!(f.exchange.get_currency_balance(&trader()), Amount::new(15));

        let again = f
            .exchange
            .cancel_order(&trader(), "FIXED", Side::Buy, Price::new(3), id)
            .unwrap_err();
        assert_eq!(again, ExchangeError::OrderNotFound { order_id: id });
        assert!(f.exchange.verify_conservation());
    }
}
