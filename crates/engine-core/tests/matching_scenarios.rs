// crates/engine-core/tests/matching_scenarios.rs
use std::sync::{Arc, Mutex};

use engine_core::{
    Fill, Instrument, LimitMatch, LimitOrder, LimitPrice, MarketOrder, MatchObserver,
    MatchingEngine, OrderBook, OrderDetails, OrderId, OrderStatus, PriceTimeBook, Side,
};

fn aapl() -> Arc<Instrument> {
    Instrument::new("AAPL", "Apple Inc.")
}

fn limit(n: u128, side: Side, qty: u64, price: u64) -> LimitOrder {
    LimitOrder::with_id(OrderId::from_u128(n), side, qty, aapl(), price, n as u64)
}

fn px(p: u64) -> LimitPrice {
    LimitPrice::from(p)
}

#[derive(Default)]
struct Recorder {
    fills: Mutex<Vec<Fill>>,
    transitions: Mutex<Vec<(OrderId, OrderStatus, OrderStatus)>>,
}

impl MatchObserver for Recorder {
    fn on_fill(&self, fill: &Fill) {
        self.fills.lock().unwrap().push(*fill);
    }

    fn on_status(&self, order: &OrderDetails, previous: OrderStatus) {
        self.transitions
            .lock()
            .unwrap()
            .push((order.id, previous, order.status));
    }
}

#[test]
fn scenario_a_market_buy_fully_filled() {
    let mut book = OrderBook::new();
    book.add_order(limit(1, Side::Sell, 50, 100));

    let mut buy = MarketOrder::new(Side::Buy, 50, aapl());
    MatchingEngine::new().match_market(&mut buy, &mut book);

    assert_eq!(buy.details.status, OrderStatus::Filled);
    assert_eq!(buy.details.remaining_quantity, 0);
    assert!(book.is_empty());
    assert!(book.level(Side::Sell, px(100)).is_none());
}

#[test]
fn scenario_b_market_buy_partially_filled() {
    let mut book = OrderBook::new();
    book.add_order(limit(1, Side::Sell, 30, 100));

    let mut buy = MarketOrder::new(Side::Buy, 50, aapl());
    MatchingEngine::new().match_market(&mut buy, &mut book);

    assert_eq!(buy.details.status, OrderStatus::PartiallyFilled);
    assert_eq!(buy.details.remaining_quantity, 20);
    assert!(book.is_empty());
}

#[test]
fn scenario_c_market_buy_no_liquidity() {
    let mut book = OrderBook::new();

    let mut buy = MarketOrder::new(Side::Buy, 50, aapl());
    MatchingEngine::new().match_market(&mut buy, &mut book);

    assert_eq!(buy.details.status, OrderStatus::NoLiquidity);
    assert_eq!(buy.details.remaining_quantity, 50);
}

#[test]
fn scenario_d_limit_buy_rests_on_empty_book() {
    let mut book = OrderBook::new();
    let buy = limit(1, Side::Buy, 50, 100);

    let result = MatchingEngine::new().match_limit(buy, &mut book);

    assert!(matches!(result, LimitMatch::Resting { matched: 0, .. }));
    assert_eq!(book.level_count(Side::Buy), 1);
    let level = book.level(Side::Buy, px(100)).unwrap();
    assert_eq!(level.len(), 1);
    assert_eq!(level[0].details.id, OrderId::from_u128(1));
    assert_eq!(level[0].details.status, OrderStatus::Open);
}

#[test]
fn scenario_e_limit_buy_matches_then_rests_remainder() {
    let mut book = OrderBook::new();
    book.add_order(limit(1, Side::Sell, 30, 100));

    let result = MatchingEngine::new().match_limit(limit(2, Side::Buy, 50, 100), &mut book);

    match result {
        LimitMatch::Resting {
            key,
            matched,
            remaining,
        } => {
            assert_eq!(matched, 30);
            assert_eq!(remaining, 20);
            assert_eq!(key.price, px(100));
            assert_eq!(key.side, Side::Buy);
        }
        other => panic!("expected resting remainder, got {other:?}"),
    }
    assert_eq!(book.level_count(Side::Sell), 0);

    let level = book.level(Side::Buy, px(100)).unwrap();
    assert_eq!(level[0].details.remaining_quantity, 20);
    assert_eq!(level[0].details.status, OrderStatus::Open);
}

#[test]
fn market_sell_sweeps_bids_best_first() {
    let mut book = OrderBook::new();
    book.add_order(limit(1, Side::Buy, 10, 98));
    book.add_order(limit(2, Side::Buy, 10, 100));
    book.add_order(limit(3, Side::Buy, 10, 99));

    let recorder = Recorder::default();
    let engine = MatchingEngine::with_observer(recorder);
    let mut sell = MarketOrder::new(Side::Sell, 25, aapl());
    engine.match_market(&mut sell, &mut book);

    assert_eq!(sell.details.status, OrderStatus::Filled);
    let prices: Vec<_> = engine
        .observer()
        .fills
        .lock()
        .unwrap()
        .iter()
        .map(|f| (f.maker, f.price, f.quantity))
        .collect();
    assert_eq!(
        prices,
        vec![
            (OrderId::from_u128(2), px(100), 10),
            (OrderId::from_u128(3), px(99), 10),
            (OrderId::from_u128(1), px(98), 5),
        ]
    );
    assert_eq!(book.best_bid_price(), Some(px(98)));
    assert_eq!(book.best_bid_quantity(), 5);
}

#[test]
fn limit_stops_at_its_price() {
    let mut book = OrderBook::new();
    book.add_order(limit(1, Side::Sell, 10, 100));
    book.add_order(limit(2, Side::Sell, 10, 101));
    book.add_order(limit(3, Side::Sell, 10, 103));

    let result = MatchingEngine::new().match_limit(limit(4, Side::Buy, 40, 101), &mut book);

    assert!(matches!(result, LimitMatch::Resting { matched: 20, .. }));
    assert_eq!(book.best_ask_price(), Some(px(103)));
    assert_eq!(book.best_bid_price(), Some(px(101)));
    assert_eq!(book.best_bid_quantity(), 20);
}

#[test]
fn crossing_limit_executes_at_resting_price() {
    let mut book = OrderBook::new();
    book.add_order(limit(1, Side::Buy, 10, 105));

    let engine = MatchingEngine::with_observer(Recorder::default());
    let result = engine.match_limit(limit(2, Side::Sell, 10, 100), &mut book);

    assert!(matches!(result, LimitMatch::Filled(_)));
    let fills = engine.observer().fills.lock().unwrap();
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].price, px(105));
    assert_eq!(fills[0].taker_side, Side::Sell);
    assert!(book.is_empty());
}

#[test]
fn non_crossing_limit_does_not_touch_opposite_side() {
    let mut book = OrderBook::new();
    book.add_order(limit(1, Side::Sell, 10, 101));

    let result = MatchingEngine::new().match_limit(limit(2, Side::Buy, 10, 100), &mut book);

    assert!(matches!(result, LimitMatch::Resting { matched: 0, .. }));
    let tob = book.top_of_book();
    assert_eq!(tob.bid.map(|l| l.price), Some(px(100)));
    assert_eq!(tob.ask.map(|l| (l.price, l.quantity)), Some((px(101), 10)));
}

#[test]
fn fifo_within_level() {
    let mut book = OrderBook::new();
    book.add_order(limit(1, Side::Sell, 10, 100));
    book.add_order(limit(2, Side::Sell, 10, 100));
    book.add_order(limit(3, Side::Sell, 10, 100));

    let mut buy = MarketOrder::new(Side::Buy, 15, aapl());
    MatchingEngine::new().match_market(&mut buy, &mut book);

    let level = book.level(Side::Sell, px(100)).unwrap();
    let remaining: Vec<_> = level
        .iter()
        .map(|o| (o.details.id, o.details.remaining_quantity))
        .collect();
    assert_eq!(
        remaining,
        vec![(OrderId::from_u128(2), 5), (OrderId::from_u128(3), 10)]
    );
}

#[test]
fn observer_sees_every_transition() {
    let mut book = OrderBook::new();
    let engine = MatchingEngine::with_observer(Recorder::default());

    engine.match_limit(limit(1, Side::Sell, 10, 100), &mut book);
    let mut buy = MarketOrder::with_id(OrderId::from_u128(2), Side::Buy, 10, aapl(), 2);
    engine.match_market(&mut buy, &mut book);

    let transitions = engine.observer().transitions.lock().unwrap().clone();
    assert_eq!(
        transitions,
        vec![
            (OrderId::from_u128(1), OrderStatus::Pending, OrderStatus::Open),
            (OrderId::from_u128(1), OrderStatus::Open, OrderStatus::Filled),
            (OrderId::from_u128(2), OrderStatus::Pending, OrderStatus::Filled),
        ]
    );
}

#[test]
fn retained_levels_do_not_change_matching() {
    let mut pruned = OrderBook::new();
    let mut retained = OrderBook::with_config(engine_core::BookConfig {
        prune_empty_levels: false,
    });
    let engine = MatchingEngine::new();

    for book in [&mut pruned, &mut retained] {
        book.add_order(limit(1, Side::Sell, 10, 100));
        book.add_order(limit(2, Side::Sell, 10, 101));

        let mut buy = MarketOrder::new(Side::Buy, 10, aapl());
        engine.match_market(&mut buy, book);
        let result = engine.match_limit(limit(3, Side::Buy, 15, 101), book);

        assert!(matches!(result, LimitMatch::Resting { matched: 10, .. }));
        assert_eq!(book.best_bid_quantity(), 5);
        assert_eq!(book.best_ask_price(), None);
    }

    assert!(pruned.level(Side::Sell, px(100)).is_none());
    assert!(retained.level(Side::Sell, px(100)).is_some());
}
