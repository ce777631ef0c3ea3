//! Integration test for the browse, cart, checkout and order history flow.

use jiff::Timestamp;
use rusty_money::{Money, iso};
use testresult::TestResult;

use storefront::prelude::*;

fn home() -> NewAddress {
    NewAddress {
        title: "Home".to_string(),
        province_id: "greater-london".to_string(),
        province_name: "Greater London".to_string(),
        city_id: "london".to_string(),
        city_name: "London".to_string(),
        postal_code: "N1 9GU".to_string(),
        address: "1 Example Street".to_string(),
        receiver_name: "Sam Taylor".to_string(),
        receiver_phone: "07700 900000".to_string(),
    }
}

#[test]
fn checkout_moves_cart_into_order_history() -> TestResult {
    let mut storage = MemoryStorage::new();
    let catalog = Catalog::bundled()?;

    let accessories = catalog.filter(&ProductQuery::new().category("Accessories"));
    assert!(!accessories.is_empty());

    let keyboard = catalog
        .filter(&ProductQuery::new().search("keyboard"))
        .into_iter()
        .next()
        .ok_or("search found nothing")?;

    let mut addresses = AddressBook::new();
    addresses.add(home());
    addresses.save(&mut storage)?;

    let mut cart = CartStore::open(storage.clone(), catalog.currency());
    cart.add(keyboard);
    cart.add(keyboard);

    let expected_total = checkout_total(cart.items(), DELIVERY_FEE);
    assert_eq!(expected_total, 45_00 * 2 + DELIVERY_FEE);

    let address = AddressBook::load(&storage)
        .default_address()
        .cloned()
        .ok_or("no default address")?;

    let mut book = OrderBook::load(&storage);
    let order = Order::place(
        NewOrder {
            id: book.next_id(),
            order_number: book.next_order_number(2026),
            items: cart.items().to_vec(),
            address,
            payment_method: PaymentMethod::Online,
            delivery_fee: DELIVERY_FEE,
            notes: None,
        },
        Timestamp::UNIX_EPOCH,
    )?;

    book.push(order);
    book.save(&mut storage)?;
    cart.clear();

    let history = OrderBook::load(&storage);
    let placed = history.orders().first().ok_or("order not saved")?;

    assert_eq!(placed.order_number, "ORD-2026-001");
    assert_eq!(placed.status, OrderStatus::Pending);
    assert_eq!(placed.total_price, expected_total);
    assert_eq!(placed.item_count(), 2);
    assert_eq!(
        to_money(placed.total_price, iso::GBP),
        Money::from_minor(94_99, iso::GBP)
    );
    assert!(cart.is_empty());

    Ok(())
}

#[test]
fn order_follows_status_progression_until_delivered() -> TestResult {
    let catalog = Catalog::bundled()?;
    let watch = catalog.get("2").ok_or("missing watch")?;
    let item = CartItem::new(watch.clone(), 1).ok_or("watch should be in stock")?;

    let mut book = OrderBook::new();
    let mut address = AddressBook::new();
    let id = address.add(home());

    let mut order = Order::place(
        NewOrder {
            id: book.next_id(),
            order_number: book.next_order_number(2026),
            items: vec![item],
            address: address.get(&id).cloned().ok_or("address not saved")?,
            payment_method: PaymentMethod::CashOnDelivery,
            delivery_fee: DELIVERY_FEE,
            notes: Some("Leave with the concierge".to_string()),
        },
        Timestamp::UNIX_EPOCH,
    )?;

    for _ in 0..4 {
        order.advance(Timestamp::UNIX_EPOCH)?;
    }

    assert_eq!(order.status, OrderStatus::Delivered);
    assert!(order.can_return());
    assert!(!order.can_cancel());
    assert!(order.timeline().iter().all(|step| step.completed));

    book.push(order);

    assert_eq!(book.filter(Some(OrderStatus::Delivered)).len(), 1);
    assert!(book.filter(Some(OrderStatus::Pending)).is_empty());

    Ok(())
}
