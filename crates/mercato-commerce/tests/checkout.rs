//! End-to-end checkout flow against the in-memory backend.

use mercato_commerce::prelude::*;
use mercato_commerce::store::{
    apply_coupon_to_cart, load_discount_table, place_order, validate_coupon, CartSessions,
};
use mercato_store::MemoryKv;

fn seeded_store() -> (MemoryStore, Product, Product) {
    let store = MemoryStore::new();

    let beans = Product::new(
        "p-beans",
        "Espresso Beans",
        Money::new(10_000, Currency::USD),
        "coffee",
    )
    .with_stock(100);
    let grinder = Product::new(
        "p-grinder",
        "Hand Grinder",
        Money::new(5_000, Currency::USD),
        "gear",
    )
    .with_stock(20);

    store.insert_product(beans.clone()).unwrap();
    store.insert_product(grinder.clone()).unwrap();
    store
        .insert_rule(QuantityDiscountRule::new(beans.id.clone(), 5, 10.0))
        .unwrap();
    store
        .insert_rule(QuantityDiscountRule::new(grinder.id.clone(), 5, 5.0))
        .unwrap();
    store
        .insert_rule(QuantityDiscountRule::new(grinder.id.clone(), 10, 15.0))
        .unwrap();
    store
        .insert_coupon(Coupon::new("WELCOME", 15.0).single_use())
        .unwrap();
    (store, beans, grinder)
}

#[test]
fn storefront_checkout_flow() {
    let (store, beans, grinder) = seeded_store();
    let table = load_discount_table(&store).unwrap();
    let sessions = CartSessions::new(MemoryKv::new());

    let mut cart = Cart::for_user(UserId::new("u-1"), "sess-1");

    // Add in two steps: 3 then 2 units crosses the tier threshold and the
    // unit price drops to $90.00, exactly as a single add of 5 would.
    cart.add_item(&beans, 3, &table).unwrap();
    cart.add_item(&beans, 2, &table).unwrap();
    assert_eq!(cart.get_item(&beans.id).unwrap().unit_price.amount_cents, 9_000);

    // 12 grinders takes the 15% tier over the 5% one: $42.50 each.
    cart.add_item(&grinder, 12, &table).unwrap();
    assert_eq!(
        cart.get_item(&grinder.id).unwrap().unit_price.amount_cents,
        4_250
    );
    sessions.save(&cart).unwrap();

    // The cart survives a session reload.
    let mut cart = sessions.load("sess-1").unwrap().unwrap();
    assert_eq!(cart.item_count(), 17);

    // Coupon entry is whitespace- and case-insensitive.
    apply_coupon_to_cart(&store, &mut cart, &CouponCode::new(" welcome ")).unwrap();

    let totals = cart.totals().unwrap();
    assert_eq!(totals.subtotal.amount_cents, 5 * 9_000 + 12 * 4_250);
    assert_eq!(
        totals.grand_total,
        totals.subtotal.percent_off(15.0)
    );

    let order_id = place_order(&store, &store, &mut cart, PaymentMethod::Card).unwrap();
    sessions.save(&cart).unwrap();

    // The order snapshot matches what the cart displayed.
    let order = store.order(&order_id).unwrap().unwrap();
    assert_eq!(order.subtotal, totals.subtotal);
    assert_eq!(order.grand_total, totals.grand_total);
    assert_eq!(order.discount_percent, 15.0);
    assert_eq!(order.fulfillment, FulfillmentStatus::Pending);

    // The cart (and its persisted copy) is now empty with no coupon.
    assert!(cart.is_empty());
    let reloaded = sessions.load("sess-1").unwrap().unwrap();
    assert!(reloaded.is_empty());
    assert!(reloaded.coupon.is_none());
}

#[test]
fn single_use_coupon_race_resolves_to_one_winner() {
    let (store, beans, _) = seeded_store();
    let table = load_discount_table(&store).unwrap();
    let user = UserId::new("u-1");
    let code = CouponCode::new("WELCOME");

    // Two sessions for the same user both pass the dry-run validation.
    let mut tab_a = Cart::for_user(user.clone(), "sess-a");
    let mut tab_b = Cart::for_user(user.clone(), "sess-b");
    tab_a.add_item(&beans, 1, &table).unwrap();
    tab_b.add_item(&beans, 1, &table).unwrap();
    apply_coupon_to_cart(&store, &mut tab_a, &code).unwrap();
    apply_coupon_to_cart(&store, &mut tab_b, &code).unwrap();

    // The first checkout wins the conditional write.
    place_order(&store, &store, &mut tab_a, PaymentMethod::Card).unwrap();

    // The second is rejected at consumption and its cart is left intact.
    let result = place_order(&store, &store, &mut tab_b, PaymentMethod::Card);
    assert!(matches!(
        result,
        Err(CommerceError::CouponAlreadyUsed { .. })
    ));
    assert!(!tab_b.is_empty());
    assert_eq!(store.order_count().unwrap(), 1);

    // Validation now reports the consumption too.
    assert!(matches!(
        validate_coupon(&store, &code, Some(&user)),
        Err(CommerceError::CouponAlreadyUsed { .. })
    ));
}

#[test]
fn admin_edit_reprices_with_stacked_discounts() {
    let (store, beans, _) = seeded_store();
    let table = load_discount_table(&store).unwrap();

    let mut cart = Cart::for_user(UserId::new("u-2"), "sess-admin");
    cart.add_item(&beans, 2, &table).unwrap();
    let order_id = place_order(&store, &store, &mut cart, PaymentMethod::Transfer).unwrap();

    let mut order = store.order(&order_id).unwrap().unwrap();
    assert_eq!(order.grand_total.amount_cents, 20_000);

    // Admin stacks two discounts on the existing order: summed, then one
    // reduction over the preserved subtotal.
    order.reprice(&[10.0, 15.0]);
    store.update(&order).unwrap();

    let stored = store.order(&order_id).unwrap().unwrap();
    assert_eq!(stored.discount_percent, 25.0);
    assert_eq!(stored.grand_total.amount_cents, 15_000);
    assert_eq!(stored.subtotal.amount_cents, 20_000);
}
