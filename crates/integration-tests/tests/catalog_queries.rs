//! The seeded 30-model catalog against the query engine.

#![allow(clippy::unwrap_used)]

use capsulehaus_core::catalog::{CatalogQuery, CategoryFilter, PriceBand, SortKey};
use capsulehaus_core::Money;
use chrono::{TimeZone, Utc};

use capsulehaus_integration_tests::temp_stores;
use capsulehaus_server::seed;

fn seeded() -> (tempfile::TempDir, capsulehaus_server::store::Stores) {
    let (guard, stores) = temp_stores();
    let base = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
    seed::apply(&stores, base).unwrap();
    (guard, stores)
}

#[test]
fn mini_band_guest_query_is_deterministic() {
    let (_guard, stores) = seeded();

    let query = CatalogQuery {
        category: CategoryFilter::Category("mini".to_owned()),
        price_band: Some(PriceBand::To1m),
        guests: Some(2),
        sort: SortKey::Default,
        page: 1,
        page_size: 30,
    };
    let page = stores.products.query(&query).unwrap();

    // Every active predicate holds for every result (conjunction).
    for product in &page.products {
        assert_eq!(product.category, "mini");
        assert!(product.price <= Money::new(1_000_000));
        assert_eq!(product.guests, 2);
    }

    // And the result is exactly the fixture slice, in fixture order.
    let names: Vec<&str> = page.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Capsule Mini S2",
            "Capsule Mini M2",
            "Capsule Mini M2 Pro",
            "Capsule Mini Teardrop"
        ]
    );
    assert_eq!(page.total_matches, 4);
}

#[test]
fn price_sort_over_seed_is_nondecreasing() {
    let (_guard, stores) = seeded();

    let query = CatalogQuery {
        category: CategoryFilter::All,
        price_band: None,
        guests: None,
        sort: SortKey::PriceAsc,
        page: 1,
        page_size: 30,
    };
    let page = stores.products.query(&query).unwrap();

    assert_eq!(page.total_matches, 30);
    let prices: Vec<i64> = page.products.iter().map(|p| p.price.as_i64()).collect();
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn pagination_reports_full_total() {
    let (_guard, stores) = seeded();

    let page_one = stores
        .products
        .query(&CatalogQuery {
            page: 1,
            page_size: 9,
            ..CatalogQuery::default()
        })
        .unwrap();
    assert_eq!(page_one.products.len(), 9);
    assert_eq!(page_one.total_matches, 30);

    // Last partial page.
    let page_four = stores
        .products
        .query(&CatalogQuery {
            page: 4,
            page_size: 9,
            ..CatalogQuery::default()
        })
        .unwrap();
    assert_eq!(page_four.products.len(), 3);
    assert_eq!(page_four.total_matches, 30);

    // Past the end: empty page, same total.
    let page_nine = stores
        .products
        .query(&CatalogQuery {
            page: 9,
            page_size: 9,
            ..CatalogQuery::default()
        })
        .unwrap();
    assert!(page_nine.products.is_empty());
    assert_eq!(page_nine.total_matches, 30);
}

#[test]
fn empty_band_is_a_valid_result() {
    let (_guard, stores) = seeded();

    // Office models never reach the top band in the fixture.
    let query = CatalogQuery {
        category: CategoryFilter::Category("office".to_owned()),
        price_band: Some(PriceBand::Over3m),
        guests: None,
        sort: SortKey::Default,
        page: 1,
        page_size: 30,
    };
    let page = stores.products.query(&query).unwrap();
    assert!(page.products.is_empty());
    assert_eq!(page.total_matches, 0);
}

#[test]
fn admin_edit_does_not_rewrite_order_snapshots() {
    use capsulehaus_core::order::{OrderDraft, OrderItem};
    use capsulehaus_core::Phone;
    use capsulehaus_server::store::products::ProductPatch;

    let (_guard, stores) = seeded();
    let victim = stores.products.all().unwrap().first().unwrap().clone();

    // Freeze the product into an order, then reprice the product.
    let order = stores
        .orders
        .create(
            OrderDraft {
                customer_name: "Ivan".to_owned(),
                customer_phone: Phone::parse("+79991234567").unwrap(),
                customer_email: None,
                items: vec![OrderItem {
                    product_id: victim.id,
                    name: victim.name.clone(),
                    quantity: 1,
                    price: victim.price,
                }],
                order_number: None,
                delivery_address: None,
                notes: None,
            },
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        )
        .unwrap();

    stores
        .products
        .update(
            victim.id,
            ProductPatch {
                price: Some(Money::new(9_999_999)),
                ..ProductPatch::default()
            },
        )
        .unwrap();

    let reloaded = stores.orders.get(order.id).unwrap().unwrap();
    assert_eq!(reloaded.items.first().unwrap().price, victim.price);
    assert_eq!(reloaded.total, victim.price);
}
