//! Seed data: the 30-model catalog fixture and default page content.
//!
//! Deterministic relative to the supplied base instant: ids are
//! `base + index`, so seeding twice with the same instant produces the
//! same data. The CLI seeds production data dirs; the integration tests
//! seed temp dirs and assert against this exact fixture.

use chrono::{DateTime, Utc};

use capsulehaus_core::catalog::Product;
use capsulehaus_core::content::{
    ContactsContent, FeatureItem, HomeContent, OptionItem, OptionsContent, PageBlocks,
    PageContent,
};
use capsulehaus_core::{ItemId, Money, ProductId};

use crate::store::content::PageEntry;
use crate::store::{StoreError, Stores};

/// Row format for the product table: name, category, price, guests,
/// dimensions, in stock.
type ProductRow = (&'static str, &'static str, i64, u32, &'static str, bool);

/// The 30-model seed catalog.
const PRODUCT_ROWS: [ProductRow; 30] = [
    ("Capsule Mini Solo", "mini", 640_000, 1, "4.2 x 2.3 x 2.6 m", true),
    ("Capsule Mini S2", "mini", 780_000, 2, "4.8 x 2.4 x 2.6 m", true),
    ("Capsule Mini M2", "mini", 890_000, 2, "6.0 x 2.4 x 2.7 m", true),
    ("Capsule Mini M2 Pro", "mini", 990_000, 2, "6.0 x 2.4 x 2.7 m", true),
    ("Capsule Mini Duo", "mini", 1_150_000, 3, "6.6 x 2.4 x 2.7 m", true),
    ("Capsule Mini L2", "mini", 1_240_000, 2, "7.2 x 2.4 x 2.7 m", true),
    ("Capsule Mini Solo+", "mini", 820_000, 1, "4.8 x 2.4 x 2.6 m", true),
    ("Capsule Mini Teardrop", "mini", 960_000, 2, "5.4 x 2.3 x 2.6 m", false),
    ("Capsule Standard S4", "standard", 1_380_000, 3, "7.2 x 2.9 x 2.8 m", true),
    ("Capsule Standard M4", "standard", 1_520_000, 4, "8.0 x 2.9 x 2.8 m", true),
    ("Capsule Standard M4 Terrace", "standard", 1_690_000, 4, "8.0 x 2.9 x 2.8 m", true),
    ("Capsule Standard L4", "standard", 1_840_000, 4, "9.0 x 2.9 x 2.8 m", true),
    ("Capsule Standard Panorama", "standard", 1_950_000, 4, "9.0 x 2.9 x 2.8 m", true),
    ("Capsule Standard S3", "standard", 1_430_000, 3, "7.2 x 2.9 x 2.8 m", false),
    ("Capsule Standard M3", "standard", 1_560_000, 3, "8.0 x 2.9 x 2.8 m", true),
    ("Capsule Family M6", "family", 2_150_000, 5, "9.6 x 3.2 x 3.0 m", true),
    ("Capsule Family L6", "family", 2_380_000, 6, "10.4 x 3.2 x 3.0 m", true),
    ("Capsule Family L6 Terrace", "family", 2_540_000, 6, "10.4 x 3.2 x 3.0 m", true),
    ("Capsule Family XL", "family", 2_780_000, 6, "11.2 x 3.2 x 3.0 m", true),
    ("Capsule Family Twin", "family", 2_460_000, 5, "10.4 x 3.2 x 3.0 m", true),
    ("Capsule Family Panorama", "family", 2_890_000, 6, "11.2 x 3.2 x 3.0 m", true),
    ("Capsule Premium P4", "premium", 3_150_000, 4, "9.6 x 3.4 x 3.1 m", true),
    ("Capsule Premium P5", "premium", 3_420_000, 5, "10.4 x 3.4 x 3.1 m", true),
    ("Capsule Premium Panorama", "premium", 3_680_000, 4, "10.4 x 3.4 x 3.1 m", true),
    ("Capsule Premium Spa", "premium", 3_940_000, 4, "11.2 x 3.4 x 3.1 m", false),
    ("Capsule Premium Grand", "premium", 4_450_000, 6, "12.0 x 3.4 x 3.1 m", true),
    ("Capsule Office Solo", "office", 1_480_000, 1, "6.0 x 2.9 x 2.8 m", true),
    ("Capsule Office Duo", "office", 1_720_000, 2, "7.2 x 2.9 x 2.8 m", true),
    ("Capsule Office Meet", "office", 2_080_000, 4, "8.0 x 2.9 x 2.8 m", true),
    ("Capsule Office Studio", "office", 2_340_000, 3, "9.0 x 2.9 x 2.8 m", true),
];

fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-").replace('+', "plus")
}

/// Build the 30-model seed catalog with ids derived from `base`.
#[must_use]
pub fn products(base: DateTime<Utc>) -> Vec<Product> {
    let base_id = base.timestamp_millis();
    PRODUCT_ROWS
        .iter()
        .enumerate()
        .map(|(i, (name, category, price, guests, dimensions, in_stock))| {
            let slug = slugify(name);
            Product {
                id: ProductId::new(base_id + i as i64),
                name: (*name).to_owned(),
                price: Money::new(*price),
                dimensions: (*dimensions).to_owned(),
                guests: *guests,
                description: format!(
                    "{name} - a factory-built capsule house for {guests} guest(s), \
                     delivered assembled and connected on site."
                ),
                category: (*category).to_owned(),
                images: vec![
                    format!("/uploads/products/{slug}/01.jpg"),
                    format!("/uploads/products/{slug}/02.jpg"),
                ],
                video_url: (i % 7 == 0)
                    .then(|| format!("/uploads/products/{slug}/tour.mp4")),
                in_stock: *in_stock,
            }
        })
        .collect()
}

/// Build the default page entries with block and item ids derived from
/// `base`.
#[must_use]
pub fn pages(base: DateTime<Utc>) -> Vec<(&'static str, PageEntry)> {
    let base_id = base.timestamp_millis();
    let item = |offset: i64| ItemId::new(base_id + offset);

    let home = PageEntry {
        blocks: PageBlocks::from_kinds(
            &[
                ("hero", true),
                ("advantages", true),
                ("catalog-preview", true),
                ("innovations", true),
                ("cta", true),
            ],
            base,
        ),
        content: Some(PageContent::Home(HomeContent {
            hero_title: "Capsule houses, ready in 30 days".to_owned(),
            hero_subtitle: "Factory-built, delivered assembled, connected on site".to_owned(),
            innovations: vec![
                FeatureItem {
                    id: item(100),
                    icon: "thermo".to_owned(),
                    title: "All-season envelope".to_owned(),
                    description: "200 mm insulation keeps the capsule livable from -40 to +40."
                        .to_owned(),
                },
                FeatureItem {
                    id: item(101),
                    icon: "bolt".to_owned(),
                    title: "Single-cable hookup".to_owned(),
                    description: "One power inlet feeds heating, lighting, and water prep."
                        .to_owned(),
                },
                FeatureItem {
                    id: item(102),
                    icon: "truck".to_owned(),
                    title: "No-foundation mounting".to_owned(),
                    description: "Screw piles installed in one day, no concrete works."
                        .to_owned(),
                },
            ],
        })),
    };

    let options = PageEntry {
        blocks: PageBlocks::from_kinds(&[("options-list", true), ("cta", true)], base),
        content: Some(PageContent::Options(OptionsContent {
            additional_options: vec![
                OptionItem {
                    id: item(200),
                    title: "Larch terrace".to_owned(),
                    description: "6 m² deck with hidden fasteners".to_owned(),
                    price: Money::new(240_000),
                },
                OptionItem {
                    id: item(201),
                    title: "Panoramic glazing".to_owned(),
                    description: "Floor-to-ceiling double glazing on the end wall".to_owned(),
                    price: Money::new(310_000),
                },
                OptionItem {
                    id: item(202),
                    title: "Wood-fired hot tub".to_owned(),
                    description: "Cedar tub for 4, installed next to the capsule".to_owned(),
                    price: Money::new(420_000),
                },
                OptionItem {
                    id: item(203),
                    title: "Solar kit".to_owned(),
                    description: "3 kW panels with battery backup".to_owned(),
                    price: Money::new(380_000),
                },
            ],
        })),
    };

    let contacts = PageEntry {
        blocks: PageBlocks::from_kinds(&[("map", true), ("contact-form", true)], base),
        content: Some(PageContent::Contacts(ContactsContent {
            phone: "+7 495 120-00-00".to_owned(),
            email: "hello@capsulehaus.ru".to_owned(),
            address: "Moscow, Skladochnaya 1, bld. 5".to_owned(),
            worktime: "Daily 10:00-20:00".to_owned(),
        })),
    };

    // Blocks only, no typed payload.
    let delivery = PageEntry {
        blocks: PageBlocks::from_kinds(
            &[("steps", true), ("geography", true), ("faq", false)],
            base,
        ),
        content: None,
    };

    vec![
        ("home", home),
        ("options", options),
        ("contacts", contacts),
        ("delivery", delivery),
    ]
}

/// Seed every store from the fixture.
///
/// # Errors
///
/// Returns `StoreError` if persisting fails.
pub fn apply(stores: &Stores, base: DateTime<Utc>) -> Result<(), StoreError> {
    stores.products.replace_all(products(base))?;
    for (slug, entry) in pages(base) {
        stores.content.put_page(slug, entry)?;
    }
    Ok(())
}
