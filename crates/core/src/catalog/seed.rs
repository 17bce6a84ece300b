use crate::domain::price::PricePoint;
use crate::domain::product::{PriceChange, PriceDirection, Product, Store};
use chrono::{Months, NaiveDate};
use std::collections::BTreeMap;

struct Row {
    id: &'static str,
    title: &'static str,
    image: &'static str,
    current_price: f64,
    original_price: f64,
    store: Store,
    rating: f64,
    change: (f64, PriceDirection),
    category: &'static str,
    link: &'static str,
    best_deal: Option<&'static str>,
    // Monthly closing prices starting at HISTORY_START.
    monthly: &'static [f64],
}

const SONY_XM5: &str = "Sony WH-1000XM5 Wireless Noise Cancelling Headphones";

const ROWS: &[Row] = &[
    Row {
        id: "1",
        title: "Apple iPhone 15 Pro Max - 256GB - Natural Titanium",
        image: "https://placehold.co/300x300?text=iPhone+15",
        current_price: 1199.99,
        original_price: 1299.99,
        store: Store::Amazon,
        rating: 4.8,
        change: (100.0, PriceDirection::Down),
        category: "Phones",
        link: "https://www.amazon.com/dp/B0CHX1W1XY",
        best_deal: Some("Great time to buy! Price just dropped to its lowest in 6 months."),
        monthly: &[1299.99, 1299.99, 1249.99, 1249.99, 1199.99, 1199.99],
    },
    Row {
        id: "2",
        title: "Samsung Galaxy S23 Ultra - 512GB - Phantom Black",
        image: "https://placehold.co/300x300?text=Galaxy+S23",
        current_price: 1149.99,
        original_price: 1249.99,
        store: Store::BestBuy,
        rating: 4.7,
        change: (50.0, PriceDirection::Down),
        category: "Phones",
        link: "https://www.bestbuy.com",
        best_deal: None,
        monthly: &[1099.99, 1099.99, 1149.99, 1149.99, 1199.99, 1149.99],
    },
    Row {
        id: "3",
        title: SONY_XM5,
        image: "https://placehold.co/300x300?text=Sony+WH-1000XM5",
        current_price: 348.0,
        original_price: 399.99,
        store: Store::Amazon,
        rating: 4.6,
        change: (51.99, PriceDirection::Down),
        category: "Audio",
        link: "https://www.amazon.com/dp/B09XS7JWHH",
        best_deal: None,
        monthly: &[399.99, 379.99, 349.99, 349.99, 329.99, 348.0],
    },
    Row {
        id: "4",
        title: "Apple MacBook Air M2 - 13.6\" - 8GB RAM - 256GB SSD",
        image: "https://placehold.co/300x300?text=MacBook+Air",
        current_price: 999.0,
        original_price: 1199.0,
        store: Store::Walmart,
        rating: 4.9,
        change: (200.0, PriceDirection::Down),
        category: "Laptops",
        link: "https://www.walmart.com",
        best_deal: Some("Buy now! This is the lowest price we've seen for the M2 MacBook Air."),
        monthly: &[1199.0, 1149.0, 1099.0, 1099.0, 999.0, 999.0],
    },
    Row {
        id: "5",
        title: "LG C2 65-inch OLED 4K Smart TV",
        image: "https://placehold.co/300x300?text=LG+C2",
        current_price: 1599.99,
        original_price: 2099.99,
        store: Store::Target,
        rating: 4.8,
        change: (500.0, PriceDirection::Down),
        category: "TVs",
        link: "https://www.target.com",
        best_deal: None,
        monthly: &[1299.99, 1399.99, 1499.99, 1599.99, 1549.99, 1599.99],
    },
    Row {
        id: "6",
        title: "Google Pixel 7 Pro - 128GB - Obsidian",
        image: "https://placehold.co/300x300?text=Pixel+7+Pro",
        current_price: 649.0,
        original_price: 899.0,
        store: Store::Flipkart,
        rating: 4.5,
        change: (250.0, PriceDirection::Down),
        category: "Phones",
        link: "https://www.flipkart.com/google-pixel-7-pro/p/itm?pid=MOBGHWFHUYWGB5F2",
        best_deal: None,
        monthly: &[899.0, 849.0, 799.0, 749.0, 699.0, 649.0],
    },
    Row {
        id: "7",
        title: "Apple AirPods Pro (2nd Generation)",
        image: "https://placehold.co/300x300?text=AirPods+Pro",
        current_price: 249.0,
        original_price: 249.0,
        store: Store::Target,
        rating: 4.7,
        change: (0.0, PriceDirection::Stable),
        category: "Audio",
        link: "https://www.target.com",
        best_deal: None,
        monthly: &[249.0, 249.0, 249.0, 249.0, 249.0, 249.0],
    },
    Row {
        id: "8",
        title: "Dell XPS 13 Plus - 16GB RAM - 512GB SSD",
        image: "https://placehold.co/300x300?text=XPS+13",
        current_price: 1299.99,
        original_price: 1299.99,
        store: Store::BestBuy,
        rating: 4.3,
        change: (50.0, PriceDirection::Up),
        category: "Laptops",
        link: "https://www.bestbuy.com",
        best_deal: None,
        monthly: &[1199.99, 1199.99, 1249.99, 1249.99, 1249.99, 1299.99],
    },
    Row {
        id: "9",
        title: SONY_XM5,
        image: "https://placehold.co/300x300?text=Sony+WH-1000XM5",
        current_price: 379.99,
        original_price: 399.99,
        store: Store::BestBuy,
        rating: 4.6,
        change: (20.0, PriceDirection::Down),
        category: "Audio",
        link: "https://www.bestbuy.com",
        best_deal: None,
        monthly: &[399.99, 389.99, 369.99, 349.99, 349.99, 379.99],
    },
];

const HISTORY_START: NaiveDate = match NaiveDate::from_ymd_opt(2023, 6, 1) {
    Some(date) => date,
    None => panic!("invalid history start date"),
};

pub(super) fn data() -> (Vec<Product>, BTreeMap<String, Vec<PricePoint>>) {

    let mut products = Vec::with_capacity(ROWS.len());
    let mut histories = BTreeMap::new();
    for row in ROWS {
        products.push(Product {
            id: row.id.to_string(),
            title: row.title.to_string(),
            image: row.image.to_string(),
            current_price: row.current_price,
            original_price: row.original_price,
            store: row.store,
            rating: row.rating,
            price_change: PriceChange {
                amount: row.change.0,
                direction: row.change.1,
            },
            description: None,
            category: Some(row.category.to_string()),
            link: Some(row.link.to_string()),
            is_best_deal: row.best_deal.is_some(),
            ai_recommendation: row.best_deal.map(str::to_string),
        });

        let history = row
            .monthly
            .iter()
            .zip(0u32..)
            .filter_map(|(&price, i)| {
                let date = HISTORY_START.checked_add_months(Months::new(i))?;
                Some(PricePoint {
                    date,
                    price,
                    store: Some(row.store.to_string()),
                })
            })
            .collect();
        histories.insert(row.id.to_string(), history);
    }

    (products, histories)
}
