use std::path::Path;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// One generated sale, serialized with the dashboard's column names.
#[derive(Serialize)]
struct SaleRow<'a> {
    #[serde(rename = "Order ID")]
    order_id: u32,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Product")]
    product: &'a str,
    #[serde(rename = "Region")]
    region: &'a str,
    #[serde(rename = "Quantity")]
    quantity: u32,
    #[serde(rename = "Unit Price")]
    unit_price: f64,
    #[serde(rename = "Total Sale")]
    total_sale: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);

    let catalogue: [(&str, &[(&str, f64)]); 5] = [
        ("Electronics", &[("Headphones", 2499.0), ("Smartwatch", 5999.0), ("Power Bank", 1299.0)]),
        ("Clothing", &[("T-Shirt", 499.0), ("Jeans", 1599.0), ("Jacket", 2999.0)]),
        ("Home & Kitchen", &[("Mixer", 3499.0), ("Cookware Set", 2199.0)]),
        ("Books", &[("Novel", 399.0), ("Cookbook", 649.0)]),
        ("Beauty", &[("Face Wash", 249.0), ("Perfume", 1899.0)]),
    ];
    let regions = ["North", "South", "East", "West", "Central"];

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or_else(|| anyhow::anyhow!("bad start date"))?;
    let days = 90;
    let orders = 1000;

    let output_path = Path::new("data/ecommerce_sales_data.csv");
    if let Some(dir) = output_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(output_path)?;

    for order_id in 1..=orders {
        let (category, products) = *rng.pick(&catalogue);
        let &(product, base_price) = rng.pick(products);
        // ±15% price jitter, rounded to paise
        let unit_price = (base_price * (0.85 + 0.3 * rng.next_f64()) * 100.0).round() / 100.0;
        let quantity = 1 + rng.below(4) as u32;
        let date = start + Duration::days(rng.below(days) as i64);

        writer.serialize(SaleRow {
            order_id,
            date: date.format("%Y-%m-%d").to_string(),
            category,
            product,
            region: *rng.pick(&regions),
            quantity,
            unit_price,
            total_sale: (unit_price * quantity as f64 * 100.0).round() / 100.0,
        })?;
    }
    writer.flush()?;

    println!("Wrote {orders} sales over {days} days to {}", output_path.display());
    Ok(())
}
