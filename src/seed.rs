//! Sample catalog for fresh installations.

use rust_decimal::Decimal;

use crate::AppState;
use crate::error::Result;
use crate::item::{ItemRepository, NewItem};

/// Name, description, price as `(mantissa, scale)`, category and image
/// of every sample item.
const SAMPLE_ITEMS: [(&str, &str, (i64, u32), &str, &str); 6] = [
    (
        "Laptop Pro",
        "High-performance laptop for professionals",
        (1_299_99, 2),
        "Electronics",
        "https://images.unsplash.com/photo-1517336714731-489689fd1ca8?w=300&h=200&fit=crop",
    ),
    (
        "Wireless Headphones",
        "Premium noise-cancelling headphones",
        (299_99, 2),
        "Electronics",
        "https://plus.unsplash.com/premium_photo-1678099940967-73fe30680949?q=80&w=1170&auto=format&fit=crop&ixlib=rb-4.1.0",
    ),
    (
        "Coffee Mug",
        "Ceramic coffee mug with modern design",
        (19_99, 2),
        "Home",
        "https://images.unsplash.com/photo-1650959858546-d09833d5317b?q=80&w=1170&auto=format&fit=crop&ixlib=rb-4.1.0",
    ),
    (
        "Running Shoes",
        "Comfortable running shoes for daily exercise",
        (129_99, 2),
        "Sports",
        "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=300&h=200&fit=crop",
    ),
    (
        "Smartphone",
        "Latest smartphone with advanced features",
        (899_99, 2),
        "Electronics",
        "https://images.unsplash.com/photo-1511707171634-5f897ff02aa9?w=300&h=200&fit=crop",
    ),
    (
        "Backpack",
        "Durable backpack for travel and work",
        (79_99, 2),
        "Fashion",
        "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?q=80&w=1170&auto=format&fit=crop&ixlib=rb-4.1.0",
    ),
];

/// Insert the sample catalog, unless items already exist.
pub async fn run(state: &AppState) -> Result<()> {
    let repository = ItemRepository::new(state.db.postgres.clone());

    if repository.count().await? > 0 {
        return Ok(());
    }

    for (name, description, (mantissa, scale), category, image) in SAMPLE_ITEMS {
        repository
            .insert(&NewItem {
                name: name.to_owned(),
                description: description.to_owned(),
                price: Decimal::new(mantissa, scale),
                category: category.to_owned(),
                image: image.to_owned(),
                in_stock: true,
                stock: 100,
            })
            .await?;
    }

    tracing::info!(items = SAMPLE_ITEMS.len(), "sample catalog inserted");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn sample_prices_have_two_decimal_places() {
        let prices: Vec<Decimal> = SAMPLE_ITEMS
            .iter()
            .map(|(_, _, (mantissa, scale), _, _)| Decimal::new(*mantissa, *scale))
            .collect();

        assert_eq!(prices[0], dec!(1299.99));
        assert_eq!(prices[2], dec!(19.99));
        assert!(prices.iter().all(|price| price.scale() == 2));
    }
}
