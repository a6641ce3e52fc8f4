//! Fixed sample catalog
//!
//! Fifty products spread evenly over ten categories. Seeding replaces the
//! whole catalog, so running it twice leaves the same fifty products.

use lookalike_core::{Catalog, NewProduct, Result};
use tracing::info;

/// Categories covered by the sample catalog
pub const CATEGORIES: [&str; 10] = [
    "animals",
    "fruits",
    "clothes",
    "vehicles",
    "electronics",
    "furniture",
    "books",
    "toys",
    "jewelry",
    "sports",
];

/// A statically defined sample product
#[derive(Debug, Clone, Copy)]
pub struct SeedProduct {
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub image_url: &'static str,
    pub price: f64,
    pub tags: &'static [&'static str],
}

impl SeedProduct {
    pub fn to_new_product(&self) -> NewProduct {
        NewProduct::new(self.name, self.category, self.image_url)
            .with_description(self.description)
            .with_price(self.price)
            .with_tags(self.tags.iter().copied())
    }
}

pub static SAMPLE_PRODUCTS: &[SeedProduct] = &[
    // Animals
    SeedProduct {
        name: "Golden Retriever Puppy",
        category: "animals",
        description: "Adorable golden retriever puppy",
        image_url: "/golden-retriever-puppy.png",
        price: 1200.0,
        tags: &["dog", "pet", "puppy", "golden"],
    },
    SeedProduct {
        name: "Persian Cat",
        category: "animals",
        description: "Beautiful long-haired Persian cat",
        image_url: "/persian-cat-white-fluffy.jpg",
        price: 800.0,
        tags: &["cat", "pet", "persian", "fluffy"],
    },
    SeedProduct {
        name: "Tropical Fish",
        category: "animals",
        description: "Colorful tropical aquarium fish",
        image_url: "/tropical-fish-colorful-aquarium.jpg",
        price: 25.0,
        tags: &["fish", "tropical", "aquarium", "colorful"],
    },
    SeedProduct {
        name: "Parakeet Bird",
        category: "animals",
        description: "Green and yellow parakeet",
        image_url: "/green-parakeet-bird.jpg",
        price: 150.0,
        tags: &["bird", "parakeet", "green", "pet"],
    },
    SeedProduct {
        name: "Hamster",
        category: "animals",
        description: "Cute Syrian hamster",
        image_url: "/syrian-hamster-cute.jpg",
        price: 30.0,
        tags: &["hamster", "small", "pet", "cute"],
    },
    // Fruits
    SeedProduct {
        name: "Red Apples",
        category: "fruits",
        description: "Fresh red delicious apples",
        image_url: "/red-apples-fresh.jpg",
        price: 5.0,
        tags: &["apple", "red", "fresh", "healthy"],
    },
    SeedProduct {
        name: "Bananas",
        category: "fruits",
        description: "Ripe yellow bananas",
        image_url: "/yellow-bananas-ripe.jpg",
        price: 3.0,
        tags: &["banana", "yellow", "ripe", "potassium"],
    },
    SeedProduct {
        name: "Strawberries",
        category: "fruits",
        description: "Sweet fresh strawberries",
        image_url: "/fresh-strawberries-sweet.jpg",
        price: 8.0,
        tags: &["strawberry", "sweet", "red", "berry"],
    },
    SeedProduct {
        name: "Orange Citrus",
        category: "fruits",
        description: "Juicy navel oranges",
        image_url: "/navel-oranges-juicy.jpg",
        price: 6.0,
        tags: &["orange", "citrus", "juicy", "vitamin"],
    },
    SeedProduct {
        name: "Grapes",
        category: "fruits",
        description: "Purple seedless grapes",
        image_url: "/purple-grapes-seedless.jpg",
        price: 7.0,
        tags: &["grapes", "purple", "seedless", "sweet"],
    },
    // Clothes
    SeedProduct {
        name: "Denim Jacket",
        category: "clothes",
        description: "Classic blue denim jacket",
        image_url: "/blue-denim-jacket-classic.jpg",
        price: 89.0,
        tags: &["jacket", "denim", "blue", "casual"],
    },
    SeedProduct {
        name: "White T-Shirt",
        category: "clothes",
        description: "Cotton white t-shirt",
        image_url: "/white-cotton-t-shirt.png",
        price: 25.0,
        tags: &["tshirt", "white", "cotton", "basic"],
    },
    SeedProduct {
        name: "Black Jeans",
        category: "clothes",
        description: "Slim fit black jeans",
        image_url: "/black-jeans-slim-fit.jpg",
        price: 75.0,
        tags: &["jeans", "black", "slim", "denim"],
    },
    SeedProduct {
        name: "Red Dress",
        category: "clothes",
        description: "Elegant red evening dress",
        image_url: "/red-evening-dress-elegant.jpg",
        price: 150.0,
        tags: &["dress", "red", "elegant", "evening"],
    },
    SeedProduct {
        name: "Sneakers",
        category: "clothes",
        description: "White athletic sneakers",
        image_url: "/white-athletic-sneakers.png",
        price: 120.0,
        tags: &["shoes", "sneakers", "white", "athletic"],
    },
    // Vehicles
    SeedProduct {
        name: "Sports Car",
        category: "vehicles",
        description: "Red sports car convertible",
        image_url: "/red-convertible-sports-car.png",
        price: 45000.0,
        tags: &["car", "sports", "red", "convertible"],
    },
    SeedProduct {
        name: "Mountain Bike",
        category: "vehicles",
        description: "Blue mountain bike",
        image_url: "/blue-mountain-bike.jpg",
        price: 800.0,
        tags: &["bike", "mountain", "blue", "cycling"],
    },
    SeedProduct {
        name: "Motorcycle",
        category: "vehicles",
        description: "Black cruiser motorcycle",
        image_url: "/black-cruiser-motorcycle.jpg",
        price: 15000.0,
        tags: &["motorcycle", "black", "cruiser", "bike"],
    },
    SeedProduct {
        name: "Electric Scooter",
        category: "vehicles",
        description: "White electric scooter",
        image_url: "/white-electric-scooter.jpg",
        price: 400.0,
        tags: &["scooter", "electric", "white", "urban"],
    },
    SeedProduct {
        name: "Pickup Truck",
        category: "vehicles",
        description: "Blue pickup truck",
        image_url: "/blue-pickup-truck.png",
        price: 35000.0,
        tags: &["truck", "pickup", "blue", "utility"],
    },
    // Electronics
    SeedProduct {
        name: "Smartphone",
        category: "electronics",
        description: "Latest smartphone with camera",
        image_url: "/modern-smartphone-black.jpg",
        price: 899.0,
        tags: &["phone", "smartphone", "mobile", "technology"],
    },
    SeedProduct {
        name: "Laptop Computer",
        category: "electronics",
        description: "Silver laptop computer",
        image_url: "/silver-laptop-computer.jpg",
        price: 1299.0,
        tags: &["laptop", "computer", "silver", "portable"],
    },
    SeedProduct {
        name: "Headphones",
        category: "electronics",
        description: "Wireless bluetooth headphones",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 199.0,
        tags: &["headphones", "wireless", "bluetooth", "audio"],
    },
    SeedProduct {
        name: "Smart Watch",
        category: "electronics",
        description: "Black fitness smart watch",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 299.0,
        tags: &["watch", "smart", "fitness", "wearable"],
    },
    SeedProduct {
        name: "Gaming Console",
        category: "electronics",
        description: "Modern gaming console",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 499.0,
        tags: &["gaming", "console", "entertainment", "video"],
    },
    // Furniture
    SeedProduct {
        name: "Office Chair",
        category: "furniture",
        description: "Ergonomic black office chair",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 299.0,
        tags: &["chair", "office", "ergonomic", "black"],
    },
    SeedProduct {
        name: "Wooden Table",
        category: "furniture",
        description: "Oak wood dining table",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 599.0,
        tags: &["table", "wood", "dining", "oak"],
    },
    SeedProduct {
        name: "Sofa Couch",
        category: "furniture",
        description: "Gray fabric sofa",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 899.0,
        tags: &["sofa", "couch", "gray", "fabric"],
    },
    SeedProduct {
        name: "Bookshelf",
        category: "furniture",
        description: "Tall wooden bookshelf",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 199.0,
        tags: &["bookshelf", "wood", "storage", "tall"],
    },
    SeedProduct {
        name: "Bed Frame",
        category: "furniture",
        description: "Queen size bed frame",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 399.0,
        tags: &["bed", "frame", "queen", "bedroom"],
    },
    // Books
    SeedProduct {
        name: "Programming Book",
        category: "books",
        description: "JavaScript programming guide",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 45.0,
        tags: &["book", "programming", "javascript", "education"],
    },
    SeedProduct {
        name: "Novel Fiction",
        category: "books",
        description: "Bestselling fiction novel",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 15.0,
        tags: &["book", "novel", "fiction", "reading"],
    },
    SeedProduct {
        name: "Cookbook",
        category: "books",
        description: "Italian cuisine cookbook",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 35.0,
        tags: &["book", "cookbook", "italian", "recipes"],
    },
    SeedProduct {
        name: "Art Book",
        category: "books",
        description: "Modern art photography book",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 55.0,
        tags: &["book", "art", "photography", "modern"],
    },
    SeedProduct {
        name: "History Book",
        category: "books",
        description: "World history textbook",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 65.0,
        tags: &["book", "history", "textbook", "education"],
    },
    // Toys
    SeedProduct {
        name: "Teddy Bear",
        category: "toys",
        description: "Brown plush teddy bear",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 25.0,
        tags: &["toy", "teddy", "bear", "plush"],
    },
    SeedProduct {
        name: "Building Blocks",
        category: "toys",
        description: "Colorful building blocks set",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 35.0,
        tags: &["toy", "blocks", "building", "colorful"],
    },
    SeedProduct {
        name: "Remote Car",
        category: "toys",
        description: "RC racing car toy",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 89.0,
        tags: &["toy", "car", "remote", "racing"],
    },
    SeedProduct {
        name: "Puzzle Game",
        category: "toys",
        description: "1000 piece jigsaw puzzle",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 20.0,
        tags: &["toy", "puzzle", "jigsaw", "game"],
    },
    SeedProduct {
        name: "Action Figure",
        category: "toys",
        description: "Superhero action figure",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 15.0,
        tags: &["toy", "action", "figure", "superhero"],
    },
    // Jewelry
    SeedProduct {
        name: "Gold Necklace",
        category: "jewelry",
        description: "Elegant gold chain necklace",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 299.0,
        tags: &["jewelry", "necklace", "gold", "elegant"],
    },
    SeedProduct {
        name: "Silver Ring",
        category: "jewelry",
        description: "Sterling silver ring",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 89.0,
        tags: &["jewelry", "ring", "silver", "sterling"],
    },
    SeedProduct {
        name: "Diamond Earrings",
        category: "jewelry",
        description: "Diamond stud earrings",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 599.0,
        tags: &["jewelry", "earrings", "diamond", "stud"],
    },
    SeedProduct {
        name: "Pearl Bracelet",
        category: "jewelry",
        description: "White pearl bracelet",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 149.0,
        tags: &["jewelry", "bracelet", "pearl", "white"],
    },
    SeedProduct {
        name: "Watch Luxury",
        category: "jewelry",
        description: "Luxury gold watch",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 1299.0,
        tags: &["jewelry", "watch", "luxury", "gold"],
    },
    // Sports
    SeedProduct {
        name: "Basketball",
        category: "sports",
        description: "Official size basketball",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 35.0,
        tags: &["sports", "basketball", "ball", "orange"],
    },
    SeedProduct {
        name: "Tennis Racket",
        category: "sports",
        description: "Professional tennis racket",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 149.0,
        tags: &["sports", "tennis", "racket", "professional"],
    },
    SeedProduct {
        name: "Soccer Ball",
        category: "sports",
        description: "FIFA approved soccer ball",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 45.0,
        tags: &["sports", "soccer", "football", "FIFA"],
    },
    SeedProduct {
        name: "Golf Clubs",
        category: "sports",
        description: "Set of golf clubs",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 599.0,
        tags: &["sports", "golf", "clubs", "set"],
    },
    SeedProduct {
        name: "Yoga Mat",
        category: "sports",
        description: "Purple yoga exercise mat",
        image_url: "/placeholder.svg?height=300&width=300",
        price: 29.0,
        tags: &["sports", "yoga", "mat", "exercise"],
    },
];

/// The sample catalog as insertable products
pub fn sample_products() -> Vec<NewProduct> {
    SAMPLE_PRODUCTS.iter().map(SeedProduct::to_new_product).collect()
}

/// Replace the contents of `catalog` with the sample products.
///
/// Returns how many products were inserted.
pub fn seed_catalog(catalog: &Catalog) -> Result<usize> {
    let removed = catalog.clear();
    let inserted = catalog.insert_many(sample_products())?.len();
    info!(
        catalog = catalog.name(),
        removed,
        inserted,
        "seeded catalog with sample products"
    );
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookalike_core::{CatalogConfig, CatalogQuery, FilterCondition};

    #[test]
    fn test_sample_catalog_shape() {
        assert_eq!(SAMPLE_PRODUCTS.len(), 50);
        for category in CATEGORIES {
            let count = SAMPLE_PRODUCTS.iter().filter(|p| p.category == category).count();
            assert_eq!(count, 5, "category {}", category);
        }
        assert!(SAMPLE_PRODUCTS.iter().all(|p| !p.tags.is_empty() && !p.image_url.is_empty()));
    }

    #[test]
    fn test_seed_catalog_replaces_contents() {
        let catalog = Catalog::new(CatalogConfig::default());
        catalog.insert(NewProduct::new("Stale", "misc", "/stale.jpg")).unwrap();

        assert_eq!(seed_catalog(&catalog).unwrap(), 50);
        assert_eq!(catalog.count(), 50);
        assert!(catalog.find(&CatalogQuery::new().with_filter(FilterCondition::category("misc"))).is_empty());

        // Idempotent in size
        assert_eq!(seed_catalog(&catalog).unwrap(), 50);
        assert_eq!(catalog.count(), 50);
        assert_eq!(catalog.categories().len(), 10);
    }

    #[test]
    fn test_seeded_products_keep_order() {
        let catalog = Catalog::new(CatalogConfig::default());
        seed_catalog(&catalog).unwrap();

        let first = catalog.find(&CatalogQuery::new().limit(1));
        assert_eq!(first[0].name, SAMPLE_PRODUCTS[0].name);
        assert_eq!(first[0].tags.len(), SAMPLE_PRODUCTS[0].tags.len());
    }
}
