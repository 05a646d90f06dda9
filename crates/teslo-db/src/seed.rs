//! # Demo Data
//!
//! A small Teslo merch catalog and two accounts for local development.
//!
//! ```text
//! reset_and_seed(db)
//!   ├── DELETE orders (items cascade), users, products
//!   ├── INSERT 2 users    admin@teslo.com (admin), client@teslo.com (client)
//!   └── INSERT catalog    includes one sold-out and several low-stock items
//! ```
//!
//! Both accounts use the password [`DEMO_PASSWORD`].

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::DbResult;
use crate::password::hash_password;
use crate::pool::Database;
use teslo_core::{Gender, Product, ProductType, Role, Size, User};

/// Password of the seeded accounts.
pub const DEMO_PASSWORD: &str = "123456";

/// Counts of what was written by [`reset_and_seed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub products: usize,
}

struct SeedProduct {
    title: &'static str,
    slug: &'static str,
    images: [&'static str; 2],
    price_cents: i64,
    in_stock: i64,
    sizes: &'static [Size],
    tags: &'static [&'static str],
    product_type: ProductType,
    gender: Gender,
}

const CATALOG: &[SeedProduct] = &[
    SeedProduct {
        title: "Men's Chill Crew Neck Sweatshirt",
        slug: "mens_chill_crew_neck_sweatshirt",
        images: ["1740176-00-A_0_2000.jpg", "1740176-00-A_1.jpg"],
        price_cents: 7500,
        in_stock: 7,
        sizes: &[Size::XS, Size::S, Size::M, Size::L, Size::XL, Size::XXL],
        tags: &["sweatshirt"],
        product_type: ProductType::Shirts,
        gender: Gender::Men,
    },
    SeedProduct {
        title: "Men's Quilted Shirt Jacket",
        slug: "men_quilted_shirt_jacket",
        images: ["1740507-00-A_0_2000.jpg", "1740507-00-A_1.jpg"],
        price_cents: 20000,
        in_stock: 5,
        sizes: &[Size::XS, Size::S, Size::M, Size::XL, Size::XXL],
        tags: &["jacket"],
        product_type: ProductType::Shirts,
        gender: Gender::Men,
    },
    SeedProduct {
        title: "Men's Raven Lightweight Zip Up Bomber Jacket",
        slug: "men_raven_lightweight_zip_up_bomber_jacket",
        images: ["1740250-00-A_0_2000.jpg", "1740250-00-A_1.jpg"],
        price_cents: 13000,
        in_stock: 10,
        sizes: &[Size::S, Size::M, Size::L, Size::XL, Size::XXL],
        tags: &["shirt"],
        product_type: ProductType::Shirts,
        gender: Gender::Men,
    },
    SeedProduct {
        title: "Men's Turbine Long Sleeve Tee",
        slug: "men_turbine_long_sleeve_tee",
        images: ["1740280-00-A_0_2000.jpg", "1740280-00-A_1.jpg"],
        price_cents: 4500,
        in_stock: 50,
        sizes: &[Size::XS, Size::S, Size::M, Size::L],
        tags: &["shirt"],
        product_type: ProductType::Shirts,
        gender: Gender::Men,
    },
    SeedProduct {
        title: "Men's 3D Large Wordmark Tee",
        slug: "men_3d_large_wordmark_tee",
        images: ["8764734-00-A_0_2000.jpg", "8764734-00-A_alt.jpg"],
        price_cents: 3500,
        in_stock: 0,
        sizes: &[Size::S, Size::M, Size::L],
        tags: &["shirt"],
        product_type: ProductType::Shirts,
        gender: Gender::Men,
    },
    SeedProduct {
        title: "Cybertruck Owl Tee",
        slug: "cybertruck_owl_tee",
        images: ["7654393-00-A_2_2000.jpg", "7654393-00-A_3.jpg"],
        price_cents: 3500,
        in_stock: 25,
        sizes: &[Size::S, Size::M, Size::L, Size::XL],
        tags: &["shirt"],
        product_type: ProductType::Shirts,
        gender: Gender::Unisex,
    },
    SeedProduct {
        title: "Chill Pullover Hoodie",
        slug: "chill_pullover_hoodie",
        images: ["1740051-00-A_0_2000.jpg", "1740051-00-A_1.jpg"],
        price_cents: 8500,
        in_stock: 3,
        sizes: &[Size::XS, Size::S, Size::M, Size::L, Size::XL, Size::XXL],
        tags: &["hoodie"],
        product_type: ProductType::Hoodies,
        gender: Gender::Unisex,
    },
    SeedProduct {
        title: "Women's Cropped Puffer Jacket",
        slug: "women_cropped_puffer_jacket",
        images: ["1740535-00-A_0_2000.jpg", "1740535-00-A_1.jpg"],
        price_cents: 22500,
        in_stock: 85,
        sizes: &[Size::XS, Size::S, Size::M],
        tags: &["hoodie"],
        product_type: ProductType::Hoodies,
        gender: Gender::Women,
    },
    SeedProduct {
        title: "Women's Modal 3/4 Sleeve Tee",
        slug: "women_modal_3_4_sleeve_tee",
        images: ["1740290-00-A_0_2000.jpg", "1740290-00-A_1.jpg"],
        price_cents: 3500,
        in_stock: 42,
        sizes: &[Size::XS, Size::S, Size::M, Size::L],
        tags: &["shirt"],
        product_type: ProductType::Shirts,
        gender: Gender::Women,
    },
    SeedProduct {
        title: "Kids Cybertruck Long Sleeve Tee",
        slug: "kids_cybertruck_long_sleeve_tee",
        images: ["1742694-00-A_1_2000.jpg", "1742694-00-A_3.jpg"],
        price_cents: 3000,
        in_stock: 10,
        sizes: &[Size::XS, Size::S, Size::M],
        tags: &["shirt"],
        product_type: ProductType::Shirts,
        gender: Gender::Kid,
    },
    SeedProduct {
        title: "Kids Scribble T Logo Tee",
        slug: "kids_scribble_t_logo_tee",
        images: ["8529312-00-A_0_2000.jpg", "8529312-00-A_1.jpg"],
        price_cents: 2500,
        in_stock: 0,
        sizes: &[Size::XS, Size::S, Size::M],
        tags: &["shirt"],
        product_type: ProductType::Shirts,
        gender: Gender::Kid,
    },
    SeedProduct {
        title: "Relaxed T Logo Hat",
        slug: "relaxed_t_logo_hat",
        images: ["1657932-00-A_0_2000.jpg", "1657932-00-A_1.jpg"],
        price_cents: 3000,
        in_stock: 11,
        sizes: &[Size::S, Size::M],
        tags: &["hat"],
        product_type: ProductType::Hats,
        gender: Gender::Unisex,
    },
];

fn demo_products() -> Vec<Product> {
    let now = Utc::now();
    CATALOG
        .iter()
        .map(|p| Product {
            id: Uuid::new_v4().to_string(),
            title: p.title.to_string(),
            description: format!("{}. Designed for fit, comfort and style.", p.title),
            images: p.images.iter().map(|i| i.to_string()).collect(),
            in_stock: p.in_stock,
            price_cents: p.price_cents,
            sizes: p.sizes.to_vec(),
            slug: p.slug.to_string(),
            tags: p.tags.iter().map(|t| t.to_string()).collect(),
            product_type: p.product_type,
            gender: p.gender,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

fn demo_users() -> Vec<User> {
    let now = Utc::now();
    [
        ("Teslo Admin", "admin@teslo.com", Role::Admin),
        ("Teslo Client", "client@teslo.com", Role::Client),
    ]
    .into_iter()
    .map(|(name, email, role)| User {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        created_at: now,
        updated_at: now,
    })
    .collect()
}

/// Wipes orders, users and products, then writes the demo data.
pub async fn reset_and_seed(db: &Database) -> DbResult<SeedReport> {
    let orders = db.orders().delete_all().await?;
    let users = db.users().delete_all().await?;
    let products = db.products().delete_all().await?;
    info!(orders, users, products, "Cleared existing data");

    let password_hash = hash_password(DEMO_PASSWORD)?;
    let seeded_users = demo_users();
    for user in &seeded_users {
        db.users().insert(user, &password_hash).await?;
    }

    let seeded_products = demo_products();
    for product in &seeded_products {
        db.products().insert(product).await?;
    }

    let report = SeedReport {
        users: seeded_users.len(),
        products: seeded_products.len(),
    };
    info!(users = report.users, products = report.products, "Seed complete");
    Ok(report)
}
