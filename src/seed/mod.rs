//! Demo data for a fresh store.
//!
//! Clears every campground (and with it every review), then generates
//! campgrounds from the place tables below, all owned by one existing user.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::database::models::{CampgroundFields, Geometry, Image};
use crate::database::{ResourceStore, StoreError};

pub const DEFAULT_COUNT: usize = 50;

/// Inclusive lower and exclusive upper bound of generated prices
pub const PRICE_RANGE: std::ops::Range<u32> = 1000..3000;

struct City {
    prefecture: &'static str,
    city: &'static str,
    longitude: f64,
    latitude: f64,
}

const CITIES: &[City] = &[
    City { prefecture: "北海道", city: "札幌市", longitude: 141.3544, latitude: 43.0621 },
    City { prefecture: "北海道", city: "旭川市", longitude: 142.365, latitude: 43.7706 },
    City { prefecture: "青森県", city: "青森市", longitude: 140.7402, latitude: 40.8246 },
    City { prefecture: "宮城県", city: "仙台市", longitude: 140.8694, latitude: 38.2682 },
    City { prefecture: "長野県", city: "松本市", longitude: 137.972, latitude: 36.238 },
    City { prefecture: "長野県", city: "白馬村", longitude: 137.8619, latitude: 36.6982 },
    City { prefecture: "山梨県", city: "富士吉田市", longitude: 138.8075, latitude: 35.4874 },
    City { prefecture: "静岡県", city: "伊東市", longitude: 139.1019, latitude: 34.9658 },
    City { prefecture: "神奈川県", city: "箱根町", longitude: 139.1069, latitude: 35.2325 },
    City { prefecture: "岐阜県", city: "高山市", longitude: 137.2522, latitude: 36.1461 },
    City { prefecture: "石川県", city: "金沢市", longitude: 136.6256, latitude: 36.5944 },
    City { prefecture: "京都府", city: "京都市", longitude: 135.7681, latitude: 35.0116 },
    City { prefecture: "奈良県", city: "吉野町", longitude: 135.8603, latitude: 34.3961 },
    City { prefecture: "和歌山県", city: "白浜町", longitude: 135.3747, latitude: 33.6781 },
    City { prefecture: "鳥取県", city: "鳥取市", longitude: 134.2383, latitude: 35.5011 },
    City { prefecture: "広島県", city: "尾道市", longitude: 133.205, latitude: 34.4089 },
    City { prefecture: "高知県", city: "四万十市", longitude: 132.9342, latitude: 32.9914 },
    City { prefecture: "福岡県", city: "福岡市", longitude: 130.4017, latitude: 33.5902 },
    City { prefecture: "熊本県", city: "阿蘇市", longitude: 131.1214, latitude: 32.9522 },
    City { prefecture: "鹿児島県", city: "屋久島町", longitude: 130.5283, latitude: 30.3386 },
    City { prefecture: "沖縄県", city: "石垣市", longitude: 124.1558, latitude: 24.3406 },
];

const DESCRIPTORS: &[&str] = &[
    "森の奥", "静かな", "星空の", "湖畔の", "朝霧の", "渓流沿いの", "高原の", "海辺の", "紅葉の", "雪見の",
];

const PLACES: &[&str] = &[
    "キャンプ場", "オートキャンプ場", "グランピング", "野営地", "ロッジ", "ビレッジ", "フィールド", "テントサイト",
];

const DESCRIPTION: &str = "山の中の静かなキャンプ場です。川のせせらぎと鳥の声に囲まれて、ゆっくりとした時間を過ごせます。";

fn sample_images() -> Vec<Image> {
    vec![
        Image {
            url: "https://images.example.com/campgrounds/forest.png".to_string(),
            filename: "campgrounds/forest".to_string(),
        },
        Image {
            url: "https://images.example.com/campgrounds/lake.png".to_string(),
            filename: "campgrounds/lake".to_string(),
        },
    ]
}

/// Build `count` random campgrounds
pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<CampgroundFields> {
    (0..count)
        .map(|_| {
            let city = &CITIES[rng.gen_range(0..CITIES.len())];
            let descriptor = DESCRIPTORS.choose(rng).copied().unwrap_or("静かな");
            let place = PLACES.choose(rng).copied().unwrap_or("キャンプ場");
            CampgroundFields {
                title: format!("{}・{}", descriptor, place),
                price: f64::from(rng.gen_range(PRICE_RANGE)),
                location: format!("{}{}", city.prefecture, city.city),
                description: Some(DESCRIPTION.to_string()),
                geometry: Some(Geometry::point(city.longitude, city.latitude)),
                images: Some(sample_images()),
            }
        })
        .collect()
}

/// Replace every campground with `count` generated ones owned by `author_username`
pub async fn seed(store: &dyn ResourceStore, author_username: &str, count: usize) -> Result<usize, StoreError> {
    let author = store
        .find_user_by_username(author_username)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            entity: "user",
            id: author_username.to_string(),
        })?;

    let cleared = store.delete_all_campgrounds().await?;
    info!("Cleared {} existing campgrounds", cleared);

    let batch = generate(count, &mut rand::thread_rng());
    for fields in batch {
        store.create_campground(fields, &author.id).await?;
    }
    info!("Seeded {} campgrounds for '{}'", count, author.username);
    Ok(count)
}
