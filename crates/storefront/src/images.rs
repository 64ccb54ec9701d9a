//! Product image URLs.
//!
//! Images are served from Unsplash by photo id. Products are matched to a
//! photo by slug, falling back to a generated placeholder.

const UNSPLASH_BASE: &str = "https://images.unsplash.com";
const PLACEHOLDER_BASE: &str = "https://via.placeholder.com/400x400/22c55e/ffffff?text=";

/// Thumbnail edge length used on product cards.
pub const THUMBNAIL_SIZE: u32 = 400;
/// Edge length used on the product detail view.
pub const LARGE_SIZE: u32 = 1200;

/// Flower keys and their Unsplash photo ids.
///
/// Order matters: partial matches take the first key contained in the slug.
const FLOWER_IMAGES: &[(&str, &str)] = &[
    ("red-rose-bouquet", "photo-1518709594023-6eab9bab7b23"),
    ("rose", "photo-1518709594023-6eab9bab7b23"),
    ("sunflower-delight", "photo-1597848212624-e526162ce8e8"),
    ("sunflower", "photo-1597848212624-e526162ce8e8"),
    ("lavender-dreams", "photo-1499002238440-d264edd596ec"),
    ("lavender", "photo-1499002238440-d264edd596ec"),
    ("tulip-paradise", "photo-1490750967868-88aa4486c946"),
    ("tulip", "photo-1490750967868-88aa4486c946"),
    ("white-orchid-elegance", "photo-1520763185298-1b434c919b14"),
    ("orchid", "photo-1520763185298-1b434c919b14"),
    ("daisy-chain", "photo-1463936575829-25148e1db1b8"),
    ("daisy", "photo-1463936575829-25148e1db1b8"),
    ("peony-perfection", "photo-1591886960571-74d43a9d4166"),
    ("peony", "photo-1591886960571-74d43a9d4166"),
    ("hydrangea-haven", "photo-1511916758862-ae8e0235ae87"),
    ("hydrangea", "photo-1511916758862-ae8e0235ae87"),
    ("lily-luxury", "photo-1524386416438-98b9b2d4b433"),
    ("lily", "photo-1524386416438-98b9b2d4b433"),
    ("carnation-celebration", "photo-1562690868-60bbe7293e94"),
    ("carnation", "photo-1562690868-60bbe7293e94"),
    ("gerbera-joy", "photo-1563216991-c5d4b0f0c0f7"),
    ("gerbera", "photo-1563216991-c5d4b0f0c0f7"),
    ("iris-collection", "photo-1490750967868-88aa4486c946"),
    ("iris", "photo-1490750967868-88aa4486c946"),
    ("mixed-spring-bouquet", "photo-1487070183336-b863922373d4"),
    ("mixed", "photo-1487070183336-b863922373d4"),
    ("chrysanthemum-beauty", "photo-1574684891174-df6b02ab38d7"),
    ("chrysanthemum", "photo-1574684891174-df6b02ab38d7"),
    ("ranunculus-romance", "photo-1455659817273-f96807779a8a"),
    ("ranunculus", "photo-1455659817273-f96807779a8a"),
    ("anemone-arrangement", "photo-1455659817273-f96807779a8a"),
    ("anemone", "photo-1455659817273-f96807779a8a"),
    ("babys-breath-bundle", "photo-1563241527-3004b7be0ffd"),
    ("babys-breath", "photo-1563241527-3004b7be0ffd"),
    ("protea-power", "photo-1497276236755-0f85ba99a126"),
    ("protea", "photo-1497276236755-0f85ba99a126"),
    ("sweet-pea-sweetness", "photo-1518709594023-6eab9bab7b23"),
    ("sweet-pea", "photo-1518709594023-6eab9bab7b23"),
    ("calla-lily-class", "photo-1524386416438-98b9b2d4b433"),
    ("calla-lily", "photo-1524386416438-98b9b2d4b433"),
];

/// Image URL for a product slug at the given size.
///
/// Tries an exact key, then the first key contained in the slug, then a
/// placeholder labelled with the slug.
#[must_use]
pub fn product_image_url(slug: &str, width: u32, height: u32) -> String {
    let lowered = slug.to_lowercase();
    let photo = FLOWER_IMAGES
        .iter()
        .find(|(key, _)| *key == slug)
        .or_else(|| FLOWER_IMAGES.iter().find(|(key, _)| lowered.contains(key)))
        .map(|&(_, photo)| photo);

    match photo {
        Some(photo) => {
            format!("{UNSPLASH_BASE}/{photo}?w={width}&h={height}&fit=crop&auto=format")
        }
        None => format!("{PLACEHOLDER_BASE}{}", slug.replace('-', "+")),
    }
}

/// Image URL sized for product cards.
#[must_use]
pub fn thumbnail_url(slug: &str) -> String {
    product_image_url(slug, THUMBNAIL_SIZE, THUMBNAIL_SIZE)
}

/// Image URL sized for the product detail view.
#[must_use]
pub fn large_image_url(slug: &str) -> String {
    product_image_url(slug, LARGE_SIZE, LARGE_SIZE)
}

/// Placeholder URL labelled with a product name.
#[must_use]
pub fn fallback_image_url(name: &str) -> String {
    let label = name.split_whitespace().collect::<Vec<_>>().join("+");
    format!("{PLACEHOLDER_BASE}{label}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_slug() {
        assert_eq!(
            thumbnail_url("red-rose-bouquet"),
            "https://images.unsplash.com/photo-1518709594023-6eab9bab7b23?w=400&h=400&fit=crop&auto=format"
        );
    }

    #[test]
    fn test_partial_match() {
        assert_eq!(
            large_image_url("Yellow-Tulip-Basket"),
            "https://images.unsplash.com/photo-1490750967868-88aa4486c946?w=1200&h=1200&fit=crop&auto=format"
        );
    }

    #[test]
    fn test_partial_match_uses_table_order() {
        // Both keys match; "rose" comes before "daisy" in the table
        assert!(thumbnail_url("daisy-and-rose-posy").contains("photo-1518709594023-6eab9bab7b23"));
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(
            product_image_url("cactus-garden", 800, 800),
            "https://via.placeholder.com/400x400/22c55e/ffffff?text=cactus+garden"
        );
    }

    #[test]
    fn test_fallback_image() {
        assert_eq!(
            fallback_image_url("Desert   Bloom Set"),
            "https://via.placeholder.com/400x400/22c55e/ffffff?text=Desert+Bloom+Set"
        );
    }

    #[test]
    fn test_every_bundled_slug_has_an_image() {
        let catalog = crate::catalog::Catalog::bundled().unwrap_or_else(|e| panic!("{e}"));
        for product in catalog.all() {
            assert!(
                thumbnail_url(product.slug.as_str()).starts_with(UNSPLASH_BASE),
                "{}",
                product.slug
            );
        }
    }
}
