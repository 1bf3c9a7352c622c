//! Restaurant listing normalization.
//!
//! Upstream records change shape between API versions. Everything the UI
//! draws goes through [`RestaurantListing::from_upstream`] first, which is
//! pure: the same record at the same index always gives the same listing.

use serde::Serialize;
use serde_json::Value;

/// Placeholder images used when a record has no usable image.
pub const FALLBACK_IMAGES: [&str; 10] = [
    "https://images.unsplash.com/photo-1551218808-94e220e084d2?auto=format&fit=crop&w=400&q=80",
    "https://images.unsplash.com/photo-1504674900247-0877df9cc836?auto=format&fit=crop&w=2070&q=80",
    "https://images.unsplash.com/photo-1504754524776-8f4f37790ca0?auto=format&fit=crop&w=2070&q=80",
    "https://images.unsplash.com/photo-1498579809087-ef1e558fd1da?auto=format&fit=crop&w=400&q=80",
    "https://images.unsplash.com/photo-1529042410759-befb1204b468?auto=format&fit=crop&w=400&q=80",
    "https://images.unsplash.com/photo-1540189549336-e6e99c3679fe?auto=format&fit=crop&w=400&q=80",
    "https://images.unsplash.com/photo-1513104890138-7c749659a591?auto=format&fit=crop&w=400&q=80",
    "https://images.unsplash.com/photo-1586190848861-99aa4a171e90?auto=format&fit=crop&w=400&q=80",
    "https://images.unsplash.com/photo-1542367592-8849eb950fd8?auto=format&fit=crop&w=400&q=80",
    "https://images.unsplash.com/photo-1585937421612-70a008356fbe?auto=format&fit=crop&w=400&q=80",
];

pub const UNKNOWN_NAME: &str = "Unknown";
pub const MISSING_ADDRESS: &str = "Address not available";

/// Placeholder image for the record at `index`.
pub fn placeholder_image(index: usize) -> &'static str {
    FALLBACK_IMAGES[index % FALLBACK_IMAGES.len()]
}

/// Trims the url and upgrades `http://` to `https://`. Blank input yields `None`.
pub fn secure_image_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("http://") => {
            Some(format!("https://{}", &trimmed[7..]))
        }
        _ => Some(trimmed.to_string()),
    }
}

/// A restaurant in the shape the UI renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantListing {
    pub id: String,
    pub restaurant_id: Option<String>,
    pub name: String,
    pub image_url: String,
    pub address: String,
    pub short_description: String,
    pub raw: Value,
}

impl RestaurantListing {
    pub fn from_upstream(record: &Value, index: usize) -> Self {
        let restaurant_id = first_id(record, &["restaurant_id", "id"]);
        let id = restaurant_id
            .clone()
            .unwrap_or_else(|| format!("r-{}", index));

        let image_url = pick_image(record)
            .and_then(|url| secure_image_url(&url))
            .unwrap_or_else(|| placeholder_image(index).to_string());

        let name = first_text(record, &["restaurant_name", "name"])
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());

        let address = first_text(record, &["address_complete", "restaurant_address", "address"])
            .filter(|a| a != "null")
            .unwrap_or_else(|| MISSING_ADDRESS.to_string());

        let short_description =
            first_text(record, &["short_description", "description", "about"]).unwrap_or_default();

        Self {
            id,
            restaurant_id,
            name,
            image_url,
            address,
            short_description,
            raw: record.clone(),
        }
    }

    /// A stand-in slide shown when the listing is empty.
    pub fn suggested(index: usize) -> Self {
        Self {
            id: format!("fallback-{}", index),
            restaurant_id: None,
            name: "Suggested".to_string(),
            image_url: placeholder_image(index).to_string(),
            address: "Connaught Place".to_string(),
            short_description: String::new(),
            raw: Value::Null,
        }
    }
}

/// Normalizes a whole upstream list, indexing by position.
pub fn normalize_listings(records: &[Value]) -> Vec<RestaurantListing> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| RestaurantListing::from_upstream(r, i))
        .collect()
}

/// Pulls the record array out of either `{data:{results:[..]}}` or
/// `{results:[..]}`. Anything else is an empty list.
pub fn extract_results(body: &Value) -> &[Value] {
    body.pointer("/data/results")
        .or_else(|| body.get("results"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn pick_image(record: &Value) -> Option<String> {
    for key in ["logo", "cover_image", "image"] {
        if let Some(url) = non_empty_str(record.get(key)) {
            return Some(url);
        }
    }

    let first = record.get("images")?.as_array()?.first()?;
    match first {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => {
            non_empty_str(first.get("url")).or_else(|| non_empty_str(first.get("secure_url")))
        }
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn first_text(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| non_empty_str(record.get(*k)))
}

fn first_id(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match record.get(*k)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insecure_logo_is_upgraded() {
        let listing = RestaurantListing::from_upstream(&json!({"logo": "http://x/y.jpg"}), 0);
        assert_eq!(listing.image_url, "https://x/y.jpg");
    }

    #[test]
    fn test_image_priority_order() {
        let record = json!({
            "cover_image": "https://cdn/cover.jpg",
            "image": "https://cdn/image.jpg",
            "images": ["https://cdn/first.jpg"],
        });
        let listing = RestaurantListing::from_upstream(&record, 0);
        assert_eq!(listing.image_url, "https://cdn/cover.jpg");

        let record = json!({"logo": "", "image": "https://cdn/image.jpg"});
        let listing = RestaurantListing::from_upstream(&record, 0);
        assert_eq!(listing.image_url, "https://cdn/image.jpg");
    }

    #[test]
    fn test_images_array_accepts_strings_and_objects() {
        let listing =
            RestaurantListing::from_upstream(&json!({"images": ["http://cdn/a.jpg"]}), 0);
        assert_eq!(listing.image_url, "https://cdn/a.jpg");

        let listing =
            RestaurantListing::from_upstream(&json!({"images": [{"url": "https://cdn/b.jpg"}]}), 0);
        assert_eq!(listing.image_url, "https://cdn/b.jpg");

        let listing = RestaurantListing::from_upstream(
            &json!({"images": [{"secure_url": "https://cdn/c.jpg"}]}),
            0,
        );
        assert_eq!(listing.image_url, "https://cdn/c.jpg");
    }

    #[test]
    fn test_missing_image_uses_rotating_placeholder() {
        for index in [0, 3, 9, 10, 23] {
            let listing = RestaurantListing::from_upstream(&json!({"name": "x"}), index);
            assert_eq!(listing.image_url, FALLBACK_IMAGES[index % 10]);
        }

        let listing = RestaurantListing::from_upstream(&json!({"images": []}), 4);
        assert_eq!(listing.image_url, FALLBACK_IMAGES[4]);
    }

    #[test]
    fn test_missing_name_and_address_defaults() {
        let listing = RestaurantListing::from_upstream(&json!({}), 0);
        assert_eq!(listing.name, "Unknown");
        assert_eq!(listing.address, "Address not available");
        assert_eq!(listing.short_description, "");
    }

    #[test]
    fn test_literal_null_address_is_missing() {
        let listing = RestaurantListing::from_upstream(&json!({"address_complete": "null"}), 0);
        assert_eq!(listing.address, "Address not available");

        let listing = RestaurantListing::from_upstream(
            &json!({"restaurant_address": "12 Janpath", "address": "ignored"}),
            0,
        );
        assert_eq!(listing.address, "12 Janpath");
    }

    #[test]
    fn test_name_and_description_fallbacks() {
        let record = json!({"restaurant_name": "Haldiram's", "name": "other", "about": "Snacks"});
        let listing = RestaurantListing::from_upstream(&record, 0);
        assert_eq!(listing.name, "Haldiram's");
        assert_eq!(listing.short_description, "Snacks");
    }

    #[test]
    fn test_id_synthesis() {
        let listing = RestaurantListing::from_upstream(&json!({"restaurant_id": "abc"}), 7);
        assert_eq!(listing.id, "abc");
        assert_eq!(listing.restaurant_id.as_deref(), Some("abc"));

        let listing = RestaurantListing::from_upstream(&json!({"id": 42}), 7);
        assert_eq!(listing.id, "42");

        let listing = RestaurantListing::from_upstream(&json!({}), 7);
        assert_eq!(listing.id, "r-7");
        assert_eq!(listing.restaurant_id, None);
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let record = json!({"name": "Bikanervala", "images": [{"url": "http://cdn/x.png"}]});
        assert_eq!(
            RestaurantListing::from_upstream(&record, 3),
            RestaurantListing::from_upstream(&record, 3)
        );
    }

    #[test]
    fn test_extract_results_shapes() {
        let nested = json!({"data": {"results": [{"id": 1}, {"id": 2}]}});
        assert_eq!(extract_results(&nested).len(), 2);

        let flat = json!({"results": [{"id": 1}]});
        assert_eq!(extract_results(&flat).len(), 1);

        assert!(extract_results(&json!({"data": {}})).is_empty());
        assert!(extract_results(&json!({"results": "nope"})).is_empty());
    }

    #[test]
    fn test_normalize_listings_uses_position() {
        let listings = normalize_listings(&[json!({}), json!({})]);
        assert_eq!(listings[0].id, "r-0");
        assert_eq!(listings[1].id, "r-1");
        assert_eq!(listings[1].image_url, FALLBACK_IMAGES[1]);
    }

    #[test]
    fn test_secure_image_url() {
        assert_eq!(secure_image_url("  "), None);
        assert_eq!(secure_image_url(" HTTP://a/b ").as_deref(), Some("https://a/b"));
        assert_eq!(secure_image_url("https://a/b").as_deref(), Some("https://a/b"));
    }
}
