use crate::formats::{CatalogItem, RawItem};

/// Attaches the page category and the next sequence number to a raw item.
pub fn build(raw: RawItem, category: &str, next_id: u32) -> CatalogItem {
    CatalogItem {
        id: next_id,
        title: raw.title,
        price: raw.price,
        rating: raw.rating,
        availability: raw.availability,
        category: category.to_owned(),
        image_url: raw.image_url,
        book_url: raw.detail_url,
    }
}
