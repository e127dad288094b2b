use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::formats::RawItem;

pub const DEFAULT_AVAILABILITY: &str = "In stock";
pub const OUT_OF_STOCK: &str = "Out of stock";
pub const UNTITLED: &str = "Untitled";

/// Ordinal words in lookup order. Matching is by substring, first entry wins.
const RATING_WORDS: [(&str, u8); 5] = [
    ("One", 1),
    ("Two", 2),
    ("Three", 3),
    ("Four", 4),
    ("Five", 5),
];

/// Compiled selectors for a catalog listing page.
#[derive(Debug)]
pub struct ListingParser {
    product: Selector,
    title_link: Selector,
    price: Selector,
    rating: Selector,
    image: Selector,
    in_stock: Selector,
    out_of_stock: Selector,
}

impl ListingParser {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            product: parse_selector("article.product_pod")?,
            title_link: parse_selector("h3 a")?,
            price: parse_selector("p.price_color")?,
            rating: parse_selector("p.star-rating")?,
            image: parse_selector("div.image_container img")?,
            in_stock: parse_selector("p.instock")?,
            out_of_stock: parse_selector("p.outofstock")?,
        })
    }

    /// Pulls one [`RawItem`] out of every product node, in document order.
    ///
    /// Relative links are joined onto `base_url`. An empty result means the
    /// page carried no product nodes at all.
    pub fn extract(&self, html: &str, base_url: &Url) -> Vec<RawItem> {
        let document = Html::parse_document(html);
        document
            .select(&self.product)
            .map(|node| self.extract_item(node, base_url))
            .collect()
    }

    fn extract_item(&self, node: ElementRef<'_>, base_url: &Url) -> RawItem {
        let link = node.select(&self.title_link).next();

        let title = link
            .map(|link| {
                link.value()
                    .attr("title")
                    .filter(|title| !title.trim().is_empty())
                    .map_or_else(|| stripped_text(link), str::to_owned)
            })
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_owned());

        let detail_url = link
            .and_then(|link| link.value().attr("href"))
            .and_then(|href| join_url(base_url, href))
            .unwrap_or_else(|| base_url.to_string());

        let price = node
            .select(&self.price)
            .next()
            .map(|el| {
                let raw = el.text().collect::<String>();
                parse_price(&raw).unwrap_or_else(|| {
                    tracing::debug!(raw = %raw, "price text not numeric; using 0");
                    0.0
                })
            })
            .unwrap_or(0.0);

        let rating = node
            .select(&self.rating)
            .next()
            .map(|el| rating_from_classes(el.value().classes()))
            .unwrap_or(0);

        let image_url = node
            .select(&self.image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| join_url(base_url, src))
            .unwrap_or_default();

        let availability = if let Some(marker) = node.select(&self.in_stock).next() {
            stripped_text(marker)
        } else if node.select(&self.out_of_stock).next().is_some() {
            OUT_OF_STOCK.to_owned()
        } else {
            DEFAULT_AVAILABILITY.to_owned()
        };

        RawItem {
            title,
            detail_url,
            price,
            rating,
            image_url,
            availability,
        }
    }
}

pub(crate) fn parse_selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow::anyhow!("parse css selector {css:?}: {err}"))
}

/// Concatenates the element's text nodes, each trimmed.
pub(crate) fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}

/// Drops every character that is not an ASCII digit or `.` and parses the rest.
///
/// Thousands separators are removed along with currency symbols, so
/// `"$1,234.56"` reads as `1234.56` while `"1.234,56"` reads as `1.23456`.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().ok()
}

/// Maps a star-rating class list to 1..=5, or 0 if no ordinal word is present.
pub fn rating_from_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> u8 {
    let classes = classes.into_iter().collect::<Vec<_>>();
    RATING_WORDS
        .iter()
        .find(|(word, _)| classes.iter().any(|class| class.contains(word)))
        .map(|(_, value)| *value)
        .unwrap_or(0)
}

fn join_url(base_url: &Url, href: &str) -> Option<String> {
    match base_url.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(err) => {
            tracing::debug!(href, ?err, "unresolvable link");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://books.example/").expect("parse base url")
    }

    fn page(products: &str) -> String {
        format!(
            r#"<!doctype html>
<html>
  <head><title>All products | Books to Scrape - Sandbox</title></head>
  <body><ol class="row">{products}</ol></body>
</html>"#
        )
    }

    const FULL_PRODUCT: &str = r#"
<li><article class="product_pod">
  <div class="image_container">
    <a href="catalogue/a-light-in-the-attic_1000/index.html"><img src="media/cache/2c/da/attic.jpg" alt="A Light in the Attic" class="thumbnail"></a>
  </div>
  <p class="star-rating Three"><i class="icon-star"></i></p>
  <h3><a href="catalogue/a-light-in-the-attic_1000/index.html" title="A Light in the Attic">A Light in the ...</a></h3>
  <div class="product_price">
    <p class="price_color">£51.77</p>
    <p class="instock availability">
      <i class="icon-ok"></i>
        In stock
    </p>
  </div>
</article></li>"#;

    #[test]
    fn extracts_every_field_of_a_complete_product() -> anyhow::Result<()> {
        let parser = ListingParser::new()?;
        let items = parser.extract(&page(FULL_PRODUCT), &base());

        assert_eq!(
            items,
            vec![RawItem {
                title: "A Light in the Attic".to_owned(),
                detail_url: "https://books.example/catalogue/a-light-in-the-attic_1000/index.html"
                    .to_owned(),
                price: 51.77,
                rating: 3,
                image_url: "https://books.example/media/cache/2c/da/attic.jpg".to_owned(),
                availability: "In stock".to_owned(),
            }]
        );
        Ok(())
    }

    #[test]
    fn missing_sub_nodes_fall_back_per_field() -> anyhow::Result<()> {
        let parser = ListingParser::new()?;
        let html = page(
            r#"<li><article class="product_pod">
  <h3><a href="bare/index.html">  Bare   Book </a></h3>
</article></li>"#,
        );
        let items = parser.extract(&html, &base());

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.title, "Bare   Book");
        assert_eq!(item.detail_url, "https://books.example/bare/index.html");
        assert_eq!(item.price, 0.0);
        assert_eq!(item.rating, 0);
        assert_eq!(item.image_url, "");
        assert_eq!(item.availability, DEFAULT_AVAILABILITY);
        Ok(())
    }

    #[test]
    fn blank_title_attribute_falls_back_to_link_text() -> anyhow::Result<()> {
        let parser = ListingParser::new()?;
        let html = page(
            r#"<li><article class="product_pod">
  <h3><a href="x.html" title="">Visible Name</a></h3>
</article></li>
<li><article class="product_pod">
  <h3><a href="y.html" title="   "> </a></h3>
</article></li>"#,
        );
        let titles = parser
            .extract(&html, &base())
            .into_iter()
            .map(|item| item.title)
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["Visible Name", UNTITLED]);
        Ok(())
    }

    #[test]
    fn product_without_link_still_yields_an_item() -> anyhow::Result<()> {
        let parser = ListingParser::new()?;
        let html = page(r#"<li><article class="product_pod"><p class="price_color">£3.00</p></article></li>"#);
        let items = parser.extract(&html, &base());

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, UNTITLED);
        assert_eq!(items[0].detail_url, "https://books.example/");
        assert_eq!(items[0].price, 3.0);
        Ok(())
    }

    #[test]
    fn out_of_stock_marker_uses_fixed_label() -> anyhow::Result<()> {
        let parser = ListingParser::new()?;
        let html = page(
            r#"<li><article class="product_pod">
  <h3><a href="x.html" title="X">X</a></h3>
  <p class="outofstock availability">Sold out everywhere</p>
</article></li>"#,
        );
        let items = parser.extract(&html, &base());
        assert_eq!(items[0].availability, OUT_OF_STOCK);
        Ok(())
    }

    #[test]
    fn in_stock_marker_wins_over_out_of_stock() -> anyhow::Result<()> {
        let parser = ListingParser::new()?;
        let html = page(
            r#"<li><article class="product_pod">
  <h3><a href="x.html" title="X">X</a></h3>
  <p class="instock">In stock (7 available)</p>
  <p class="outofstock">Out</p>
</article></li>"#,
        );
        let items = parser.extract(&html, &base());
        assert_eq!(items[0].availability, "In stock (7 available)");
        Ok(())
    }

    #[test]
    fn page_without_products_is_empty() -> anyhow::Result<()> {
        let parser = ListingParser::new()?;
        assert!(parser.extract(&page(""), &base()).is_empty());
        Ok(())
    }

    #[test]
    fn keeps_document_order() -> anyhow::Result<()> {
        let parser = ListingParser::new()?;
        let html = page(
            r#"<article class="product_pod"><h3><a href="b.html" title="B">B</a></h3></article>
<article class="product_pod"><h3><a href="a.html" title="A">A</a></h3></article>"#,
        );
        let titles = parser
            .extract(&html, &base())
            .into_iter()
            .map(|item| item.title)
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["B", "A"]);
        Ok(())
    }

    #[test]
    fn price_strips_everything_but_digits_and_dots() {
        assert_eq!(parse_price("£51.77"), Some(51.77));
        assert_eq!(parse_price("Â£51.77"), Some(51.77));
        assert_eq!(parse_price("$1,234.56"), Some(1234.56));
        assert_eq!(parse_price("1.234,56 €"), Some(1.23456));
        assert_eq!(parse_price("free"), None);
        assert_eq!(parse_price("1.2.3"), None);
    }

    #[test]
    fn rating_uses_table_order_and_substring_match() {
        assert_eq!(rating_from_classes(["star-rating", "Three"]), 3);
        assert_eq!(rating_from_classes(["star-rating", "Five"]), 5);
        assert_eq!(rating_from_classes(["star-rating"]), 0);
        assert_eq!(rating_from_classes(["star-rating", "three"]), 0);
        assert_eq!(rating_from_classes(["rating-Four-stars"]), 4);
        // "One" is checked before "Two" regardless of class position.
        assert_eq!(rating_from_classes(["Two", "One"]), 1);
        assert_eq!(rating_from_classes(std::iter::empty()), 0);
    }
}
