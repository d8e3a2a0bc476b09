//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use drape_core::Product;

use crate::filters;
use crate::middleware::CspNonce;
use crate::state::AppState;

/// Product card on the home page.
#[derive(Clone)]
pub struct ProductCardView {
    pub handle: String,
    pub title: String,
    pub description: String,
    pub from_price: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        let from_price = product
            .metafields
            .pricing_table
            .iter()
            .map(|entry| entry.base_price)
            .min()
            .map(|amount| drape_core::Price::new(amount, product.currency_code))
            .filter(drape_core::Price::is_positive)
            .map(|price| price.display());

        Self {
            handle: product.id.to_string(),
            title: product.title.clone(),
            description: product.description.clone(),
            from_price,
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductCardView>,
    pub nonce: String,
}

/// Display the product listing.
#[instrument(skip(state, nonce))]
pub async fn home(State(state): State<AppState>, CspNonce(nonce): CspNonce) -> HomeTemplate {
    HomeTemplate {
        products: state
            .catalog()
            .iter()
            .map(|product| ProductCardView::from(product.as_ref()))
            .collect(),
        nonce,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_card_shows_lowest_base_price() {
        let product = Product::from_json(
            r#"{
                "id": "curtain-001",
                "title": "Premium Curtain Collection",
                "description": "",
                "metafields": {
                    "pricingTable": [
                        { "width": 200, "fabricPanels": 4, "basePrice": 240 },
                        { "width": 100, "fabricPanels": 2, "basePrice": 120 }
                    ],
                    "dropOptions": []
                }
            }"#,
        )
        .unwrap();

        let card = ProductCardView::from(&product);
        assert_eq!(card.handle, "curtain-001");
        assert_eq!(card.from_price.as_deref(), Some("$120.00"));
    }

    #[test]
    fn test_card_without_pricing_has_no_price() {
        let product = Product::from_json(
            r#"{
                "id": "curtain-002",
                "title": "Sample",
                "description": "",
                "metafields": { "pricingTable": [], "dropOptions": [] }
            }"#,
        )
        .unwrap();

        assert!(ProductCardView::from(&product).from_price.is_none());
    }
}
