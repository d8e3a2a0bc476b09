//! Product page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;
use uuid::Uuid;

use drape_core::Configurator;
use drape_core::catalog::ProductVariant;
use drape_core::configurator::SelectOption;

use super::configurator::{ImageView, SummaryView};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::state::AppState;

/// Variant display data for templates.
#[derive(Clone)]
pub struct VariantView {
    pub id: String,
    pub title: String,
    pub hidden: bool,
}

impl From<&ProductVariant> for VariantView {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            id: variant.id.to_string(),
            title: variant.title.clone(),
            hidden: variant.hidden,
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub mount: Uuid,
    pub title: String,
    pub description: String,
    pub width_options: Vec<SelectOption>,
    pub drop_options: Vec<SelectOption>,
    pub variants: Vec<VariantView>,
    pub image: ImageView,
    pub summary: SummaryView,
    pub oob: bool,
    pub nonce: String,
}

/// Display a product page.
///
/// Each visit mounts a fresh configurator with no selections.
#[instrument(skip(state, nonce))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    CspNonce(nonce): CspNonce,
) -> Result<ProductShowTemplate> {
    let product = state
        .catalog()
        .get(&handle)
        .ok_or_else(|| AppError::NotFound(format!("product {handle}")))?;

    let configurator = Configurator::new(product, *state.assets());
    let display = state.config().display;
    let product = configurator.product();

    let title = product.title.clone();
    let description = product.description.clone();
    let variants = product
        .visible_variants(display.show_hidden_variants)
        .map(VariantView::from)
        .collect();
    let width_options = configurator.width_options();
    let drop_options = configurator.drop_options();
    let image = ImageView::new(configurator.image(), &title);
    let summary = SummaryView::new(&configurator, display);

    let mount = state.mounts().mount(configurator).await;
    add_breadcrumb("configurator", "Mounted", Some(&[("product", handle.as_str())]));

    Ok(ProductShowTemplate {
        mount,
        title,
        description,
        width_options,
        drop_options,
        variants,
        image,
        summary,
        oob: false,
        nonce,
    })
}
