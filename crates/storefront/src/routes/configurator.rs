//! Configurator route handlers.
//!
//! Every handler targets one mount created by `GET /products/{handle}` and
//! answers with HTMX fragments. The mount's mutex is held for the whole event
//! so the derived state rendered is the state the event produced.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::HeaderValue,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use drape_core::configurator::{PRICE_PLACEHOLDER, PriceSummary};
use drape_core::transition::{FADE_IN, FADE_OUT};
use drape_core::{Configurator, ImageTransition, Notice, NoticeLog};

use crate::config::DisplayOptions;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::mounts::SharedConfigurator;
use crate::state::AppState;

/// Summary block below the selectors: panels, price and the action button.
#[derive(Clone)]
pub struct SummaryView {
    pub show_fabric_panels: bool,
    pub fabric_panels: u32,
    pub price: Option<String>,
    pub placeholder: &'static str,
    pub button_label: String,
    pub can_add: bool,
}

impl SummaryView {
    #[must_use]
    pub fn new(configurator: &Configurator, display: DisplayOptions) -> Self {
        let price = match configurator.price_summary() {
            PriceSummary::Amount(price) => Some(price.display()),
            PriceSummary::Placeholder => None,
        };
        Self {
            show_fabric_panels: display.show_fabric_panels && configurator.fabric_panels() > 0,
            fabric_panels: configurator.fabric_panels(),
            price,
            placeholder: PRICE_PLACEHOLDER,
            button_label: configurator.button_label(),
            can_add: configurator.can_add_to_cart(),
        }
    }
}

/// Preview image.
#[derive(Clone)]
pub struct ImageView {
    pub url: Option<&'static str>,
    pub alt: String,
}

impl ImageView {
    #[must_use]
    pub fn new(image: &ImageTransition, title: &str) -> Self {
        Self {
            url: image.shown().map(|asset| asset.url),
            alt: title.to_string(),
        }
    }
}

/// Summary fragment, swapped in place.
#[derive(Template, WebTemplate)]
#[template(path = "partials/configurator_summary.html")]
pub struct SummaryTemplate {
    pub mount: Uuid,
    pub summary: SummaryView,
    pub oob: bool,
}

/// Width change response: the image is the main target, the summary rides
/// along out of band.
#[derive(Template, WebTemplate)]
#[template(path = "partials/width_changed.html")]
pub struct WidthChangedTemplate {
    pub mount: Uuid,
    pub image: ImageView,
    pub summary: SummaryView,
    pub oob: bool,
}

/// Toast fragment appended to the page's toast region.
#[derive(Template, WebTemplate)]
#[template(path = "partials/toast.html")]
pub struct ToastTemplate {
    pub notices: Vec<Notice>,
}

/// Width form data.
#[derive(Debug, Deserialize)]
pub struct WidthForm {
    pub width: String,
}

/// Drop form data.
#[derive(Debug, Deserialize)]
pub struct DropForm {
    pub drop: String,
}

/// HTMX swap used when the preview image changes: fade out, swap, fade in.
fn fade_swap() -> String {
    format!(
        "outerHTML swap:{}ms settle:{}ms",
        FADE_OUT.as_millis(),
        FADE_IN.as_millis()
    )
}

async fn mounted(state: &AppState, mount: Uuid) -> Result<SharedConfigurator> {
    state
        .mounts()
        .get(&mount)
        .await
        .ok_or_else(|| AppError::Gone(format!("configurator {mount}")))
}

/// Select a width.
///
/// The preview image is only re-rendered when it actually changes; otherwise
/// the main swap is skipped and only the summary is updated.
#[instrument(skip(state))]
pub async fn select_width(
    State(state): State<AppState>,
    Path(mount): Path<Uuid>,
    Form(form): Form<WidthForm>,
) -> Result<Response> {
    let shared = mounted(&state, mount).await?;
    let mut configurator = shared.lock().await;

    let ticket = configurator.select_width_str(&form.width)?;
    add_breadcrumb("configurator", "Selected width", Some(&[("width", form.width.as_str())]));

    let reswap = if ticket.is_some() {
        configurator.settle_image();
        fade_swap()
    } else {
        "none".to_string()
    };

    let fragment = WidthChangedTemplate {
        mount,
        image: ImageView::new(configurator.image(), &configurator.product().title),
        summary: SummaryView::new(&configurator, state.config().display),
        oob: true,
    };

    let mut response = fragment.into_response();
    if let Ok(value) = HeaderValue::from_str(&reswap) {
        response.headers_mut().insert("hx-reswap", value);
    }
    Ok(response)
}

/// Select a drop.
#[instrument(skip(state))]
pub async fn select_drop(
    State(state): State<AppState>,
    Path(mount): Path<Uuid>,
    Form(form): Form<DropForm>,
) -> Result<SummaryTemplate> {
    let shared = mounted(&state, mount).await?;
    let mut configurator = shared.lock().await;

    configurator.select_drop_str(&form.drop)?;
    add_breadcrumb("configurator", "Selected drop", Some(&[("drop", form.drop.as_str())]));

    Ok(SummaryTemplate {
        mount,
        summary: SummaryView::new(&configurator, state.config().display),
        oob: false,
    })
}

/// Add to cart.
///
/// Renders the resulting notice as a toast and repeats it in an
/// `HX-Trigger: {"show-toast": …}` header for client-side listeners.
#[instrument(skip(state))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(mount): Path<Uuid>,
) -> Result<Response> {
    let shared = mounted(&state, mount).await?;
    let notices = {
        let configurator = shared.lock().await;
        let log = NoticeLog::new();
        let outcome = configurator.add_to_cart(&log);
        tracing::debug!(?outcome, "Add to cart handled");
        log.drain()
    };

    let trigger = match notices.last() {
        Some(notice) => {
            let payload = serde_json::json!({ "show-toast": notice });
            let json = serde_json::to_string(&payload)
                .map_err(|e| AppError::Internal(format!("toast payload: {e}")))?;
            HeaderValue::from_bytes(json.as_bytes())
                .map_err(|e| AppError::Internal(format!("toast header: {e}")))?
        }
        None => HeaderValue::from_static("{}"),
    };

    Ok((
        AppendHeaders([("hx-trigger", trigger)]),
        ToastTemplate { notices },
    )
        .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header::CONTENT_TYPE},
    };
    use drape_core::{ImageAssets, Product};
    use tower::ServiceExt;

    use super::*;
    use crate::catalog::CatalogStore;
    use crate::config::StorefrontConfig;
    use crate::mounts::MountRegistry;

    const TABLE: &[(&str, &str)] = &[
        ("curtain-100cm", "/static/images/curtains/derived/curtain-100cm.aaaa1111.svg"),
        ("curtain-200cm", "/static/images/curtains/derived/curtain-200cm.bbbb2222.svg"),
    ];

    const PRODUCT: &str = r#"{
        "id": "curtain-001",
        "title": "Premium Curtain Collection",
        "description": "Made to measure.",
        "metafields": {
            "pricingTable": [
                { "width": 100, "fabricPanels": 2, "basePrice": 120, "image": "/src/assets/curtain-100cm.jpg" },
                { "width": 200, "fabricPanels": 4, "basePrice": 240, "image": "/src/assets/curtain-200cm.jpg" },
                { "width": 250, "fabricPanels": 5, "basePrice": 300 }
            ],
            "dropOptions": [
                { "value": "137cm", "priceModifier": 0 },
                { "value": "183cm", "priceModifier": 20 }
            ]
        }
    }"#;

    fn test_state(display: DisplayOptions) -> AppState {
        let product = Product::from_json(PRODUCT).unwrap();
        let config = StorefrontConfig {
            display,
            ..StorefrontConfig::default()
        };
        AppState::from_parts(
            config,
            CatalogStore::from_products([product]),
            ImageAssets::new(TABLE),
            MountRegistry::default(),
        )
    }

    async fn mount(state: &AppState) -> Uuid {
        let product = state.catalog().get("curtain-001").unwrap();
        state
            .mounts()
            .mount(Configurator::new(product, *state.assets()))
            .await
    }

    async fn post(state: &AppState, uri: String, body: impl Into<Body>) -> Response {
        crate::routes::routes()
            .with_state(state.clone())
            .oneshot(
                Request::post(uri)
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_fade_swap_uses_transition_delays() {
        assert_eq!(fade_swap(), "outerHTML swap:200ms settle:200ms");
    }

    #[test]
    fn test_summary_view_hides_panels_by_default() {
        let product = Arc::new(Product::from_json(PRODUCT).unwrap());
        let mut configurator = Configurator::new(product, ImageAssets::new(TABLE));
        configurator.select_width(200);
        configurator.select_drop("183cm");

        let hidden = SummaryView::new(&configurator, DisplayOptions::default());
        assert!(!hidden.show_fabric_panels);
        assert_eq!(hidden.price.as_deref(), Some("$260.00"));
        assert_eq!(hidden.button_label, "Add to Cart - $260.00");
        assert!(hidden.can_add);

        let shown = SummaryView::new(
            &configurator,
            DisplayOptions {
                show_fabric_panels: true,
                ..DisplayOptions::default()
            },
        );
        assert!(shown.show_fabric_panels);
        assert_eq!(shown.fabric_panels, 4);
    }

    #[test]
    fn test_summary_view_placeholder_without_selection() {
        let product = Arc::new(Product::from_json(PRODUCT).unwrap());
        let configurator = Configurator::new(product, ImageAssets::new(TABLE));
        let view = SummaryView::new(&configurator, DisplayOptions::default());
        assert!(view.price.is_none());
        assert_eq!(view.button_label, "Add to Cart");
        assert!(!view.can_add);
    }

    #[tokio::test]
    async fn test_width_then_drop_renders_price() {
        let state = test_state(DisplayOptions::default());
        let id = mount(&state).await;

        let response = post(&state, format!("/configurator/{id}/width"), "width=200").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("hx-reswap").unwrap(),
            "outerHTML swap:200ms settle:200ms"
        );
        let html = body_text(response).await;
        assert!(html.contains("curtain-200cm.bbbb2222.svg"));
        assert!(html.contains("hx-swap-oob"));
        assert!(html.contains(PRICE_PLACEHOLDER));

        let response = post(&state, format!("/configurator/{id}/drop"), "drop=183cm").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("$260.00"));
        assert!(html.contains("Add to Cart - $260.00"));
        assert!(!html.contains("Calculated fabric panels"));
    }

    #[tokio::test]
    async fn test_width_without_image_skips_main_swap() {
        let state = test_state(DisplayOptions::default());
        let id = mount(&state).await;

        let response = post(&state, format!("/configurator/{id}/width"), "width=250").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("hx-reswap").unwrap(), "none");
    }

    #[tokio::test]
    async fn test_fabric_panels_shown_when_enabled() {
        let state = test_state(DisplayOptions {
            show_fabric_panels: true,
            show_hidden_variants: false,
        });
        let id = mount(&state).await;

        post(&state, format!("/configurator/{id}/drop"), "drop=137cm").await;
        let response = post(&state, format!("/configurator/{id}/width"), "width=100").await;
        let html = body_text(response).await;
        assert!(html.contains("Calculated fabric panels: 2"));
        assert!(html.contains("$120.00"));
    }

    #[tokio::test]
    async fn test_bad_width_is_rejected() {
        let state = test_state(DisplayOptions::default());
        let id = mount(&state).await;

        let response = post(&state, format!("/configurator/{id}/width"), "width=wide").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let shared = state.mounts().get(&id).await.unwrap();
        assert_eq!(shared.lock().await.selected_width(), None);
    }

    #[tokio::test]
    async fn test_oversized_drop_is_rejected() {
        let state = test_state(DisplayOptions::default());
        let id = mount(&state).await;

        let body = format!("drop={}", "x".repeat(4096));
        let response = post(&state, format!("/configurator/{id}/drop"), body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let shared = state.mounts().get(&id).await.unwrap();
        assert_eq!(shared.lock().await.selected_drop(), None);
    }

    #[tokio::test]
    async fn test_unknown_mount_is_gone() {
        let state = test_state(DisplayOptions::default());
        let id = Uuid::new_v4();

        let response = post(&state, format!("/configurator/{id}/drop"), "drop=137cm").await;
        assert_eq!(response.status(), StatusCode::GONE);
        assert_eq!(response.headers().get("hx-refresh").unwrap(), "true");
    }

    #[tokio::test]
    async fn test_add_to_cart_without_selection_warns() {
        let state = test_state(DisplayOptions::default());
        let id = mount(&state).await;

        let response = post(&state, format!("/configurator/{id}/add-to-cart"), "").await;
        assert_eq!(response.status(), StatusCode::OK);

        let trigger = response.headers().get("hx-trigger").unwrap().to_str().unwrap();
        let payload: serde_json::Value = serde_json::from_str(trigger).unwrap();
        assert_eq!(payload["show-toast"]["title"], "Please select options");
        assert_eq!(payload["show-toast"]["severity"], "destructive");

        let html = body_text(response).await;
        assert!(html.contains("toast-destructive"));
        assert!(!html.contains("Added to cart"));
    }

    #[tokio::test]
    async fn test_add_to_cart_confirms_selection() {
        let state = test_state(DisplayOptions::default());
        let id = mount(&state).await;

        post(&state, format!("/configurator/{id}/width"), "width=200").await;
        post(&state, format!("/configurator/{id}/drop"), "drop=183cm").await;
        let response = post(&state, format!("/configurator/{id}/add-to-cart"), "").await;

        let trigger = response.headers().get("hx-trigger").unwrap().to_str().unwrap();
        let payload: serde_json::Value = serde_json::from_str(trigger).unwrap();
        assert_eq!(payload["show-toast"]["title"], "Added to cart");
        assert_eq!(
            payload["show-toast"]["body"],
            "Premium Curtain Collection - Width: 200cm, Drop: 183cm ($260.00)"
        );
        assert_eq!(payload["show-toast"]["severity"], "default");
    }
}
