//! Static content pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;
use crate::models::PageContext;

/// A value the company stands by.
pub struct Value {
    pub title: &'static str,
    pub body: &'static str,
}

static VALUES: [Value; 4] = [
    Value {
        title: "Transparency",
        body: "We provide detailed information about the environmental impact of every product, empowering you to make informed decisions.",
    },
    Value {
        title: "Circularity",
        body: "We promote a circular economy by prioritizing products made from recycled materials or those designed for multiple lifecycles.",
    },
    Value {
        title: "Community",
        body: "We're building a community of conscious consumers who understand that everyday choices have a global impact.",
    },
    Value {
        title: "Responsibility",
        body: "We're committed to sustainable practices not just in our products, but in every aspect of our business operations.",
    },
];

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub page: PageContext,
    pub values: &'static [Value],
}

/// Display the about page.
pub async fn about(page: PageContext) -> impl IntoResponse {
    AboutTemplate {
        page,
        values: &VALUES,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn render(cart_count: u32) -> String {
        AboutTemplate {
            page: PageContext {
                user: None,
                cart_count,
            },
            values: &VALUES,
        }
        .render()
        .unwrap()
    }

    #[test]
    fn test_page_chrome_shows_cart_count() {
        let html = render(3);
        assert!(html.contains(r#"<span id="cart-count" class="cart-count">3</span>"#));
        assert!(html.contains("Transparency"));
    }

    #[test]
    fn test_empty_cart_badge_is_marked() {
        let html = render(0);
        assert!(html.contains(r#"class="cart-count is-empty">0</span>"#));
    }
}
