use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::request::Parts;
use pressgrid_core::locale::parse_accept_language;
use pressgrid_grid::LocalizedRowRenderer;

use crate::state::AppState;

/// Display locale for the request: the first `Accept-Language` tag, or the
/// configured primary locale.
#[derive(Debug, Clone)]
pub struct ActiveLocale(pub String);

impl ActiveLocale {
    /// Row renderer resolving titles under this locale.
    pub fn renderer(&self, state: &AppState) -> LocalizedRowRenderer {
        LocalizedRowRenderer::new(
            self.0.clone(),
            state.grid.settings().primary_locale.clone(),
        )
    }
}

impl FromRequestParts<AppState> for ActiveLocale {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_accept_language)
            .unwrap_or_else(|| state.grid.settings().primary_locale.clone());
        Ok(ActiveLocale(locale))
    }
}
