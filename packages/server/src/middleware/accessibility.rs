use axum::{
    extract::{Query, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::models::accessibility::{Accessibility, AccessibilityParams, Contrast, FontSize};

pub const FONT_SIZE_COOKIE: &str = "font_size";
pub const CONTRAST_COOKIE: &str = "contrast";
pub const DYSLEXIA_COOKIE: &str = "dyslexia";

/// Resolve the caller's accessibility preferences for this request.
///
/// Stored preferences come from the cookie jar; `font_size`, `contrast` and
/// `dyslexia` query parameters override them and are written back so later
/// requests keep them. The result is inserted into the request extensions
/// for the `Accessibility` extractor.
pub async fn track_preferences(jar: CookieJar, mut req: Request, next: Next) -> Response {
    let params = Query::<AccessibilityParams>::try_from_uri(req.uri())
        .map(|Query(p)| p)
        .unwrap_or_default();

    let (prefs, changed) = stored_preferences(&jar).apply(&params);
    req.extensions_mut().insert(prefs);

    let response = next.run(req).await;
    if !changed {
        return response;
    }

    tracing::debug!(
        font_size = prefs.font_size.as_str(),
        contrast = prefs.contrast.as_str(),
        dyslexia = prefs.dyslexia,
        "Persisting accessibility preferences"
    );
    let jar = jar
        .add(preference_cookie(FONT_SIZE_COOKIE, prefs.font_size.as_str()))
        .add(preference_cookie(CONTRAST_COOKIE, prefs.contrast.as_str()))
        .add(preference_cookie(
            DYSLEXIA_COOKIE,
            if prefs.dyslexia { "true" } else { "false" },
        ));
    (jar, response).into_response()
}

fn stored_preferences(jar: &CookieJar) -> Accessibility {
    Accessibility {
        font_size: jar
            .get(FONT_SIZE_COOKIE)
            .and_then(|c| FontSize::parse(c.value()))
            .unwrap_or_default(),
        contrast: jar
            .get(CONTRAST_COOKIE)
            .and_then(|c| Contrast::parse(c.value()))
            .unwrap_or_default(),
        dyslexia: jar
            .get(DYSLEXIA_COOKIE)
            .is_some_and(|c| c.value() == "true"),
    }
}

fn preference_cookie(name: &'static str, value: &'static str) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
