//! Device-code sign-in through the website
//!
//! The service only issues tokens through the device-code flow, which a
//! human normally approves in a browser. [`AuthFlow`] performs that approval
//! with plain HTTP requests, in a fixed order:
//!
//! 1. request device codes from the API
//! 2. browse the sign-in page and scrape its CSRF token
//! 3. submit credentials (the session cookie lands in the jar)
//! 4. browse the activation page and scrape a fresh token
//! 5. submit the user code, scraping the token of the authorize form
//! 6. confirm the authorization, scraping the user's handle
//! 7. exchange the device code for an access token
//!
//! Each step consumes what the previous one scraped. A failure at any step
//! aborts hydration with an error naming that step.

use super::{RequestEngine, RequestSpec, Session, engine::decode_json, scrape_attribute};
use crate::{
    Error, Result,
    config::Settings,
    types::{AuthCodes, AuthCodesBody, AuthTokens, AuthTokensBody},
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::fmt;
use tracing::{debug, info};

pub(crate) const PATH_AUTH_CODES: &str = "/oauth/device/code";
pub(crate) const PATH_AUTH_TOKENS: &str = "/oauth/device/token";
pub(crate) const PATH_SIGN_IN: &str = "/auth/signin";
pub(crate) const PATH_ACTIVATE: &str = "/activate";
pub(crate) const PATH_ACTIVATE_AUTHORIZE: &str = "/activate/authorize";

const FORM_KEY_AUTHENTICITY_TOKEN: &str = "authenticity_token";

const SELECTOR_SIGN_IN: &str = "#new_user > input[name=authenticity_token]";
const SELECTOR_ACTIVATE: &str =
    "#auth-form-wrapper > form.form-signin > input[name=authenticity_token]";
const SELECTOR_AUTHORIZE: &str = "#auth-form-wrapper > div.form-signin.less-top > div > form:nth-child(1) > input[name=authenticity_token]:nth-child(1)";
const SELECTOR_USER_AVATAR: &str = "#desktop-user-avatar";

/// The steps of the sign-in sequence, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStep {
    RequestDeviceCodes,
    BrowseSignIn,
    SubmitSignIn,
    BrowseActivate,
    SubmitActivate,
    SubmitAuthorize,
    ExchangeToken,
}

impl AuthStep {
    pub const SEQUENCE: [AuthStep; 7] = [
        AuthStep::RequestDeviceCodes,
        AuthStep::BrowseSignIn,
        AuthStep::SubmitSignIn,
        AuthStep::BrowseActivate,
        AuthStep::SubmitActivate,
        AuthStep::SubmitAuthorize,
        AuthStep::ExchangeToken,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AuthStep::RequestDeviceCodes => "request device codes",
            AuthStep::BrowseSignIn => "browse sign in",
            AuthStep::SubmitSignIn => "submit sign in",
            AuthStep::BrowseActivate => "browse activate",
            AuthStep::SubmitActivate => "submit activate",
            AuthStep::SubmitAuthorize => "submit authorize",
            AuthStep::ExchangeToken => "exchange token",
        }
    }

    fn wrap(self) -> impl FnOnce(Error) -> Error {
        move |e| Error::hydration(self.name(), e)
    }
}

impl fmt::Display for AuthStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// CSRF token scraped from a form
///
/// Each page issues its own token; a token is moved into the submit that
/// follows it and cannot be reused.
#[derive(Debug, PartialEq, Eq)]
pub struct AuthenticityToken(String);

impl AuthenticityToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn scrape(html: &str, step: AuthStep, selector: &str) -> Result<Self> {
        scrape_attribute(html, step.name(), selector, "value").map(Self)
    }
}

/// Driver for the sign-in sequence of one session
#[derive(Debug)]
pub struct AuthFlow<'a> {
    engine: &'a RequestEngine,
    settings: &'a Settings,
}

impl<'a> AuthFlow<'a> {
    pub fn new(engine: &'a RequestEngine, settings: &'a Settings) -> Self {
        Self { engine, settings }
    }

    fn api_url(&self) -> &str {
        &self.settings.network.api_base_url
    }

    fn browser_url(&self) -> &str {
        &self.settings.network.browser_base_url
    }

    /// Run every step in order and store the token and username on `session`
    pub async fn run(&self, session: &Session) -> Result<()> {
        info!("Signing in to trakt as {}", self.settings.trakt.email);

        let codes = self
            .request_device_codes()
            .await
            .map_err(AuthStep::RequestDeviceCodes.wrap())?;
        let token = self
            .browse_sign_in()
            .await
            .map_err(AuthStep::BrowseSignIn.wrap())?;
        self.submit_sign_in(token)
            .await
            .map_err(AuthStep::SubmitSignIn.wrap())?;
        let token = self
            .browse_activate()
            .await
            .map_err(AuthStep::BrowseActivate.wrap())?;
        let token = self
            .submit_activate(&codes.user_code, token)
            .await
            .map_err(AuthStep::SubmitActivate.wrap())?;
        let username = self
            .submit_authorize(token)
            .await
            .map_err(AuthStep::SubmitAuthorize.wrap())?;
        let tokens = self
            .exchange_token(&codes.device_code)
            .await
            .map_err(AuthStep::ExchangeToken.wrap())?;

        session.set_username(username.as_str())?;
        session.set_access_token(tokens.access_token)?;
        info!("Signed in to trakt as user {}", username);
        Ok(())
    }

    /// Step 1: obtain a device code and the user code to approve
    pub async fn request_device_codes(&self) -> Result<AuthCodes> {
        let spec = RequestSpec::post(self.api_url(), PATH_AUTH_CODES)
            .headers(self.client_headers()?)
            .json(&AuthCodesBody {
                client_id: self.settings.trakt.client_id.clone(),
            })?;
        let response = self.engine.execute(spec).await?;
        let codes: AuthCodes = decode_json(response, "trakt auth codes").await?;
        debug!(user_code = %codes.user_code, "received device codes");
        Ok(codes)
    }

    /// Step 2: load the sign-in form
    pub async fn browse_sign_in(&self) -> Result<AuthenticityToken> {
        let html = self
            .browse(RequestSpec::get(self.browser_url(), PATH_SIGN_IN))
            .await?;
        AuthenticityToken::scrape(&html, AuthStep::BrowseSignIn, SELECTOR_SIGN_IN)
    }

    /// Step 3: post the credentials; the response's cookies stay in the jar
    pub async fn submit_sign_in(&self, token: AuthenticityToken) -> Result<()> {
        let trakt = &self.settings.trakt;
        let spec = RequestSpec::post(self.browser_url(), PATH_SIGN_IN).form(&[
            (FORM_KEY_AUTHENTICITY_TOKEN, token.as_str()),
            ("user[login]", trakt.email.as_str()),
            ("user[password]", trakt.password.as_str()),
            ("user[remember_me]", "1"),
        ]);
        self.engine.execute(spec).await?;
        Ok(())
    }

    /// Step 4: load the device activation form
    pub async fn browse_activate(&self) -> Result<AuthenticityToken> {
        let html = self
            .browse(RequestSpec::get(self.browser_url(), PATH_ACTIVATE))
            .await?;
        AuthenticityToken::scrape(&html, AuthStep::BrowseActivate, SELECTOR_ACTIVATE)
    }

    /// Step 5: submit the user code; the reply carries the authorize form
    pub async fn submit_activate(
        &self,
        user_code: &str,
        token: AuthenticityToken,
    ) -> Result<AuthenticityToken> {
        let spec = RequestSpec::post(self.browser_url(), PATH_ACTIVATE).form(&[
            (FORM_KEY_AUTHENTICITY_TOKEN, token.as_str()),
            ("code", user_code),
            ("commit", "Continue"),
        ]);
        let html = self.browse(spec).await?;
        AuthenticityToken::scrape(&html, AuthStep::SubmitActivate, SELECTOR_AUTHORIZE)
    }

    /// Step 6: allow the app; returns the handle of the signed-in user
    pub async fn submit_authorize(&self, token: AuthenticityToken) -> Result<String> {
        let spec = RequestSpec::post(self.browser_url(), PATH_ACTIVATE_AUTHORIZE).form(&[
            (FORM_KEY_AUTHENTICITY_TOKEN, token.as_str()),
            ("commit", "Yes"),
        ]);
        let html = self.browse(spec).await?;
        let href = scrape_attribute(
            &html,
            AuthStep::SubmitAuthorize.name(),
            SELECTOR_USER_AVATAR,
            "href",
        )?;
        username_from_href(&href)
    }

    /// Step 7: trade the approved device code for an access token
    pub async fn exchange_token(&self, device_code: &str) -> Result<AuthTokens> {
        let trakt = &self.settings.trakt;
        let spec = RequestSpec::post(self.api_url(), PATH_AUTH_TOKENS).json(&AuthTokensBody {
            code: device_code.to_string(),
            client_id: trakt.client_id.clone(),
            client_secret: trakt.client_secret.clone(),
        })?;
        let response = self.engine.execute(spec).await?;
        decode_json(response, "trakt auth tokens").await
    }

    async fn browse(&self, spec: RequestSpec) -> Result<String> {
        let response = self.engine.execute(spec).await?;
        Ok(response.text().await?)
    }

    fn client_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("trakt-api-version"),
            HeaderValue::from_static("2"),
        );
        headers.insert(
            HeaderName::from_static("trakt-api-key"),
            HeaderValue::from_str(&self.settings.trakt.client_id)
                .map_err(|e| Error::config(format!("invalid client id header: {}", e)))?,
        );
        Ok(headers)
    }
}

/// The avatar link is `/users/<handle>`: exactly three `/`-separated segments
fn username_from_href(href: &str) -> Result<String> {
    let pieces: Vec<&str> = href.split('/').collect();
    match pieces.as_slice() {
        [_, _, handle] if !handle.is_empty() => Ok((*handle).to_string()),
        _ => Err(Error::Username {
            href: href.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGN_IN_PAGE: &str = include_str!("../../tests/fixtures/signin.html");
    const ACTIVATE_PAGE: &str = include_str!("../../tests/fixtures/activate.html");
    const AUTHORIZE_PAGE: &str = include_str!("../../tests/fixtures/authorize.html");
    const AUTHORIZED_PAGE: &str = include_str!("../../tests/fixtures/authorized.html");

    #[test]
    fn test_sign_in_token_selector() {
        let token =
            AuthenticityToken::scrape(SIGN_IN_PAGE, AuthStep::BrowseSignIn, SELECTOR_SIGN_IN)
                .unwrap();
        assert_eq!(token.as_str(), "signin-token");
    }

    #[test]
    fn test_activate_token_selector() {
        let token =
            AuthenticityToken::scrape(ACTIVATE_PAGE, AuthStep::BrowseActivate, SELECTOR_ACTIVATE)
                .unwrap();
        assert_eq!(token.as_str(), "activate-token");
    }

    #[test]
    fn test_authorize_token_selector_picks_first_form() {
        let token = AuthenticityToken::scrape(
            AUTHORIZE_PAGE,
            AuthStep::SubmitActivate,
            SELECTOR_AUTHORIZE,
        )
        .unwrap();
        assert_eq!(token.as_str(), "authorize-token");
    }

    #[test]
    fn test_avatar_href_selector() {
        let href = scrape_attribute(AUTHORIZED_PAGE, "fixture", SELECTOR_USER_AVATAR, "href")
            .unwrap();
        assert_eq!(username_from_href(&href).unwrap(), "sean");
    }

    #[test]
    fn test_selectors_do_not_match_other_pages() {
        // Tokens are page specific: the activate selector finds nothing on the sign-in page
        let err = AuthenticityToken::scrape(SIGN_IN_PAGE, AuthStep::BrowseActivate, SELECTOR_ACTIVATE)
            .unwrap_err();
        assert!(err.to_string().contains("browse activate"));
    }

    #[test]
    fn test_username_requires_three_segments() {
        assert_eq!(username_from_href("/users/justin").unwrap(), "justin");
        for href in ["/users/justin/lists", "users/justin", "/justin", "", "/users/"] {
            assert!(
                matches!(username_from_href(href), Err(Error::Username { .. })),
                "href {:?} should be rejected",
                href
            );
        }
    }

    #[test]
    fn test_step_sequence_order() {
        let names: Vec<&str> = AuthStep::SEQUENCE.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "request device codes",
                "browse sign in",
                "submit sign in",
                "browse activate",
                "submit activate",
                "submit authorize",
                "exchange token",
            ]
        );
    }
}
