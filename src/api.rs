/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::errors::CloudAppError;
use bytes::Bytes;
use log::{debug, warn};
use num_enum::TryFromPrimitive;
use reqwest::header::{ACCEPT, LOCATION};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// Root CloudApp API
pub const API_ORIGIN: &str = "http://my.cl.ly";

// Public share host, items are looked up here by slug
pub const SHARE_ORIGIN: &str = "http://cl.ly";

const USER_AGENT: &str = concat!("cloudapp-rs/", env!("CARGO_PKG_VERSION"));

const ACCEPT_JSON: &str = "application/json";
const ACCEPT_ANY: &str = "*/*";

/// This can be filter types as well as other parameters the specific API expects
pub type ApiParams<'a> = [(&'a str, String)];

/// Whether a request carries the basic-auth header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Fails with [`CloudAppError::AuthenticationRequired`] when no credentials are set
    Required,
    /// Sends credentials when present
    Optional,
    /// Never sends credentials
    Skip,
}

/// Username/password pair sent as HTTP basic auth.
#[derive(Default, Clone)]
pub struct Creds {
    username: String,
    password: String,
}

impl Creds {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reads `CLOUDAPP_USERNAME` and `CLOUDAPP_PASSWORD` from the environment
    pub fn from_env() -> Option<Self> {
        let username = std::env::var("CLOUDAPP_USERNAME").ok()?;
        let password = std::env::var("CLOUDAPP_PASSWORD").ok()?;
        Some(Self::new(&username, &password))
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Debug for Creds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Creds")
            .field("username", &"xxx")
            .field("password", &"xxx")
            .finish()
    }
}

/// Origins the client talks to.
///
/// Paths are joined onto these, so an origin should not carry a path of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api: String,
    pub share: String,
}

impl Endpoints {
    pub fn new(api: &str, share: &str) -> Self {
        Self {
            api: api.into(),
            share: share.into(),
        }
    }

    /// Full url for a path on the API host
    pub fn api_url(&self, path: &str) -> Result<url::Url, CloudAppError> {
        Ok(url::Url::parse(&self.api)?.join(path)?)
    }

    /// Full url for a path on the share host
    pub fn share_url(&self, path: &str) -> Result<url::Url, CloudAppError> {
        Ok(url::Url::parse(&self.share)?.join(path)?)
    }

    /// True when the url is on the API or share host
    pub fn is_own_origin(&self, url: &url::Url) -> bool {
        [&self.api, &self.share]
            .iter()
            .filter_map(|origin| url::Url::parse(origin).ok())
            .any(|origin| origin.origin() == url.origin())
    }
}

/// Escapes an id (slug, gift card code) for use as a single path segment.
///
/// Empty and dot segments are refused since joining them would walk up the path.
pub(crate) fn path_segment(id: &str) -> Result<String, CloudAppError> {
    match id {
        "" | "." | ".." => Err(CloudAppError::InvalidId(id.to_string())),
        _ => Ok(urlencoding::encode(id).into_owned()),
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(API_ORIGIN, SHARE_ORIGIN)
    }
}

/// Directly communicates with the API.
///
/// Cloning is cheap, the underlying connection pool is shared.
#[derive(Clone)]
pub struct ApiClient {
    creds: Option<Creds>,
    endpoints: Endpoints,
    https_client: reqwest::Client,
}

impl ApiClient {
    /// Creates a new client talking to the given endpoints
    pub fn new(creds: Option<Creds>, endpoints: Endpoints) -> Result<Self, CloudAppError> {
        // Creation responses are 303s onto a different host than the upload target.
        // Redirects are followed by hand so the auth header only goes back to our own hosts.
        let https_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            creds,
            endpoints,
            https_client,
        })
    }

    /// Returns a copy of this client using different credentials
    pub fn with_creds(&self, creds: Option<Creds>) -> Self {
        Self {
            creds,
            endpoints: self.endpoints.clone(),
            https_client: self.https_client.clone(),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn is_authenticated(&self) -> bool {
        self.creds.is_some()
    }

    /// Fails unless credentials have been provided
    pub fn require_auth(&self) -> Result<&Creds, CloudAppError> {
        self.creds
            .as_ref()
            .ok_or(CloudAppError::AuthenticationRequired())
    }

    /// Performs a get request to the CloudApp API
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: Option<&ApiParams<'_>>,
        auth: Auth,
    ) -> Result<T, CloudAppError> {
        let mut req_url = url::Url::parse(url)?;
        if let Some(params) = params.filter(|p| !p.is_empty()) {
            req_url
                .query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        let req = self.request(Method::GET, req_url, auth, ACCEPT_JSON)?;
        Self::parse(self.execute(req).await?).await
    }

    /// Performs a post request with a JSON body
    pub async fn post<B, T>(&self, url: &str, body: &B, auth: Auth) -> Result<T, CloudAppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self
            .request(Method::POST, url::Url::parse(url)?, auth, ACCEPT_JSON)?
            .json(body);
        Self::parse(self.execute(req).await?).await
    }

    /// Performs a post request with a JSON body where the response body is not needed
    pub async fn post_no_content<B>(&self, url: &str, body: &B, auth: Auth) -> Result<(), CloudAppError>
    where
        B: Serialize + ?Sized,
    {
        let req = self
            .request(Method::POST, url::Url::parse(url)?, auth, ACCEPT_JSON)?
            .json(body);
        self.execute(req).await?;
        Ok(())
    }

    /// Performs a multipart/form-data post and returns the resource it redirects to
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: &str,
        form: Form,
    ) -> Result<T, CloudAppError> {
        // The upload target is storage, not the API, so credentials stay off this leg
        let req = self
            .request(Method::POST, url::Url::parse(url)?, Auth::Skip, ACCEPT_JSON)?
            .multipart(form);
        Self::parse(self.execute(req).await?).await
    }

    /// Performs a put request with a JSON body
    pub async fn put<B, T>(&self, url: &str, body: &B) -> Result<T, CloudAppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self
            .request(Method::PUT, url::Url::parse(url)?, Auth::Required, ACCEPT_JSON)?
            .json(body);
        Self::parse(self.execute(req).await?).await
    }

    /// Performs a delete request
    pub async fn delete<T: DeserializeOwned>(&self, url: &str) -> Result<T, CloudAppError> {
        let req = self.request(
            Method::DELETE,
            url::Url::parse(url)?,
            Auth::Required,
            ACCEPT_JSON,
        )?;
        Self::parse(self.execute(req).await?).await
    }

    /// Retrieves raw bytes, used for item content
    pub async fn get_bytes(&self, url: &str) -> Result<Bytes, CloudAppError> {
        let req = self.request(Method::GET, url::Url::parse(url)?, Auth::Optional, ACCEPT_ANY)?;
        Ok(self.execute(req).await?.bytes().await?)
    }

    fn request(
        &self,
        method: Method,
        url: url::Url,
        auth: Auth,
        accept: &str,
    ) -> Result<RequestBuilder, CloudAppError> {
        debug!("{} {}", method, url);
        let req = self.https_client.request(method, url).header(ACCEPT, accept);
        let creds = match auth {
            Auth::Required => Some(self.require_auth()?),
            Auth::Optional => self.creds.as_ref(),
            Auth::Skip => None,
        };
        Ok(match creds {
            Some(creds) => req.basic_auth(&creds.username, Some(&creds.password)),
            None => req,
        })
    }

    // Sends the request and follows at most one redirect: a 303 answering a
    // creation, or any redirect answering a GET. Other redirects mean the change
    // was not applied and surface as errors. Credentials only go along to the
    // API and share hosts.
    async fn execute(&self, req: RequestBuilder) -> Result<Response, CloudAppError> {
        let request = req.build()?;
        let method = request.method().clone();
        let accept = request
            .headers()
            .get(ACCEPT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(ACCEPT_JSON)
            .to_string();

        let resp = self.https_client.execute(request).await?;
        let status = resp.status();
        let follow = status == StatusCode::SEE_OTHER || method == Method::GET;
        if !status.is_redirection() || !follow {
            return Self::check_status(resp).await;
        }

        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(CloudAppError::RedirectLocationMissing())?;
        let next_url = resp.url().join(location)?;
        debug!("Following {} redirect to {}", status.as_u16(), next_url);

        let auth = if self.endpoints.is_own_origin(&next_url) {
            Auth::Optional
        } else {
            Auth::Skip
        };
        let follow = self.request(Method::GET, next_url, auth, &accept)?;
        Self::check_status(follow.send().await?).await
    }

    async fn check_status(resp: Response) -> Result<Response, CloudAppError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let url = resp.url().clone();
        let body = resp.text().await.unwrap_or_default();
        let message = error_message(&body)
            .or_else(|| status.canonical_reason().map(String::from))
            .unwrap_or_default();
        warn!("{} returned {}: {}", url, status.as_u16(), message);
        Err(classify_error(status.as_u16(), message))
    }

    async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T, CloudAppError> {
        let body = resp.bytes().await?;
        if body.is_empty() {
            return Err(CloudAppError::ResponseMissing());
        }
        serde_json::from_slice::<T>(&body).map_err(|err| {
            warn!("Api Malformed Err {:?}", err);
            CloudAppError::Deserialization(err)
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoints", &self.endpoints)
            .field("creds", &self.creds)
            .finish()
    }
}

/// Status codes the CloudApp API is known to answer with
#[derive(Debug, TryFromPrimitive)]
#[repr(u16)]
pub enum ApiStatusCodes {
    // Good Codes
    Ok = 200,
    Created = 201,
    Accepted = 202,
    NoContent = 204,
    SeeOther = 303,

    // Failing Codes
    BadRequest = 400,
    Unauthorized = 401,
    PaymentRequired = 402,
    Forbidden = 403,
    NotFound = 404,
    NotAcceptable = 406,
    UnprocessableEntity = 422,
    InternalServerError = 500,
    ServiceUnavailable = 503,
}

// Maps a failing status onto the matching error kind
fn classify_error(code: u16, message: String) -> CloudAppError {
    use ApiStatusCodes as S;
    match ApiStatusCodes::try_from(code) {
        Ok(S::Unauthorized) => CloudAppError::Unauthorized(code, message),
        Ok(S::NotFound) => CloudAppError::NotFound(code, message),
        _ => CloudAppError::ApiResponse(code, message),
    }
}

// Error bodies come back either as {"error": ..} or {"message": ..}
#[derive(Deserialize, Debug)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error.or(parsed.message),
        Err(_) => Some(body.to_string()),
    }
}
