// API client module: a small blocking HTTP session that talks to a Visallo
// web application. The session owns the cookie jar, the CSRF token and the
// current workspace id, and every step of the example is a method on it.

use crate::error::{ApiError, Result};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Form field carrying the CSRF token on mutating requests.
pub const CSRF_TOKEN_FIELD: &str = "csrfToken";
/// Form field carrying the active workspace on mutating requests.
pub const WORKSPACE_ID_FIELD: &str = "workspaceId";

/// Authenticated session against one Visallo server. Cookies set by the
/// server (the login session cookie in particular) are replayed on every
/// later request by the underlying client.
pub struct Session {
    client: Client,
    base_url: String,
    csrf_token: Option<String>,
    workspace_id: Option<String>,
}

/// Response of `GET /user/me`. Only the two fields needed for mutating
/// calls are kept; the server sends camelCase names.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserMe {
    #[serde(rename = "CsrfToken", alias = "csrfToken")]
    pub csrf_token: String,
    #[serde(rename = "CurrentWorkspaceId", alias = "currentWorkspaceId")]
    pub current_workspace_id: String,
}

/// A graph element returned by the server. We only look at its id.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Element {
    #[serde(rename = "Id", alias = "id")]
    pub id: String,
}

/// Body of a response we decode only to make sure it is JSON.
pub type GenericResult = serde_json::Value;

/// URL-encoded form body. Setting a key replaces any previous value and
/// keys are encoded in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: BTreeMap<String, String>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

/// One property to attach to a new vertex.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyValue {
    pub property_key: String,
    pub property_name: String,
    pub value: String,
    pub visibility_source: String,
    pub metadata_string: String,
}

/// Wrapper the server expects in the `properties` form field.
#[derive(Serialize)]
struct AddElementProperties<'a> {
    properties: &'a [PropertyValue],
}

/// Everything `POST /vertex/new` accepts besides the session fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewVertex {
    /// Let the server pick an id when `None`.
    pub vertex_id: Option<String>,
    pub concept_type: String,
    pub visibility_source: String,
    pub justification_text: Option<String>,
    pub properties: Vec<PropertyValue>,
}

impl NewVertex {
    /// Build the form for `POST /vertex/new`, without session fields.
    pub fn to_form(&self) -> Result<Form> {
        let mut form = Form::new();
        if let Some(id) = &self.vertex_id {
            form.set("vertexId", id.as_str());
        }
        form.set("conceptType", self.concept_type.as_str());
        form.set("visibilitySource", self.visibility_source.as_str());
        if let Some(text) = &self.justification_text {
            form.set("justificationText", text.as_str());
        }
        let properties = serde_json::to_string(&AddElementProperties {
            properties: &self.properties,
        })
        .map_err(|source| ApiError::Encode {
            field: "properties",
            source,
        })?;
        form.set("properties", properties);
        Ok(form)
    }
}

impl Session {
    /// Create a session for `base_url`. TLS certificates are not verified
    /// (the example server uses a self-signed one) and cookies are kept for
    /// the lifetime of the session.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .cookie_store(true)
            .build()
            .map_err(ApiError::Client)?;
        Ok(Session {
            client,
            base_url: base_url.into(),
            csrf_token: None,
            workspace_id: None,
        })
    }

    /// CSRF token from the last metadata fetch.
    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    /// Workspace id from the last metadata fetch.
    pub fn workspace_id(&self) -> Option<&str> {
        self.workspace_id.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST the credentials to /login. The server answers with a session
    /// cookie; the status code and body are not looked at.
    pub fn login(&self, username: &str, password: &str) -> Result<()> {
        let url = self.url("/login");
        let mut form = Form::new();
        form.set("username", username).set("password", password);
        debug!(%url, "POST login");
        let res = self
            .client
            .post(&url)
            .form(form.fields())
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        debug!(%url, status = %res.status(), "login response");
        info!(username, "logged in");
        Ok(())
    }

    /// GET /user/me and remember the CSRF token and workspace id it returns.
    pub fn fetch_user_me(&mut self) -> Result<UserMe> {
        let me: UserMe = self.get_json("/user/me")?;
        self.csrf_token = Some(me.csrf_token.clone());
        self.workspace_id = Some(me.current_workspace_id.clone());
        info!(workspace_id = %me.current_workspace_id, "fetched user metadata");
        Ok(me)
    }

    /// POST /vertex/new and return the created element.
    pub fn create_vertex(&self, vertex: &NewVertex) -> Result<Element> {
        let element: Element = self.post_form("/vertex/new", vertex.to_form()?)?;
        info!(vertex_id = %element.id, "created vertex");
        Ok(element)
    }

    /// POST /logout. The response body is decoded and dropped.
    pub fn logout(&self) -> Result<()> {
        let _: GenericResult = self.post_form("/logout", Form::new())?;
        info!("logged out");
        Ok(())
    }

    /// POST `form` to `path` after setting the session's CSRF token and
    /// workspace id on it, then decode the JSON response.
    pub fn post_form<T: DeserializeOwned>(&self, path: &str, mut form: Form) -> Result<T> {
        form.set(CSRF_TOKEN_FIELD, self.csrf_token.as_deref().unwrap_or_default());
        form.set(WORKSPACE_ID_FIELD, self.workspace_id.as_deref().unwrap_or_default());

        let url = self.url(path);
        debug!(%url, "POST form");
        let res = self
            .client
            .post(&url)
            .form(form.fields())
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        decode_json(url, res)
    }

    /// GET `path` and decode the JSON response.
    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let res = self
            .client
            .get(&url)
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        decode_json(url, res)
    }
}

// Reads the whole body before decoding so a bad payload can be reported
// verbatim. The status code is ignored.
fn decode_json<T: DeserializeOwned>(url: String, res: Response) -> Result<T> {
    debug!(%url, status = %res.status(), "response");
    let body = match res.text() {
        Ok(body) => body,
        Err(source) => return Err(ApiError::Transport { url, source }),
    };
    serde_json::from_str(&body).map_err(|source| ApiError::Decode { url, body, source })
}
