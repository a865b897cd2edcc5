/// Synchronous client for a **groundwater / water-quality measurement service**.
///
/// Three endpoints are wrapped: `groundwaterlevel/`, `physicochemicalparameter/` and
/// `analysis/`. Every request carries an `Authorization: Token {token}` header and
/// the JSON array it returns is converted into a polars `DataFrame` (one row per
/// record, one column per field seen in any record).
///
/// ### Notes
/// - One blocking round trip per call; no retries and no pagination.
/// - A non-2xx status surfaces as [`Error::Http`] with status code and body.
/// - Date bounds default to `1900-01-01` .. `2100-01-01` when omitted.
///
/// Typical usage:
/// ```no_run
/// # use pghydro_rs::Client;
/// let client = Client::new("https://your-api-url.com", "mytoken")?;
/// let df = client.get_analyses(Some("Piezometer 1".into()), Some(["Ca", "Cl", "Na"].into()), None, None)?;
/// println!("{df}");
/// # Ok::<(), pghydro_rs::Error>(())
/// ```
use crate::error::{Error, Result};
use crate::models::{Endpoint, Selection};
use crate::query::{QueryFilter, build_query};
use log::{debug, warn};
use polars::prelude::{DataFrame, JsonReader, SerReader};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use serde_json::Value;
use std::fmt;
use std::io::Cursor;
use std::time::Duration;

/// Environment variable holding the service base URL.
pub const BASE_URL_ENV: &str = "PGHYDRO_BASE_URL";
/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "PGHYDRO_TOKEN";

/// Connection settings plus the HTTP client. Immutable once built; the token
/// only lives inside the sensitive `Authorization` header.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    headers: HeaderMap,
    http: HttpClient,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Client {
    /// Build a client for `base_url` authenticating with `token`.
    ///
    /// The `Authorization` header is derived here once; a token that is not a
    /// valid header value fails with [`Error::InvalidToken`].
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let token = token.into();

        let mut auth =
            HeaderValue::from_str(&format!("Token {}", token)).map_err(|_| Error::InvalidToken)?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = HttpClient::builder()
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("pghydro_rs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url,
            headers,
            http,
        })
    }

    /// Build a client from `PGHYDRO_BASE_URL` and `PGHYDRO_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_ENV).map_err(|_| Error::MissingEnv(BASE_URL_ENV))?;
        let token = std::env::var(TOKEN_ENV).map_err(|_| Error::MissingEnv(TOKEN_ENV))?;
        Self::new(base_url, token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers sent with every request (currently only `Authorization`).
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Full URL of an endpoint. A trailing `/` on the base URL is ignored.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint.path())
    }

    /// GET `url` with the authorization header and optional query parameters,
    /// returning the decoded JSON body.
    ///
    /// ### Errors
    /// - [`Error::Http`] on a non-success status (body kept for diagnostics)
    /// - [`Error::Transport`] on connection failures or an undecodable body
    pub fn fetch_json(&self, url: &str, params: Option<&QueryFilter>) -> Result<Value> {
        debug!(
            "GET {} ({} query params)",
            url,
            params.map_or(0, QueryFilter::len)
        );
        let mut req = self.http.get(url).headers(self.headers.clone());
        if let Some(p) = params {
            req = req.query(p);
        }
        let resp = req.send()?;
        let status = resp.status();
        if !status.is_success() {
            warn!("GET {} failed with HTTP {}", url, status);
            let body = resp.text().unwrap_or_else(|e| {
                debug!("could not read error body from {}: {}", url, e);
                String::new()
            });
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json()?)
    }

    /// Groundwater level records as returned by the service, without conversion.
    pub fn get_groundwater_level_raw(&self) -> Result<Value> {
        self.fetch_json(&self.endpoint_url(Endpoint::GroundwaterLevel), None)
    }

    /// Groundwater level records as a table. The endpoint takes no filters.
    pub fn get_groundwater_level(&self) -> Result<DataFrame> {
        records_to_frame(&self.get_groundwater_level_raw()?)
    }

    /// Physicochemical parameter measurements (pH, temperature, conductivity, ...).
    ///
    /// ### Arguments
    /// - `station`: station name(s); `None` means all stations.
    /// - `parameter`: parameter name(s); `None` means all parameters.
    /// - `timestamp_start` / `timestamp_end`: date bounds, defaulting to
    ///   `1900-01-01` / `2100-01-01`.
    ///
    /// ### Example
    /// ```no_run
    /// # use pghydro_rs::Client;
    /// let client = Client::new("https://your-api-url.com", "mytoken")?;
    /// let df = client.get_physicochemical_parameters(
    ///     Some("Piezometer 1".into()),
    ///     Some(["pH", "Temperature", "Conductivity"].into()),
    ///     None,
    ///     None,
    /// )?;
    /// # Ok::<(), pghydro_rs::Error>(())
    /// ```
    pub fn get_physicochemical_parameters(
        &self,
        station: Option<Selection>,
        parameter: Option<Selection>,
        timestamp_start: Option<&str>,
        timestamp_end: Option<&str>,
    ) -> Result<DataFrame> {
        let params = build_query(
            "parameter",
            station,
            parameter,
            timestamp_start,
            timestamp_end,
        );
        self.get_table(Endpoint::PhysicochemicalParameter, &params)
    }

    /// Chemical analyses. Same filters as
    /// [`get_physicochemical_parameters`](Self::get_physicochemical_parameters),
    /// with `analyte` (Ca, Cl, Na, ...) instead of `parameter`.
    pub fn get_analyses(
        &self,
        station: Option<Selection>,
        analyte: Option<Selection>,
        timestamp_start: Option<&str>,
        timestamp_end: Option<&str>,
    ) -> Result<DataFrame> {
        let params = build_query("analyte", station, analyte, timestamp_start, timestamp_end);
        self.get_table(Endpoint::Analysis, &params)
    }

    fn get_table(&self, endpoint: Endpoint, params: &QueryFilter) -> Result<DataFrame> {
        let v = self.fetch_json(&self.endpoint_url(endpoint), Some(params))?;
        records_to_frame(&v)
    }
}

/// Convert a JSON array of records into a `DataFrame`.
///
/// The schema is inferred over every record, so the columns are the union of all
/// record fields; a record lacking a field gets a null there. An empty array
/// gives an empty frame.
pub fn records_to_frame(records: &Value) -> Result<DataFrame> {
    let arr = records
        .as_array()
        .ok_or_else(|| Error::UnexpectedResponse("not a top-level array".into()))?;
    if arr.is_empty() {
        return Ok(DataFrame::empty());
    }
    if let Some(bad) = arr.iter().find(|r| !r.is_object()) {
        return Err(Error::UnexpectedResponse(format!(
            "record is not an object: {}",
            bad
        )));
    }

    let bytes = serde_json::to_vec(records)?;
    let df = JsonReader::new(Cursor::new(bytes))
        .infer_schema_len(None)
        .finish()?;
    debug!(
        "converted {} records into a {}x{} table",
        arr.len(),
        df.height(),
        df.width()
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_header_is_built_once_from_token() {
        let c = Client::new("https://example.org/api", "abc123").unwrap();
        let h = c.headers().get(AUTHORIZATION).unwrap();
        assert_eq!(h.to_str().unwrap(), "Token abc123");
        assert!(h.is_sensitive());
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let err = Client::new("https://example.org/api", "bad\ntoken").unwrap_err();
        assert!(matches!(err, Error::InvalidToken));
    }

    #[test]
    fn debug_output_redacts_token() {
        let c = Client::new("https://example.org/api", "s3cret").unwrap();
        let dbg = format!("{:?}", c);
        assert!(!dbg.contains("s3cret"));
        assert!(dbg.contains("example.org"));
    }

    #[test]
    fn endpoint_urls_ignore_trailing_slash() {
        let a = Client::new("https://example.org/api", "t").unwrap();
        let b = Client::new("https://example.org/api/", "t").unwrap();
        assert_eq!(
            a.endpoint_url(Endpoint::Analysis),
            "https://example.org/api/analysis/"
        );
        assert_eq!(
            a.endpoint_url(Endpoint::GroundwaterLevel),
            b.endpoint_url(Endpoint::GroundwaterLevel)
        );
    }

    #[test]
    fn records_become_rows_with_union_of_fields() {
        let v = json!([
            {"station": "P1", "analyte": "Ca", "value": 12.5},
            {"station": "P2", "analyte": "Cl", "value": 3.0, "unit": "mg/L"}
        ]);
        let df = records_to_frame(&v).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 4);
        assert!(df.get_column_index("unit").is_some());
    }

    #[test]
    fn empty_array_gives_empty_frame() {
        let df = records_to_frame(&json!([])).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 0);
    }

    #[test]
    fn non_array_body_is_rejected() {
        let err = records_to_frame(&json!({"detail": "nope"})).unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse(_)));
        let err = records_to_frame(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse(_)));
    }
}
