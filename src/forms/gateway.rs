//! Access to the remote forms platform.
//!
//! The scoring pipeline only talks to the [`FormGateway`] trait. The
//! [`GoogleGateway`] implementation performs blocking HTTP calls with a bearer
//! token obtained outside of this program.

use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};

use award_scoring::{FormDefinition, FormRequest, Response};

use crate::forms::config_reader::EndpointSettings;
use crate::forms::io_forms_api::*;
use crate::forms::*;

const FORM_MIME_TYPE: &str = "application/vnd.google-apps.form";

/// A form as stored on the remote platform.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RemoteForm {
    pub form_id: String,
    pub title: String,
    pub responder_uri: Option<String>,
    pub revision_id: Option<String>,
    pub definition: FormDefinition,
}

/// The operations of the remote platform used by this program.
pub trait FormGateway {
    /// The ids of all the forms visible with the current credentials.
    fn list_form_ids(&self) -> FResult<Vec<String>>;

    fn get_form(&self, form_id: &str) -> FResult<RemoteForm>;

    /// All the responses of a form. Empty (not an error) when nobody answered yet.
    fn list_responses(&self, form_id: &str) -> FResult<Vec<Response>>;

    /// Creates an empty form and returns its id.
    fn create_form(&self, title: &str, document_title: &str) -> FResult<String>;

    /// Applies the requests to the form, in order, as one batch.
    fn batch_update(&self, form_id: &str, requests: &[FormRequest]) -> FResult<()>;

    /// The structured content of a document.
    fn get_document(&self, document_id: &str) -> FResult<JSValue>;

    fn get_sheet_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        major_dimension: &str,
    ) -> FResult<Vec<Vec<String>>>;
}

pub struct GoogleGateway {
    client: Client,
    token: String,
    endpoints: EndpointSettings,
}

impl GoogleGateway {
    pub fn new(token: &str, endpoints: &EndpointSettings) -> GoogleGateway {
        GoogleGateway {
            client: Client::new(),
            token: token.to_string(),
            endpoints: endpoints.clone(),
        }
    }

    /// Reads the access token from GOOGLE_ACCESS_TOKEN (environment or .env file).
    pub fn from_env(endpoints: &EndpointSettings) -> FResult<GoogleGateway> {
        dotenvy::dotenv().ok();
        let name = "GOOGLE_ACCESS_TOKEN";
        let token = std::env::var(name).context(MissingEnvSnafu { name })?;
        Ok(GoogleGateway::new(&token, endpoints))
    }

    fn get_json(&self, url: Url, query: &[(&str, &str)]) -> FResult<JSValue> {
        debug!("GET {} {:?}", url, query);
        let resp = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .context(HttpSnafu { url: url.as_str() })?;
        read_json(url, resp)
    }

    fn post_json(&self, url: Url, body: &JSValue) -> FResult<JSValue> {
        debug!("POST {}", url);
        let resp = self
            .client
            .post(url.clone())
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .context(HttpSnafu { url: url.as_str() })?;
        read_json(url, resp)
    }
}

fn read_json(url: Url, resp: reqwest::blocking::Response) -> FResult<JSValue> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(status_error(url.as_str(), status, body));
    }
    resp.json::<JSValue>()
        .context(HttpSnafu { url: url.as_str() })
}

fn status_error(url: &str, status: StatusCode, body: String) -> FormsError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FormsError::Auth {
            url: url.to_string(),
            status: status.as_u16(),
        },
        StatusCode::NOT_FOUND => FormsError::NotFound {
            url: url.to_string(),
        },
        _ => FormsError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        },
    }
}

/// Appends path segments to a base url. The segments are escaped.
fn endpoint(base: &str, segments: &[&str]) -> FResult<Url> {
    let mut url = Url::parse(base).ok().context(InvalidUrlSnafu { url: base })?;
    {
        let mut path = url
            .path_segments_mut()
            .ok()
            .context(InvalidUrlSnafu { url: base })?;
        path.pop_if_empty();
        for s in segments.iter() {
            path.push(s);
        }
    }
    Ok(url)
}

impl FormGateway for GoogleGateway {
    fn list_form_ids(&self) -> FResult<Vec<String>> {
        let url = endpoint(&self.endpoints.drive, &[])?;
        let q = format!("mimeType='{}'", FORM_MIME_TYPE);
        let mut ids: Vec<String> = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query: Vec<(&str, &str)> = vec![("q", q.as_str())];
            if let Some(t) = page_token.as_deref() {
                query.push(("pageToken", t));
            }
            let js = self.get_json(url.clone(), &query)?;
            let page: FileListJs = serde_json::from_value(js).context(ParsingJsonSnafu {})?;
            ids.extend(page.files.into_iter().map(|f| f.id));
            match page.next_page_token {
                Some(t) if !t.is_empty() => page_token = Some(t),
                _ => break,
            }
        }
        debug!("list_form_ids: {} forms", ids.len());
        Ok(ids)
    }

    fn get_form(&self, form_id: &str) -> FResult<RemoteForm> {
        let url = endpoint(&self.endpoints.forms, &[form_id])?;
        let js = self.get_json(url, &[])?;
        let form: FormJs = serde_json::from_value(js).context(ParsingJsonSnafu {})?;
        Ok(remote_form_from_js(form))
    }

    fn list_responses(&self, form_id: &str) -> FResult<Vec<Response>> {
        let url = endpoint(&self.endpoints.forms, &[form_id, "responses"])?;
        let mut responses: Vec<Response> = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let query: Vec<(&str, &str)> = match page_token.as_deref() {
                Some(t) => vec![("pageToken", t)],
                None => vec![],
            };
            let js = self.get_json(url.clone(), &query)?;
            let page: ResponsesPageJs = serde_json::from_value(js).context(ParsingJsonSnafu {})?;
            responses.extend(page.responses.into_iter().map(response_from_js));
            match page.next_page_token {
                Some(t) if !t.is_empty() => page_token = Some(t),
                _ => break,
            }
        }
        Ok(responses)
    }

    fn create_form(&self, title: &str, document_title: &str) -> FResult<String> {
        let url = endpoint(&self.endpoints.forms, &[])?;
        let body = json!({"info": {"title": title, "documentTitle": document_title}});
        let js = self.post_json(url, &body)?;
        let form: FormJs = serde_json::from_value(js).context(ParsingJsonSnafu {})?;
        info!("form created with id {}", form.form_id);
        Ok(form.form_id)
    }

    fn batch_update(&self, form_id: &str, requests: &[FormRequest]) -> FResult<()> {
        let segment = format!("{}:batchUpdate", form_id);
        let url = endpoint(&self.endpoints.forms, &[segment.as_str()])?;
        let body = batch_update_js(requests);
        self.post_json(url, &body)?;
        Ok(())
    }

    fn get_document(&self, document_id: &str) -> FResult<JSValue> {
        let url = endpoint(&self.endpoints.docs, &[document_id])?;
        self.get_json(url, &[])
    }

    fn get_sheet_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        major_dimension: &str,
    ) -> FResult<Vec<Vec<String>>> {
        let url = endpoint(&self.endpoints.sheets, &[spreadsheet_id, "values", range])?;
        let js = self.get_json(url, &[("majorDimension", major_dimension)])?;
        let values: SheetValuesJs = serde_json::from_value(js).context(ParsingJsonSnafu {})?;
        Ok(values.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_escape_segments() {
        let url = endpoint(
            "https://sheets.example.com/v4/spreadsheets",
            &["abc", "values", "Sheet 1!A1:D9"],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.example.com/v4/spreadsheets/abc/values/Sheet%201!A1:D9"
        );
        let url = endpoint("https://forms.example.com/v1/forms/", &["f1:batchUpdate"]).unwrap();
        assert_eq!(url.as_str(), "https://forms.example.com/v1/forms/f1:batchUpdate");
    }

    #[test]
    fn invalid_base_url() {
        assert!(matches!(
            endpoint("not a url", &["x"]),
            Err(FormsError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn status_codes_map_to_errors() {
        assert!(matches!(
            status_error("u", StatusCode::UNAUTHORIZED, String::new()),
            FormsError::Auth { status: 401, .. }
        ));
        assert!(matches!(
            status_error("u", StatusCode::NOT_FOUND, String::new()),
            FormsError::NotFound { .. }
        ));
        assert!(matches!(
            status_error("u", StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
            FormsError::HttpStatus { status: 500, .. }
        ));
    }
}
