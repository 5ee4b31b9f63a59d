use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::models::{NewProject, Project, StatusFilter};

/// Page size requested from the server for every listing fetch
pub const FETCH_PAGE_SIZE: u32 = 100;

const PROJECTS_PATH: &str = "/api/projects";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Project API answered with status {0}")]
    Status(StatusCode),

    #[error("Unexpected data format received from the API.")]
    UnexpectedFormat,

    #[error("Could not reach the project API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Not signed in")]
    Unauthenticated,
}

/// Parameters of one listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectQuery {
    pub search: String,
    pub page_number: u32,
    pub page_size: u32,
    pub status: StatusFilter,
}

impl ProjectQuery {
    fn params(&self) -> [(&'static str, String); 4] {
        [
            ("search", self.search.clone()),
            ("pageNumber", self.page_number.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("status", self.status.code().to_string()),
        ]
    }
}

/// HTTP client for the Project API
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn projects_url(&self) -> String {
        format!("{}{}", self.base_url, PROJECTS_PATH)
    }

    /// Fetch the projects matching `query`, exactly as the server returns them
    #[instrument(name = "api_list_projects", skip(self, token), fields(search = %query.search, status = query.status.code()))]
    pub async fn list_projects(&self, token: &str, query: &ProjectQuery) -> Result<Vec<Project>, ApiError> {
        let response = self
            .http
            .get(self.projects_url())
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .query(&query.params())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "project listing rejected");
            return Err(ApiError::Status(status));
        }

        let body = response.bytes().await?;
        let projects = parse_listing(&body)?;
        debug!(count = projects.len(), "project listing received");

        Ok(projects)
    }

    #[instrument(name = "api_create_project", skip(self, token, project), fields(title = %project.title))]
    pub async fn create_project(&self, token: &str, project: &NewProject) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.projects_url())
            .bearer_auth(token)
            .json(project)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "project creation rejected");
            return Err(ApiError::Status(status));
        }

        Ok(())
    }
}

/// Decode a `{ "data": [Project] }` body. Records that do not decode are skipped.
fn parse_listing(body: &[u8]) -> Result<Vec<Project>, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ApiError::UnexpectedFormat)?;
    let records = match value {
        Value::Object(mut fields) => match fields.remove("data") {
            Some(Value::Array(records)) => records,
            _ => return Err(ApiError::UnexpectedFormat),
        },
        _ => return Err(ApiError::UnexpectedFormat),
    };

    let projects = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Project>(record) {
            Ok(project) => Some(project),
            Err(err) => {
                warn!(index, error = %err, "skipping undecodable project record");
                None
            }
        })
        .collect();

    Ok(projects)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        extract::{Query, State},
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::get,
    };
    use serde_json::json;

    use super::*;
    use crate::models::ProjectStatus;

    #[derive(Clone, Default)]
    struct Recorded {
        requests: Arc<Mutex<Vec<(HashMap<String, String>, HeaderMap)>>>,
        created: Arc<Mutex<Vec<Value>>>,
    }

    async fn spawn_api(listing: (AxumStatus, Value), recorded: Recorded) -> String {
        let app = Router::new()
            .route(
                "/api/projects",
                get(
                    move |State(recorded): State<Recorded>,
                          Query(params): Query<HashMap<String, String>>,
                          headers: HeaderMap| {
                        let (status, body) = listing.clone();
                        async move {
                            recorded.requests.lock().unwrap().push((params, headers));
                            (status, Json(body))
                        }
                    },
                )
                .post(|State(recorded): State<Recorded>, Json(body): Json<Value>| async move {
                    recorded.created.lock().unwrap().push(body);
                    AxumStatus::CREATED
                }),
            )
            .with_state(recorded);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn query() -> ProjectQuery {
        ProjectQuery {
            search: "bridge".to_string(),
            page_number: 1,
            page_size: FETCH_PAGE_SIZE,
            status: StatusFilter::Only(ProjectStatus::Completed),
        }
    }

    #[tokio::test]
    async fn sends_query_and_bearer_token() {
        let recorded = Recorded::default();
        let body = json!({"data": [
            {"id":"1","title":"A","projectNumber":1,"status":0,"originDate":"2024-01-01",
             "isDeleted":false,"createdAt":"2024-01-01"}
        ]});
        let base = spawn_api((AxumStatus::OK, body), recorded.clone()).await;

        let client = ApiClient::new(&base).unwrap();
        let projects = client.list_projects("secret", &query()).await.unwrap();

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title, "A");

        let requests = recorded.requests.lock().unwrap();
        let (params, headers) = &requests[0];
        assert_eq!(params["search"], "bridge");
        assert_eq!(params["pageNumber"], "1");
        assert_eq!(params["pageSize"], "100");
        assert_eq!(params["status"], "4");
        assert_eq!(headers["authorization"], "Bearer secret");
        assert_eq!(headers["content-type"], "application/json");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let base = spawn_api((AxumStatus::NOT_FOUND, json!({"data": []})), Recorded::default()).await;

        let client = ApiClient::new(&base).unwrap();
        let err = client.list_projects("secret", &query()).await.unwrap_err();

        assert!(matches!(err, ApiError::Status(status) if status == StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn object_data_is_unexpected_format() {
        let base = spawn_api((AxumStatus::OK, json!({"data": {"id": "1"}})), Recorded::default()).await;

        let client = ApiClient::new(&base).unwrap();
        let err = client.list_projects("secret", &query()).await.unwrap_err();

        assert!(matches!(err, ApiError::UnexpectedFormat));
        assert_eq!(err.to_string(), "Unexpected data format received from the API.");
    }

    #[tokio::test]
    async fn create_posts_json_body() {
        let recorded = Recorded::default();
        let base = spawn_api((AxumStatus::OK, json!({"data": []})), recorded.clone()).await;

        let client = ApiClient::new(&format!("{base}/")).unwrap();
        let project = NewProject {
            title: "Dam".to_string(),
            project_number: 9,
            status: ProjectStatus::InProgress,
            origin_date: chrono::NaiveDate::from_ymd_opt(2024, 2, 3).unwrap(),
        };
        client.create_project("secret", &project).await.unwrap();

        let created = recorded.created.lock().unwrap();
        assert_eq!(created[0]["title"], "Dam");
        assert_eq!(created[0]["originDate"], "2024-02-03");
    }

    #[test]
    fn listing_shapes() {
        assert!(parse_listing(br#"{"data": []}"#).unwrap().is_empty());
        assert!(matches!(parse_listing(br#"[]"#), Err(ApiError::UnexpectedFormat)));
        assert!(matches!(parse_listing(br#"{"items": []}"#), Err(ApiError::UnexpectedFormat)));
        assert!(matches!(parse_listing(b"not json"), Err(ApiError::UnexpectedFormat)));
        assert!(parse_listing(br#"{"data": [{"id": 1}]}"#).unwrap().is_empty());
    }

    #[test]
    fn undecodable_records_are_skipped() {
        let body = json!({
            "data": [
                {
                    "id": "a",
                    "title": "Bridge",
                    "projectNumber": 7,
                    "status": 1,
                    "originDate": "2024-01-10"
                },
                {
                    "id": "b",
                    "title": "Tunnel",
                    "projectNumber": 8,
                    "status": 0,
                    "originDate": null
                },
                { "id": "c", "title": "Dam", "status": 0, "originDate": "2024-02-01" }
            ]
        });

        let projects = parse_listing(body.to_string().as_bytes()).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, "a");
    }
}
