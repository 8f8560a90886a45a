use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, StatusCode, Url,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GoogleCredential;
use crate::domain::record::{Record, SheetRange};
use crate::error::{AppError, AppResult};
use crate::services::SpreadsheetService;

const VALUE_INPUT_OPTION: &str = "USER_ENTERED";
const INSERT_DATA_OPTION: &str = "INSERT_ROWS";

/// Google Sheets v4 values API.
pub struct GoogleSheetsClient {
    http: Client,
    base_url: String,
    spreadsheet_id: Option<String>,
    credential: Option<GoogleCredential>,
}

impl GoogleSheetsClient {
    pub fn new(
        base_url: String,
        spreadsheet_id: Option<String>,
        credential: Option<GoogleCredential>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(|err| {
            AppError::Configuration(format!("failed to build Sheets HTTP client: {err}"))
        })?;
        Ok(Self {
            http,
            base_url,
            spreadsheet_id,
            credential,
        })
    }

    fn api_details(&self) -> AppResult<(&str, &GoogleCredential)> {
        let spreadsheet_id = self
            .spreadsheet_id
            .as_deref()
            .ok_or_else(|| AppError::Configuration("spreadsheet id not configured".to_string()))?;
        let credential = self.credential.as_ref().ok_or_else(|| {
            AppError::SpreadsheetAccess(
                "no Google access token or API key to authenticate with".to_string(),
            )
        })?;
        Ok((spreadsheet_id, credential))
    }

    /// `{base}/v4/spreadsheets/{id}/values/{range}{suffix}`
    fn values_endpoint(
        &self,
        spreadsheet_id: &str,
        range: &SheetRange,
        suffix: &str,
    ) -> AppResult<Url> {
        let range_segment = format!("{range}{suffix}");
        let mut url = Url::parse(self.base_url.trim_end_matches('/')).map_err(|err| {
            AppError::Configuration(format!("invalid Sheets base URL '{}': {err}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                AppError::Configuration(format!(
                    "Sheets base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                spreadsheet_id,
                "values",
                range_segment.as_str(),
            ]);
        Ok(url)
    }

    fn authorize(builder: RequestBuilder, credential: &GoogleCredential) -> RequestBuilder {
        match credential {
            GoogleCredential::AccessToken(token) => {
                builder.header(AUTHORIZATION, format!("Bearer {token}"))
            }
            GoogleCredential::ApiKey(key) => builder.query(&[("key", key.as_str())]),
        }
    }

    async fn check_status(response: reqwest::Response) -> AppResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string());
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::SpreadsheetAccess(
                format!("Google Sheets rejected the credentials ({status}): {body}"),
            ),
            _ => AppError::SpreadsheetAccess(format!(
                "Google Sheets responded with {status}: {body}"
            )),
        })
    }
}

#[async_trait]
impl SpreadsheetService for GoogleSheetsClient {
    async fn read_records(&self, range: &SheetRange) -> AppResult<Vec<Record>> {
        let (spreadsheet_id, credential) = self.api_details()?;
        let url = self.values_endpoint(spreadsheet_id, range, "")?;
        debug!(range = %range, "Reading sheet values");

        let request = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .query(&[("majorDimension", "ROWS")]);
        let response = Self::authorize(request, credential)
            .send()
            .await
            .map_err(|err| {
                AppError::SpreadsheetAccess(format!("failed to call Google Sheets: {err}"))
            })?;
        let response = Self::check_status(response).await?;

        let payload: ValueRange = response.json().await.map_err(|err| {
            AppError::SpreadsheetAccess(format!("failed to parse Google Sheets response: {err}"))
        })?;

        Ok(payload
            .values
            .into_iter()
            .map(Record::from_cells)
            .collect())
    }

    async fn append_record(&self, range: &SheetRange, record: &Record) -> AppResult<()> {
        let (spreadsheet_id, credential) = self.api_details()?;
        let url = self.values_endpoint(spreadsheet_id, range, ":append")?;
        let body = AppendValuesRequest {
            major_dimension: "ROWS",
            values: vec![record.clone().into_cells()],
        };

        info!(range = %range, date = %record.date_label, "Appending record row");

        let request = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .query(&[
                ("valueInputOption", VALUE_INPUT_OPTION),
                ("insertDataOption", INSERT_DATA_OPTION),
            ])
            .json(&body);
        let response = Self::authorize(request, credential)
            .send()
            .await
            .map_err(|err| {
                AppError::SpreadsheetAccess(format!("failed to call Google Sheets: {err}"))
            })?;
        let response = Self::check_status(response).await?;

        let payload: AppendValuesResponse = response.json().await.unwrap_or_default();
        let updated_range = payload
            .updates
            .and_then(|updates| updates.updated_range)
            .unwrap_or_else(|| "<unknown>".to_string());
        debug!(updated_range = %updated_range, "Record row appended");
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AppendValuesRequest {
    major_dimension: &'static str,
    values: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Deserialize, Default)]
struct AppendValuesResponse {
    updates: Option<AppendUpdates>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    updated_range: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> GoogleSheetsClient {
        GoogleSheetsClient::new(
            base_url.to_string(),
            Some("sheet-id".to_string()),
            Some(GoogleCredential::AccessToken("token".to_string())),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn builds_values_endpoints() {
        let client = client("https://sheets.googleapis.com/");
        let range = SheetRange::parse("Sheet1!A1:B1").unwrap();
        let read = client.values_endpoint("sheet-id", &range, "").unwrap();
        assert_eq!(
            read.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-id/values/Sheet1!A1:B1"
        );
        let append = client.values_endpoint("sheet-id", &range, ":append").unwrap();
        assert_eq!(
            append.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-id/values/Sheet1!A1:B1:append"
        );
    }

    #[test]
    fn encodes_sheet_names_with_spaces() {
        let client = client("https://sheets.googleapis.com");
        let range = SheetRange::parse("'Team Log'!A2:B").unwrap();
        let url = client.values_endpoint("sheet-id", &range, "").unwrap();
        assert!(url.as_str().ends_with("/values/'Team%20Log'!A2:B"));
    }

    #[test]
    fn serializes_append_body() {
        let body = AppendValuesRequest {
            major_dimension: "ROWS",
            values: vec![vec!["2024-01-26".to_string(), "Summary".to_string()]],
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({
                "majorDimension": "ROWS",
                "values": [["2024-01-26", "Summary"]]
            })
        );
    }

    #[tokio::test]
    async fn missing_spreadsheet_id_is_a_configuration_error() {
        let client = GoogleSheetsClient::new(
            "https://sheets.googleapis.com".to_string(),
            None,
            Some(GoogleCredential::ApiKey("key".to_string())),
            Duration::from_secs(5),
        )
        .unwrap();
        let range = SheetRange::parse("Sheet1!A2:B").unwrap();
        let err = client.read_records(&range).await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[tokio::test]
    async fn missing_credential_is_a_spreadsheet_access_error() {
        let client = GoogleSheetsClient::new(
            "https://sheets.googleapis.com".to_string(),
            Some("sheet-id".to_string()),
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        let range = SheetRange::parse("Sheet1!A1:B1").unwrap();
        let record = Record::from_cells(vec!["2024-01-26".into(), "Summary".into()]);
        let err = client.append_record(&range, &record).await.unwrap_err();
        assert!(matches!(err, AppError::SpreadsheetAccess(_)));
    }
}
