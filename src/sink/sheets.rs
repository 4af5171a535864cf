//! Google Sheets result log via a service account

use super::{LogRow, ResultSink};
use crate::error::{Result, ResumeRankerError};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const SCOPES: [&str; 2] = [
    "https://spreadsheets.google.com/feeds",
    "https://www.googleapis.com/auth/drive",
];
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const SHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";
const TOKEN_LIFETIME_SECS: u64 = 3600;

/// The fields of a service-account key file this sink needs
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    TOKEN_URL.to_string()
}

#[derive(Debug, Serialize, PartialEq)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

pub struct GoogleSheetsSink {
    credentials_path: PathBuf,
    spreadsheet_name: String,
    spreadsheet_id: Option<String>,
    client: Client,
}

impl ServiceAccountKey {
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ResumeRankerError::Sink(format!(
                "Failed to read service account key {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| ResumeRankerError::Sink(format!("Invalid service account key: {}", e)))
    }

    fn claims(&self, issued_at: u64) -> Claims {
        Claims {
            iss: self.client_email.clone(),
            scope: SCOPES.join(" "),
            aud: self.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME_SECS,
        }
    }

    /// RS256-signed assertion for the JWT bearer grant
    pub fn sign_assertion(&self, issued_at: u64) -> Result<String> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())?;
        Ok(encode(&header, &self.claims(issued_at), &key)?)
    }
}

impl GoogleSheetsSink {
    pub fn new(
        credentials_path: PathBuf,
        spreadsheet_name: String,
        spreadsheet_id: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            credentials_path,
            spreadsheet_name,
            spreadsheet_id,
            client,
        })
    }

    async fn access_token(&self, key: &ServiceAccountKey) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ResumeRankerError::Sink(format!("System clock error: {}", e)))?
            .as_secs();
        let assertion = key.sign_assertion(now)?;

        let response: TokenResponse = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.access_token)
    }

    async fn spreadsheet_id(&self, token: &str, key: &ServiceAccountKey) -> Result<String> {
        if let Some(id) = &self.spreadsheet_id {
            return Ok(id.clone());
        }

        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            self.spreadsheet_name.replace('\'', "\\'"),
            SPREADSHEET_MIME
        );
        let list: FileList = self
            .client
            .get(DRIVE_FILES_URL)
            .bearer_auth(token)
            .query(&[("q", query.as_str()), ("fields", "files(id,name)")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        list.files.into_iter().next().map(|f| f.id).ok_or_else(|| {
            ResumeRankerError::Sink(format!(
                "Spreadsheet '{}' not found or not shared with {}",
                self.spreadsheet_name, key.client_email
            ))
        })
    }

    async fn append_row(&self, token: &str, spreadsheet_id: &str, row: &LogRow) -> Result<()> {
        let url = format!("{}/{}/values/A1:append", SHEETS_URL, spreadsheet_id);
        self.client
            .post(url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "USER_ENTERED"), ("insertDataOption", "INSERT_ROWS")])
            .json(&row_body(row))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

fn row_body(row: &LogRow) -> serde_json::Value {
    json!({ "values": [[row.name, row.score, row.timestamp]] })
}

impl ResultSink for GoogleSheetsSink {
    /// Authorizes from scratch on every call, then appends row by row to the first worksheet
    async fn append_rows(&self, rows: &[LogRow]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let key = ServiceAccountKey::from_file(&self.credentials_path).await?;
        let token = self.access_token(&key).await?;
        let spreadsheet_id = self.spreadsheet_id(&token, &key).await?;
        debug!("Appending to spreadsheet {}", spreadsheet_id);

        for row in rows {
            self.append_row(&token, &spreadsheet_id, row).await?;
        }

        info!("Logged {} rows to Google Sheets '{}'", rows.len(), self.spreadsheet_name);
        Ok(rows.len())
    }

    fn describe(&self) -> String {
        format!("Google Sheets '{}'", self.spreadsheet_name)
    }
}
