use super::{CredentialError, CredentialErrorKind, CredentialSource, Credentials};

use serde::Deserialize;


const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const SHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

/// Header row plus the credential row of the first worksheet.
const CREDENTIAL_RANGE: &str = "A1:E2";


#[derive(Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}


/// A spreadsheet used as a credential store.
///
/// The spreadsheet is looked up by name through the Drive API, then the first worksheet is
/// read: row one holds headers, row two holds `username, password, host, port, database`.
pub struct SecretSheet {
    name: String,
    access_token: String,
    drive_url: String,
    sheets_url: String,
    client: reqwest::Client,
}

impl SecretSheet {
    pub fn new(name: &str, access_token: &str) -> Self {
        Self::with_endpoints(name, access_token, DRIVE_FILES_URL, SHEETS_URL)
    }

    /// Same as [`SecretSheet::new`] against other Drive file-list and Sheets endpoints.
    pub fn with_endpoints(name: &str, access_token: &str, drive_url: &str, sheets_url: &str) -> Self {
        SecretSheet {
            name: name.to_string(),
            access_token: access_token.to_string(),
            drive_url: drive_url.trim_end_matches('/').to_string(),
            sheets_url: sheets_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    async fn find_spreadsheet_id(&self) -> Result<String, CredentialError> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            self.name.replace('\\', "\\\\").replace('\'', "\\'"),
            SPREADSHEET_MIME_TYPE,
        );

        let list: DriveFileList = self.client
            .get(&self.drive_url)
            .bearer_auth(&self.access_token)
            .query(&[("q", query.as_str()), ("fields", "files(id)"), ("pageSize", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        list.files
            .into_iter()
            .next()
            .map(|file| file.id)
            .ok_or_else(|| CredentialError { kind: CredentialErrorKind::SheetNotFound(self.name.clone()) })
    }

    async fn fetch_rows(&self, spreadsheet_id: &str) -> Result<Vec<Vec<String>>, CredentialError> {
        let range: ValueRange = self.client
            .get(format!("{}/{spreadsheet_id}/values/{CREDENTIAL_RANGE}", self.sheets_url))
            .bearer_auth(&self.access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(range.values)
    }
}

#[async_trait::async_trait]
impl CredentialSource for SecretSheet {
    async fn credentials(&self) -> Result<Credentials, CredentialError> {
        let spreadsheet_id = self.find_spreadsheet_id().await?;
        tracing::debug!("Secret sheet '{}' resolved to {}", self.name, spreadsheet_id);

        let rows = self.fetch_rows(&spreadsheet_id).await?;
        credentials_from_rows(&self.name, &rows)
    }
}


/// Skip the header row and read the first five fields of the first data row.
fn credentials_from_rows(sheet: &str, rows: &[Vec<String>]) -> Result<Credentials, CredentialError> {
    let row = rows.get(1).ok_or_else(|| CredentialError {
        kind: CredentialErrorKind::NoDataRow(sheet.to_string()),
    })?;

    match row.as_slice() {
        [username, password, host, port, database, ..] => {
            Credentials::from_fields([username.as_str(), password.as_str(), host.as_str(), port.as_str(), database.as_str()])
        }
        _ => Err(CredentialError {
            kind: CredentialErrorKind::TooFewColumns { sheet: sheet.to_string(), found: row.len() },
        }),
    }
}
