// src/spreadsheets/http_sheet.rs

use crate::errors::ServerError;
use crate::spreadsheets::backend::{SheetBackend, SheetRow};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sheet exposed by a web-app endpoint (for example a script bound to a
/// hosted spreadsheet). Speaks a tiny JSON protocol:
///
/// * `GET  <url>?action=rows` -> `{"rows": [[..], ..]}`
/// * `POST <url>` `{"action": "append", "row": [..]}`
/// * `POST <url>` `{"action": "update", "index": n, "row": [..]}`
pub struct HttpSheet {
    url: String,
    client: Client,
}

#[derive(Serialize)]
struct RowCommand<'a> {
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<usize>,
    row: &'a SheetRow,
}

#[derive(Deserialize)]
struct RowsResponse {
    rows: Vec<Vec<String>>,
}

impl HttpSheet {
    pub fn new(url: impl Into<String>) -> Result<Self, ServerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| ServerError::SheetError(e.to_string()))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    fn send(&self, command: &RowCommand<'_>) -> Result<(), ServerError> {
        let resp = self
            .client
            .post(&self.url)
            .json(command)
            .send()
            .map_err(|e| ServerError::SheetError(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(ServerError::SheetError(format!("{} - {}", status, text)));
        }
        Ok(())
    }
}

impl SheetBackend for HttpSheet {
    fn name(&self) -> &'static str {
        "http"
    }

    fn get_rows(&self) -> Result<Vec<SheetRow>, ServerError> {
        let resp = self
            .client
            .get(&self.url)
            .query(&[("action", "rows")])
            .send()
            .map_err(|e| ServerError::SheetError(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(ServerError::SheetError(format!(
                "fetch rows returned {}",
                resp.status()
            )));
        }

        let body: RowsResponse = resp
            .json()
            .map_err(|e| ServerError::SheetError(format!("bad rows payload: {e}")))?;
        Ok(body.rows.into_iter().map(SheetRow::from_cells).collect())
    }

    fn append_row(&self, row: &SheetRow) -> Result<(), ServerError> {
        self.send(&RowCommand {
            action: "append",
            index: None,
            row,
        })
    }

    fn update_row(&self, index: usize, row: &SheetRow) -> Result<(), ServerError> {
        self.send(&RowCommand {
            action: "update",
            index: Some(index),
            row,
        })
    }
}
