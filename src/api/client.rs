use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde_json::json;
use std::time::Duration;

use super::models::{Item, ItemDraft, MutationKind};
use super::service::ItemService;

/// PostgREST-style client for one table of business items
///
/// Rows are addressed with `?id=eq.<id>` filters, writes ask for
/// `Prefer: return=representation` so the updated row comes back, and
/// document rendering goes through the `render_<table>` RPC function.
#[derive(Clone)]
pub struct RestItemService {
    base_url: String,
    table: String,
    noun: String,
    token: Option<String>,
    http_client: reqwest::Client,
}

impl RestItemService {
    pub fn new(
        base_url: impl Into<String>,
        table: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("bizctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let table = table.into();
        let noun = singular(&table);

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            table,
            noun,
            token,
            http_client,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.base_url, self.table)
    }

    fn row_url(&self, id: &str) -> String {
        format!("{}?id=eq.{}", self.table_url(), urlencoding::encode(id))
    }

    fn render_url(&self) -> String {
        format!("{}/rpc/render_{}", self.base_url, self.table)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        log::debug!("{} {}", method, url);
        let builder = self
            .http_client
            .request(method, url)
            .header("Accept", "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
        let response = builder.send().await.context("Request to data API failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Data API returned {}: {}", status, body.trim());
            anyhow::bail!("Data API returned {}: {}", status, body.trim());
        }
        Ok(response)
    }

    async fn fetch_rows(&self, builder: RequestBuilder) -> Result<Vec<Item>> {
        self.send(builder)
            .await?
            .json::<Vec<Item>>()
            .await
            .context("Failed to parse data API response")
    }

    fn first_row(&self, rows: Vec<Item>, id: &str) -> Result<Item> {
        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("{} '{}' not found", self.noun, id))
    }
}

#[async_trait]
impl ItemService for RestItemService {
    fn noun(&self) -> &str {
        &self.noun
    }

    async fn list(&self) -> Result<Vec<Item>> {
        let url = format!("{}?select=*&order=updated_at.desc.nullslast", self.table_url());
        self.fetch_rows(self.request(Method::GET, &url)).await
    }

    async fn create(&self, draft: ItemDraft) -> Result<Item> {
        let builder = self
            .request(Method::POST, &self.table_url())
            .header("Prefer", "return=representation")
            .json(&draft);
        let rows = self.fetch_rows(builder).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Data API returned no row for the new {}", self.noun))
    }

    async fn get(&self, id: &str) -> Result<Item> {
        let rows = self.fetch_rows(self.request(Method::GET, &self.row_url(id))).await?;
        self.first_row(rows, id)
    }

    async fn mutate(&self, id: &str, kind: MutationKind) -> Result<Item> {
        let builder = match kind {
            MutationKind::Regenerate(format) => self
                .request(Method::POST, &self.render_url())
                .json(&json!({ "id": id, "format": format })),
            MutationKind::Modify(draft) => self
                .request(Method::PATCH, &self.row_url(id))
                .header("Prefer", "return=representation")
                .json(&draft),
            MutationKind::Rename(title) => self
                .request(Method::PATCH, &self.row_url(id))
                .header("Prefer", "return=representation")
                .json(&json!({ "title": title })),
        };
        let rows = self.fetch_rows(builder).await?;
        self.first_row(rows, id)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, &self.row_url(id))).await?;
        Ok(())
    }
}

/// Naive English singular of a table name, good enough for labels
fn singular(table: &str) -> String {
    if let Some(stem) = table.strip_suffix("ies") {
        format!("{}y", stem)
    } else if let Some(stem) = table.strip_suffix('s') {
        stem.to_string()
    } else {
        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> RestItemService {
        RestItemService::new("https://data.example.com/", "proposals", None, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_urls() {
        let svc = service();
        assert_eq!(svc.table_url(), "https://data.example.com/proposals");
        assert_eq!(svc.row_url("a b"), "https://data.example.com/proposals?id=eq.a%20b");
        assert_eq!(svc.render_url(), "https://data.example.com/rpc/render_proposals");
    }

    #[test]
    fn test_noun_from_table() {
        assert_eq!(service().noun(), "proposal");
        assert_eq!(singular("quotations"), "quotation");
        assert_eq!(singular("companies"), "company");
        assert_eq!(singular("staff"), "staff");
    }
}
