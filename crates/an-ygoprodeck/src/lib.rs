use an_api_types::{ApiCard, BanlistFormat, CardInfoResponse, CardSetInfo};
use an_card_client::CardDatabase;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "https://db.ygoprodeck.com/api/v7";

/// HTTP adapter for the public YGOPRODeck card database.
///
/// Reads `YGOPRODECK_API_URL` from environment at construction time
/// (default: [`DEFAULT_ENDPOINT`]).
pub struct YgoProDeckClient {
    endpoint: String,
    http: reqwest::Client,
}

impl Default for YgoProDeckClient {
    fn default() -> Self {
        Self::new(None)
    }
}

impl YgoProDeckClient {
    pub fn new(endpoint: Option<String>) -> Self {
        let endpoint = endpoint
            .or_else(|| std::env::var("YGOPRODECK_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn card_info_url(&self) -> String {
        format!("{}/cardinfo.php", self.endpoint)
    }

    pub fn card_sets_url(&self) -> String {
        format!("{}/cardsets.php", self.endpoint)
    }

    async fn fetch_text(&self, what: &str, request: reqwest::RequestBuilder) -> Result<(reqwest::StatusCode, String)> {
        let response = request
            .send()
            .await
            .with_context(|| format!("ygoprodeck {what} transport"))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("ygoprodeck {what} body"))?;
        Ok((status, text))
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: String,
}

/// Decodes a `cardinfo.php` body.
pub fn decode_cards(body: &str) -> Result<Vec<ApiCard>> {
    let parsed: CardInfoResponse =
        serde_json::from_str(body).context("ygoprodeck cardinfo parse")?;
    Ok(parsed.data)
}

/// Decodes a `cardsets.php` body.
pub fn decode_sets(body: &str) -> Result<Vec<CardSetInfo>> {
    serde_json::from_str(body).context("ygoprodeck cardsets parse")
}

#[async_trait(?Send)]
impl CardDatabase for YgoProDeckClient {
    async fn card_by_name(&self, name: &str) -> Result<Option<ApiCard>> {
        let request = self
            .http
            .get(self.card_info_url())
            .query(&[("name", name)]);
        let (status, text) = self.fetch_text("card_by_name", request).await?;

        // An unknown name comes back as 400 with an error message.
        if status == reqwest::StatusCode::BAD_REQUEST {
            let reason = serde_json::from_str::<ApiErrorResponse>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            debug!(card = name, %reason, "card not found");
            return Ok(None);
        }
        if !status.is_success() {
            anyhow::bail!("ygoprodeck card_by_name HTTP {status}: {text}");
        }

        Ok(decode_cards(&text)?.into_iter().next())
    }

    async fn banlist(&self, format: BanlistFormat) -> Result<Vec<ApiCard>> {
        let request = self
            .http
            .get(self.card_info_url())
            .query(&[("banlist", format.as_query())]);
        let (status, text) = self.fetch_text("banlist", request).await?;
        if !status.is_success() {
            warn!(format = format.as_query(), %status, "banlist request rejected");
            anyhow::bail!("ygoprodeck banlist HTTP {status}: {text}");
        }
        decode_cards(&text)
    }

    async fn card_sets(&self) -> Result<Vec<CardSetInfo>> {
        let request = self.http.get(self.card_sets_url());
        let (status, text) = self.fetch_text("card_sets", request).await?;
        if !status.is_success() {
            anyhow::bail!("ygoprodeck card_sets HTTP {status}: {text}");
        }
        decode_sets(&text)
    }

    async fn all_cards(&self) -> Result<Vec<ApiCard>> {
        let request = self.http.get(self.card_info_url());
        let (status, text) = self.fetch_text("all_cards", request).await?;
        if !status.is_success() {
            anyhow::bail!("ygoprodeck all_cards HTTP {status}: {text}");
        }
        decode_cards(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_endpoint_wins_and_is_trimmed() {
        let client = YgoProDeckClient::new(Some("http://localhost:8080/api/v7/".into()));
        assert_eq!(client.endpoint(), "http://localhost:8080/api/v7");
        assert_eq!(client.card_sets_url(), "http://localhost:8080/api/v7/cardsets.php");
    }

    #[test]
    fn decodes_card_and_set_payloads() -> Result<()> {
        let cards = decode_cards(
            r#"{"data":[{"id":89631139,"name":"Blue-Eyes White Dragon","type":"Normal Monster",
                "race":"Dragon","atk":3000,"def":2500,"desc":"Legendary.","archetype":"Blue-Eyes",
                "card_sets":[{"set_name":"Legend of Blue Eyes White Dragon","set_code":"LOB-001"}]}]}"#,
        )?;
        assert_eq!(cards[0].archetype.as_deref(), Some("Blue-Eyes"));
        assert_eq!(cards[0].card_sets.len(), 1);

        let sets = decode_sets(
            r#"[{"set_name":"Legend of Blue Eyes White Dragon","set_code":"LOB","tcg_date":"2002-03-08"},
                {"set_name":"Promo"}]"#,
        )?;
        assert_eq!(sets[0].tcg_date.as_deref(), Some("2002-03-08"));
        assert!(sets[1].tcg_date.is_none());
        Ok(())
    }

    #[test]
    fn malformed_body_reports_context() {
        let err = decode_cards("<html>").unwrap_err();
        assert!(err.to_string().contains("cardinfo parse"));
    }
}
