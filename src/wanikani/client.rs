//! WaniKani API 客户端 - 只实现 assignments 查询
//!
//! 按 `available_after` / `available_before` 过滤，沿 `pages.next_url`
//! 取完所有分页后统计 lessons / reviews。请求失败直接返回错误，不重试。

use crate::assignments::{AssignmentQuery, AssignmentState, AssignmentSummary};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// API 基础地址
pub const WANIKANI_API_URL: &str = "https://api.wanikani.com/v2";

/// API 版本
const WANIKANI_REVISION: &str = "20170710";

/// 默认超时（秒）
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 单次查询最多跟随的分页数
const MAX_PAGES: usize = 200;

/// 客户端配置
#[derive(Debug, Clone)]
pub struct WaniKaniConfig {
    /// API token
    pub api_token: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl WaniKaniConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: WANIKANI_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// 分页集合响应
#[derive(Debug, Deserialize)]
struct CollectionPage {
    data: Vec<Resource>,
    #[serde(default)]
    pages: Pages,
}

#[derive(Debug, Default, Deserialize)]
struct Pages {
    #[serde(default)]
    next_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Resource {
    data: AssignmentState,
}

/// 错误响应
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// WaniKani 客户端
pub struct WaniKaniClient {
    client: Client,
    config: WaniKaniConfig,
}

impl WaniKaniClient {
    pub fn new(config: WaniKaniConfig) -> Result<Self> {
        if config.api_token.is_empty() {
            return Err(anyhow!("WaniKani API token is required"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow!("Cannot create HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    /// 第一页的 URL 和查询参数
    fn first_page_query(start: Option<DateTime<Utc>>, end: DateTime<Utc>) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(2);
        if let Some(start) = start {
            query.push(("available_after", start.to_rfc3339_opts(SecondsFormat::Millis, true)));
        }
        query.push(("available_before", end.to_rfc3339_opts(SecondsFormat::Millis, true)));
        query
    }

    fn get_page(&self, url: &str, query: &[(&'static str, String)]) -> Result<CollectionPage> {
        debug!(url = %url, "Fetching assignments page");

        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(&self.config.api_token)
            .header("Wanikani-Revision", WANIKANI_REVISION)
            .send()
            .with_context(|| format!("WaniKani request failed: {}", url))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| anyhow!("Failed to read response: {}", e))?;

        if !status.is_success() {
            let reason = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(anyhow!("WaniKani API error ({}): {}", status, reason));
        }

        serde_json::from_str(&body).context("Failed to parse WaniKani assignments")
    }

    /// 取 `[start, end]` 内的所有任务状态
    pub fn assignments(&self, start: Option<DateTime<Utc>>, end: DateTime<Utc>) -> Result<Vec<AssignmentState>> {
        let first_url = format!("{}/assignments", self.config.base_url.trim_end_matches('/'));
        let mut page = self.get_page(&first_url, &Self::first_page_query(start, end))?;
        let mut states: Vec<AssignmentState> = Vec::new();

        for _ in 0..MAX_PAGES {
            states.extend(page.data.into_iter().map(|r| r.data));
            match page.pages.next_url {
                // next_url 已包含过滤参数
                Some(next) => page = self.get_page(&next, &[])?,
                None => return Ok(states),
            }
        }

        Err(anyhow!("WaniKani returned more than {} pages", MAX_PAGES))
    }
}

impl AssignmentQuery for WaniKaniClient {
    fn fetch(&self, start: Option<DateTime<Utc>>, end: DateTime<Utc>) -> Result<AssignmentSummary> {
        let states = self.assignments(start, end)?;
        let summary = AssignmentSummary::from_states(states);
        debug!(
            lessons = summary.lessons,
            reviews = summary.reviews,
            "Counted available assignments"
        );
        Ok(summary)
    }
}
