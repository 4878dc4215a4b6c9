use crate::entities::{news_entity, page_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageResponse {
    pub id: i32,
    pub page_name: String,
    pub contents: Option<String>,
    pub thumb: Option<String>,
    pub published: bool,
    pub alias: String,
    pub meta_title: Option<String>,
    pub meta_desc: Option<String>,
    pub meta_key: Option<String>,
    pub ordering: i32,
    pub created_at: DateTime<Utc>,
}

impl From<page_entity::Model> for PageResponse {
    fn from(m: page_entity::Model) -> Self {
        Self {
            id: m.id,
            page_name: m.page_name,
            contents: m.contents,
            thumb: m.thumb,
            published: m.published,
            alias: m.alias,
            meta_title: m.meta_title,
            meta_desc: m.meta_desc,
            meta_key: m.meta_key,
            ordering: m.ordering,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageRequest {
    pub page_name: String,
    pub contents: Option<String>,
    pub thumb: Option<String>,
    pub published: Option<bool>,
    pub alias: Option<String>,
    pub meta_title: Option<String>,
    pub meta_desc: Option<String>,
    pub meta_key: Option<String>,
    pub ordering: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewsSummary {
    pub id: i32,
    pub title: String,
    pub summary: Option<String>,
    pub thumb: Option<String>,
    pub alias: String,
    pub is_hot: bool,
    pub views: i32,
    pub created_at: DateTime<Utc>,
}

impl From<news_entity::Model> for NewsSummary {
    fn from(m: news_entity::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            summary: m.summary,
            thumb: m.thumb,
            alias: m.alias,
            is_hot: m.is_hot,
            views: m.views,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewsResponse {
    pub id: i32,
    pub title: String,
    pub summary: Option<String>,
    pub contents: Option<String>,
    pub thumb: Option<String>,
    pub published: bool,
    pub alias: String,
    pub author: Option<String>,
    pub account_id: Option<i32>,
    pub cat_id: Option<i32>,
    pub is_hot: bool,
    pub is_newfeed: bool,
    pub views: i32,
    pub meta_desc: Option<String>,
    pub meta_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<news_entity::Model> for NewsResponse {
    fn from(m: news_entity::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            summary: m.summary,
            contents: m.contents,
            thumb: m.thumb,
            published: m.published,
            alias: m.alias,
            author: m.author,
            account_id: m.account_id,
            cat_id: m.cat_id,
            is_hot: m.is_hot,
            is_newfeed: m.is_newfeed,
            views: m.views,
            meta_desc: m.meta_desc,
            meta_key: m.meta_key,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewsRequest {
    pub title: String,
    pub summary: Option<String>,
    pub contents: Option<String>,
    pub thumb: Option<String>,
    pub published: Option<bool>,
    pub alias: Option<String>,
    pub author: Option<String>,
    pub cat_id: Option<i32>,
    #[serde(default)]
    pub is_hot: bool,
    #[serde(default)]
    pub is_newfeed: bool,
    pub meta_desc: Option<String>,
    pub meta_key: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct NewsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub hot: Option<bool>,
    pub search: Option<String>,
}
