//! HTML rendering with Tera

use super::autocomplete::SuggestionPanel;
use super::history::SearchHistory;
use super::state::{SearchStatus, UiState, POPULAR_CATEGORIES};
use crate::autocomplete::Suggestion;
use crate::catalog::{cover_url, BookRecord};
use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

/// Shown when a record has no cover
pub const PLACEHOLDER_COVER: &str = "https://via.placeholder.com/150x200?text=No+Cover";

/// Subjects listed on a card before collapsing into "+N more"
const CARD_SUBJECTS: usize = 3;

#[derive(Debug, Serialize)]
struct BookCard {
    key: Option<String>,
    title: String,
    authors: Option<String>,
    year: Option<i64>,
    cover_url: String,
    subjects: Vec<String>,
    more_subjects: usize,
}

impl From<&BookRecord> for BookCard {
    fn from(book: &BookRecord) -> Self {
        let subjects = book.subject.clone().unwrap_or_default();
        let more_subjects = subjects.len().saturating_sub(CARD_SUBJECTS);

        Self {
            key: book.key.clone(),
            title: book.title.clone().unwrap_or_else(|| "Untitled".to_string()),
            authors: book
                .author_name
                .as_ref()
                .filter(|names| !names.is_empty())
                .map(|names| names.join(", ")),
            year: book.first_publish_year,
            cover_url: book
                .cover_i
                .map(cover_url)
                .unwrap_or_else(|| PLACEHOLDER_COVER.to_string()),
            subjects: subjects.into_iter().take(CARD_SUBJECTS).collect(),
            more_subjects,
        }
    }
}

#[derive(Debug, Serialize)]
struct HistoryItem {
    index: usize,
    query: String,
    kind: String,
    timestamp: String,
    when: String,
}

fn history_items(history: &SearchHistory) -> Vec<HistoryItem> {
    history
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| HistoryItem {
            index,
            query: entry.query.clone(),
            kind: entry.kind.to_string(),
            timestamp: entry.timestamp.to_rfc3339(),
            when: entry.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct SuggestionItem {
    key: String,
    title: String,
    kind: String,
    author: Option<String>,
    year: Option<i64>,
    cover_url: Option<String>,
}

impl From<&Suggestion> for SuggestionItem {
    fn from(suggestion: &Suggestion) -> Self {
        let key = serde_json::to_value(&suggestion.key)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_default();

        Self {
            key,
            title: suggestion.title.clone(),
            kind: suggestion.kind.to_string(),
            author: suggestion.author.clone(),
            year: suggestion.year,
            cover_url: suggestion.cover_i.map(cover_url),
        }
    }
}

#[derive(Debug, Serialize)]
struct CategoryItem {
    name: &'static str,
}

/// Template renderer
pub struct View {
    tera: Tera,
}

impl View {
    /// Create a renderer with the embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_template("results.html", include_str!("../templates/results.html"))?;
        tera.add_raw_template("history.html", include_str!("../templates/history.html"))?;
        tera.add_raw_template(
            "suggestions.html",
            include_str!("../templates/suggestions.html"),
        )?;

        Ok(Self { tera })
    }

    /// Status banner, result grid, or the empty state
    pub fn render_results(&self, state: &UiState) -> Result<String> {
        let status = match state.status {
            SearchStatus::Idle => "idle",
            SearchStatus::Loading => "loading",
            SearchStatus::Success => "success",
            SearchStatus::Error(_) => "error",
        };
        let books: Vec<BookCard> = state.books.iter().map(BookCard::from).collect();
        let categories: Vec<CategoryItem> = POPULAR_CATEGORIES
            .iter()
            .map(|c| CategoryItem { name: c.name })
            .collect();

        let mut ctx = Context::new();
        ctx.insert("status", status);
        ctx.insert("error", &state.error());
        ctx.insert("query", &state.params.as_ref().map(|p| p.query.as_str()));
        ctx.insert("books", &books);
        ctx.insert("pristine", &state.is_pristine());
        ctx.insert("categories", &categories);
        ctx.insert("recent", &history_items(&state.history));

        Ok(self.tera.render("results.html", &ctx)?)
    }

    /// History sidebar
    pub fn render_history(&self, history: &SearchHistory) -> Result<String> {
        let mut ctx = Context::new();
        ctx.insert("items", &history_items(history));
        Ok(self.tera.render("history.html", &ctx)?)
    }

    /// Suggestion dropdown; empty when the panel is closed
    pub fn render_suggestions(&self, panel: &SuggestionPanel) -> Result<String> {
        let suggestions: Vec<SuggestionItem> =
            panel.suggestions.iter().map(SuggestionItem::from).collect();

        let mut ctx = Context::new();
        ctx.insert("open", &panel.open);
        ctx.insert("suggestions", &suggestions);
        Ok(self.tera.render("suggestions.html", &ctx)?)
    }
}
