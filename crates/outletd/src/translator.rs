//! Natural-language question to SQL translator.
//!
//! Two model calls per question: the first writes a SQLite SELECT against
//! the outlet catalog, the second turns the executed result into a short
//! answer. Nothing is retried; the first failure ends the request.

use std::sync::Arc;
use tracing::{info, warn};

use crate::llm_client::{LlmClient, LlmError};
use crate::store::{OutletStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Question must not be empty")]
    EmptyQuestion,

    #[error("Model did not produce a SQL query")]
    NoQuery,

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything produced while answering one question
#[derive(Debug, Clone)]
pub struct Translation {
    pub sql: String,
    pub result: String,
    pub answer: String,
}

pub struct SqlTranslator {
    llm: Arc<dyn LlmClient>,
    store: OutletStore,
    top_k: usize,
    sample_rows: usize,
}

impl SqlTranslator {
    pub fn new(llm: Arc<dyn LlmClient>, store: OutletStore, top_k: usize, sample_rows: usize) -> Self {
        Self {
            llm,
            store,
            top_k,
            sample_rows,
        }
    }

    pub async fn answer(&self, question: &str) -> Result<Translation, TranslateError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(TranslateError::EmptyQuestion);
        }

        let table_info = self.store.table_info(self.sample_rows).await?;

        let raw = self
            .llm
            .complete(&query_system_prompt(&table_info, self.top_k), &query_user_prompt(question))
            .await?;
        let sql = clean_sql(&raw);
        if sql.is_empty() {
            return Err(TranslateError::NoQuery);
        }
        info!("  Translated query: {}", sql);

        let rows = self.store.run_select(&sql).await.map_err(|e| {
            warn!("  Translated query failed: {}", e);
            e
        })?;
        let result = rows.render();

        let answer = self
            .llm
            .complete(ANSWER_SYSTEM_PROMPT, &answer_user_prompt(question, &sql, &result))
            .await?;

        Ok(Translation {
            sql,
            result,
            answer: answer.trim().to_string(),
        })
    }
}

const ANSWER_SYSTEM_PROMPT: &str = "You answer questions about Subway outlets in Kuala Lumpur. \
Use only the SQL result you are given. Reply in one or two plain sentences. \
If the result is empty, say that no matching outlet was found.";

fn query_system_prompt(table_info: &str, top_k: usize) -> String {
    format!(
        r#"You write SQLite queries for an outlet directory.
Given a question, reply with one syntactically correct SQLite SELECT statement and nothing else.
Return at most {top_k} rows with LIMIT unless the question asks for a specific number or for a count.
Select only the columns needed to answer. Quote column names with double quotes.
Use LIKE with % wildcards for partial matches on names, addresses and hours.
Only use this table:

{table_info}"#
    )
}

fn query_user_prompt(question: &str) -> String {
    format!("Question: {}\nSQLQuery:", question)
}

fn answer_user_prompt(question: &str, sql: &str, result: &str) -> String {
    format!(
        "Question: {}\nSQLQuery: {}\nSQLResult: {}\nAnswer:",
        question, sql, result
    )
}

/// Strip code fences, prompt labels and trailing chatter from model output
pub fn clean_sql(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some((_, rest)) = text.split_once("SQLQuery:") {
        text = rest;
    }
    if let Some((query, _)) = text.split_once("SQLResult:") {
        text = query;
    }

    let text = text.trim();
    let text = match text.strip_prefix("```") {
        Some(fenced) => {
            let body = fenced
                .strip_prefix("sqlite")
                .or_else(|| fenced.strip_prefix("sql"))
                .unwrap_or(fenced);
            body.split("```").next().unwrap_or("")
        }
        None => text,
    };

    text.trim().trim_end_matches(';').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::FakeLlmClient;
    use outlet_common::Outlet;

    async fn seeded_store() -> OutletStore {
        let store = OutletStore::in_memory().unwrap();
        let mut bangsar = Outlet::at("Subway Bangsar", "Jalan Telawi 3", 3.130, 101.671);
        bangsar.operating_hours = Some("Monday - Sunday, 8:00 AM - 9:00 PM".to_string());
        let mut klcc = Outlet::at("Subway KLCC", "Suria KLCC", 3.158, 101.712);
        klcc.operating_hours = Some("Monday - Sunday, 10:00 AM - 10:00 PM".to_string());
        store.insert_outlets(vec![bangsar, klcc]).await.unwrap();
        store
    }

    #[test]
    fn test_clean_sql_fenced() {
        assert_eq!(
            clean_sql("```sql\nSELECT COUNT(*) FROM subway_outlets;\n```"),
            "SELECT COUNT(*) FROM subway_outlets"
        );
    }

    #[test]
    fn test_clean_sql_labels() {
        let raw = "SQLQuery: SELECT \"name\" FROM subway_outlets LIMIT 5\nSQLResult: [('x',)]\nAnswer: x";
        assert_eq!(clean_sql(raw), "SELECT \"name\" FROM subway_outlets LIMIT 5");
    }

    #[test]
    fn test_clean_sql_plain() {
        assert_eq!(clean_sql("  SELECT 1  "), "SELECT 1");
        assert_eq!(clean_sql("```\n```"), "");
    }

    #[tokio::test]
    async fn test_answer_runs_query_and_summarizes() {
        let store = seeded_store().await;
        let llm = Arc::new(FakeLlmClient::replies(&[
            "```sql\nSELECT COUNT(*) FROM subway_outlets WHERE \"operating_hours\" LIKE '%9:00 PM%';\n```",
            "One outlet closes at 9:00 PM.",
        ]));
        let translator = SqlTranslator::new(llm.clone(), store, 5, 3);

        let translation = translator.answer("How many outlets close at 9pm?").await.unwrap();
        assert_eq!(translation.result, "[(1,)]");
        assert_eq!(translation.answer, "One outlet closes at 9:00 PM.");

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("How many outlets close at 9pm?"));
        assert!(prompts[1].contains("SQLResult: [(1,)]"));
    }

    #[tokio::test]
    async fn test_empty_question_skips_model() {
        let llm = Arc::new(FakeLlmClient::replies(&["SELECT 1"]));
        let translator = SqlTranslator::new(llm.clone(), seeded_store().await, 5, 3);

        let err = translator.answer("   ").await.unwrap_err();
        assert!(matches!(err, TranslateError::EmptyQuestion));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_write_statement_rejected() {
        let llm = Arc::new(FakeLlmClient::replies(&["DELETE FROM subway_outlets"]));
        let translator = SqlTranslator::new(llm.clone(), seeded_store().await, 5, 3);

        let err = translator.answer("Remove everything").await.unwrap_err();
        assert!(matches!(err, TranslateError::Store(StoreError::NotReadOnly(_))));
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_model_failure_surfaces_message() {
        let llm = Arc::new(FakeLlmClient::always_error(LlmError::Timeout(60)));
        let translator = SqlTranslator::new(llm, seeded_store().await, 5, 3);

        let err = translator.answer("Which outlets are in Bangsar?").await.unwrap_err();
        assert_eq!(err.to_string(), "Request timeout after 60 seconds");
    }

    #[tokio::test]
    async fn test_invalid_sql_is_store_error() {
        let llm = Arc::new(FakeLlmClient::replies(&["SELECT nope FROM missing_table"]));
        let translator = SqlTranslator::new(llm, seeded_store().await, 5, 3);

        let err = translator.answer("Anything?").await.unwrap_err();
        assert!(err.to_string().contains("no such table"));
    }
}
