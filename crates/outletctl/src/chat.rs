//! One chat turn: record the question, ask outletd, record the reply.
//!
//! Failures never end the session. A connection failure becomes an inline
//! error message; an API error or an empty answer becomes an apology.

use outlet_common::Conversation;
use tracing::warn;

use crate::client::{CatalogApi, ClientError};

pub const NO_ANSWER: &str = "Sorry, I couldn't find an answer to that.";

/// Append the question and the assistant reply to `conversation`; returns the reply
pub async fn chat_turn(
    conversation: &mut Conversation,
    api: &dyn CatalogApi,
    question: &str,
) -> String {
    conversation.push_user(question);

    let reply = match api.ask(question).await {
        Ok(answer) if !answer.trim().is_empty() => answer,
        Ok(_) => NO_ANSWER.to_string(),
        Err(e @ ClientError::Connection(_)) => {
            warn!("Chat request failed: {}", e);
            e.to_string()
        }
        Err(e) => {
            warn!("Chat request rejected: {}", e);
            format!("{} ({})", NO_ANSWER, e)
        }
    };

    conversation.push_assistant(reply.clone());
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCatalog;
    use outlet_common::{Outlet, Role};

    fn catalog() -> FakeCatalog {
        FakeCatalog::with_outlets(vec![Outlet::at("Subway KLCC", "Suria KLCC", 3.158, 101.712)])
    }

    #[tokio::test]
    async fn test_answer_appended_after_question() {
        let api = catalog().with_answers(vec![Ok("Subway KLCC opens at 10 AM.".to_string())]);
        let mut conv = Conversation::new();

        let reply = chat_turn(&mut conv, &api, "When does KLCC open?").await;
        assert_eq!(reply, "Subway KLCC opens at 10 AM.");

        let entries = conv.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, Role::User);
        assert_eq!(entries[0].content, "When does KLCC open?");
        assert_eq!(entries[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_connection_failure_is_inline_message() {
        let api = FakeCatalog::unreachable();
        let mut conv = Conversation::new();

        let reply = chat_turn(&mut conv, &api, "Hello?").await;
        assert!(reply.starts_with("API connection error:"));
        assert_eq!(conv.len(), 2);
    }

    #[tokio::test]
    async fn test_api_error_becomes_apology_with_detail() {
        let api = catalog().with_answers(vec![Err(ClientError::Api {
            status: 400,
            detail: "no such column: city".to_string(),
        })]);
        let mut conv = Conversation::new();

        let reply = chat_turn(&mut conv, &api, "Which city?").await;
        assert!(reply.starts_with(NO_ANSWER));
        assert!(reply.contains("no such column: city"));
    }

    #[tokio::test]
    async fn test_empty_answer_becomes_apology() {
        let api = catalog();
        let mut conv = Conversation::new();

        assert_eq!(chat_turn(&mut conv, &api, "?").await, NO_ANSWER);
    }
}
