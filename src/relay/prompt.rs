// src/relay/prompt.rs — Message assembly for the two relay calls

use crate::provider::Message;
use crate::session::{Turn, TurnRole};

const FEEDBACK_INSTRUCTIONS: &str = "You are a compassionate interpersonal skills coach. Review this conversation where someone was practicing a difficult conversation, and provide brief, constructive feedback (2-3 short paragraphs).

Focus on:
1. What they did well (specific examples)
2. What could be improved or alternative approaches
3. One key takeaway for future practice

Be encouraging and specific. Keep it concise and actionable.";

/// History (in order) followed by the new user input. The persona prompt
/// goes in the request's `system` field, ahead of these.
pub fn completion_messages(history: &[Turn], user_input: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    for turn in history {
        messages.push(Message {
            role: turn.role.into(),
            content: turn.content.clone(),
        });
    }
    messages.push(Message::user(user_input));
    messages
}

/// Transcript as the coach sees it: the practising user is "You", the
/// simulated counterpart is "Them".
pub fn render_transcript(conversation: &[Turn]) -> String {
    conversation
        .iter()
        .map(|turn| {
            let speaker = match turn.role {
                TurnRole::User => "You",
                TurnRole::Assistant => "Them",
            };
            format!("{}: {}", speaker, turn.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Single user message asking for coaching on `conversation`.
pub fn feedback_prompt(conversation: &[Turn]) -> String {
    format!(
        "{}\n\nConversation:\n{}",
        FEEDBACK_INSTRUCTIONS,
        render_transcript(conversation)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Role;
    use pretty_assertions::assert_eq;

    fn transcript() -> Vec<Turn> {
        vec![
            Turn::assistant("Hey! What's up? Everything good?"),
            Turn::user("Not really. Your comment yesterday stung."),
            Turn::assistant("Wait, which comment?"),
        ]
    }

    #[test]
    fn test_completion_messages_order() {
        let msgs = completion_messages(&transcript(), "The one about my job.");
        let roles: Vec<Role> = msgs.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::Assistant, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(msgs[3].content, "The one about my job.");
    }

    #[test]
    fn test_completion_messages_empty_history() {
        let msgs = completion_messages(&[], "Hello");
        assert_eq!(msgs, vec![Message::user("Hello")]);
    }

    #[test]
    fn test_render_transcript_labels() {
        let text = render_transcript(&transcript());
        assert_eq!(
            text,
            "Them: Hey! What's up? Everything good?\n\n\
             You: Not really. Your comment yesterday stung.\n\n\
             Them: Wait, which comment?"
        );
    }

    #[test]
    fn test_feedback_prompt_embeds_transcript() {
        let prompt = feedback_prompt(&transcript());
        assert!(prompt.starts_with("You are a compassionate interpersonal skills coach."));
        assert!(prompt.contains("3. One key takeaway for future practice"));
        assert!(prompt.ends_with("Conversation:\nThem: Hey! What's up? Everything good?\n\nYou: Not really. Your comment yesterday stung.\n\nThem: Wait, which comment?"));
    }
}
