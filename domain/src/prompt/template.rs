//! Prompt templates for the discussion flow
//!
//! Every generation call gets the same skeleton: the persona's fixed
//! instruction, the discussion topic, a bounded window of recent transcript
//! turns (oldest first, speaker-labelled), and the triggering message.
//! The window bound is a hard rule; unbounded history would grow prompt
//! cost and latency without limit.

use crate::core::topic::Topic;
use crate::discussion::turn::Turn;
use crate::persona::Persona;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Prompt for the facilitator's opening statement
    pub fn opening(topic: &Topic, context: Option<&str>) -> String {
        let mut prompt = format!(
            r#"{}

A new group discussion is starting on the topic:

{}
"#,
            Persona::Facilitator.instruction(),
            topic
        );

        if let Some(context) = context {
            prompt.push_str(&format!("\nBackground provided by the organizer:\n{}\n", context));
        }

        prompt.push_str(
            r#"
Open the discussion: welcome the participants, frame the topic in two or
three sentences, and pose one concrete question to get things moving."#,
        );

        prompt
    }

    /// Prompt for a persona's regular response to the latest user message
    pub fn agent_response(
        persona: Persona,
        topic: &Topic,
        window: &[Turn],
        trigger: &str,
    ) -> String {
        format!(
            r#"{}

Discussion topic: {}

Recent conversation:
{}
The participant just said:

{}

Respond in character, in a few sentences. React to what was actually said:
build on it, question it, or take it somewhere new."#,
            persona.instruction(),
            topic,
            Self::transcript_block(window),
            trigger
        )
    }

    /// Prompt for a persona answering a question addressed to it directly
    pub fn direct_question(
        persona: Persona,
        topic: &Topic,
        window: &[Turn],
        question: &str,
    ) -> String {
        format!(
            r#"{}

Discussion topic: {}

Recent conversation:
{}
The participant has asked you directly:

{}

Answer the question yourself, in character. Do not defer to the group."#,
            persona.instruction(),
            topic,
            Self::transcript_block(window),
            question
        )
    }

    /// Prompt for consensus analysis over the recent transcript
    pub fn consensus(topic: &Topic, window: &[Turn]) -> String {
        format!(
            r#"You are an impartial observer analyzing a group discussion.

Discussion topic: {}

Recent conversation:
{}
Identify where the participants agree and disagree. Respond with a JSON
object of this shape:

{{"agreements": ["..."], "disagreements": ["..."], "open_points": ["..."], "alignment": 0.0}}

where "alignment" is a number between 0 (total disagreement) and 1 (full
agreement). Respond with the JSON object only."#,
            topic,
            Self::transcript_block(window)
        )
    }

    /// Prompt for a prose summary of the recent transcript
    pub fn summary(topic: &Topic, window: &[Turn]) -> String {
        format!(
            r#"You are an impartial observer summarizing a group discussion.

Discussion topic: {}

Recent conversation:
{}
Write a concise summary of the discussion so far: the main threads, who
argued what, and where things stand. Two or three paragraphs at most."#,
            topic,
            Self::transcript_block(window)
        )
    }

    /// Speaker-labelled transcript lines, oldest first.
    fn transcript_block(window: &[Turn]) -> String {
        let mut block = String::new();
        for turn in window {
            block.push_str(&format!("{}: {}\n", turn.display_name, turn.message));
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Vec<Turn> {
        vec![
            Turn::opening("Welcome all."),
            Turn::user("I think we should ship weekly."),
        ]
    }

    #[test]
    fn test_agent_response_contains_instruction_topic_window_trigger() {
        let topic = Topic::new("release cadence");
        let prompt =
            PromptTemplate::agent_response(Persona::Skeptic, &topic, &window(), "thoughts?");

        assert!(prompt.contains(Persona::Skeptic.instruction()));
        assert!(prompt.contains("release cadence"));
        assert!(prompt.contains("Facilitator: Welcome all."));
        assert!(prompt.contains("You: I think we should ship weekly."));
        assert!(prompt.contains("thoughts?"));
    }

    #[test]
    fn test_transcript_is_oldest_first() {
        let topic = Topic::new("release cadence");
        let prompt = PromptTemplate::summary(&topic, &window());

        let opening_pos = prompt.find("Welcome all.").unwrap();
        let user_pos = prompt.find("ship weekly").unwrap();
        assert!(opening_pos < user_pos);
    }

    #[test]
    fn test_opening_includes_context_when_present() {
        let topic = Topic::new("hiring strategy");
        let with = PromptTemplate::opening(&topic, Some("Series B startup, 40 people"));
        let without = PromptTemplate::opening(&topic, None);

        assert!(with.contains("Series B startup"));
        assert!(!without.contains("Series B startup"));
    }

    #[test]
    fn test_consensus_asks_for_json() {
        let topic = Topic::new("hiring strategy");
        let prompt = PromptTemplate::consensus(&topic, &window());
        assert!(prompt.contains("\"agreements\""));
        assert!(prompt.contains("JSON object only"));
    }
}
