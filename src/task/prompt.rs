//! Instruction templates sent to the completion API.

use super::task::TaskKind;
use crate::llm::ChatMessage;

pub const SYSTEM_PROMPT: &str = "You are a TOEFL test preparation expert.";

/// Build the user instruction for `kind`. Only `topic` varies between calls.
pub fn build_instruction(kind: TaskKind, topic: &str) -> String {
    let (task_name, prompt_line, opinion_line, length_line, description_line) = match kind {
        TaskKind::Speaking => (
            "speaking",
            format!("Include a clear question about {}", topic),
            "Ask the student to express and support their opinion",
            "Be appropriate for a 45-second response",
            "The full text of the speaking prompt",
        ),
        TaskKind::Writing => (
            "writing",
            format!("Include a clear writing prompt about {}", topic),
            "Ask the student to express and support their opinion with reasons and examples",
            "Be appropriate for a 30-minute response (300-350 words)",
            "The full text of the writing prompt",
        ),
    };

    format!(
        "Create a TOEFL independent {task_name} task about \"{topic}\".\n\
         \n\
         The task should:\n\
         1. {prompt_line}\n\
         2. {opinion_line}\n\
         3. {length_line}\n\
         4. Be challenging but manageable for an intermediate to advanced English learner\n\
         \n\
         Format the response as JSON with these fields:\n\
         - taskTitle: A brief title for the task\n\
         - taskDescription: {description_line}\n\
         - suggestedPoints: 2-3 points the student could address\n\
         - difficultyLevel: A number from 1-5 (1=easiest, 5=hardest)\n"
    )
}

/// System and user messages for one generation request.
pub fn build_messages(kind: TaskKind, topic: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_instruction(kind, topic)),
    ]
}
